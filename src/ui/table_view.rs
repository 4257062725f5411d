use crate::models::{format_grouped, Certificate};
use egui_extras::{Column, TableBuilder};
use eframe::egui;

pub const PREVIEW_HEADING: &str = "証書台帳プレビュー";

const COLUMN_TITLES: [&str; 6] = ["証書ID", "発行者", "保有者", "ステータス", "数量[t]", "価格[JPY]"];

/// Renders the ledger preview. Sorting only changes the displayed order.
pub struct CertificateTableView {
    sort_column: SortColumn,
    sort_ascending: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum SortColumn {
    None,
    Id,
    Issuer,
    Holder,
    Status,
    Amount,
    Price,
}

impl SortColumn {
    const BY_INDEX: [SortColumn; 6] = [
        SortColumn::Id,
        SortColumn::Issuer,
        SortColumn::Holder,
        SortColumn::Status,
        SortColumn::Amount,
        SortColumn::Price,
    ];
}

impl CertificateTableView {
    pub fn new() -> Self {
        Self {
            sort_column: SortColumn::None,
            sort_ascending: true,
        }
    }

    /// Draws heading and table; returns the screen rect they occupy.
    pub fn render(&mut self, ui: &mut egui::Ui, records: &[Certificate]) -> egui::Rect {
        let rows = self.ordered(records);

        ui.vertical(|ui| {
            ui.heading(PREVIEW_HEADING);
            ui.add_space(8.0);

            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .vscroll(false)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .column(Column::initial(80.0).at_least(70.0))   // ID
                .column(Column::initial(150.0).at_least(100.0)) // Issuer
                .column(Column::initial(150.0).at_least(100.0)) // Holder
                .column(Column::initial(80.0).at_least(60.0))   // Status
                .column(Column::initial(70.0).at_least(50.0))   // Amount
                .column(Column::remainder().at_least(90.0))     // Price
                .header(25.0, |mut header| {
                    for (title, column) in COLUMN_TITLES.iter().zip(SortColumn::BY_INDEX) {
                        header.col(|ui| {
                            if ui.button(*title).clicked() {
                                self.toggle_sort(column);
                            }
                            self.show_sort_indicator(ui, column);
                        });
                    }
                })
                .body(|mut body| {
                    for record in rows {
                        body.row(22.0, |mut row| {
                            row.col(|ui| {
                                ui.label(&record.id);
                            });
                            row.col(|ui| {
                                ui.label(&record.issuer);
                            });
                            row.col(|ui| {
                                ui.label(&record.holder);
                            });
                            row.col(|ui| {
                                ui.colored_label(record.status.color(), record.status.label());
                            });
                            row.col(|ui| {
                                ui.label(record.amount.to_string());
                            });
                            row.col(|ui| {
                                ui.label(format_grouped(record.price));
                            });
                        });
                    }
                });
        })
        .response
        .rect
    }

    fn ordered<'a>(&self, records: &'a [Certificate]) -> Vec<&'a Certificate> {
        let mut rows: Vec<&Certificate> = records.iter().collect();

        match self.sort_column {
            SortColumn::None => return rows,
            SortColumn::Id => rows.sort_by(|a, b| a.id.cmp(&b.id)),
            SortColumn::Issuer => rows.sort_by(|a, b| a.issuer.cmp(&b.issuer)),
            SortColumn::Holder => rows.sort_by(|a, b| a.holder.cmp(&b.holder)),
            SortColumn::Status => rows.sort_by_key(|c| c.status.label()),
            SortColumn::Amount => rows.sort_by(|a, b| a.amount.total_cmp(&b.amount)),
            SortColumn::Price => rows.sort_by_key(|c| c.price),
        }

        if !self.sort_ascending {
            rows.reverse();
        }
        rows
    }

    fn toggle_sort(&mut self, column: SortColumn) {
        if self.sort_column == column {
            self.sort_ascending = !self.sort_ascending;
        } else {
            self.sort_column = column;
            self.sort_ascending = true;
        }
    }

    fn show_sort_indicator(&self, ui: &mut egui::Ui, column: SortColumn) {
        if self.sort_column == column {
            let arrow = if self.sort_ascending { "▲" } else { "▼" };
            ui.label(arrow);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_certificates;

    fn ids<'a>(rows: &[&'a Certificate]) -> Vec<&'a str> {
        rows.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_unsorted_keeps_ledger_order() {
        let records = sample_certificates();
        let view = CertificateTableView::new();
        assert_eq!(ids(&view.ordered(&records)), vec!["GH3-001", "GH3-002", "GH3-003"]);
    }

    #[test]
    fn test_toggle_sort_by_price() {
        let records = sample_certificates();
        let mut view = CertificateTableView::new();

        view.toggle_sort(SortColumn::Price);
        assert_eq!(ids(&view.ordered(&records)), vec!["GH3-003", "GH3-002", "GH3-001"]);

        view.toggle_sort(SortColumn::Price);
        assert_eq!(ids(&view.ordered(&records)), vec!["GH3-001", "GH3-002", "GH3-003"]);

        // Source order is untouched.
        assert_eq!(records, sample_certificates());
    }
}
