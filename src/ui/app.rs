use crate::config::{AppConfig, Theme};
use crate::contact::contact_url;
use crate::diagnostics::{CtaSource, DiagnosticEvent};
use crate::export::{self, ExportFormat, RegionAbsent, RegionSnapshot, SnapshotQueue};
use crate::loader::SampleLoader;
use crate::state::DemoState;
use crate::ui::table_view::CertificateTableView;
use crate::ui::themes::{self, ACCENT};
use chrono::{DateTime, Local};
use eframe::egui;
use std::sync::Arc;

const TITLE: &str = "グリーンNH3レジストリ";
const HEADER_CTA: &str = "この仕組みについて問い合わせる";
const DROP_HINT: &str = "ここにCSV/JSONファイルをドロップ";
const SAMPLE_BUTTON: &str = "サンプル証書で試す";
const EMPTY_PROMPT: &str = "左の「サンプル証書で試す」から開始してください。";
const FORMAT_PLACEHOLDER: &str = "出力形式";
const DOWNLOAD_BUTTON: &str = "証書台帳をダウンロード";
const STICKY_TEXT: &str = "本番PoC・API連携デモのご相談はこちら";
const STICKY_CTA: &str = "問い合わせ";
const FOOTER_LINES: [&str; 3] = [
    "運営元：株式会社 職人さんドットコム",
    "〒220-0004 神奈川県横浜市西区北幸2丁目10-28 むつみビル3F",
    "info@shokunin-san.com / 03-6823-3524",
];
const FOOTER_LINK: &str = "お問い合わせフォーム";

/// Progress shown while the sample loads; the delay has no real progress to report.
const LOADING_PROGRESS: f32 = 0.7;

pub struct RegistryApp {
    config: AppConfig,
    state: DemoState,
    loader: SampleLoader,
    table_view: CertificateTableView,

    // Screen rect of the rendered preview, `None` while nothing is drawn
    preview_rect: Option<egui::Rect>,
    pending_pdf: SnapshotQueue,

    status_message: String,
}

impl RegistryApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        themes::apply_theme(&cc.egui_ctx, &config.theme);

        Self {
            state: DemoState::new(config.default_export_format),
            loader: SampleLoader::new(config.sample_delay()),
            table_view: CertificateTableView::new(),
            preview_rect: None,
            pending_pdf: SnapshotQueue::new(),
            status_message: "Ready".to_string(),
            config,
        }
    }

    fn start_sample_load(&mut self, ctx: &egui::Context) {
        DiagnosticEvent::SampleStart.emit();
        self.state.begin_loading();
        self.status_message = "Loading sample certificates...".to_string();
        self.loader.start(Some(ctx.clone()));
    }

    fn process_loader_updates(&mut self) {
        if let Some(records) = self.loader.poll() {
            self.state.finish_loading(records);
            self.status_message = format!("{} certificates loaded", self.state.records().len());
            DiagnosticEvent::SampleLoaded.emit();
        }
    }

    fn select_format(&mut self, format: ExportFormat) {
        if self.state.format() == format {
            return;
        }

        self.state.set_format(format);
        self.config.default_export_format = format;
        if let Err(e) = self.config.save() {
            tracing::warn!("Failed to save config: {}", e);
        }
    }

    fn start_export(&mut self, ctx: &egui::Context) {
        let format = self.state.format();
        DiagnosticEvent::Download(format).emit();

        match format {
            ExportFormat::PaginatedDocument => {
                if !self.pending_pdf.request(self.preview_rect, ctx.pixels_per_point(), Local::now()) {
                    tracing::debug!("no preview on screen, PDF export skipped");
                    return;
                }
                ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot);
                ctx.request_repaint();
            }
            _ => self.finish_export(format, &RegionAbsent, Local::now()),
        }
    }

    fn finish_export(&mut self, format: ExportFormat, snapshot: &dyn RegionSnapshot, at: DateTime<Local>) {
        let artifact = match export::export(format, self.state.records(), snapshot, at) {
            Ok(Some(artifact)) => artifact,
            Ok(None) => return,
            Err(e) => {
                tracing::error!(format = format.key(), "Export failed: {}", e);
                return;
            }
        };

        let dir = self.config.export_dir();
        match export::save_artifact(&artifact, &dir) {
            Ok(path) => {
                tracing::info!(path = %path.display(), bytes = artifact.bytes.len(), "Export saved");
                self.status_message = format!("Saved {}", path.display());
            }
            Err(e) => {
                tracing::error!(dir = %dir.display(), "Failed to save export: {}", e);
            }
        }
    }

    fn process_screenshots(&mut self, ctx: &egui::Context) {
        let screenshots: Vec<Arc<egui::ColorImage>> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Screenshot { image, .. } => Some(image.clone()),
                    _ => None,
                })
                .collect()
        });

        for image in screenshots {
            for (snapshot, requested_at) in self.pending_pdf.resolve(image) {
                self.finish_export(ExportFormat::PaginatedDocument, &snapshot, requested_at);
            }
        }
    }

    fn open_contact(&self, ctx: &egui::Context, source: CtaSource) {
        DiagnosticEvent::CtaClick(source).emit();
        let url = contact_url(&self.config.contact_form_url, &self.config.contact_query);
        ctx.open_url(egui::OpenUrl::new_tab(url));
    }

    fn toggle_theme(&mut self, ctx: &egui::Context) {
        self.config.theme = match self.config.theme {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        };
        themes::apply_theme(ctx, &self.config.theme);

        if let Err(e) = self.config.save() {
            tracing::warn!("Failed to save config: {}", e);
        }
    }

    fn primary_button(text: &str) -> egui::Button<'static> {
        egui::Button::new(egui::RichText::new(text.to_owned()).color(egui::Color32::WHITE).strong())
            .fill(ACCENT)
            .min_size(egui::vec2(160.0, 32.0))
    }

    fn render_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add_space(12.0);
            ui.label(egui::RichText::new(TITLE).heading().strong());

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.add_space(12.0);

                if ui.add(Self::primary_button(HEADER_CTA)).clicked() {
                    self.open_contact(ui.ctx(), CtaSource::Header);
                }

                let theme_icon = match self.config.theme {
                    Theme::Light => "🌙",
                    Theme::Dark => "☀",
                };
                if ui.button(theme_icon).on_hover_text("Toggle theme").clicked() {
                    let ctx = ui.ctx().clone();
                    self.toggle_theme(&ctx);
                }
            });
        });
    }

    fn render_upload_pane(&mut self, ui: &mut egui::Ui) {
        let colors = themes::panel_colors(&self.config.theme);
        let ctx = ui.ctx().clone();

        // Drop zone is decorative; dropped files are ignored
        let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());
        let dropped = ctx.input(|i| i.raw.dropped_files.len());
        if dropped > 0 {
            tracing::debug!(files = dropped, "file drop ignored");
        }

        let border = if hovering { ACCENT } else { colors.drop_zone };

        egui::Frame::none()
            .stroke(egui::Stroke::new(2.0, border))
            .rounding(8.0)
            .inner_margin(egui::Margin::same(24.0))
            .show(ui, |ui| {
                ui.set_min_height(220.0);
                ui.vertical_centered(|ui| {
                    ui.add_space(24.0);
                    ui.label(egui::RichText::new("⬆").size(36.0));
                    ui.add_space(4.0);
                    ui.label(DROP_HINT);
                    ui.add_space(12.0);

                    let loading = self.state.is_loading();
                    let sample_btn = ui.add_enabled(!loading, Self::primary_button(SAMPLE_BUTTON));
                    if sample_btn.clicked() {
                        self.start_sample_load(&ctx);
                    }

                    if loading {
                        ui.add_space(16.0);
                        ui.add(
                            egui::ProgressBar::new(LOADING_PROGRESS)
                                .desired_width(ui.available_width() * 2.0 / 3.0)
                                .animate(true),
                        );
                    }
                });
            });
    }

    fn render_preview_pane(&mut self, ui: &mut egui::Ui) {
        let colors = themes::panel_colors(&self.config.theme);
        let ctx = ui.ctx().clone();

        egui::Frame::none()
            .stroke(egui::Stroke::new(1.0, colors.border))
            .rounding(8.0)
            .inner_margin(egui::Margin::same(16.0))
            .show(ui, |ui| {
                ui.set_min_height(220.0);

                if !self.state.shows_export_controls() {
                    self.preview_rect = None;
                    ui.colored_label(colors.muted_text, EMPTY_PROMPT);
                    return;
                }

                let rect = self.table_view.render(ui, self.state.records());
                self.preview_rect = Some(rect);

                ui.add_space(16.0);
                self.render_export_controls(ui, &ctx);
            });
    }

    fn render_export_controls(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let current = self.state.format();
        let mut chosen = None;

        egui::ComboBox::from_label(FORMAT_PLACEHOLDER)
            .width(180.0)
            .selected_text(current.label())
            .show_ui(ui, |ui| {
                for format in ExportFormat::ALL {
                    if ui.selectable_label(current == format, format.label()).clicked() {
                        chosen = Some(format);
                    }
                }
            });

        if let Some(format) = chosen {
            self.select_format(format);
        }

        ui.add_space(8.0);
        let download = ui
            .add(Self::primary_button(&format!("⬇ {}", DOWNLOAD_BUTTON)))
            .on_hover_text("Ctrl+E");
        if download.clicked() {
            self.start_export(ctx);
        }
    }

    fn render_footer(&mut self, ui: &mut egui::Ui) {
        let colors = themes::panel_colors(&self.config.theme);

        ui.add_space(32.0);
        ui.separator();
        ui.vertical_centered(|ui| {
            for line in FOOTER_LINES {
                ui.label(egui::RichText::new(line).small().color(colors.muted_text));
            }
            if ui.link(egui::RichText::new(FOOTER_LINK).small()).clicked() {
                self.open_contact(ui.ctx(), CtaSource::Footer);
            }
        });
        ui.add_space(16.0);
    }

    fn render_sticky_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add_space(12.0);
            ui.label(egui::RichText::new(STICKY_TEXT).small());

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.add_space(12.0);
                if ui.add(Self::primary_button(STICKY_CTA)).clicked() {
                    self.open_contact(ui.ctx(), CtaSource::Sticky);
                }
            });
        });
    }

    fn render_status_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add_space(12.0);
            ui.small(&self.status_message);

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                // Add small right margin to prevent text cutoff
                ui.add_space(10.0);
                ui.small(format!(
                    "v{} | {} certificates",
                    env!("CARGO_PKG_VERSION"),
                    self.state.records().len()
                ));
            });
        });
    }

    fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) {
        let (load, export) = ctx.input(|i| {
            (
                i.modifiers.ctrl && i.key_pressed(egui::Key::L),
                i.modifiers.ctrl && i.key_pressed(egui::Key::E),
            )
        });

        // Same guard as the sample button
        if load && !self.state.is_loading() {
            self.start_sample_load(ctx);
        }

        if export && self.state.shows_export_controls() {
            self.start_export(ctx);
        }
    }
}

impl eframe::App for RegistryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_loader_updates();
        self.process_screenshots(ctx);
        self.handle_keyboard_shortcuts(ctx);

        // Keep the progress bar animating until the load lands
        if self.state.is_loading() || !self.pending_pdf.is_empty() {
            ctx.request_repaint();
        }

        let colors = themes::panel_colors(&self.config.theme);

        egui::TopBottomPanel::top("header")
            .frame(egui::Frame {
                fill: colors.bar,
                stroke: egui::Stroke::new(1.0, colors.border),
                inner_margin: egui::Margin::symmetric(0.0, 12.0),
                ..Default::default()
            })
            .show(ctx, |ui| {
                self.render_header(ui);
            });

        egui::TopBottomPanel::bottom("status_bar")
            .frame(egui::Frame {
                fill: colors.bar,
                inner_margin: egui::Margin::symmetric(0.0, 4.0),
                ..Default::default()
            })
            .show(ctx, |ui| {
                self.render_status_bar(ui);
            });

        egui::TopBottomPanel::bottom("sticky_cta")
            .frame(egui::Frame {
                fill: colors.bar,
                stroke: egui::Stroke::new(1.0, colors.border),
                inner_margin: egui::Margin::symmetric(0.0, 10.0),
                ..Default::default()
            })
            .show(ctx, |ui| {
                self.render_sticky_bar(ui);
            });

        egui::CentralPanel::default()
            .frame(egui::Frame {
                fill: colors.content,
                inner_margin: egui::Margin::same(16.0),
                ..Default::default()
            })
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.columns(2, |columns| {
                        self.render_upload_pane(&mut columns[0]);
                        self.render_preview_pane(&mut columns[1]);
                    });
                    self.render_footer(ui);
                });
            });
    }
}
