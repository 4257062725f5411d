use rust_xlsxwriter::{Format, Workbook};
use crate::models::Certificate;
use super::{ExportFormat, Exporter, Result, HEADERS, SHEET_NAME};

pub struct ExcelExporter;

impl Exporter for ExcelExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Spreadsheet
    }

    fn render(&self, records: &[Certificate]) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        // Set column widths
        worksheet.set_column_width(0, 12)?;  // id
        worksheet.set_column_width(1, 24)?;  // issuer
        worksheet.set_column_width(2, 24)?;  // holder
        worksheet.set_column_width(3, 10)?;  // status
        worksheet.set_column_width(4, 10)?;  // amount
        worksheet.set_column_width(5, 14)?;  // price

        for (col, header) in HEADERS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        }

        worksheet.set_freeze_panes(1, 0)?;
        worksheet.autofilter(0, 0, records.len() as u32, (HEADERS.len() - 1) as u16)?;

        for (row_num, record) in records.iter().enumerate() {
            let row = (row_num + 1) as u32;

            worksheet.write_string(row, 0, &record.id)?;
            worksheet.write_string(row, 1, &record.issuer)?;
            worksheet.write_string(row, 2, &record.holder)?;
            worksheet.write_string(row, 3, record.status.label())?;
            worksheet.write_number(row, 4, record.amount)?;
            worksheet.write_number(row, 5, record.price as f64)?;
        }

        Ok(workbook.save_to_buffer()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_certificates;
    use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
    use std::io::Cursor;

    fn read_back(bytes: Vec<u8>) -> Vec<Vec<Data>> {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        assert_eq!(workbook.sheet_names(), vec![SHEET_NAME.to_string()]);
        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        range.rows().map(|row| row.to_vec()).collect()
    }

    #[test]
    fn test_one_row_per_record_plus_header() {
        let records = sample_certificates();
        let rows = read_back(ExcelExporter.render(&records).unwrap());

        assert_eq!(rows.len(), records.len() + 1);
        for (cell, header) in rows[0].iter().zip(HEADERS) {
            assert_eq!(*cell, Data::String(header.to_string()));
        }
    }

    #[test]
    fn test_values_match_records() {
        let records = sample_certificates();
        let rows = read_back(ExcelExporter.render(&records).unwrap());

        for (row, record) in rows[1..].iter().zip(&records) {
            assert_eq!(row[0], Data::String(record.id.clone()));
            assert_eq!(row[1], Data::String(record.issuer.clone()));
            assert_eq!(row[2], Data::String(record.holder.clone()));
            assert_eq!(row[3], Data::String(record.status.label().to_string()));
            assert_eq!(row[4], Data::Float(record.amount));
            assert_eq!(row[5], Data::Float(record.price as f64));
        }
    }

    #[test]
    fn test_empty_ledger_has_header_only() {
        let rows = read_back(ExcelExporter.render(&[]).unwrap());
        assert_eq!(rows.len(), 1);
    }
}
