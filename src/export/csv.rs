use csv::{Terminator, WriterBuilder};
use std::io::Write;
use crate::models::Certificate;
use super::{ExportFormat, Exporter, Result, HEADERS};

/// UTF-8 byte order mark, so spreadsheet tools keep the Japanese labels intact.
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

pub struct CsvExporter {
    with_bom: bool,
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self {
            with_bom: true,
        }
    }
}

impl CsvExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bom(mut self, with_bom: bool) -> Self {
        self.with_bom = with_bom;
        self
    }
}

impl Exporter for CsvExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::DelimitedText
    }

    fn render(&self, records: &[Certificate]) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();

        if self.with_bom {
            buffer.write_all(&UTF8_BOM)?;
        }

        let mut writer = WriterBuilder::new()
            .delimiter(b',')
            .terminator(Terminator::Any(b'\n'))
            .from_writer(buffer);

        writer.write_record(HEADERS)?;

        for record in records {
            let amount = record.amount.to_string();
            let price = record.price.to_string();
            writer.write_record([
                record.id.as_str(),
                record.issuer.as_str(),
                record.holder.as_str(),
                record.status.label(),
                amount.as_str(),
                price.as_str(),
            ])?;
        }

        writer.flush()?;
        Ok(writer.into_inner().map_err(|e| e.into_error())?)
    }
}
