use crate::export::ExportFormat;
use crate::models::Certificate;

/// Everything the demo window mutates, owned by the app and passed down.
#[derive(Debug, Clone)]
pub struct DemoState {
    records: Vec<Certificate>,
    loading: bool,
    format: ExportFormat,
}

impl DemoState {
    pub fn new(format: ExportFormat) -> Self {
        Self {
            records: Vec::new(),
            loading: false,
            format,
        }
    }

    pub fn records(&self) -> &[Certificate] {
        &self.records
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    pub fn set_format(&mut self, format: ExportFormat) {
        self.format = format;
    }

    pub fn begin_loading(&mut self) {
        self.loading = true;
    }

    /// Replaces the whole ledger; records are never edited one by one.
    pub fn finish_loading(&mut self, records: Vec<Certificate>) {
        self.records = records;
        self.loading = false;
    }

    pub fn shows_export_controls(&self) -> bool {
        !self.records.is_empty()
    }
}

impl Default for DemoState {
    fn default() -> Self {
        Self::new(ExportFormat::default())
    }
}
