use crate::export::ExportFormat;

/// Where a contact-form link was clicked from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CtaSource {
    Header,
    Sticky,
    Footer,
}

impl CtaSource {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Sticky => "sticky",
            Self::Footer => "footer",
        }
    }
}

/// Write-only usage events. Nothing in the app reads them back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticEvent {
    SampleStart,
    SampleLoaded,
    Download(ExportFormat),
    CtaClick(CtaSource),
}

impl DiagnosticEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SampleStart => "sample_start",
            Self::SampleLoaded => "sample_loaded",
            Self::Download(_) => "download",
            Self::CtaClick(_) => "cta_click",
        }
    }

    pub fn emit(&self) {
        match self {
            Self::SampleStart | Self::SampleLoaded => {
                tracing::info!(event = self.name());
            }
            Self::Download(format) => {
                tracing::info!(event = self.name(), format = format.key());
            }
            Self::CtaClick(cta) => {
                tracing::info!(event = self.name(), cta = cta.key());
            }
        }
    }
}
