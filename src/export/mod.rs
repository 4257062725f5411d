pub mod excel;
pub mod csv;
pub mod pdf;
pub mod snapshot;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use crate::models::Certificate;

use self::csv::CsvExporter;
use self::excel::ExcelExporter;
use self::pdf::PdfExporter;
pub use self::snapshot::{RegionAbsent, RegionSnapshot, SnapshotQueue};

/// Human-readable prefix shared by every exported file.
pub const FILE_PREFIX: &str = "証書台帳_グリーンNH3レジストリ";

/// Sheet name used by the spreadsheet export.
pub const SHEET_NAME: &str = "証書台帳";

/// Column headers, in display order.
pub const HEADERS: [&str; 6] = ["id", "issuer", "holder", "status", "amount", "price"];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("spreadsheet export failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV export failed: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot has no pixels ({width}x{height})")]
    EmptySnapshot { width: u32, height: u32 },
}

pub type Result<T> = std::result::Result<T, ExportError>;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    #[serde(rename = "xlsx")]
    Spreadsheet,
    #[serde(rename = "csv")]
    DelimitedText,
    #[serde(rename = "pdf")]
    PaginatedDocument,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [
        ExportFormat::Spreadsheet,
        ExportFormat::DelimitedText,
        ExportFormat::PaginatedDocument,
    ];

    /// Short key, also used in diagnostic events.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Spreadsheet => "xlsx",
            Self::DelimitedText => "csv",
            Self::PaginatedDocument => "pdf",
        }
    }

    pub fn extension(&self) -> &'static str {
        self.key()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Spreadsheet => "Excel (.xlsx)",
            Self::DelimitedText => "CSV (.csv)",
            Self::PaginatedDocument => "PDF (.pdf)",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A finished export: the suggested file name plus its bytes.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub trait Exporter {
    fn format(&self) -> ExportFormat;

    fn render(&self, records: &[Certificate]) -> Result<Vec<u8>>;
}

/// `<prefix>_<YYYYMMDDHHmm>` in local wall-clock time.
pub fn file_stem(at: &DateTime<Local>) -> String {
    format!("{}_{}", FILE_PREFIX, at.format("%Y%m%d%H%M"))
}

/// Runs the exporter for `format` against the held records.
///
/// Returns `Ok(None)` when the document mode has nothing to rasterize.
pub fn export(
    format: ExportFormat,
    records: &[Certificate],
    snapshot: &dyn RegionSnapshot,
    at: DateTime<Local>,
) -> Result<Option<ExportArtifact>> {
    let exporter: Box<dyn Exporter> = match format {
        ExportFormat::Spreadsheet => Box::new(ExcelExporter),
        ExportFormat::DelimitedText => Box::new(CsvExporter::new()),
        ExportFormat::PaginatedDocument => match snapshot.capture() {
            Some(image) => Box::new(PdfExporter::new(image)),
            None => {
                tracing::debug!("preview region absent, skipping PDF export");
                return Ok(None);
            }
        },
    };

    let bytes = exporter.render(records)?;
    tracing::debug!(format = %exporter.format(), size = bytes.len(), "export rendered");

    Ok(Some(ExportArtifact {
        file_name: format!("{}.{}", file_stem(&at), format.extension()),
        bytes,
    }))
}

/// Writes the artifact into `dir`, replacing a file of the same name.
pub fn save_artifact(artifact: &ExportArtifact, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(&artifact.file_name);
    fs::write(&path, &artifact.bytes)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_certificates;
    use chrono::TimeZone;
    use image::RgbaImage;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 5, 9, 7, 42).unwrap()
    }

    struct Synthetic(RgbaImage);

    impl RegionSnapshot for Synthetic {
        fn capture(&self) -> Option<RgbaImage> {
            Some(self.0.clone())
        }
    }

    #[test]
    fn test_file_stem_is_minute_precision() {
        assert_eq!(
            file_stem(&fixed_time()),
            "証書台帳_グリーンNH3レジストリ_202603050907"
        );
    }

    #[test]
    fn test_format_keys() {
        let keys: Vec<&str> = ExportFormat::ALL.iter().map(|f| f.key()).collect();
        assert_eq!(keys, vec!["xlsx", "csv", "pdf"]);
        assert_eq!(ExportFormat::default(), ExportFormat::Spreadsheet);
        assert_eq!(
            serde_json::to_string(&ExportFormat::DelimitedText).unwrap(),
            "\"csv\""
        );
    }

    #[test]
    fn test_export_names_file_by_format() {
        let records = sample_certificates();

        let xlsx = export(ExportFormat::Spreadsheet, &records, &RegionAbsent, fixed_time())
            .unwrap()
            .unwrap();
        assert_eq!(xlsx.file_name, "証書台帳_グリーンNH3レジストリ_202603050907.xlsx");

        let csv = export(ExportFormat::DelimitedText, &records, &RegionAbsent, fixed_time())
            .unwrap()
            .unwrap();
        assert_eq!(csv.file_name, "証書台帳_グリーンNH3レジストリ_202603050907.csv");
    }

    #[test]
    fn test_pdf_export_without_region_is_noop() {
        let records = sample_certificates();
        let result = export(
            ExportFormat::PaginatedDocument,
            &records,
            &RegionAbsent,
            fixed_time(),
        )
        .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_pdf_export_with_region() {
        let records = sample_certificates();
        let snapshot = Synthetic(RgbaImage::from_pixel(40, 20, image::Rgba([255, 255, 255, 255])));
        let artifact = export(ExportFormat::PaginatedDocument, &records, &snapshot, fixed_time())
            .unwrap()
            .unwrap();
        assert!(artifact.file_name.ends_with("_202603050907.pdf"));
        assert!(artifact.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_export_does_not_touch_records() {
        let records = sample_certificates();
        let before = records.clone();
        for format in ExportFormat::ALL {
            let _ = export(format, &records, &RegionAbsent, fixed_time()).unwrap();
        }
        assert_eq!(records, before);
    }

    #[test]
    fn test_save_artifact_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("downloads");
        let artifact = ExportArtifact {
            file_name: "ledger.csv".to_string(),
            bytes: b"id\n".to_vec(),
        };

        let path = save_artifact(&artifact, &target).unwrap();
        assert_eq!(path, target.join("ledger.csv"));
        assert_eq!(std::fs::read(&path).unwrap(), b"id\n");
    }
}
