use serde::{Deserialize, Serialize};
use std::fmt;
use eframe::egui;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CertificateStatus {
    #[serde(rename = "発行済")]
    Issued,
    #[serde(rename = "移転済")]
    Transferred,
    #[serde(rename = "償却済")]
    Retired,
}

impl CertificateStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Issued => "発行済",
            Self::Transferred => "移転済",
            Self::Retired => "償却済",
        }
    }

    pub fn color(&self) -> egui::Color32 {
        match self {
            Self::Issued => egui::Color32::from_rgb(46, 125, 50),       // Green
            Self::Transferred => egui::Color32::from_rgb(33, 150, 243), // Blue
            Self::Retired => egui::Color32::from_rgb(158, 158, 158),    // Gray
        }
    }
}

impl fmt::Display for CertificateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the certificate ledger.
///
/// Field names double as the header row of the spreadsheet and CSV exports.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Certificate {
    pub id: String,
    pub issuer: String,
    pub holder: String,
    pub status: CertificateStatus,
    /// Quantity in tons.
    pub amount: f64,
    /// Price in JPY.
    pub price: u64,
}

impl Certificate {
    pub fn new(
        id: &str,
        issuer: &str,
        holder: &str,
        status: CertificateStatus,
        amount: f64,
        price: u64,
    ) -> Self {
        Self {
            id: id.to_string(),
            issuer: issuer.to_string(),
            holder: holder.to_string(),
            status,
            amount,
            price,
        }
    }
}

/// The fixed ledger shown by the demo.
pub fn sample_certificates() -> Vec<Certificate> {
    vec![
        Certificate::new(
            "GH3-001",
            "GreenAmmonia Corp",
            "Nippon Energy",
            CertificateStatus::Issued,
            100.0,
            1_200_000,
        ),
        Certificate::new(
            "GH3-002",
            "EcoChem Inc",
            "Maritime Fuel Ltd",
            CertificateStatus::Transferred,
            80.0,
            960_000,
        ),
        Certificate::new(
            "GH3-003",
            "GreenAmmonia Corp",
            "Tokyo Power",
            CertificateStatus::Retired,
            50.0,
            600_000,
        ),
    ]
}

/// Thousands-separated rendering for the table only; exports keep raw numbers.
pub fn format_grouped(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}
