mod certificate;

pub use certificate::{format_grouped, sample_certificates, Certificate, CertificateStatus};
