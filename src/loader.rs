use eframe::egui;
use std::time::Duration;
use tokio::sync::mpsc;
use crate::models::{sample_certificates, Certificate};

pub const DEFAULT_SAMPLE_DELAY: Duration = Duration::from_millis(3000);

/// Waits out the simulated delay, then yields the fixed sample ledger.
pub async fn load_samples(delay: Duration) -> Vec<Certificate> {
    tokio::time::sleep(delay).await;
    sample_certificates()
}

/// Runs sample loads on the tokio runtime and hands results back to the UI thread.
///
/// One channel lives as long as the loader, so every started load is delivered
/// even if another one was started in the meantime.
pub struct SampleLoader {
    delay: Duration,
    tx: mpsc::UnboundedSender<Vec<Certificate>>,
    rx: mpsc::UnboundedReceiver<Vec<Certificate>>,
}

impl SampleLoader {
    pub fn new(delay: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { delay, tx, rx }
    }

    /// Must be called from within a tokio runtime.
    pub fn start(&self, repaint: Option<egui::Context>) {
        let tx = self.tx.clone();
        let delay = self.delay;

        tokio::spawn(async move {
            let records = load_samples(delay).await;
            if tx.send(records).is_err() {
                tracing::debug!("sample loader dropped before delivery");
            }
            if let Some(ctx) = repaint {
                ctx.request_repaint();
            }
        });
    }

    /// Latest finished load, if any arrived since the last poll.
    pub fn poll(&mut self) -> Option<Vec<Certificate>> {
        let mut latest = None;
        while let Ok(records) = self.rx.try_recv() {
            latest = Some(records);
        }
        latest
    }
}
