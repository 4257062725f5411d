use chrono::{DateTime, Local};
use eframe::egui;
use image::RgbaImage;
use std::sync::Arc;

/// Rasterized pixels of an on-screen region, fed to the PDF exporter.
pub trait RegionSnapshot {
    /// Pixels of the region, or `None` when the region is not on screen.
    fn capture(&self) -> Option<RgbaImage>;
}

/// The preview region is not rendered (no records yet).
pub struct RegionAbsent;

impl RegionSnapshot for RegionAbsent {
    fn capture(&self) -> Option<RgbaImage> {
        None
    }
}

/// A viewport screenshot together with the logical rect to cut out of it.
pub struct ScreenRegion {
    screenshot: Arc<egui::ColorImage>,
    region: egui::Rect,
    pixels_per_point: f32,
}

impl ScreenRegion {
    pub fn new(screenshot: Arc<egui::ColorImage>, region: egui::Rect, pixels_per_point: f32) -> Self {
        Self {
            screenshot,
            region,
            pixels_per_point,
        }
    }
}

impl RegionSnapshot for ScreenRegion {
    fn capture(&self) -> Option<RgbaImage> {
        let [width, height] = self.screenshot.size;
        let screen = egui::Rect::from_min_size(
            egui::Pos2::ZERO,
            egui::vec2(
                width as f32 / self.pixels_per_point,
                height as f32 / self.pixels_per_point,
            ),
        );
        let visible = self.region.intersect(screen);
        if !visible.is_positive() {
            return None;
        }

        let cropped = self.screenshot.region(&visible, Some(self.pixels_per_point));
        let [w, h] = cropped.size;
        if w == 0 || h == 0 {
            return None;
        }

        let raw: Vec<u8> = cropped
            .pixels
            .iter()
            .flat_map(|pixel| pixel.to_srgba_unmultiplied())
            .collect();

        RgbaImage::from_raw(w as u32, h as u32, raw)
    }
}

/// A PDF export waiting for its viewport screenshot.
#[derive(Debug, Clone, Copy)]
struct PendingSnapshot {
    region: egui::Rect,
    pixels_per_point: f32,
    requested_at: DateTime<Local>,
}

/// PDF requests waiting for a screenshot.
///
/// Screenshot requests issued before the next paint collapse into a single
/// event, so one screenshot serves every request pending at that time.
#[derive(Debug, Default)]
pub struct SnapshotQueue {
    pending: Vec<PendingSnapshot>,
}

impl SnapshotQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a capture of `region`. Returns `false` and queues nothing when
    /// no region is on screen.
    pub fn request(
        &mut self,
        region: Option<egui::Rect>,
        pixels_per_point: f32,
        requested_at: DateTime<Local>,
    ) -> bool {
        let Some(region) = region else {
            return false;
        };
        self.pending.push(PendingSnapshot {
            region,
            pixels_per_point,
            requested_at,
        });
        true
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Pairs `screenshot` with every pending request, oldest first.
    pub fn resolve(&mut self, screenshot: Arc<egui::ColorImage>) -> Vec<(ScreenRegion, DateTime<Local>)> {
        self.pending
            .drain(..)
            .map(|pending| {
                let snapshot = ScreenRegion::new(
                    Arc::clone(&screenshot),
                    pending.region,
                    pending.pixels_per_point,
                );
                (snapshot, pending.requested_at)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{export, ExportFormat};
    use crate::models::sample_certificates;
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 5, 9, minute, 0).unwrap()
    }

    fn preview() -> Option<egui::Rect> {
        Some(egui::Rect::from_min_max(egui::pos2(2.0, 2.0), egui::pos2(8.0, 6.0)))
    }

    fn screenshot(width: usize, height: usize) -> Arc<egui::ColorImage> {
        Arc::new(egui::ColorImage::new([width, height], egui::Color32::from_rgb(10, 200, 30)))
    }

    #[test]
    fn test_absent_region_captures_nothing() {
        assert!(RegionAbsent.capture().is_none());
    }

    #[test]
    fn test_crop_uses_pixels_per_point() {
        let region = egui::Rect::from_min_max(egui::pos2(1.0, 1.0), egui::pos2(5.0, 3.0));
        let snapshot = ScreenRegion::new(screenshot(20, 20), region, 2.0);

        let image = snapshot.capture().unwrap();
        assert_eq!(image.dimensions(), (8, 4));
        assert_eq!(image.get_pixel(0, 0).0, [10, 200, 30, 255]);
    }

    #[test]
    fn test_region_outside_screen() {
        let region = egui::Rect::from_min_max(egui::pos2(50.0, 50.0), egui::pos2(60.0, 60.0));
        let snapshot = ScreenRegion::new(screenshot(10, 10), region, 1.0);
        assert!(snapshot.capture().is_none());
    }

    #[test]
    fn test_request_without_region_queues_nothing() {
        let mut queue = SnapshotQueue::new();
        assert!(!queue.request(None, 1.0, at(0)));
        assert!(queue.is_empty());
        assert!(queue.resolve(screenshot(10, 10)).is_empty());
    }

    #[test]
    fn test_screenshot_with_nothing_queued_is_ignored() {
        let mut queue = SnapshotQueue::new();
        assert!(queue.resolve(screenshot(10, 10)).is_empty());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_each_request_keeps_its_timestamp() {
        let records = sample_certificates();
        let mut queue = SnapshotQueue::new();
        assert!(queue.request(preview(), 1.0, at(7)));
        assert!(queue.request(preview(), 1.0, at(8)));

        let mut names = Vec::new();
        for image in [screenshot(10, 10), screenshot(10, 10)] {
            for (snapshot, requested_at) in queue.resolve(image) {
                let artifact = export(ExportFormat::PaginatedDocument, &records, &snapshot, requested_at)
                    .unwrap()
                    .unwrap();
                names.push(artifact.file_name);
            }
        }

        assert_eq!(
            names,
            vec![
                "証書台帳_グリーンNH3レジストリ_202603050907.pdf",
                "証書台帳_グリーンNH3レジストリ_202603050908.pdf",
            ]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_collapsed_screenshot_serves_all_requests() {
        let mut queue = SnapshotQueue::new();
        queue.request(preview(), 1.0, at(1));
        queue.request(preview(), 1.0, at(2));

        let resolved = queue.resolve(screenshot(10, 10));
        assert_eq!(resolved.len(), 2);
        assert!(queue.is_empty());

        // A later request is not answered by anything stale.
        queue.request(preview(), 1.0, at(3));
        let resolved = queue.resolve(screenshot(10, 10));
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].1, at(3));
    }

    #[test]
    fn test_scale_is_taken_at_request_time() {
        let mut queue = SnapshotQueue::new();
        queue.request(preview(), 2.0, at(0));

        let resolved = queue.resolve(screenshot(20, 20));
        let image = resolved[0].0.capture().unwrap();
        assert_eq!(image.dimensions(), (12, 8));
    }
}
