use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;
use crate::models::Certificate;
use super::{ExportError, ExportFormat, Exporter, Result};

pub const A4_WIDTH_MM: f64 = 210.0;
pub const A4_HEIGHT_MM: f64 = 297.0;

const PT_PER_MM: f64 = 72.0 / 25.4;

/// Page and image geometry, in millimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub page_width_mm: f64,
    pub page_height_mm: f64,
    pub image_width_mm: f64,
    pub image_height_mm: f64,
}

impl PageLayout {
    /// Image stretched to the page width; height keeps the aspect ratio.
    pub fn for_image(width_px: u32, height_px: u32) -> Self {
        let image_width_mm = A4_WIDTH_MM;
        let image_height_mm = height_px as f64 * image_width_mm / width_px as f64;

        Self {
            page_width_mm: A4_WIDTH_MM,
            page_height_mm: A4_HEIGHT_MM,
            image_width_mm,
            image_height_mm,
        }
    }
}

/// Single-page PDF of the rasterized preview, assembled by hand as PDF 1.4:
/// one portrait A4 page holding one JPEG image XObject (`DCTDecode`).
pub struct PdfExporter {
    image: RgbaImage,
}

impl PdfExporter {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn layout(&self) -> PageLayout {
        let (width, height) = self.image.dimensions();
        PageLayout::for_image(width, height)
    }
}

impl Exporter for PdfExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::PaginatedDocument
    }

    // The document is a picture of the rendered table, not of the records.
    fn render(&self, _records: &[Certificate]) -> Result<Vec<u8>> {
        let (width, height) = self.image.dimensions();
        if width == 0 || height == 0 {
            return Err(ExportError::EmptySnapshot { width, height });
        }

        let rgb = DynamicImage::ImageRgba8(self.image.clone()).to_rgb8();
        let mut jpeg = Vec::new();
        DynamicImage::ImageRgb8(rgb).write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)?;

        Ok(build_single_image_pdf(&jpeg, width, height, &self.layout()))
    }
}

fn build_single_image_pdf(jpeg: &[u8], width_px: u32, height_px: u32, layout: &PageLayout) -> Vec<u8> {
    let page_w = layout.page_width_mm * PT_PER_MM;
    let page_h = layout.page_height_mm * PT_PER_MM;
    let image_w = layout.image_width_mm * PT_PER_MM;
    let image_h = layout.image_height_mm * PT_PER_MM;

    // PDF origin is bottom-left; pin the image to the top edge.
    let content = format!(
        "q\n{image_w:.2} 0 0 {image_h:.2} 0 {:.2} cm\n/Im0 Do\nQ\n",
        page_h - image_h
    );

    let mut pdf = PdfBuffer::new();

    pdf.object(b"<< /Type /Catalog /Pages 2 0 R >>");
    pdf.object(b"<< /Type /Pages /Kids [3 0 R] /Count 1 >>");
    pdf.object(
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {page_w:.2} {page_h:.2}] \
             /Resources << /XObject << /Im0 5 0 R >> >> /Contents 4 0 R >>"
        )
        .as_bytes(),
    );
    pdf.stream(&format!("<< /Length {} >>", content.len()), content.as_bytes());
    pdf.stream(
        &format!(
            "<< /Type /XObject /Subtype /Image /Width {width_px} /Height {height_px} \
             /ColorSpace /DeviceRGB /BitsPerComponent 8 /Filter /DCTDecode /Length {} >>",
            jpeg.len()
        ),
        jpeg,
    );
    pdf.object(b"<< /Producer (green-nh3-registry) >>");

    pdf.finish(1, 6)
}

/// Byte buffer that tracks object offsets for the xref table.
struct PdfBuffer {
    bytes: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfBuffer {
    fn new() -> Self {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");
        Self {
            bytes,
            offsets: Vec::new(),
        }
    }

    fn begin(&mut self) {
        self.offsets.push(self.bytes.len());
        let number = self.offsets.len();
        self.bytes.extend_from_slice(format!("{number} 0 obj\n").as_bytes());
    }

    fn object(&mut self, body: &[u8]) {
        self.begin();
        self.bytes.extend_from_slice(body);
        self.bytes.extend_from_slice(b"\nendobj\n");
    }

    fn stream(&mut self, dict: &str, data: &[u8]) {
        self.begin();
        self.bytes.extend_from_slice(dict.as_bytes());
        self.bytes.extend_from_slice(b"\nstream\n");
        self.bytes.extend_from_slice(data);
        self.bytes.extend_from_slice(b"\nendstream\nendobj\n");
    }

    fn finish(mut self, root: usize, info: usize) -> Vec<u8> {
        let xref_offset = self.bytes.len();
        let size = self.offsets.len() + 1;

        let mut xref = format!("xref\n0 {size}\n0000000000 65535 f \n");
        for offset in &self.offsets {
            xref.push_str(&format!("{offset:010} 00000 n \n"));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {size} /Root {root} 0 R /Info {info} 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n"
        ));

        self.bytes.extend_from_slice(xref.as_bytes());
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(haystack: &[u8], needle: &[u8]) -> usize {
        haystack.windows(needle.len()).filter(|w| *w == needle).count()
    }

    fn white(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, image::Rgba([255, 255, 255, 255]))
    }

    #[test]
    fn test_layout_keeps_aspect_ratio() {
        let layout = PageLayout::for_image(400, 100);
        assert_eq!(layout.page_width_mm, 210.0);
        assert_eq!(layout.page_height_mm, 297.0);
        assert_eq!(layout.image_width_mm, 210.0);
        assert!((layout.image_height_mm - 52.5).abs() < 1e-9);

        let tall = PageLayout::for_image(100, 300);
        assert!((tall.image_height_mm - 630.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_a4_page() {
        let bytes = PdfExporter::new(white(400, 100)).render(&[]).unwrap();

        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(bytes.ends_with(b"%%EOF\n"));
        assert_eq!(count(&bytes, b"/Type /Page "), 1);
        assert_eq!(count(&bytes, b"/Count 1"), 1);
        assert_eq!(count(&bytes, b"/MediaBox [0 0 595.28 841.89]"), 1);
        assert_eq!(count(&bytes, b"/Width 400 /Height 100"), 1);
        assert_eq!(count(&bytes, b"/Im0 Do"), 1);
    }

    #[test]
    fn test_image_pinned_to_top() {
        let bytes = PdfExporter::new(white(400, 100)).render(&[]).unwrap();
        // 52.5 mm tall image on a 297 mm page.
        assert_eq!(count(&bytes, b"595.28 0 0 148.82 0 693.07 cm"), 1);
    }

    #[test]
    fn test_xref_points_at_objects() {
        let bytes = PdfExporter::new(white(8, 8)).render(&[]).unwrap();

        let marker = b"startxref\n";
        let tail = bytes
            .windows(marker.len())
            .rposition(|w| w == marker)
            .map(|pos| pos + marker.len())
            .unwrap();
        let xref_at: usize = std::str::from_utf8(&bytes[tail..])
            .unwrap()
            .lines()
            .next()
            .unwrap()
            .parse()
            .unwrap();
        assert!(bytes[xref_at..].starts_with(b"xref\n0 7\n"));

        // The xref section and trailer are plain ASCII.
        let xref = std::str::from_utf8(&bytes[xref_at..]).unwrap();
        let offset: usize = xref.lines().nth(3).unwrap()[..10].parse().unwrap();
        assert!(bytes[offset..].starts_with(b"1 0 obj"));
    }

    #[test]
    fn test_empty_image_is_rejected() {
        let result = PdfExporter::new(RgbaImage::new(0, 0)).render(&[]);
        assert!(matches!(result, Err(ExportError::EmptySnapshot { .. })));
    }
}
