use anyhow::Result;
use eframe::egui;
use std::path::Path;
use tracing_subscriber::EnvFilter;

mod config;
mod contact;
mod diagnostics;
mod export;
mod loader;
mod models;
mod state;
mod ui;

use config::AppConfig;
use ui::RegistryApp;

/// Well-known locations of fonts with Japanese glyphs; egui's bundled fonts have none.
const CJK_FONT_CANDIDATES: &[&str] = &[
    "C:\\Windows\\Fonts\\meiryo.ttc",
    "C:\\Windows\\Fonts\\YuGothM.ttc",
    "C:\\Windows\\Fonts\\msgothic.ttc",
    "/System/Library/Fonts/ヒラギノ角ゴシック W3.ttc",
    "/System/Library/Fonts/Hiragino Sans GB.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
];

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });
    for issue in config.validate() {
        tracing::warn!("Config: {}", issue);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("グリーンNH3レジストリ")
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_icon(build_icon()),
        centered: true,
        ..Default::default()
    };

    eframe::run_native(
        "Green NH3 Registry",
        options,
        Box::new(move |cc| {
            configure_fonts(&cc.egui_ctx, config.cjk_font_path.as_deref());
            Ok(Box::new(RegistryApp::new(cc, config)))
        }),
    ).map_err(|e| anyhow::anyhow!("Failed to run application: {}", e))
}

/// Green rounded square with a white bar, drawn at startup.
fn build_icon() -> egui::IconData {
    const SIZE: u32 = 64;
    let green = image::Rgba([27, 128, 76, 255]);
    let white = image::Rgba([255, 255, 255, 255]);
    let clear = image::Rgba([0, 0, 0, 0]);

    let img = image::RgbaImage::from_fn(SIZE, SIZE, |x, y| {
        let corner = |v: u32| v.min(SIZE - 1 - v);
        if corner(x) + corner(y) < 6 {
            clear
        } else if (20..44).contains(&x) && (28..36).contains(&y) {
            white
        } else {
            green
        }
    });

    let (width, height) = img.dimensions();
    egui::IconData {
        rgba: img.into_raw(),
        width,
        height,
    }
}

fn configure_fonts(ctx: &egui::Context, configured: Option<&str>) {
    let candidates = configured.into_iter().chain(CJK_FONT_CANDIDATES.iter().copied());

    let loaded = candidates
        .filter(|path| Path::new(path).is_file())
        .find_map(|path| match std::fs::read(path) {
            Ok(bytes) => Some((path, bytes)),
            Err(e) => {
                tracing::warn!("Failed to read font {}: {}", path, e);
                None
            }
        });

    let mut fonts = egui::FontDefinitions::default();
    match loaded {
        Some((path, bytes)) => {
            tracing::info!(font = path, "Using CJK font");
            fonts
                .font_data
                .insert("cjk".to_owned(), egui::FontData::from_owned(bytes));
            for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
                fonts
                    .families
                    .entry(family)
                    .or_default()
                    .push("cjk".to_owned());
            }
            ctx.set_fonts(fonts);
        }
        None => {
            tracing::warn!("No CJK font found, Japanese labels may not render");
        }
    }

    let mut style = (*ctx.style()).clone();
    style.text_styles.insert(
        egui::TextStyle::Body,
        egui::FontId::proportional(14.0),
    );
    style.text_styles.insert(
        egui::TextStyle::Button,
        egui::FontId::proportional(14.0),
    );
    style.text_styles.insert(
        egui::TextStyle::Heading,
        egui::FontId::proportional(20.0),
    );
    ctx.set_style(style);
}
