use eframe::egui;
use crate::config::Theme;

/// Accent used for primary buttons.
pub const ACCENT: egui::Color32 = egui::Color32::from_rgb(27, 128, 76);

pub struct PanelColors {
    pub bar: egui::Color32,
    pub content: egui::Color32,
    pub border: egui::Color32,
    pub muted_text: egui::Color32,
    pub drop_zone: egui::Color32,
}

pub fn apply_theme(ctx: &egui::Context, theme: &Theme) {
    match theme {
        Theme::Dark => apply_dark_theme(ctx),
        Theme::Light => apply_light_theme(ctx),
    }
}

pub fn panel_colors(theme: &Theme) -> PanelColors {
    match theme {
        Theme::Dark => PanelColors {
            bar: egui::Color32::from_rgb(24, 28, 26),
            content: egui::Color32::from_rgb(18, 20, 19),
            border: egui::Color32::from_rgb(60, 66, 63),
            muted_text: egui::Color32::from_rgb(150, 155, 152),
            drop_zone: egui::Color32::from_rgb(95, 104, 99),
        },
        Theme::Light => PanelColors {
            bar: egui::Color32::from_rgb(243, 245, 244),
            content: egui::Color32::WHITE,
            border: egui::Color32::from_rgb(218, 222, 220),
            muted_text: egui::Color32::from_rgb(110, 114, 112),
            drop_zone: egui::Color32::from_rgb(200, 205, 202),
        },
    }
}

fn apply_dark_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    style.visuals = egui::Visuals::dark();
    style.visuals.override_text_color = Some(egui::Color32::from_rgb(220, 224, 222));

    // Window and panel backgrounds
    style.visuals.window_fill = egui::Color32::from_rgb(32, 36, 34);
    style.visuals.panel_fill = egui::Color32::from_rgb(18, 20, 19);
    style.visuals.faint_bg_color = egui::Color32::from_rgb(40, 45, 42);

    // Button styling
    style.visuals.widgets.inactive.weak_bg_fill = egui::Color32::from_rgb(50, 56, 53);
    style.visuals.widgets.inactive.bg_fill = egui::Color32::from_rgb(60, 66, 63);
    style.visuals.widgets.hovered.bg_fill = egui::Color32::from_rgb(70, 78, 74);
    style.visuals.widgets.active.bg_fill = ACCENT;

    style.visuals.selection.bg_fill = ACCENT;

    apply_spacing(&mut style);
    ctx.set_style(style);
}

fn apply_light_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    style.visuals = egui::Visuals::light();
    style.visuals.override_text_color = Some(egui::Color32::from_rgb(33, 37, 35));

    // Window and panel backgrounds
    style.visuals.window_fill = egui::Color32::from_rgb(250, 251, 250);
    style.visuals.panel_fill = egui::Color32::WHITE;
    style.visuals.faint_bg_color = egui::Color32::from_rgb(242, 245, 243);

    // Button styling
    style.visuals.widgets.inactive.weak_bg_fill = egui::Color32::from_rgb(232, 236, 234);
    style.visuals.widgets.inactive.bg_fill = egui::Color32::from_rgb(222, 227, 224);
    style.visuals.widgets.hovered.bg_fill = egui::Color32::from_rgb(210, 217, 213);
    style.visuals.widgets.active.bg_fill = ACCENT;

    style.visuals.selection.bg_fill = egui::Color32::from_rgba_unmultiplied(27, 128, 76, 60);

    apply_spacing(&mut style);
    ctx.set_style(style);
}

fn apply_spacing(style: &mut egui::Style) {
    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(10.0, 5.0);
    style.spacing.indent = 20.0;
}
