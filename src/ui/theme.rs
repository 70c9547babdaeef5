//! Color themes and styling utilities.
//!
//! The theme uses a layered surface system for depth:
//!
//! - `surface[0]`: App background
//! - `surface[1]`: Sidebar and panel backgrounds
//! - `surface[2]`: Main content background
//! - `surface[3]`: Hover states
//! - `surface[4]`: Active/selected states
//! - `surface[5]`: Cards and modals
//!
//! Semantic colors (`accent`, `success`, `error`) are used instead of
//! arbitrary colors so both palettes stay consistent.

use eframe::egui::{self, Color32, FontFamily, FontId, TextStyle};

#[derive(Clone, Debug)]
pub struct RavenTheme {
    pub surface: [Color32; 6],
    pub accent: Color32,
    pub success: Color32,
    pub warning: Color32,
    pub error: Color32,
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,
    pub border_subtle: Color32,
    pub border_medium: Color32,
}

impl RavenTheme {
    pub fn dark() -> Self {
        Self {
            surface: [
                Color32::from_rgb(17, 17, 19),
                Color32::from_rgb(24, 24, 27),
                Color32::from_rgb(30, 30, 34),
                Color32::from_rgb(39, 39, 44),
                Color32::from_rgb(49, 49, 56),
                Color32::from_rgb(36, 36, 41),
            ],
            accent: Color32::from_rgb(66, 153, 225),
            success: Color32::from_rgb(72, 187, 120),
            warning: Color32::from_rgb(236, 201, 75),
            error: Color32::from_rgb(245, 101, 101),
            text_primary: Color32::from_rgb(237, 237, 240),
            text_secondary: Color32::from_rgb(180, 182, 190),
            text_muted: Color32::from_rgb(113, 128, 150),
            border_subtle: Color32::from_rgb(40, 40, 46),
            border_medium: Color32::from_rgb(74, 85, 104),
        }
    }

    pub fn light() -> Self {
        Self {
            surface: [
                Color32::from_rgb(255, 255, 255),
                Color32::from_rgb(247, 250, 252),
                Color32::from_rgb(255, 255, 255),
                Color32::from_rgb(237, 242, 247),
                Color32::from_rgb(226, 232, 240),
                Color32::from_rgb(255, 255, 255),
            ],
            accent: Color32::from_rgb(49, 130, 206),
            success: Color32::from_rgb(56, 161, 105),
            warning: Color32::from_rgb(214, 158, 46),
            error: Color32::from_rgb(229, 62, 62),
            text_primary: Color32::from_rgb(26, 32, 44),
            text_secondary: Color32::from_rgb(74, 85, 104),
            text_muted: Color32::from_rgb(113, 128, 150),
            border_subtle: Color32::from_rgb(237, 242, 247),
            border_medium: Color32::from_rgb(226, 232, 240),
        }
    }

    /// Palette for the context's current visuals.
    pub fn for_ctx(ctx: &egui::Context) -> Self {
        if ctx.style().visuals.dark_mode {
            Self::dark()
        } else {
            Self::light()
        }
    }

    /// Palette by settings name (`"light"` or anything else for dark).
    pub fn named(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }
}

/// Apply visuals and text styles for the named theme.
pub fn apply_app_style(ctx: &egui::Context, theme_name: &str) {
    let visuals = match theme_name {
        "light" => egui::Visuals::light(),
        _ => egui::Visuals::dark(),
    };
    ctx.set_visuals(visuals);

    let mut style = (*ctx.style()).clone();
    style.text_styles = [
        (TextStyle::Small, FontId::new(11.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Button, FontId::new(13.0, FontFamily::Proportional)),
        (TextStyle::Heading, FontId::new(18.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(13.0, FontFamily::Monospace)),
    ]
    .into();
    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(10.0, 5.0);
    ctx.set_style(style);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_theme() {
        assert_eq!(RavenTheme::named("light").surface[0], Color32::WHITE);
        assert_eq!(RavenTheme::named("dark").surface[0], RavenTheme::dark().surface[0]);
        assert_eq!(RavenTheme::named("unknown").accent, RavenTheme::dark().accent);
    }
}
