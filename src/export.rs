//! Deterministic text artifacts generated from a settings snapshot.
//!
//! Everything here is a pure function of the snapshot (plus explicit
//! dimensions or a uniqueness stamp), so the host test suite covers it;
//! the browser layer only wraps the results in blobs and downloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::settings::{AnimationUpdate, ColorUpdate, Settings};

/// The inline variant shown in the copy-CSS flow: fixed 8s cycle.
pub fn inline_css(settings: &Settings) -> String {
    let [c1, c2, c3, c4] = settings.colors.as_array();
    format!(
        "background: linear-gradient(45deg, {c1}, {c2}, {c3}, {c4});\n\
         background-size: 400% 400%;\n\
         animation: gradientShift 8s ease infinite;\n\
         \n\
         @keyframes gradientShift {{\n\
         \x20   0% {{ background-position: 0% 50%; }}\n\
         \x20   50% {{ background-position: 100% 50%; }}\n\
         \x20   100% {{ background-position: 0% 50%; }}\n\
         }}"
    )
}

/// The downloadable stylesheet: animation duration scales with speed,
/// floored at 4 seconds, plus static/radial/conic helper classes.
pub fn stylesheet(settings: &Settings) -> String {
    let [c1, c2, c3, c4] = settings.colors.as_array();
    let duration = (12.0 / settings.animation.speed).max(4.0);
    format!(
        r#"/* Gradient Background Styles */
.gradient-background {{
    background: linear-gradient(-45deg, {c1}, {c2}, {c3}, {c4});
    background-size: 400% 400%;
    animation: gradientShift {duration}s ease infinite;
}}

.gradient-background-static {{
    background: linear-gradient(-45deg, {c1}, {c2}, {c3}, {c4});
}}

.gradient-radial {{
    background: radial-gradient(circle at 30% 20%, {c1}, {c2}, {c3}, {c4});
}}

.gradient-conic {{
    background: conic-gradient(from 0deg at 50% 50%, {c1}, {c2}, {c3}, {c4}, {c1});
}}

@keyframes gradientShift {{
    0% {{
        background-position: 0% 50%;
    }}
    50% {{
        background-position: 100% 50%;
    }}
    100% {{
        background-position: 0% 50%;
    }}
}}

/* Usage Examples */
/*
    Apply to body for full background:
    body {{
        min-height: 100vh;
    }}

    Apply to container:
    .container {{
        padding: 2rem;
    }}
*/"#
    )
}

pub const SVG_DEFAULT_WIDTH: u32 = 800;
pub const SVG_DEFAULT_HEIGHT: u32 = 600;

/// Standalone SVG document: radial gradient with stops at 0/33/66/100%.
pub fn svg_document(settings: &Settings, width: u32, height: u32) -> String {
    let [c1, c2, c3, c4] = settings.colors.as_array();
    format!(
        r#"<svg width="{width}" height="{height}" xmlns="http://www.w3.org/2000/svg">
    <defs>
        <radialGradient id="grad1" cx="20%" cy="20%" r="80%">
            <stop offset="0%" style="stop-color:{c1};stop-opacity:1" />
            <stop offset="33%" style="stop-color:{c2};stop-opacity:1" />
            <stop offset="66%" style="stop-color:{c3};stop-opacity:1" />
            <stop offset="100%" style="stop-color:{c4};stop-opacity:1" />
        </radialGradient>
    </defs>
    <rect width="100%" height="100%" fill="url(#grad1)" />
</svg>"#
    )
}

/// Self-contained HTML fragment safe to paste into arbitrary host pages.
/// `stamp` (the caller's clock reading) suffixes the class and keyframe
/// names so repeated embeds never collide.
pub fn embed_snippet(settings: &Settings, stamp: u64) -> String {
    let [c1, c2, c3, c4] = settings.colors.as_array();
    let id = format!("gradient-{stamp}");
    format!(
        r#"<!-- Gradient Background -->
<style>
.{id} {{
    background: linear-gradient(45deg, {c1}, {c2}, {c3}, {c4});
    background-size: 400% 400%;
    animation: gradientShift-{id} 8s ease infinite;
}}

@keyframes gradientShift-{id} {{
    0% {{ background-position: 0% 50%; }}
    50% {{ background-position: 100% 50%; }}
    100% {{ background-position: 0% 50%; }}
}}
</style>

<div class="{id}">
    <!-- Your content here -->
</div>"#
    )
}

pub const SETTINGS_FILE_VERSION: &str = "1.0";

#[derive(Debug, Serialize, Deserialize)]
pub struct SettingsFile {
    pub version: String,
    pub timestamp: String,
    pub settings: Settings,
}

/// Versioned settings envelope for file export. `timestamp` is the
/// caller-supplied ISO-8601 string.
pub fn settings_file(settings: &Settings, timestamp: &str) -> String {
    let file = SettingsFile {
        version: SETTINGS_FILE_VERSION.to_owned(),
        timestamp: timestamp.to_owned(),
        settings: settings.clone(),
    };
    serde_json::to_string_pretty(&file).unwrap_or_default()
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("settings file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("settings file has no \"settings\" key")]
    MissingSettings,
}

/// What an imported file contributes: colors and animation merge through
/// the regular update paths (preset attribution is untouched).
#[derive(Debug, Default, PartialEq)]
pub struct SettingsImport {
    pub colors: ColorUpdate,
    pub animation: AnimationUpdate,
}

#[derive(Deserialize)]
struct ImportedBody {
    #[serde(default)]
    colors: ColorUpdate,
    #[serde(default)]
    animation: AnimationUpdate,
}

/// Validate and extract an exported settings file. Absent fields inside
/// the `settings` object are tolerated; a missing `settings` key rejects
/// the file outright.
pub fn parse_settings_file(json: &str) -> Result<SettingsImport, ImportError> {
    let value: Value = serde_json::from_str(json)?;
    let body = value
        .as_object()
        .and_then(|o| o.get("settings"))
        .ok_or(ImportError::MissingSettings)?;
    let body: ImportedBody = serde_json::from_value(body.clone())?;
    Ok(SettingsImport { colors: body.colors, animation: body.animation })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::settings::{SettingsStore, Settings};

    fn ordered_positions(haystack: &str, settings: &Settings) -> Vec<usize> {
        settings
            .colors
            .as_array()
            .iter()
            .map(|c| haystack.find(&c.to_string()).expect("color present"))
            .collect()
    }

    #[test]
    fn inline_css_lists_all_four_colors_in_order() {
        let settings = Settings::default();
        let css = inline_css(&settings);
        let positions = ordered_positions(&css, &settings);
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
        assert!(css.contains("gradientShift 8s ease infinite"));
    }

    #[test]
    fn stylesheet_duration_scales_with_speed() {
        let store = SettingsStore::new();
        assert!(stylesheet(&store.settings()).contains("gradientShift 12s"));

        store.update_animation(AnimationUpdate { speed: Some(3.0), ..Default::default() });
        assert!(stylesheet(&store.settings()).contains("gradientShift 4s"));

        store.update_animation(AnimationUpdate { speed: Some(0.5), ..Default::default() });
        assert!(stylesheet(&store.settings()).contains("gradientShift 24s"));
    }

    #[test]
    fn stylesheet_carries_helper_classes() {
        let css = stylesheet(&Settings::default());
        for class in [".gradient-background", ".gradient-background-static", ".gradient-radial", ".gradient-conic"] {
            assert!(css.contains(class), "missing {class}");
        }
    }

    #[test]
    fn svg_document_has_dimensions_and_stops() {
        let settings = Settings::default();
        let svg = svg_document(&settings, 1920, 1080);
        assert!(svg.starts_with(r#"<svg width="1920" height="1080""#));
        for offset in ["0%", "33%", "66%", "100%"] {
            assert!(svg.contains(&format!(r#"<stop offset="{offset}""#)));
        }
        let positions = ordered_positions(&svg, &settings);
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn embed_snippet_is_collision_free_per_stamp() {
        let settings = Settings::default();
        let a = embed_snippet(&settings, 1700000000001);
        let b = embed_snippet(&settings, 1700000000002);
        assert!(a.contains("gradient-1700000000001"));
        assert!(a.contains("gradientShift-gradient-1700000000001"));
        assert_ne!(a, b);
    }

    #[test]
    fn settings_file_round_trips() {
        let store = SettingsStore::new();
        store.update_colors(ColorUpdate { color1: Some(Rgb::new(9, 9, 9)), ..Default::default() });
        let json = settings_file(&store.settings(), "2026-08-06T12:00:00.000Z");
        assert!(json.contains(r#""version": "1.0""#));

        let import = parse_settings_file(&json).unwrap();
        assert_eq!(import.colors.color1, Some(Rgb::new(9, 9, 9)));
        assert_eq!(import.animation.speed, Some(1.0));
    }

    #[test]
    fn import_rejects_missing_settings_key() {
        assert!(matches!(
            parse_settings_file(r#"{"version":"1.0","timestamp":"t"}"#),
            Err(ImportError::MissingSettings)
        ));
        assert!(matches!(parse_settings_file("not json"), Err(ImportError::Json(_))));
        assert!(matches!(parse_settings_file("[1,2]"), Err(ImportError::MissingSettings)));
    }

    #[test]
    fn import_tolerates_partial_body() {
        let import = parse_settings_file(r#"{"settings":{"animation":{"speed":2.0}}}"#).unwrap();
        assert_eq!(import.colors, ColorUpdate::default());
        assert_eq!(import.animation.speed, Some(2.0));
        assert_eq!(import.animation.scale, None);
    }
}
