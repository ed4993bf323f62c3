use crate::layout::{LayoutConfig, Margins, Spacing, MAX_CHAOS_LEVEL};
use crate::{colours, Colour, HandwritingError, RenderRequest};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "settings.json";
pub const FONTS_DIR: &str = "fonts";

/// The page texture and the colour shown where it is transparent (or when there is none)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackgroundSettings {
    pub current: Option<PathBuf>,
    pub color: Colour,
}

impl Default for BackgroundSettings {
    fn default() -> Self {
        BackgroundSettings {
            current: None,
            color: colours::PAPER,
        }
    }
}

/// User preferences as persisted in `settings.json`. Loading never fails: a missing or
/// unreadable document gives [Settings::default], and each missing or invalid field
/// falls back to its own default.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub font_size: u32,
    pub text_color: Colour,
    pub text_opacity: f32,
    pub text_spacing: Spacing,
    pub chaos_level: u8,
    pub margins: Margins,
    pub background: BackgroundSettings,
    /// File name of the handwriting font, relative to the fonts directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handwriting_font: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings::from(LayoutConfig::default())
    }
}

impl From<LayoutConfig> for Settings {
    fn from(config: LayoutConfig) -> Self {
        Settings {
            font_size: config.font_size,
            text_color: config.text_colour,
            text_opacity: config.opacity,
            text_spacing: config.spacing,
            chaos_level: config.chaos_level,
            margins: config.margins,
            background: BackgroundSettings::default(),
            handwriting_font: None,
        }
    }
}

impl Settings {
    /// Read settings from `path`, falling back to defaults if it is missing or unreadable
    pub fn load<P: AsRef<Path>>(path: P) -> Settings {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(document) => Settings::from_json(&document),
            Err(err) => {
                tracing::info!(path = %path.display(), %err, "no settings loaded, using defaults");
                Settings::default()
            }
        }
    }

    /// Parse a settings document, field by field
    pub fn from_json(document: &str) -> Settings {
        let root: Value = match serde_json::from_str(document) {
            Ok(root) => root,
            Err(err) => {
                tracing::warn!(%err, "malformed settings document, using defaults");
                return Settings::default();
            }
        };
        let Some(root) = root.as_object() else {
            tracing::warn!("settings document is not an object, using defaults");
            return Settings::default();
        };

        let defaults = Settings::default();
        let doc = Section::new("", Some(root));
        let spacing = doc.section("text_spacing");
        let margins = doc.section("margins");
        let background = doc.section("background");

        Settings {
            font_size: doc.field("font_size", defaults.font_size, |size| *size > 0),
            text_color: doc.field("text_color", defaults.text_color, any),
            text_opacity: doc.field("text_opacity", defaults.text_opacity, |opacity| {
                (0.0..=1.0).contains(opacity)
            }),
            text_spacing: Spacing {
                horizontal: spacing.field("horizontal", defaults.text_spacing.horizontal, any),
                vertical: spacing.field("vertical", defaults.text_spacing.vertical, any),
            },
            chaos_level: doc.field("chaos_level", defaults.chaos_level, |chaos| {
                (1..=MAX_CHAOS_LEVEL).contains(chaos)
            }),
            margins: Margins {
                left: margins.field("left", defaults.margins.left, any),
                right: margins.field("right", defaults.margins.right, any),
                top: margins.field("top", defaults.margins.top, any),
                bottom: margins.field("bottom", defaults.margins.bottom, any),
            },
            background: BackgroundSettings {
                current: background
                    .field::<Option<String>>("current", None, any)
                    .filter(|current| !current.is_empty() && current != "none")
                    .map(PathBuf::from),
                color: background.field("color", defaults.background.color, any),
            },
            handwriting_font: doc
                .field::<Option<String>>("handwriting_font", None, any)
                .filter(|name| !name.is_empty()),
        }
    }

    /// Pretty-printed settings document
    pub fn to_json(&self) -> Result<String, HandwritingError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the settings document to `path`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), HandwritingError> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        Ok(())
    }

    /// Snapshot of the settings that control layout and painting
    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            margins: self.margins,
            spacing: self.text_spacing,
            chaos_level: self.chaos_level,
            font_size: self.font_size,
            text_colour: self.text_color,
            opacity: self.text_opacity,
        }
    }

    /// Everything a render needs, with the handwriting font resolved inside `fonts_dir`
    pub fn render_request(&self, fonts_dir: &Path) -> RenderRequest {
        RenderRequest {
            config: self.layout_config(),
            font: self.handwriting_font.as_ref().map(|name| fonts_dir.join(name)),
            background: self.background.current.clone(),
            background_colour: self.background.color,
        }
    }
}

fn any<T>(_: &T) -> bool {
    true
}

/// One JSON object in the settings document; `name` is only used in log messages
struct Section<'a> {
    name: &'static str,
    map: Option<&'a Map<String, Value>>,
}

impl<'a> Section<'a> {
    fn new(name: &'static str, map: Option<&'a Map<String, Value>>) -> Self {
        Section { name, map }
    }

    fn section(&self, key: &'static str) -> Section<'a> {
        let map = self.map.and_then(|map| map.get(key)).and_then(Value::as_object);
        Section::new(key, map)
    }

    fn field<T: DeserializeOwned>(&self, key: &str, default: T, valid: impl Fn(&T) -> bool) -> T {
        let Some(value) = self.map.and_then(|map| map.get(key)) else {
            return default;
        };

        match T::deserialize(value) {
            Ok(parsed) if valid(&parsed) => parsed,
            Ok(_) => {
                tracing::warn!(section = self.name, key, %value, "setting out of range, using default");
                default
            }
            Err(err) => {
                tracing::warn!(section = self.name, key, %value, %err, "invalid setting, using default");
                default
            }
        }
    }
}

impl Serialize for Colour {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Colour {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Colour::from_hex(&hex).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let settings = Settings::from_json("{}");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.font_size, 36);
        assert_eq!(settings.text_opacity, 1.0);
        assert_eq!(settings.text_spacing, Spacing { horizontal: 0, vertical: 10 });
        assert_eq!(settings.chaos_level, 5);
        assert_eq!(settings.margins, Margins::all(50));
        assert_eq!(settings.background.color.to_hex(), "#faf9de");
        assert_eq!(settings.background.current, None);
    }

    #[test]
    fn malformed_document_gives_defaults() {
        for document in ["", "{ not json", "[1, 2, 3]", "42"] {
            assert_eq!(Settings::from_json(document), Settings::default());
        }
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Settings::load(dir.path().join(SETTINGS_FILE)), Settings::default());
    }

    #[test]
    fn reads_the_documented_keys() {
        let settings = Settings::from_json(
            r##"{
                "font_size": 48,
                "text_color": "#1a2b3c",
                "text_opacity": 0.75,
                "text_spacing": { "horizontal": 3, "vertical": -2 },
                "chaos_level": 9,
                "margins": { "left": 10, "right": 20, "top": 30, "bottom": 40 },
                "background": { "current": "background/paper.png", "color": "#ffffff" },
                "handwriting_font": "Script.ttf"
            }"##,
        );

        assert_eq!(settings.font_size, 48);
        assert_eq!(settings.text_color, Colour::new_rgb_bytes(0x1a, 0x2b, 0x3c));
        assert_eq!(settings.text_opacity, 0.75);
        assert_eq!(settings.text_spacing, Spacing { horizontal: 3, vertical: -2 });
        assert_eq!(settings.chaos_level, 9);
        assert_eq!(settings.margins, Margins::trbl(30, 20, 40, 10));
        assert_eq!(settings.background.current, Some(PathBuf::from("background/paper.png")));
        assert_eq!(settings.background.color, colours::WHITE);
        assert_eq!(settings.handwriting_font.as_deref(), Some("Script.ttf"));
    }

    #[test]
    fn invalid_fields_fall_back_one_by_one() {
        let settings = Settings::from_json(
            r##"{
                "font_size": 0,
                "text_color": "black",
                "text_opacity": 1.5,
                "text_spacing": { "horizontal": "wide", "vertical": 4 },
                "chaos_level": 11,
                "margins": { "left": -5, "right": 12 },
                "background": "paper.png"
            }"##,
        );

        let defaults = Settings::default();
        assert_eq!(settings.font_size, defaults.font_size);
        assert_eq!(settings.text_color, defaults.text_color);
        assert_eq!(settings.text_opacity, defaults.text_opacity);
        assert_eq!(settings.text_spacing, Spacing { horizontal: 0, vertical: 4 });
        assert_eq!(settings.chaos_level, defaults.chaos_level);
        assert_eq!(settings.margins, Margins { left: 50, right: 12, top: 50, bottom: 50 });
        assert_eq!(settings.background, defaults.background);
    }

    #[test]
    fn none_means_no_background() {
        for current in ["null", "\"\"", "\"none\""] {
            let settings = Settings::from_json(&format!(r#"{{ "background": {{ "current": {current} }} }}"#));
            assert_eq!(settings.background.current, None, "current = {current}");
        }
    }

    #[test]
    fn saved_settings_reload_to_the_same_config() {
        let config = LayoutConfig {
            margins: Margins::trbl(12, 34, 56, 78),
            spacing: Spacing {
                horizontal: -1,
                vertical: 22,
            },
            chaos_level: 2,
            font_size: 64,
            text_colour: Colour::new_rgb_bytes(0x12, 0x34, 0x56),
            opacity: 0.5,
        };
        let mut settings = Settings::from(config.clone());
        settings.handwriting_font = Some("Script.ttf".into());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        settings.save(&path).unwrap();
        let reloaded = Settings::load(&path);

        assert_eq!(reloaded, settings);
        assert_eq!(reloaded.layout_config(), config);
    }

    #[test]
    fn saved_document_uses_hex_colours() {
        let json = Settings::default().to_json().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["text_color"], "#000000");
        assert_eq!(value["background"]["color"], "#faf9de");
        assert_eq!(value["background"]["current"], Value::Null);
        assert!(value.get("handwriting_font").is_none());
    }

    #[test]
    fn render_request_resolves_the_font() {
        let settings = Settings {
            handwriting_font: Some("Script.ttf".into()),
            ..Settings::default()
        };
        let request = settings.render_request(Path::new(FONTS_DIR));
        assert_eq!(request.font, Some(Path::new(FONTS_DIR).join("Script.ttf")));
        assert_eq!(request.background_colour, colours::PAPER);
        assert_eq!(request.config, settings.layout_config());
    }
}
