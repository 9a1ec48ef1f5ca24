//! `manifest.webmanifest` generation.

use serde::Serialize;

use super::PwaError;
use crate::config::{DisplayMode, IconConfig, Orientation, WebManifestConfig};

/// File name of the web app manifest in the build output.
pub const WEB_MANIFEST_FILE: &str = "manifest.webmanifest";

/// Web app manifest document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebAppManifest<'a> {
    pub name: &'a str,
    pub short_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    pub theme_color: &'a str,
    pub background_color: &'a str,
    pub display: DisplayMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    pub scope: &'a str,
    pub start_url: &'a str,
    pub icons: &'a [IconConfig],
}

impl<'a> WebAppManifest<'a> {
    pub fn from_config(config: &'a WebManifestConfig) -> Self {
        Self {
            name: &config.name,
            short_name: config.short_name.as_deref().unwrap_or(&config.name),
            description: config.description.as_deref(),
            theme_color: &config.theme_color,
            background_color: &config.background_color,
            display: config.display,
            orientation: config.orientation,
            scope: config.scope.as_deref().unwrap_or("/"),
            start_url: config.start_url.as_deref().unwrap_or("/"),
            icons: &config.icons,
        }
    }
}

/// Pretty JSON of the web app manifest.
pub fn render_web_manifest(config: &WebManifestConfig) -> Result<String, PwaError> {
    serde_json::to_string_pretty(&WebAppManifest::from_config(config))
        .map_err(|err| PwaError::Serialize(WEB_MANIFEST_FILE, err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_in() {
        let mut config = WebManifestConfig::default();
        config.name = "Demo".into();

        let json: serde_json::Value =
            serde_json::from_str(&render_web_manifest(&config).unwrap()).unwrap();
        assert_eq!(json["name"], "Demo");
        assert_eq!(json["short_name"], "Demo");
        assert_eq!(json["scope"], "/");
        assert_eq!(json["start_url"], "/");
        assert_eq!(json["display"], "standalone");
        assert_eq!(json["icons"], serde_json::json!([]));
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_explicit_fields() {
        let mut config = WebManifestConfig::default();
        config.short_name = Some("D".into());
        config.display = DisplayMode::MinimalUi;
        config.orientation = Some(Orientation::Portrait);
        config.start_url = Some("/app/".into());
        config.icons.push(IconConfig {
            src: "/icon-192.png".into(),
            sizes: "192x192".into(),
            mime: Some("image/png".into()),
            purpose: None,
        });

        let json = serde_json::to_value(WebAppManifest::from_config(&config)).unwrap();
        assert_eq!(json["short_name"], "D");
        assert_eq!(json["display"], "minimal-ui");
        assert_eq!(json["orientation"], "portrait");
        assert_eq!(json["start_url"], "/app/");
        assert_eq!(json["icons"][0]["type"], "image/png");
        assert!(json["icons"][0].get("purpose").is_none());
    }
}
