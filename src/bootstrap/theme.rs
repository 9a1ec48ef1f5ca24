//! Loading-screen markup.
//!
//! Mirrors the overlay the loader script builds, for hosts that render the
//! screen themselves (see [`crate::runtime::CacheManager`]).

use crate::{config::LoadingTheme, embed::bootstrap::LOADING_CSS, utils::html::escape};

/// Id of the overlay element.
pub const LOADING_SCREEN_ID: &str = "loading-screen";

/// Id of the progress text element inside the overlay.
pub const LOADING_TEXT_ID: &str = "loading-text";

/// Id of the retry button rendered by [`error_markup`].
pub const RETRY_BUTTON_ID: &str = "loading-retry";

/// Themed overlay markup with embedded stylesheet.
///
/// `Custom` has no built-in markup and renders like `Gradient`; callers pass
/// their own HTML instead.
pub fn loading_markup(theme: LoadingTheme, app_name: &str, app_icon: &str) -> String {
    let class = match theme {
        LoadingTheme::Minimal => "theme-minimal",
        LoadingTheme::Gradient | LoadingTheme::Custom => "theme-gradient",
    };
    format!(
        concat!(
            r#"<div id="{id}" class="{class}">"#,
            r#"<style>{css}</style>"#,
            r#"<div class="loading-icon">{icon}</div>"#,
            r#"<div class="loading-title">{name}</div>"#,
            r#"<div class="loading-spinner"></div>"#,
            r#"<div class="loading-text" id="{text_id}">Loading {name}...</div>"#,
            "</div>"
        ),
        id = LOADING_SCREEN_ID,
        class = class,
        css = LOADING_CSS,
        icon = escape(app_icon),
        name = escape(app_name),
        text_id = LOADING_TEXT_ID,
    )
}

/// Inner markup of the overlay after an unrecoverable failure.
///
/// `message` is escaped.
pub fn error_markup(message: &str) -> String {
    format!(
        concat!(
            r#"<div class="loading-error">"#,
            r#"<div class="loading-title">Error</div>"#,
            r#"<div class="loading-text" id="{text_id}">{message}</div>"#,
            r#"<button type="button" id="{button}">Retry</button>"#,
            "</div>"
        ),
        text_id = LOADING_TEXT_ID,
        message = escape(message),
        button = RETRY_BUTTON_ID,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_markup() {
        let html = loading_markup(LoadingTheme::Minimal, "Demo <App>", "⚡");
        assert!(html.starts_with(r#"<div id="loading-screen" class="theme-minimal">"#));
        assert!(html.contains("Demo &lt;App&gt;"));
        assert!(html.contains(r#"id="loading-text""#));
        assert!(html.contains("@keyframes bootkit-spin"));
    }

    #[test]
    fn test_error_markup_escapes() {
        let html = error_markup("<script>alert(1)</script>");
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains(r#"id="loading-retry""#));
    }
}
