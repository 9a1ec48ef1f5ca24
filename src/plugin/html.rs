//! `index.html` rewriting.

use std::sync::LazyLock;

use regex::Regex;

use crate::utils::html::escape_attr;

/// Dev-server module entries (`<script type="module" src="/src/main.tsx">`).
static DEV_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"[ \t]*<script[^>]*type=["']module["'][^>]*src=["']/src/[^"']*["'][^>]*>[ \t\r\n]*</script>[ \t]*\r?\n?"#,
    )
    .unwrap()
});

/// A tag to place in `<head>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadTag {
    Script { src: String },
    ManifestLink { href: String },
}

impl HeadTag {
    pub fn script(src: impl Into<String>) -> Self {
        Self::Script { src: src.into() }
    }

    pub fn manifest_link(href: impl Into<String>) -> Self {
        Self::ManifestLink { href: href.into() }
    }

    pub fn render(&self) -> String {
        match self {
            Self::Script { src } => format!(r#"<script src="{}"></script>"#, escape_attr(src)),
            Self::ManifestLink { href } => {
                format!(r#"<link rel="manifest" href="{}">"#, escape_attr(href))
            }
        }
    }

    /// Whether `html` already references what this tag loads.
    fn is_present(&self, html: &str) -> bool {
        match self {
            Self::Script { src } => {
                let src = escape_attr(src);
                html.contains(&format!("src=\"{src}\"")) || html.contains(&format!("src='{src}'"))
            }
            Self::ManifestLink { .. } => {
                html.contains("rel=\"manifest\"") || html.contains("rel='manifest'")
            }
        }
    }
}

/// Remove dev-server module entries.
pub fn strip_dev_entries(html: &str) -> String {
    DEV_ENTRY.replace_all(html, "").into_owned()
}

/// Insert `tags` before `</head>`, or at the top when there is no head.
///
/// Tags whose target is already referenced are skipped, so running this on
/// its own output changes nothing.
pub fn inject_head_tags(html: &str, tags: &[HeadTag]) -> String {
    let missing: Vec<String> = tags
        .iter()
        .filter(|tag| !tag.is_present(html))
        .map(HeadTag::render)
        .collect();
    if missing.is_empty() {
        return html.to_string();
    }

    match html.find("</head>") {
        Some(pos) => {
            let mut out = String::with_capacity(html.len() + 64 * missing.len());
            out.push_str(&html[..pos]);
            for tag in &missing {
                out.push_str("  ");
                out.push_str(tag);
                out.push('\n');
            }
            out.push_str(&html[pos..]);
            out
        }
        None => {
            let mut out = missing.join("\n");
            out.push('\n');
            out.push_str(html);
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "<html>\n<head>\n  <title>x</title>\n</head>\n<body></body>\n</html>\n";

    #[test]
    fn test_inject_before_head_close() {
        let out = inject_head_tags(PAGE, &[HeadTag::script("/AppBootstrap.js")]);
        assert!(out.contains("  <script src=\"/AppBootstrap.js\"></script>\n</head>"));
    }

    #[test]
    fn test_inject_is_idempotent() {
        let tags = [
            HeadTag::script("/AppBootstrap.js"),
            HeadTag::script("/registerSW.js"),
            HeadTag::manifest_link("/manifest.webmanifest"),
        ];
        let once = inject_head_tags(PAGE, &tags);
        let twice = inject_head_tags(&once, &tags);
        assert_eq!(once, twice);
        assert_eq!(twice.matches("AppBootstrap.js").count(), 1);
        assert_eq!(twice.matches("registerSW.js").count(), 1);
    }

    #[test]
    fn test_inject_without_head() {
        let out = inject_head_tags("<div id=\"root\"></div>", &[HeadTag::script("/a.js")]);
        assert_eq!(out, "<script src=\"/a.js\"></script>\n<div id=\"root\"></div>");
    }

    #[test]
    fn test_strip_dev_entries() {
        let html = "<body>\n  <div id=\"root\"></div>\n  <script type=\"module\" src=\"/src/main.tsx\"></script>\n</body>";
        assert_eq!(strip_dev_entries(html), "<body>\n  <div id=\"root\"></div>\n</body>");

        let keep = "<script type=\"module\" src=\"/assets/index.js\"></script>";
        assert_eq!(strip_dev_entries(keep), keep);
    }
}
