//! Minification of generated scripts and stylesheets.
//!
//! Uses oxc for JavaScript and lightningcss for CSS. Generated files are
//! classic scripts, so top-level names are left alone.

use std::path::Path;

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

/// Minify JavaScript source code.
///
/// `None` if the source does not parse.
pub fn minify_js(source: &str) -> Option<String> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, SourceType::cjs()).parse();
    if !ret.errors.is_empty() {
        return None;
    }
    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::default()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Some(code)
}

/// Minify CSS source code.
pub fn minify_css(source: &str) -> Option<String> {
    let stylesheet = StyleSheet::parse(source, ParserOptions::default()).ok()?;
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .ok()?;
    Some(result.code)
}

/// Minify `content` by the extension of `path` when `enabled`.
///
/// Unknown extensions and sources that fail to minify are returned as-is.
pub fn minify_or_raw(path: &Path, content: String, enabled: bool) -> String {
    if !enabled {
        return content;
    }
    let minified = match path.extension().and_then(|e| e.to_str()) {
        Some("js") => minify_js(&content),
        Some("css") => minify_css(&content),
        _ => return content,
    };
    match minified {
        Some(min) => min,
        None => {
            crate::debug!("build"; "minify failed for {}, keeping source", path.display());
            content
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minify_js() {
        let src = "var greeting = 'hi';\n// comment\nwindow.say = function () { return greeting; };\n";
        let out = minify_js(src).unwrap();
        assert!(out.len() < src.len());
        assert!(!out.contains("comment"));
        assert!(out.contains("window.say"));
    }

    #[test]
    fn test_minify_js_invalid() {
        assert!(minify_js("function (").is_none());
    }

    #[test]
    fn test_minify_css() {
        let out = minify_css("#a {\n  color: #ffffff;\n}\n").unwrap();
        assert_eq!(out, "#a{color:#fff}");
    }

    #[test]
    fn test_minify_or_raw_falls_back() {
        let broken = "function (".to_string();
        assert_eq!(minify_or_raw(Path::new("a.js"), broken.clone(), true), broken);
        assert_eq!(minify_or_raw(Path::new("a.json"), "{ }".into(), true), "{ }");
        assert_eq!(minify_or_raw(Path::new("a.js"), "var  a = 1;".into(), false), "var  a = 1;");
    }
}
