//! Template types for typed variable injection.

use std::{cmp::Reverse, marker::PhantomData};

/// A set of values substituted into a template.
pub trait TemplateVars {
    /// `(placeholder, value)` pairs.
    fn pairs(&self) -> Vec<(&'static str, String)>;

    /// Substitute every placeholder in one left-to-right pass.
    ///
    /// Inserted values are never scanned again, so a value may contain
    /// placeholder text verbatim.
    fn apply(&self, content: &str) -> String {
        let pairs = self.pairs();
        let mut out = String::with_capacity(content.len());
        let mut rest = content;

        loop {
            let next = pairs
                .iter()
                .filter(|(key, _)| !key.is_empty())
                .filter_map(|(key, value)| rest.find(key).map(|at| (at, *key, value)))
                .min_by_key(|&(at, key, _)| (at, Reverse(key.len())));

            let Some((at, key, value)) = next else {
                out.push_str(rest);
                return out;
            };
            out.push_str(&rest[..at]);
            out.push_str(value);
            rest = &rest[at + key.len()..];
        }
    }
}

/// Template with typed variable injection
#[derive(Debug, Clone, Copy)]
pub struct Template<V> {
    content: &'static str,
    _marker: PhantomData<V>,
}

impl<V> Template<V> {
    pub const fn new(content: &'static str) -> Self {
        Self {
            content,
            _marker: PhantomData,
        }
    }

    pub const fn content(&self) -> &'static str {
        self.content
    }
}

impl<V: TemplateVars> Template<V> {
    pub fn render(&self, vars: &V) -> String {
        vars.apply(self.content)
    }
}

/// JSON literal of `value`, for substitution into a script.
///
/// Falls back to `null` for values that cannot be represented.
pub fn json_literal<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".into())
}
