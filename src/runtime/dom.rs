//! The slice of the DOM the runtime touches.

use indexmap::IndexMap;
use parking_lot::Mutex;

use crate::utils::html::element_ids;

/// Document operations, addressed by element id.
pub trait Document: Send + Sync {
    fn element_exists(&self, id: &str) -> bool;

    /// Insert `html` at the start of `<body>`.
    fn insert_html(&self, html: &str);

    /// Replace the children of `id`. `false` if there is no such element.
    fn set_inner_html(&self, id: &str, html: &str) -> bool;

    fn set_text(&self, id: &str, text: &str) -> bool;

    fn set_style(&self, id: &str, property: &str, value: &str) -> bool;

    fn remove_element(&self, id: &str) -> bool;

    /// Whether `root_id` has rendered children carrying one of `classes`.
    fn has_rendered_content(&self, root_id: &str, classes: &[&str]) -> bool;

    /// Full page reload.
    fn reload(&self);
}

/// One element of a [`MemoryDocument`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryElement {
    pub html: String,
    pub text: Option<String>,
    pub style: IndexMap<String, String>,
    /// Classes of rendered child elements.
    pub child_classes: Vec<String>,
}

#[derive(Debug, Default)]
struct MemoryState {
    elements: IndexMap<String, MemoryElement>,
    reloads: usize,
}

/// In-memory [`Document`] for headless hosts and tests.
///
/// Inserted markup registers an element under the id of its outermost
/// element; nested ids are registered as plain elements too.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    state: Mutex<MemoryState>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an empty element.
    pub fn add_element(&self, id: &str) {
        self.state
            .lock()
            .elements
            .entry(id.to_string())
            .or_default();
    }

    /// Simulate the framework rendering children with `classes` into `id`.
    pub fn render_children(&self, id: &str, classes: &[&str]) {
        let mut state = self.state.lock();
        let element = state.elements.entry(id.to_string()).or_default();
        element
            .child_classes
            .extend(classes.iter().map(|c| c.to_string()));
    }

    pub fn element(&self, id: &str) -> Option<MemoryElement> {
        self.state.lock().elements.get(id).cloned()
    }

    pub fn reload_count(&self) -> usize {
        self.state.lock().reloads
    }

    /// Number of registered elements.
    pub fn element_count(&self) -> usize {
        self.state.lock().elements.len()
    }
}

impl Document for MemoryDocument {
    fn element_exists(&self, id: &str) -> bool {
        self.state.lock().elements.contains_key(id)
    }

    fn insert_html(&self, html: &str) {
        let ids: Vec<&str> = element_ids(html).collect();
        let mut state = self.state.lock();
        for (idx, id) in ids.into_iter().enumerate() {
            let element = state.elements.entry(id.to_string()).or_default();
            if idx == 0 {
                element.html = html.to_string();
            }
        }
    }

    fn set_inner_html(&self, id: &str, html: &str) -> bool {
        let ids: Vec<&str> = element_ids(html).collect();
        let mut state = self.state.lock();
        let Some(element) = state.elements.get_mut(id) else {
            return false;
        };
        element.html = html.to_string();
        element.text = None;
        for nested in ids {
            state.elements.entry(nested.to_string()).or_default();
        }
        true
    }

    fn set_text(&self, id: &str, text: &str) -> bool {
        match self.state.lock().elements.get_mut(id) {
            Some(element) => {
                element.text = Some(text.to_string());
                true
            }
            None => false,
        }
    }

    fn set_style(&self, id: &str, property: &str, value: &str) -> bool {
        match self.state.lock().elements.get_mut(id) {
            Some(element) => {
                element
                    .style
                    .insert(property.to_string(), value.to_string());
                true
            }
            None => false,
        }
    }

    fn remove_element(&self, id: &str) -> bool {
        self.state.lock().elements.shift_remove(id).is_some()
    }

    fn has_rendered_content(&self, root_id: &str, classes: &[&str]) -> bool {
        let state = self.state.lock();
        state.elements.get(root_id).is_some_and(|root| {
            root.child_classes
                .iter()
                .any(|c| classes.contains(&c.as_str()))
        })
    }

    fn reload(&self) {
        self.state.lock().reloads += 1;
    }
}
