//! Priority ordering of the loading sequence.

use indexmap::IndexMap;

/// Priority of anything the table does not know.
pub const DEFAULT_PRIORITY: u32 = 999;

const BUILTIN: [(&str, u32); 4] = [("vendor", 1), ("main", 2), ("app", 3), ("chunk", 4)];

/// Priority lookup table, lower loads first.
///
/// Keys are matched against a logical file name in this order: the exact
/// file name, the name without extension, then the longest key the name
/// starts with (so `chunkA.js` falls into the `chunk` bucket).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityTable {
    entries: IndexMap<String, u32>,
}

impl Default for PriorityTable {
    fn default() -> Self {
        Self {
            entries: BUILTIN
                .iter()
                .map(|&(name, p)| (name.to_string(), p))
                .collect(),
        }
    }
}

impl PriorityTable {
    /// Built-in table with caller overrides layered on top.
    pub fn with_overrides<'a>(overrides: impl IntoIterator<Item = (&'a String, &'a u32)>) -> Self {
        let mut table = Self::default();
        for (name, priority) in overrides {
            table.entries.insert(name.clone(), *priority);
        }
        table
    }

    pub fn priority_of(&self, key: &str) -> u32 {
        let name = key.rsplit('/').next().unwrap_or(key);
        if let Some(&p) = self.entries.get(name) {
            return p;
        }

        let stem = name.rsplit_once('.').map_or(name, |(stem, _)| stem);
        if let Some(&p) = self.entries.get(stem) {
            return p;
        }

        self.entries
            .iter()
            .filter(|(k, _)| !k.is_empty() && stem.starts_with(k.as_str()))
            .max_by_key(|(k, _)| k.len())
            .map_or(DEFAULT_PRIORITY, |(_, &p)| p)
    }

    /// Stable sort of `keys` by priority; ties keep their input order.
    pub fn sort(&self, keys: &mut [String]) {
        keys.sort_by_cached_key(|k| self.priority_of(k));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_ordering() {
        let mut keys = strings(&["chunkA.js", "vendor.js", "app.js"]);
        PriorityTable::default().sort(&mut keys);
        assert_eq!(keys, strings(&["vendor.js", "app.js", "chunkA.js"]));
    }

    #[test]
    fn test_ties_keep_enumeration_order() {
        let mut keys = strings(&["/assets/z.js", "/assets/main.js", "/assets/a.js", "/b.js"]);
        PriorityTable::default().sort(&mut keys);
        assert_eq!(
            keys,
            strings(&["/assets/main.js", "/assets/z.js", "/assets/a.js", "/b.js"])
        );
    }

    #[test]
    fn test_lookup_order() {
        let mut overrides = IndexMap::new();
        overrides.insert("vendor.js".to_string(), 7);
        overrides.insert("chunk-ui".to_string(), 5);
        let table = PriorityTable::with_overrides(&overrides);

        assert_eq!(table.priority_of("/assets/vendor.js"), 7);
        assert_eq!(table.priority_of("vendor.css"), 1);
        assert_eq!(table.priority_of("chunk-ui-forms.js"), 5);
        assert_eq!(table.priority_of("chunk-data.js"), 4);
        assert_eq!(table.priority_of("index.js"), DEFAULT_PRIORITY);
    }
}
