//! Case-insensitive property name index

use rustc_hash::FxHashMap;

/// Maps lower-cased property names to their declared spelling.
///
/// When two declared names differ only by case, the later one wins.
#[derive(Debug, Clone, Default)]
pub struct AccessIndex {
    by_lower: FxHashMap<String, String>,
}

impl AccessIndex {
    /// Build the index from declared names
    pub fn build<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let by_lower = names
            .into_iter()
            .map(|name| (name.to_lowercase(), name.to_string()))
            .collect();
        Self { by_lower }
    }

    /// Canonical spelling for any case variant of a declared name
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.by_lower.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Number of indexed names
    pub fn len(&self) -> usize {
        self.by_lower.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.by_lower.is_empty()
    }
}
