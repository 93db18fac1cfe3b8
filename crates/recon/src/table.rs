use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Attribute set
// ---------------------------------------------------------------------------

/// Attribute name → raw value for one feature, in header column order.
///
/// Values are kept verbatim; comparisons are exact string equality.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSet {
    entries: Vec<(String, String)>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, replacing an existing value in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate `(name, value)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = AttributeSet::new();
        for (name, value) in iter {
            attrs.insert(name, value);
        }
        attrs
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// Feature name → attribute set, iterated in first-insertion order.
///
/// Empty keys are never stored. Re-inserting an existing key replaces its
/// attributes but keeps its original position.
#[derive(Debug, Clone, Default)]
pub struct Table {
    attribute_names: Vec<String>,
    order: Vec<String>,
    entries: HashMap<String, AttributeSet>,
}

impl Table {
    /// Empty table whose header declares `attribute_names` (key column excluded).
    pub fn new<I, S>(attribute_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            attribute_names: attribute_names.into_iter().map(Into::into).collect(),
            order: Vec::new(),
            entries: HashMap::new(),
        }
    }

    /// Store `attrs` under `key`. Returns `false` (and stores nothing) when
    /// `key` is empty; the caller reports such rows separately.
    pub fn insert(&mut self, key: impl Into<String>, attrs: AttributeSet) -> bool {
        let key = key.into();
        if key.is_empty() {
            return false;
        }
        if self.entries.insert(key.clone(), attrs).is_none() {
            self.order.push(key);
        }
        true
    }

    pub fn get(&self, key: &str) -> Option<&AttributeSet> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// `(key, attributes)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeSet)> {
        self.order
            .iter()
            .filter_map(|k| self.entries.get(k).map(|attrs| (k.as_str(), attrs)))
    }

    /// Header attribute names, key column excluded.
    pub fn attribute_names(&self) -> &[String] {
        &self.attribute_names
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute_names.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
