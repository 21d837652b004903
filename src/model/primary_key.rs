use crate::core::Value;
use indexmap::IndexMap;

/// Insertion-ordered mapping from primary-key field name to its current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrimaryKeySet {
    keys: IndexMap<&'static str, Value>,
}

impl PrimaryKeySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &'static str, value: Value) {
        self.keys.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.keys.get(name)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.keys.keys().copied()
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.keys.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.keys.iter().map(|(name, value)| (*name, value))
    }
}

impl std::fmt::Display for PrimaryKeySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}
