//! The builder's input type: an ordered `name -> expression-text` map.
//! Insertion order matters, since order-sensitive composites (e.g.
//! `exactly`, `circular`) are built from the source order of their
//! children, so this wraps `indexmap::IndexMap` rather than
//! `HashMap`/`BTreeMap`.

use indexmap::IndexMap;

#[derive(Debug, Clone, Default)]
pub struct Definitions(IndexMap<String, String>);

impl Definitions {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn insert(&mut self, name: impl Into<String>, expression: impl Into<String>) {
        self.0.insert(name.into(), expression.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<(String, String)>> for Definitions {
    fn from(entries: Vec<(String, String)>) -> Self {
        Self(entries.into_iter().collect())
    }
}

impl From<&[(&str, &str)]> for Definitions {
    fn from(entries: &[(&str, &str)]) -> Self {
        Self(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

impl FromIterator<(String, String)> for Definitions {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_insertion_order() {
        let defs: Definitions = [("b", "1"), ("a", "2")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(defs.names().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn from_str_slice() {
        let defs = Definitions::from([("x", "1")].as_slice());
        assert_eq!(defs.len(), 1);
    }
}
