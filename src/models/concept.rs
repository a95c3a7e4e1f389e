use std::fmt;

/// Ordered concept names as returned by the chat model, numbering already stripped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConceptList {
    concepts: Vec<String>,
}

impl ConceptList {
    pub fn new(concepts: Vec<String>) -> Self {
        Self { concepts }
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.concepts.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.concepts
    }

}

impl From<Vec<String>> for ConceptList {
    fn from(concepts: Vec<String>) -> Self {
        Self::new(concepts)
    }
}

impl From<Vec<&str>> for ConceptList {
    fn from(concepts: Vec<&str>) -> Self {
        Self::new(concepts.into_iter().map(String::from).collect())
    }
}

impl<'a> IntoIterator for &'a ConceptList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.concepts.iter()
    }
}

impl fmt::Display for ConceptList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.concepts.join(", "))
    }
}
