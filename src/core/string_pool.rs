use serde::{Deserialize, Serialize};

/// Interned strings of one history file.
///
/// Records refer to entries by 1-based index. Index 0 means "no entry", and
/// negative or out-of-range indices resolve to nothing instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringPool {
    strings: Vec<String>,
}

impl StringPool {
    pub fn new(strings: Vec<String>) -> Self {
        StringPool { strings }
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn strings(&self) -> &[String] {
        &self.strings
    }

    pub fn lookup(&self, index: i32) -> Option<&str> {
        if index < 1 {
            return None;
        }
        let position = usize::try_from(index).ok()? - 1;
        self.strings.get(position).map(|s| s.as_str())
    }

    /// Resolve a direct value, falling back to the pool when it is empty.
    ///
    /// Misses resolve to the empty string.
    pub fn resolve_or_direct(&self, direct: Option<&str>, index: Option<i32>) -> String {
        match direct {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => index.and_then(|i| self.lookup(i)).unwrap_or_default().to_string(),
        }
    }

    pub(crate) fn extend(&mut self, strings: impl IntoIterator<Item = String>) {
        self.strings.extend(strings);
    }
}

impl From<Vec<String>> for StringPool {
    fn from(strings: Vec<String>) -> Self {
        StringPool::new(strings)
    }
}
