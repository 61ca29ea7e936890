use serde::{Deserialize, Serialize};

/// A drill-down link on a directory page (an industry or a country).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    pub url: String,
}

impl DirectoryEntry {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Find an entry by display name, ignoring case and surrounding whitespace.
pub fn find_by_name<'a>(entries: &'a [DirectoryEntry], name: &str) -> Option<&'a DirectoryEntry> {
    let wanted = name.trim();
    entries
        .iter()
        .find(|e| e.name == wanted)
        .or_else(|| entries.iter().find(|e| e.name.eq_ignore_ascii_case(wanted)))
}
