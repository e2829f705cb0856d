//! Application catalog: the launchable entries the launcher lists

mod desktop;

pub use desktop::DesktopCatalog;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// One launchable application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub display_name: String,
    pub launch_command: String,
    pub icon_path: Option<String>,
    /// File the entry was read from
    pub source_path: PathBuf,
}

impl CatalogEntry {
    pub fn new(display_name: impl Into<String>, launch_command: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            launch_command: launch_command.into(),
            icon_path: None,
            source_path: PathBuf::new(),
        }
    }
}

/// Source of catalog entries plus the means to start them
pub trait AppCatalog {
    /// Fetch the full catalog, in display order
    fn entries(&self) -> Result<Vec<CatalogEntry>>;

    /// Start a command line, through `elevate_with` when given
    fn launch(&self, command: &str, elevate_with: Option<&str>) -> Result<()>;

    /// Open a file with the desktop's default handler
    fn open(&self, path: &Path) -> Result<()>;
}

/// Entries whose name contains `query`, ignoring case, in catalog order
pub fn filter_entries(entries: &[CatalogEntry], query: &str) -> Vec<CatalogEntry> {
    if query.is_empty() {
        return entries.to_vec();
    }
    let needle = query.to_lowercase();
    entries
        .iter()
        .filter(|entry| entry.display_name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<CatalogEntry> {
        ["Firefox", "GIMP", "Files", "Terminal", "LibreOffice Impress"]
            .iter()
            .map(|name| CatalogEntry::new(*name, name.to_lowercase()))
            .collect()
    }

    fn names(entries: &[CatalogEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.display_name.as_str()).collect()
    }

    #[test]
    fn test_empty_query_returns_everything() {
        assert_eq!(filter_entries(&catalog(), ""), catalog());
    }

    #[test]
    fn test_substring_not_prefix() {
        let result = filter_entries(&catalog(), "im");
        assert_eq!(names(&result), vec!["GIMP", "LibreOffice Impress"]);
    }

    #[test]
    fn test_case_insensitive_order_preserved() {
        let result = filter_entries(&catalog(), "FI");
        assert_eq!(names(&result), vec!["Firefox", "Files", "LibreOffice Impress"]);
        assert!(filter_entries(&catalog(), "zzz").is_empty());
    }
}
