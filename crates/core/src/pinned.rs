//! Pinned launcher entries, persisted as a flat JSON list

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A user-pinned application
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PinnedEntry {
    pub name: String,
    pub exec: String,
    #[serde(default)]
    pub icon: Option<String>,
}

/// Horizontal direction within the pinned row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// Ordered pinned list. Every mutation rewrites the whole file.
#[derive(Debug)]
pub struct PinnedStore {
    entries: Vec<PinnedEntry>,
    path: Option<PathBuf>,
    max: usize,
}

impl PinnedStore {
    /// Get the pinned file path
    pub fn default_path() -> Result<PathBuf> {
        let dirs = crate::config::project_dirs()?;
        let data_dir = dirs.data_dir();
        fs::create_dir_all(data_dir).context("Failed to create data directory")?;
        Ok(data_dir.join("pinned.json"))
    }

    /// Load from `path`. A missing or unreadable file gives an empty list.
    pub fn load(path: PathBuf, max: usize) -> Self {
        let mut entries = match read_entries(&path) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Starting with no pinned entries: {:#}", e);
                Vec::new()
            }
        };
        entries.truncate(max);
        Self {
            entries,
            path: Some(path),
            max,
        }
    }

    /// Store that never touches the disk
    pub fn in_memory(entries: Vec<PinnedEntry>, max: usize) -> Self {
        let mut entries = entries;
        entries.truncate(max);
        Self {
            entries,
            path: None,
            max,
        }
    }

    pub fn entries(&self) -> &[PinnedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.max
    }

    /// Change the limit, dropping entries past it. True when any were dropped.
    pub fn set_max(&mut self, max: usize) -> bool {
        self.max = max;
        if self.entries.len() <= max {
            return false;
        }
        log::info!(
            "Dropping {} pinned entries over the new limit of {}",
            self.entries.len() - max,
            max
        );
        self.entries.truncate(max);
        self.flush();
        true
    }

    pub fn position(&self, exec: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.exec == exec)
    }

    /// Append an entry. Refused when already pinned or full.
    pub fn pin(&mut self, entry: PinnedEntry) -> bool {
        if self.position(&entry.exec).is_some() {
            return false;
        }
        if self.is_full() {
            log::info!("Not pinning {}: limit of {} reached", entry.name, self.max);
            return false;
        }
        self.entries.push(entry);
        self.flush();
        true
    }

    pub fn unpin(&mut self, index: usize) -> Option<PinnedEntry> {
        if index >= self.entries.len() {
            return None;
        }
        let removed = self.entries.remove(index);
        self.flush();
        Some(removed)
    }

    /// Swap the entry at `index` with its neighbor. Returns the entry's new
    /// index, or `None` when there is no neighbor in that direction.
    pub fn move_entry(&mut self, index: usize, direction: Direction) -> Option<usize> {
        if index >= self.entries.len() {
            return None;
        }
        let target = match direction {
            Direction::Left => index.checked_sub(1)?,
            Direction::Right if index + 1 < self.entries.len() => index + 1,
            Direction::Right => return None,
        };
        self.entries.swap(index, target);
        self.flush();
        Some(target)
    }

    /// Write the whole list out
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let content = serde_json::to_string_pretty(&self.entries)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write pinned entries to {:?}", path))?;
        Ok(())
    }

    fn flush(&self) {
        if let Err(e) = self.save() {
            log::error!("{:#}", e);
        }
    }
}

fn read_entries(path: &Path) -> Result<Vec<PinnedEntry>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read pinned entries from {:?}", path))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse pinned entries from {:?}", path))
}
