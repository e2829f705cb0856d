//! Catalog backed by XDG .desktop files

use super::{AppCatalog, CatalogEntry};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

pub struct DesktopCatalog {
    search_paths: Vec<PathBuf>,
}

impl DesktopCatalog {
    /// Catalog over the standard application directories
    pub fn new() -> Self {
        let mut search_paths = vec![
            PathBuf::from("/usr/share/applications"),
            PathBuf::from("/usr/local/share/applications"),
            PathBuf::from("/var/lib/flatpak/exports/share/applications"),
        ];
        if let Some(base) = directories::BaseDirs::new() {
            search_paths.push(base.data_local_dir().join("applications"));
            search_paths.push(base.data_local_dir().join("flatpak/exports/share/applications"));
        }
        Self::with_search_paths(search_paths)
    }

    pub fn with_search_paths(search_paths: Vec<PathBuf>) -> Self {
        Self { search_paths }
    }

    /// Parse .desktop files from every search path
    fn parse_desktop_files(&self) -> Vec<DesktopEntry> {
        let mut entries = Vec::new();

        for dir in &self.search_paths {
            let Ok(read_dir) = fs::read_dir(dir) else {
                continue;
            };
            for entry in read_dir.flatten() {
                let path = entry.path();
                if path.extension().map_or(true, |e| e != "desktop") {
                    continue;
                }
                match parse_desktop_file(&path) {
                    Ok(desktop) if desktop.is_listed() => entries.push(desktop),
                    Ok(_) => {}
                    Err(e) => log::debug!("Skipping {:?}: {:#}", path, e),
                }
            }
        }

        // Remove duplicates by name, ignoring case like the sort does
        entries.sort_by_cached_key(|e| e.name.to_lowercase());
        entries.dedup_by(|a, b| a.name.to_lowercase() == b.name.to_lowercase());
        entries
    }
}

impl Default for DesktopCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl AppCatalog for DesktopCatalog {
    fn entries(&self) -> Result<Vec<CatalogEntry>> {
        Ok(self
            .parse_desktop_files()
            .into_iter()
            .map(|e| CatalogEntry {
                display_name: e.name,
                launch_command: e.exec,
                icon_path: e.icon,
                source_path: e.source,
            })
            .collect())
    }

    fn launch(&self, command: &str, elevate_with: Option<&str>) -> Result<()> {
        let mut parts = command.split_whitespace();
        let program = parts.next().context("Empty command")?;

        let mut child = match elevate_with {
            Some(helper) => {
                let mut c = Command::new(helper);
                c.arg(program);
                c
            }
            None => Command::new(program),
        };
        child.args(parts);
        child
            .spawn()
            .with_context(|| format!("Failed to launch {:?}", command))?;

        match elevate_with {
            Some(helper) => log::info!("Launched {:?} through {}", command, helper),
            None => log::info!("Launched {:?}", command),
        }
        Ok(())
    }

    fn open(&self, path: &Path) -> Result<()> {
        let opener = if cfg!(target_os = "macos") {
            "open"
        } else {
            "xdg-open"
        };
        Command::new(opener)
            .arg(path)
            .spawn()
            .with_context(|| format!("Failed to open {:?}", path))?;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct DesktopEntry {
    name: String,
    exec: String,
    icon: Option<String>,
    kind: Option<String>,
    no_display: bool,
    hidden: bool,
    source: PathBuf,
}

impl DesktopEntry {
    fn is_listed(&self) -> bool {
        !self.no_display
            && !self.hidden
            && !self.name.is_empty()
            && !self.exec.is_empty()
            && self.kind.as_deref().map_or(true, |k| k == "Application")
    }
}

/// Parse the [Desktop Entry] group of a single .desktop file
fn parse_desktop_file(path: &Path) -> Result<DesktopEntry> {
    let content = fs::read_to_string(path)?;
    let mut entry = DesktopEntry {
        source: path.to_path_buf(),
        ..Default::default()
    };
    let mut in_desktop_entry = false;

    for line in content.lines() {
        let line = line.trim();

        if line == "[Desktop Entry]" {
            in_desktop_entry = true;
            continue;
        }

        if line.starts_with('[') {
            in_desktop_entry = false;
            continue;
        }

        if !in_desktop_entry {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            match key.trim() {
                "Name" if entry.name.is_empty() => entry.name = value.trim().to_string(),
                "Exec" => {
                    // Remove %u, %U, %f, %F, etc. placeholders
                    entry.exec = value
                        .split_whitespace()
                        .filter(|s| !s.starts_with('%'))
                        .collect::<Vec<_>>()
                        .join(" ");
                }
                "Icon" => entry.icon = Some(value.trim().to_string()),
                "Type" => entry.kind = Some(value.trim().to_string()),
                "NoDisplay" => entry.no_display = value.trim() == "true",
                "Hidden" => entry.hidden = value.trim() == "true",
                _ => {}
            }
        }
    }

    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, file: &str, body: &str) {
        fs::write(dir.join(file), body).unwrap();
    }

    #[test]
    fn test_parse_desktop_directory() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "firefox.desktop",
            concat!(
                "[Desktop Entry]\nType=Application\nName=Firefox\nExec=firefox %u\nIcon=firefox\n",
                "\n[Desktop Action new-window]\nName=New Window\nExec=firefox --new-window\n",
            ),
        );
        write(
            dir.path(),
            "hidden.desktop",
            "[Desktop Entry]\nName=Hidden Thing\nExec=thing\nNoDisplay=true\n",
        );
        write(
            dir.path(),
            "link.desktop",
            "[Desktop Entry]\nType=Link\nName=Docs\nURL=https://example.com\n",
        );
        write(dir.path(), "alacritty.desktop", "[Desktop Entry]\nName=Alacritty\nExec=alacritty\n");
        write(dir.path(), "notes.txt", "Name=Not a desktop file\n");

        let catalog = DesktopCatalog::with_search_paths(vec![
            dir.path().to_path_buf(),
            dir.path().join("missing"),
        ]);
        let entries = catalog.entries().unwrap();

        let names: Vec<_> = entries.iter().map(|e| e.display_name.as_str()).collect();
        assert_eq!(names, vec!["Alacritty", "Firefox"]);

        let firefox = &entries[1];
        assert_eq!(firefox.launch_command, "firefox");
        assert_eq!(firefox.icon_path.as_deref(), Some("firefox"));
        assert_eq!(firefox.source_path, dir.path().join("firefox.desktop"));
        assert_eq!(entries[0].icon_path, None);
    }

    #[test]
    fn test_duplicate_names_collapse() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        write(first.path(), "a.desktop", "[Desktop Entry]\nName=Editor\nExec=editor-a\n");
        write(second.path(), "b.desktop", "[Desktop Entry]\nName=Editor\nExec=editor-b\n");
        write(second.path(), "c.desktop", "[Desktop Entry]\nName=EDITOR\nExec=editor-c\n");
        write(second.path(), "d.desktop", "[Desktop Entry]\nName=Browser\nExec=browser\n");
        write(first.path(), "e.desktop", "[Desktop Entry]\nName=editor\nExec=editor-e\n");

        let catalog = DesktopCatalog::with_search_paths(vec![
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ]);
        let names: Vec<_> = catalog
            .entries()
            .unwrap()
            .into_iter()
            .map(|e| e.display_name)
            .collect();
        assert_eq!(names.len(), 2);
        assert_eq!(names[0], "Browser");
        assert!(names[1].eq_ignore_ascii_case("editor"));
    }

    #[test]
    fn test_launch_empty_command_fails() {
        let catalog = DesktopCatalog::with_search_paths(vec![]);
        assert!(catalog.launch("   ", None).is_err());
        assert!(catalog.launch("", Some("pkexec")).is_err());
    }
}
