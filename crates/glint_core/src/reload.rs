//! Settings hot reload.
//!
//! The host polls the settings file once per frame. A changed file is
//! re-read and validated; the caller swaps the new settings in only when
//! that succeeds and keeps running with the previous ones otherwise.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::config::{ConfigResult, RenderSettings};

/// Watches a settings file by modification time.
#[derive(Debug)]
pub struct SettingsWatcher {
    path: PathBuf,
    last_modified: Option<SystemTime>,
}

impl SettingsWatcher {
    /// Start watching `path`. The file's current state counts as seen.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let last_modified = modified_time(&path).ok();
        Self { path, last_modified }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check the file for changes.
    ///
    /// Returns `None` when nothing changed, otherwise the result of loading
    /// the new contents. The new modification time is remembered either way,
    /// so a broken file is reported once rather than every frame.
    pub fn poll(&mut self) -> Option<ConfigResult<RenderSettings>> {
        let modified = match modified_time(&self.path) {
            Ok(time) => time,
            Err(e) => {
                // Report a file that disappeared once, then stay quiet
                return self.last_modified.take().map(|_| Err(e.into()));
            }
        };

        if self.last_modified == Some(modified) {
            return None;
        }
        self.last_modified = Some(modified);

        log::debug!("Settings file {} changed, reloading", self.path.display());
        Some(RenderSettings::load(&self.path))
    }

    /// Poll and apply swap-on-success.
    ///
    /// Replaces `current` and returns the previous settings when a valid new
    /// file was loaded. Invalid files are logged and leave `current` untouched.
    pub fn reload_into(&mut self, current: &mut RenderSettings) -> Option<RenderSettings> {
        match self.poll()? {
            Ok(settings) => {
                log::info!("Reloaded settings from {}", self.path.display());
                Some(std::mem::replace(current, settings))
            }
            Err(e) => {
                log::warn!(
                    "Keeping previous settings, {} failed to load: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }
}

fn modified_time(path: &Path) -> std::io::Result<SystemTime> {
    fs::metadata(path)?.modified()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::time::Duration;

    /// Rewrite the file and push its mtime forward so coarse filesystem
    /// timestamps still register a change.
    fn rewrite(path: &Path, contents: &str, bump_secs: u64) {
        let mut file = File::create(path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(bump_secs))
            .unwrap();
    }

    #[test]
    fn test_unchanged_file_is_quiet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glint.json");
        rewrite(&path, "{}", 0);

        let mut watcher = SettingsWatcher::new(&path);
        assert!(watcher.poll().is_none());
        assert!(watcher.poll().is_none());
    }

    #[test]
    fn test_valid_change_swaps_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glint.json");
        rewrite(&path, "{}", 0);

        let mut watcher = SettingsWatcher::new(&path);
        let mut current = RenderSettings::default();

        rewrite(&path, r#"{ "metal_roughness": 0.75 }"#, 10);
        let previous = watcher.reload_into(&mut current);

        assert_eq!(previous, Some(RenderSettings::default()));
        assert_eq!(current.metal_roughness, 0.75);
        assert!(watcher.reload_into(&mut current).is_none());
    }

    #[test]
    fn test_invalid_change_keeps_previous() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glint.json");
        rewrite(&path, r#"{ "dof_radius": 0.1 }"#, 0);

        let mut watcher = SettingsWatcher::new(&path);
        let mut current = RenderSettings::load(&path).unwrap();

        rewrite(&path, r#"{ "dof_radius": "#, 10);
        assert!(watcher.reload_into(&mut current).is_none());
        assert_eq!(current.dof_radius, 0.1);

        // The broken file is reported once, not on every poll
        assert!(watcher.poll().is_none());

        // A later fix is picked up
        rewrite(&path, r#"{ "dof_radius": 0.05 }"#, 20);
        assert!(watcher.reload_into(&mut current).is_some());
        assert_eq!(current.dof_radius, 0.05);
    }

    #[test]
    fn test_missing_file_reported_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glint.json");
        rewrite(&path, "{}", 0);

        let mut watcher = SettingsWatcher::new(&path);
        fs::remove_file(&path).unwrap();

        assert!(matches!(watcher.poll(), Some(Err(_))));
        assert!(watcher.poll().is_none());
    }
}
