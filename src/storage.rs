use crate::git_ops::GitOps;
use crate::schedule::ScheduleData;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Git state after a save whose file write went through
#[derive(Debug)]
pub enum SyncStatus {
    /// Git sync is turned off
    Off,
    Synced,
    /// The file is written but pull, commit or push failed
    Failed(anyhow::Error),
}

/// TOML file holding the schedule, optionally synced through git
pub struct Storage {
    file_path: PathBuf,
    git_ops: Option<GitOps>,
}

impl Storage {
    pub fn new(file_path: impl AsRef<Path>, sync_git: bool) -> Self {
        let file_path = file_path.as_ref().to_path_buf();
        let git_ops = if sync_git {
            let ops = GitOps::new(&file_path);
            if !ops.is_git_managed() {
                tracing::warn!(
                    "--sync-git given but {} is not inside a git repository",
                    file_path.display()
                );
            }
            Some(ops)
        } else {
            None
        };
        Self { file_path, git_ops }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Load the schedule; a missing file yields empty data
    pub fn load(&self) -> Result<ScheduleData> {
        if !self.file_path.exists() {
            tracing::info!(
                "{} does not exist yet, starting with an empty schedule",
                self.file_path.display()
            );
            return Ok(ScheduleData::new());
        }

        if let Some(git_ops) = &self.git_ops
            && let Err(e) = git_ops.pull()
        {
            tracing::warn!("Git pull before load failed: {:#}", e);
        }

        let data = self.read_file()?;
        tracing::info!(
            "Loaded {} order(s) and {} holiday rule(s) from {}",
            data.order_count(),
            data.rules().len(),
            self.file_path.display()
        );
        Ok(data)
    }

    /// Read the file as it is on disk, without pulling first
    pub fn read_file(&self) -> Result<ScheduleData> {
        if !self.file_path.exists() {
            return Ok(ScheduleData::new());
        }
        let content = fs::read_to_string(&self.file_path)
            .with_context(|| format!("Failed to read {}", self.file_path.display()))?;
        let data: ScheduleData = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.file_path.display()))?;
        Ok(data)
    }

    /// Write the file and, with git sync on, commit it with `message`
    ///
    /// An error means the file on disk is unchanged. A git failure after a
    /// good write is reported as [`SyncStatus::Failed`].
    pub fn save_with_message(&self, data: &ScheduleData, message: &str) -> Result<SyncStatus> {
        let content = toml::to_string_pretty(data).context("Failed to serialize schedule")?;
        let mut tmp_name = self.file_path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        if let Err(e) = fs::rename(&tmp_path, &self.file_path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e)
                .with_context(|| format!("Failed to replace {}", self.file_path.display()));
        }
        tracing::debug!("Saved {}: {}", self.file_path.display(), message);

        let Some(git_ops) = &self.git_ops else {
            return Ok(SyncStatus::Off);
        };
        match git_ops.sync(&self.file_path, message) {
            Ok(()) => Ok(SyncStatus::Synced),
            Err(e) => {
                tracing::warn!("Saved {} but git sync failed: {:#}", self.file_path.display(), e);
                Ok(SyncStatus::Failed(e))
            }
        }
    }

    /// Final push on shutdown
    pub fn shutdown(&self) -> Result<()> {
        match &self.git_ops {
            Some(git_ops) if git_ops.is_git_managed() => git_ops.push(),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::HolidayRule;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("schedule.toml"), false);
        let data = storage.load().unwrap();
        assert_eq!(data.order_count(), 0);
        assert!(storage.shutdown().is_ok());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("schedule.toml"), false);

        let mut data = ScheduleData::new();
        let id = data.next_holiday_id();
        data.add_holiday_rule(HolidayRule::specific_date(
            id,
            "Stocktake",
            NaiveDate::from_ymd_opt(2024, 6, 28).unwrap(),
        ))
        .unwrap();
        let status = storage.save_with_message(&data, "Add stocktake").unwrap();
        assert!(matches!(status, SyncStatus::Off));
        assert!(!dir.path().join("schedule.toml.tmp").exists());

        let loaded = storage.load().unwrap();
        assert_eq!(loaded.rules(), data.rules());
        assert_eq!(loaded.holiday_counter, 1);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("schedule.toml");
        fs::write(&path, "[[order]\nid = ").unwrap();
        let err = Storage::new(&path, false).load().unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse"));
    }

    #[test]
    fn test_failed_write_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("schedule.toml");
        let storage = Storage::new(&path, false);
        storage
            .save_with_message(&ScheduleData::new(), "Create schedule")
            .unwrap();
        let before = fs::read_to_string(&path).unwrap();

        // A directory in the way of the temporary file makes the write fail
        fs::create_dir(dir.path().join("schedule.toml.tmp")).unwrap();
        let mut data = ScheduleData::new();
        let id = data.next_holiday_id();
        data.add_holiday_rule(HolidayRule::specific_date(
            id,
            "Stocktake",
            NaiveDate::from_ymd_opt(2024, 6, 28).unwrap(),
        ))
        .unwrap();
        assert!(storage.save_with_message(&data, "Add stocktake").is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
        assert!(storage.read_file().unwrap().rules().is_empty());
    }

    #[test]
    fn test_sync_failure_after_write_is_reported() {
        let dir = TempDir::new().unwrap();
        let repo = git2::Repository::init(dir.path()).unwrap();
        repo.remote("origin", "/nonexistent/remote.git").unwrap();
        let path = dir.path().join("schedule.toml");
        let storage = Storage::new(&path, true);

        let status = storage
            .save_with_message(&ScheduleData::new(), "Create schedule")
            .unwrap();
        assert!(matches!(status, SyncStatus::Failed(_)));
        assert!(path.exists());
    }
}
