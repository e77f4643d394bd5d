use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, warn};

use crate::error::CalcError;
use crate::gpa;
use crate::models::{CalculationResult, CourseUpdate, GradingSystem, HistoryEntry};

pub const STORAGE_KEY: &str = "gpa-calculator-history";
pub const HISTORY_LIMIT: usize = 50;

pub fn entry_for(
    result: CalculationResult,
    system: GradingSystem,
    at: DateTime<Utc>,
) -> HistoryEntry {
    HistoryEntry {
        result,
        timestamp: at.timestamp_millis(),
        grading_system: system,
    }
}

pub fn edited_result(
    entry: &HistoryEntry,
    index: usize,
    course: usize,
    updates: Vec<CourseUpdate>,
) -> Result<CalculationResult, CalcError> {
    let mut result = entry.result.clone();
    let target = result
        .courses
        .as_mut()
        .and_then(|courses| courses.get_mut(course))
        .ok_or(CalcError::NoSuchCourse { index, course })?;
    for update in updates {
        target.apply(update);
    }
    Ok(gpa::recalculate(&result, entry.grading_system))
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("gpa-calculations-{}.json", date.format("%Y-%m-%d"))
}

#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn in_dir(dir: &Path) -> Self {
        HistoryStore {
            path: dir.join(format!("{STORAGE_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Vec<HistoryEntry> {
        if !self.path.exists() {
            return Vec::new();
        }
        match read_entries(&self.path) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "ignoring unreadable history");
                Vec::new()
            }
        }
    }

    fn write(&self, entries: &[HistoryEntry]) -> anyhow::Result<()> {
        let data = serde_json::to_string(entries)?;
        std::fs::write(&self.path, data)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }

    pub fn save(&self, entry: HistoryEntry) -> anyhow::Result<()> {
        let mut entries = self.load();
        entries.insert(0, entry);
        entries.truncate(HISTORY_LIMIT);
        self.write(&entries)?;
        info!(stored = entries.len(), "saved calculation");
        Ok(())
    }

    pub fn get(&self, index: usize) -> anyhow::Result<HistoryEntry> {
        let entries = self.load();
        let len = entries.len();
        entries
            .into_iter()
            .nth(index)
            .ok_or_else(|| CalcError::NoSuchEntry { index, len }.into())
    }

    pub fn remove(&self, index: usize) -> anyhow::Result<HistoryEntry> {
        let mut entries = self.load();
        if index >= entries.len() {
            return Err(CalcError::NoSuchEntry {
                index,
                len: entries.len(),
            }
            .into());
        }
        let removed = entries.remove(index);
        self.write(&entries)?;
        info!(index, "removed calculation");
        Ok(removed)
    }

    pub fn clear(&self) -> anyhow::Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .with_context(|| format!("failed to remove {}", self.path.display()))?;
        }
        info!("cleared history");
        Ok(())
    }

    pub fn edit(
        &self,
        index: usize,
        course: usize,
        updates: Vec<CourseUpdate>,
        at: DateTime<Utc>,
    ) -> anyhow::Result<HistoryEntry> {
        let entry = self.get(index)?;
        let result = edited_result(&entry, index, course, updates)?;
        let edited = entry_for(result, entry.grading_system, at);
        self.save(edited.clone())?;
        Ok(edited)
    }

    pub fn export(&self, dir: &Path, date: NaiveDate) -> anyhow::Result<PathBuf> {
        let out = dir.join(export_file_name(date));
        let data = serde_json::to_string_pretty(&self.load())?;
        std::fs::write(&out, data).with_context(|| format!("failed to write {}", out.display()))?;
        info!(path = %out.display(), "exported history");
        Ok(out)
    }

    pub fn import(&self, file: &Path) -> anyhow::Result<usize> {
        let imported = read_entries(file)?;

        let mut entries = self.load();
        let mut count = 0;
        for entry in imported {
            if !entries.contains(&entry) {
                entries.push(entry);
                count += 1;
            }
        }
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries.truncate(HISTORY_LIMIT);
        self.write(&entries)?;
        info!(count, stored = entries.len(), "imported history");
        Ok(count)
    }
}

fn read_entries(path: &Path) -> anyhow::Result<Vec<HistoryEntry>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let entries = serde_json::from_str(&data)
        .with_context(|| format!("{} is not a calculation history", path.display()))?;
    Ok(entries)
}
