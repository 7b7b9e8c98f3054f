//! Measurement history persistence.
//!
//! Each user's measurements live in a JSON Lines file under the history
//! directory. Appends take an exclusive lock and reads a shared one, so
//! several processes can log at once.

use crate::classifier::assess;
use crate::validation::validate_user_id;
use crate::{MeasurementRecord, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

impl MeasurementRecord {
    /// Create a record for a measurement taken at `recorded_at`
    ///
    /// BMI and category come from the classifier. The BMI is stored unrounded
    /// so that `classify(record.bmi) == record.category` always holds.
    pub fn new(
        user: impl Into<String>,
        weight_kg: f64,
        height_cm: f64,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        let reading = assess(weight_kg, height_cm);
        Self {
            id: Uuid::new_v4(),
            user: user.into(),
            weight_kg,
            height_cm,
            bmi: reading.bmi,
            category: reading.category,
            recorded_at,
        }
    }
}

/// Per-user measurement history
pub trait HistoryStore {
    /// Append a record to its user's history
    fn append(&mut self, record: &MeasurementRecord) -> Result<()>;

    /// All records for a user, newest first
    fn list(&self, user: &str) -> Result<Vec<MeasurementRecord>>;

    /// Remove a user's history, returning how many records it held
    fn clear(&mut self, user: &str) -> Result<usize>;

    /// The most recent record for a user
    fn latest(&self, user: &str) -> Result<Option<MeasurementRecord>> {
        Ok(self.list(user)?.into_iter().next())
    }
}

/// JSONL-backed history store with file locking
pub struct JsonlHistoryStore {
    dir: PathBuf,
}

impl JsonlHistoryStore {
    /// Create a store rooted at `dir` (usually `<data_dir>/history`)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of a user's history file
    pub fn path_for(&self, user: &str) -> Result<PathBuf> {
        validate_user_id(user)?;
        Ok(self.dir.join(format!("{}.jsonl", user)))
    }
}

impl HistoryStore for JsonlHistoryStore {
    fn append(&mut self, record: &MeasurementRecord) -> Result<()> {
        let path = self.path_for(&record.user)?;
        std::fs::create_dir_all(&self.dir)?;

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(record)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;

        tracing::debug!("Appended measurement {} for {}", record.id, record.user);
        Ok(())
    }

    fn list(&self, user: &str) -> Result<Vec<MeasurementRecord>> {
        let path = self.path_for(user)?;
        let mut records: Vec<_> = read_records(&path)?
            .into_iter()
            .filter(|r| r.user == user)
            .collect();

        // Later lines win ties on timestamp.
        records.reverse();
        records.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));

        tracing::debug!("Loaded {} measurements for {}", records.len(), user);
        Ok(records)
    }

    fn clear(&mut self, user: &str) -> Result<usize> {
        let path = self.path_for(user)?;
        if !path.exists() {
            return Ok(0);
        }

        // Count and truncate under one exclusive lock. Appenders blocked on
        // the lock then write into the emptied file rather than a removed one.
        let file = OpenOptions::new().read(true).write(true).open(&path)?;
        file.lock_exclusive()?;

        let count = parse_records(BufReader::new(&file), &path)?.len();
        file.set_len(0)?;
        file.sync_all()?;

        file.unlock()?;

        tracing::info!("Cleared {} measurements for {}", count, user);
        Ok(count)
    }
}

/// Read every parsable record from a history file
///
/// Corrupted or partial lines are skipped with a warning.
pub fn read_records(path: &Path) -> Result<Vec<MeasurementRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let records = parse_records(BufReader::new(&file), path)?;

    file.unlock()?;
    Ok(records)
}

fn parse_records(reader: impl BufRead, path: &Path) -> Result<Vec<MeasurementRecord>> {
    let mut records = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<MeasurementRecord>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(
                    "Skipping unreadable measurement at {:?} line {}: {}",
                    path,
                    line_num + 1,
                    e
                );
            }
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{classify, round1};
    use crate::goal::resolve_goal;
    use crate::{BmiCategory, GoalSelection};
    use chrono::Duration;

    fn record(user: &str, weight_kg: f64, days_ago: i64) -> MeasurementRecord {
        MeasurementRecord::new(user, weight_kg, 180.0, Utc::now() - Duration::days(days_ago))
    }

    #[test]
    fn test_new_record_is_classified() {
        let r = MeasurementRecord::new("default", 90.0, 180.0, Utc::now());
        assert_eq!(round1(r.bmi), 27.8);
        assert_eq!(r.category, BmiCategory::Overweight);
    }

    #[test]
    fn test_stored_bmi_agrees_with_category_below_boundary() {
        // 80.9 kg at 180 cm is BMI 24.97: displays as 25.0 but is Normal weight.
        let r = MeasurementRecord::new("ana", 80.9, 180.0, Utc::now());
        assert!(r.bmi >= 24.95 && r.bmi < 25.0);
        assert_eq!(r.category, BmiCategory::Normal);
        assert_eq!(classify(r.bmi), r.category);

        let from_record = resolve_goal(GoalSelection::Unset, Some(r.bmi));
        let from_measurement = resolve_goal(
            GoalSelection::Unset,
            Some(crate::calculate_bmi(r.weight_kg, r.height_cm)),
        );
        assert_eq!(from_record, from_measurement);
    }

    #[test]
    fn test_stored_bmi_survives_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonlHistoryStore::new(temp_dir.path());
        store
            .append(&MeasurementRecord::new("ana", 80.9, 180.0, Utc::now()))
            .unwrap();

        let stored = store.latest("ana").unwrap().unwrap();
        assert_eq!(classify(stored.bmi), stored.category);
    }

    #[test]
    fn test_append_and_list() {
        crate::logging::init_test();
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonlHistoryStore::new(temp_dir.path().join("history"));

        store.append(&record("ana", 80.0, 3)).unwrap();
        store.append(&record("ana", 79.0, 1)).unwrap();
        store.append(&record("ana", 81.0, 5)).unwrap();

        let records = store.list("ana").unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].weight_kg, 79.0);
        assert_eq!(records[1].weight_kg, 80.0);
        assert_eq!(records[2].weight_kg, 81.0);
    }

    #[test]
    fn test_users_are_isolated() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonlHistoryStore::new(temp_dir.path());

        store.append(&record("ana", 80.0, 1)).unwrap();
        store.append(&record("ben", 95.0, 1)).unwrap();

        assert_eq!(store.list("ana").unwrap().len(), 1);
        assert_eq!(store.list("ben").unwrap()[0].weight_kg, 95.0);
        assert!(store.list("cy").unwrap().is_empty());
    }

    #[test]
    fn test_latest() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonlHistoryStore::new(temp_dir.path());

        assert!(store.latest("ana").unwrap().is_none());

        let newest = record("ana", 78.0, 0);
        store.append(&record("ana", 80.0, 2)).unwrap();
        store.append(&newest).unwrap();

        assert_eq!(store.latest("ana").unwrap().unwrap().id, newest.id);
    }

    #[test]
    fn test_clear() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonlHistoryStore::new(temp_dir.path());

        store.append(&record("ana", 80.0, 2)).unwrap();
        store.append(&record("ana", 79.0, 1)).unwrap();
        store.append(&record("ben", 90.0, 1)).unwrap();

        assert_eq!(store.clear("ana").unwrap(), 2);
        assert!(store.list("ana").unwrap().is_empty());
        assert_eq!(store.list("ben").unwrap().len(), 1);
        assert_eq!(store.clear("ana").unwrap(), 0);

        store.append(&record("ana", 78.0, 0)).unwrap();
        assert_eq!(store.list("ana").unwrap().len(), 1);
    }

    #[test]
    fn test_clear_during_appends_loses_nothing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path().to_path_buf();

        let writers: Vec<_> = (0..4)
            .map(|_| {
                let dir = dir.clone();
                std::thread::spawn(move || {
                    let mut store = JsonlHistoryStore::new(dir);
                    for i in 0..25 {
                        store.append(&record("ana", 70.0 + i as f64, 0)).unwrap();
                    }
                })
            })
            .collect();

        let mut store = JsonlHistoryStore::new(&dir);
        let mut cleared = 0;
        for _ in 0..20 {
            cleared += store.clear("ana").unwrap();
            std::thread::sleep(std::time::Duration::from_millis(1));
        }

        for writer in writers {
            writer.join().expect("Writer thread panicked");
        }

        let remaining = store.list("ana").unwrap().len();
        assert_eq!(cleared + remaining, 100);
    }

    #[test]
    fn test_corrupted_lines_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonlHistoryStore::new(temp_dir.path());
        store.append(&record("ana", 80.0, 1)).unwrap();

        let path = store.path_for("ana").unwrap();
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "{{ invalid json }}").unwrap();
        writeln!(file, r#"{{"id":"00000000-0000-0000-0000-000000000000""#).unwrap();

        store.append(&record("ana", 79.0, 0)).unwrap();

        let records = store.list("ana").unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_invalid_user_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonlHistoryStore::new(temp_dir.path());

        assert!(store.list("../ana").is_err());
        assert!(store.append(&record("a/b", 80.0, 0)).is_err());
    }
}
