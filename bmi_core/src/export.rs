//! CSV export of measurement history.

use crate::classifier::round1;
use crate::{MeasurementRecord, Result};
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    id: String,
    user: &'a str,
    recorded_at: String,
    weight_kg: f64,
    height_cm: f64,
    bmi: f64,
    category: &'static str,
}

impl<'a> From<&'a MeasurementRecord> for CsvRow<'a> {
    fn from(record: &'a MeasurementRecord) -> Self {
        CsvRow {
            id: record.id.to_string(),
            user: &record.user,
            recorded_at: record.recorded_at.to_rfc3339(),
            weight_kg: record.weight_kg,
            height_cm: record.height_cm,
            bmi: round1(record.bmi),
            category: record.category.label(),
        }
    }
}

/// Write records to a CSV file, replacing any existing file
///
/// The file is synced to disk before returning. Returns the number of rows
/// written (excluding the header).
pub fn export_csv(records: &[MeasurementRecord], path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    if records.is_empty() {
        writer.write_record([
            "id",
            "user",
            "recorded_at",
            "weight_kg",
            "height_cm",
            "bmi",
            "category",
        ])?;
    }
    for record in records {
        writer.serialize(CsvRow::from(record))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Exported {} measurements to {:?}", records.len(), path);
    Ok(records.len())
}
