use chrono::{DateTime, Local};
use csv::Writer;
use std::path::Path;
use tracing::info;

use crate::data::features::{FeatureSchema, FeatureVector};
use crate::error::{Error, Result};

pub const TIME_FORMAT: &str = "%H:%M:%S";
pub const PREDICTION_COLUMN: &str = "Predicted Total MLD";

/// One iteration's raw inputs and its prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    pub timestamp: DateTime<Local>,
    pub features: FeatureVector,
    pub predicted: f64,
}

impl PredictionRecord {
    pub fn time_label(&self) -> String {
        self.timestamp.format(TIME_FORMAT).to_string()
    }
}

/// Records of a single simulation run, in the order they were produced.
#[derive(Debug, Clone, Default)]
pub struct PredictionLog {
    records: Vec<PredictionRecord>,
}

impl PredictionLog {
    pub fn record(&mut self, record: PredictionRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[PredictionRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&PredictionRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn predictions(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().map(|r| r.predicted)
    }

    pub fn header(schema: &FeatureSchema) -> Vec<&'static str> {
        std::iter::once("Time")
            .chain(schema.labels())
            .chain(std::iter::once(PREDICTION_COLUMN))
            .collect()
    }

    /// Writes the whole log at once; feature values follow `schema` order.
    pub fn write_csv(&self, path: &Path, schema: &FeatureSchema) -> Result<()> {
        let context = || format!("writing prediction log {}", path.display());
        let mut wtr = Writer::from_path(path).map_err(|e| Error::csv(context(), e))?;

        wtr.write_record(Self::header(schema))
            .map_err(|e| Error::csv(context(), e))?;

        for record in &self.records {
            let mut row = Vec::with_capacity(schema.len() + 2);
            row.push(record.time_label());
            for name in schema.names() {
                let value = record.features.get(name).ok_or_else(|| {
                    Error::incompatible_schema(
                        schema.names().collect::<Vec<_>>().join(", "),
                        record.features.column_list(),
                        "writing prediction log",
                    )
                })?;
                row.push(value.to_string());
            }
            row.push(record.predicted.to_string());
            wtr.write_record(&row).map_err(|e| Error::csv(context(), e))?;
        }

        wtr.flush()
            .map_err(|e| Error::io(format!("flushing {}", path.display()), e))?;
        info!(rows = self.records.len(), path = %path.display(), "prediction log written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn zone_header_matches_log_format() {
        assert_eq!(
            PredictionLog::header(&FeatureSchema::ZONES).join(","),
            "Time,Parvati MLD,New&Old Cantonment MLD,Waraje Close Pipe MLD,Old Holkar MLD,\
             Vadgaon Close Pipe MLD,Day,Month,Weekday,Predicted Total MLD"
        );
    }

    #[test]
    fn csv_has_one_row_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.csv");
        let mut log = PredictionLog::default();
        for (i, second) in [5, 6].into_iter().enumerate() {
            log.record(PredictionRecord {
                timestamp: Local.with_ymd_and_hms(2024, 1, 2, 8, 0, second).unwrap(),
                features: FeatureSchema::ZONES.vector(&[i as f64; 8]).unwrap(),
                predicted: 900.5,
            });
        }

        log.write_csv(&path, &FeatureSchema::ZONES).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "08:00:05,0,0,0,0,0,0,0,0,900.5");
        assert!(lines[2].starts_with("08:00:06,1,"));
    }

    #[test]
    fn record_missing_a_schema_column_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = PredictionLog::default();
        log.record(PredictionRecord {
            timestamp: Local::now(),
            features: [("Day", 1.0)].into_iter().collect(),
            predicted: 1.0,
        });
        let err = log
            .write_csv(&dir.path().join("x.csv"), &FeatureSchema::ZONES)
            .unwrap_err();
        assert!(err.is_schema_error());
    }
}
