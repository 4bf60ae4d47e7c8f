use csv::Reader;
use std::path::Path;

use crate::data::features::FeatureVector;
use crate::error::{Error, Result};

/// Reads one feature vector per CSV row, keyed by the header names.
///
/// Every cell must parse as a number; column matching against the artifacts
/// happens later, in the predictor.
pub fn load_readings(csv_path: &Path) -> Result<Vec<FeatureVector>> {
    let context = || format!("reading {}", csv_path.display());
    let mut rdr = Reader::from_path(csv_path).map_err(|e| Error::csv(context(), e))?;
    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| Error::csv(context(), e))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut readings = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| Error::csv(context(), e))?;

        let mut vector = FeatureVector::new();
        for (name, cell) in headers.iter().zip(record.iter()) {
            let value: f64 = cell.trim().parse().map_err(|_| {
                Error::invalid_input(
                    name.as_str(),
                    format!("row {} has non-numeric value '{}'", row + 1, cell),
                )
            })?;
            vector.insert(name.clone(), value);
        }
        readings.push(vector);
    }

    Ok(readings)
}
