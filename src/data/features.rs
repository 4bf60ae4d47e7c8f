use indexmap::IndexMap;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};

/// One named column of a feature schema.
///
/// `name` is the column the artifacts were fitted with, `label` is the header
/// written to the prediction log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSchema {
    pub fields: &'static [Field],
}

impl FeatureSchema {
    /// Five-field weather schema used by the dashboard.
    pub const WEATHER: FeatureSchema = FeatureSchema {
        fields: &[
            Field {
                name: "temperature",
                label: "Temperature",
            },
            Field {
                name: "humidity",
                label: "Humidity",
            },
            Field {
                name: "rainfall",
                label: "Rainfall",
            },
            Field {
                name: "population",
                label: "Population",
            },
            Field {
                name: "day_of_week",
                label: "Day of Week",
            },
        ],
    };

    /// Eight-field per-zone flow schema used by the live simulators.
    pub const ZONES: FeatureSchema = FeatureSchema {
        fields: &[
            Field {
                name: "Parvati M.L.D",
                label: "Parvati MLD",
            },
            Field {
                name: "New & Old cantonment M.L.D",
                label: "New&Old Cantonment MLD",
            },
            Field {
                name: "Waraje Close Pipe M.L.D",
                label: "Waraje Close Pipe MLD",
            },
            Field {
                name: "Old Holkar M.L.D",
                label: "Old Holkar MLD",
            },
            Field {
                name: "Vadgaon Close Pipe M.L.D",
                label: "Vadgaon Close Pipe MLD",
            },
            Field {
                name: "Day",
                label: "Day",
            },
            Field {
                name: "Month",
                label: "Month",
            },
            Field {
                name: "Weekday",
                label: "Weekday",
            },
        ],
    };

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.label)
    }

    /// Builds a vector from values given in schema order.
    pub fn vector(&self, values: &[f64]) -> Result<FeatureVector> {
        if values.len() != self.fields.len() {
            return Err(Error::incompatible_schema(
                format!("{} values", self.fields.len()),
                format!("{} values", values.len()),
                "building feature vector",
            ));
        }
        Ok(self.names().zip(values.iter().copied()).collect())
    }
}

/// Ordered list of named numeric fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    fields: IndexMap<String, f64>,
}

impl FeatureVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.fields.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.fields.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.fields.values().copied()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn to_array(&self) -> Array1<f64> {
        self.values().collect()
    }

    pub fn column_list(&self) -> String {
        self.names().collect::<Vec<_>>().join(", ")
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for FeatureVector {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// What to do when a vector's columns differ from the artifact's.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaPolicy {
    /// Reindex to the expected columns, filling missing ones with zero.
    #[default]
    FillZero,
    /// Reject any column mismatch.
    Fail,
}

impl std::str::FromStr for SchemaPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fill-zero" | "fill_zero" => Ok(Self::FillZero),
            "fail" => Ok(Self::Fail),
            other => Err(Error::invalid_input(
                "schema_policy",
                format!("unknown policy '{other}', expected 'fill-zero' or 'fail'"),
            )),
        }
    }
}

/// Result of aligning a vector to an expected column set.
#[derive(Debug, Clone, PartialEq)]
pub struct Reindexed {
    pub vector: FeatureVector,
    /// Expected columns that were absent and filled with zero.
    pub missing: Vec<String>,
    /// Columns present in the input but not expected.
    pub dropped: Vec<String>,
}

impl Reindexed {
    pub fn was_degraded(&self) -> bool {
        !self.missing.is_empty() || !self.dropped.is_empty()
    }
}

/// Aligns `vector` to `expected`, in `expected` order.
///
/// Under [`SchemaPolicy::FillZero`] a mismatch is logged and tolerated; the
/// zero-filled readings can yield a materially wrong prediction.
pub fn reindex(
    vector: &FeatureVector,
    expected: &[String],
    policy: SchemaPolicy,
) -> Result<Reindexed> {
    let missing: Vec<String> = expected
        .iter()
        .filter(|name| vector.get(name).is_none())
        .cloned()
        .collect();
    let dropped: Vec<String> = vector
        .names()
        .filter(|name| !expected.iter().any(|e| e.as_str() == *name))
        .map(str::to_owned)
        .collect();

    if !missing.is_empty() || !dropped.is_empty() {
        match policy {
            SchemaPolicy::Fail => {
                return Err(Error::incompatible_schema(
                    expected.join(", "),
                    vector.column_list(),
                    format!(
                        "missing [{}], unexpected [{}]",
                        missing.join(", "),
                        dropped.join(", ")
                    ),
                ));
            }
            SchemaPolicy::FillZero => {
                warn!(
                    missing = ?missing,
                    dropped = ?dropped,
                    "feature columns do not match the artifact; filling missing columns with zero"
                );
            }
        }
    }

    let aligned = expected
        .iter()
        .map(|name| (name.clone(), vector.get(name).unwrap_or(0.0)))
        .collect();

    Ok(Reindexed {
        vector: aligned,
        missing,
        dropped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn subset_is_filled_with_zero_in_expected_order() {
        let vector: FeatureVector = [("b", 2.0), ("d", 4.0)].into_iter().collect();
        let expected = names(&["a", "b", "c", "d"]);

        let out = reindex(&vector, &expected, SchemaPolicy::FillZero).unwrap();

        assert_eq!(out.vector.names().collect::<Vec<_>>(), vec!["a", "b", "c", "d"]);
        assert_eq!(out.vector.values().collect::<Vec<_>>(), vec![0.0, 2.0, 0.0, 4.0]);
        assert_eq!(out.missing, names(&["a", "c"]));
        assert!(out.dropped.is_empty());
        assert!(out.was_degraded());
    }

    #[test]
    fn matching_columns_are_reordered_without_degradation() {
        let vector: FeatureVector = [("y", 1.5), ("x", -3.0)].into_iter().collect();
        let out = reindex(&vector, &names(&["x", "y"]), SchemaPolicy::Fail).unwrap();
        assert_eq!(out.vector.values().collect::<Vec<_>>(), vec![-3.0, 1.5]);
        assert!(!out.was_degraded());
    }

    #[test]
    fn unexpected_columns_are_dropped() {
        let vector: FeatureVector = [("x", 1.0), ("extra", 9.0)].into_iter().collect();
        let out = reindex(&vector, &names(&["x"]), SchemaPolicy::FillZero).unwrap();
        assert_eq!(out.vector.len(), 1);
        assert_eq!(out.dropped, names(&["extra"]));
    }

    #[test]
    fn fail_policy_reports_incompatible_schema() {
        let vector: FeatureVector = [("x", 1.0)].into_iter().collect();
        let err = reindex(&vector, &names(&["x", "y"]), SchemaPolicy::Fail).unwrap_err();
        assert!(err.is_schema_error());
        assert!(err.to_string().contains("missing [y]"));
    }

    #[test]
    fn schema_vector_rejects_wrong_length() {
        assert!(FeatureSchema::WEATHER.vector(&[1.0, 2.0]).is_err());
        let v = FeatureSchema::ZONES.vector(&[1.0; 8]).unwrap();
        assert_eq!(v.get("Weekday"), Some(1.0));
    }

    #[test]
    fn policy_parses_from_cli_spelling() {
        assert_eq!("fill-zero".parse::<SchemaPolicy>().unwrap(), SchemaPolicy::FillZero);
        assert_eq!("fail".parse::<SchemaPolicy>().unwrap(), SchemaPolicy::Fail);
        assert!("ignore".parse::<SchemaPolicy>().is_err());
    }
}
