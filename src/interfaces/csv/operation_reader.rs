use crate::domain::duration::parse_duration;
use crate::error::{EconomyError, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Credit,
    Pay,
    Claim,
}

/// One row of an operations CSV: `op, user, target, amount, at`.
///
/// `target` is the recipient for `pay`; `amount` is required for `credit`
/// and `pay`; `at` carries the claim time for `claim` rows.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct Operation {
    pub op: OperationType,
    pub user: String,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub at: Option<String>,
}

impl Operation {
    /// Resolves the row's `at` field to a concrete timestamp.
    ///
    /// Accepts an RFC 3339 timestamp or a relative offset from `base` in the
    /// compact duration format (`"25h"`). An absent field means `base`
    /// itself.
    pub fn resolve_at(&self, base: DateTime<Utc>) -> Result<DateTime<Utc>> {
        match self.at.as_deref() {
            None | Some("") => Ok(base),
            Some(raw) => {
                if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
                    return Ok(timestamp.with_timezone(&Utc));
                }
                parse_duration(raw).map(|offset| base + offset).ok_or_else(|| {
                    EconomyError::ValidationError(format!(
                        "Invalid timestamp or offset: {raw}"
                    ))
                })
            }
        }
    }
}

/// Reads economy operations from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over
/// `Result<Operation>`. It handles whitespace trimming and flexible record
/// lengths automatically.
pub struct OperationReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> OperationReader<R> {
    /// Creates a new `OperationReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes operations.
    pub fn operations(self) -> impl Iterator<Item = Result<Operation>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(EconomyError::from))
    }
}
