//! Calculation history models.

use serde::{Deserialize, Serialize};

use super::allocation::{AggregateResult, AllocationResult};

/// A completed calculation, single-procedure or multi-procedure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum CalculationRecord {
    /// One procedure, one allocation
    Single(AllocationResult),
    /// Multiple chained lines under a principal procedure
    Multiple(AggregateResult),
}

impl CalculationRecord {
    /// Stable lowercase kind tag, also used as the history table column.
    pub fn kind(&self) -> &'static str {
        match self {
            CalculationRecord::Single(_) => "single",
            CalculationRecord::Multiple(_) => "multiple",
        }
    }

    /// The code shown for the whole calculation: the procedure code for a
    /// single calculation, the principal code for a multi-procedure one.
    pub fn principal_code(&self) -> &str {
        match self {
            CalculationRecord::Single(result) => &result.code,
            CalculationRecord::Multiple(result) => &result.principal_code,
        }
    }

    /// Grand total (SH + TSP + SP) of the calculation.
    pub fn total_value(&self) -> f64 {
        match self {
            CalculationRecord::Single(result) => result.total_procedure_value,
            CalculationRecord::Multiple(result) => result.totals.total_procedure_value,
        }
    }
}

/// One saved calculation in the history list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    /// Unique entry ID
    pub entry_id: String,
    /// Calculation timestamp (RFC3339)
    pub created_at: String,
    /// The computed record, immutable once stored
    pub record: CalculationRecord,
}

impl HistoryEntry {
    /// Wrap a freshly computed record, stamping id and timestamp.
    pub fn new(record: CalculationRecord) -> Self {
        Self {
            entry_id: uuid::Uuid::new_v4().to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            record,
        }
    }
}
