//! Procedure catalog models.

use serde::{Deserialize, Serialize};

/// A SUS procedure known to the catalog.
///
/// The `line_percents` entries are the per-line SH percentage shares a
/// principal procedure grants when it heads a multi-procedure calculation
/// (row 1 for line 1, and so on). Zero rows mean "line not billable" and
/// are filtered by [`ProcedureEntry::effective_percents`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcedureEntry {
    /// Procedure code, display-masked `xx.xx.xx.xxx-x`
    pub code: String,
    /// Official procedure description
    pub description: String,
    /// Per-line SH percentages, zeros allowed
    pub line_percents: Vec<f64>,
    /// Assistant surgeons the fee table suggests for this procedure
    pub suggested_assistants: u8,
    /// Whether this procedure is selectable
    pub active: bool,
}

impl ProcedureEntry {
    /// Create an active entry with an empty percentage table.
    pub fn new(code: String, description: String) -> Self {
        Self {
            code,
            description,
            line_percents: Vec::new(),
            suggested_assistants: 0,
            active: true,
        }
    }

    /// Positive percentages in row order, zeros dropped.
    pub fn effective_percents(&self) -> Vec<f64> {
        self.line_percents
            .iter()
            .copied()
            .filter(|p| *p > 0.0)
            .collect()
    }

    /// How many lines a multi-procedure calculation headed by this
    /// procedure may carry.
    pub fn max_lines(&self) -> usize {
        self.effective_percents().len()
    }
}
