//! Computed allocation results.

use serde::{Deserialize, Serialize};

/// The point-weighted fee split for a single procedure.
///
/// Produced by [`crate::engine::allocate`]; immutable once computed. All
/// monetary values are unrounded f64; rounding happens at display time only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AllocationResult {
    /// Echoed procedure code
    pub code: String,
    /// Echoed point count
    pub point_count: u32,
    /// Echoed SP base value (pre-surcharge)
    pub value_sp: f64,
    /// Echoed SH base value (pre-surcharge, post percentage-scaling in the
    /// multi-procedure path)
    pub value_sh: f64,
    /// Echoed TSP value
    pub value_tsp: f64,
    /// Echoed surcharge percentage
    pub surcharge_percent: u32,
    /// Echoed assistant count (clamped)
    pub assistant_count: u8,
    /// Echoed anesthesia flag
    pub anesthesia_enabled: bool,

    /// SH after the surcharge uplift
    pub adjusted_value_sh: f64,
    /// SP after the surcharge uplift
    pub adjusted_value_sp: f64,
    /// Anesthesiologist share carved out of adjusted SP
    pub anesthesia_value: f64,
    /// Amount distributed by points (adjusted SP minus anesthesia)
    pub pool_value: f64,
    /// Monetary value of one point (0 when there are no points)
    pub point_value: f64,

    /// Surgeon share of the pool
    pub surgeon_value: f64,
    /// First assistant share
    pub first_assistant_value: f64,
    /// Second assistant share
    pub second_assistant_value: f64,
    /// Third assistant share
    pub third_assistant_value: f64,
    /// Fourth assistant share
    pub fourth_assistant_value: f64,
    /// Fifth assistant share
    pub fifth_assistant_value: f64,

    /// Sum of all role point weights
    pub total_points: f64,
    /// Adjusted SH + TSP + adjusted SP
    pub total_procedure_value: f64,
}

impl AllocationResult {
    /// Sum of all five assistant shares.
    pub fn assistant_total(&self) -> f64 {
        self.first_assistant_value + self.second_to_fifth_assistant_value()
    }

    /// Sum of the 2nd through 5th assistant shares (reported as one group).
    pub fn second_to_fifth_assistant_value(&self) -> f64 {
        self.second_assistant_value
            + self.third_assistant_value
            + self.fourth_assistant_value
            + self.fifth_assistant_value
    }
}

/// One computed line of a multi-procedure calculation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineAllocation {
    /// 1-based line position, normalized to evaluation order
    pub line_number: u32,
    /// SH percentage applied from the principal procedure's table, `None`
    /// when the position has no configured row (full SH used)
    pub sh_percent: Option<f64>,
    /// Catalog description, display-only
    pub description: String,
    /// The line's full allocation
    pub allocation: AllocationResult,
}

/// Summed monetary fields across every line of a multi-procedure calculation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AggregateTotals {
    /// Summed post-surcharge SH
    pub adjusted_value_sh: f64,
    /// Summed TSP
    pub value_tsp: f64,
    /// Summed post-surcharge SP
    pub adjusted_value_sp: f64,
    /// Summed anesthesiologist shares
    pub anesthesia_value: f64,
    /// Summed point pools
    pub pool_value: f64,
    /// Summed surgeon shares
    pub surgeon_value: f64,
    /// Summed first assistant shares
    pub first_assistant_value: f64,
    /// Summed second assistant shares
    pub second_assistant_value: f64,
    /// Summed third assistant shares
    pub third_assistant_value: f64,
    /// Summed fourth assistant shares
    pub fourth_assistant_value: f64,
    /// Summed fifth assistant shares
    pub fifth_assistant_value: f64,
    /// Summed role point weights
    pub total_points: f64,
    /// Summed per-line totals (== summed SH + TSP + SP)
    pub total_procedure_value: f64,
}

impl AggregateTotals {
    /// Sum of the 2nd through 5th assistant shares (reported as one group).
    pub fn second_to_fifth_assistant_value(&self) -> f64 {
        self.second_assistant_value
            + self.third_assistant_value
            + self.fourth_assistant_value
            + self.fifth_assistant_value
    }
}

/// A completed multi-procedure calculation.
///
/// The mean fields are display conveniences with no downstream computational
/// use; consumers must not feed them back into any calculation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AggregateResult {
    /// Principal procedure code governing the percentage table
    pub principal_code: String,
    /// Per-line results in evaluation order
    pub lines: Vec<LineAllocation>,
    /// Summed monetary fields
    pub totals: AggregateTotals,
    /// Arithmetic mean of line point counts
    pub mean_point_count: f64,
    /// Arithmetic mean of line surcharge percentages
    pub mean_surcharge_percent: f64,
    /// Arithmetic mean of line assistant counts
    pub mean_assistant_count: f64,
    /// True when any line includes the anesthesiologist share
    pub anesthesia_enabled: bool,
}
