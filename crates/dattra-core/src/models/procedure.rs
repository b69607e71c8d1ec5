//! Procedure input models.

use serde::{Deserialize, Serialize};

/// Maximum number of assistant surgeons a procedure may bill for.
pub const MAX_ASSISTANTS: u8 = 5;

/// Raw inputs for one billable procedure.
///
/// Monetary fields are already-parsed decimal amounts (see [`crate::parse`]
/// for the BRL string coercion); the engine never sees a currency mask.
/// The procedure code is treated as an opaque identifier here. Masking and
/// validation also live in [`crate::parse`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcedureInput {
    /// SUS procedure code, display-masked `xx.xx.xx.xxx-x`
    pub code: String,
    /// Billing points ("pontos") for the procedure
    pub point_count: u32,
    /// Professional service fee base (SP), the pool split by points
    pub value_sp: f64,
    /// Hospital service fee base (SH)
    pub value_sh: f64,
    /// Ancillary fee component, never surcharged or point-split
    pub value_tsp: f64,
    /// Surcharge ("incremento") percentage, 0 = disabled
    pub surcharge_percent: u32,
    /// Assistant surgeons present, 0 to [`MAX_ASSISTANTS`]
    pub assistant_count: u8,
    /// Whether the anesthesiologist share is carved out of SP
    pub anesthesia_enabled: bool,
}

impl ProcedureInput {
    /// Create an input for a code with everything else zeroed/disabled.
    pub fn new(code: String) -> Self {
        Self {
            code,
            point_count: 0,
            value_sp: 0.0,
            value_sh: 0.0,
            value_tsp: 0.0,
            surcharge_percent: 0,
            assistant_count: 0,
            anesthesia_enabled: false,
        }
    }

    /// Assistant count clamped to the billing maximum.
    pub fn clamped_assistants(&self) -> u8 {
        self.assistant_count.min(MAX_ASSISTANTS)
    }
}

/// One line of a multi-procedure calculation.
///
/// `line_index` is the 1-based display position. The aggregation engine
/// derives the percentage-table row from slice order and re-normalizes this
/// field on output, so a reordered line can never disagree with the
/// percentage row applied to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcedureLine {
    /// 1-based display position
    pub line_index: u32,
    /// Catalog description, display-only
    pub description: String,
    /// The line's procedure inputs
    pub input: ProcedureInput,
}

impl ProcedureLine {
    /// Create a line at a 1-based position.
    pub fn new(line_index: u32, description: String, input: ProcedureInput) -> Self {
        Self {
            line_index,
            description,
            input,
        }
    }
}
