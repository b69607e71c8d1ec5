//! Fee allocation engine.
//!
//! Pipeline: parsed inputs → surcharge uplift → anesthesia carve-out →
//! point-weighted split → per-role values (→ aggregation across lines).
//!
//! Everything in this module is pure, synchronous, and infallible: inputs
//! are coerced upstream ([`crate::parse`]) and the only runtime hazard,
//! dividing by a zero point total, is guarded explicitly. Invocations share
//! no state and may run concurrently.

mod aggregation;
mod allocation;

pub use aggregation::*;
pub use allocation::*;

use std::collections::HashMap;

/// Source of per-line SH percentages for a principal procedure.
///
/// Implementations return the ordered positive percentages configured for
/// the code, or an empty list when the code is unknown. The engine treats
/// the lookup as read-only injected data.
pub trait PercentageLookup {
    /// Ordered per-line SH percentages for `principal_code`.
    fn line_percents(&self, principal_code: &str) -> Vec<f64>;
}

/// Plain-map lookup, useful for tests and embedders without a catalog.
impl PercentageLookup for HashMap<String, Vec<f64>> {
    fn line_percents(&self, principal_code: &str) -> Vec<f64> {
        self.get(principal_code).cloned().unwrap_or_default()
    }
}
