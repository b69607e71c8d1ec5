//! Report rendering for completed calculations.
//!
//! Renderers are read-only consumers: every monetary figure they print
//! comes from fields already present in the record, never from a fresh
//! computation.

mod csv;
mod html;

pub use csv::*;
pub use html::*;
