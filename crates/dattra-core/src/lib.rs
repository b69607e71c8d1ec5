//! Dattra Core Library
//!
//! Local-first AIH medical fee calculator: point-weighted fee splits for
//! hospital procedures, with a persistent calculation history and printable
//! reports.
//!
//! # Architecture
//!
//! ```text
//! Form fields (masked strings)
//!      │
//!      │  parse: currency / code / counts (failures coerce to zero)
//!      ▼
//! ProcedureInput ───────────────► engine::allocate ──► AllocationResult
//!      │                                                      │
//!      │ lines + principal code                               │
//!      └──► engine::allocate_multiple ──► AggregateResult     │
//!                    ▲                          │             │
//!        percentage table                       ▼             ▼
//!        (procedure_catalog)            ┌──────────────────────────┐
//!                                       │  HistoryEntry (uuid+ts)  │
//!                                       └────────────┬─────────────┘
//!                                                    │
//!                                    ┌───────────────┼───────────────┐
//!                                    ▼               ▼               ▼
//!                                 SQLite          HTML report     CSV export
//!                                 history         (printable)
//! ```
//!
//! # Core Principle
//!
//! **Reports never recompute.** Every figure a report shows comes from the
//! stored result record; monetary values stay unrounded until display.
//!
//! # Modules
//!
//! - [`engine`]: pure fee allocation (single procedure + multi-procedure)
//! - [`models`]: domain types (ProcedureInput, AllocationResult, etc.)
//! - [`parse`]: BRL currency, procedure-code mask, count coercion
//! - [`db`]: SQLite layer for the procedure catalog and history
//! - [`report`]: printable HTML report and CSV history export

pub mod db;
pub mod engine;
pub mod models;
pub mod parse;
pub mod report;

// Re-export commonly used types
pub use db::Database;
pub use engine::{allocate, allocate_multiple, PercentageLookup};
pub use models::{
    AggregateResult, AllocationResult, CalculationRecord, HistoryEntry, LineAllocation,
    ProcedureEntry, ProcedureInput, ProcedureLine,
};
pub use report::{history_to_csv, HtmlReportRenderer};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum DattraError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<db::DbError> for DattraError {
    fn from(e: db::DbError) -> Self {
        DattraError::DatabaseError(e.to_string())
    }
}

impl From<serde_json::Error> for DattraError {
    fn from(e: serde_json::Error) -> Self {
        DattraError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for DattraError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        DattraError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<DattraCore>, DattraError> {
    let db = Database::open(&path)?;
    Ok(Arc::new(DattraCore {
        db: Arc::new(Mutex::new(db)),
    }))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<DattraCore>, DattraError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(DattraCore {
        db: Arc::new(Mutex::new(db)),
    }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe database wrapper for FFI.
#[derive(uniffi::Object)]
pub struct DattraCore {
    db: Arc<Mutex<Database>>,
}

#[uniffi::export]
impl DattraCore {
    // =========================================================================
    // Catalog Operations
    // =========================================================================

    /// Add or update a catalog procedure.
    pub fn upsert_procedure(&self, entry: FfiProcedureEntry) -> Result<(), DattraError> {
        let db = self.db.lock()?;
        let entry: ProcedureEntry = entry.into();
        db.upsert_procedure(&entry)?;
        Ok(())
    }

    /// Get a procedure by its masked code.
    pub fn get_procedure(&self, code: String) -> Result<Option<FfiProcedureEntry>, DattraError> {
        let db = self.db.lock()?;
        let entry = db.get_procedure(&code)?;
        Ok(entry.map(|e| e.into()))
    }

    /// Search active procedures by code or description prefix.
    pub fn search_procedures(
        &self,
        query: String,
        limit: u32,
    ) -> Result<Vec<FfiProcedureEntry>, DattraError> {
        let db = self.db.lock()?;
        let entries = db.search_procedures(&query, limit as usize)?;
        Ok(entries.into_iter().map(|e| e.into()).collect())
    }

    // =========================================================================
    // Calculation Operations
    // =========================================================================

    /// Compute a single-procedure fee split and save it to the history.
    pub fn calculate_procedure(
        &self,
        form: FfiProcedureForm,
    ) -> Result<FfiHistoryEntry, DattraError> {
        let input: ProcedureInput = form.into();
        log::debug!("calculating single procedure {}", input.code);

        let result = engine::allocate(&input);
        let entry = HistoryEntry::new(CalculationRecord::Single(result));

        let db = self.db.lock()?;
        db.append_history_entry(&entry)?;
        Ok(entry.into())
    }

    /// Compute a multi-procedure fee split under a principal procedure and
    /// save it to the history.
    ///
    /// The principal procedure's percentage table is read from the catalog;
    /// unknown codes fall back to full SH on every line.
    pub fn calculate_multiple(
        &self,
        principal_code: String,
        lines: Vec<FfiProcedureLine>,
    ) -> Result<FfiHistoryEntry, DattraError> {
        if lines.is_empty() {
            return Err(DattraError::InvalidInput(
                "at least one procedure line is required".into(),
            ));
        }

        let lines: Vec<ProcedureLine> = lines
            .into_iter()
            .enumerate()
            .map(|(i, line)| ProcedureLine::new((i + 1) as u32, line.description, line.form.into()))
            .collect();

        let db = self.db.lock()?;
        log::debug!(
            "calculating {} lines under principal {}",
            lines.len(),
            principal_code
        );
        let result = engine::allocate_multiple(&principal_code, &lines, &*db);
        let entry = HistoryEntry::new(CalculationRecord::Multiple(result));

        db.append_history_entry(&entry)?;
        Ok(entry.into())
    }

    // =========================================================================
    // History Operations
    // =========================================================================

    /// All saved calculations, most recent first.
    pub fn history_entries(&self) -> Result<Vec<FfiHistoryEntry>, DattraError> {
        let db = self.db.lock()?;
        let entries = db.list_history_entries()?;
        Ok(entries.into_iter().map(|e| e.into()).collect())
    }

    /// Get one saved calculation by ID.
    pub fn get_history_entry(
        &self,
        entry_id: String,
    ) -> Result<Option<FfiHistoryEntry>, DattraError> {
        let db = self.db.lock()?;
        let entry = db.get_history_entry(&entry_id)?;
        Ok(entry.map(|e| e.into()))
    }

    /// Delete the whole history, returning how many entries were removed.
    pub fn clear_history(&self) -> Result<u64, DattraError> {
        let db = self.db.lock()?;
        Ok(db.clear_history()?)
    }

    // =========================================================================
    // Report Operations
    // =========================================================================

    /// Render the printable HTML report for a saved calculation.
    pub fn report_html(&self, entry_id: String) -> Result<String, DattraError> {
        let db = self.db.lock()?;
        let entry = db
            .get_history_entry(&entry_id)?
            .ok_or_else(|| DattraError::NotFound(entry_id))?;
        Ok(HtmlReportRenderer::new().render(&entry))
    }

    /// Export the whole history as CSV.
    pub fn export_history_csv(&self) -> Result<String, DattraError> {
        let db = self.db.lock()?;
        let entries = db.list_history_entries()?;
        Ok(history_to_csv(&entries))
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe catalog procedure.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiProcedureEntry {
    pub code: String,
    pub description: String,
    pub line_percents: Vec<f64>,
    pub suggested_assistants: u8,
    pub active: bool,
}

impl From<ProcedureEntry> for FfiProcedureEntry {
    fn from(entry: ProcedureEntry) -> Self {
        Self {
            code: entry.code,
            description: entry.description,
            line_percents: entry.line_percents,
            suggested_assistants: entry.suggested_assistants,
            active: entry.active,
        }
    }
}

impl From<FfiProcedureEntry> for ProcedureEntry {
    fn from(entry: FfiProcedureEntry) -> Self {
        ProcedureEntry {
            code: entry.code,
            description: entry.description,
            line_percents: entry.line_percents,
            suggested_assistants: entry.suggested_assistants,
            active: entry.active,
        }
    }
}

/// FFI-safe procedure form, fields exactly as a masked UI produces them.
///
/// Monetary fields accept BRL masks ("R$ 1.234,56") or plain numbers;
/// count fields are digit strings. Unreadable values coerce to zero, the
/// assistant count is clamped to the billing maximum.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiProcedureForm {
    pub code: String,
    pub point_count: String,
    pub value_sp: String,
    pub value_sh: String,
    pub value_tsp: String,
    pub surcharge_percent: String,
    pub assistant_count: String,
    pub anesthesia_enabled: bool,
}

impl From<FfiProcedureForm> for ProcedureInput {
    fn from(form: FfiProcedureForm) -> Self {
        ProcedureInput {
            code: parse::format_procedure_code(&form.code),
            point_count: parse::parse_count(&form.point_count),
            value_sp: parse::parse_brl(&form.value_sp),
            value_sh: parse::parse_brl(&form.value_sh),
            value_tsp: parse::parse_brl(&form.value_tsp),
            surcharge_percent: parse::parse_count(&form.surcharge_percent),
            assistant_count: parse::parse_count(&form.assistant_count)
                .min(u32::from(models::MAX_ASSISTANTS)) as u8,
            anesthesia_enabled: form.anesthesia_enabled,
        }
    }
}

/// FFI-safe multi-procedure line.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiProcedureLine {
    pub description: String,
    pub form: FfiProcedureForm,
}

/// FFI-safe allocation result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAllocationResult {
    pub code: String,
    pub point_count: u32,
    pub value_sp: f64,
    pub value_sh: f64,
    pub value_tsp: f64,
    pub surcharge_percent: u32,
    pub assistant_count: u8,
    pub anesthesia_enabled: bool,
    pub adjusted_value_sh: f64,
    pub adjusted_value_sp: f64,
    pub anesthesia_value: f64,
    pub pool_value: f64,
    pub point_value: f64,
    pub surgeon_value: f64,
    pub first_assistant_value: f64,
    pub second_assistant_value: f64,
    pub third_assistant_value: f64,
    pub fourth_assistant_value: f64,
    pub fifth_assistant_value: f64,
    pub total_points: f64,
    pub total_procedure_value: f64,
}

impl From<AllocationResult> for FfiAllocationResult {
    fn from(result: AllocationResult) -> Self {
        Self {
            code: result.code,
            point_count: result.point_count,
            value_sp: result.value_sp,
            value_sh: result.value_sh,
            value_tsp: result.value_tsp,
            surcharge_percent: result.surcharge_percent,
            assistant_count: result.assistant_count,
            anesthesia_enabled: result.anesthesia_enabled,
            adjusted_value_sh: result.adjusted_value_sh,
            adjusted_value_sp: result.adjusted_value_sp,
            anesthesia_value: result.anesthesia_value,
            pool_value: result.pool_value,
            point_value: result.point_value,
            surgeon_value: result.surgeon_value,
            first_assistant_value: result.first_assistant_value,
            second_assistant_value: result.second_assistant_value,
            third_assistant_value: result.third_assistant_value,
            fourth_assistant_value: result.fourth_assistant_value,
            fifth_assistant_value: result.fifth_assistant_value,
            total_points: result.total_points,
            total_procedure_value: result.total_procedure_value,
        }
    }
}

/// FFI-safe computed line of a multi-procedure calculation.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiLineAllocation {
    pub line_number: u32,
    pub sh_percent: Option<f64>,
    pub description: String,
    pub allocation: FfiAllocationResult,
}

impl From<LineAllocation> for FfiLineAllocation {
    fn from(line: LineAllocation) -> Self {
        Self {
            line_number: line.line_number,
            sh_percent: line.sh_percent,
            description: line.description,
            allocation: line.allocation.into(),
        }
    }
}

/// FFI-safe aggregate totals.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAggregateTotals {
    pub adjusted_value_sh: f64,
    pub value_tsp: f64,
    pub adjusted_value_sp: f64,
    pub anesthesia_value: f64,
    pub pool_value: f64,
    pub surgeon_value: f64,
    pub first_assistant_value: f64,
    pub second_assistant_value: f64,
    pub third_assistant_value: f64,
    pub fourth_assistant_value: f64,
    pub fifth_assistant_value: f64,
    pub total_points: f64,
    pub total_procedure_value: f64,
}

impl From<models::AggregateTotals> for FfiAggregateTotals {
    fn from(totals: models::AggregateTotals) -> Self {
        Self {
            adjusted_value_sh: totals.adjusted_value_sh,
            value_tsp: totals.value_tsp,
            adjusted_value_sp: totals.adjusted_value_sp,
            anesthesia_value: totals.anesthesia_value,
            pool_value: totals.pool_value,
            surgeon_value: totals.surgeon_value,
            first_assistant_value: totals.first_assistant_value,
            second_assistant_value: totals.second_assistant_value,
            third_assistant_value: totals.third_assistant_value,
            fourth_assistant_value: totals.fourth_assistant_value,
            fifth_assistant_value: totals.fifth_assistant_value,
            total_points: totals.total_points,
            total_procedure_value: totals.total_procedure_value,
        }
    }
}

/// FFI-safe aggregate result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAggregateResult {
    pub principal_code: String,
    pub lines: Vec<FfiLineAllocation>,
    pub totals: FfiAggregateTotals,
    pub mean_point_count: f64,
    pub mean_surcharge_percent: f64,
    pub mean_assistant_count: f64,
    pub anesthesia_enabled: bool,
}

impl From<AggregateResult> for FfiAggregateResult {
    fn from(result: AggregateResult) -> Self {
        Self {
            principal_code: result.principal_code,
            lines: result.lines.into_iter().map(|l| l.into()).collect(),
            totals: result.totals.into(),
            mean_point_count: result.mean_point_count,
            mean_surcharge_percent: result.mean_surcharge_percent,
            mean_assistant_count: result.mean_assistant_count,
            anesthesia_enabled: result.anesthesia_enabled,
        }
    }
}

/// FFI-safe calculation record.
#[derive(Debug, Clone, uniffi::Enum)]
pub enum FfiCalculationRecord {
    Single { result: FfiAllocationResult },
    Multiple { result: FfiAggregateResult },
}

impl From<CalculationRecord> for FfiCalculationRecord {
    fn from(record: CalculationRecord) -> Self {
        match record {
            CalculationRecord::Single(result) => FfiCalculationRecord::Single {
                result: result.into(),
            },
            CalculationRecord::Multiple(result) => FfiCalculationRecord::Multiple {
                result: result.into(),
            },
        }
    }
}

/// FFI-safe history entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiHistoryEntry {
    pub entry_id: String,
    pub created_at: String,
    pub record: FfiCalculationRecord,
}

impl From<HistoryEntry> for FfiHistoryEntry {
    fn from(entry: HistoryEntry) -> Self {
        Self {
            entry_id: entry.entry_id,
            created_at: entry.created_at,
            record: entry.record.into(),
        }
    }
}
