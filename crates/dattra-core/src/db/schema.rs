//! SQLite schema definition.

/// Complete database schema for dattra.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Procedure Catalog
-- ============================================================================

CREATE TABLE IF NOT EXISTS procedure_catalog (
    code TEXT PRIMARY KEY,                        -- masked xx.xx.xx.xxx-x
    description TEXT NOT NULL,
    line_percents TEXT NOT NULL DEFAULT '[]',     -- JSON array of per-line SH percentages
    suggested_assistants INTEGER NOT NULL DEFAULT 0,
    active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_catalog_active ON procedure_catalog(active);
CREATE INDEX IF NOT EXISTS idx_catalog_description ON procedure_catalog(description);

-- ============================================================================
-- Calculation History (Append-Only, read most-recent-first)
-- ============================================================================

CREATE TABLE IF NOT EXISTS calculation_history (
    entry_id TEXT PRIMARY KEY,
    kind TEXT NOT NULL CHECK (kind IN ('single', 'multiple')),
    principal_code TEXT NOT NULL,
    total_value REAL NOT NULL,                   -- denormalized for listing
    record TEXT NOT NULL,                        -- JSON CalculationRecord
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_history_created ON calculation_history(created_at);
CREATE INDEX IF NOT EXISTS idx_history_kind ON calculation_history(kind);
"#;
