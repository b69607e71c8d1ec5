//! Calculation history database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{CalculationRecord, HistoryEntry};

impl Database {
    /// Append a calculation to the history.
    pub fn append_history_entry(&self, entry: &HistoryEntry) -> DbResult<()> {
        let record_json = serde_json::to_string(&entry.record)?;

        self.conn.execute(
            r#"
            INSERT INTO calculation_history (
                entry_id, kind, principal_code, total_value, record, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                entry.entry_id,
                entry.record.kind(),
                entry.record.principal_code(),
                entry.record.total_value(),
                record_json,
                entry.created_at,
            ],
        )?;
        Ok(())
    }

    /// Get a history entry by ID.
    pub fn get_history_entry(&self, entry_id: &str) -> DbResult<Option<HistoryEntry>> {
        self.conn
            .query_row(
                r#"
                SELECT entry_id, record, created_at
                FROM calculation_history
                WHERE entry_id = ?
                "#,
                [entry_id],
                |row| {
                    Ok(HistoryRow {
                        entry_id: row.get(0)?,
                        record: row.get(1)?,
                        created_at: row.get(2)?,
                    })
                },
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List all history entries, most recent first.
    pub fn list_history_entries(&self) -> DbResult<Vec<HistoryEntry>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT entry_id, record, created_at
            FROM calculation_history
            ORDER BY created_at DESC, rowid DESC
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(HistoryRow {
                entry_id: row.get(0)?,
                record: row.get(1)?,
                created_at: row.get(2)?,
            })
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?.try_into()?);
        }
        Ok(entries)
    }

    /// Number of saved calculations.
    pub fn count_history_entries(&self) -> DbResult<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM calculation_history", [], |row| {
                    row.get(0)
                })?;
        Ok(count as u64)
    }

    /// Delete one history entry.
    pub fn delete_history_entry(&self, entry_id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM calculation_history WHERE entry_id = ?", [entry_id])?;
        Ok(rows_affected > 0)
    }

    /// Delete the whole history, returning how many entries were removed.
    pub fn clear_history(&self) -> DbResult<u64> {
        let rows_affected = self.conn.execute("DELETE FROM calculation_history", [])?;
        Ok(rows_affected as u64)
    }
}

/// Intermediate row struct for database mapping.
struct HistoryRow {
    entry_id: String,
    record: String,
    created_at: String,
}

impl TryFrom<HistoryRow> for HistoryEntry {
    type Error = DbError;

    fn try_from(row: HistoryRow) -> Result<Self, Self::Error> {
        let record: CalculationRecord = serde_json::from_str(&row.record)?;
        Ok(HistoryEntry {
            entry_id: row.entry_id,
            created_at: row.created_at,
            record,
        })
    }
}
