//! Procedure catalog database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::engine::PercentageLookup;
use crate::models::ProcedureEntry;

impl Database {
    /// Insert or update a catalog procedure.
    pub fn upsert_procedure(&self, entry: &ProcedureEntry) -> DbResult<()> {
        let percents_json = serde_json::to_string(&entry.line_percents)?;

        self.conn.execute(
            r#"
            INSERT INTO procedure_catalog (
                code, description, line_percents, suggested_assistants, active, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, datetime('now'))
            ON CONFLICT(code) DO UPDATE SET
                description = excluded.description,
                line_percents = excluded.line_percents,
                suggested_assistants = excluded.suggested_assistants,
                active = excluded.active,
                updated_at = datetime('now')
            "#,
            params![
                entry.code,
                entry.description,
                percents_json,
                entry.suggested_assistants,
                entry.active,
            ],
        )?;
        Ok(())
    }

    /// Get a procedure by its masked code.
    pub fn get_procedure(&self, code: &str) -> DbResult<Option<ProcedureEntry>> {
        let result = self
            .conn
            .query_row(
                r#"
                SELECT code, description, line_percents, suggested_assistants, active
                FROM procedure_catalog
                WHERE code = ?
                "#,
                [code],
                |row| {
                    Ok(ProcedureRow {
                        code: row.get(0)?,
                        description: row.get(1)?,
                        line_percents: row.get(2)?,
                        suggested_assistants: row.get(3)?,
                        active: row.get(4)?,
                    })
                },
            )
            .optional()?;

        result.map(|row| row.try_into()).transpose()
    }

    /// Search active procedures by code or description prefix.
    pub fn search_procedures(&self, query: &str, limit: usize) -> DbResult<Vec<ProcedureEntry>> {
        let pattern = format!("{}%", query);

        let mut stmt = self.conn.prepare(
            r#"
            SELECT code, description, line_percents, suggested_assistants, active
            FROM procedure_catalog
            WHERE active = 1
            AND (code LIKE ?1 OR description LIKE ?1)
            ORDER BY code
            LIMIT ?2
            "#,
        )?;

        let rows = stmt.query_map(params![pattern, limit as i64], |row| {
            Ok(ProcedureRow {
                code: row.get(0)?,
                description: row.get(1)?,
                line_percents: row.get(2)?,
                suggested_assistants: row.get(3)?,
                active: row.get(4)?,
            })
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?.try_into()?);
        }
        Ok(entries)
    }

    /// Get all catalog procedures.
    pub fn list_procedures(&self, active_only: bool) -> DbResult<Vec<ProcedureEntry>> {
        let sql = if active_only {
            r#"
            SELECT code, description, line_percents, suggested_assistants, active
            FROM procedure_catalog
            WHERE active = 1
            ORDER BY code
            "#
        } else {
            r#"
            SELECT code, description, line_percents, suggested_assistants, active
            FROM procedure_catalog
            ORDER BY code
            "#
        };

        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], |row| {
            Ok(ProcedureRow {
                code: row.get(0)?,
                description: row.get(1)?,
                line_percents: row.get(2)?,
                suggested_assistants: row.get(3)?,
                active: row.get(4)?,
            })
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?.try_into()?);
        }
        Ok(entries)
    }

    /// Delete a procedure.
    pub fn delete_procedure(&self, code: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM procedure_catalog WHERE code = ?", [code])?;
        Ok(rows_affected > 0)
    }

    /// Mark a procedure as inactive (soft delete).
    pub fn deactivate_procedure(&self, code: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE procedure_catalog SET active = 0, updated_at = datetime('now') WHERE code = ?",
            [code],
        )?;
        Ok(rows_affected > 0)
    }
}

/// The catalog is the production percentage source for multi-procedure
/// calculations: unknown codes and storage failures both resolve to an
/// empty table, which the engine treats as "full SH on every line".
impl PercentageLookup for Database {
    fn line_percents(&self, principal_code: &str) -> Vec<f64> {
        match self.get_procedure(principal_code) {
            Ok(Some(entry)) => entry.effective_percents(),
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("percentage lookup failed for {}: {}", principal_code, e);
                Vec::new()
            }
        }
    }
}

/// Intermediate row struct for database mapping.
struct ProcedureRow {
    code: String,
    description: String,
    line_percents: String,
    suggested_assistants: u8,
    active: bool,
}

impl TryFrom<ProcedureRow> for ProcedureEntry {
    type Error = DbError;

    fn try_from(row: ProcedureRow) -> Result<Self, Self::Error> {
        Ok(ProcedureEntry {
            code: row.code,
            description: row.description,
            line_percents: serde_json::from_str(&row.line_percents)?,
            suggested_assistants: row.suggested_assistants,
            active: row.active,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn make_entry(code: &str, description: &str) -> ProcedureEntry {
        let mut entry = ProcedureEntry::new(code.into(), description.into());
        entry.line_percents = vec![100.0, 70.0, 0.0, 0.0, 0.0];
        entry.suggested_assistants = 2;
        entry
    }

    #[test]
    fn test_upsert_and_get() {
        let db = setup_db();
        let entry = make_entry("04.08.05.061-8", "Artrodese de coluna");
        db.upsert_procedure(&entry).unwrap();

        let retrieved = db.get_procedure("04.08.05.061-8").unwrap().unwrap();
        assert_eq!(retrieved.description, "Artrodese de coluna");
        assert_eq!(retrieved.line_percents, vec![100.0, 70.0, 0.0, 0.0, 0.0]);
        assert_eq!(retrieved.suggested_assistants, 2);
    }

    #[test]
    fn test_upsert_updates() {
        let db = setup_db();
        let mut entry = make_entry("04.08.05.061-8", "Original");
        db.upsert_procedure(&entry).unwrap();

        entry.description = "Atualizada".into();
        entry.line_percents = vec![100.0, 50.0];
        db.upsert_procedure(&entry).unwrap();

        let retrieved = db.get_procedure("04.08.05.061-8").unwrap().unwrap();
        assert_eq!(retrieved.description, "Atualizada");
        assert_eq!(retrieved.line_percents, vec![100.0, 50.0]);
    }

    #[test]
    fn test_get_unknown_is_none() {
        let db = setup_db();
        assert!(db.get_procedure("00.00.00.000-0").unwrap().is_none());
    }

    #[test]
    fn test_search_by_code_prefix() {
        let db = setup_db();
        db.upsert_procedure(&make_entry("04.08.05.061-8", "Artrodese de coluna"))
            .unwrap();
        db.upsert_procedure(&make_entry("04.15.01.012-3", "Facectomia"))
            .unwrap();

        let results = db.search_procedures("04.08", 10).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].code, "04.08.05.061-8");

        let results = db.search_procedures("04.", 10).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_search_by_description_prefix() {
        let db = setup_db();
        db.upsert_procedure(&make_entry("04.15.01.012-3", "Facectomia"))
            .unwrap();

        let results = db.search_procedures("Face", 10).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_deactivate_hides_from_search() {
        let db = setup_db();
        db.upsert_procedure(&make_entry("04.08.05.061-8", "Artrodese de coluna"))
            .unwrap();

        db.deactivate_procedure("04.08.05.061-8").unwrap();

        assert!(db.search_procedures("04.08", 10).unwrap().is_empty());

        // Still retrievable directly
        let entry = db.get_procedure("04.08.05.061-8").unwrap().unwrap();
        assert!(!entry.active);
    }

    #[test]
    fn test_percentage_lookup_filters_zeros() {
        let db = setup_db();
        db.upsert_procedure(&make_entry("04.08.05.061-8", "Artrodese de coluna"))
            .unwrap();

        assert_eq!(db.line_percents("04.08.05.061-8"), vec![100.0, 70.0]);
        assert!(db.line_percents("00.00.00.000-0").is_empty());
    }
}
