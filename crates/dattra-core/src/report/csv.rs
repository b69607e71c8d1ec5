//! CSV export of the calculation history.

use crate::models::{CalculationRecord, HistoryEntry};

/// Export a history listing to CSV, one row per saved calculation.
///
/// Multi-procedure entries report their aggregate totals; per-line detail
/// stays in the HTML report.
pub fn history_to_csv(entries: &[HistoryEntry]) -> String {
    let mut csv = String::new();

    // Header
    csv.push_str(
        "entry_id,created_at,kind,principal_code,total_points,value_sh,value_tsp,value_sp,\
         anesthesia_value,surgeon_value,first_assistant_value,assistants_2_to_5_value,total_value\n",
    );

    // Lines
    for entry in entries {
        let (total_points, sh, tsp, sp, anesthesia, surgeon, first, second_to_fifth) =
            match &entry.record {
                CalculationRecord::Single(result) => (
                    result.total_points,
                    result.adjusted_value_sh,
                    result.value_tsp,
                    result.adjusted_value_sp,
                    result.anesthesia_value,
                    result.surgeon_value,
                    result.first_assistant_value,
                    result.second_to_fifth_assistant_value(),
                ),
                CalculationRecord::Multiple(result) => (
                    result.totals.total_points,
                    result.totals.adjusted_value_sh,
                    result.totals.value_tsp,
                    result.totals.adjusted_value_sp,
                    result.totals.anesthesia_value,
                    result.totals.surgeon_value,
                    result.totals.first_assistant_value,
                    result.totals.second_to_fifth_assistant_value(),
                ),
            };

        csv.push_str(&format!(
            "{},{},{},{},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}\n",
            escape_csv(&entry.entry_id),
            escape_csv(&entry.created_at),
            entry.record.kind(),
            escape_csv(entry.record.principal_code()),
            total_points,
            sh,
            tsp,
            sp,
            anesthesia,
            surgeon,
            first,
            second_to_fifth,
            entry.record.total_value(),
        ));
    }

    csv
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::allocate;
    use crate::models::ProcedureInput;

    fn make_entry() -> HistoryEntry {
        let mut input = ProcedureInput::new("04.08.05.061-8".into());
        input.point_count = 100;
        input.value_sp = 1000.0;
        input.value_sh = 500.0;
        HistoryEntry::new(CalculationRecord::Single(allocate(&input)))
    }

    #[test]
    fn test_csv_header_and_rows() {
        let entries = vec![make_entry(), make_entry()];
        let csv = history_to_csv(&entries);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3); // Header + 2 entries
        assert!(lines[0].starts_with("entry_id,created_at,kind"));
        assert!(lines[1].contains("single"));
        assert!(lines[1].contains("04.08.05.061-8"));
        assert!(lines[1].contains("1500.00"));
    }

    #[test]
    fn test_csv_empty_history() {
        let csv = history_to_csv(&[]);
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn test_csv_escaping() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
    }
}
