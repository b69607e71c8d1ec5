//! Multi-procedure aggregation.
//!
//! Each line is a full procedure of its own; the principal procedure only
//! contributes the percentage table that scales each line's SH value. SP is
//! never percentage-scaled, only SH. Lines beyond the configured table keep
//! their full SH (fallback, not an error).

use crate::models::{
    AggregateResult, AggregateTotals, AllocationResult, LineAllocation, ProcedureLine,
};

use super::allocation::allocate;
use super::PercentageLookup;

/// Compute every line under a principal procedure and sum the results.
///
/// Callers must pass at least one line; the engine does not guard against
/// an empty slice (the facade validates before invoking). Lines are
/// evaluated in slice order, and the percentage row applied to each line is
/// its slice position; `line_number` on the output is normalized to that
/// same order.
pub fn allocate_multiple(
    principal_code: &str,
    lines: &[ProcedureLine],
    lookup: &dyn PercentageLookup,
) -> AggregateResult {
    let percents = lookup.line_percents(principal_code);

    let line_results: Vec<LineAllocation> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let sh_percent = percents.get(i).copied();
            let mut scaled = line.input.clone();
            if let Some(percent) = sh_percent {
                scaled.value_sh *= percent / 100.0;
            }

            LineAllocation {
                line_number: (i + 1) as u32,
                sh_percent,
                description: line.description.clone(),
                allocation: allocate(&scaled),
            }
        })
        .collect();

    let totals = sum_totals(line_results.iter().map(|line| &line.allocation));

    let count = lines.len() as f64;
    let mean_point_count = lines
        .iter()
        .map(|l| f64::from(l.input.point_count))
        .sum::<f64>()
        / count;
    let mean_surcharge_percent = lines
        .iter()
        .map(|l| f64::from(l.input.surcharge_percent))
        .sum::<f64>()
        / count;
    let mean_assistant_count = lines
        .iter()
        .map(|l| f64::from(l.input.clamped_assistants()))
        .sum::<f64>()
        / count;
    let anesthesia_enabled = lines.iter().any(|l| l.input.anesthesia_enabled);

    AggregateResult {
        principal_code: principal_code.to_string(),
        lines: line_results,
        totals,
        mean_point_count,
        mean_surcharge_percent,
        mean_assistant_count,
        anesthesia_enabled,
    }
}

/// Sum the monetary fields of every line allocation.
fn sum_totals<'a>(allocations: impl Iterator<Item = &'a AllocationResult>) -> AggregateTotals {
    let mut totals = AggregateTotals::default();
    for allocation in allocations {
        totals.adjusted_value_sh += allocation.adjusted_value_sh;
        totals.value_tsp += allocation.value_tsp;
        totals.adjusted_value_sp += allocation.adjusted_value_sp;
        totals.anesthesia_value += allocation.anesthesia_value;
        totals.pool_value += allocation.pool_value;
        totals.surgeon_value += allocation.surgeon_value;
        totals.first_assistant_value += allocation.first_assistant_value;
        totals.second_assistant_value += allocation.second_assistant_value;
        totals.third_assistant_value += allocation.third_assistant_value;
        totals.fourth_assistant_value += allocation.fourth_assistant_value;
        totals.fifth_assistant_value += allocation.fifth_assistant_value;
        totals.total_points += allocation.total_points;
        totals.total_procedure_value += allocation.total_procedure_value;
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProcedureInput;
    use std::collections::HashMap;

    const EPSILON: f64 = 1e-9;

    fn make_line(line_index: u32, value_sh: f64) -> ProcedureLine {
        let mut input = ProcedureInput::new(format!("04.08.05.06{}-8", line_index));
        input.point_count = 100;
        input.value_sp = 1000.0;
        input.value_sh = value_sh;
        ProcedureLine::new(line_index, format!("Linha {}", line_index), input)
    }

    fn make_table(percents: Vec<f64>) -> HashMap<String, Vec<f64>> {
        HashMap::from([("04.08.05.061-8".to_string(), percents)])
    }

    #[test]
    fn test_sh_scaled_per_line_sp_untouched() {
        let table = make_table(vec![70.0, 30.0]);
        let lines = vec![make_line(1, 1000.0), make_line(2, 1000.0)];

        let result = allocate_multiple("04.08.05.061-8", &lines, &table);

        assert!((result.lines[0].allocation.value_sh - 700.0).abs() < EPSILON);
        assert!((result.lines[1].allocation.value_sh - 300.0).abs() < EPSILON);
        assert!((result.totals.adjusted_value_sh - 1000.0).abs() < EPSILON);
        // SP is never percentage-scaled
        assert_eq!(result.lines[0].allocation.value_sp, 1000.0);
        assert_eq!(result.lines[1].allocation.value_sp, 1000.0);
        assert!((result.totals.adjusted_value_sp - 2000.0).abs() < EPSILON);
    }

    #[test]
    fn test_unknown_principal_uses_full_sh() {
        let table = make_table(vec![70.0, 30.0]);
        let lines = vec![make_line(1, 1000.0), make_line(2, 800.0)];

        let result = allocate_multiple("00.00.00.000-0", &lines, &table);

        assert_eq!(result.lines[0].sh_percent, None);
        assert_eq!(result.lines[1].sh_percent, None);
        assert!((result.totals.adjusted_value_sh - 1800.0).abs() < EPSILON);
    }

    #[test]
    fn test_line_beyond_table_uses_full_sh() {
        let table = make_table(vec![70.0]);
        let lines = vec![make_line(1, 1000.0), make_line(2, 1000.0)];

        let result = allocate_multiple("04.08.05.061-8", &lines, &table);

        assert_eq!(result.lines[0].sh_percent, Some(70.0));
        assert_eq!(result.lines[1].sh_percent, None);
        assert!((result.totals.adjusted_value_sh - 1700.0).abs() < EPSILON);
    }

    #[test]
    fn test_aggregate_total_is_sum_of_line_totals() {
        let table = make_table(vec![100.0, 70.0, 50.0]);
        let lines = vec![
            make_line(1, 1000.0),
            make_line(2, 800.0),
            make_line(3, 600.0),
        ];

        let result = allocate_multiple("04.08.05.061-8", &lines, &table);

        let line_sum: f64 = result
            .lines
            .iter()
            .map(|l| l.allocation.total_procedure_value)
            .sum();
        assert!((result.totals.total_procedure_value - line_sum).abs() < EPSILON);
    }

    #[test]
    fn test_line_numbers_follow_evaluation_order() {
        let table = make_table(vec![70.0, 30.0]);
        // Stale display indexes on input do not survive
        let lines = vec![make_line(5, 1000.0), make_line(9, 1000.0)];

        let result = allocate_multiple("04.08.05.061-8", &lines, &table);

        assert_eq!(result.lines[0].line_number, 1);
        assert_eq!(result.lines[1].line_number, 2);
        assert_eq!(result.lines[0].sh_percent, Some(70.0));
    }

    #[test]
    fn test_display_means_and_anesthesia_flag() {
        let table = make_table(vec![70.0, 30.0]);
        let mut first = make_line(1, 1000.0);
        first.input.point_count = 100;
        first.input.surcharge_percent = 10;
        first.input.assistant_count = 2;
        let mut second = make_line(2, 1000.0);
        second.input.point_count = 50;
        second.input.anesthesia_enabled = true;

        let result = allocate_multiple("04.08.05.061-8", &[first, second], &table);

        assert!((result.mean_point_count - 75.0).abs() < EPSILON);
        assert!((result.mean_surcharge_percent - 5.0).abs() < EPSILON);
        assert!((result.mean_assistant_count - 1.0).abs() < EPSILON);
        assert!(result.anesthesia_enabled);
    }
}
