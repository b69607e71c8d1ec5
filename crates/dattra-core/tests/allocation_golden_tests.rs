//! Golden tests for the fee allocation engine.
//!
//! These tests verify the allocation arithmetic against known scenarios
//! from the AIH fee rules.

use std::collections::HashMap;

use dattra_core::engine::{allocate, allocate_multiple};
use dattra_core::models::{ProcedureInput, ProcedureLine};

const TOLERANCE: f64 = 0.01;

/// Single-procedure golden case.
struct GoldenCase {
    id: &'static str,
    point_count: u32,
    value_sp: f64,
    value_sh: f64,
    value_tsp: f64,
    surcharge_percent: u32,
    assistant_count: u8,
    anesthesia_enabled: bool,
    expected_adjusted_sh: f64,
    expected_adjusted_sp: f64,
    expected_anesthesia: f64,
    expected_pool: f64,
    expected_total_points: f64,
    expected_point_value: f64,
    expected_surgeon: f64,
    expected_first_assistant: f64,
    expected_total: f64,
}

fn get_golden_cases() -> Vec<GoldenCase> {
    vec![
        GoldenCase {
            id: "no-extras",
            point_count: 100,
            value_sp: 1000.0,
            value_sh: 500.0,
            value_tsp: 0.0,
            surcharge_percent: 0,
            assistant_count: 0,
            anesthesia_enabled: false,
            expected_adjusted_sh: 500.0,
            expected_adjusted_sp: 1000.0,
            expected_anesthesia: 0.0,
            expected_pool: 1000.0,
            expected_total_points: 100.0,
            expected_point_value: 10.0,
            expected_surgeon: 1000.0,
            expected_first_assistant: 0.0,
            expected_total: 1500.0,
        },
        GoldenCase {
            id: "anesthesia-one-assistant",
            point_count: 100,
            value_sp: 1000.0,
            value_sh: 500.0,
            value_tsp: 0.0,
            surcharge_percent: 0,
            assistant_count: 1,
            anesthesia_enabled: true,
            expected_adjusted_sh: 500.0,
            expected_adjusted_sp: 1000.0,
            expected_anesthesia: 300.0,
            expected_pool: 700.0,
            expected_total_points: 130.0,
            expected_point_value: 5.3846,
            expected_surgeon: 538.46,
            expected_first_assistant: 161.54,
            expected_total: 1500.0,
        },
        GoldenCase {
            id: "ten-percent-surcharge",
            point_count: 100,
            value_sp: 1000.0,
            value_sh: 500.0,
            value_tsp: 0.0,
            surcharge_percent: 10,
            assistant_count: 0,
            anesthesia_enabled: false,
            expected_adjusted_sh: 550.0,
            expected_adjusted_sp: 1100.0,
            expected_anesthesia: 0.0,
            expected_pool: 1100.0,
            expected_total_points: 100.0,
            expected_point_value: 11.0,
            expected_surgeon: 1100.0,
            expected_first_assistant: 0.0,
            expected_total: 1650.0,
        },
        GoldenCase {
            id: "tsp-rides-along-unsurcharged",
            point_count: 50,
            value_sp: 400.0,
            value_sh: 300.0,
            value_tsp: 150.0,
            surcharge_percent: 20,
            assistant_count: 0,
            anesthesia_enabled: false,
            expected_adjusted_sh: 360.0,
            expected_adjusted_sp: 480.0,
            expected_anesthesia: 0.0,
            expected_pool: 480.0,
            expected_total_points: 50.0,
            expected_point_value: 9.6,
            expected_surgeon: 480.0,
            expected_first_assistant: 0.0,
            expected_total: 990.0,
        },
        GoldenCase {
            id: "zero-points",
            point_count: 0,
            value_sp: 1000.0,
            value_sh: 500.0,
            value_tsp: 0.0,
            surcharge_percent: 0,
            assistant_count: 2,
            anesthesia_enabled: false,
            expected_adjusted_sh: 500.0,
            expected_adjusted_sp: 1000.0,
            expected_anesthesia: 0.0,
            expected_pool: 1000.0,
            expected_total_points: 0.0,
            expected_point_value: 0.0,
            expected_surgeon: 0.0,
            expected_first_assistant: 0.0,
            expected_total: 1500.0,
        },
    ]
}

fn make_input(case: &GoldenCase) -> ProcedureInput {
    ProcedureInput {
        code: "04.08.05.061-8".into(),
        point_count: case.point_count,
        value_sp: case.value_sp,
        value_sh: case.value_sh,
        value_tsp: case.value_tsp,
        surcharge_percent: case.surcharge_percent,
        assistant_count: case.assistant_count,
        anesthesia_enabled: case.anesthesia_enabled,
    }
}

#[test]
fn test_golden_allocations() {
    for case in get_golden_cases() {
        let result = allocate(&make_input(&case));

        let checks = [
            ("adjusted_sh", result.adjusted_value_sh, case.expected_adjusted_sh),
            ("adjusted_sp", result.adjusted_value_sp, case.expected_adjusted_sp),
            ("anesthesia", result.anesthesia_value, case.expected_anesthesia),
            ("pool", result.pool_value, case.expected_pool),
            ("total_points", result.total_points, case.expected_total_points),
            ("point_value", result.point_value, case.expected_point_value),
            ("surgeon", result.surgeon_value, case.expected_surgeon),
            (
                "first_assistant",
                result.first_assistant_value,
                case.expected_first_assistant,
            ),
            ("total", result.total_procedure_value, case.expected_total),
        ];

        for (field, actual, expected) in checks {
            assert!(
                (actual - expected).abs() < TOLERANCE,
                "case {}: {} was {}, expected {}",
                case.id,
                field,
                actual,
                expected
            );
        }
    }
}

fn make_line(value_sh: f64) -> ProcedureLine {
    let mut input = ProcedureInput::new("04.08.05.061-8".into());
    input.point_count = 100;
    input.value_sp = 1000.0;
    input.value_sh = value_sh;
    ProcedureLine::new(1, "Procedimento".into(), input)
}

#[test]
fn test_golden_multi_procedure_seventy_thirty() {
    let table = HashMap::from([("04.08.05.061-8".to_string(), vec![70.0, 30.0])]);
    let lines = vec![make_line(1000.0), make_line(1000.0)];

    let result = allocate_multiple("04.08.05.061-8", &lines, &table);

    assert!((result.lines[0].allocation.value_sh - 700.0).abs() < TOLERANCE);
    assert!((result.lines[1].allocation.value_sh - 300.0).abs() < TOLERANCE);
    assert!((result.totals.adjusted_value_sh - 1000.0).abs() < TOLERANCE);
}

#[test]
fn test_golden_multi_procedure_unknown_principal() {
    let table = HashMap::from([("04.08.05.061-8".to_string(), vec![70.0, 30.0])]);
    let lines = vec![make_line(1000.0), make_line(1000.0)];

    let result = allocate_multiple("09.99.99.999-9", &lines, &table);

    // Unknown principal: every line keeps its full SH
    assert!((result.totals.adjusted_value_sh - 2000.0).abs() < TOLERANCE);
    assert!(result.lines.iter().all(|l| l.sh_percent.is_none()));
}
