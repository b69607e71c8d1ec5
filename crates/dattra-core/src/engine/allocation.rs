//! Single-procedure fee allocation.
//!
//! Role point weights:
//! - Surgeon: 100% of the procedure points
//! - 1st assistant: 30%
//! - 2nd through 5th assistant: 20% each
//!
//! The 30%/20% asymmetry follows the AIH fee table.

use crate::models::{AllocationResult, ProcedureInput};

/// Anesthesiologist share of the adjusted SP value.
pub const ANESTHESIA_SHARE: f64 = 0.30;

/// Point weight of the first assistant, relative to the surgeon's points.
pub const FIRST_ASSISTANT_WEIGHT: f64 = 0.30;

/// Point weight of the 2nd..5th assistants, relative to the surgeon's points.
pub const OTHER_ASSISTANT_WEIGHT: f64 = 0.20;

/// Split one procedure's fees among surgeon, anesthesiologist, and
/// assistants.
///
/// The surcharge uplifts SH and SP independently; TSP is never surcharged.
/// The anesthesiologist, when enabled, takes a fixed share of the adjusted
/// SP before the point split; the remaining pool is divided by the summed
/// role point weights. A zero point total yields zero role values.
pub fn allocate(input: &ProcedureInput) -> AllocationResult {
    let assistants = input.clamped_assistants();
    let points = f64::from(input.point_count);

    let surcharge_factor = 1.0 + f64::from(input.surcharge_percent) / 100.0;
    let adjusted_value_sh = input.value_sh * surcharge_factor;
    let adjusted_value_sp = input.value_sp * surcharge_factor;

    let anesthesia_value = if input.anesthesia_enabled {
        adjusted_value_sp * ANESTHESIA_SHARE
    } else {
        0.0
    };
    let pool_value = adjusted_value_sp - anesthesia_value;

    let assistant_weight = |rank: u8| -> f64 {
        if assistants < rank {
            return 0.0;
        }
        let share = if rank == 1 {
            FIRST_ASSISTANT_WEIGHT
        } else {
            OTHER_ASSISTANT_WEIGHT
        };
        points * share
    };

    let surgeon_points = points;
    let first_assistant_points = assistant_weight(1);
    let second_assistant_points = assistant_weight(2);
    let third_assistant_points = assistant_weight(3);
    let fourth_assistant_points = assistant_weight(4);
    let fifth_assistant_points = assistant_weight(5);

    let total_points = surgeon_points
        + first_assistant_points
        + second_assistant_points
        + third_assistant_points
        + fourth_assistant_points
        + fifth_assistant_points;
    let point_value = if total_points > 0.0 {
        pool_value / total_points
    } else {
        0.0
    };

    AllocationResult {
        code: input.code.clone(),
        point_count: input.point_count,
        value_sp: input.value_sp,
        value_sh: input.value_sh,
        value_tsp: input.value_tsp,
        surcharge_percent: input.surcharge_percent,
        assistant_count: assistants,
        anesthesia_enabled: input.anesthesia_enabled,
        adjusted_value_sh,
        adjusted_value_sp,
        anesthesia_value,
        pool_value,
        point_value,
        surgeon_value: surgeon_points * point_value,
        first_assistant_value: first_assistant_points * point_value,
        second_assistant_value: second_assistant_points * point_value,
        third_assistant_value: third_assistant_points * point_value,
        fourth_assistant_value: fourth_assistant_points * point_value,
        fifth_assistant_value: fifth_assistant_points * point_value,
        total_points,
        total_procedure_value: adjusted_value_sh + input.value_tsp + adjusted_value_sp,
    }
}
