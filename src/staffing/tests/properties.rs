use crate::hour::Hour;
use crate::policy::Policy;
use crate::shift::ShiftKind;
use crate::staffing::solution::StaffingOutcome;
use crate::staffing::tests::utils::{arb_demand, demand, feasible, solve};
use proptest::prelude::*;
use proptest::proptest;

const EPS: f64 = 1e-6;

fn reference_policy() -> Policy {
    Policy {
        capacity: 10.0,
        max_staff: 4,
        ..Policy::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn test_feasible_plans_respect_every_bound(values in arb_demand(8)) {
        let demand = demand(6, &values);
        let policy = reference_policy();

        let outcome = solve(&demand, &policy);
        if let StaffingOutcome::Feasible(solution) = &outcome {
            let hours = solution.hours();
            prop_assert_eq!(values.len(), hours.len());
            prop_assert_eq!(0.0, hours.last().unwrap().leakage);

            let mut carried = 0.0;
            for h in hours {
                prop_assert!(h.staff() <= policy.max_staff, "{} staff at {}", h.staff(), h.hour);
                prop_assert!(h.leakage >= 0.0);
                prop_assert!(h.leakage <= policy.leakage_cap * h.demand + EPS,
                    "leakage {} over cap at {} (demand {})", h.leakage, h.hour, h.demand);
                prop_assert!(h.capacity >= policy.wait_ratio * h.demand - EPS);
                prop_assert!(h.capacity + h.leakage >= h.demand + carried - EPS,
                    "flow broken at {}: {} + {} < {} + {}", h.hour, h.capacity, h.leakage, h.demand, carried);
                carried = h.leakage;
            }

            let priced = solution.assignments().iter()
                .map(|a| a.count as f64 * policy.cost_of(a.shift.kind()))
                .sum::<f64>();
            prop_assert!((priced - solution.total_cost()).abs() < EPS);
        }
    }

    #[test]
    fn test_zero_demand_costs_nothing(
        open in 0..12u8,
        len in 1..12u8,
        full in 1..9u8,
        part in 1..5u8,
    ) {
        let demand = demand(open, &vec![0.0; len as usize]);
        let policy = Policy { full_time_hours: full, part_time_hours: part, ..reference_policy() };

        let outcome = solve(&demand, &policy);
        let solution = feasible(&outcome);
        prop_assert!(solution.assignments().iter().all(|a| a.count == 0));
        prop_assert_eq!(0.0, solution.total_cost());
    }

    #[test]
    fn test_dearer_full_time_never_lowers_cost(
        values in arb_demand(8),
        cost_full in 60..200u32,
        raise in 1..80u32,
    ) {
        let demand = demand(6, &values);
        let base = Policy { cost_full: cost_full as f64, ..reference_policy() };
        let raised = Policy { cost_full: (cost_full + raise) as f64, ..base.clone() };

        let before = solve(&demand, &base);
        let after = solve(&demand, &raised);

        prop_assert_eq!(before.status(), after.status());
        if let (Some(before), Some(after)) = (before.solution(), after.solution()) {
            prop_assert!(after.total_cost() >= before.total_cost() - EPS,
                "raising full-time cost lowered the plan from {} to {}", before.total_cost(), after.total_cost());
            prop_assert!(after.count_of(ShiftKind::FullTime) <= before.count_of(ShiftKind::FullTime),
                "raising full-time cost added full-time shifts: {} -> {}",
                before.count_of(ShiftKind::FullTime), after.count_of(ShiftKind::FullTime));
        }
    }

    #[test]
    fn test_offered_shifts_stay_within_demand_window(values in arb_demand(6)) {
        let demand = demand(9, &values);
        let policy = Policy { full_time_hours: 6, part_time_hours: 3, ..reference_policy() };

        let outcome = solve(&demand, &policy);
        if let Some(solution) = outcome.solution() {
            for a in solution.assignments() {
                prop_assert!(a.shift.start() >= Hour(9));
                prop_assert!(a.shift.end() <= Hour(14));
            }
        }
    }
}
