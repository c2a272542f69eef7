use crate::demand::HourlyDemand;
use crate::hour::Hour;
use crate::policy::Policy;
use crate::shift::{ShiftCatalog, ShiftDefinition, ShiftKind};
use crate::staffing::solution::{StaffingOutcome, StaffingSolution};
use crate::staffing::solver::MicroLpSolver;
use crate::staffing::{optimize, plan};
use proptest::collection::vec;
use proptest::prelude::Strategy;

pub fn demand(first: u8, values: &[f64]) -> HourlyDemand {
    HourlyDemand::from_values(Hour(first), values).unwrap()
}

pub fn policy(capacity: f64, max_staff: u32) -> Policy {
    Policy {
        capacity,
        max_staff,
        ..Policy::default()
    }
}

pub fn part_time(start: u8, duration: u8) -> ShiftDefinition {
    ShiftDefinition::new(ShiftKind::PartTime, Hour(start), duration)
}

pub fn full_time(start: u8, duration: u8) -> ShiftDefinition {
    ShiftDefinition::new(ShiftKind::FullTime, Hour(start), duration)
}

pub fn catalog(shifts: Vec<ShiftDefinition>) -> ShiftCatalog {
    ShiftCatalog::from_definitions(shifts).unwrap()
}

pub fn solve_with(demand: &HourlyDemand, catalog: &ShiftCatalog, policy: &Policy) -> StaffingOutcome {
    optimize(demand, catalog, policy, &MicroLpSolver::new()).unwrap()
}

pub fn solve(demand: &HourlyDemand, policy: &Policy) -> StaffingOutcome {
    plan(demand, policy, &MicroLpSolver::new()).unwrap()
}

pub fn feasible(outcome: &StaffingOutcome) -> &StaffingSolution {
    match outcome {
        StaffingOutcome::Feasible(solution) => solution,
        StaffingOutcome::Infeasible { status } => panic!("expected a plan, got {}", status),
    }
}

/// Half-arrival steps between 0 and 12.5 for each of the given hours.
pub fn arb_demand(hours: usize) -> impl Strategy<Value = Vec<f64>> {
    vec(0..=25u32, hours).prop_map(|v| v.into_iter().map(|x| x as f64 / 2.0).collect())
}
