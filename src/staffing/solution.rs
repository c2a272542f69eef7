use crate::hour::Hour;
use crate::policy::Policy;
use crate::shift::{ShiftDefinition, ShiftId, ShiftKind};
use crate::staffing::model::{SchedulingModel, TOLERANCE};
use crate::staffing::solver::{SolveOutcome, SolveStatus};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShiftAssignment {
    pub shift: ShiftDefinition,
    pub count: u32,
}

/// Staffing and cost at one hour of the decoded plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyCoverage {
    pub hour: Hour,
    pub demand: f64,
    pub full_time_staff: u32,
    pub part_time_staff: u32,
    /// Staff present times per-staff capacity.
    pub capacity: f64,
    pub full_time_cost: f64,
    pub part_time_cost: f64,
    pub leakage: f64,
}

impl HourlyCoverage {
    pub fn staff(&self) -> u32 {
        self.full_time_staff + self.part_time_staff
    }

    pub fn cost(&self) -> f64 {
        self.full_time_cost + self.part_time_cost
    }
}

/// A decoded optimal plan. Read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaffingSolution {
    assignments: Vec<ShiftAssignment>,
    hours: Vec<HourlyCoverage>,
    total_cost: f64,
}

impl StaffingSolution {
    /// One entry per offered shift, including those left at zero.
    pub fn assignments(&self) -> &[ShiftAssignment] {
        &self.assignments
    }

    pub fn hours(&self) -> &[HourlyCoverage] {
        &self.hours
    }

    /// Labor cost of the plan: every assigned shift at its unit cost.
    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    pub fn count(&self, id: ShiftId) -> u32 {
        self.assignments
            .iter()
            .find(|a| a.shift.id == id)
            .map(|a| a.count)
            .unwrap_or(0)
    }

    pub fn count_of(&self, kind: ShiftKind) -> u32 {
        self.assignments
            .iter()
            .filter(|a| a.shift.kind() == kind)
            .map(|a| a.count)
            .sum()
    }

    pub fn at(&self, hour: Hour) -> Option<&HourlyCoverage> {
        self.hours.iter().find(|h| h.hour == hour)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StaffingOutcome {
    Feasible(StaffingSolution),
    /// No plan is available; `status` says why.
    Infeasible { status: SolveStatus },
}

impl StaffingOutcome {
    pub fn status(&self) -> SolveStatus {
        match self {
            StaffingOutcome::Feasible(_) => SolveStatus::Optimal,
            StaffingOutcome::Infeasible { status } => *status,
        }
    }

    pub fn solution(&self) -> Option<&StaffingSolution> {
        match self {
            StaffingOutcome::Feasible(solution) => Some(solution),
            StaffingOutcome::Infeasible { .. } => None,
        }
    }
}

fn snap(value: f64) -> f64 {
    if value.abs() < TOLERANCE { 0.0 } else { value.max(0.0) }
}

/// Turns raw solver values into a staffing plan.
pub fn decode(model: &SchedulingModel, outcome: &SolveOutcome, policy: &Policy) -> StaffingOutcome {
    if outcome.status != SolveStatus::Optimal {
        return StaffingOutcome::Infeasible { status: outcome.status };
    }

    let assignments = model
        .shifts()
        .iter()
        .enumerate()
        .map(|(idx, shift)| ShiftAssignment {
            shift: shift.clone(),
            count: outcome.values.get(idx).map(|v| v.round().max(0.0) as u32).unwrap_or(0),
        })
        .collect::<Vec<_>>();

    let hours = model
        .leakage()
        .iter()
        .map(|(hour, l)| {
            let mut coverage = HourlyCoverage {
                hour: *hour,
                demand: model.demand().get(*hour),
                full_time_staff: 0,
                part_time_staff: 0,
                capacity: 0.0,
                full_time_cost: 0.0,
                part_time_cost: 0.0,
                leakage: snap(outcome.values.get(*l).copied().unwrap_or(0.0)),
            };
            for a in assignments.iter().filter(|a| a.shift.covers(*hour)) {
                let cost = a.count as f64 * policy.cost_of(a.shift.kind());
                match a.shift.kind() {
                    ShiftKind::FullTime => {
                        coverage.full_time_staff += a.count;
                        coverage.full_time_cost += cost;
                    }
                    ShiftKind::PartTime => {
                        coverage.part_time_staff += a.count;
                        coverage.part_time_cost += cost;
                    }
                }
                coverage.capacity += a.count as f64 * policy.capacity;
            }
            coverage
        })
        .collect::<Vec<_>>();

    let total_cost = assignments
        .iter()
        .map(|a| a.count as f64 * policy.cost_of(a.shift.kind()))
        .sum();

    StaffingOutcome::Feasible(StaffingSolution { assignments, hours, total_cost })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demand::HourlyDemand;
    use crate::shift::ShiftCatalog;

    fn setup() -> (HourlyDemand, ShiftCatalog, Policy) {
        let demand = HourlyDemand::from_values(Hour(6), &[2.0, 6.0, 6.0, 2.0]).unwrap();
        let catalog = ShiftCatalog::from_definitions(vec![
            ShiftDefinition::new(ShiftKind::FullTime, Hour(6), 4),
            ShiftDefinition::new(ShiftKind::PartTime, Hour(7), 2),
        ])
        .unwrap();
        let policy = Policy { capacity: 4.0, cost_full: 100.0, cost_part: 45.0, ..Policy::default() };
        (demand, catalog, policy)
    }

    #[test]
    fn test_rounds_noisy_counts() {
        let (demand, catalog, policy) = setup();
        let model = SchedulingModel::build(&demand, &catalog, &policy).unwrap();
        let outcome = SolveOutcome {
            status: SolveStatus::Optimal,
            values: vec![0.9999999, 1.0000002, 1e-12, 0.5, -1e-10, 0.0],
            objective: None,
        };

        let decoded = decode(&model, &outcome, &policy);
        let solution = decoded.solution().unwrap();

        assert_eq!(1, solution.count_of(ShiftKind::FullTime));
        assert_eq!(1, solution.count_of(ShiftKind::PartTime));
        assert_eq!(145.0, solution.total_cost());

        let seven = solution.at(Hour(7)).unwrap();
        assert_eq!(2, seven.staff());
        assert_eq!(8.0, seven.capacity);
        assert_eq!(100.0, seven.full_time_cost);
        assert_eq!(45.0, seven.part_time_cost);
        assert_eq!(0.5, seven.leakage);

        let six = solution.at(Hour(6)).unwrap();
        assert_eq!(1, six.staff());
        assert_eq!(0.0, six.leakage);
        assert_eq!(0.0, solution.at(Hour(8)).unwrap().leakage);
    }

    #[test]
    fn test_negative_noise_clamps_to_zero() {
        let (demand, catalog, policy) = setup();
        let model = SchedulingModel::build(&demand, &catalog, &policy).unwrap();
        let outcome = SolveOutcome {
            status: SolveStatus::Optimal,
            values: vec![-0.2, 2.0, 0.0, 0.0, 0.0, 0.0],
            objective: None,
        };
        let decoded = decode(&model, &outcome, &policy);
        let solution = decoded.solution().unwrap();
        assert_eq!(0, solution.count_of(ShiftKind::FullTime));
        assert_eq!(2, solution.count(ShiftId { kind: ShiftKind::PartTime, start: Hour(7) }));
    }

    #[test]
    fn test_non_optimal_status_has_no_plan() {
        let (demand, catalog, policy) = setup();
        let model = SchedulingModel::build(&demand, &catalog, &policy).unwrap();

        for status in [SolveStatus::Infeasible, SolveStatus::Unbounded, SolveStatus::Other] {
            let outcome = SolveOutcome { status, values: vec![1.0; 6], objective: Some(1.0) };
            let decoded = decode(&model, &outcome, &policy);
            assert_eq!(StaffingOutcome::Infeasible { status }, decoded);
            assert!(decoded.solution().is_none());
        }
    }
}
