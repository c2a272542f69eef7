use crate::demand::HourlyDemand;
use crate::error::Result;
use crate::hour::Hour;
use crate::policy::Policy;
use crate::shift::{ShiftCatalog, ShiftDefinition};
use std::fmt;
use tracing::debug;

pub(crate) const TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Integer,
    Continuous,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarSpec {
    pub kind: VarKind,
    pub lower: f64,
    pub upper: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Geq,
    Leq,
    Eq,
}

/// What a row enforces, and for which hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// capacity(h) + l(h) >= demand(h) + l(h-1)
    Flow,
    /// l(h) <= leakage_cap * demand(h)
    LeakageCap,
    /// staff(h) <= max_staff
    MaxStaff,
    /// capacity(h) >= wait_ratio * demand(h)
    WaitBound,
    /// l(last) == 0
    ClosingBacklog,
    /// staff(h) >= 1
    MinPresence,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub kind: RowKind,
    pub hour: Hour,
    pub terms: Vec<(usize, f64)>,
    pub sense: Sense,
    pub rhs: f64,
}

impl Row {
    pub fn activity(&self, values: &[f64]) -> f64 {
        self.terms.iter().map(|(idx, coef)| coef * values[*idx]).sum()
    }

    pub fn is_satisfied(&self, values: &[f64]) -> bool {
        let lhs = self.activity(values);
        match self.sense {
            Sense::Geq => lhs >= self.rhs - TOLERANCE,
            Sense::Leq => lhs <= self.rhs + TOLERANCE,
            Sense::Eq => (lhs - self.rhs).abs() <= TOLERANCE,
        }
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sense = match self.sense {
            Sense::Geq => ">=",
            Sense::Leq => "<=",
            Sense::Eq => "==",
        };
        write!(f, "{:?}@{} ({} terms) {} {}", self.kind, self.hour, self.terms.len(), sense, self.rhs)
    }
}

/// Solver-neutral mixed-integer program: minimise `objective` subject to `rows`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearProgram {
    pub variables: Vec<VarSpec>,
    pub objective: Vec<(usize, f64)>,
    pub rows: Vec<Row>,
}

impl LinearProgram {
    fn add_variable(&mut self, kind: VarKind) -> usize {
        self.variables.push(VarSpec { kind, lower: 0.0, upper: None });
        self.variables.len() - 1
    }

    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective.iter().map(|(idx, coef)| coef * values[*idx]).sum()
    }

    /// Rows with no variables, which hold or fail regardless of the solution.
    pub fn constant_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|r| r.terms.is_empty())
    }
}

/// The staffing MILP for one location.
///
/// Variables are laid out as one integer count per offered shift (full-time
/// first, then part-time, each by start hour) followed by one continuous
/// leakage variable per demand hour.
#[derive(Debug, Clone)]
pub struct SchedulingModel<'a> {
    demand: &'a HourlyDemand,
    shifts: Vec<ShiftDefinition>,
    leakage: Vec<(Hour, usize)>,
    program: LinearProgram,
}

impl<'a> SchedulingModel<'a> {
    /// Builds the model. Shifts that do not fit inside the demand's hours are
    /// not offered.
    pub fn build(demand: &'a HourlyDemand, catalog: &ShiftCatalog, policy: &Policy) -> Result<Self> {
        policy.validate()?;

        let (first, last) = match (demand.first(), demand.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Ok(SchedulingModel {
                    demand,
                    shifts: vec![],
                    leakage: vec![],
                    program: LinearProgram::default(),
                });
            }
        };

        let shifts = catalog.within((first, last)).iter().cloned().collect::<Vec<_>>();
        let mut program = LinearProgram::default();

        for shift in &shifts {
            let idx = program.add_variable(VarKind::Integer);
            program.objective.push((idx, policy.cost_of(shift.kind())));
        }
        let leakage = demand
            .hours()
            .map(|hour| (hour, program.add_variable(VarKind::Continuous)))
            .collect::<Vec<_>>();

        let mut previous: Option<usize> = None;
        for (&(hour, l), (_, d)) in leakage.iter().zip(demand.iter()) {
            let present = shifts
                .iter()
                .enumerate()
                .filter(|(_, s)| s.covers(hour))
                .map(|(idx, _)| idx)
                .collect::<Vec<_>>();
            let staff = present.iter().map(|idx| (*idx, 1.0)).collect::<Vec<_>>();
            let capacity = present.iter().map(|idx| (*idx, policy.capacity)).collect::<Vec<_>>();

            let mut flow = capacity.clone();
            flow.push((l, 1.0));
            if let Some(prev) = previous {
                flow.push((prev, -1.0));
            }
            let mut rows = vec![
                Row { kind: RowKind::Flow, hour, terms: flow, sense: Sense::Geq, rhs: d },
                Row { kind: RowKind::LeakageCap, hour, terms: vec![(l, 1.0)], sense: Sense::Leq, rhs: policy.leakage_cap * d },
                Row { kind: RowKind::MaxStaff, hour, terms: staff.clone(), sense: Sense::Leq, rhs: policy.max_staff as f64 },
                Row { kind: RowKind::WaitBound, hour, terms: capacity, sense: Sense::Geq, rhs: policy.wait_ratio * d },
            ];
            if hour == last {
                rows.push(Row { kind: RowKind::ClosingBacklog, hour, terms: vec![(l, 1.0)], sense: Sense::Eq, rhs: 0.0 });
            }
            if policy.min_presence {
                rows.push(Row { kind: RowKind::MinPresence, hour, terms: staff, sense: Sense::Geq, rhs: 1.0 });
            }
            program.rows.extend(rows);
            previous = Some(l);
        }

        debug!(
            shifts = shifts.len(),
            variables = program.variables.len(),
            rows = program.rows.len(),
            "built staffing model"
        );

        Ok(SchedulingModel { demand, shifts, leakage, program })
    }

    pub fn demand(&self) -> &HourlyDemand {
        self.demand
    }

    /// Shifts offered to the solver, in variable order.
    pub fn shifts(&self) -> &[ShiftDefinition] {
        &self.shifts
    }

    /// Leakage variable index per hour.
    pub fn leakage(&self) -> &[(Hour, usize)] {
        &self.leakage
    }

    pub fn program(&self) -> &LinearProgram {
        &self.program
    }

    pub fn rows_of(&self, kind: RowKind) -> impl Iterator<Item = &Row> {
        self.program.rows.iter().filter(move |r| r.kind == kind)
    }
}
