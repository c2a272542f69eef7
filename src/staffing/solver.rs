use crate::error::{Error, Result};
use crate::staffing::model::{LinearProgram, Row, Sense, VarKind};
use good_lp::{
    constraint, microlp, variable, Constraint, Expression, ProblemVariables, ResolutionError,
    Solution, SolverModel, Variable,
};
use serde::Serialize;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unbounded,
    /// Stopped without proving optimality.
    Other,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Unbounded => "unbounded",
            SolveStatus::Other => "not proven optimal",
        };
        write!(f, "{}", label)
    }
}

/// Raw solver result. `values` follows the program's variable order and is
/// empty unless the solver produced an assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    pub values: Vec<f64>,
    pub objective: Option<f64>,
}

impl SolveOutcome {
    pub fn without_solution(status: SolveStatus) -> Self {
        SolveOutcome { status, values: vec![], objective: None }
    }
}

/// Mixed-integer backend: program in, status and values out.
///
/// Infeasible and unbounded programs are reported through the status;
/// `Err` is reserved for solver failures.
pub trait MilpSolver {
    fn solve(&self, program: &LinearProgram) -> Result<SolveOutcome>;
}

/// Branch-and-bound backend built on the pure-Rust `microlp` solver.
#[derive(Debug, Clone, Copy, Default)]
pub struct MicroLpSolver;

impl MicroLpSolver {
    pub fn new() -> Self {
        MicroLpSolver
    }
}

fn expression(terms: &[(usize, f64)], handles: &[Variable]) -> Expression {
    terms
        .iter()
        .fold(Expression::from(0.0), |acc, (idx, coef)| acc + *coef * handles[*idx])
}

fn to_constraint(row: &Row, handles: &[Variable]) -> Constraint {
    let lhs = expression(&row.terms, handles);
    let rhs = row.rhs;
    match row.sense {
        Sense::Geq => constraint!(lhs >= rhs),
        Sense::Leq => constraint!(lhs <= rhs),
        Sense::Eq => constraint!(lhs == rhs),
    }
}

impl MilpSolver for MicroLpSolver {
    fn solve(&self, program: &LinearProgram) -> Result<SolveOutcome> {
        if let Some(row) = program.constant_rows().find(|r| !r.is_satisfied(&[])) {
            debug!(%row, "row cannot be satisfied by any assignment");
            return Ok(SolveOutcome::without_solution(SolveStatus::Infeasible));
        }
        if program.variables.is_empty() {
            return Ok(SolveOutcome { status: SolveStatus::Optimal, values: vec![], objective: Some(0.0) });
        }

        let mut vars = ProblemVariables::new();
        let handles = program
            .variables
            .iter()
            .map(|spec| {
                let mut def = variable().min(spec.lower);
                if let Some(upper) = spec.upper {
                    def = def.max(upper);
                }
                if spec.kind == VarKind::Integer {
                    def = def.integer();
                }
                vars.add(def)
            })
            .collect::<Vec<Variable>>();

        let objective = expression(&program.objective, &handles);
        let problem = program
            .rows
            .iter()
            .filter(|r| !r.terms.is_empty())
            .fold(vars.minimise(objective).using(microlp), |problem, row| {
                problem.with(to_constraint(row, &handles))
            });

        match problem.solve() {
            Ok(solution) => {
                let values = handles.iter().map(|h| solution.value(*h)).collect::<Vec<_>>();
                let objective = program.objective_value(&values);
                Ok(SolveOutcome { status: SolveStatus::Optimal, values, objective: Some(objective) })
            }
            Err(ResolutionError::Infeasible) => Ok(SolveOutcome::without_solution(SolveStatus::Infeasible)),
            Err(ResolutionError::Unbounded) => Ok(SolveOutcome::without_solution(SolveStatus::Unbounded)),
            Err(err) => Err(Error::Backend(err.to_string())),
        }
    }
}
