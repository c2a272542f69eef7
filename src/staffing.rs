use crate::demand::{HourlyDemand, LocationId};
use crate::error::{Error, Result};
use crate::policy::Policy;
use crate::shift::{ShiftCatalog, ShiftKind};
use std::collections::BTreeMap;
use tracing::info;

pub mod model;
pub mod solution;
pub mod solver;

#[cfg(test)]
mod tests;

use model::SchedulingModel;
use solution::{decode, StaffingOutcome};
use solver::{MilpSolver, SolveStatus};

/// Builds and solves the staffing model for one demand curve and catalog.
///
/// An empty demand curve yields an empty, zero-cost plan. Infeasibility is
/// returned as [`StaffingOutcome::Infeasible`], never as an error.
pub fn optimize(
    demand: &HourlyDemand,
    catalog: &ShiftCatalog,
    policy: &Policy,
    solver: &impl MilpSolver,
) -> Result<StaffingOutcome> {
    let model = SchedulingModel::build(demand, catalog, policy)?;
    let outcome = solver.solve(model.program())?;
    let expected = model.program().variables.len();
    if outcome.status == SolveStatus::Optimal && outcome.values.len() != expected {
        return Err(Error::Backend(format!(
            "solver reported optimal with {} values for {} variables",
            outcome.values.len(),
            expected
        )));
    }
    let decoded = decode(&model, &outcome, policy);
    info!(
        shifts = model.shifts().len(),
        status = %decoded.status(),
        cost = decoded.solution().map(|s| s.total_cost()),
        "solved staffing model"
    );
    Ok(decoded)
}

/// Catalog for the demand's own hours using the policy's shift durations.
pub fn catalog_for(demand: &HourlyDemand, policy: &Policy) -> Result<ShiftCatalog> {
    match (demand.first(), demand.last()) {
        (Some(first), Some(last)) => {
            ShiftCatalog::build(
                first,
                last,
                policy.duration_of(ShiftKind::FullTime),
                policy.duration_of(ShiftKind::PartTime),
            )
        }
        _ => Ok(ShiftCatalog::default()),
    }
}

/// [`optimize`] with the catalog derived from the demand and policy.
pub fn plan(demand: &HourlyDemand, policy: &Policy, solver: &impl MilpSolver) -> Result<StaffingOutcome> {
    policy.validate()?;
    let catalog = catalog_for(demand, policy)?;
    optimize(demand, &catalog, policy, solver)
}

/// Plans every location on its own thread. Results keep location order.
pub fn optimize_all<S: MilpSolver + Sync>(
    curves: &BTreeMap<LocationId, HourlyDemand>,
    policy: &Policy,
    solver: &S,
) -> Vec<(LocationId, Result<StaffingOutcome>)> {
    std::thread::scope(|scope| {
        let handles = curves
            .iter()
            .map(|(location, demand)| {
                let handle = scope.spawn(move || {
                    let span = tracing::info_span!("location", %location);
                    let _guard = span.enter();
                    plan(demand, policy, solver)
                });
                (location.clone(), handle)
            })
            .collect::<Vec<_>>();

        handles
            .into_iter()
            .map(|(location, handle)| {
                let result = handle.join().unwrap_or_else(|_| {
                    Err(Error::Backend(format!("solver thread for {} panicked", location)))
                });
                (location, result)
            })
            .collect()
    })
}
