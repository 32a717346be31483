//! Derived expressions for the RPS policy.
//!
//! Each expression is rebuilt from the model whenever it is requested, so it always reflects the
//! current decision variables. Evaluate an expression against a solved problem with
//! [`Solution::evaluate`](crate::optimisation::Solution::evaluate).
use super::RpsPolicy;
use crate::model::{GenerationProject, Model, TimepointID};
use crate::optimisation::LinearExpr;
use crate::units::Energy;

/// Power (MW) produced from RPS-eligible fuels by a fuel-based project in a timepoint.
///
/// This can't simply be taken to be the dispatch of the project, as a mix of eligible and
/// ineligible fuels may be consumed to produce that power. Returns an empty expression for
/// non-fuel projects.
pub fn rps_gen_fuel_power(
    model: &Model,
    policy: &RpsPolicy,
    project: &GenerationProject,
    timepoint: &TimepointID,
) -> LinearExpr {
    let mut expr = LinearExpr::new();
    let Some(heat_rate) = project.full_load_heat_rate() else {
        return expr;
    };

    for fuel in project.fuels() {
        if policy.is_fuel_eligible(fuel) {
            let var = model.fuel_use_var(&project.id, timepoint, fuel);
            expr.add_term(var, 1.0 / heat_rate.value());
        }
    }

    expr
}

/// Energy (MWh) produced from RPS-eligible fuels in a period (`RPSFuelEnergy`)
pub fn rps_fuel_energy(model: &Model, policy: &RpsPolicy, period: u32) -> LinearExpr {
    let mut expr = LinearExpr::new();
    for project in model.iter_fuel_based_projects() {
        for timepoint in project.iter_timepoints_in_period(period) {
            let weight = model.timepoint_weight(timepoint).value();
            expr += &(rps_gen_fuel_power(model, policy, project, timepoint) * weight);
        }
    }

    expr
}

/// Energy (MWh) produced from non-fuel sources in a period (`RPSNonFuelEnergy`)
pub fn rps_non_fuel_energy(model: &Model, period: u32) -> LinearExpr {
    dispatched_energy(model, model.iter_non_fuel_projects(), period)
}

/// Energy (MWh) produced by all projects in a period.
///
/// This can differ from total demand, e.g. because of transmission losses.
pub fn total_generation_in_period(model: &Model, period: u32) -> LinearExpr {
    dispatched_energy(model, model.generation_projects.values(), period)
}

/// Total demand (MWh) across all load zones in a period
pub fn total_demand_in_period(model: &Model, period: u32) -> Energy {
    model
        .load_zones
        .iter()
        .map(|load_zone| model.zone_demand(load_zone, period))
        .sum()
}

/// Sum of dispatch weighted by timepoint duration for the given projects
fn dispatched_energy<'a, I>(model: &Model, projects: I, period: u32) -> LinearExpr
where
    I: Iterator<Item = &'a GenerationProject>,
{
    let mut expr = LinearExpr::new();
    for project in projects {
        for timepoint in project.iter_timepoints_in_period(period) {
            let var = model.dispatch_var(&project.id, timepoint);
            expr.add_term(var, model.timepoint_weight(timepoint).value());
        }
    }

    expr
}
