//! Code for adding the RPS enforcement constraints to the optimisation problem.
use super::expressions::{
    rps_fuel_energy, rps_non_fuel_energy, total_demand_in_period, total_generation_in_period,
};
use super::{RpsPolicy, TargetBasis};
use crate::model::Model;
use crate::optimisation::Problem;
use log::debug;

/// Corresponding keys for a set of constraints along with the row offset in the solution
#[derive(Debug, Clone, PartialEq)]
pub struct KeysWithOffset<T> {
    offset: usize,
    keys: Vec<T>,
}

impl<T> KeysWithOffset<T> {
    /// Zip the keys with the corresponding dual values in the solution, accounting for the offset
    pub fn zip_duals<'a>(&'a self, duals: &'a [f64]) -> impl Iterator<Item = (&'a T, f64)> {
        assert!(
            self.offset + self.keys.len() <= duals.len(),
            "Bad constraint keys: dual rows out of range"
        );

        self.keys.iter().zip(duals[self.offset..].iter().copied())
    }

    /// The number of constraints covered by the keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no constraints are covered by the keys
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Indicates the period covered by each RPS enforcement constraint
pub type RpsConstraintKeys = KeysWithOffset<u32>;

/// Add one RPS enforcement constraint (`RPS_Enforce_Target`) for each RPS period.
///
/// With [`TargetBasis::Demand`] the constraint is:
///
/// ```text
/// RPSFuelEnergy[p] + RPSNonFuelEnergy[p] >= rps_target[p] * total demand in p
/// ```
///
/// With [`TargetBasis::Generation`], total generation in the period replaces total demand and the
/// constraint is rearranged so that all decision variables are on the left-hand side.
///
/// Note: the constraints are added as consecutive rows, which is required to retrieve their dual
/// values from the solution.
///
/// # Arguments
///
/// * `problem` - The optimisation problem, already containing the host model's variables
/// * `model` - The host model
/// * `policy` - The RPS policy
///
/// # Returns
///
/// The keys for the added constraints
pub fn add_rps_constraints(
    problem: &mut Problem,
    model: &Model,
    policy: &RpsPolicy,
) -> RpsConstraintKeys {
    let offset = problem.num_rows();
    let mut keys = Vec::new();

    for (period, target) in policy.iter_targets() {
        let mut eligible = rps_fuel_energy(model, policy, period);
        eligible += &rps_non_fuel_energy(model, period);

        match policy.parameters().target_basis {
            TargetBasis::Demand => {
                let demand = total_demand_in_period(model, period);
                let rhs = target.value() * demand.value();
                debug!("RPS constraint for period {period}: eligible energy >= {rhs} MWh");
                problem.add_constraint(&eligible, rhs..);
            }
            TargetBasis::Generation => {
                let total = total_generation_in_period(model, period);
                let expr = eligible + total * -target.value();
                debug!(
                    "RPS constraint for period {period}: eligible energy >= {target} of generation"
                );
                problem.add_constraint(&expr, 0.0..);
            }
        }

        keys.push(period);
    }

    RpsConstraintKeys { offset, keys }
}
