//! A simple Renewable Portfolio Standard (RPS) policy.
//!
//! Each fuel is flagged as RPS-eligible or not and all non-fuel energy sources are assumed to be
//! eligible. In each period with a target, the energy produced from eligible sources must meet a
//! fraction of total demand (or of total generation, see [`TargetBasis`]).
//!
//! The fuel-based expressions convert fuel use to power with the full load heat rate, so they are
//! only valid when the host model ignores unit commitment.
use crate::model::{EnergySourceID, Model};
use crate::units::Dimensionless;
use anyhow::{Context, Result, ensure};
use indexmap::{IndexMap, IndexSet};
use log::{debug, warn};
use std::collections::HashMap;

pub mod constraints;
pub mod expressions;
pub mod parameters;
pub use parameters::{RpsParameters, TargetBasis};

/// Check that an RPS target is a fraction between 0 and 1
pub fn check_rps_target(period: u32, target: Dimensionless) -> Result<()> {
    ensure!(
        (0.0..=1.0).contains(&target.value()),
        "RPS target for period {period} must be between 0 and 1, got {target}"
    );

    Ok(())
}

/// The components of the RPS policy
#[derive(Debug, PartialEq)]
pub struct RpsPolicy {
    /// Eligibility flag for each fuel (`f_rps_eligible`). Fuels without an entry are ineligible.
    fuel_eligibility: HashMap<EnergySourceID, bool>,
    /// All energy sources which count towards the RPS (`RPS_ENERGY_SOURCES`)
    energy_sources: IndexSet<EnergySourceID>,
    /// The target fraction for each period with an RPS goal (`RPS_PERIODS`, `rps_target`)
    targets: IndexMap<u32, Dimensionless>,
    /// Other parameters for the policy
    parameters: RpsParameters,
}

impl RpsPolicy {
    /// Declare the RPS policy components for the given host model.
    ///
    /// # Arguments
    ///
    /// * `model` - The host model
    /// * `fuel_eligibility` - Eligibility flags for fuels. Fuels not present are ineligible.
    /// * `targets` - The target fraction for each RPS period
    /// * `parameters` - Other parameters for the policy
    ///
    /// # Returns
    ///
    /// The policy or an error if the model or inputs are invalid.
    pub fn new(
        model: &Model,
        fuel_eligibility: HashMap<EnergySourceID, bool>,
        targets: IndexMap<u32, Dimensionless>,
        parameters: RpsParameters,
    ) -> Result<Self> {
        model
            .validate()
            .context("Model does not provide the components required by the RPS policy")?;
        ensure!(
            !model.unit_commitment,
            "The RPS policy cannot be used with a unit commitment dispatch formulation"
        );

        for fuel in fuel_eligibility.keys() {
            ensure!(
                model.fuels.contains(fuel),
                "RPS eligibility given for unknown fuel {fuel}"
            );
        }

        for (period, target) in &targets {
            ensure!(
                model.periods.contains(period),
                "RPS period {period} is not one of the model periods"
            );
            check_rps_target(*period, *target)?;
        }

        if targets.is_empty() {
            warn!("No RPS targets were provided; no RPS constraints will be added");
        }

        let energy_sources: IndexSet<EnergySourceID> = model
            .non_fuel_energy_sources
            .iter()
            .chain(
                model
                    .fuels
                    .iter()
                    .filter(|fuel| fuel_eligibility.get(*fuel).copied().unwrap_or(false)),
            )
            .cloned()
            .collect();
        debug!("RPS-eligible energy sources: {energy_sources:?}");

        Ok(Self {
            fuel_eligibility,
            energy_sources,
            targets,
            parameters,
        })
    }

    /// Whether the given fuel counts towards the RPS (`f_rps_eligible`)
    pub fn is_fuel_eligible(&self, fuel: &EnergySourceID) -> bool {
        self.fuel_eligibility.get(fuel).copied().unwrap_or(false)
    }

    /// All energy sources which count towards the RPS (`RPS_ENERGY_SOURCES`)
    pub fn energy_sources(&self) -> &IndexSet<EnergySourceID> {
        &self.energy_sources
    }

    /// Iterate over the periods with an RPS target (`RPS_PERIODS`)
    pub fn iter_periods(&self) -> impl Iterator<Item = u32> + '_ {
        self.targets.keys().copied()
    }

    /// Iterate over the periods with an RPS target along with the targets
    pub fn iter_targets(&self) -> impl Iterator<Item = (u32, Dimensionless)> + '_ {
        self.targets.iter().map(|(period, target)| (*period, *target))
    }

    /// The target for a period, if the period has one
    pub fn target(&self, period: u32) -> Option<Dimensionless> {
        self.targets.get(&period).copied()
    }

    /// Other parameters for the policy
    pub fn parameters(&self) -> &RpsParameters {
        &self.parameters
    }
}
