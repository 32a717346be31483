//! The parts of the host capacity-expansion model which the RPS policy depends on.
//!
//! The host owns these sets, parameters and decision variables and populates a [`Model`] before
//! the policy is declared. [`Model::validate`] checks that everything the policy will reference
//! is present and consistent, so that problems are reported up front rather than part-way through
//! building expressions.
use crate::id::define_id_type;
use crate::optimisation::Variable;
use crate::units::{Energy, HeatRate, Hours};
use anyhow::{Context, Result, ensure};
use indexmap::{IndexMap, IndexSet};
use std::collections::{HashMap, HashSet};

define_id_type! {EnergySourceID}
define_id_type! {GenerationProjectID}
define_id_type! {LoadZoneID}
define_id_type! {TimepointID}

/// A map of [`GenerationProject`]s, keyed by project ID
pub type GenerationProjectMap = IndexMap<GenerationProjectID, GenerationProject>;

/// A map of [`Timepoint`]s, keyed by timepoint ID
pub type TimepointMap = IndexMap<TimepointID, Timepoint>;

/// Total demand for each load zone in each period
pub type ZoneDemandMap = HashMap<(LoadZoneID, u32), Energy>;

/// `DispatchGen` variables, keyed by project and timepoint
pub type DispatchVariableMap = IndexMap<(GenerationProjectID, TimepointID), Variable>;

/// `GenFuelUseRate` variables, keyed by project, timepoint and fuel
pub type FuelUseVariableMap =
    IndexMap<(GenerationProjectID, TimepointID, EnergySourceID), Variable>;

/// A timepoint in the host model
#[derive(Debug, Clone, PartialEq)]
pub struct Timepoint {
    /// The period to which this timepoint belongs
    pub period: u32,
    /// The number of hours represented by this timepoint (`tp_weight`)
    pub weight: Hours,
}

/// How a generation project produces energy
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationSource {
    /// The project burns one or more fuels
    Fuels {
        /// The fuels the project can consume (`FUELS_FOR_GEN`)
        fuels: Vec<EnergySourceID>,
        /// Full load heat rate in MMBtu/MWh (`gen_full_load_heat_rate`)
        full_load_heat_rate: HeatRate,
    },
    /// The project uses a non-fuel energy source (e.g. wind, solar)
    NonFuel(EnergySourceID),
}

/// A generation project in the host model
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationProject {
    /// Unique identifier for the project
    pub id: GenerationProjectID,
    /// How the project produces energy
    pub source: GenerationSource,
    /// The timepoints in which the project can be dispatched, grouped by period
    /// (`TPS_FOR_GEN_IN_PERIOD`)
    pub timepoints: IndexMap<u32, Vec<TimepointID>>,
}

impl GenerationProject {
    /// Whether the project burns fuel
    pub fn is_fuel_based(&self) -> bool {
        matches!(self.source, GenerationSource::Fuels { .. })
    }

    /// The fuels which this project can consume (empty for non-fuel projects)
    pub fn fuels(&self) -> &[EnergySourceID] {
        match &self.source {
            GenerationSource::Fuels { fuels, .. } => fuels,
            GenerationSource::NonFuel(_) => &[],
        }
    }

    /// The project's full load heat rate, if it burns fuel
    pub fn full_load_heat_rate(&self) -> Option<HeatRate> {
        match &self.source {
            GenerationSource::Fuels {
                full_load_heat_rate,
                ..
            } => Some(*full_load_heat_rate),
            GenerationSource::NonFuel(_) => None,
        }
    }

    /// Iterate over the timepoints in which the project operates in the given period
    pub fn iter_timepoints_in_period(&self, period: u32) -> impl Iterator<Item = &TimepointID> {
        self.timepoints.get(&period).into_iter().flatten()
    }
}

/// The host model
#[derive(Debug, Default)]
pub struct Model {
    /// All investment periods (`PERIODS`)
    pub periods: IndexSet<u32>,
    /// All fuels (`FUELS`)
    pub fuels: IndexSet<EnergySourceID>,
    /// All energy sources which are not fuels (`NON_FUEL_ENERGY_SOURCES`)
    pub non_fuel_energy_sources: IndexSet<EnergySourceID>,
    /// All load zones (`LOAD_ZONES`)
    pub load_zones: IndexSet<LoadZoneID>,
    /// All timepoints
    pub timepoints: TimepointMap,
    /// All generation projects (`GENERATION_PROJECTS`)
    pub generation_projects: GenerationProjectMap,
    /// Total demand in each load zone and period in MWh (`zone_total_demand_in_period_mwh`)
    pub zone_demand: ZoneDemandMap,
    /// Dispatch decision variables in MW (`DispatchGen`)
    pub dispatch_vars: DispatchVariableMap,
    /// Fuel use decision variables in MMBtu/h (`GenFuelUseRate`)
    pub fuel_use_vars: FuelUseVariableMap,
    /// Whether the host uses a unit commitment formulation for dispatch
    pub unit_commitment: bool,
}

impl Model {
    /// Iterate over the fuel-based generation projects (`FUEL_BASED_GENS`)
    pub fn iter_fuel_based_projects(&self) -> impl Iterator<Item = &GenerationProject> {
        self.generation_projects
            .values()
            .filter(|project| project.is_fuel_based())
    }

    /// Iterate over the non-fuel generation projects (`NON_FUEL_BASED_GENS`)
    pub fn iter_non_fuel_projects(&self) -> impl Iterator<Item = &GenerationProject> {
        self.generation_projects
            .values()
            .filter(|project| !project.is_fuel_based())
    }

    /// Get the weight of a timepoint in hours.
    ///
    /// Panics if the timepoint doesn't exist, which [`Model::validate`] rules out for any
    /// timepoint referenced by a project.
    pub fn timepoint_weight(&self, timepoint: &TimepointID) -> Hours {
        self.timepoints
            .get(timepoint)
            .expect("Unknown timepoint")
            .weight
    }

    /// Get the `DispatchGen` variable for the given project and timepoint
    pub fn dispatch_var(
        &self,
        project_id: &GenerationProjectID,
        timepoint: &TimepointID,
    ) -> Variable {
        *self
            .dispatch_vars
            .get(&(project_id.clone(), timepoint.clone()))
            .expect("No dispatch variable found for given params")
    }

    /// Get the `GenFuelUseRate` variable for the given project, timepoint and fuel
    pub fn fuel_use_var(
        &self,
        project_id: &GenerationProjectID,
        timepoint: &TimepointID,
        fuel: &EnergySourceID,
    ) -> Variable {
        *self
            .fuel_use_vars
            .get(&(project_id.clone(), timepoint.clone(), fuel.clone()))
            .expect("No fuel use variable found for given params")
    }

    /// Get the total demand for a load zone in a period
    pub fn zone_demand(&self, load_zone: &LoadZoneID, period: u32) -> Energy {
        *self
            .zone_demand
            .get(&(load_zone.clone(), period))
            .expect("No demand found for given params")
    }

    /// Check that the model provides everything the RPS policy requires.
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.periods.is_empty(), "The model has no periods");

        for fuel in &self.fuels {
            ensure!(
                !self.non_fuel_energy_sources.contains(fuel),
                "Energy source {fuel} is listed as both a fuel and a non-fuel energy source"
            );
        }

        for (id, timepoint) in &self.timepoints {
            ensure!(
                self.periods.contains(&timepoint.period),
                "Timepoint {id} belongs to unknown period {}",
                timepoint.period
            );
            ensure!(
                timepoint.weight.is_finite() && timepoint.weight >= Hours(0.0),
                "Timepoint {id} has an invalid weight: {}",
                timepoint.weight
            );
        }

        for project in self.generation_projects.values() {
            self.validate_project(project)
                .with_context(|| format!("Invalid generation project {}", project.id))?;
        }

        self.validate_zone_demand()
    }

    fn validate_project(&self, project: &GenerationProject) -> Result<()> {
        match &project.source {
            GenerationSource::Fuels {
                fuels,
                full_load_heat_rate,
            } => {
                ensure!(!fuels.is_empty(), "Fuel-based project has no fuels");
                for fuel in fuels {
                    ensure!(self.fuels.contains(fuel), "Unknown fuel {fuel}");
                }
                ensure!(
                    full_load_heat_rate.is_finite() && *full_load_heat_rate > HeatRate(0.0),
                    "Full load heat rate must be a finite number greater than zero"
                );
            }
            GenerationSource::NonFuel(source) => {
                ensure!(
                    self.non_fuel_energy_sources.contains(source),
                    "Unknown non-fuel energy source {source}"
                );
            }
        }

        for (period, timepoints) in &project.timepoints {
            ensure!(self.periods.contains(period), "Unknown period {period}");
            let mut seen = HashSet::new();
            for timepoint in timepoints {
                ensure!(
                    seen.insert(timepoint),
                    "Timepoint {timepoint} is listed more than once for period {period}"
                );
                let found = self
                    .timepoints
                    .get(timepoint)
                    .with_context(|| format!("Unknown timepoint {timepoint}"))?;
                ensure!(
                    found.period == *period,
                    "Timepoint {timepoint} does not belong to period {period}"
                );
                ensure!(
                    self.dispatch_vars
                        .contains_key(&(project.id.clone(), timepoint.clone())),
                    "Missing dispatch variable for timepoint {timepoint}"
                );
                for fuel in project.fuels() {
                    ensure!(
                        self.fuel_use_vars.contains_key(&(
                            project.id.clone(),
                            timepoint.clone(),
                            fuel.clone()
                        )),
                        "Missing fuel use variable for timepoint {timepoint} and fuel {fuel}"
                    );
                }
            }
        }

        Ok(())
    }

    fn validate_zone_demand(&self) -> Result<()> {
        for ((load_zone, period), demand) in &self.zone_demand {
            ensure!(
                self.load_zones.contains(load_zone),
                "Demand given for unknown load zone {load_zone}"
            );
            ensure!(
                self.periods.contains(period),
                "Demand given for unknown period {period}"
            );
            ensure!(
                demand.is_finite() && *demand >= Energy(0.0),
                "Invalid demand for load zone {load_zone} in period {period}: {demand}"
            );
        }

        for load_zone in &self.load_zones {
            for period in &self.periods {
                ensure!(
                    self.zone_demand.contains_key(&(load_zone.clone(), *period)),
                    "Missing demand for load zone {load_zone} in period {period}"
                );
            }
        }

        Ok(())
    }
}
