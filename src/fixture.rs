//! Fixtures for tests

use crate::model::{
    EnergySourceID, GenerationProject, GenerationSource, Model, Timepoint, TimepointID,
};
use crate::optimisation::Problem;
use crate::units::{Dimensionless, Energy, HeatRate, Hours};
use indexmap::{IndexMap, indexmap};
use map_macro::hash_map;
use rstest::fixture;
use std::collections::HashMap;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.err().unwrap().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// The hours represented by each timepoint in the test model
pub const TIMEPOINT_WEIGHT: f64 = 2.0;

/// The heat rate of each fuel-based project in the test model
pub const HEAT_RATE: f64 = 10.0;

/// Create a project operating in one timepoint in each of the periods 2020 and 2030
fn project(id: &str, source: GenerationSource) -> GenerationProject {
    GenerationProject {
        id: id.into(),
        source,
        timepoints: indexmap! {
            2020 => vec!["p1_t1".into()],
            2030 => vec!["p2_t1".into()],
        },
    }
}

/// Build a small host model, adding its decision variables to `problem`.
///
/// The model has two periods (2020, 2030) with one timepoint each, a single load zone and three
/// projects: a solar farm, a biomass plant and a gas plant. Dispatch variables are bounded by
/// `max_dispatch` and costs make gas the cheapest source, then solar, then biomass.
pub fn build_model(problem: &mut Problem, max_dispatch: f64) -> Model {
    let mut model = Model {
        periods: [2020, 2030].into_iter().collect(),
        fuels: ["biomass".into(), "gas".into()].into_iter().collect(),
        non_fuel_energy_sources: ["solar".into()].into_iter().collect(),
        load_zones: ["north".into()].into_iter().collect(),
        timepoints: indexmap! {
            "p1_t1".into() => Timepoint { period: 2020, weight: Hours(TIMEPOINT_WEIGHT) },
            "p2_t1".into() => Timepoint { period: 2030, weight: Hours(TIMEPOINT_WEIGHT) },
        },
        generation_projects: IndexMap::new(),
        zone_demand: hash_map! {
            ("north".into(), 2020) => Energy(200.0),
            ("north".into(), 2030) => Energy(300.0),
        },
        ..Default::default()
    };

    let fuel_costs: HashMap<EnergySourceID, f64> = hash_map! {
        "biomass".into() => 1.0,
        "gas".into() => 0.1,
    };
    let projects = [
        project("solar_farm", GenerationSource::NonFuel("solar".into())),
        project(
            "bio_plant",
            GenerationSource::Fuels {
                fuels: vec!["biomass".into()],
                full_load_heat_rate: HeatRate(HEAT_RATE),
            },
        ),
        project(
            "gas_plant",
            GenerationSource::Fuels {
                fuels: vec!["gas".into()],
                full_load_heat_rate: HeatRate(HEAT_RATE),
            },
        ),
    ];
    for project in projects {
        let timepoints: Vec<TimepointID> = project.timepoints.values().flatten().cloned().collect();
        for timepoint in timepoints {
            let dispatch_cost = if project.is_fuel_based() { 0.0 } else { 5.0 };
            let var = problem.add_variable(dispatch_cost, 0.0..=max_dispatch);
            model
                .dispatch_vars
                .insert((project.id.clone(), timepoint.clone()), var);

            for fuel in project.fuels() {
                let var = problem.add_variable(fuel_costs[fuel], 0.0..);
                model
                    .fuel_use_vars
                    .insert((project.id.clone(), timepoint.clone(), fuel.clone()), var);
            }
        }
        model
            .generation_projects
            .insert(project.id.clone(), project);
    }

    model
}

#[fixture]
pub fn model() -> Model {
    build_model(&mut Problem::new(), 1000.0)
}

#[fixture]
pub fn fuel_eligibility() -> HashMap<EnergySourceID, bool> {
    hash_map! {
        "biomass".into() => true,
        "gas".into() => false,
    }
}

#[fixture]
pub fn rps_targets() -> IndexMap<u32, Dimensionless> {
    indexmap! { 2020 => Dimensionless(0.5) }
}
