//! A small host model shared by the integration tests.
use indexmap::{IndexMap, indexmap};
use rps_simple::model::{GenerationProject, GenerationSource, Model, Timepoint};
use rps_simple::optimisation::Problem;
use rps_simple::units::{Energy, HeatRate, Hours};
use std::fs;
use std::path::Path;

/// Demand in each period (MWh)
pub const DEMAND: f64 = 200.0;

/// A host model along with its optimisation problem
pub struct Host {
    pub model: Model,
    pub problem: Problem,
}

/// Build the host model with one one-hour timepoint per period.
///
/// Projects, in order, are a solar farm, a biomass plant and a coal plant. Dispatch in 2020 is
/// bounded by `dispatch_2020` (min, max) for each project; 2030 dispatch is free up to 1000 MW.
/// The host's own rows (demand balance and fuel use) are added to the problem.
pub fn build_host(dispatch_2020: [(f64, f64); 3]) -> Host {
    let mut problem = Problem::new();
    let mut model = Model {
        periods: [2020, 2030].into_iter().collect(),
        fuels: ["biomass".into(), "coal".into()].into_iter().collect(),
        non_fuel_energy_sources: ["solar".into()].into_iter().collect(),
        load_zones: ["zone1".into()].into_iter().collect(),
        timepoints: indexmap! {
            "2020_t1".into() => Timepoint { period: 2020, weight: Hours(1.0) },
            "2030_t1".into() => Timepoint { period: 2030, weight: Hours(1.0) },
        },
        zone_demand: [
            (("zone1".into(), 2020), Energy(DEMAND)),
            (("zone1".into(), 2030), Energy(DEMAND)),
        ]
        .into_iter()
        .collect(),
        ..Default::default()
    };

    // (ID, source, dispatch cost, fuel cost)
    let projects = [
        ("solar_pv", GenerationSource::NonFuel("solar".into()), 3.0, 0.0),
        (
            "biomass_st",
            GenerationSource::Fuels {
                fuels: vec!["biomass".into()],
                full_load_heat_rate: HeatRate(12.0),
            },
            0.0,
            0.5,
        ),
        (
            "coal_st",
            GenerationSource::Fuels {
                fuels: vec!["coal".into()],
                full_load_heat_rate: HeatRate(10.0),
            },
            0.0,
            0.1,
        ),
    ];

    for ((id, source, dispatch_cost, fuel_cost), (min, max)) in projects.into_iter().zip(dispatch_2020)
    {
        let project = GenerationProject {
            id: id.into(),
            source,
            timepoints: indexmap! {
                2020 => vec!["2020_t1".into()],
                2030 => vec!["2030_t1".into()],
            },
        };

        for (timepoint, bounds) in [("2020_t1", (min, max)), ("2030_t1", (0.0, 1000.0))] {
            let var = problem.add_variable(dispatch_cost, bounds.0..=bounds.1);
            model
                .dispatch_vars
                .insert((project.id.clone(), timepoint.into()), var);
            for fuel in project.fuels() {
                let var = problem.add_variable(fuel_cost, 0.0..);
                model
                    .fuel_use_vars
                    .insert((project.id.clone(), timepoint.into(), fuel.clone()), var);
            }
        }
        model.generation_projects.insert(project.id.clone(), project);
    }

    add_host_rows(&mut problem, &model);
    Host { model, problem }
}

/// Add the demand balance for each timepoint and link fuel use to dispatch
fn add_host_rows(problem: &mut Problem, model: &Model) {
    for (timepoint_id, timepoint) in &model.timepoints {
        let terms: Vec<_> = model
            .dispatch_vars
            .iter()
            .filter(|((_, tp), _)| tp == timepoint_id)
            .map(|(_, var)| (*var, timepoint.weight.value()))
            .collect();
        problem.add_row(DEMAND..=DEMAND, terms);
    }

    for ((project_id, timepoint), dispatch_var) in &model.dispatch_vars {
        let project = &model.generation_projects[project_id];
        let Some(heat_rate) = project.full_load_heat_rate() else {
            continue;
        };

        let mut terms = vec![(*dispatch_var, -heat_rate.value())];
        for fuel in project.fuels() {
            terms.push((model.fuel_use_var(project_id, timepoint, fuel), 1.0));
        }
        problem.add_row(0.0..=0.0, terms);
    }
}

/// Write input files to `inputs_dir`, keyed by file name
pub fn write_inputs(inputs_dir: &Path, files: &IndexMap<&str, &str>) {
    for (file_name, contents) in files {
        fs::write(inputs_dir.join(file_name), contents).unwrap();
    }
}
