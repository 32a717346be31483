//! The module responsible for writing RPS results to disk once the host model has been solved.
use crate::model::Model;
use crate::optimisation::Solution;
use crate::rps::RpsPolicy;
use crate::rps::constraints::RpsConstraintKeys;
use crate::rps::expressions::{
    rps_fuel_energy, rps_non_fuel_energy, total_demand_in_period, total_generation_in_period,
};
use crate::units::{Dimensionless, Energy};
use anyhow::{Context, Result};
use float_cmp::approx_eq;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::path::Path;

/// The output file name for RPS energy statistics
pub const RPS_ENERGY_FILE_NAME: &str = "rps_energy.txt";

/// The output file name for RPS constraint duals
pub const RPS_DUALS_FILE_NAME: &str = "debug_rps_duals.txt";

/// Energy (MWh) below which a total is treated as zero when calculating fractions
const ZERO_ENERGY_TOLERANCE: f64 = 1e-6;

/// Represents a row in the RPS energy output file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct RpsEnergyRow {
    /// The RPS period
    #[serde(rename = "PERIOD")]
    pub period: u32,
    /// Energy from eligible fuels (GWh)
    #[serde(rename = "RPSFuelEnergyGWh")]
    pub fuel_energy_gwh: f64,
    /// Energy from non-fuel sources (GWh)
    #[serde(rename = "RPSNonFuelEnergyGWh")]
    pub non_fuel_energy_gwh: f64,
    /// Total generation in the period (GWh)
    #[serde(rename = "TotalGenerationInPeriodGWh")]
    pub total_generation_gwh: f64,
    /// Fraction of generation from eligible sources
    #[serde(rename = "RPSGenFraction")]
    pub gen_fraction: f64,
    /// Total demand in the period (GWh)
    #[serde(rename = "TotalSalesInPeriodGWh")]
    pub total_sales_gwh: f64,
    /// Fraction of demand met by eligible sources
    #[serde(rename = "RPSSalesFraction")]
    pub sales_fraction: f64,
}

impl RpsEnergyRow {
    /// Calculate the RPS statistics for a period from the solution
    pub fn new(model: &Model, policy: &RpsPolicy, period: u32, solution: &Solution) -> Self {
        let fuel = Energy(solution.evaluate(&rps_fuel_energy(model, policy, period)));
        let non_fuel = Energy(solution.evaluate(&rps_non_fuel_energy(model, period)));
        let total_generation =
            Energy(solution.evaluate(&total_generation_in_period(model, period)));
        let total_demand = total_demand_in_period(model, period);
        let eligible = fuel + non_fuel;

        Self {
            period,
            fuel_energy_gwh: fuel.to_gwh(),
            non_fuel_energy_gwh: non_fuel.to_gwh(),
            total_generation_gwh: total_generation.to_gwh(),
            gen_fraction: fraction(eligible, total_generation, period, "total generation").value(),
            total_sales_gwh: total_demand.to_gwh(),
            sales_fraction: fraction(eligible, total_demand, period, "total demand").value(),
        }
    }
}

/// Divide `numerator` by `denominator`, giving NaN (with a warning) if the denominator is zero.
///
/// Denominators within [`ZERO_ENERGY_TOLERANCE`] MWh of zero count as zero, as solver output can
/// be slightly off.
fn fraction(numerator: Energy, denominator: Energy, period: u32, name: &str) -> Dimensionless {
    if approx_eq!(f64, denominator.value(), 0.0, epsilon = ZERO_ENERGY_TOLERANCE) {
        warn!("{name} is zero in RPS period {period}; fraction will be NaN");
        return Dimensionless(f64::NAN);
    }

    numerator / denominator
}

/// Represents a row in the RPS duals output file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct RpsDualsRow {
    #[serde(rename = "PERIOD")]
    period: u32,
    dual: f64,
}

/// Create a new tab-separated writer for the given file
fn new_writer(output_dir: &Path, file_name: &str) -> Result<csv::Writer<File>> {
    let file_path = output_dir.join(file_name);
    csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(&file_path)
        .with_context(|| format!("Could not create output file {}", file_path.display()))
}

/// Create the output directory (and parents) if it doesn't already exist
pub fn create_output_directory(output_dir: &Path) -> Result<()> {
    if output_dir.is_dir() {
        // already exists
        return Ok(());
    }

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Could not create output directory {}", output_dir.display()))
}

/// An object for writing RPS results to file
pub struct DataWriter {
    energy_writer: csv::Writer<File>,
    duals_writer: Option<csv::Writer<File>>,
}

impl DataWriter {
    /// Open files to write output data to
    ///
    /// # Arguments
    ///
    /// * `output_dir` - Folder where files will be saved
    /// * `save_debug_info` - Whether to also write the duals of the RPS constraints
    pub fn create(output_dir: &Path, save_debug_info: bool) -> Result<Self> {
        let duals_writer = if save_debug_info {
            Some(new_writer(output_dir, RPS_DUALS_FILE_NAME)?)
        } else {
            None
        };

        Ok(Self {
            energy_writer: new_writer(output_dir, RPS_ENERGY_FILE_NAME)?,
            duals_writer,
        })
    }

    /// Write RPS statistics for each RPS period
    pub fn write_energy(
        &mut self,
        model: &Model,
        policy: &RpsPolicy,
        solution: &Solution,
    ) -> Result<()> {
        for period in policy.iter_periods() {
            let row = RpsEnergyRow::new(model, policy, period, solution);
            self.energy_writer.serialize(row)?;
        }

        Ok(())
    }

    /// Write the duals of the RPS constraints, if debug info is enabled
    pub fn write_duals(&mut self, keys: &RpsConstraintKeys, solution: &Solution) -> Result<()> {
        if let Some(ref mut wtr) = self.duals_writer {
            for (period, dual) in keys.zip_duals(solution.dual_rows()) {
                wtr.serialize(RpsDualsRow {
                    period: *period,
                    dual,
                })?;
            }
        }

        Ok(())
    }

    /// Flush the underlying streams
    pub fn flush(&mut self) -> Result<()> {
        self.energy_writer.flush()?;
        if let Some(ref mut wtr) = self.duals_writer {
            wtr.flush()?;
        }

        Ok(())
    }
}

/// Write the RPS outputs for a solved model.
///
/// # Arguments
///
/// * `output_dir` - Folder where files will be saved (created if needed)
/// * `model` - The host model
/// * `policy` - The RPS policy
/// * `keys` - Keys for the RPS constraints added to the problem
/// * `solution` - The solution to the problem
pub fn write_rps_outputs(
    output_dir: &Path,
    model: &Model,
    policy: &RpsPolicy,
    keys: &RpsConstraintKeys,
    solution: &Solution,
) -> Result<()> {
    create_output_directory(output_dir)?;

    let mut writer = DataWriter::create(output_dir, policy.parameters().debug_model)?;
    writer.write_energy(model, policy, solution)?;
    writer.write_duals(keys, solution)?;
    writer.flush()?;
    info!("RPS results written to {}", output_dir.display());

    Ok(())
}
