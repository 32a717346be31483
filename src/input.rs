//! Common routines for handling input data.
use crate::model::Model;
use crate::rps::{RpsParameters, RpsPolicy};
use crate::units::Dimensionless;
use anyhow::{Context, Result, ensure};
use log::info;
use serde::de::{Deserialize, DeserializeOwned, Deserializer};
use std::fs;
use std::path::Path;

pub mod fuel;
use fuel::read_fuel_eligibility;
pub mod rps_target;
use rps_target::read_rps_targets;

/// Build a `csv::Reader` for a tab-separated file with a header row
fn tab_reader(file_path: &Path) -> Result<csv::Reader<fs::File>> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .trim(csv::Trim::All)
        .from_path(file_path)
        .with_context(|| input_err_msg(file_path))
}

/// Read a series of type `T`s from a tab-separated file.
///
/// Will raise an error if the file is empty.
///
/// # Arguments
///
/// * `file_path` - Path to the tab-separated file
pub fn read_csv<T: DeserializeOwned>(file_path: &Path) -> Result<impl Iterator<Item = T>> {
    let vec = read_csv_internal(file_path)?;
    ensure!(!vec.is_empty(), "Table file {} cannot be empty", file_path.display());

    Ok(vec.into_iter())
}

/// Read a series of type `T`s from a tab-separated file which may have no rows.
///
/// The file itself must still exist.
///
/// # Arguments
///
/// * `file_path` - Path to the tab-separated file
pub fn read_csv_allow_empty<T: DeserializeOwned>(
    file_path: &Path,
) -> Result<impl Iterator<Item = T>> {
    Ok(read_csv_internal(file_path)?.into_iter())
}

fn read_csv_internal<T: DeserializeOwned>(file_path: &Path) -> Result<Vec<T>> {
    tab_reader(file_path)?
        .into_deserialize()
        .collect::<Result<Vec<T>, _>>()
        .with_context(|| input_err_msg(file_path))
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;
    Ok(toml_data)
}

/// Format an error message to include the file path. To be used with `anyhow::Context`.
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Read a `Dimensionless` value, checking that it is between 0 and 1
pub fn deserialise_proportion<'de, D>(deserialiser: D) -> Result<Dimensionless, D::Error>
where
    D: Deserializer<'de>,
{
    let value: f64 = Deserialize::deserialize(deserialiser)?;
    if !(0.0..=1.0).contains(&value) {
        Err(serde::de::Error::custom("Value must be between 0 and 1"))?
    }

    Ok(Dimensionless(value))
}

/// Read an optional boolean flag.
///
/// Accepts `0`, `1`, `true` and `false` (case-insensitive). A blank cell or `.` gives `None`.
pub fn deserialise_flag<'de, D>(deserialiser: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: String = Deserialize::deserialize(deserialiser)?;
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "." => Ok(None),
        "1" | "true" => Ok(Some(true)),
        "0" | "false" => Ok(Some(false)),
        _ => Err(serde::de::Error::custom(format!(
            "Invalid flag value {value:?} (must be 0, 1, true or false)"
        ))),
    }
}

/// Read the RPS policy inputs from the specified directory and declare the policy.
///
/// Reads `rps.toml` (optional), `fuels.tab` and `rps_targets.tab`.
///
/// # Arguments
///
/// * `inputs_dir` - Folder containing the input files
/// * `model` - The host model
///
/// # Returns
///
/// The RPS policy or an error.
pub fn read_rps_policy(inputs_dir: &Path, model: &Model) -> Result<RpsPolicy> {
    let parameters = RpsParameters::from_path(inputs_dir)?;
    let fuel_eligibility = read_fuel_eligibility(inputs_dir, &model.fuels)?;
    let targets = read_rps_targets(inputs_dir, &model.periods)?;
    let policy = RpsPolicy::new(model, fuel_eligibility, targets, parameters)?;
    info!(
        "Loaded RPS policy with {} target period(s) from {}",
        policy.iter_periods().count(),
        inputs_dir.display()
    );

    Ok(policy)
}
