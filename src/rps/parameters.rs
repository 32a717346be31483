//! Defines the `RpsParameters` struct, which represents the contents of `rps.toml`.
use crate::input::read_toml;
use anyhow::Result;
use serde::Deserialize;
use serde_string_enum::DeserializeLabeledStringEnum;
use std::path::Path;

const RPS_PARAMETERS_FILE_NAME: &str = "rps.toml";

/// The quantity to which the RPS target fraction applies
#[derive(DeserializeLabeledStringEnum, Debug, Clone, Copy, PartialEq, Default)]
pub enum TargetBasis {
    /// The target is a fraction of total demand in the period
    #[default]
    #[string = "demand"]
    Demand,
    /// The target is a fraction of total generation in the period
    #[string = "generation"]
    Generation,
}

/// Parameters for the RPS policy
#[derive(Debug, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct RpsParameters {
    /// The quantity to which the RPS target applies
    #[serde(default)]
    pub target_basis: TargetBasis,
    /// Whether to write the duals of the RPS constraints to an additional output file
    #[serde(default)]
    pub debug_model: bool,
}

impl RpsParameters {
    /// Read the RPS parameters file from the inputs directory.
    ///
    /// If the file is not present, default values will be used.
    pub fn from_path<P: AsRef<Path>>(inputs_dir: P) -> Result<RpsParameters> {
        let file_path = inputs_dir.as_ref().join(RPS_PARAMETERS_FILE_NAME);
        if !file_path.is_file() {
            return Ok(RpsParameters::default());
        }

        read_toml(&file_path)
    }
}
