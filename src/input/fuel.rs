//! Code for reading RPS eligibility flags from the fuels file.
use super::*;
use crate::id::IDCollection;
use crate::model::EnergySourceID;
use indexmap::IndexSet;
use serde::Deserialize;
use std::collections::HashMap;

const FUELS_FILE_NAME: &str = "fuels.tab";

/// A row of the fuels file. Other columns (e.g. emission intensities) are ignored.
#[derive(PartialEq, Debug, Deserialize)]
struct FuelRaw {
    fuel: String,
    #[serde(default, deserialize_with = "deserialise_flag")]
    f_rps_eligible: Option<bool>,
}

/// Read RPS eligibility flags for fuels from the specified directory.
///
/// The file must exist, but the `f_rps_eligible` column is optional: if it is missing, every
/// fuel is ineligible.
///
/// # Arguments
///
/// * `inputs_dir` - Folder containing the input files
/// * `fuels` - All fuels in the model
///
/// # Returns
///
/// A map of fuel to eligibility flag. Fuels without an explicit flag are omitted.
pub fn read_fuel_eligibility(
    inputs_dir: &Path,
    fuels: &IndexSet<EnergySourceID>,
) -> Result<HashMap<EnergySourceID, bool>> {
    let file_path = inputs_dir.join(FUELS_FILE_NAME);
    let fuels_csv = read_csv_allow_empty(&file_path)?;
    read_fuel_eligibility_from_iter(fuels_csv, fuels).with_context(|| input_err_msg(&file_path))
}

fn read_fuel_eligibility_from_iter<I>(
    iter: I,
    fuels: &IndexSet<EnergySourceID>,
) -> Result<HashMap<EnergySourceID, bool>>
where
    I: Iterator<Item = FuelRaw>,
{
    let mut seen = IndexSet::new();
    let mut eligibility = HashMap::new();
    for raw in iter {
        let fuel = fuels.get_id_by_str(&raw.fuel)?;
        ensure!(
            seen.insert(fuel.clone()),
            "Fuel {fuel} is listed more than once"
        );

        if let Some(eligible) = raw.f_rps_eligible {
            eligibility.insert(fuel, eligible);
        }
    }

    Ok(eligibility)
}
