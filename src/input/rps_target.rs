//! Code for reading the RPS targets file.
use super::*;
use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;

const RPS_TARGETS_FILE_NAME: &str = "rps_targets.tab";

#[derive(PartialEq, Debug, Deserialize)]
struct RpsTargetRaw {
    #[serde(rename = "PERIOD")]
    period: u32,
    #[serde(deserialize_with = "deserialise_proportion")]
    rps_target: Dimensionless,
}

/// Read RPS targets from the specified directory.
///
/// The file is mandatory and must contain at least one target.
///
/// # Arguments
///
/// * `inputs_dir` - Folder containing the input files
/// * `periods` - All periods in the model
///
/// # Returns
///
/// The target for each RPS period, in file order.
pub fn read_rps_targets(
    inputs_dir: &Path,
    periods: &IndexSet<u32>,
) -> Result<IndexMap<u32, Dimensionless>> {
    let file_path = inputs_dir.join(RPS_TARGETS_FILE_NAME);
    let targets_csv = read_csv(&file_path)?;
    read_rps_targets_from_iter(targets_csv, periods).with_context(|| input_err_msg(&file_path))
}

fn read_rps_targets_from_iter<I>(
    iter: I,
    periods: &IndexSet<u32>,
) -> Result<IndexMap<u32, Dimensionless>>
where
    I: Iterator<Item = RpsTargetRaw>,
{
    let mut targets = IndexMap::new();
    for raw in iter {
        ensure!(
            periods.contains(&raw.period),
            "RPS period {} is not one of the model periods",
            raw.period
        );
        ensure!(
            targets.insert(raw.period, raw.rps_target).is_none(),
            "More than one RPS target provided for period {}",
            raw.period
        );
    }

    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use indexmap::indexmap;
    use rstest::{fixture, rstest};
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[fixture]
    fn periods() -> IndexSet<u32> {
        [2020, 2030, 2040].into_iter().collect()
    }

    fn raw(period: u32, rps_target: f64) -> RpsTargetRaw {
        RpsTargetRaw {
            period,
            rps_target: Dimensionless(rps_target),
        }
    }

    #[rstest]
    fn test_read_rps_targets_from_iter(periods: IndexSet<u32>) {
        let iter = [raw(2030, 0.4), raw(2020, 0.2)].into_iter();
        let targets = read_rps_targets_from_iter(iter, &periods).unwrap();
        assert_eq!(
            targets,
            indexmap! { 2030 => Dimensionless(0.4), 2020 => Dimensionless(0.2) }
        );
    }

    #[rstest]
    fn test_read_rps_targets_from_iter_unknown_period(periods: IndexSet<u32>) {
        let iter = [raw(2025, 0.4)].into_iter();
        assert_error!(
            read_rps_targets_from_iter(iter, &periods),
            "RPS period 2025 is not one of the model periods"
        );
    }

    #[rstest]
    fn test_read_rps_targets_from_iter_duplicate(periods: IndexSet<u32>) {
        let iter = [raw(2020, 0.4), raw(2020, 0.5)].into_iter();
        assert_error!(
            read_rps_targets_from_iter(iter, &periods),
            "More than one RPS target provided for period 2020"
        );
    }

    #[rstest]
    fn test_read_rps_targets(periods: IndexSet<u32>) {
        let dir = tempdir().unwrap();
        {
            let mut file = File::create(dir.path().join(RPS_TARGETS_FILE_NAME)).unwrap();
            writeln!(file, "PERIOD\trps_target\n2020\t0.25\n2040\t1").unwrap();
        }

        assert_eq!(
            read_rps_targets(dir.path(), &periods).unwrap(),
            indexmap! { 2020 => Dimensionless(0.25), 2040 => Dimensionless(1.0) }
        );
    }

    #[rstest]
    #[case("1.5")]
    #[case("-0.1")]
    fn test_read_rps_targets_out_of_range(periods: IndexSet<u32>, #[case] target: &str) {
        let dir = tempdir().unwrap();
        {
            let mut file = File::create(dir.path().join(RPS_TARGETS_FILE_NAME)).unwrap();
            writeln!(file, "PERIOD\trps_target\n2020\t{target}").unwrap();
        }

        assert!(read_rps_targets(dir.path(), &periods).is_err());
    }

    #[rstest]
    fn test_read_rps_targets_empty(periods: IndexSet<u32>) {
        let dir = tempdir().unwrap();
        {
            let mut file = File::create(dir.path().join(RPS_TARGETS_FILE_NAME)).unwrap();
            writeln!(file, "PERIOD\trps_target").unwrap();
        }

        assert!(read_rps_targets(dir.path(), &periods).is_err());
    }

    #[rstest]
    fn test_read_rps_targets_no_file(periods: IndexSet<u32>) {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join(RPS_TARGETS_FILE_NAME);
        assert_error!(
            read_rps_targets(dir.path(), &periods),
            format!("Error reading {}", file_path.display())
        );
    }
}
