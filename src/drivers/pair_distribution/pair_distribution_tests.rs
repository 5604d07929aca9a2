use std::path::PathBuf;

use approx::assert_relative_eq;

use crate::drivers::pair_distribution::{
    PairDistributionDriver, PairDistributionParams, PairDistributionResult, ScatteringSource,
};
use crate::drivers::QCDriver;
use crate::io::{read_lines, read_qcutils_binary, write_lines, QCUtilsFileType};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "qcutils_pdf_driver_test_{name}_{}",
        std::process::id()
    ))
}

/// Writes a Gaussian scattering intensity `scale * exp(-q^2)` as a two-column table.
fn write_gaussian_scattering(path: &PathBuf, scale: f64) {
    let lines = std::iter::once("# q I(q)".to_string()).chain((0..200).map(|i| {
        let q = i as f64 * 0.05;
        format!("{q:.6} {:.16e}", scale * (-q * q).exp())
    }));
    write_lines(path, lines).unwrap();
}

#[test]
fn test_drivers_pair_distribution_single() {
    let input = temp_path("single.dat");
    write_gaussian_scattering(&input, 1.0);
    let params = PairDistributionParams::builder()
        .reference(ScatteringSource {
            label: "hf".to_string(),
            path: input.clone(),
        })
        .build()
        .unwrap();
    let mut driver = PairDistributionDriver::builder()
        .parameters(&params)
        .build()
        .unwrap();
    assert!(driver.result().is_err());
    driver.run().unwrap();

    let res = driver.result().unwrap();
    assert!(res.other.is_none());
    assert!(res.comparison.is_none());
    assert_eq!(res.reference.r.len(), 200);
    assert_relative_eq!(res.reference.integral, 0.5, max_relative = 1e-2);
    assert!(res.to_string().contains("Integral = "));
    std::fs::remove_file(&input).unwrap();
}

#[test]
fn test_drivers_pair_distribution_comparison() {
    let reference = temp_path("reference.dat");
    let other = temp_path("other.dat");
    write_gaussian_scattering(&reference, 1.0);
    write_gaussian_scattering(&other, 1.1);
    let stem = temp_path("tables");
    let save_name = temp_path("saved");
    let params = PairDistributionParams::builder()
        .reference(ScatteringSource {
            label: "hf".to_string(),
            path: reference.clone(),
        })
        .other(Some(ScatteringSource {
            label: "casscf".to_string(),
            path: other.clone(),
        }))
        .output_stem(Some(stem.clone()))
        .result_save_name(Some(save_name.clone()))
        .build()
        .unwrap();
    let mut driver = PairDistributionDriver::builder()
        .parameters(&params)
        .build()
        .unwrap();
    driver.run().unwrap();

    let res = driver.result().unwrap();
    let comparison = res.comparison.as_ref().unwrap();
    comparison
        .intensity_difference
        .iter()
        .for_each(|d| assert_relative_eq!(*d, 10.0, max_relative = 1e-8));
    let output = res.to_string();
    assert!(output.contains("casscf"));
    assert!(output.contains("Largest intensity difference: 10.0000 %"));

    for suffix in ["_hf.txt", "_casscf.txt", "_comparison.txt"] {
        let mut name = stem.clone().into_os_string();
        name.push(suffix);
        let path = PathBuf::from(name);
        assert_eq!(read_lines(&path).unwrap().len(), 201);
        std::fs::remove_file(&path).unwrap();
    }

    let saved: PairDistributionResult =
        read_qcutils_binary(&save_name, QCUtilsFileType::Pdf).unwrap();
    assert_eq!(saved.reference, res.reference);
    std::fs::remove_file(save_name.with_extension(QCUtilsFileType::Pdf.ext())).unwrap();
    std::fs::remove_file(&reference).unwrap();
    std::fs::remove_file(&other).unwrap();
}

#[test]
fn test_drivers_pair_distribution_invalid() {
    let input = temp_path("duplicate.dat");
    write_gaussian_scattering(&input, 1.0);
    let source = ScatteringSource {
        label: "same".to_string(),
        path: input.clone(),
    };
    let params = PairDistributionParams::builder()
        .reference(source.clone())
        .other(Some(source))
        .build()
        .unwrap();
    let mut driver = PairDistributionDriver::builder()
        .parameters(&params)
        .build()
        .unwrap();
    assert!(driver.run().is_err());
    std::fs::remove_file(&input).unwrap();

    let params = PairDistributionParams::default();
    let mut driver = PairDistributionDriver::builder()
        .parameters(&params)
        .build()
        .unwrap();
    let err = driver.run().unwrap_err();
    assert!(err
        .to_string()
        .contains("Unable to read scattering data for `reference`"));
}
