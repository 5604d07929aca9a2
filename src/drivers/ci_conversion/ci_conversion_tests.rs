use std::path::PathBuf;

use crate::conversion::CSV_HEADER;
use crate::drivers::ci_conversion::{CiConversionDriver, CiConversionParams};
use crate::drivers::QCDriver;
use crate::io::{read_lines, write_lines};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "qcutils_ci_driver_test_{name}_{}",
        std::process::id()
    ))
}

#[test]
fn test_drivers_ci_conversion_listing() {
    let input = temp_path("input.txt");
    let output = temp_path("output.csv");
    write_lines(
        &input,
        [
            "alpha beta coefficient",
            "[0 1 2] [0 1 2] 0.9745",
            "[0 1 2] [0 1 3] -0.0412",
            "[0 1 2] [0 1 3 4] 0.001",
        ],
    )
    .unwrap();

    let params = CiConversionParams::builder()
        .n_orbitals(6)
        .n_electrons(6)
        .build()
        .unwrap();
    let mut driver = CiConversionDriver::builder()
        .parameters(&params)
        .input_path(input.clone())
        .output_path(Some(output.clone()))
        .build()
        .unwrap();
    assert!(driver.result().is_err());
    driver.run().unwrap();

    let res = driver.result().unwrap();
    assert!(res.conversion.header_skipped);
    assert_eq!(res.conversion.records.len(), 2);
    assert_eq!(res.conversion.skipped.len(), 1);
    assert_eq!(res.conversion.skipped[0].0, 4);
    assert!(res.to_string().contains("Expected 6 electrons but found 7"));

    let lines = read_lines(&output).unwrap();
    assert_eq!(
        lines,
        vec![
            CSV_HEADER.to_string(),
            "[0 1 2],[0 1 2],0.9745,222000".to_string(),
            "[0 1 2],[0 1 3],-0.0412,22ab00".to_string(),
        ]
    );
    std::fs::remove_file(&input).unwrap();
    std::fs::remove_file(&output).unwrap();
}

#[test]
fn test_drivers_ci_conversion_missing_input() {
    let params = CiConversionParams::default();
    let mut driver = CiConversionDriver::builder()
        .parameters(&params)
        .input_path(temp_path("does_not_exist.txt"))
        .build()
        .unwrap();
    let err = driver.run().unwrap_err();
    assert!(err.to_string().contains("Unable to open CI vector listing"));
    assert!(driver.result().is_err());
}
