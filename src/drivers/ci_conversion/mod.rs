//! Driver for the conversion of CI vector listings into occupation notation.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{self, format_err, Context};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::conversion::{convert_listing, CiConversion, CiConverter};
use crate::drivers::QCDriver;
use crate::io::format::{log_subtitle, log_title, qcutils_output, QCUtilsOutput};
use crate::io::write_lines;

#[cfg(test)]
#[path = "ci_conversion_tests.rs"]
mod ci_conversion_tests;

// ==================
// Struct definitions
// ==================

// ----------
// Parameters
// ----------

/// A structure containing control parameters for CI vector conversion.
#[derive(Clone, Builder, Debug, Serialize, Deserialize)]
pub struct CiConversionParams {
    /// The number of orbitals in the active space.
    pub n_orbitals: usize,

    /// The number of electrons in the active space.
    pub n_electrons: usize,
}

impl CiConversionParams {
    /// Returns a builder to construct a [`CiConversionParams`] structure.
    pub fn builder() -> CiConversionParamsBuilder {
        CiConversionParamsBuilder::default()
    }
}

impl Default for CiConversionParams {
    fn default() -> Self {
        CiConversionParams {
            n_orbitals: 6,
            n_electrons: 6,
        }
    }
}

impl fmt::Display for CiConversionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Active orbitals: {}", self.n_orbitals)?;
        writeln!(f, "Active electrons: {}", self.n_electrons)?;
        writeln!(f)?;
        Ok(())
    }
}

// ------
// Result
// ------

/// A structure to contain CI vector conversion results.
#[derive(Clone, Builder, Debug, Serialize, Deserialize)]
pub struct CiConversionResult {
    /// The control parameters used to obtain this set of results.
    pub parameters: CiConversionParams,

    /// The converted listing.
    pub conversion: CiConversion,
}

impl CiConversionResult {
    /// Returns a builder to construct a [`CiConversionResult`] structure.
    fn builder() -> CiConversionResultBuilder {
        CiConversionResultBuilder::default()
    }
}

impl fmt::Display for CiConversionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.conversion)?;
        if !self.conversion.skipped.is_empty() {
            writeln!(f, "Skipped lines:")?;
            for (line, reason) in self.conversion.skipped.iter() {
                writeln!(f, "  {line:>6}: {reason}")?;
            }
        }
        writeln!(f)?;
        Ok(())
    }
}

// ------
// Driver
// ------

/// A driver for CI vector conversion.
#[derive(Clone, Builder)]
pub struct CiConversionDriver<'a> {
    /// The control parameters for CI vector conversion.
    parameters: &'a CiConversionParams,

    /// The path to the CI vector listing to be converted.
    input_path: PathBuf,

    /// Optional path to the CSV file to be written.
    #[builder(default = "None")]
    output_path: Option<PathBuf>,

    /// The result of the CI vector conversion.
    #[builder(setter(skip), default = "None")]
    result: Option<CiConversionResult>,
}

impl<'a> CiConversionDriver<'a> {
    /// Returns a builder to construct a [`CiConversionDriver`] structure.
    pub fn builder() -> CiConversionDriverBuilder<'a> {
        CiConversionDriverBuilder::default()
    }

    /// Executes CI vector conversion.
    fn convert(&mut self) -> Result<(), anyhow::Error> {
        log_title("CI Vector Conversion");
        qcutils_output!("");
        let params = self.parameters;
        params.log_output_display();

        qcutils_output!("Input listing: {}", self.input_path.display());
        qcutils_output!("");
        let reader = BufReader::new(File::open(&self.input_path).with_context(|| {
            format!(
                "Unable to open CI vector listing `{}`",
                self.input_path.display()
            )
        })?);
        let converter = CiConverter::new(params.n_orbitals, params.n_electrons);
        let conversion = convert_listing(reader, &converter).with_context(|| {
            format!(
                "Unable to convert CI vector listing `{}`",
                self.input_path.display()
            )
        })?;

        let result = CiConversionResult::builder()
            .parameters(params.clone())
            .conversion(conversion)
            .build()
            .with_context(|| "Unable to construct a CI vector conversion result")?;
        log_subtitle("Conversion summary");
        qcutils_output!("");
        result.log_output_display();

        if let Some(path) = self.output_path.as_ref() {
            write_lines(path, result.conversion.csv_lines())?;
            qcutils_output!("Converted CI vector written to {}.", path.display());
            qcutils_output!("");
        }

        self.result = Some(result);
        Ok(())
    }
}

impl<'a> QCDriver for CiConversionDriver<'a> {
    type Params = CiConversionParams;

    type Outcome = CiConversionResult;

    fn result(&self) -> Result<&Self::Outcome, anyhow::Error> {
        self.result
            .as_ref()
            .ok_or_else(|| format_err!("No CI vector conversion results found."))
    }

    fn run(&mut self) -> Result<(), anyhow::Error> {
        self.convert()
    }
}
