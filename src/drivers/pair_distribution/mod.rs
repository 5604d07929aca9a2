//! Driver for the computation and comparison of pair-distribution functions from scattering
//! intensities.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{self, ensure, format_err, Context};
use derive_builder::Builder;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::drivers::QCDriver;
use crate::io::format::{
    log_subtitle, log_title, nice_bool, qcutils_output, write_subtitle, QCUtilsOutput,
};
use crate::io::numeric::read_text_table;
use crate::io::{write_lines, write_qcutils_binary, QCUtilsFileType};
use crate::scattering::{calc_pdf, compare, PairDistribution, ScatteringComparison};

#[cfg(test)]
#[path = "pair_distribution_tests.rs"]
mod pair_distribution_tests;

// ==================
// Struct definitions
// ==================

// ----------
// Parameters
// ----------

/// A structure specifying a scattering intensity file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScatteringSource {
    /// A label for the calculation, used in the output and in output file names.
    pub label: String,

    /// The path to a two-column text file of momentum transfers and scattering intensities.
    pub path: PathBuf,
}

/// A structure containing control parameters for pair-distribution function calculations.
#[derive(Clone, Builder, Debug, Serialize, Deserialize)]
pub struct PairDistributionParams {
    /// The scattering intensity of the reference calculation.
    pub reference: ScatteringSource,

    /// The scattering intensity of an optional second calculation to be compared against the
    /// reference.
    #[builder(default = "None")]
    #[serde(default)]
    pub other: Option<ScatteringSource>,

    /// Optional stem for the text tables to be written. The pair distribution of each
    /// calculation is written to `<stem>_<label>.txt`, and any comparison to
    /// `<stem>_comparison.txt`.
    #[builder(default = "None")]
    #[serde(default)]
    pub output_stem: Option<PathBuf>,

    /// Optional name for saving the result as a binary file of type [`QCUtilsFileType::Pdf`].
    /// If `None`, the result will not be saved.
    #[builder(default = "None")]
    #[serde(default)]
    pub result_save_name: Option<PathBuf>,
}

impl PairDistributionParams {
    /// Returns a builder to construct a [`PairDistributionParams`] structure.
    pub fn builder() -> PairDistributionParamsBuilder {
        PairDistributionParamsBuilder::default()
    }
}

impl Default for PairDistributionParams {
    fn default() -> Self {
        PairDistributionParams::builder()
            .reference(ScatteringSource {
                label: "reference".to_string(),
                path: PathBuf::from("path/to/reference/scattering"),
            })
            .other(Some(ScatteringSource {
                label: "other".to_string(),
                path: PathBuf::from("path/to/other/scattering"),
            }))
            .build()
            .expect("Unable to build a default `PairDistributionParams`.")
    }
}

impl fmt::Display for PairDistributionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Reference scattering: {} ({})",
            self.reference.label,
            self.reference.path.display()
        )?;
        if let Some(other) = self.other.as_ref() {
            writeln!(
                f,
                "Compared scattering: {} ({})",
                other.label,
                other.path.display()
            )?;
        }
        writeln!(
            f,
            "Write tables to text files: {}",
            if let Some(stem) = self.output_stem.as_ref() {
                format!("{}_*.txt", stem.display())
            } else {
                nice_bool(false)
            }
        )?;
        writeln!(
            f,
            "Save pair-distribution results to file: {}",
            if let Some(name) = self.result_save_name.as_ref() {
                format!("{}.{}", name.display(), QCUtilsFileType::Pdf.ext())
            } else {
                nice_bool(false)
            }
        )?;
        writeln!(f)?;
        Ok(())
    }
}

// ------
// Result
// ------

/// A structure to contain pair-distribution function results.
#[derive(Clone, Builder, Debug, Serialize, Deserialize)]
pub struct PairDistributionResult {
    /// The control parameters used to obtain this set of results.
    pub parameters: PairDistributionParams,

    /// The pair distribution of the reference calculation.
    pub reference: PairDistribution,

    /// The pair distribution of the second calculation, if any.
    #[builder(default = "None")]
    pub other: Option<PairDistribution>,

    /// The comparison between the two calculations, if a second calculation has been given.
    #[builder(default = "None")]
    pub comparison: Option<ScatteringComparison>,
}

impl PairDistributionResult {
    /// Returns a builder to construct a [`PairDistributionResult`] structure.
    fn builder() -> PairDistributionResultBuilder {
        PairDistributionResultBuilder::default()
    }
}

/// Returns the largest finite absolute value in a sequence.
fn max_abs_finite<'a, I: IntoIterator<Item = &'a f64>>(values: I) -> Option<f64> {
    values
        .into_iter()
        .filter(|x| x.is_finite())
        .map(|x| x.abs())
        .reduce(f64::max)
}

impl fmt::Display for PairDistributionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_subtitle(f, &self.parameters.reference.label)?;
        writeln!(f, "{}", self.reference)?;
        if let (Some(other_source), Some(other)) =
            (self.parameters.other.as_ref(), self.other.as_ref())
        {
            write_subtitle(f, &other_source.label)?;
            writeln!(f, "{other}")?;
        }
        if let Some(comparison) = self.comparison.as_ref() {
            write_subtitle(f, "Comparison")?;
            writeln!(
                f,
                "Largest intensity difference: {}",
                max_abs_finite(comparison.intensity_difference.iter())
                    .map(|x| format!("{x:.4} %"))
                    .unwrap_or_else(|| "--".to_string())
            )?;
            writeln!(
                f,
                "Largest PDF difference: {}",
                max_abs_finite(comparison.pdf_difference.iter())
                    .map(|x| format!("{x:.4} %"))
                    .unwrap_or_else(|| "--".to_string())
            )?;
            writeln!(f)?;
        }
        Ok(())
    }
}

// ------
// Driver
// ------

/// Appends a suffix to a file stem.
fn suffixed(stem: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(stem.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Reads a scattering table and computes its pair distribution.
fn pdf_from_source(
    source: &ScatteringSource,
) -> Result<(Array2<f64>, PairDistribution), anyhow::Error> {
    let data = read_text_table(&source.path).with_context(|| {
        format!(
            "Unable to read scattering data for `{}` from `{}`",
            source.label,
            source.path.display()
        )
    })?;
    let pd = calc_pdf(data.view()).with_context(|| {
        format!(
            "Unable to compute the pair-distribution function for `{}`",
            source.label
        )
    })?;
    Ok((data, pd))
}

/// A driver for pair-distribution function calculations.
#[derive(Clone, Builder)]
pub struct PairDistributionDriver<'a> {
    /// The control parameters for pair-distribution function calculations.
    parameters: &'a PairDistributionParams,

    /// The result of the pair-distribution function calculations.
    #[builder(setter(skip), default = "None")]
    result: Option<PairDistributionResult>,
}

impl<'a> PairDistributionDriver<'a> {
    /// Returns a builder to construct a [`PairDistributionDriver`] structure.
    pub fn builder() -> PairDistributionDriverBuilder<'a> {
        PairDistributionDriverBuilder::default()
    }

    /// Executes pair-distribution function calculations.
    fn calc_pair_distributions(&mut self) -> Result<(), anyhow::Error> {
        log_title("Pair-Distribution Functions");
        qcutils_output!("");
        let params = self.parameters;
        params.log_output_display();
        if let Some(other) = params.other.as_ref() {
            ensure!(
                other.label != params.reference.label,
                "The compared calculations must have distinct labels, but both are `{}`.",
                other.label
            );
        }

        let (data_ref, pd_ref) = pdf_from_source(&params.reference)?;
        let (pd_other, comparison) = if let Some(other) = params.other.as_ref() {
            let (data_other, pd_other) = pdf_from_source(other)?;
            let comparison = compare(data_ref.view(), data_other.view(), &pd_ref, &pd_other)
                .with_context(|| {
                    format!(
                        "Unable to compare `{}` against `{}`",
                        other.label, params.reference.label
                    )
                })?;
            (Some(pd_other), Some(comparison))
        } else {
            (None, None)
        };

        let result = PairDistributionResult::builder()
            .parameters(params.clone())
            .reference(pd_ref)
            .other(pd_other)
            .comparison(comparison)
            .build()
            .with_context(|| "Unable to construct a pair-distribution result")?;
        log_subtitle("Pair-distribution summary");
        qcutils_output!("");
        result.log_output_display();

        if let Some(stem) = params.output_stem.as_ref() {
            let mut tables = vec![(
                suffixed(stem, &format!("_{}.txt", params.reference.label)),
                result.reference.table_lines(),
            )];
            if let (Some(other_source), Some(other)) =
                (params.other.as_ref(), result.other.as_ref())
            {
                tables.push((
                    suffixed(stem, &format!("_{}.txt", other_source.label)),
                    other.table_lines(),
                ));
            }
            if let Some(comparison) = result.comparison.as_ref() {
                tables.push((
                    suffixed(stem, "_comparison.txt"),
                    comparison.table_lines(result.reference.r.view()),
                ));
            }
            for (path, lines) in tables {
                write_lines(&path, lines)?;
                qcutils_output!("Table written to {}.", path.display());
            }
            qcutils_output!("");
        }
        if let Some(name) = params.result_save_name.as_ref() {
            write_qcutils_binary(name, QCUtilsFileType::Pdf, &result)?;
            qcutils_output!(
                "Pair-distribution results saved as {}.{}.",
                name.display(),
                QCUtilsFileType::Pdf.ext()
            );
            qcutils_output!("");
        }

        self.result = Some(result);
        Ok(())
    }
}

impl<'a> QCDriver for PairDistributionDriver<'a> {
    type Params = PairDistributionParams;

    type Outcome = PairDistributionResult;

    fn result(&self) -> Result<&Self::Outcome, anyhow::Error> {
        self.result
            .as_ref()
            .ok_or_else(|| format_err!("No pair-distribution results found."))
    }

    fn run(&mut self) -> Result<(), anyhow::Error> {
        self.calc_pair_distributions()
    }
}
