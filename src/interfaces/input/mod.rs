//! YAML input files for the `qcutils` binary.

use std::path::PathBuf;

use anyhow::{self, Context};
use serde::{Deserialize, Serialize};

use crate::drivers::ci_conversion::{CiConversionDriver, CiConversionParams};
use crate::drivers::configuration_enumeration::{
    ConfigurationEnumerationDriver, ConfigurationEnumerationParams,
};
use crate::drivers::pair_distribution::{PairDistributionDriver, PairDistributionParams};
use crate::drivers::rdm_assembly::{RdmAssemblyDriver, RdmAssemblyParams};
use crate::drivers::QCDriver;
use crate::interfaces::InputHandle;
use crate::io::format::{
    log_macsec_begin, log_macsec_end, qcutils_error, qcutils_output, qcutils_warn,
};


/// A structure specifying a CI vector conversion from a YAML input file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CiConversionInput {
    /// The control parameters for the conversion.
    pub parameters: CiConversionParams,

    /// The path to the CI vector listing to be converted.
    pub input_path: PathBuf,

    /// Optional path to the CSV file to be written.
    #[serde(default)]
    pub output_path: Option<PathBuf>,
}

impl Default for CiConversionInput {
    fn default() -> Self {
        CiConversionInput {
            parameters: CiConversionParams::default(),
            input_path: PathBuf::from("path/to/ci/vector"),
            output_path: Some(PathBuf::from("path/to/output.csv")),
        }
    }
}

/// A structure containing `qcutils` input parameters which can be serialised into and
/// deserialised from a YAML input file.
///
/// Every section is optional. The sections present are run in the order in which the fields are
/// declared.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Input {
    /// Specification for configuration enumeration. If `None`, no configuration enumeration will
    /// be performed.
    #[serde(default)]
    pub configuration_enumeration: Option<ConfigurationEnumerationParams>,

    /// Specification for CI vector conversion. If `None`, no CI vector conversion will be
    /// performed.
    #[serde(default)]
    pub ci_conversion: Option<CiConversionInput>,

    /// Specification for pair-distribution function calculations. If `None`, no
    /// pair-distribution functions will be computed.
    #[serde(default)]
    pub pair_distribution: Option<PairDistributionParams>,

    /// Specification for RDM assembly. If `None`, no RDM assembly will be performed.
    #[serde(default)]
    pub rdm_assembly: Option<RdmAssemblyParams>,
}

impl Default for Input {
    fn default() -> Self {
        Input {
            configuration_enumeration: Some(ConfigurationEnumerationParams::default()),
            ci_conversion: Some(CiConversionInput::default()),
            pair_distribution: Some(PairDistributionParams::default()),
            rdm_assembly: Some(RdmAssemblyParams::default()),
        }
    }
}

/// Runs a driver inside a macro-section of the output.
fn run_section<D: QCDriver>(title: &str, mut driver: D) -> Result<(), anyhow::Error> {
    log_macsec_begin(title);
    qcutils_output!("");
    let outcome = driver.run();
    if let Err(err) = outcome.as_ref() {
        qcutils_error!("{err:#}");
    }
    log_macsec_end(title);
    qcutils_output!("");
    outcome.with_context(|| format!("{title} failed"))
}

impl InputHandle for Input {
    /// Handles the `qcutils` input specification and runs every section present.
    ///
    /// The first section that fails aborts the run.
    fn handle(&self) -> Result<(), anyhow::Error> {
        let mut n_sections = 0;

        if let Some(params) = self.configuration_enumeration.as_ref() {
            let driver = ConfigurationEnumerationDriver::builder()
                .parameters(params)
                .build()
                .with_context(|| "Unable to construct a configuration enumeration driver")?;
            run_section("Configuration enumeration", driver)?;
            n_sections += 1;
        }

        if let Some(ci_input) = self.ci_conversion.as_ref() {
            let driver = CiConversionDriver::builder()
                .parameters(&ci_input.parameters)
                .input_path(ci_input.input_path.clone())
                .output_path(ci_input.output_path.clone())
                .build()
                .with_context(|| "Unable to construct a CI vector conversion driver")?;
            run_section("CI vector conversion", driver)?;
            n_sections += 1;
        }

        if let Some(params) = self.pair_distribution.as_ref() {
            let driver = PairDistributionDriver::builder()
                .parameters(params)
                .build()
                .with_context(|| "Unable to construct a pair-distribution driver")?;
            run_section("Pair-distribution functions", driver)?;
            n_sections += 1;
        }

        if let Some(params) = self.rdm_assembly.as_ref() {
            let driver = RdmAssemblyDriver::builder()
                .parameters(params)
                .build()
                .with_context(|| "Unable to construct an RDM assembly driver")?;
            run_section("RDM assembly", driver)?;
            n_sections += 1;
        }

        if n_sections == 0 {
            qcutils_warn!("No sections found in the input. Nothing has been done.");
        }
        Ok(())
    }
}
