//! Driver for the enumeration of active-space configurations.

use std::fmt;
use std::path::PathBuf;

use anyhow::{self, format_err, Context};
use derive_builder::Builder;
use indexmap::IndexMap;
use itertools::Itertools;
use log;
use serde::{Deserialize, Serialize};

use crate::configuration::{
    ConfigurationEnumerator, ConfigurationSet, ElectronBudget, OrbitalSpace,
};
use crate::drivers::QCDriver;
use crate::io::format::{log_subtitle, log_title, nice_bool, qcutils_output, QCUtilsOutput};
use crate::io::{write_lines, write_qcutils_binary, QCUtilsFileType};


// ==================
// Struct definitions
// ==================

// ----------
// Parameters
// ----------

fn default_preview_count() -> usize {
    10
}

/// A structure containing control parameters for configuration enumeration.
#[derive(Clone, Builder, Debug, Serialize, Deserialize)]
pub struct ConfigurationEnumerationParams {
    /// The total number of electrons in the system.
    pub total_electrons: usize,

    /// The number of frozen core electrons, which are excluded from the enumeration.
    #[builder(default = "0")]
    #[serde(default)]
    pub frozen_core: usize,

    /// The irreps of the active orbitals and the number of orbitals in each. The order of the
    /// irreps defines the orbital indexing and the grouping of the output configurations.
    pub irrep_specs: IndexMap<String, usize>,

    /// Boolean indicating if the enumeration is to be distributed over the `rayon` thread pool.
    #[builder(default = "false")]
    #[serde(default)]
    pub parallel: bool,

    /// The number of configurations, in sorted order, to be shown in the output.
    #[builder(default = "default_preview_count()")]
    #[serde(default = "default_preview_count")]
    pub preview_count: usize,

    /// Optional path to a text file to which all configurations are written, one per line in
    /// sorted order.
    #[builder(default = "None")]
    #[serde(default)]
    pub output_path: Option<PathBuf>,

    /// Optional name for saving the result as a binary file of type [`QCUtilsFileType::Cfg`].
    /// If `None`, the result will not be saved.
    #[builder(default = "None")]
    #[serde(default)]
    pub result_save_name: Option<PathBuf>,
}

impl ConfigurationEnumerationParams {
    /// Returns a builder to construct a [`ConfigurationEnumerationParams`] structure.
    pub fn builder() -> ConfigurationEnumerationParamsBuilder {
        ConfigurationEnumerationParamsBuilder::default()
    }
}

impl Default for ConfigurationEnumerationParams {
    fn default() -> Self {
        let irrep_specs = [
            ("Ag", 5),
            ("B3u", 2),
            ("B2u", 2),
            ("B1g", 1),
            ("B1u", 2),
            ("B2g", 1),
            ("B3g", 1),
        ]
        .into_iter()
        .map(|(irrep, n)| (irrep.to_string(), n))
        .collect::<IndexMap<_, _>>();
        ConfigurationEnumerationParams::builder()
            .total_electrons(10)
            .frozen_core(2)
            .irrep_specs(irrep_specs)
            .build()
            .expect("Unable to build a default `ConfigurationEnumerationParams`.")
    }
}

impl fmt::Display for ConfigurationEnumerationParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total electrons: {}", self.total_electrons)?;
        writeln!(f, "Frozen core electrons: {}", self.frozen_core)?;
        writeln!(
            f,
            "Active orbitals: {}",
            self.irrep_specs
                .iter()
                .map(|(irrep, n)| format!("{irrep}({n})"))
                .join(" ")
        )?;
        writeln!(f, "Parallel enumeration: {}", nice_bool(self.parallel))?;
        writeln!(f, "Configurations to preview: {}", self.preview_count)?;
        writeln!(
            f,
            "Write configurations to text file: {}",
            if let Some(path) = self.output_path.as_ref() {
                path.display().to_string()
            } else {
                nice_bool(false)
            }
        )?;
        writeln!(
            f,
            "Save configuration enumeration results to file: {}",
            if let Some(name) = self.result_save_name.as_ref() {
                format!("{}.{}", name.display(), QCUtilsFileType::Cfg.ext())
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

/// A structure to contain configuration enumeration results.
#[derive(Clone, Builder, Debug, Serialize, Deserialize)]
pub struct ConfigurationEnumerationResult {
    /// The control parameters used to obtain this set of results.
    pub parameters: ConfigurationEnumerationParams,

    /// The orbital space in which the configurations were enumerated.
    pub orbital_space: OrbitalSpace,

    /// The electron counts used for the enumeration.
    pub electron_budget: ElectronBudget,

    /// The distinct configurations found.
    pub configurations: ConfigurationSet,
}

impl ConfigurationEnumerationResult {
    /// Returns a builder to construct a [`ConfigurationEnumerationResult`] structure.
    fn builder() -> ConfigurationEnumerationResultBuilder {
        ConfigurationEnumerationResultBuilder::default()
    }
}

impl fmt::Display for ConfigurationEnumerationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Orbital space: {} ({} orbitals)",
            self.orbital_space,
            self.orbital_space.n_orbitals()
        )?;
        writeln!(
            f,
            "Active electrons: {} ({} alpha, {} beta)",
            self.electron_budget.active_electrons(),
            self.electron_budget.n_alpha(),
            self.electron_budget.n_beta()
        )?;
        writeln!(f, "Unique configurations: {}", self.configurations.len())?;

        let preview = self.configurations.preview(self.parameters.preview_count);
        if !preview.is_empty() {
            writeln!(f)?;
            writeln!(
                f,
                "First {} configuration{} in sorted order:",
                preview.len(),
                if preview.len() != 1 { "s" } else { "" }
            )?;
            for configuration in preview {
                writeln!(f, "  {configuration}")?;
            }
        }
        writeln!(f)?;
        Ok(())
    }
}

// ------
// Driver
// ------

/// A driver for configuration enumeration.
#[derive(Clone, Builder)]
pub struct ConfigurationEnumerationDriver<'a> {
    /// The control parameters for configuration enumeration.
    parameters: &'a ConfigurationEnumerationParams,

    /// The result of the configuration enumeration.
    #[builder(setter(skip), default = "None")]
    result: Option<ConfigurationEnumerationResult>,
}

impl<'a> ConfigurationEnumerationDriver<'a> {
    /// Returns a builder to construct a [`ConfigurationEnumerationDriver`] structure.
    pub fn builder() -> ConfigurationEnumerationDriverBuilder<'a> {
        ConfigurationEnumerationDriverBuilder::default()
    }

    /// Executes configuration enumeration.
    fn enumerate_configurations(&mut self) -> Result<(), anyhow::Error> {
        log_title("Configuration Enumeration");
        qcutils_output!("");
        let params = self.parameters;
        params.log_output_display();

        let enumerator = ConfigurationEnumerator::new(
            params.total_electrons,
            params.frozen_core,
            params.irrep_specs.clone(),
        )
        .with_context(|| "Unable to construct a configuration enumerator")?;
        let configurations = if params.parallel {
            log::debug!(
                "Parallel enumeration over {} threads.",
                rayon::current_num_threads()
            );
            enumerator.enumerate_par()
        } else {
            enumerator.enumerate()
        };

        let result = ConfigurationEnumerationResult::builder()
            .parameters(params.clone())
            .orbital_space(enumerator.orbital_space().clone())
            .electron_budget(*enumerator.electron_budget())
            .configurations(configurations)
            .build()
            .with_context(|| "Unable to construct a configuration enumeration result")?;
        log_subtitle("Enumeration summary");
        qcutils_output!("");
        result.log_output_display();

        if let Some(path) = params.output_path.as_ref() {
            write_lines(path, result.configurations.sorted())?;
            qcutils_output!(
                "{} configurations written to {}.",
                result.configurations.len(),
                path.display()
            );
            qcutils_output!("");
        }
        if let Some(name) = params.result_save_name.as_ref() {
            write_qcutils_binary(name, QCUtilsFileType::Cfg, &result)?;
            qcutils_output!(
                "Configuration enumeration results saved as {}.{}.",
                name.display(),
                QCUtilsFileType::Cfg.ext()
            );
            qcutils_output!("");
        }

        self.result = Some(result);
        Ok(())
    }
}

impl<'a> QCDriver for ConfigurationEnumerationDriver<'a> {
    type Params = ConfigurationEnumerationParams;

    type Outcome = ConfigurationEnumerationResult;

    fn result(&self) -> Result<&Self::Outcome, anyhow::Error> {
        self.result
            .as_ref()
            .ok_or_else(|| format_err!("No configuration enumeration results found."))
    }

    fn run(&mut self) -> Result<(), anyhow::Error> {
        self.enumerate_configurations()
    }
}
