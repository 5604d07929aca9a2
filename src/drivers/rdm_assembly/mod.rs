//! Driver for the assembly of molecular-orbital reduced density matrices from active-space ones.

use std::fmt;
use std::path::PathBuf;

use anyhow::{self, format_err, Context};
use derive_builder::Builder;
use ndarray::{Array2, Array4};
use serde::{Deserialize, Serialize};

use crate::drivers::QCDriver;
use crate::interfaces::binaries::{
    read_binary_array, write_binary_array, ByteOrder, MatrixOrder,
};
use crate::io::format::{log_subtitle, log_title, nice_bool, qcutils_output, QCUtilsOutput};
use crate::io::{write_qcutils_binary, QCUtilsFileType};
use crate::rdm::{make_rdm12_on_mo, MoRdms};


// ==================
// Struct definitions
// ==================

// ----------
// Parameters
// ----------

/// A structure containing control parameters for RDM assembly.
#[derive(Clone, Builder, Debug, Serialize, Deserialize)]
pub struct RdmAssemblyParams {
    /// The number of doubly occupied core orbitals.
    pub ncore: usize,

    /// The number of active orbitals.
    pub ncas: usize,

    /// The total number of molecular orbitals.
    pub nmo: usize,

    /// Path to a binary file containing the active-space one-particle density matrix.
    pub casdm1: PathBuf,

    /// Path to a binary file containing the active-space two-particle density matrix.
    pub casdm2: PathBuf,

    /// Specification of the byte order numerical values are stored in binary files. This applies
    /// to both the input and the output files.
    #[builder(default)]
    #[serde(default)]
    pub byte_order: ByteOrder,

    /// Specification of the order matrix elements are packed in binary files. This applies to
    /// both the input and the output files.
    #[builder(default)]
    #[serde(default)]
    pub matrix_order: MatrixOrder,

    /// Optional path to a binary file to which the assembled one-particle density matrix is
    /// written.
    #[builder(default = "None")]
    #[serde(default)]
    pub dm1_output: Option<PathBuf>,

    /// Optional path to a binary file to which the assembled two-particle density matrix is
    /// written.
    #[builder(default = "None")]
    #[serde(default)]
    pub dm2_output: Option<PathBuf>,

    /// Optional name for saving the result as a binary file of type [`QCUtilsFileType::Rdm`].
    /// If `None`, the result will not be saved.
    #[builder(default = "None")]
    #[serde(default)]
    pub result_save_name: Option<PathBuf>,
}

impl RdmAssemblyParams {
    /// Returns a builder to construct a [`RdmAssemblyParams`] structure.
    pub fn builder() -> RdmAssemblyParamsBuilder {
        RdmAssemblyParamsBuilder::default()
    }
}

impl Default for RdmAssemblyParams {
    fn default() -> Self {
        RdmAssemblyParams::builder()
            .ncore(2)
            .ncas(6)
            .nmo(20)
            .casdm1(PathBuf::from("path/to/casdm1"))
            .casdm2(PathBuf::from("path/to/casdm2"))
            .dm1_output(Some(PathBuf::from("path/to/dm1")))
            .dm2_output(Some(PathBuf::from("path/to/dm2")))
            .build()
            .expect("Unable to build a default `RdmAssemblyParams`.")
    }
}

impl fmt::Display for RdmAssemblyParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Core orbitals: {}", self.ncore)?;
        writeln!(f, "Active orbitals: {}", self.ncas)?;
        writeln!(f, "Molecular orbitals: {}", self.nmo)?;
        writeln!(f, "Active-space 1-RDM: {}", self.casdm1.display())?;
        writeln!(f, "Active-space 2-RDM: {}", self.casdm2.display())?;
        writeln!(f, "Binary byte order: {}", self.byte_order)?;
        writeln!(f, "Binary matrix order: {}", self.matrix_order)?;
        for (name, path) in [("1-RDM", &self.dm1_output), ("2-RDM", &self.dm2_output)] {
            writeln!(
                f,
                "Write MO {name} to binary file: {}",
                if let Some(path) = path.as_ref() {
                    path.display().to_string()
                } else {
                    nice_bool(false)
                }
            )?;
        }
        writeln!(
            f,
            "Save RDM assembly results to file: {}",
            if let Some(name) = self.result_save_name.as_ref() {
                format!("{}.{}", name.display(), QCUtilsFileType::Rdm.ext())
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

/// A structure to contain RDM assembly results.
#[derive(Clone, Builder, Debug, Serialize, Deserialize)]
pub struct RdmAssemblyResult {
    /// The control parameters used to obtain this set of results.
    pub parameters: RdmAssemblyParams,

    /// The trace of the active-space one-particle density matrix.
    pub casdm1_trace: f64,

    /// The assembled density matrices.
    pub rdms: MoRdms,
}

impl RdmAssemblyResult {
    /// Returns a builder to construct a [`RdmAssemblyResult`] structure.
    fn builder() -> RdmAssemblyResultBuilder {
        RdmAssemblyResultBuilder::default()
    }

    /// Returns the expected trace of the assembled one-particle density matrix, which is twice
    /// the number of core orbitals plus the trace of the active-space one.
    pub fn expected_n_electrons(&self) -> f64 {
        2.0 * self.rdms.ncore as f64 + self.casdm1_trace
    }
}

impl fmt::Display for RdmAssemblyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rdms)?;
        writeln!(f, "Tr(CAS 1-RDM): {:.8}", self.casdm1_trace)?;
        writeln!(
            f,
            "Expected Tr(1-RDM) = 2 * ncore + Tr(CAS 1-RDM): {:.8}",
            self.expected_n_electrons()
        )?;
        writeln!(f)?;
        Ok(())
    }
}

// ------
// Driver
// ------

/// A driver for RDM assembly.
#[derive(Clone, Builder)]
pub struct RdmAssemblyDriver<'a> {
    /// The control parameters for RDM assembly.
    parameters: &'a RdmAssemblyParams,

    /// The result of the RDM assembly.
    #[builder(setter(skip), default = "None")]
    result: Option<RdmAssemblyResult>,
}

impl<'a> RdmAssemblyDriver<'a> {
    /// Returns a builder to construct a [`RdmAssemblyDriver`] structure.
    pub fn builder() -> RdmAssemblyDriverBuilder<'a> {
        RdmAssemblyDriverBuilder::default()
    }

    /// Executes RDM assembly.
    fn assemble_rdms(&mut self) -> Result<(), anyhow::Error> {
        log_title("RDM Assembly");
        qcutils_output!("");
        let params = self.parameters;
        params.log_output_display();

        let ncas = params.ncas;
        let casdm1: Array2<f64> = read_binary_array(
            &params.casdm1,
            (ncas, ncas),
            params.byte_order,
            params.matrix_order,
        )
        .with_context(|| "Unable to read the active-space 1-RDM")?;
        let casdm2: Array4<f64> = read_binary_array(
            &params.casdm2,
            (ncas, ncas, ncas, ncas),
            params.byte_order,
            params.matrix_order,
        )
        .with_context(|| "Unable to read the active-space 2-RDM")?;

        let rdms = make_rdm12_on_mo(
            casdm1.view(),
            casdm2.view(),
            params.ncore,
            ncas,
            params.nmo,
        )
        .with_context(|| "Unable to assemble the MO density matrices")?;
        let result = RdmAssemblyResult::builder()
            .parameters(params.clone())
            .casdm1_trace(casdm1.diag().sum())
            .rdms(rdms)
            .build()
            .with_context(|| "Unable to construct an RDM assembly result")?;
        log_subtitle("Assembled density matrices");
        qcutils_output!("");
        result.log_output_display();

        if let Some(path) = params.dm1_output.as_ref() {
            write_binary_array(
                path,
                &result.rdms.dm1,
                params.byte_order,
                params.matrix_order,
            )?;
            qcutils_output!("MO 1-RDM written to {}.", path.display());
        }
        if let Some(path) = params.dm2_output.as_ref() {
            write_binary_array(
                path,
                &result.rdms.dm2,
                params.byte_order,
                params.matrix_order,
            )?;
            qcutils_output!("MO 2-RDM written to {}.", path.display());
        }
        if let Some(name) = params.result_save_name.as_ref() {
            write_qcutils_binary(name, QCUtilsFileType::Rdm, &result)?;
            qcutils_output!(
                "RDM assembly results saved as {}.{}.",
                name.display(),
                QCUtilsFileType::Rdm.ext()
            );
        }
        qcutils_output!("");

        self.result = Some(result);
        Ok(())
    }
}

impl<'a> QCDriver for RdmAssemblyDriver<'a> {
    type Params = RdmAssemblyParams;

    type Outcome = RdmAssemblyResult;

    fn result(&self) -> Result<&Self::Outcome, anyhow::Error> {
        self.result
            .as_ref()
            .ok_or_else(|| format_err!("No RDM assembly results found."))
    }

    fn run(&mut self) -> Result<(), anyhow::Error> {
        self.assemble_rdms()
    }
}
