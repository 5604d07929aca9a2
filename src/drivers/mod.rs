//! Drivers to carry out qcutils functionalities.

use anyhow;

pub mod ci_conversion;
pub mod configuration_enumeration;
pub mod pair_distribution;
pub mod rdm_assembly;

// =================
// Trait definitions
// =================

/// Trait defining behaviours of `qcutils` drivers.
pub trait QCDriver {
    /// The type of the parameter structure controlling the driver.
    type Params;

    /// The type of the successful outcome when executing the driver.
    type Outcome;

    /// Executes the driver and stores the result internally.
    fn run(&mut self) -> Result<(), anyhow::Error>;

    /// Returns the result of the driver execution.
    fn result(&self) -> Result<&Self::Outcome, anyhow::Error>;
}
