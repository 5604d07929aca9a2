//! Command-line interface of the `qcutils` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::io::format::qcutils_output;

const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

/// Logs a nicely formatted qcutils heading to the `qcutils-output` logger.
pub fn log_heading() {
    let version = if let Some(ver) = VERSION {
        format!("v{ver}")
    } else {
        "v unknown".to_string()
    };
    qcutils_output!("╭─────────────────────────────────────────────────────────────────────────────────────────────────────╮");
    qcutils_output!("│                                                                                                     │");
    qcutils_output!("│                       ██████   ██████ ██    ██ ████████ ██ ██      ███████                          │");
    qcutils_output!("│                      ██    ██ ██      ██    ██    ██    ██ ██      ██                               │");
    qcutils_output!("│                      ██    ██ ██      ██    ██    ██    ██ ██      ███████                          │");
    qcutils_output!("│                      ██ ▄▄ ██ ██      ██    ██    ██    ██ ██           ██                          │");
    qcutils_output!("│                       ██████   ██████  ██████     ██    ██ ███████ ███████                          │");
    qcutils_output!("│                          ▀▀                                                                         │");
    qcutils_output!("│                                                                                                     │");
    qcutils_output!("│     Configuration enumeration · CI vector conversion · Pair distributions · RDM assembly            │");
    qcutils_output!("│                                                                                     {version:>15} │");
    qcutils_output!("╰─────────────────────────────────────────────────────────────────────────────────────────────────────╯");
    qcutils_output!("");
}

#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Runs the calculations specified in a YAML input file.
    Run {
        /// Path to the YAML input file.
        #[arg(short, long)]
        config: PathBuf,

        /// Stem of the output file. The main output is written to `<OUTPUT>.out`.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Writes a YAML input template with every section filled with default values.
    Template {
        /// Name of the template file to be written, without the `.yml` extension.
        #[arg(short, long, default_value = "qcutils_template")]
        name: PathBuf,
    },
}
