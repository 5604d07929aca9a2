//! Nice qcutils output formatting.

use std::fmt;

use log;

const QCUTILS_BANNER_LENGTH: usize = 103;

/// Logs an error to the `qcutils-output` logger.
macro_rules! qcutils_error {
    ($fmt:expr $(, $($arg:tt)*)?) => {
        log::error!($fmt, $($($arg)*)?);
        log::error!(target: "qcutils-output", $fmt, $($($arg)*)?);
    }
}

/// Logs a warning to the `qcutils-output` logger.
macro_rules! qcutils_warn {
    ($fmt:expr $(, $($arg:tt)*)?) => { log::warn!(target: "qcutils-output", $fmt, $($($arg)*)?); }
}

/// Logs a main output line to the `qcutils-output` logger.
macro_rules! qcutils_output {
    ($fmt:expr $(, $($arg:tt)*)?) => { log::info!(target: "qcutils-output", $fmt, $($($arg)*)?); }
}

pub(crate) use {qcutils_error, qcutils_output, qcutils_warn};

/// Logs a nicely formatted section title to the `qcutils-output` logger.
pub(crate) fn log_title(title: &str) {
    let length = title.chars().count().max(QCUTILS_BANNER_LENGTH - 6);
    let bar = "─".repeat(length);
    qcutils_output!("┌──{bar}──┐");
    qcutils_output!("│§ {title:^length$} §│");
    qcutils_output!("└──{bar}──┘");
}

/// Writes a nicely formatted subtitle.
pub(crate) fn write_subtitle(f: &mut fmt::Formatter<'_>, subtitle: &str) -> fmt::Result {
    let length = subtitle.chars().count();
    let bar = "═".repeat(length);
    writeln!(f, "{subtitle}")?;
    writeln!(f, "{bar}")?;
    Ok(())
}

/// Logs a nicely formatted subtitle to the `qcutils-output` logger.
pub(crate) fn log_subtitle(subtitle: &str) {
    let length = subtitle.chars().count();
    let bar = "═".repeat(length);
    qcutils_output!("{}", subtitle);
    qcutils_output!("{}", bar);
}

/// Logs a nicely formatted macro-section beginning to the `qcutils-output` logger.
pub(crate) fn log_macsec_begin(sectitle: &str) {
    let width = QCUTILS_BANNER_LENGTH - 14;
    let sectitle_space = sectitle.to_string() + " ";
    qcutils_output!("❬❬❬❬❬ [Begin] {sectitle_space:❬<width$}");
}

/// Logs a nicely formatted macro-section ending to the `qcutils-output` logger.
pub(crate) fn log_macsec_end(sectitle: &str) {
    let width = QCUTILS_BANNER_LENGTH - 14;
    let sectitle_space = sectitle.to_string() + " ";
    qcutils_output!("❭❭❭❭❭ [ End ] {sectitle_space:❭<width$}");
}

/// Turns a boolean into a string of `yes` or `no`.
pub(crate) fn nice_bool(b: bool) -> String {
    if b {
        "yes".to_string()
    } else {
        "no".to_string()
    }
}

/// A trait for logging qcutils outputs nicely.
pub(crate) trait QCUtilsOutput: fmt::Display {
    /// Logs display output nicely.
    fn log_output_display(&self) {
        let lines = self.to_string();
        lines.lines().for_each(|line| {
            qcutils_output!("{line}");
        })
    }
}

// Blanket implementation
impl<T> QCUtilsOutput for T where T: fmt::Display {}
