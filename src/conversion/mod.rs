//! Conversion of configuration-interaction determinants from alpha/beta orbital-index notation
//! to occupation notation.
//!
//! A determinant printed as alpha and beta orbital lists, *e.g.*
//!
//! ```text
//! alpha     beta     coeff
//! [0 1 2]  [0 1 3]   0.03
//! ```
//!
//! is written in occupation notation as `22ab00` for an active space of six orbitals.

use std::fmt;
use std::io::BufRead;

use anyhow::{self, bail, ensure, format_err};
use itertools::Itertools;
use log;
use serde::{Deserialize, Serialize};

use crate::configuration::{Occupation, OccupationSymbol};
use crate::io::format::{nice_bool, qcutils_warn};


/// The header line of converted CSV files.
pub const CSV_HEADER: &str = "det-alpha,det-beta,CI coefficient,occupation";

// ============
// CI converter
// ============

/// A structure to convert determinants in an active space into occupation notation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CiConverter {
    /// The number of orbitals in the active space.
    n_orbitals: usize,

    /// The number of electrons in the active space.
    n_electrons: usize,
}

impl CiConverter {
    /// Constructs a converter for an active space.
    pub fn new(n_orbitals: usize, n_electrons: usize) -> Self {
        Self {
            n_orbitals,
            n_electrons,
        }
    }

    /// Converts a determinant into occupation notation.
    ///
    /// # Arguments
    ///
    /// * `det_alpha` - The indices of the orbitals occupied by alpha electrons.
    /// * `det_beta` - The indices of the orbitals occupied by beta electrons.
    ///
    /// # Errors
    ///
    /// Errors if an index is not smaller than the number of orbitals, if an orbital is occupied
    /// twice by the same spin, or if the number of electrons placed differs from the number of
    /// active electrons.
    pub fn det_to_occupation(
        &self,
        det_alpha: &[usize],
        det_beta: &[usize],
    ) -> Result<Occupation, anyhow::Error> {
        let mut symbols = vec![OccupationSymbol::Empty; self.n_orbitals];
        for &i in det_alpha {
            let symbol = symbols.get_mut(i).ok_or_else(|| {
                format_err!(
                    "Orbital index {i} exceeds number of orbitals {}",
                    self.n_orbitals
                )
            })?;
            *symbol = symbol
                .with_alpha()
                .ok_or_else(|| format_err!("Invalid: orbital {i} already has an alpha electron"))?;
        }
        for &i in det_beta {
            let symbol = symbols.get_mut(i).ok_or_else(|| {
                format_err!(
                    "Orbital index {i} exceeds number of orbitals {}",
                    self.n_orbitals
                )
            })?;
            *symbol = symbol
                .with_beta()
                .ok_or_else(|| format_err!("Invalid: orbital {i} already has a beta electron"))?;
        }
        let occ = Occupation::from(symbols);
        ensure!(
            occ.weight() == self.n_electrons,
            "Expected {} electrons but found {}",
            self.n_electrons,
            occ.weight()
        );
        Ok(occ)
    }
}

// =======
// Parsing
// =======

/// Parses a determinant string such as `[0 1 2]` into a list of orbital indices.
///
/// Surrounding brackets are optional, and indices may be separated by whitespace or commas. An
/// empty determinant `[]` gives an empty list.
pub fn parse_determinant(det_str: &str) -> Result<Vec<usize>, anyhow::Error> {
    let inner = det_str.trim().trim_matches(|c: char| c == '[' || c == ']');
    inner
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<usize>()
                .map_err(|err| format_err!("Error parsing determinant {det_str}: {err}"))
        })
        .collect()
}

/// Splits a record line on whitespace, keeping bracketed groups together.
fn split_record(line: &str) -> Result<Vec<String>, anyhow::Error> {
    let mut tokens = vec![];
    let mut current = String::new();
    let mut depth = 0usize;
    for c in line.chars() {
        match c {
            '[' => {
                depth += 1;
                current.push(c);
            }
            ']' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| format_err!("Unbalanced `]` in line `{line}`"))?;
                current.push(c);
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if depth != 0 {
        bail!("Unbalanced `[` in line `{line}`");
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}

/// A structure containing one converted determinant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CiRecord {
    /// The alpha determinant as written in the input.
    pub det_alpha: String,

    /// The beta determinant as written in the input.
    pub det_beta: String,

    /// The CI coefficient of the determinant.
    pub coefficient: f64,

    /// The determinant in occupation notation.
    pub occupation: Occupation,
}

impl CiRecord {
    /// Renders the record as a CSV row.
    pub fn to_csv_row(&self) -> String {
        [
            csv_field(&self.det_alpha),
            csv_field(&self.det_beta),
            format_coefficient(self.coefficient),
            self.occupation.to_string(),
        ]
        .join(",")
    }
}

/// Formats a coefficient as the shortest round-trip decimal. Exponents carry an explicit sign and
/// at least two digits, as in `1e-05` and `-1.234e+16`.
fn format_coefficient(coefficient: f64) -> String {
    if coefficient.is_nan() {
        return "nan".to_string();
    }
    let repr = format!("{coefficient:?}");
    match repr.split_once('e') {
        Some((mantissa, exponent)) => match exponent.parse::<i32>() {
            Ok(exp) => {
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
            }
            Err(_) => repr,
        },
        None => repr,
    }
}

/// Quotes a CSV field if it contains a comma, a quote or a line break.
fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Parses and converts a record line of the form `alpha beta coefficient`.
pub fn parse_record(line: &str, converter: &CiConverter) -> Result<CiRecord, anyhow::Error> {
    let parts = split_record(line)?;
    let [det_alpha, det_beta, coefficient] = <[String; 3]>::try_from(parts)
        .map_err(|parts| format_err!("Expected 3 fields but found {}", parts.len()))?;
    let alpha = parse_determinant(&det_alpha)?;
    let beta = parse_determinant(&det_beta)?;
    let coefficient = coefficient
        .parse::<f64>()
        .map_err(|err| format_err!("Error parsing coefficient {coefficient}: {err}"))?;
    let occupation = converter.det_to_occupation(&alpha, &beta)?;
    Ok(CiRecord {
        det_alpha,
        det_beta,
        coefficient,
        occupation,
    })
}

// ==========
// Conversion
// ==========

/// A structure containing the outcome of converting a CI vector listing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CiConversion {
    /// The successfully converted records, in input order.
    pub records: Vec<CiRecord>,

    /// The one-based line numbers and reasons of the lines that were skipped.
    pub skipped: Vec<(usize, String)>,

    /// Boolean indicating if the first line was treated as a header.
    pub header_skipped: bool,
}

impl CiConversion {
    /// Returns the CSV lines of the conversion, starting with [`CSV_HEADER`].
    pub fn csv_lines(&self) -> Vec<String> {
        std::iter::once(CSV_HEADER.to_string())
            .chain(self.records.iter().map(CiRecord::to_csv_row))
            .collect_vec()
    }
}

impl fmt::Display for CiConversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Header line skipped: {}", nice_bool(self.header_skipped))?;
        writeln!(f, "Converted determinants: {}", self.records.len())?;
        writeln!(f, "Skipped lines: {}", self.skipped.len())?;
        Ok(())
    }
}

/// Converts a listing of determinants, one per line.
///
/// A first line without any digit is treated as a header. Blank lines are ignored. Lines that
/// cannot be converted are skipped with a warning and recorded in [`CiConversion::skipped`].
///
/// # Errors
///
/// Errors only if the input cannot be read.
pub fn convert_listing<R: BufRead>(
    reader: R,
    converter: &CiConverter,
) -> Result<CiConversion, anyhow::Error> {
    let mut conversion = CiConversion::default();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if i == 0 && !line.chars().any(|c| c.is_ascii_digit()) {
            log::debug!("Treating `{line}` as a header.");
            conversion.header_skipped = true;
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }
        match parse_record(&line, converter) {
            Ok(record) => conversion.records.push(record),
            Err(err) => {
                qcutils_warn!("Skipping line {}: `{}`: {err}", i + 1, line.trim());
                conversion.skipped.push((i + 1, err.to_string()));
            }
        }
    }
    Ok(conversion)
}
