//! Reading and writing of qcutils input and result files.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{self, format_err, Context};
use bincode;
use serde::{de::DeserializeOwned, Serialize};
use serde_yaml;

pub(crate) mod format;
pub mod numeric;

#[cfg(test)]
#[path = "io_tests.rs"]
mod io_tests;

/// An enumerated type for `qcutils` binary file types.
pub enum QCUtilsFileType {
    /// Variant for binary files containing configuration enumeration results.
    Cfg,

    /// Variant for binary files containing pair-distribution function results.
    Pdf,

    /// Variant for binary files containing assembled reduced density matrices.
    Rdm,
}

impl QCUtilsFileType {
    /// Returns the extension of the file type.
    pub fn ext(&self) -> String {
        match self {
            QCUtilsFileType::Cfg => "qcutils.cfg".to_string(),
            QCUtilsFileType::Pdf => "qcutils.pdf".to_string(),
            QCUtilsFileType::Rdm => "qcutils.rdm".to_string(),
        }
    }
}

/// Reads a `qcutils` binary file and deserialises it into an appropriate structure.
///
/// # Arguments
///
/// * `name` - The name of the file to be read in (without `qcutils`-specific extensions).
/// * `file_type` - The type of the `qcutils` file to be read in.
///
/// # Returns
///
/// A `Result` containing the structure deserialised from the read-in file.
pub fn read_qcutils_binary<T, P: AsRef<Path>>(
    name: P,
    file_type: QCUtilsFileType,
) -> Result<T, anyhow::Error>
where
    T: DeserializeOwned,
{
    let mut path = name.as_ref().to_path_buf();
    path.set_extension(file_type.ext());
    let mut reader = BufReader::new(File::open(path).map_err(|err| format_err!(err))?);
    bincode::deserialize_from(&mut reader).map_err(|err| format_err!(err))
}

/// Serialises a structure and writes into a `qcutils` binary file.
///
/// # Arguments
///
/// * `name` - The name of the file to be written (without `qcutils`-specific extensions).
/// * `file_type` - The type of the `qcutils` file to be written.
///
/// # Returns
///
/// A `Result` indicating if the serialisation and writing processes have been successful.
pub fn write_qcutils_binary<T, P: AsRef<Path>>(
    name: P,
    file_type: QCUtilsFileType,
    value: &T,
) -> Result<(), anyhow::Error>
where
    T: Serialize,
{
    let mut path = name.as_ref().to_path_buf();
    path.set_extension(file_type.ext());
    let mut writer = BufWriter::new(File::create(path)?);
    bincode::serialize_into(&mut writer, value).map_err(|err| format_err!(err))
}

/// Reads a `qcutils` configuration YAML file and deserialises it into an appropriate structure.
///
/// # Arguments
///
/// * `name` - The name of the file to be read in (with its `.yml` or `.yaml` extension).
///
/// # Returns
///
/// A `Result` containing the structure deserialised from the read-in file.
pub fn read_qcutils_yaml<T, P: AsRef<Path>>(name: P) -> Result<T, anyhow::Error>
where
    T: DeserializeOwned,
{
    let mut reader = BufReader::new(File::open(name).map_err(|err| format_err!(err))?);
    serde_yaml::from_reader(&mut reader).map_err(|err| format_err!(err))
}

/// Serialises a structure and writes into a `qcutils` configuration YAML file.
///
/// # Arguments
///
/// * `name` - The name of the YAML file to be written (without extensions). The resulting file
/// will have the `.yml` extension.
///
/// # Returns
///
/// A `Result` indicating if the serialisation and writing processes have been successful.
pub fn write_qcutils_yaml<T, P: AsRef<Path>>(name: P, value: &T) -> Result<(), anyhow::Error>
where
    T: Serialize,
{
    let mut path = name.as_ref().to_path_buf();
    path.set_extension("yml");
    let mut writer = BufWriter::new(File::create(path)?);
    serde_yaml::to_writer(&mut writer, value).map_err(|err| format_err!(err))
}

/// Writes a sequence of lines into a plain text file, one item per line.
pub fn write_lines<P, I, S>(path: P, lines: I) -> Result<(), anyhow::Error>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let path = path.as_ref();
    let mut writer = BufWriter::new(
        File::create(path)
            .with_context(|| format!("Unable to create file `{}`", path.display()))?,
    );
    for line in lines {
        writeln!(writer, "{}", line.as_ref())?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads all lines of a plain text file.
pub fn read_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>, anyhow::Error> {
    let path = path.as_ref();
    let reader = BufReader::new(
        File::open(path).with_context(|| format!("Unable to open file `{}`", path.display()))?,
    );
    reader
        .lines()
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Unable to read lines from `{}`", path.display()))
}
