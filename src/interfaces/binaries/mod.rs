//! qcutils interface with binary data files of raw `f64` values.
//!
//! Multi-dimensional arrays are stored as flat sequences of 8-byte floating-point values with no
//! header. The element order and byte order are specified separately by [`MatrixOrder`] and
//! [`ByteOrder`].

use std::fmt;
use std::path::Path;

use anyhow::{self, Context};
use byteorder::{BigEndian, LittleEndian};
use itertools::Itertools;
use ndarray::{Array, ArrayBase, Data, Dimension, ShapeBuilder};
use serde::{Deserialize, Serialize};

use crate::io::numeric::{write_f64_binary, NumericReader};

#[cfg(test)]
#[path = "binaries_tests.rs"]
mod binaries_tests;

/// Enumerated type indicating the order the matrix elements are traversed when stored into or
/// read in from a binary file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatrixOrder {
    #[default]
    RowMajor,
    ColMajor,
}

impl fmt::Display for MatrixOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixOrder::RowMajor => write!(f, "row-major"),
            MatrixOrder::ColMajor => write!(f, "column-major"),
        }
    }
}

/// Enumerated type indicating the byte order of numerical values in binary files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ByteOrder {
    #[default]
    LittleEndian,
    BigEndian,
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ByteOrder::LittleEndian => write!(f, "little-endian"),
            ByteOrder::BigEndian => write!(f, "big-endian"),
        }
    }
}

/// Reads all `f64` values in a binary file.
pub fn read_f64_values<P: AsRef<Path>>(
    path: P,
    byte_order: ByteOrder,
) -> Result<Vec<f64>, anyhow::Error> {
    let path = path.as_ref();
    let values = match byte_order {
        ByteOrder::LittleEndian => NumericReader::<_, LittleEndian, f64>::from_file(path)
            .with_context(|| format!("Unable to read binary file `{}`", path.display()))?
            .collect_vec(),
        ByteOrder::BigEndian => NumericReader::<_, BigEndian, f64>::from_file(path)
            .with_context(|| format!("Unable to read binary file `{}`", path.display()))?
            .collect_vec(),
    };
    Ok(values)
}

/// Reads an array of a given shape from a binary file.
///
/// # Arguments
///
/// * `path` - The path to the binary file.
/// * `shape` - The shape of the array. The file must contain exactly as many values as there are
/// elements in the array.
/// * `byte_order` - The byte order of the values in the file.
/// * `matrix_order` - The order in which the array elements are stored in the file.
///
/// # Returns
///
/// The read-in array.
pub fn read_binary_array<P, Sh>(
    path: P,
    shape: Sh,
    byte_order: ByteOrder,
    matrix_order: MatrixOrder,
) -> Result<Array<f64, Sh::Dim>, anyhow::Error>
where
    P: AsRef<Path>,
    Sh: ShapeBuilder,
{
    let path = path.as_ref();
    let values = read_f64_values(path, byte_order)?;
    let n_values = values.len();
    Array::from_shape_vec(
        shape.set_f(matrix_order == MatrixOrder::ColMajor),
        values,
    )
    .with_context(|| {
        format!(
            "Unable to construct a {matrix_order} array from the {n_values} values in `{}`",
            path.display()
        )
    })
}

/// Writes an array into a binary file.
///
/// # Arguments
///
/// * `path` - The path to the binary file to be written.
/// * `array` - The array to be written.
/// * `byte_order` - The byte order of the values in the file.
/// * `matrix_order` - The order in which the array elements are to be stored in the file.
pub fn write_binary_array<P, S, D>(
    path: P,
    array: &ArrayBase<S, D>,
    byte_order: ByteOrder,
    matrix_order: MatrixOrder,
) -> Result<(), anyhow::Error>
where
    P: AsRef<Path>,
    S: Data<Elem = f64>,
    D: Dimension,
{
    let values = match matrix_order {
        MatrixOrder::RowMajor => array.iter().copied().collect_vec(),
        MatrixOrder::ColMajor => array.t().iter().copied().collect_vec(),
    };
    match byte_order {
        ByteOrder::LittleEndian => write_f64_binary::<LittleEndian, _, _>(path, values),
        ByteOrder::BigEndian => write_f64_binary::<BigEndian, _, _>(path, values),
    }
}
