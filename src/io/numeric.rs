//! Numeric readers and writers for binary and plain text data files.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::Path;

use anyhow::{self, bail, format_err, Context};
use byteorder::{BigEndian, ByteOrder, LittleEndian, WriteBytesExt};
use ndarray::Array2;

#[cfg(test)]
#[path = "numeric_tests.rs"]
mod numeric_tests;

/// Iterable structure for reading numeric binary files.
pub(crate) struct NumericReader<R: BufRead, B: ByteOrder, T> {
    /// The inner file reader.
    inner: R,

    /// The byte order of the numeric values to be read.
    byte_order: PhantomData<B>,

    /// The type of the numeric values to be read.
    numeric_type: PhantomData<T>,
}

impl<R: BufRead, B: ByteOrder, T> NumericReader<R, B, T> {
    /// Constructs a new numeric binary reader wrapping around a standard file reader.
    ///
    /// # Arguments
    ///
    /// * `inner` - The underlying file reader.
    pub(crate) fn new(inner: R) -> Self {
        Self {
            inner,
            byte_order: PhantomData,
            numeric_type: PhantomData,
        }
    }
}

impl<B: ByteOrder, T> NumericReader<BufReader<File>, B, T> {
    /// Constructs a new numeric binary reader wrapping around a buffered file reader from a
    /// filename.
    ///
    /// # Arguments
    ///
    /// * `filename` - The path to the file to be read.
    pub(crate) fn from_file<P: AsRef<Path>>(filename: P) -> Result<Self, anyhow::Error> {
        let f = File::open(&filename).with_context(|| {
            format!(
                "Unable to open binary file `{}`",
                filename.as_ref().display()
            )
        })?;
        Ok(Self::new(BufReader::new(f)))
    }
}

macro_rules! impl_iterator_numeric_reader {
    ($($t:ty),+) => {$(
        impl<R: BufRead> Iterator for NumericReader<R, LittleEndian, $t> {
            type Item = $t;

            fn next(&mut self) -> Option<Self::Item> {
                let mut buff: [u8; std::mem::size_of::<$t>()] = [0_u8; std::mem::size_of::<$t>()];
                self.inner.read_exact(&mut buff).ok()?;
                Some(<$t>::from_le_bytes(buff))
            }
        }

        impl<R: BufRead> Iterator for NumericReader<R, BigEndian, $t> {
            type Item = $t;

            fn next(&mut self) -> Option<Self::Item> {
                let mut buff: [u8; std::mem::size_of::<$t>()] = [0_u8; std::mem::size_of::<$t>()];
                self.inner.read_exact(&mut buff).ok()?;
                Some(<$t>::from_be_bytes(buff))
            }
        }
    )+}
}

impl_iterator_numeric_reader!(f32, f64);

/// Writes a sequence of `f64` values into a binary file with the byte order `B`.
///
/// # Arguments
///
/// * `filename` - The path to the file to be written.
/// * `values` - The values to be written, in the order they are to appear in the file.
pub(crate) fn write_f64_binary<B, P, I>(filename: P, values: I) -> Result<(), anyhow::Error>
where
    B: ByteOrder,
    P: AsRef<Path>,
    I: IntoIterator<Item = f64>,
{
    let f = File::create(&filename).with_context(|| {
        format!(
            "Unable to create binary file `{}`",
            filename.as_ref().display()
        )
    })?;
    let mut writer = BufWriter::new(f);
    for value in values {
        writer.write_f64::<B>(value)?;
    }
    writer.flush()?;
    Ok(())
}

/// Parses a whitespace-delimited numeric table.
///
/// Blank lines and lines starting with `#` are ignored. Every remaining row must have the same
/// number of columns.
///
/// # Arguments
///
/// * `reader` - A buffered reader over the table text.
///
/// # Returns
///
/// The table as a two-dimensional array with one row per data line.
pub(crate) fn parse_text_table<R: BufRead>(reader: R) -> Result<Array2<f64>, anyhow::Error> {
    let mut ncols: Option<usize> = None;
    let mut values: Vec<f64> = vec![];
    let mut nrows = 0;
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let row = trimmed
            .split_whitespace()
            .map(|token| {
                token.parse::<f64>().map_err(|err| {
                    format_err!("Unable to parse `{token}` on line {} as a number: {err}", i + 1)
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        match ncols {
            None => ncols = Some(row.len()),
            Some(n) if n != row.len() => bail!(
                "Line {} has {} columns, but previous lines have {n}.",
                i + 1,
                row.len()
            ),
            _ => {}
        }
        values.extend(row);
        nrows += 1;
    }
    let ncols = ncols.unwrap_or(0);
    Array2::from_shape_vec((nrows, ncols), values).map_err(|err| format_err!(err))
}

/// Reads a whitespace-delimited numeric table from a file. See [`parse_text_table`].
pub(crate) fn read_text_table<P: AsRef<Path>>(filename: P) -> Result<Array2<f64>, anyhow::Error> {
    let f = File::open(&filename).with_context(|| {
        format!("Unable to open text file `{}`", filename.as_ref().display())
    })?;
    parse_text_table(BufReader::new(f))
        .with_context(|| format!("Unable to read table `{}`", filename.as_ref().display()))
}
