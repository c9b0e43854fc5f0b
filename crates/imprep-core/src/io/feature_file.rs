//! Binary cache of formatted feature vectors.
//!
//! Layout (little-endian, no header or checksum):
//!
//! ```text
//! i32 count
//! count x { i32 len; f32[len] values }
//! count x i32 label
//! ```
//!
//! Record lengths are not required to match each other.

use std::fs::File;
use std::io::{BufWriter, Cursor, Read, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use memmap2::Mmap;

use crate::error::{ImprepError, Result};

/// Feature vectors and their labels, in stored order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureSet {
    pub vectors: Vec<Vec<f32>>,
    pub labels: Vec<i32>,
}

impl FeatureSet {
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

/// Streams a feature file: count, then records, then labels.
pub struct FeatureSetWriter<W: Write> {
    writer: W,
    expected: usize,
    records_written: usize,
}

impl FeatureSetWriter<BufWriter<File>> {
    /// Create (truncate) a feature file and write the record count.
    pub fn create(path: &Path, count: usize) -> Result<Self> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file), count)
    }
}

impl<W: Write> FeatureSetWriter<W> {
    pub fn new(mut writer: W, count: usize) -> Result<Self> {
        writer.write_i32::<LittleEndian>(to_i32(count, "record count")?)?;
        Ok(Self {
            writer,
            expected: count,
            records_written: 0,
        })
    }

    /// Write one length-prefixed vector.
    pub fn write_record(&mut self, values: &[f32]) -> Result<()> {
        if self.records_written >= self.expected {
            return Err(ImprepError::InvalidInput(format!(
                "feature file declared {} records, refusing to write more",
                self.expected
            )));
        }
        self.writer
            .write_i32::<LittleEndian>(to_i32(values.len(), "vector length")?)?;
        for &v in values {
            self.writer.write_f32::<LittleEndian>(v)?;
        }
        self.records_written += 1;
        Ok(())
    }

    /// Write the trailing label block; all records must be written first.
    pub fn write_labels(&mut self, labels: &[i32]) -> Result<()> {
        if self.records_written != self.expected || labels.len() != self.expected {
            return Err(ImprepError::DimensionMismatch {
                expected: self.expected,
                actual: if self.records_written != self.expected {
                    self.records_written
                } else {
                    labels.len()
                },
            });
        }
        for &label in labels {
            self.writer.write_i32::<LittleEndian>(label)?;
        }
        Ok(())
    }

    /// Flush and finalize the file.
    pub fn finalize(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Write a complete feature file.
pub fn save_feature_set(path: &Path, set: &FeatureSet) -> Result<()> {
    let mut writer = FeatureSetWriter::create(path, set.vectors.len())?;
    for v in &set.vectors {
        writer.write_record(v)?;
    }
    writer.write_labels(&set.labels)?;
    writer.finalize()?;
    Ok(())
}

/// Read a feature file through a memory map.
pub fn load_feature_set(path: &Path) -> Result<FeatureSet> {
    let file = File::open(path)?;
    let mmap = unsafe { Mmap::map(&file)? };
    read_feature_set(&mut Cursor::new(&mmap[..]))
}

/// Decode a feature file from any reader. Truncated input surfaces as an
/// `UnexpectedEof` I/O error.
pub fn read_feature_set<R: Read>(reader: &mut R) -> Result<FeatureSet> {
    let count = from_i32(reader.read_i32::<LittleEndian>()?, "record count")?;

    let mut vectors = Vec::with_capacity(count.min(1 << 16));
    for _ in 0..count {
        let len = from_i32(reader.read_i32::<LittleEndian>()?, "vector length")?;
        let mut values = vec![0.0f32; len];
        reader.read_f32_into::<LittleEndian>(&mut values)?;
        vectors.push(values);
    }

    let mut labels = vec![0i32; count];
    reader.read_i32_into::<LittleEndian>(&mut labels)?;

    Ok(FeatureSet { vectors, labels })
}

fn to_i32(value: usize, what: &str) -> Result<i32> {
    i32::try_from(value)
        .map_err(|_| ImprepError::InvalidInput(format!("{what} {value} does not fit in i32")))
}

fn from_i32(value: i32, what: &str) -> Result<usize> {
    usize::try_from(value)
        .map_err(|_| ImprepError::InvalidInput(format!("negative {what} {value} in feature file")))
}
