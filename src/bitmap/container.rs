use std::collections::BTreeSet;
use std::io::{self, Write};

use byteorder::{LittleEndian, WriteBytesExt};

use super::util::run_count;
use crate::error::Error;

/// An Array container holds at most this many values before a Bitmap
/// encoding becomes competitive on size.
pub const ARRAY_MAX_SIZE: u64 = 4096;

/// RLE is only considered when the number of runs is at most this many;
/// beyond it the per-run overhead no longer pays for itself.
pub const RUN_MAX_SIZE: u64 = 2048;

const BITMAP_WORDS: usize = 1024;
const BITMAP_BYTES: usize = BITMAP_WORDS * 8;

/// The three on-disk container encodings, in their wire-format tag values.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u16)]
pub enum ContainerType {
    Array = 1,
    Bitmap = 2,
    Rle = 3,
}

impl TryFrom<u16> for ContainerType {
    type Error = Error;

    /// Validates a raw wire-format tag. This crate never constructs an
    /// invalid `ContainerType` internally, but the tag is part of the public
    /// wire contract (§6), so callers inspecting raw bytes can lean on this
    /// rather than re-deriving the `{1,2,3}` check themselves.
    fn try_from(tag: u16) -> Result<Self, Error> {
        match tag {
            1 => Ok(ContainerType::Array),
            2 => Ok(ContainerType::Bitmap),
            3 => Ok(ContainerType::Rle),
            other => Err(Error::InvalidEncodingTag(other)),
        }
    }
}

/// A container of low-bit values sharing a single container key.
///
/// Values accumulate in a sorted set (the deferred-typed shape); the
/// physical encoding is chosen only when the container is written out,
/// so an `add`-only workload never pays for a conversion it doesn't need.
#[derive(Debug, Default, Clone)]
pub(crate) struct Container {
    values: BTreeSet<u16>,
}

impl Container {
    pub fn new() -> Container {
        Container { values: BTreeSet::new() }
    }

    /// Inserts `low`; a no-op if already present (invariant 1).
    pub fn add(&mut self, low: u16) -> bool {
        self.values.insert(low)
    }

    pub fn len(&self) -> u32 {
        self.values.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iterate(&self) -> impl Iterator<Item = u16> + '_ {
        self.values.iter().copied()
    }

    /// Picks the minimum-cost encoding and writes its payload to `sink`.
    ///
    /// Returns the chosen type and the number of payload bytes written.
    pub fn write_to<W: Write>(&self, sink: &mut W) -> Result<(ContainerType, usize), Error> {
        if self.values.is_empty() {
            return Err(Error::EmptyContainer);
        }

        let ty = self.choose_encoding();
        log::trace!(
            "container with {} values, {} runs: encoding as {:?}",
            self.values.len(),
            run_count(self.iterate()),
            ty
        );
        let written = match ty {
            ContainerType::Array => write_array(sink, &self.values)?,
            ContainerType::Bitmap => write_bitmap(sink, &self.values)?,
            ContainerType::Rle => write_rle(sink, &self.values)?,
        };
        Ok((ty, written))
    }

    /// The §4.1 cost-driven choice: smallest payload size wins, ties broken
    /// `Array < Bitmap < Rle`.
    fn choose_encoding(&self) -> ContainerType {
        let n = self.values.len() as u64;
        let r = u64::from(run_count(self.iterate()));

        let arr_cost = 2 * n;
        let bmp_cost = BITMAP_BYTES as u64;

        if r > RUN_MAX_SIZE {
            return if arr_cost < bmp_cost { ContainerType::Array } else { ContainerType::Bitmap };
        }

        let rle_cost = 2 + 4 * r;
        let mut best = (arr_cost, ContainerType::Array);
        if bmp_cost < best.0 {
            best = (bmp_cost, ContainerType::Bitmap);
        }
        if rle_cost < best.0 {
            best = (rle_cost, ContainerType::Rle);
        }
        best.1
    }
}

fn write_array<W: Write>(sink: &mut W, values: &BTreeSet<u16>) -> io::Result<usize> {
    for &value in values {
        sink.write_u16::<LittleEndian>(value)?;
    }
    Ok(values.len() * 2)
}

fn write_bitmap<W: Write>(sink: &mut W, values: &BTreeSet<u16>) -> io::Result<usize> {
    let mut words = [0u64; BITMAP_WORDS];
    for &value in values {
        words[(value >> 6) as usize] |= 1u64 << (value & 63);
    }
    for word in words {
        sink.write_u64::<LittleEndian>(word)?;
    }
    Ok(BITMAP_BYTES)
}

fn write_rle<W: Write>(sink: &mut W, values: &BTreeSet<u16>) -> io::Result<usize> {
    let runs = to_runs(values.iter().copied());
    sink.write_u16::<LittleEndian>(runs.len() as u16)?;
    for (start, last) in &runs {
        sink.write_u16::<LittleEndian>(*start)?;
        sink.write_u16::<LittleEndian>(*last)?;
    }
    Ok(2 + 4 * runs.len())
}

fn to_runs(sorted: impl Iterator<Item = u16>) -> Vec<(u16, u16)> {
    let mut runs = Vec::new();
    let mut current: Option<(u16, u16)> = None;
    for value in sorted {
        match current {
            Some((start, last)) if value == last + 1 => current = Some((start, value)),
            Some(run) => {
                runs.push(run);
                current = Some((value, value));
            }
            None => current = Some((value, value)),
        }
    }
    if let Some(run) = current {
        runs.push(run);
    }
    runs
}
