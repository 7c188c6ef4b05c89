//! The Pilosa Roaring v0 on-disk format.
//!
//! ```text
//! offset  size            field
//! 0       u32             cookie        = 12348 | (0 << 16) = 12348
//! 4       u32             N = container count
//! 8       N × 12 bytes    meta records: u64 key, u16 type, u16 cardinality_minus_1
//! 8+12N   N × u32         offset records (absolute byte offsets)
//! 8+16N   …               payload region (per-container payloads, key order)
//! ```

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};

use super::Bitmap;
use crate::error::Error;

/// The magic half of the header cookie.
pub const MAGIC_NUMBER: u32 = 12348;
/// The storage version half of the header cookie.
pub const STORAGE_VERSION: u32 = 0;
/// `MAGIC_NUMBER | (STORAGE_VERSION << 16)`.
pub const COOKIE: u32 = MAGIC_NUMBER | (STORAGE_VERSION << 16);
/// Size of the cookie + container-count header, in bytes.
pub const HEADER_BASE_SIZE: u64 = 8;
/// Number of `u64` words in a Bitmap container.
pub const BITMAP_N: u64 = 1024;

/// Bytes contributed per container by the meta + offset regions: an 8-byte
/// key, 2-byte type, 2-byte cardinality, and a 4-byte offset.
const META_OFFSET_ENTRY_SIZE: u64 = 16;

impl Bitmap {
    /// Serializes this bitmap into the Pilosa Roaring v0 format, returning
    /// the total number of bytes written.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pilosa_roaring::Bitmap;
    ///
    /// let mut rb = Bitmap::new();
    /// rb.add(1);
    /// rb.add(2);
    ///
    /// let mut out = Vec::new();
    /// let written = rb.write_to(&mut out).unwrap();
    /// assert_eq!(written as usize, out.len());
    /// assert_eq!(&out[0..4], &12348u32.to_le_bytes());
    /// ```
    pub fn write_to<W: Write>(&self, sink: &mut W) -> Result<u64, Error> {
        // Each container is serialized into a scratch buffer first: the
        // encoding choice (and so the payload size) is only known once
        // we've looked at the whole container, and that size feeds both
        // the meta cardinality-independent offset math and the eventual
        // payload write.
        let mut payloads: Vec<(u64, u16, u16, Vec<u8>)> = Vec::with_capacity(self.entries.len());
        for (key, container) in &self.entries {
            if container.is_empty() {
                continue;
            }
            let mut buf = Vec::new();
            let (ty, _) = container.write_to(&mut buf)?;
            let cardinality_minus_1 = (container.len() - 1) as u16;
            payloads.push((*key, ty as u16, cardinality_minus_1, buf));
        }

        let container_count = payloads.len() as u32;
        log::debug!("emitting bitmap with {} containers", container_count);

        sink.write_u32::<LittleEndian>(COOKIE)?;
        sink.write_u32::<LittleEndian>(container_count)?;

        for (key, ty, cardinality_minus_1, _) in &payloads {
            sink.write_u64::<LittleEndian>(*key)?;
            sink.write_u16::<LittleEndian>(*ty)?;
            sink.write_u16::<LittleEndian>(*cardinality_minus_1)?;
        }

        let mut offset = HEADER_BASE_SIZE + META_OFFSET_ENTRY_SIZE * u64::from(container_count);
        for (_, _, _, payload) in &payloads {
            sink.write_u32::<LittleEndian>(offset as u32)?;
            offset += payload.len() as u64;
        }

        for (_, _, _, payload) in &payloads {
            sink.write_all(payload)?;
        }

        Ok(offset)
    }

    /// The number of bytes [`write_to`](Bitmap::write_to) would emit, without
    /// writing anything.
    pub fn serialized_size(&self) -> Result<u64, Error> {
        let mut size = HEADER_BASE_SIZE;
        for (_, container) in &self.entries {
            if container.is_empty() {
                continue;
            }
            size += META_OFFSET_ENTRY_SIZE;
            let mut buf = Vec::new();
            let (_, written) = container.write_to(&mut buf)?;
            size += written as u64;
        }
        Ok(size)
    }
}
