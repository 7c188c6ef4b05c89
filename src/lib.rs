//! A write-only encoder for the [Pilosa] variant of [Roaring bitmaps].
//!
//! This crate builds a compressed set of 64-bit unsigned integers and
//! serializes it to the exact byte layout Pilosa's storage engine
//! memory-maps from disk. It accepts insertions only: there is no
//! deserializer, no removal, and no set algebra (union, intersection,
//! difference) here, only the path from `add` to `write_to`.
//!
//! ```rust
//! use pilosa_roaring::Bitmap;
//!
//! let mut bitmap = Bitmap::new();
//! bitmap.add(2);
//! bitmap.add(3);
//! bitmap.add(1 << 40);
//!
//! let mut out = Vec::new();
//! let written = bitmap.write_to(&mut out).unwrap();
//! assert_eq!(written as usize, out.len());
//! ```
//!
//! [Pilosa]: https://www.pilosa.com/
//! [Roaring bitmaps]: https://roaringbitmap.org/

mod bitmap;
mod error;

pub use bitmap::container::{ContainerType, ARRAY_MAX_SIZE, RUN_MAX_SIZE};
pub use bitmap::serialization::{BITMAP_N, COOKIE, HEADER_BASE_SIZE, MAGIC_NUMBER, STORAGE_VERSION};
pub use bitmap::Bitmap;
pub use error::Error;

/// Convenience alias for this crate's fallible return type.
pub type Result<T> = std::result::Result<T, Error>;
