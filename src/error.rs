use thiserror::Error;

/// Errors produced while emitting a [`Bitmap`](crate::Bitmap) to its wire format.
#[derive(Debug, Error)]
pub enum Error {
    /// The sink refused or failed a write. The bitmap's in-memory state is
    /// unaffected, but some bytes may already have reached the sink.
    #[error("failed to write to sink")]
    Io(#[from] std::io::Error),

    /// A container carried an encoding discriminant outside `{ARRAY, BITMAP, RLE}`.
    /// Unreachable through this crate's own public API; guarded defensively in
    /// case a future internal refactor introduces a bad tag.
    #[error("invalid container encoding tag: {0}")]
    InvalidEncodingTag(u16),

    /// A container with zero cardinality reached the emit path. Invariant 6
    /// (§3) says this should never happen: empty containers are filtered
    /// before the meta pass.
    #[error("attempted to emit a container with zero cardinality")]
    EmptyContainer,
}
