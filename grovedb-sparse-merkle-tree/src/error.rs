//! Error types for sparse Merkle tree operations.

use thiserror::Error;

/// Errors from sparse Merkle tree operations.
#[derive(Debug, Error)]
pub enum SparseMerkleError {
    /// The requested total size is not a power of two.
    #[error("total size {0} is not a power of two")]
    InvalidSize(u64),
    /// More real leaves were supplied than the tree has positions.
    #[error("{leaves} leaves do not fit in a tree of total size {total_size}")]
    LeafOverflow {
        /// Number of supplied leaves.
        leaves: u64,
        /// Requested total size.
        total_size: u64,
    },
    /// The tree was read before a successful build.
    #[error("tree has not been filled")]
    NotFilled,
    /// The tree was built already; a new build needs a new tree.
    #[error("tree is already filled")]
    AlreadyFilled,
    /// A leaf index at or beyond the total size was requested.
    #[error("leaf index {index} is out of range (total size {total_size})")]
    IndexOutOfRange {
        /// The requested index.
        index: u64,
        /// Total size of the tree.
        total_size: u64,
    },
    /// The injected hashing primitive failed.
    #[error("hash backend failure: {0}")]
    HashBackendFailure(#[from] HashBackendError),
    /// A proof could not be decoded or did not verify.
    #[error("invalid proof: {0}")]
    InvalidProof(String),
    /// Internal tree state is inconsistent.
    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

/// Failure reported by a [`HashBackend`](crate::HashBackend) while
/// accumulating input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct HashBackendError(pub String);
