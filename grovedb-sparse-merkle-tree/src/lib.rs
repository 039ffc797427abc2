//! Sparse fixed-height Merkle tree.
//!
//! A complete binary tree over `total_size = 2^k` leaf positions where only
//! the first `n` positions hold caller-supplied ("real") blocks and the
//! remaining positions are empty. Empty positions are never materialized:
//! the digest of an all-empty subtree of height `h` is computed once per
//! build and reused wherever such a subtree appears, so building a tree costs
//! `O(n · log(total_size) + log(total_size))` hash calls rather than
//! `O(total_size)`.
//!
//! Hashing is delegated to a pluggable [`HashBackend`]:
//!
//! - leaf digest:   `H(block)` (or `block` itself in
//!   [`LeafHashing::PassThrough`] mode)
//! - parent digest: `H(left || right)`
//! - empty subtree: `E(0) = H(<empty>)`, `E(h) = H(E(h-1) || E(h-1))`
//!
//! A tree is built once with [`SparseMerkleTree::generate`] and is read-only
//! afterwards; proofs are served from the frozen per-level digest arrays.

#![warn(missing_docs)]

mod digest;
mod empty_chain;
mod error;
pub(crate) mod hash;
mod level;
mod options;
pub(crate) mod proof;
mod tree;
mod verify;

#[cfg(test)]
pub(crate) mod test_utils;

pub use digest::Digest;
pub use error::{HashBackendError, SparseMerkleError};
pub use hash::{HashBackend, HashCalls, leaf_hash, parent_hash};
pub use options::{LeafHashing, TreeOptions};
pub use proof::{ProofNode, SparseMerkleProof};
pub use tree::SparseMerkleTree;
pub use verify::compute_root;
