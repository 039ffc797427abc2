//! Hash backend abstraction and the two derived hash operations.
//!
//! A backend is a stateful accumulator: `write` feeds input, `sum` reads the
//! digest without clearing state, `reset` clears it. Every logical hash done
//! here resets the backend afterwards, on success and on failure, so one
//! backend can be reused for the next computation.

use sha2::Digest as _;

use crate::{Digest, HashBackendError, LeafHashing, TreeOptions};

/// A stateful hashing primitive.
///
/// Not safe for overlapping use by two logical hash computations; a tree owns
/// its backends and drives them sequentially.
pub trait HashBackend {
    /// Accumulate `bytes` into the running state.
    fn write(&mut self, bytes: &[u8]) -> Result<(), HashBackendError>;
    /// Digest of everything written since the last reset.
    fn sum(&self) -> Digest;
    /// Clear the accumulated state.
    fn reset(&mut self);
}

impl HashBackend for blake3::Hasher {
    fn write(&mut self, bytes: &[u8]) -> Result<(), HashBackendError> {
        self.update(bytes);
        Ok(())
    }

    fn sum(&self) -> Digest {
        Digest::from(*self.finalize().as_bytes())
    }

    fn reset(&mut self) {
        blake3::Hasher::reset(self);
    }
}

impl HashBackend for sha2::Sha256 {
    fn write(&mut self, bytes: &[u8]) -> Result<(), HashBackendError> {
        sha2::Digest::update(self, bytes);
        Ok(())
    }

    fn sum(&self) -> Digest {
        Digest::new(self.clone().finalize().to_vec())
    }

    fn reset(&mut self) {
        sha2::Digest::reset(self);
    }
}

/// Hash a single leaf block: `H(block)`.
pub fn leaf_hash<H: HashBackend>(
    hasher: &mut H,
    block: &[u8],
) -> Result<Digest, HashBackendError> {
    let result = hasher.write(block).map(|()| hasher.sum());
    hasher.reset();
    result
}

/// Hash two children into their parent: `H(left || right)`.
///
/// With `hash_sorting` the byte-wise smaller child is written first, which
/// makes the operation commutative.
pub fn parent_hash<H: HashBackend>(
    hasher: &mut H,
    left: &[u8],
    right: &[u8],
    hash_sorting: bool,
) -> Result<Digest, HashBackendError> {
    let (first, second) = if hash_sorting && left > right {
        (right, left)
    } else {
        (left, right)
    };
    let result = hasher
        .write(first)
        .and_then(|()| hasher.write(second))
        .map(|()| hasher.sum());
    hasher.reset();
    result
}

/// Number of hash invocations made by a build.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HashCalls {
    /// Leaf hashes, including the one for the empty leaf.
    pub leaf: u64,
    /// Parent (internal node) hashes, including empty-subtree ones.
    pub node: u64,
}

/// The leaf and node backends of one tree, with call accounting.
#[derive(Debug)]
pub(crate) struct TreeHasher<N, L> {
    node: N,
    leaf: L,
    calls: HashCalls,
}

impl<N: HashBackend, L: HashBackend> TreeHasher<N, L> {
    pub(crate) fn new(node: N, leaf: L) -> Self {
        Self {
            node,
            leaf,
            calls: HashCalls::default(),
        }
    }

    /// Leaf digest under the configured leaf mode.
    pub(crate) fn leaf(
        &mut self,
        options: &TreeOptions,
        block: &[u8],
    ) -> Result<Digest, HashBackendError> {
        match options.leaf_hashing {
            LeafHashing::PassThrough => Ok(Digest::from(block)),
            LeafHashing::Hashed => {
                let digest = leaf_hash(&mut self.leaf, block)?;
                self.calls.leaf += 1;
                Ok(digest)
            }
        }
    }

    pub(crate) fn parent(
        &mut self,
        options: &TreeOptions,
        left: &[u8],
        right: &[u8],
    ) -> Result<Digest, HashBackendError> {
        let digest = parent_hash(&mut self.node, left, right, options.hash_sorting)?;
        self.calls.node += 1;
        Ok(digest)
    }

    pub(crate) fn node_backend(&mut self) -> &mut N {
        &mut self.node
    }

    /// Return the counts accumulated since the last call and start over.
    pub(crate) fn take_calls(&mut self) -> HashCalls {
        std::mem::take(&mut self.calls)
    }
}

#[cfg(test)]
mod tests {
    use sha2::{Digest as _, Sha256};

    use super::*;
    use crate::test_utils::FailingHasher;

    #[test]
    fn test_leaf_hash_matches_blake3() {
        let mut hasher = blake3::Hasher::new();
        let digest = leaf_hash(&mut hasher, b"hello").expect("leaf hash");
        assert_eq!(digest.as_bytes(), blake3::hash(b"hello").as_bytes());
    }

    #[test]
    fn test_backend_is_reset_between_hashes() {
        let mut hasher = blake3::Hasher::new();
        let first = leaf_hash(&mut hasher, b"a").expect("first");
        let second = leaf_hash(&mut hasher, b"a").expect("second");
        assert_eq!(first, second);
    }

    #[test]
    fn test_parent_hash_is_concatenation() {
        let mut hasher = Sha256::new();
        let parent = parent_hash(&mut hasher, b"left", b"right", false).expect("parent");
        let expected = Sha256::digest(b"leftright");
        assert_eq!(parent.as_bytes(), expected.as_slice());
    }

    #[test]
    fn test_parent_hash_order_matters() {
        let mut hasher = blake3::Hasher::new();
        let ab = parent_hash(&mut hasher, b"a", b"b", false).expect("ab");
        let ba = parent_hash(&mut hasher, b"b", b"a", false).expect("ba");
        assert_ne!(ab, ba);
    }

    #[test]
    fn test_parent_hash_sorting_is_commutative() {
        let mut hasher = blake3::Hasher::new();
        let ab = parent_hash(&mut hasher, b"a", b"b", true).expect("ab");
        let ba = parent_hash(&mut hasher, b"b", b"a", true).expect("ba");
        assert_eq!(ab, ba);
        assert_eq!(ab, parent_hash(&mut hasher, b"a", b"b", false).expect("plain"));
    }

    #[test]
    fn test_failed_write_still_resets() {
        let mut hasher = FailingHasher::new(1);
        assert!(parent_hash(&mut hasher, b"a", b"b", false).is_err());
        assert_eq!(hasher.written(), 0);
    }

    #[test]
    fn test_pass_through_leaf_is_not_hashed() {
        let options = TreeOptions::default().with_leaf_hashing(LeafHashing::PassThrough);
        let mut hasher = TreeHasher::new(blake3::Hasher::new(), blake3::Hasher::new());
        let digest = hasher.leaf(&options, b"raw").expect("leaf");
        assert_eq!(digest.as_bytes(), b"raw");
        assert_eq!(hasher.take_calls(), HashCalls::default());
    }
}
