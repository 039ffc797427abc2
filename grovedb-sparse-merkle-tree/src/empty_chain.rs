//! Digests of all-empty subtrees, one per height.
//!
//! `E(0)` is the empty-leaf digest and `E(h) = H(E(h-1) || E(h-1))` is the
//! root of a subtree of `2^h` empty leaves. The chain is grown only as far as
//! a build needs, which is bounded by the number of trailing empty positions.

use crate::{Digest, HashBackend, SparseMerkleError, TreeOptions, hash::TreeHasher};

#[derive(Debug, Clone, Default)]
pub(crate) struct EmptyChain {
    digests: Vec<Digest>,
}

impl EmptyChain {
    /// Highest empty-subtree height any build with `empty_count` trailing
    /// empty leaves can reference: the bit length of `empty_count`, minus
    /// one. Zero when there are no empty leaves.
    pub(crate) fn max_height_for(empty_count: u64) -> u32 {
        (u64::BITS - empty_count.leading_zeros()).saturating_sub(1)
    }

    /// Make sure `E(0)..=E(height)` are present.
    pub(crate) fn extend_to<N: HashBackend, L: HashBackend>(
        &mut self,
        height: u32,
        options: &TreeOptions,
        hasher: &mut TreeHasher<N, L>,
    ) -> Result<(), SparseMerkleError> {
        if self.digests.is_empty() {
            let empty_leaf = match &options.empty_leaf_digest {
                Some(digest) => digest.clone(),
                None => hasher.leaf(options, &[])?,
            };
            self.digests.push(empty_leaf);
        }
        while self.digests.len() <= height as usize {
            let below = &self.digests[self.digests.len() - 1];
            let next = hasher.parent(options, below, below)?;
            self.digests.push(next);
            tracing::trace!(height = self.digests.len() - 1, "extended empty subtree chain");
        }
        Ok(())
    }

    pub(crate) fn get(&self, height: u32) -> Result<&Digest, SparseMerkleError> {
        self.digests.get(height as usize).ok_or_else(|| {
            SparseMerkleError::CorruptedData(format!(
                "empty subtree digest for height {} was not computed (have {})",
                height,
                self.digests.len()
            ))
        })
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.digests.len()
    }
}
