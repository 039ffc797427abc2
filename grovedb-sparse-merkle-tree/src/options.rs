use crate::Digest;

/// How leaf blocks become leaf digests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LeafHashing {
    /// Each block is hashed with the leaf backend.
    #[default]
    Hashed,
    /// Blocks are used as their own digests, for callers that pre-hash
    /// leaves or store raw digests.
    PassThrough,
}

/// Build-time configuration of a [`SparseMerkleTree`](crate::SparseMerkleTree).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeOptions {
    /// Leaf digest mode.
    pub leaf_hashing: LeafHashing,
    /// Order the two children byte-wise before hashing a parent. Proofs no
    /// longer authenticate position, only membership.
    pub hash_sorting: bool,
    /// Digest of an empty leaf. When unset it is the leaf hash of a
    /// zero-length block (or the zero-length block itself in pass-through
    /// mode).
    pub empty_leaf_digest: Option<Digest>,
}

impl TreeOptions {
    /// Set the leaf digest mode.
    pub fn with_leaf_hashing(mut self, leaf_hashing: LeafHashing) -> Self {
        self.leaf_hashing = leaf_hashing;
        self
    }

    /// Enable or disable sorted parent hashing.
    pub fn with_hash_sorting(mut self, hash_sorting: bool) -> Self {
        self.hash_sorting = hash_sorting;
        self
    }

    /// Use `digest` for every empty leaf position.
    pub fn with_empty_leaf_digest(mut self, digest: impl Into<Digest>) -> Self {
        self.empty_leaf_digest = Some(digest.into());
        self
    }
}
