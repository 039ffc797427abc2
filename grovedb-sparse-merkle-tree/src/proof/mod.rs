//! Inclusion proof generation for the sparse Merkle tree.
//!
//! A proof for leaf `i` is the sibling digest at every level from the leaf
//! up to just below the root, each tagged with the side it sits on. Siblings
//! that fall in the empty region are taken from the empty subtree chain, so a
//! proof always has `height - 1` entries regardless of how many leaves are
//! real.

use bincode::{Decode, Encode};

use crate::{Digest, HashBackend, SparseMerkleError, SparseMerkleTree};


/// Longest possible path: a tree of `2^63` positions.
const MAX_PATH_LEN: usize = 63;

/// One sibling on a Merkle path.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProofNode {
    /// Digest of the sibling subtree.
    pub digest: Digest,
    /// The sibling is the left child, i.e. the proved node is the right one.
    pub is_left_sibling: bool,
}

/// A self-contained inclusion proof for one leaf position.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SparseMerkleProof {
    /// Position of the proved leaf.
    pub leaf_index: u64,
    /// Digest at that position (the empty-leaf digest for empty positions).
    pub leaf_digest: Digest,
    /// Whether the tree sorts children before hashing parents.
    pub hash_sorting: bool,
    /// Siblings from the leaf level upwards.
    pub path: Vec<ProofNode>,
}

impl<N: HashBackend, L: HashBackend> SparseMerkleTree<N, L> {
    /// Sibling path for `leaf_index`, bottom-up.
    pub fn get_merkle_proof(
        &self,
        leaf_index: u64,
    ) -> Result<Vec<ProofNode>, SparseMerkleError> {
        let filled = self.filled()?;
        filled.check_index(leaf_index)?;

        let mut path = Vec::with_capacity(filled.height as usize - 1);
        let mut index = leaf_index;
        for level in 0..filled.height - 1 {
            let (sibling, is_left_sibling) = if index % 2 == 1 {
                (index - 1, true)
            } else {
                (index + 1, false)
            };
            let digest = match filled.node_at(level, sibling) {
                Some(digest) => digest.clone(),
                None => filled.empty_chain.get(level)?.clone(),
            };
            path.push(ProofNode {
                digest,
                is_left_sibling,
            });
            index /= 2;
        }
        Ok(path)
    }

    /// Proof bundle for `leaf_index`, carrying the leaf digest and hashing
    /// mode alongside the path.
    pub fn prove(&self, leaf_index: u64) -> Result<SparseMerkleProof, SparseMerkleError> {
        let path = self.get_merkle_proof(leaf_index)?;
        let leaf_digest = self.leaf_digest(leaf_index)?.clone();
        Ok(SparseMerkleProof {
            leaf_index,
            leaf_digest,
            hash_sorting: self.options().hash_sorting,
            path,
        })
    }

    /// Check `proof` against this tree's root using the tree's node backend.
    pub fn verify_proof(
        &mut self,
        proof: &SparseMerkleProof,
    ) -> Result<bool, SparseMerkleError> {
        let root = self.root_hash()?;
        match proof.verify(self.node_backend(), &root) {
            Ok(()) => Ok(true),
            Err(SparseMerkleError::InvalidProof(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

impl SparseMerkleProof {
    /// Encode to bytes using bincode.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>, SparseMerkleError> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_no_limit();
        bincode::encode_to_vec(self, config)
            .map_err(|e| SparseMerkleError::InvalidProof(format!("encode error: {}", e)))
    }

    /// Decode from bytes using bincode, rejecting malformed shapes.
    pub fn decode_from_slice(bytes: &[u8]) -> Result<Self, SparseMerkleError> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_limit::<{ 16 * 1024 * 1024 }>();
        let (proof, _): (Self, _) = bincode::decode_from_slice(bytes, config)
            .map_err(|e| SparseMerkleError::InvalidProof(format!("decode error: {}", e)))?;
        proof.check_shape()?;
        Ok(proof)
    }

    /// Reject paths longer than a `2^63` tree allows and leaf indices that do
    /// not fit the path length.
    pub(crate) fn check_shape(&self) -> Result<(), SparseMerkleError> {
        if self.path.len() > MAX_PATH_LEN {
            return Err(SparseMerkleError::InvalidProof(format!(
                "path of {} nodes exceeds the maximum of {}",
                self.path.len(),
                MAX_PATH_LEN
            )));
        }
        if self.leaf_index >> self.path.len() != 0 {
            return Err(SparseMerkleError::InvalidProof(format!(
                "leaf index {} does not fit a path of {} nodes",
                self.leaf_index,
                self.path.len()
            )));
        }
        Ok(())
    }
}
