//! Proof verification for the sparse Merkle tree.
//!
//! Pure recomputation: no tree is needed, only a node backend configured the
//! way the tree's was.

use crate::{
    Digest, HashBackend, HashBackendError, ProofNode, SparseMerkleError, SparseMerkleProof,
    parent_hash,
};

/// Fold `path` onto `leaf_digest` and return the implied root.
///
/// A left sibling is hashed as `H(sibling || running)`, a right sibling as
/// `H(running || sibling)`.
pub fn compute_root<H: HashBackend>(
    hasher: &mut H,
    hash_sorting: bool,
    leaf_digest: &[u8],
    path: &[ProofNode],
) -> Result<Digest, HashBackendError> {
    let mut running = Digest::from(leaf_digest);
    for node in path {
        running = if node.is_left_sibling {
            parent_hash(hasher, &node.digest, &running, hash_sorting)?
        } else {
            parent_hash(hasher, &running, &node.digest, hash_sorting)?
        };
    }
    Ok(running)
}

impl SparseMerkleProof {
    /// Root implied by this proof.
    pub fn calculate_root<H: HashBackend>(
        &self,
        hasher: &mut H,
    ) -> Result<Digest, SparseMerkleError> {
        compute_root(hasher, self.hash_sorting, &self.leaf_digest, &self.path)
            .map_err(SparseMerkleError::from)
    }

    /// Verify the proof against an expected root.
    ///
    /// The side flags must agree with the bits of `leaf_index`, so a proof
    /// cannot be replayed for another position.
    pub fn verify<H: HashBackend>(
        &self,
        hasher: &mut H,
        expected_root: &[u8],
    ) -> Result<(), SparseMerkleError> {
        self.check_shape()?;
        for (level, node) in self.path.iter().enumerate() {
            let is_right_child = (self.leaf_index >> level) & 1 == 1;
            if node.is_left_sibling != is_right_child {
                return Err(SparseMerkleError::InvalidProof(format!(
                    "sibling side at level {} does not match leaf index {}",
                    level, self.leaf_index
                )));
            }
        }

        let computed_root = self.calculate_root(hasher)?;
        if computed_root.as_bytes() != expected_root {
            return Err(SparseMerkleError::InvalidProof(format!(
                "root hash mismatch: expected {}, got {}",
                hex::encode(expected_root),
                computed_root
            )));
        }
        Ok(())
    }
}
