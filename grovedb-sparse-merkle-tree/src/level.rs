//! Construction of one level of digests from the level below it.

use crate::{
    Digest, HashBackend, SparseMerkleError, TreeOptions, empty_chain::EmptyChain,
    hash::TreeHasher,
};

/// Level 0: one digest per real leaf, in input order. Empty positions are
/// left implicit.
pub(crate) fn build_leaf_level<B, N, L>(
    leaves: &[B],
    options: &TreeOptions,
    hasher: &mut TreeHasher<N, L>,
) -> Result<Vec<Digest>, SparseMerkleError>
where
    B: AsRef<[u8]>,
    N: HashBackend,
    L: HashBackend,
{
    let mut level = Vec::with_capacity(leaves.len());
    for leaf in leaves {
        level.push(hasher.leaf(options, leaf.as_ref())?);
    }
    Ok(level)
}

/// Pair up `below` (the level at height `below_height`) into its parents.
///
/// A trailing unpaired node is the rightmost real node at this height;
/// everything to its right is empty, so its sibling is the empty subtree
/// digest of the same height.
pub(crate) fn build_parent_level<N, L>(
    below: &[Digest],
    below_height: u32,
    empty_chain: &EmptyChain,
    options: &TreeOptions,
    hasher: &mut TreeHasher<N, L>,
) -> Result<Vec<Digest>, SparseMerkleError>
where
    N: HashBackend,
    L: HashBackend,
{
    let mut level = Vec::with_capacity(below.len().div_ceil(2));
    let mut pairs = below.chunks_exact(2);
    for pair in &mut pairs {
        level.push(hasher.parent(options, &pair[0], &pair[1])?);
    }
    if let [last] = pairs.remainder() {
        let empty_sibling = empty_chain.get(below_height)?;
        level.push(hasher.parent(options, last, empty_sibling)?);
    }
    Ok(level)
}
