use crate::{
    Digest, HashBackend, HashCalls, SparseMerkleError, TreeOptions,
    empty_chain::EmptyChain,
    hash::TreeHasher,
    level::{build_leaf_level, build_parent_level},
};

/// A sparse Merkle tree over `total_size = 2^k` leaf positions.
///
/// `N` hashes internal nodes, `L` hashes leaves. The tree starts unfilled,
/// is built exactly once by [`generate`](Self::generate) and is read-only
/// afterwards. Only real leaves and their ancestors are stored, one digest
/// array per level; every all-empty subtree is represented by a single cached
/// digest per height.
#[derive(Debug)]
pub struct SparseMerkleTree<N, L = N> {
    options: TreeOptions,
    hasher: TreeHasher<N, L>,
    state: TreeState,
}

#[derive(Debug)]
enum TreeState {
    Unfilled,
    Filled(FilledTree),
}

/// Frozen result of a successful build.
#[derive(Debug)]
pub(crate) struct FilledTree {
    pub(crate) total_size: u64,
    pub(crate) height: u32,
    /// `levels[0]` holds the real leaf digests, `levels[height - 1]` the
    /// root (or nothing when there are no real leaves).
    pub(crate) levels: Vec<Vec<Digest>>,
    pub(crate) empty_chain: EmptyChain,
    pub(crate) hash_calls: HashCalls,
}

impl<H: HashBackend + Clone> SparseMerkleTree<H, H> {
    /// Create an unfilled tree that uses copies of `hasher` for both leaves
    /// and internal nodes.
    pub fn new(hasher: H) -> Self {
        Self::with_hashers(hasher.clone(), hasher)
    }
}

impl<N: HashBackend, L: HashBackend> SparseMerkleTree<N, L> {
    /// Create an unfilled tree with distinct leaf and node backends.
    pub fn with_hashers(leaf_hasher: L, node_hasher: N) -> Self {
        Self::with_options(leaf_hasher, node_hasher, TreeOptions::default())
    }

    /// Create an unfilled tree with distinct backends and explicit options.
    pub fn with_options(leaf_hasher: L, node_hasher: N, options: TreeOptions) -> Self {
        Self {
            options,
            hasher: TreeHasher::new(node_hasher, leaf_hasher),
            state: TreeState::Unfilled,
        }
    }

    /// Build the tree from `leaves`, with every position from `leaves.len()`
    /// up to `total_size` empty.
    ///
    /// On error the tree stays unfilled.
    pub fn generate<B: AsRef<[u8]>>(
        &mut self,
        leaves: &[B],
        total_size: u64,
    ) -> Result<(), SparseMerkleError> {
        if self.is_filled() {
            return Err(SparseMerkleError::AlreadyFilled);
        }
        if !total_size.is_power_of_two() {
            return Err(SparseMerkleError::InvalidSize(total_size));
        }
        let leaf_count = leaves.len() as u64;
        if leaf_count > total_size {
            return Err(SparseMerkleError::LeafOverflow {
                leaves: leaf_count,
                total_size,
            });
        }

        // Discard counts left over from an earlier failed attempt.
        self.hasher.take_calls();
        match self.build(leaves, total_size) {
            Ok(filled) => {
                tracing::debug!(
                    total_size,
                    real_leaves = leaf_count,
                    height = filled.height,
                    leaf_hash_calls = filled.hash_calls.leaf,
                    node_hash_calls = filled.hash_calls.node,
                    "generated sparse merkle tree"
                );
                self.state = TreeState::Filled(filled);
                Ok(())
            }
            Err(e) => {
                self.hasher.take_calls();
                Err(e)
            }
        }
    }

    fn build<B: AsRef<[u8]>>(
        &mut self,
        leaves: &[B],
        total_size: u64,
    ) -> Result<FilledTree, SparseMerkleError> {
        let height = total_size.trailing_zeros() + 1;
        let empty_count = total_size - leaves.len() as u64;

        let mut empty_chain = EmptyChain::default();
        empty_chain.extend_to(
            EmptyChain::max_height_for(empty_count),
            &self.options,
            &mut self.hasher,
        )?;

        let mut levels = Vec::with_capacity(height as usize);
        levels.push(build_leaf_level(leaves, &self.options, &mut self.hasher)?);
        for below_height in 0..height - 1 {
            let below = &levels[below_height as usize];
            let next = build_parent_level(
                below,
                below_height,
                &empty_chain,
                &self.options,
                &mut self.hasher,
            )?;
            levels.push(next);
        }

        Ok(FilledTree {
            total_size,
            height,
            levels,
            empty_chain,
            hash_calls: self.hasher.take_calls(),
        })
    }

    /// Root digest of the built tree.
    ///
    /// With no real leaves this is the empty subtree digest of the full tree
    /// height.
    pub fn root_hash(&self) -> Result<Digest, SparseMerkleError> {
        let filled = self.filled()?;
        match filled.levels.last().and_then(|top| top.first()) {
            Some(root) => Ok(root.clone()),
            None => filled.empty_chain.get(filled.height - 1).cloned(),
        }
    }

    /// Whether a build has completed.
    pub fn is_filled(&self) -> bool {
        matches!(self.state, TreeState::Filled(_))
    }

    /// The options this tree was created with.
    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    /// Number of leaf positions, real and empty.
    pub fn total_size(&self) -> Result<u64, SparseMerkleError> {
        Ok(self.filled()?.total_size)
    }

    /// Number of levels including the leaves and the root:
    /// `log2(total_size) + 1`.
    pub fn height(&self) -> Result<u32, SparseMerkleError> {
        Ok(self.filled()?.height)
    }

    /// Number of caller-supplied leaves.
    pub fn real_leaf_count(&self) -> Result<usize, SparseMerkleError> {
        Ok(self.filled()?.levels[0].len())
    }

    /// Hash invocations made by the build.
    pub fn hash_calls(&self) -> Result<HashCalls, SparseMerkleError> {
        Ok(self.filled()?.hash_calls)
    }

    /// Digests stored for level `k` (0 = leaves). Empty positions are not
    /// included. `None` when unfilled or `k >= height`.
    pub fn level(&self, k: u32) -> Option<&[Digest]> {
        let filled = self.filled().ok()?;
        filled.levels.get(k as usize).map(Vec::as_slice)
    }

    /// Digest at leaf position `index`; empty positions yield the empty-leaf
    /// digest.
    pub fn leaf_digest(&self, index: u64) -> Result<&Digest, SparseMerkleError> {
        self.filled()?.leaf_digest(index)
    }

    /// Digest of an all-empty subtree of `height` (0 = a single empty leaf),
    /// if the build needed it.
    pub fn empty_subtree_digest(&self, height: u32) -> Result<&Digest, SparseMerkleError> {
        self.filled()?.empty_chain.get(height)
    }

    pub(crate) fn filled(&self) -> Result<&FilledTree, SparseMerkleError> {
        match &self.state {
            TreeState::Filled(filled) => Ok(filled),
            TreeState::Unfilled => Err(SparseMerkleError::NotFilled),
        }
    }

    pub(crate) fn node_backend(&mut self) -> &mut N {
        self.hasher.node_backend()
    }
}

impl FilledTree {
    pub(crate) fn check_index(&self, index: u64) -> Result<(), SparseMerkleError> {
        if index >= self.total_size {
            return Err(SparseMerkleError::IndexOutOfRange {
                index,
                total_size: self.total_size,
            });
        }
        Ok(())
    }

    pub(crate) fn leaf_digest(&self, index: u64) -> Result<&Digest, SparseMerkleError> {
        self.check_index(index)?;
        match self.node_at(0, index) {
            Some(digest) => Ok(digest),
            None => self.empty_chain.get(0),
        }
    }

    /// Materialized digest at `index` within level `level`, if that position
    /// has at least one real leaf below it.
    pub(crate) fn node_at(&self, level: u32, index: u64) -> Option<&Digest> {
        let digests = self.levels.get(level as usize)?;
        usize::try_from(index).ok().and_then(|i| digests.get(i))
    }
}
