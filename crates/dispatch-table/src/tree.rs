//! Greedy decision-tree construction: at each level, branch on whichever
//! parameter position currently gives the largest entropy reduction
//! across the surviving entries, until every leaf holds a single entry
//! or [`dispatch_common::limits::MAX_DECISION_TREE_DEPTH`] is reached.

use dispatch_common::{limits::MAX_DECISION_TREE_DEPTH, TypeId};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone)]
pub enum DecisionTreeNode {
    Branch {
        param_index: usize,
        by_type: FxHashMap<TypeId, Box<DecisionTreeNode>>,
        /// Entries whose type at `param_index` didn't form its own
        /// branch (ties below the splitting threshold); checked with a
        /// full structural match by the caller.
        fallback: Vec<usize>,
    },
    Leaf {
        entry_indices: Vec<usize>,
    },
}

impl DecisionTreeNode {
    /// Builds a tree over entries `0..entry_arity.len()`, where
    /// `entry_arity[i]` gives entry `i`'s parameter type ids.
    #[must_use]
    pub fn build(entry_param_types: &[Vec<TypeId>]) -> Self {
        let all_indices: Vec<usize> = (0..entry_param_types.len()).collect();
        Self::build_node(entry_param_types, &all_indices, 0)
    }

    fn build_node(entry_param_types: &[Vec<TypeId>], indices: &[usize], depth: u32) -> Self {
        if indices.len() <= 1 || depth >= MAX_DECISION_TREE_DEPTH as u32 {
            return DecisionTreeNode::Leaf {
                entry_indices: indices.to_vec(),
            };
        }

        let arity = indices
            .iter()
            .map(|&i| entry_param_types[i].len())
            .min()
            .unwrap_or(0);
        if arity == 0 {
            return DecisionTreeNode::Leaf {
                entry_indices: indices.to_vec(),
            };
        }

        let Some(best_param) = best_splitting_parameter(entry_param_types, indices, arity) else {
            return DecisionTreeNode::Leaf {
                entry_indices: indices.to_vec(),
            };
        };

        let mut groups: FxHashMap<TypeId, Vec<usize>> = FxHashMap::default();
        for &i in indices {
            groups
                .entry(entry_param_types[i][best_param])
                .or_default()
                .push(i);
        }

        // A group that doesn't actually narrow the candidate set isn't
        // worth a branch; fold singleton-dominant groups into fallback
        // so the tree doesn't degenerate to one branch per entry when
        // every entry disagrees only on an irrelevant parameter.
        if groups.len() == 1 {
            return DecisionTreeNode::Leaf {
                entry_indices: indices.to_vec(),
            };
        }

        let by_type = groups
            .into_iter()
            .map(|(ty, group_indices)| {
                (
                    ty,
                    Box::new(Self::build_node(entry_param_types, &group_indices, depth + 1)),
                )
            })
            .collect();

        DecisionTreeNode::Branch {
            param_index: best_param,
            by_type,
            fallback: Vec::new(),
        }
    }

    #[must_use]
    pub fn depth(&self) -> u32 {
        match self {
            DecisionTreeNode::Leaf { .. } => 0,
            DecisionTreeNode::Branch { by_type, .. } => {
                1 + by_type.values().map(|child| child.depth()).max().unwrap_or(0)
            }
        }
    }

    /// Walks `arg_types` from the root, discriminating on each branch's
    /// `param_index` until a leaf is reached, and returns the index of
    /// the entry there whose parameter types exactly equal `arg_types`.
    /// `entry_param_types[i]` must give entry `i`'s parameter type ids,
    /// the same slice `build` was constructed from. Returns `None` when
    /// the tree has no branch for this argument shape (too few argument
    /// types for `param_index`, an unseen type at that position, or no
    /// exact match among a leaf's tied entries) — the caller falls back
    /// to a full structural scan in that case.
    #[must_use]
    pub fn lookup(&self, arg_types: &[TypeId], entry_param_types: &[&[TypeId]]) -> Option<usize> {
        match self {
            DecisionTreeNode::Leaf { entry_indices } => entry_indices
                .iter()
                .copied()
                .find(|&i| entry_param_types[i] == arg_types),
            DecisionTreeNode::Branch {
                param_index,
                by_type,
                fallback,
            } => {
                let ty = *arg_types.get(*param_index)?;
                if let Some(child) = by_type.get(&ty) {
                    if let Some(found) = child.lookup(arg_types, entry_param_types) {
                        return Some(found);
                    }
                }
                fallback
                    .iter()
                    .copied()
                    .find(|&i| entry_param_types[i] == arg_types)
            }
        }
    }
}

/// Entropy (in bits) of the distribution of types occupying
/// `param_index` across `indices`.
fn entropy_at(entry_param_types: &[Vec<TypeId>], indices: &[usize], param_index: usize) -> f64 {
    let mut counts: FxHashMap<TypeId, u32> = FxHashMap::default();
    for &i in indices {
        *counts.entry(entry_param_types[i][param_index]).or_insert(0) += 1;
    }
    let total = indices.len() as f64;
    counts
        .values()
        .map(|&count| {
            let p = f64::from(count) / total;
            -p * p.log2()
        })
        .sum()
}

/// The parameter position with the highest entropy (most evenly split,
/// hence the largest expected information gain from branching on it).
fn best_splitting_parameter(
    entry_param_types: &[Vec<TypeId>],
    indices: &[usize],
    arity: usize,
) -> Option<usize> {
    (0..arity)
        .map(|param_index| (param_index, entropy_at(entry_param_types, indices, param_index)))
        .filter(|&(_, entropy)| entropy > 0.0)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(param_index, _)| param_index)
}
