//! The flat, sorted form every [`crate::OptimizedDispatchTable`] always
//! carries, regardless of whether a decision tree or compressed blob has
//! also been built for it.

use dispatch_sig::Implementation;

/// One implementation plus the call-frequency counter the optimizer
/// consults when deciding whether a path is "hot" (component L).
#[derive(Debug, Clone)]
pub struct DispatchEntry {
    pub implementation: Implementation,
    pub call_frequency: u64,
}

impl DispatchEntry {
    #[must_use]
    pub fn new(implementation: Implementation) -> Self {
        Self {
            implementation,
            call_frequency: 0,
        }
    }
}

/// A signature's complete runtime dispatch table: a flat array sorted by
/// `(specificity desc, call_frequency desc)`, plus whatever optional
/// decision tree and compressed form the optimizer has attached.
#[derive(Debug, Clone, Default)]
pub struct OptimizedDispatchTable {
    pub(crate) entries: Vec<DispatchEntry>,
    pub(crate) decision_tree: Option<crate::tree::DecisionTreeNode>,
    pub(crate) compressed: Option<crate::compression::CompressedBlob>,
}

impl OptimizedDispatchTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, implementation: Implementation) {
        self.entries.push(DispatchEntry::new(implementation));
        self.resort();
    }

    fn resort(&mut self) {
        self.entries.sort_by(|a, b| {
            b.implementation
                .specificity_rank
                .cmp(&a.implementation.specificity_rank)
                .then(b.call_frequency.cmp(&a.call_frequency))
        });
    }

    #[must_use]
    pub fn entries(&self) -> &[DispatchEntry] {
        &self.entries
    }

    #[must_use]
    pub fn decision_tree(&self) -> Option<&crate::tree::DecisionTreeNode> {
        self.decision_tree.as_ref()
    }

    #[must_use]
    pub fn is_compressed(&self) -> bool {
        self.compressed.is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bumps `call_frequency` for the entry at `index` and re-sorts so
    /// hot entries migrate toward the front of the flat array.
    pub fn record_call(&mut self, index: usize) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.call_frequency = entry.call_frequency.saturating_add(1);
        }
        self.resort();
    }

    /// Walks the decision tree (when one has been built) to the entry
    /// whose parameter types exactly equal `arg_types`. Exact match only:
    /// unlike [`Self::lookup_linear`], this never considers subtyping,
    /// since the tree only branches on the exact type ids it was built
    /// from. Returns `None` when no tree exists yet or the tree has no
    /// exact match, in which case the caller should fall back to
    /// [`Self::lookup_linear`].
    #[must_use]
    pub fn lookup_tree(&self, arg_types: &[dispatch_common::TypeId]) -> Option<usize> {
        let tree = self.decision_tree.as_ref()?;
        let param_types: Vec<&[dispatch_common::TypeId]> = self
            .entries
            .iter()
            .map(|e| e.implementation.param_type_ids.as_slice())
            .collect();
        tree.lookup(arg_types, &param_types)
    }

    /// Linear scan over the flat array, the fallback lookup path used
    /// when no decision tree has been built (or when one exists but the
    /// caller wants the uncompressed reference behavior, e.g. in tests
    /// asserting compressed/uncompressed agreement).
    #[must_use]
    pub fn lookup_linear(
        &self,
        arg_types: &[dispatch_common::TypeId],
        types: &dispatch_types::TypeRegistry,
    ) -> Option<usize> {
        self.entries.iter().position(|entry| {
            let implementation = &entry.implementation;
            implementation.arity() == arg_types.len()
                && implementation
                    .param_type_ids
                    .iter()
                    .zip(arg_types)
                    .all(|(&param, &arg)| types.is_subtype(arg, param))
        })
    }
}
