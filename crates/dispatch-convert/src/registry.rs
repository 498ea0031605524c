//! Explicit conversions and per-argument path search.

use dispatch_common::TypeId;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionMethod {
    BuiltinCast,
    TraitMethod,
    Constructor,
}

/// A single registered explicit conversion `from -> to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conversion {
    pub from: TypeId,
    pub to: TypeId,
    pub cost: u32,
    pub is_lossy: bool,
    pub method: ConversionMethod,
}

/// The chain of conversions needed to turn one argument's type into a
/// parameter's type; empty means no conversion is needed (identity).
#[derive(Debug, Clone, Default)]
pub struct ArgumentConversion {
    pub steps: SmallVec<[Conversion; 2]>,
}

impl ArgumentConversion {
    #[must_use]
    pub fn identity() -> Self {
        Self { steps: SmallVec::new() }
    }

    #[must_use]
    pub fn cost(&self) -> u32 {
        self.steps.iter().map(|s| s.cost).sum()
    }

    #[must_use]
    pub fn is_lossy(&self) -> bool {
        self.steps.iter().any(|s| s.is_lossy)
    }
}

/// The per-argument conversion plan for an entire call. Length equals the
/// call's argument arity.
#[derive(Debug, Clone, Default)]
pub struct ConversionPath {
    pub per_argument: Vec<ArgumentConversion>,
}

impl ConversionPath {
    #[must_use]
    pub fn total_cost(&self) -> u32 {
        self.per_argument.iter().map(ArgumentConversion::cost).sum()
    }

    #[must_use]
    pub fn is_lossy(&self) -> bool {
        self.per_argument.iter().any(ArgumentConversion::is_lossy)
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        self.per_argument.len()
    }
}

pub struct ConversionRegistry {
    /// Adjacency list: from -> (to -> Conversion). A `FxHashMap` of
    /// `FxHashMap`s rather than a single map keyed on the pair, so
    /// `available_from` doesn't need a full scan.
    edges: FxHashMap<TypeId, FxHashMap<TypeId, Conversion>>,
    max_path_depth: usize,
}

impl Default for ConversionRegistry {
    fn default() -> Self {
        Self::with_builtins(dispatch_common::limits::MAX_CONVERSION_PATH_DEPTH)
    }
}

impl ConversionRegistry {
    #[must_use]
    pub fn with_builtins(max_path_depth: usize) -> Self {
        let mut reg = Self {
            edges: FxHashMap::default(),
            max_path_depth,
        };
        reg.register_builtins();
        reg
    }

    fn register_builtins(&mut self) {
        // Lossless widening: small integer types and single-precision
        // floats into strictly larger numeric types. Lossy conversions
        // always carry strictly higher cost than lossless ones so a
        // minimal-cost path search never prefers a lossy step when a
        // lossless one is available.
        self.register(Conversion {
            from: TypeId::I32,
            to: TypeId::I64,
            cost: 1,
            is_lossy: false,
            method: ConversionMethod::BuiltinCast,
        });
        self.register(Conversion {
            from: TypeId::I32,
            to: TypeId::F64,
            cost: 2,
            is_lossy: false,
            method: ConversionMethod::BuiltinCast,
        });
        self.register(Conversion {
            from: TypeId::F32,
            to: TypeId::F64,
            cost: 1,
            is_lossy: false,
            method: ConversionMethod::BuiltinCast,
        });
        self.register(Conversion {
            from: TypeId::I64,
            to: TypeId::F64,
            cost: 5,
            is_lossy: true,
            method: ConversionMethod::BuiltinCast,
        });
        self.register(Conversion {
            from: TypeId::F64,
            to: TypeId::I32,
            cost: 8,
            is_lossy: true,
            method: ConversionMethod::BuiltinCast,
        });
        self.register(Conversion {
            from: TypeId::BOOL,
            to: TypeId::I32,
            cost: 3,
            is_lossy: false,
            method: ConversionMethod::BuiltinCast,
        });
        self.register(Conversion {
            from: TypeId::I32,
            to: TypeId::BOOL,
            cost: 6,
            is_lossy: true,
            method: ConversionMethod::BuiltinCast,
        });
    }

    pub fn register(&mut self, conversion: Conversion) {
        debug_assert!(
            conversion.from != conversion.to,
            "conversions must not be self-loops"
        );
        self.edges
            .entry(conversion.from)
            .or_default()
            .insert(conversion.to, conversion);
    }

    #[must_use]
    pub fn find_explicit(&self, from: TypeId, to: TypeId) -> Option<Conversion> {
        self.edges.get(&from)?.get(&to).copied()
    }

    #[must_use]
    pub fn available_from(&self, from: TypeId) -> Vec<TypeId> {
        self.edges
            .get(&from)
            .map(|m| m.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Cheapest chain of conversions from `from` to `to`, bounded by
    /// `max_path_depth`. Dijkstra over the (small, densely-cost-labeled)
    /// conversion graph; ties broken by fewer steps.
    #[must_use]
    pub fn find_single_argument_path(&self, from: TypeId, to: TypeId) -> Option<ArgumentConversion> {
        if from == to {
            return Some(ArgumentConversion::identity());
        }

        // best[type] = (cost, steps-so-far)
        let mut best: FxHashMap<TypeId, (u32, Vec<Conversion>)> = FxHashMap::default();
        best.insert(from, (0, Vec::new()));
        let mut frontier = vec![from];
        let mut depth = 0usize;

        while !frontier.is_empty() && depth < self.max_path_depth {
            depth += 1;
            let mut next_frontier = Vec::new();
            for current in frontier.drain(..) {
                let (current_cost, current_steps) = best[&current].clone();
                let Some(edges) = self.edges.get(&current) else {
                    continue;
                };
                for conversion in edges.values() {
                    let candidate_cost = current_cost + conversion.cost;
                    let better = match best.get(&conversion.to) {
                        Some((existing_cost, _)) => candidate_cost < *existing_cost,
                        None => true,
                    };
                    if better {
                        let mut steps = current_steps.clone();
                        steps.push(*conversion);
                        best.insert(conversion.to, (candidate_cost, steps));
                        next_frontier.push(conversion.to);
                    }
                }
            }
            frontier = next_frontier;
        }

        best.remove(&to).map(|(_, steps)| ArgumentConversion {
            steps: steps.into(),
        })
    }

    /// Per-argument path search across an entire call; no chaining
    /// between different arguments. Returns `None` if any argument has no
    /// path at all.
    #[must_use]
    pub fn find_path(&self, from_types: &[TypeId], to_types: &[TypeId]) -> Option<ConversionPath> {
        if from_types.len() != to_types.len() {
            return None;
        }
        let mut per_argument = Vec::with_capacity(from_types.len());
        for (&from, &to) in from_types.iter().zip(to_types) {
            per_argument.push(self.find_single_argument_path(from, to)?);
        }
        Some(ConversionPath { per_argument })
    }
}
