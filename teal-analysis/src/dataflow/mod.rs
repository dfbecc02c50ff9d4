//! Transaction-context dataflow analyses.
//!
//! A family of forward analyses deduce, per basic block, constraints
//! on fields of the transaction executing the program. Each analysis
//! supplies a finite-height lattice of possible field values and a
//! handler for normalized comparison facts; the framework here walks
//! branch conditions, runs the fixed-point iteration and stores the
//! per-block records.
//!
//! Constraints are combined two ways: the values possible at a block
//! entry are the union over predecessor contributions, while facts
//! holding along a single path (branch refinement, `assert`)
//! intersect. Iteration starts from the unconstrained state and
//! descends; blocks with no predecessors stay unconstrained.

mod conditions;
mod field_values;
mod group_indices;
mod group_sizes;

use std::collections::{BTreeSet, VecDeque};
use std::fmt;

use teal_asm::{OnComplete, Opcode};
use tracing::debug;

use crate::basic_block::BlockId;
use crate::program::Teal;
use crate::stack_ast::{StackModelCache, StackValue};

pub(crate) use conditions::Fact;
pub(crate) use field_values::{MaxFeeAnalysis, OnCompletionAnalysis, TxnAddressAnalysis};
pub(crate) use group_indices::GroupIndices;
pub(crate) use group_sizes::GroupSizes;

/// Largest atomic transaction group the chain accepts.
pub const MAX_GROUP_SIZE: u8 = 16;

/// Abstract value of an address-typed transaction field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AddressValue {
    /// The zero address.
    Zero,
    /// Any address other than the zero address.
    NonZero,
}

/// Upper bound on an integer-typed transaction field.
///
/// `max == None` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeeBound {
    /// Largest value the field may take, if bounded.
    pub max: Option<u64>,
}

/// Per-block constraint records of every transaction-context analysis.
///
/// Filled in-place during parsing; `None` fields mean the analysis has
/// not run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionContext {
    pub(crate) group_indices: Option<BTreeSet<u8>>,
    pub(crate) group_sizes: Option<BTreeSet<u8>>,
    pub(crate) on_completion: Option<BTreeSet<OnComplete>>,
    pub(crate) rekey_to: Option<BTreeSet<AddressValue>>,
    pub(crate) close_remainder_to: Option<BTreeSet<AddressValue>>,
    pub(crate) asset_close_to: Option<BTreeSet<AddressValue>>,
    pub(crate) max_fee: Option<FeeBound>,
}

impl TransactionContext {
    /// Possible values of `txn GroupIndex` when the block executes.
    pub fn group_indices(&self) -> Option<&BTreeSet<u8>> {
        self.group_indices.as_ref()
    }

    /// Possible values of `global GroupSize` when the block executes.
    pub fn group_sizes(&self) -> Option<&BTreeSet<u8>> {
        self.group_sizes.as_ref()
    }

    /// Possible values of `txn OnCompletion` when the block executes.
    pub fn on_completion(&self) -> Option<&BTreeSet<OnComplete>> {
        self.on_completion.as_ref()
    }

    /// Possible values of `txn RekeyTo` when the block executes.
    pub fn rekey_to(&self) -> Option<&BTreeSet<AddressValue>> {
        self.rekey_to.as_ref()
    }

    /// Possible values of `txn CloseRemainderTo` when the block
    /// executes.
    pub fn close_remainder_to(&self) -> Option<&BTreeSet<AddressValue>> {
        self.close_remainder_to.as_ref()
    }

    /// Possible values of `txn AssetCloseTo` when the block executes.
    pub fn asset_close_to(&self) -> Option<&BTreeSet<AddressValue>> {
        self.asset_close_to.as_ref()
    }

    /// Upper bound on `txn Fee` when the block executes.
    pub fn max_fee(&self) -> Option<FeeBound> {
        self.max_fee
    }
}

/// Finite-height domain of constraints over one transaction field.
pub(crate) trait AbstractDomain: Clone + PartialEq + fmt::Debug {
    /// Least upper bound: values possible along either path.
    fn union_with(&mut self, other: &Self);
    /// Greatest lower bound: constraints holding simultaneously.
    fn intersect_with(&mut self, other: &Self);
}

/// Set of possible values of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SetDomain<T: Ord + Clone + fmt::Debug>(pub BTreeSet<T>);

impl<T: Ord + Clone + fmt::Debug> AbstractDomain for SetDomain<T> {
    fn union_with(&mut self, other: &Self) {
        self.0.extend(other.0.iter().cloned());
    }

    fn intersect_with(&mut self, other: &Self) {
        self.0.retain(|v| other.0.contains(v));
    }
}

impl AbstractDomain for FeeBound {
    fn union_with(&mut self, other: &Self) {
        self.max = match (self.max, other.max) {
            (Some(a), Some(b)) => Some(a.max(b)),
            _ => None,
        };
    }

    fn intersect_with(&mut self, other: &Self) {
        self.max = match (self.max, other.max) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (bound, None) | (None, bound) => bound,
        };
    }
}

/// One per-field constraint analysis.
///
/// The framework supplies condition walking and the fixed-point
/// iteration; implementors supply the lattice, the reaction to
/// normalized comparison facts and where the result is recorded.
pub(crate) trait ConstraintAnalysis {
    type Domain: AbstractDomain;

    fn name(&self) -> &'static str;

    /// The unconstrained state of a block. May read records of
    /// analyses that ran earlier.
    fn top(&self, teal: &Teal, block: BlockId) -> Self::Domain;

    /// Narrow the state by a comparison fact known to hold.
    ///
    /// Facts the analysis cannot interpret must leave the state
    /// unchanged.
    fn apply_fact(&self, teal: &Teal, fact: &Fact<'_>, state: &mut Self::Domain);

    /// Record the final state of a block.
    fn commit(&self, context: &mut TransactionContext, state: Self::Domain);
}

/// Run every transaction-context analysis and store the per-block
/// records. The group-index analysis runs first; later analyses may
/// read its results.
pub(crate) fn apply_transaction_context_analysis(teal: &mut Teal) {
    debug!("running transaction context analysis");
    let mut cache = StackModelCache::default();

    run_analysis(teal, &GroupIndices, &mut cache);
    run_analysis(teal, &GroupSizes, &mut cache);
    run_analysis(teal, &OnCompletionAnalysis, &mut cache);
    run_analysis(teal, &TxnAddressAnalysis::rekey_to(), &mut cache);
    run_analysis(teal, &TxnAddressAnalysis::close_remainder_to(), &mut cache);
    run_analysis(teal, &TxnAddressAnalysis::asset_close_to(), &mut cache);
    run_analysis(teal, &MaxFeeAnalysis, &mut cache);

    // the stack models and equations are not needed downstream
    cache.clear();
}

fn run_analysis<A: ConstraintAnalysis>(teal: &mut Teal, analysis: &A, cache: &mut StackModelCache) {
    debug!(analysis = analysis.name(), "running txn field analysis");

    let block_count = teal.blocks().len();
    // the per-block unconstrained state; it may carry block-local
    // knowledge from analyses that ran earlier, so every merge is
    // intersected with it
    let tops: Vec<A::Domain> = (0..block_count)
        .map(|b| analysis.top(teal, BlockId(b)))
        .collect();
    let mut pre: Vec<A::Domain> = tops.clone();

    let mut queue: VecDeque<usize> = (0..block_count).collect();
    let mut queued = vec![true; block_count];

    while let Some(b) = queue.pop_front() {
        queued[b] = false;
        let block_id = BlockId(b);
        let preds: Vec<BlockId> = teal.block(block_id).predecessors().collect();
        // the program entry and call-reached blocks keep the
        // unconstrained state
        if b == 0 || preds.is_empty() {
            continue;
        }

        let mut merged: Option<A::Domain> = None;
        for pred in preds {
            let mut state = pre[pred.0].clone();
            apply_block_facts(analysis, teal, cache, pred, &mut state);
            refine_edge(analysis, teal, cache, pred, block_id, &mut state);
            merged = Some(match merged {
                None => state,
                Some(mut acc) => {
                    acc.union_with(&state);
                    acc
                }
            });
        }
        let mut merged = merged.expect("predecessor list is non-empty");
        merged.intersect_with(&tops[b]);

        if merged != pre[b] {
            pre[b] = merged;
            for succ in teal.block(block_id).successors() {
                if !queued[succ.0] {
                    queued[succ.0] = true;
                    queue.push_back(succ.0);
                }
            }
        }
    }

    for (b, state) in pre.into_iter().enumerate() {
        analysis.commit(&mut teal.block_mut(BlockId(b)).context, state);
    }
}

/// Apply the facts established inside a block (`assert` conditions) to
/// its state.
fn apply_block_facts<A: ConstraintAnalysis>(
    analysis: &A,
    teal: &Teal,
    cache: &mut StackModelCache,
    block: BlockId,
    state: &mut A::Domain,
) {
    let model = cache.model(teal, block);
    for fact in &model.asserts {
        conditions::refine_by_condition(analysis, teal, cache, block, fact, true, state);
    }
}

/// Narrow the state flowing along one edge by the branch condition of
/// the source block's exit.
fn refine_edge<A: ConstraintAnalysis>(
    analysis: &A,
    teal: &Teal,
    cache: &mut StackModelCache,
    from: BlockId,
    to: BlockId,
    state: &mut A::Domain,
) {
    let exit_op = teal.ins(teal.block(from).exit()).op().clone();
    let (condition, jump_nonzero, labels) = match &exit_op {
        Opcode::Bz(label) => (cache.model(teal, from).branch.clone(), false, vec![label.clone()]),
        Opcode::Bnz(label) => (cache.model(teal, from).branch.clone(), true, vec![label.clone()]),
        Opcode::Switch(labels) => {
            (cache.model(teal, from).branch.clone(), true, labels.clone())
        }
        _ => return,
    };
    let Some(condition) = condition else { return };

    let target_of = |label: &str| -> Option<BlockId> {
        teal.label(label).and_then(|ins| teal.ins(ins).block())
    };
    let default_target = teal.block(from).default_successors().first().copied();

    if matches!(exit_op, Opcode::Switch(_)) {
        let arm_targets: Vec<Option<BlockId>> = labels.iter().map(|l| target_of(l)).collect();
        let matching: Vec<u64> = arm_targets
            .iter()
            .enumerate()
            .filter(|(_, t)| **t == Some(to))
            .map(|(i, _)| i as u64)
            .collect();
        if default_target == Some(to) {
            if matching.is_empty() {
                // fall-through: the scrutinee matched no arm
                for arm in 0..labels.len() as u64 {
                    let arm_value = StackValue::Int(arm);
                    let fact = Fact {
                        op: conditions::CmpOp::Neq,
                        lhs: &condition,
                        rhs: &arm_value,
                    };
                    conditions::apply_comparison(analysis, teal, cache, from, &fact, state);
                }
            }
        } else if !matching.is_empty() {
            let mut merged: Option<A::Domain> = None;
            for arm in matching {
                let mut alternative = state.clone();
                let arm_value = StackValue::Int(arm);
                let fact = Fact {
                    op: conditions::CmpOp::Eq,
                    lhs: &condition,
                    rhs: &arm_value,
                };
                conditions::apply_comparison(analysis, teal, cache, from, &fact, &mut alternative);
                merged = Some(match merged {
                    None => alternative,
                    Some(mut acc) => {
                        acc.union_with(&alternative);
                        acc
                    }
                });
            }
            if let Some(merged) = merged {
                *state = merged;
            }
        }
        return;
    }

    // bz / bnz: refine only when the jump target and the fall-through
    // are distinct blocks
    let jump_target = target_of(&labels[0]);
    if jump_target == default_target {
        return;
    }
    if jump_target == Some(to) {
        conditions::refine_by_condition(analysis, teal, cache, from, &condition, jump_nonzero, state);
    } else if default_target == Some(to) {
        conditions::refine_by_condition(
            analysis,
            teal,
            cache,
            from,
            &condition,
            !jump_nonzero,
            state,
        );
    }
}
