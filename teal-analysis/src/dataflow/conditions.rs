//! Branch-condition interpretation shared by the analyses.
//!
//! Conditions are stack expressions; this module walks boolean
//! structure (`!`, `&&`, `||`), normalizes comparisons and hands the
//! resulting facts to the analysis. Anything uncomputable leaves the
//! state unchanged, i.e. unconstrained.

use teal_asm::{GlobalField, Opcode, TransactionField};

use crate::basic_block::BlockId;
use crate::program::Teal;
use crate::stack_ast::{StackModelCache, StackValue};

use super::{AbstractDomain, ConstraintAnalysis};

/// Comparison operator of a normalized fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CmpOp {
    Eq,
    Neq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    /// The operator holding when this one does not.
    pub(crate) fn negate(self) -> Self {
        match self {
            CmpOp::Eq => CmpOp::Neq,
            CmpOp::Neq => CmpOp::Eq,
            CmpOp::Lt => CmpOp::Ge,
            CmpOp::Le => CmpOp::Gt,
            CmpOp::Gt => CmpOp::Le,
            CmpOp::Ge => CmpOp::Lt,
        }
    }

    /// The operator with its operands swapped.
    pub(crate) fn mirror(self) -> Self {
        match self {
            CmpOp::Eq => CmpOp::Eq,
            CmpOp::Neq => CmpOp::Neq,
            CmpOp::Lt => CmpOp::Gt,
            CmpOp::Le => CmpOp::Ge,
            CmpOp::Gt => CmpOp::Lt,
            CmpOp::Ge => CmpOp::Le,
        }
    }
}

/// A comparison known to hold on the refined path.
#[derive(Debug)]
pub(crate) struct Fact<'a> {
    pub op: CmpOp,
    pub lhs: &'a StackValue,
    pub rhs: &'a StackValue,
}

/// Whether `v op k` holds.
pub(crate) fn cmp_holds(op: CmpOp, v: u64, k: u64) -> bool {
    match op {
        CmpOp::Eq => v == k,
        CmpOp::Neq => v != k,
        CmpOp::Lt => v < k,
        CmpOp::Le => v <= k,
        CmpOp::Gt => v > k,
        CmpOp::Ge => v >= k,
    }
}

/// Integer value of a constant expression.
pub(crate) fn eval_int(expr: &StackValue) -> Option<u64> {
    match expr {
        StackValue::Int(n) => Some(*n),
        _ => None,
    }
}

/// The transaction field an expression reads from the current
/// transaction, if any.
pub(crate) fn txn_field<'t>(teal: &'t Teal, expr: &StackValue) -> Option<&'t TransactionField> {
    if let StackValue::Op { ins, .. } = expr {
        if let Opcode::Txn(field) = teal.ins(*ins).op() {
            return Some(field);
        }
    }
    None
}

/// The global parameter an expression reads, if any.
pub(crate) fn global_field(teal: &Teal, expr: &StackValue) -> Option<GlobalField> {
    if let StackValue::Op { ins, .. } = expr {
        if let Opcode::Global(field) = teal.ins(*ins).op() {
            return Some(*field);
        }
    }
    None
}

/// Source spellings of the zero address.
const ZERO_ADDRESS_LITERALS: [&str; 2] = [
    "0x0000000000000000000000000000000000000000000000000000000000000000",
    "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAY5HFKQ",
];

/// Whether the expression denotes the zero address.
pub(crate) fn is_zero_address(teal: &Teal, expr: &StackValue) -> bool {
    if global_field(teal, expr) == Some(GlobalField::ZeroAddress) {
        return true;
    }
    match expr {
        StackValue::Bytes(literal) => ZERO_ADDRESS_LITERALS
            .iter()
            .any(|zero| literal.trim_matches('"') == *zero),
        _ => false,
    }
}

/// Normalize a fact over a specific integer-valued field: returns the
/// comparison and the constant with the field on the left-hand side.
pub(crate) fn numeric_fact<F>(teal: &Teal, fact: &Fact<'_>, is_field: F) -> Option<(CmpOp, u64)>
where
    F: Fn(&Teal, &StackValue) -> bool,
{
    if is_field(teal, fact.lhs) {
        eval_int(fact.rhs).map(|k| (fact.op, k))
    } else if is_field(teal, fact.rhs) {
        eval_int(fact.lhs).map(|k| (fact.op.mirror(), k))
    } else {
        None
    }
}

/// Narrow `state` by the knowledge that `cond` evaluates to non-zero
/// (or zero) at the exit of `block`.
pub(crate) fn refine_by_condition<A: ConstraintAnalysis>(
    analysis: &A,
    teal: &Teal,
    cache: &mut StackModelCache,
    block: BlockId,
    cond: &StackValue,
    nonzero: bool,
    state: &mut A::Domain,
) {
    match cond {
        StackValue::Arg(position) => {
            if let Some(resolved) = cache.resolve_entry_arg(teal, block, *position) {
                refine_by_condition(analysis, teal, cache, block, &resolved, nonzero, state);
            }
        }
        StackValue::Op { ins, operands } => {
            let op = teal.ins(*ins).op();
            match (op, operands.as_slice()) {
                (Opcode::Not, [inner]) => {
                    refine_by_condition(analysis, teal, cache, block, inner, !nonzero, state);
                }
                (Opcode::And, [a, b]) if nonzero => {
                    refine_by_condition(analysis, teal, cache, block, a, true, state);
                    refine_by_condition(analysis, teal, cache, block, b, true, state);
                }
                (Opcode::And, [a, b]) => {
                    // either conjunct may be the zero one
                    union_of_alternatives(analysis, teal, cache, block, &[(a, false), (b, false)], state);
                }
                (Opcode::Or, [a, b]) if nonzero => {
                    union_of_alternatives(analysis, teal, cache, block, &[(a, true), (b, true)], state);
                }
                (Opcode::Or, [a, b]) => {
                    refine_by_condition(analysis, teal, cache, block, a, false, state);
                    refine_by_condition(analysis, teal, cache, block, b, false, state);
                }
                (
                    Opcode::Eq | Opcode::Neq | Opcode::Lt | Opcode::Le | Opcode::Gt | Opcode::Ge,
                    [a, b],
                ) => {
                    let mut cmp = match op {
                        Opcode::Eq => CmpOp::Eq,
                        Opcode::Neq => CmpOp::Neq,
                        Opcode::Lt => CmpOp::Lt,
                        Opcode::Le => CmpOp::Le,
                        Opcode::Gt => CmpOp::Gt,
                        _ => CmpOp::Ge,
                    };
                    if !nonzero {
                        cmp = cmp.negate();
                    }
                    let fact = Fact {
                        op: cmp,
                        lhs: a,
                        rhs: b,
                    };
                    apply_comparison(analysis, teal, cache, block, &fact, state);
                }
                _ => {
                    // opaque value: its truthiness is still a fact
                    let zero = StackValue::Int(0);
                    let fact = Fact {
                        op: if nonzero { CmpOp::Neq } else { CmpOp::Eq },
                        lhs: cond,
                        rhs: &zero,
                    };
                    apply_comparison(analysis, teal, cache, block, &fact, state);
                }
            }
        }
        _ => {}
    }
}

/// Apply a comparison fact with both operands resolved through the
/// entry-argument equations.
pub(crate) fn apply_comparison<A: ConstraintAnalysis>(
    analysis: &A,
    teal: &Teal,
    cache: &mut StackModelCache,
    block: BlockId,
    fact: &Fact<'_>,
    state: &mut A::Domain,
) {
    let lhs = resolve_operand(teal, cache, block, fact.lhs);
    let rhs = resolve_operand(teal, cache, block, fact.rhs);
    let resolved = Fact {
        op: fact.op,
        lhs: &lhs,
        rhs: &rhs,
    };
    analysis.apply_fact(teal, &resolved, state);
}

fn resolve_operand(
    teal: &Teal,
    cache: &mut StackModelCache,
    block: BlockId,
    expr: &StackValue,
) -> StackValue {
    if let StackValue::Arg(position) = expr {
        if let Some(resolved) = cache.resolve_entry_arg(teal, block, *position) {
            return resolved;
        }
    }
    expr.clone()
}

/// The state after a condition that holds through at least one of the
/// given alternatives: union of the individually refined states.
fn union_of_alternatives<A: ConstraintAnalysis>(
    analysis: &A,
    teal: &Teal,
    cache: &mut StackModelCache,
    block: BlockId,
    alternatives: &[(&StackValue, bool)],
    state: &mut A::Domain,
) {
    let mut merged: Option<A::Domain> = None;
    for &(cond, nonzero) in alternatives {
        let mut refined = state.clone();
        refine_by_condition(analysis, teal, cache, block, cond, nonzero, &mut refined);
        merged = Some(match merged {
            None => refined,
            Some(mut acc) => {
                acc.union_with(&refined);
                acc
            }
        });
    }
    if let Some(merged) = merged {
        *state = merged;
    }
}
