//! Per-field value analyses: on-completion actions, address-typed
//! fields and the fee bound.

use std::collections::BTreeSet;

use strum::IntoEnumIterator;
use teal_asm::{OnComplete, TransactionField};

use crate::basic_block::BlockId;
use crate::program::Teal;
use crate::stack_ast::StackValue;

use super::conditions::{self, CmpOp, Fact};
use super::{AddressValue, ConstraintAnalysis, FeeBound, SetDomain, TransactionContext};

/// Possible `txn OnCompletion` actions.
pub(crate) struct OnCompletionAnalysis;

fn is_on_completion(teal: &Teal, expr: &StackValue) -> bool {
    matches!(
        conditions::txn_field(teal, expr),
        Some(TransactionField::OnCompletion)
    )
}

impl ConstraintAnalysis for OnCompletionAnalysis {
    type Domain = SetDomain<OnComplete>;

    fn name(&self) -> &'static str {
        "on-completion"
    }

    fn top(&self, _teal: &Teal, _block: BlockId) -> Self::Domain {
        SetDomain(OnComplete::iter().collect())
    }

    fn apply_fact(&self, teal: &Teal, fact: &Fact<'_>, state: &mut Self::Domain) {
        if let Some((op, constant)) = conditions::numeric_fact(teal, fact, is_on_completion) {
            state
                .0
                .retain(|action| conditions::cmp_holds(op, action.value(), constant));
        }
    }

    fn commit(&self, context: &mut TransactionContext, state: Self::Domain) {
        context.on_completion = Some(state.0);
    }
}

/// Which record an address analysis fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AddressField {
    RekeyTo,
    CloseRemainderTo,
    AssetCloseTo,
}

/// Zero/non-zero analysis of an address-typed transaction field.
pub(crate) struct TxnAddressAnalysis {
    field: AddressField,
}

impl TxnAddressAnalysis {
    pub(crate) fn rekey_to() -> Self {
        TxnAddressAnalysis {
            field: AddressField::RekeyTo,
        }
    }

    pub(crate) fn close_remainder_to() -> Self {
        TxnAddressAnalysis {
            field: AddressField::CloseRemainderTo,
        }
    }

    pub(crate) fn asset_close_to() -> Self {
        TxnAddressAnalysis {
            field: AddressField::AssetCloseTo,
        }
    }

    fn matches_field(&self, teal: &Teal, expr: &StackValue) -> bool {
        let field = conditions::txn_field(teal, expr);
        matches!(
            (self.field, field),
            (AddressField::RekeyTo, Some(TransactionField::RekeyTo))
                | (
                    AddressField::CloseRemainderTo,
                    Some(TransactionField::CloseRemainderTo)
                )
                | (
                    AddressField::AssetCloseTo,
                    Some(TransactionField::AssetCloseTo)
                )
        )
    }
}

impl ConstraintAnalysis for TxnAddressAnalysis {
    type Domain = SetDomain<AddressValue>;

    fn name(&self) -> &'static str {
        match self.field {
            AddressField::RekeyTo => "rekey-to",
            AddressField::CloseRemainderTo => "close-remainder-to",
            AddressField::AssetCloseTo => "asset-close-to",
        }
    }

    fn top(&self, _teal: &Teal, _block: BlockId) -> Self::Domain {
        SetDomain(BTreeSet::from([AddressValue::Zero, AddressValue::NonZero]))
    }

    fn apply_fact(&self, teal: &Teal, fact: &Fact<'_>, state: &mut Self::Domain) {
        let other = if self.matches_field(teal, fact.lhs) {
            fact.rhs
        } else if self.matches_field(teal, fact.rhs) {
            fact.lhs
        } else {
            return;
        };

        match fact.op {
            CmpOp::Eq => {
                if conditions::is_zero_address(teal, other) {
                    state.0.retain(|v| *v == AddressValue::Zero);
                } else if matches!(other, StackValue::Bytes(_)) {
                    // equal to a concrete non-zero address literal
                    state.0.retain(|v| *v == AddressValue::NonZero);
                }
            }
            CmpOp::Neq => {
                if conditions::is_zero_address(teal, other) {
                    state.0.retain(|v| *v == AddressValue::NonZero);
                }
            }
            _ => {}
        }
    }

    fn commit(&self, context: &mut TransactionContext, state: Self::Domain) {
        let record = Some(state.0);
        match self.field {
            AddressField::RekeyTo => context.rekey_to = record,
            AddressField::CloseRemainderTo => context.close_remainder_to = record,
            AddressField::AssetCloseTo => context.asset_close_to = record,
        }
    }
}

/// Upper bound on `txn Fee`.
pub(crate) struct MaxFeeAnalysis;

fn is_fee(teal: &Teal, expr: &StackValue) -> bool {
    matches!(
        conditions::txn_field(teal, expr),
        Some(TransactionField::Fee)
    )
}

impl ConstraintAnalysis for MaxFeeAnalysis {
    type Domain = FeeBound;

    fn name(&self) -> &'static str {
        "max-fee"
    }

    fn top(&self, _teal: &Teal, _block: BlockId) -> Self::Domain {
        FeeBound { max: None }
    }

    fn apply_fact(&self, teal: &Teal, fact: &Fact<'_>, state: &mut Self::Domain) {
        use super::AbstractDomain;

        let Some((op, constant)) = conditions::numeric_fact(teal, fact, is_fee) else {
            return;
        };
        let bound = match op {
            CmpOp::Eq | CmpOp::Le => Some(constant),
            CmpOp::Lt => Some(constant.saturating_sub(1)),
            _ => None,
        };
        if let Some(bound) = bound {
            state.intersect_with(&FeeBound { max: Some(bound) });
        }
    }

    fn commit(&self, context: &mut TransactionContext, state: Self::Domain) {
        context.max_fee = Some(state);
    }
}
