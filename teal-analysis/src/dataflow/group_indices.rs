//! Possible values of the transaction's position in its atomic group.
//!
//! Runs before every other analysis; group-size reasoning reads its
//! records.

use teal_asm::TransactionField;

use crate::basic_block::BlockId;
use crate::program::Teal;
use crate::stack_ast::StackValue;

use super::conditions::{self, Fact};
use super::{ConstraintAnalysis, SetDomain, TransactionContext, MAX_GROUP_SIZE};

pub(crate) struct GroupIndices;

fn is_group_index(teal: &Teal, expr: &StackValue) -> bool {
    matches!(
        conditions::txn_field(teal, expr),
        Some(TransactionField::GroupIndex)
    )
}

impl ConstraintAnalysis for GroupIndices {
    type Domain = SetDomain<u8>;

    fn name(&self) -> &'static str {
        "group-indices"
    }

    fn top(&self, _teal: &Teal, _block: BlockId) -> Self::Domain {
        SetDomain((0..MAX_GROUP_SIZE).collect())
    }

    fn apply_fact(&self, teal: &Teal, fact: &Fact<'_>, state: &mut Self::Domain) {
        if let Some((op, constant)) = conditions::numeric_fact(teal, fact, is_group_index) {
            state
                .0
                .retain(|index| conditions::cmp_holds(op, u64::from(*index), constant));
        }
    }

    fn commit(&self, context: &mut TransactionContext, state: Self::Domain) {
        context.group_indices = Some(state.0);
    }
}
