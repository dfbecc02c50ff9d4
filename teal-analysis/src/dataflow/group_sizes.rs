//! Possible values of the atomic group size.
//!
//! Narrowed two ways: by comparisons against `global GroupSize` and by
//! the group-index records, since the group is always large enough to
//! contain the current transaction's position.

use teal_asm::GlobalField;

use crate::basic_block::BlockId;
use crate::program::Teal;
use crate::stack_ast::StackValue;

use super::conditions::{self, Fact};
use super::{ConstraintAnalysis, SetDomain, TransactionContext, MAX_GROUP_SIZE};

pub(crate) struct GroupSizes;

fn is_group_size(teal: &Teal, expr: &StackValue) -> bool {
    conditions::global_field(teal, expr) == Some(GlobalField::GroupSize)
}

impl ConstraintAnalysis for GroupSizes {
    type Domain = SetDomain<u8>;

    fn name(&self) -> &'static str {
        "group-sizes"
    }

    fn top(&self, teal: &Teal, block: BlockId) -> Self::Domain {
        let mut sizes: std::collections::BTreeSet<u8> = (1..=MAX_GROUP_SIZE).collect();
        if let Some(indices) = teal.block(block).context().group_indices() {
            match indices.iter().min() {
                Some(&min_index) => sizes.retain(|size| *size > min_index),
                None => sizes.clear(),
            }
        }
        SetDomain(sizes)
    }

    fn apply_fact(&self, teal: &Teal, fact: &Fact<'_>, state: &mut Self::Domain) {
        if let Some((op, constant)) = conditions::numeric_fact(teal, fact, is_group_size) {
            state
                .0
                .retain(|size| conditions::cmp_holds(op, u64::from(*size), constant));
        }
    }

    fn commit(&self, context: &mut TransactionContext, state: Self::Domain) {
        context.group_sizes = Some(state.0);
    }
}
