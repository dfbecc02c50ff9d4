use std::collections::BTreeSet;

use teal_analysis::prelude::*;

fn indices(teal: &Teal, block: usize) -> BTreeSet<u8> {
    teal.blocks()[block]
        .context()
        .group_indices()
        .expect("group-index analysis ran")
        .clone()
}

#[test]
fn every_block_carries_records_after_parsing() {
    let teal = parse_teal("#pragma version 6\nint 1\nreturn", "t").unwrap();
    for block in teal.blocks() {
        let context = block.context();
        assert!(context.group_indices().is_some());
        assert!(context.group_sizes().is_some());
        assert!(context.on_completion().is_some());
        assert!(context.rekey_to().is_some());
        assert!(context.close_remainder_to().is_some());
        assert!(context.asset_close_to().is_some());
        assert!(context.max_fee().is_some());
    }
}

#[test]
fn branch_on_group_index_splits_the_value_set() {
    let source = "#pragma version 6
txn GroupIndex
int 0
==
bz fail
int 1
return
fail:
err";
    let teal = parse_teal(source, "t").unwrap();

    assert_eq!(indices(&teal, 0), (0..16).collect());
    // fall-through: the comparison held
    assert_eq!(indices(&teal, 1), BTreeSet::from([0]));
    // jump: the comparison failed
    assert_eq!(indices(&teal, 2), (1..16).collect());
}

#[test]
fn assert_constrains_following_blocks() {
    let source = "#pragma version 6
txn GroupIndex
int 2
==
assert
b done
done:
int 1
return";
    let teal = parse_teal(source, "t").unwrap();
    assert_eq!(indices(&teal, 1), BTreeSet::from([2]));
}

#[test]
fn condition_computed_in_an_earlier_block_is_chased() {
    let source = "#pragma version 6
txn GroupIndex
int 1
==
b check
check:
bz fail
int 1
return
fail:
err";
    let teal = parse_teal(source, "t").unwrap();
    // block 2 is the fall-through of the bz, so the comparison held
    assert_eq!(indices(&teal, 2), BTreeSet::from([1]));
    assert_eq!(indices(&teal, 3), (0..16).filter(|i| *i != 1).collect());
}

#[test]
fn group_sizes_read_the_group_index_records() {
    let source = "#pragma version 6
txn GroupIndex
int 3
==
bz fail
int 1
return
fail:
err";
    let teal = parse_teal(source, "t").unwrap();
    let sizes = teal.blocks()[1]
        .context()
        .group_sizes()
        .unwrap()
        .clone();
    // index 3 is possible, so the group holds at least 4 transactions
    assert_eq!(sizes, (4..=16).collect());
}

#[test]
fn group_size_comparisons_narrow_the_sizes() {
    let source = "#pragma version 6
global GroupSize
int 2
==
assert
b done
done:
int 1
return";
    let teal = parse_teal(source, "t").unwrap();
    let sizes = teal.blocks()[1].context().group_sizes().unwrap().clone();
    assert_eq!(sizes, BTreeSet::from([2]));
}

#[test]
fn on_completion_branches_split_the_action_set() {
    let source = "#pragma version 6
txn OnCompletion
int UpdateApplication
==
bnz upd
int 1
return
upd:
int 0
return";
    let teal = parse_teal(source, "t").unwrap();

    let on_jump = teal.blocks()[2].context().on_completion().unwrap();
    assert_eq!(on_jump, &BTreeSet::from([OnComplete::UpdateApplication]));

    let on_fall_through = teal.blocks()[1].context().on_completion().unwrap();
    assert_eq!(on_fall_through.len(), 5);
    assert!(!on_fall_through.contains(&OnComplete::UpdateApplication));
}

#[test]
fn rekey_to_zero_address_assertion() {
    let source = "#pragma version 6
txn RekeyTo
global ZeroAddress
==
assert
b done
done:
int 1
return";
    let teal = parse_teal(source, "t").unwrap();
    let rekey = teal.blocks()[1].context().rekey_to().unwrap();
    assert_eq!(rekey, &BTreeSet::from([AddressValue::Zero]));
    // unconstrained elsewhere
    let entry = teal.blocks()[0].context().rekey_to().unwrap();
    assert_eq!(entry.len(), 2);
}

#[test]
fn fee_upper_bound_from_assertion() {
    let source = "#pragma version 6
txn Fee
int 1000
<=
assert
b done
done:
int 1
return";
    let teal = parse_teal(source, "t").unwrap();
    assert_eq!(
        teal.blocks()[1].context().max_fee(),
        Some(FeeBound { max: Some(1000) })
    );
    assert_eq!(
        teal.blocks()[0].context().max_fee(),
        Some(FeeBound { max: None })
    );
}

#[test]
fn loops_reach_a_fixed_point() {
    let source = "#pragma version 6
int 0
store 0
loop:
load 0
int 1
+
dup
store 0
int 10
<
bnz loop
int 1
return";
    let teal = parse_teal(source, "t").unwrap();
    for block in teal.blocks() {
        assert_eq!(block.context().group_indices().unwrap().len(), 16);
    }
}

#[test]
fn analyses_are_idempotent() {
    let source = "#pragma version 6
txn GroupIndex
int 0
==
bz fail
txn OnCompletion
int NoOp
==
assert
int 1
return
fail:
err";
    let mut teal = parse_teal(source, "t").unwrap();
    let before: Vec<TransactionContext> =
        teal.blocks().iter().map(|b| b.context().clone()).collect();
    teal.run_transaction_context_analysis();
    let after: Vec<TransactionContext> =
        teal.blocks().iter().map(|b| b.context().clone()).collect();
    assert_eq!(before, after);
}
