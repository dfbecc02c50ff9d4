use teal_analysis::prelude::*;

const SUBROUTINE_CALLED_TWICE: &str = "#pragma version 7
callsub s
callsub s
int 1
return
s:
retsub";

#[test]
fn call_sites_and_blocks_are_recorded() {
    let teal = parse_teal(SUBROUTINE_CALLED_TWICE, "t").unwrap();

    let sub = teal.subroutine_by_name("s").expect("subroutine s");
    assert_eq!(sub.name(), "s");
    assert_eq!(sub.entry().index(), 3);
    assert_eq!(
        sub.blocks().iter().map(|b| b.index()).collect::<Vec<_>>(),
        vec![3]
    );
    assert_eq!(
        sub.caller_blocks()
            .iter()
            .map(|b| b.index())
            .collect::<Vec<_>>(),
        vec![0, 1]
    );

    let main = teal.main();
    assert_eq!(main.name(), MAIN_SUBROUTINE);
    assert_eq!(main.entry().index(), 0);
    let mut main_blocks: Vec<usize> = main.blocks().iter().map(|b| b.index()).collect();
    main_blocks.sort_unstable();
    assert_eq!(main_blocks, vec![0, 1, 2]);
}

#[test]
fn callsub_instructions_resolve_their_callee() {
    let teal = parse_teal(SUBROUTINE_CALLED_TWICE, "t").unwrap();
    let sub_id = teal
        .subroutines()
        .iter()
        .position(|s| s.name() == "s")
        .unwrap();

    let callsubs: Vec<&Instruction> = teal
        .instructions()
        .iter()
        .filter(|i| matches!(i.op(), Opcode::Callsub(_)))
        .collect();
    assert_eq!(callsubs.len(), 2);
    for callsub in callsubs {
        let callee = callsub.called_subroutine().expect("resolved callee");
        assert_eq!(callee.index(), sub_id);
    }
}

#[test]
fn every_block_belongs_to_exactly_one_subroutine() {
    let teal = parse_teal(SUBROUTINE_CALLED_TWICE, "t").unwrap();
    for block in teal.blocks() {
        assert!(block.subroutine().is_some());
    }
    let sub = teal.subroutine_by_name("s").unwrap();
    let entry_block = teal.block(sub.entry());
    assert_eq!(
        teal.subroutine(entry_block.subroutine().unwrap()).name(),
        "s"
    );
}

#[test]
fn subroutine_entry_block_is_annotated() {
    let teal = parse_teal(SUBROUTINE_CALLED_TWICE, "t").unwrap();
    let sub = teal.subroutine_by_name("s").unwrap();
    assert!(teal
        .block(sub.entry())
        .annotations()
        .iter()
        .any(|a| a == "Subroutine s"));
}

#[test]
fn subroutine_with_branches_claims_reachable_blocks() {
    let source = "#pragma version 7
callsub even
int 1
return
even:
txn GroupIndex
bnz odd_case
int 1
retsub
odd_case:
int 0
retsub";
    let teal = parse_teal(source, "t").unwrap();
    let sub = teal.subroutine_by_name("even").unwrap();
    let mut blocks: Vec<usize> = sub.blocks().iter().map(|b| b.index()).collect();
    blocks.sort_unstable();
    // entry, fall-through retsub and the branch target
    assert_eq!(blocks, vec![2, 3, 4]);
    for &b in &[2usize, 3, 4] {
        let owner = teal.blocks()[b].subroutine().unwrap();
        assert_eq!(teal.subroutine(owner).name(), "even");
    }
}

#[test]
fn fall_through_into_a_called_label_is_claimed_by_main() {
    // the code above the label runs into it, so the main walk also
    // reaches the subroutine entry and takes ownership
    let source = "#pragma version 4
callsub s
int 1
s:
retsub";
    let teal = parse_teal(source, "t").unwrap();
    let sub = teal.subroutine_by_name("s").unwrap();
    let entry_owner = teal.block(sub.entry()).subroutine().unwrap();
    assert_eq!(teal.subroutine(entry_owner).name(), MAIN_SUBROUTINE);
    // the subroutine still lists its blocks
    assert_eq!(sub.blocks().len(), 1);
}

#[test]
fn unreachable_blocks_default_to_main() {
    let source = "#pragma version 7
b done
dead:
int 1
pop
b done
done:
int 1
return";
    let teal = parse_teal(source, "t").unwrap();
    for block in teal.blocks() {
        let owner = block.subroutine().unwrap();
        assert_eq!(teal.subroutine(owner).name(), MAIN_SUBROUTINE);
    }
}
