use std::collections::HashSet;

use teal_analysis::prelude::*;

/// Structural invariants every parsed program upholds.
fn check_invariants(teal: &Teal) {
    // unique 1-based line numbers
    let mut lines = HashSet::new();
    for ins in teal.instructions() {
        assert!(ins.line() >= 1);
        assert!(lines.insert(ins.line()), "duplicate line {}", ins.line());
    }

    // contiguous block indices
    for (i, block) in teal.blocks().iter().enumerate() {
        assert_eq!(block.idx(), i);
        assert!(!block.instructions().is_empty());
        assert!(block.subroutine().is_some());
    }

    // every instruction belongs to exactly one block
    let mut seen = vec![false; teal.instructions().len()];
    for block in teal.blocks() {
        for ins in block.instructions() {
            assert!(!seen[ins.index()], "instruction owned twice");
            seen[ins.index()] = true;
        }
    }
    assert!(seen.iter().all(|s| *s));

    for block in teal.blocks() {
        let ids = block.instructions();
        // interior instructions form a straight line inside the block
        for window in ids.windows(2) {
            let (a, b) = (window[0], window[1]);
            assert!(teal.ins(a).next().contains(&b));
            assert!(teal.ins(b).prev().contains(&a));
        }
        for &id in &ids[1..] {
            assert_eq!(teal.ins(id).prev().len(), 1, "interior jump target");
        }
        for &id in &ids[..ids.len() - 1] {
            assert_eq!(teal.ins(id).next().len(), 1, "interior branch");
        }

        // block-level edges correspond to instruction-level edges of
        // the exit instruction
        let exit = teal.ins(block.exit());
        let exit_targets: HashSet<usize> = exit
            .next()
            .iter()
            .map(|id| teal.ins(*id).block().unwrap().index())
            .collect();
        for successor in block.successors() {
            let entry = teal.block(successor).entry();
            assert!(
                exit.next().contains(&entry),
                "block edge without instruction edge"
            );
            assert!(exit_targets.contains(&successor.index()));
        }
        for target in exit_targets {
            assert!(
                block.successors().any(|s| s.index() == target),
                "instruction edge without block edge"
            );
        }

        // successor/predecessor lists are symmetric
        for successor in block.successors() {
            assert!(teal
                .block(successor)
                .predecessors()
                .any(|p| p.index() == block.idx()));
        }
    }
}

const SUBROUTINE_CALLED_TWICE: &str = "#pragma version 7
callsub s
callsub s
int 1
return
s:
retsub";

#[test]
fn subroutine_called_twice_block_structure() {
    let teal = parse_teal(SUBROUTINE_CALLED_TWICE, "t").unwrap();
    check_invariants(&teal);

    assert_eq!(teal.blocks().len(), 4);
    let entry_lines: Vec<usize> = teal
        .blocks()
        .iter()
        .map(|b| teal.ins(b.entry()).line())
        .collect();
    assert_eq!(entry_lines, vec![1, 3, 4, 6]);

    let block_instruction_lines: Vec<Vec<usize>> = teal
        .blocks()
        .iter()
        .map(|b| b.instructions().iter().map(|i| teal.ins(*i).line()).collect())
        .collect();
    assert_eq!(
        block_instruction_lines,
        vec![vec![1, 2], vec![3], vec![4, 5], vec![6, 7]]
    );

    let successors: Vec<Vec<usize>> = teal
        .blocks()
        .iter()
        .map(|b| b.successors().map(|s| s.index()).collect())
        .collect();
    assert_eq!(successors, vec![vec![1], vec![2], vec![], vec![]]);
}

#[test]
fn conditional_branch_creates_jump_edges() {
    let source = "#pragma version 8
int 1
bnz skip
err
skip:
int 1
return";
    let teal = parse_teal(source, "t").unwrap();
    check_invariants(&teal);

    assert_eq!(teal.blocks().len(), 3);
    let b0 = &teal.blocks()[0];
    assert_eq!(b0.default_successors(), &[teal.block_ids().nth(1).unwrap()]);
    assert_eq!(b0.jump_successors(), &[teal.block_ids().nth(2).unwrap()]);
}

#[test]
fn switch_as_last_instruction_has_one_successor_per_label() {
    let source = "#pragma version 8
lab1:
int 1
return
lab2:
int 1
return
lab3:
int 1
return
int 0
switch lab1 lab2 lab3";
    let teal = parse_teal(source, "t").unwrap();
    check_invariants(&teal);

    let switch_block = teal.blocks().last().unwrap();
    assert!(matches!(
        teal.ins(switch_block.exit()).op(),
        Opcode::Switch(_)
    ));
    let successors: Vec<usize> = switch_block.successors().map(|s| s.index()).collect();
    assert_eq!(successors.len(), 3);
    // one per label, in label order
    assert_eq!(successors, vec![1, 2, 3]);
    assert!(switch_block.default_successors().is_empty());
}

#[test]
fn switch_with_fall_through_keeps_the_default_edge() {
    let source = "#pragma version 8
int 0
switch lab1 lab2
err
lab1:
int 1
return
lab2:
int 1
return";
    let teal = parse_teal(source, "t").unwrap();
    check_invariants(&teal);

    let b0 = &teal.blocks()[0];
    let successors: Vec<usize> = b0.successors().map(|s| s.index()).collect();
    // fall-through to the err block plus one edge per label
    assert_eq!(successors, vec![1, 2, 3]);
    assert_eq!(b0.default_successors().len(), 1);
    assert_eq!(b0.jump_successors().len(), 2);
}

#[test]
fn unconditional_self_loop() {
    let teal = parse_teal("main:\nb main", "t").unwrap();
    check_invariants(&teal);
    assert_eq!(teal.blocks().len(), 1);
    let b0 = &teal.blocks()[0];
    assert_eq!(b0.successors().collect::<Vec<_>>(), vec![teal.block_ids().next().unwrap()]);
    assert!(b0.default_successors().is_empty());
}

#[test]
fn no_empty_trailing_block() {
    for source in [
        "int 1\nreturn",
        "main:\nb main",
        "#pragma version 4\ncallsub s\ns:\nretsub",
    ] {
        let teal = parse_teal(source, "t").unwrap();
        for block in teal.blocks() {
            assert!(!block.instructions().is_empty());
        }
    }
}

#[test]
fn block_cost_sums_instruction_costs() {
    let teal = parse_teal("#pragma version 2\nbyte 0x00\nsha256\npop\nint 1\nreturn", "t").unwrap();
    // pragma 0, byte 1, sha256 35, pop 1, int 1, return 1
    assert_eq!(teal.blocks()[0].cost(), 39);
    let annotation = &teal.blocks()[0].annotations()[0];
    assert_eq!(annotation, "block_id = 0; cost = 39");
}
