//! Parser and CFG builder for TEAL programs.
//!
//! A program is parsed in four passes:
//!
//! 1. Parse instructions and add default (fall-through) links.
//! 2. Add jump links between instructions.
//! 3. Construct basic blocks and add default links between them.
//! 4. Add jump links between basic blocks.
//!
//! After the passes, blocks are sorted by the line of their entry
//! instruction, subroutines are discovered, instruction and field
//! versions are validated against the program version, the constant
//! pools are resolved when unambiguous, and the transaction-context
//! analyses are run.

use std::collections::{BTreeMap, HashMap};
use std::mem;

use teal_asm::{ContractType, Opcode, TransactionField};
use tracing::debug;

use crate::basic_block::{BasicBlock, BlockId};
use crate::dataflow;
use crate::error::{ParseError, ValidationDiagnostic};
use crate::instruction::{InsId, Instruction};
use crate::program::Teal;
use crate::subroutine::{Subroutine, SubroutineId, MAIN_SUBROUTINE};

/// Parse a TEAL program into its annotated CFG representation.
///
/// On success the returned program carries basic blocks, subroutines,
/// validation diagnostics and the per-block transaction-context
/// records. The first malformed line aborts parsing.
pub fn parse_teal(source_code: &str, contract_name: &str) -> Result<Teal, ParseError> {
    let mut instructions: Vec<Instruction> = Vec::new();
    let mut labels: HashMap<String, InsId> = HashMap::new();
    // subroutine name -> callsub instructions, in first-call order
    let mut subroutine_callsubs: Vec<(String, Vec<InsId>)> = Vec::new();
    let mut callsub_index: HashMap<String, usize> = HashMap::new();

    let (intcblocks, bytecblocks) = first_pass(
        source_code,
        &mut instructions,
        &mut labels,
        &mut subroutine_callsubs,
        &mut callsub_index,
    )?;
    debug!(subroutines = subroutine_callsubs.len(), "first pass done");

    second_pass(&mut instructions, &labels)?;
    debug!("second pass done");

    let mut blocks = create_blocks(&mut instructions);
    fourth_pass(&mut instructions, &mut blocks);
    sort_blocks(&mut instructions, &mut blocks);
    debug!(blocks = blocks.len(), "basic blocks constructed");

    let mode = detect_contract_type(&instructions);
    let version = match instructions[0].op() {
        Opcode::Pragma(v) => *v,
        _ => 1,
    };
    let diagnostics = verify_version_and_mode(&instructions, version);

    let (subroutines, subroutine_ids, main) = discover_subroutines(
        &mut instructions,
        &mut blocks,
        &labels,
        subroutine_callsubs,
    )?;

    for block in &mut blocks {
        block.cost = block
            .instructions
            .iter()
            .map(|id| instructions[id.0].op().cost())
            .sum();
        block
            .annotations
            .insert(0, format!("block_id = {}; cost = {}", block.idx, block.cost));
    }

    let (int_constants, byte_constants) =
        resolve_constant_pools(&instructions, &intcblocks, &bytecblocks);

    let mut teal = Teal {
        version,
        mode,
        contract_name: contract_name.to_string(),
        instructions,
        blocks,
        main,
        subroutines,
        subroutine_ids,
        labels,
        int_constants,
        byte_constants,
        diagnostics,
        detectors: Vec::new(),
        printers: Vec::new(),
    };

    dataflow::apply_transaction_context_analysis(&mut teal);

    Ok(teal)
}

/// First pass: parse lines, attach buffered comments, add default
/// edges and collect labels, call sites and constant-block
/// instructions.
fn first_pass(
    source_code: &str,
    instructions: &mut Vec<Instruction>,
    labels: &mut HashMap<String, InsId>,
    subroutine_callsubs: &mut Vec<(String, Vec<InsId>)>,
    callsub_index: &mut HashMap<String, usize>,
) -> Result<(Vec<InsId>, Vec<InsId>), ParseError> {
    let mut intcblocks: Vec<InsId> = Vec::new();
    let mut bytecblocks: Vec<InsId> = Vec::new();
    let mut pending_comments: Vec<String> = Vec::new();
    let mut prev: Option<InsId> = None;

    for (idx, line) in source_code.lines().enumerate() {
        if line.trim_start().starts_with("//") {
            pending_comments.push(line.to_string());
            continue;
        }
        let op = teal_asm::parse_line(line).map_err(|e| ParseError {
            line: idx,
            reason: e.to_string(),
        })?;
        let Some(op) = op else { continue };

        let id = InsId(instructions.len());
        let mut ins = Instruction::new(op, idx + 1);
        ins.comments_before = mem::take(&mut pending_comments);
        annotate_instruction(&mut ins);

        match ins.op() {
            Opcode::IntcBlock(_) => intcblocks.push(id),
            Opcode::BytecBlock(_) => bytecblocks.push(id),
            Opcode::Label(name) => {
                labels.insert(name.clone(), id);
            }
            Opcode::Callsub(target) => {
                let at = *callsub_index.entry(target.clone()).or_insert_with(|| {
                    subroutine_callsubs.push((target.clone(), Vec::new()));
                    subroutine_callsubs.len() - 1
                });
                subroutine_callsubs[at].1.push(id);
            }
            _ => {}
        }

        if let Some(prev_id) = prev {
            instructions[prev_id.0].next.push(id);
            ins.prev.push(prev_id);
        }
        // unconditional jumps and exits do not fall through
        prev = match ins.op() {
            Opcode::B(_) | Opcode::Err | Opcode::Return | Opcode::Retsub => None,
            _ => Some(id),
        };

        instructions.push(ins);
    }

    if instructions.is_empty() {
        return Err(ParseError {
            line: 0,
            reason: "no instructions".to_string(),
        });
    }
    Ok((intcblocks, bytecblocks))
}

fn annotate_instruction(ins: &mut Instruction) {
    let annotation = match ins.op() {
        Opcode::Txn(TransactionField::ApplicationID) => {
            Some("ApplicationID is 0 in Creation Txn".to_string())
        }
        Opcode::Method(signature) => {
            // quotes are not removed while parsing; the selector is
            // derived from the signature as stored
            let selector = teal_asm::method_selector(signature);
            let hex: String = selector.iter().map(|b| format!("{b:02x}")).collect();
            Some(format!("method-selector: 0x{hex}"))
        }
        _ => None,
    };
    if let Some(annotation) = annotation {
        ins.annotations.push(annotation);
    }
}

/// Second pass: add jump edges from branching instructions to their
/// label targets.
fn second_pass(
    instructions: &mut [Instruction],
    labels: &HashMap<String, InsId>,
) -> Result<(), ParseError> {
    let mut edges: Vec<(InsId, InsId)> = Vec::new();
    for (i, ins) in instructions.iter().enumerate() {
        let targets: Vec<&String> = match ins.op() {
            Opcode::B(l) | Opcode::Bz(l) | Opcode::Bnz(l) => vec![l],
            Opcode::Switch(ls) | Opcode::Match(ls) => ls.iter().collect(),
            _ => continue,
        };
        for label in targets {
            let target = labels.get(label).ok_or_else(|| ParseError {
                line: ins.line() - 1,
                reason: format!("undefined label: {label}"),
            })?;
            edges.push((InsId(i), *target));
        }
    }
    for (from, to) in edges {
        instructions[from.0].next.push(to);
        instructions[to.0].prev.push(from);
    }
    Ok(())
}

/// Third pass: construct basic blocks and add default edges between
/// them.
fn create_blocks(instructions: &mut [Instruction]) -> Vec<BasicBlock> {
    let mut blocks = vec![BasicBlock::new()];
    let mut cur = 0usize;
    let last = instructions.len() - 1;

    for i in 0..instructions.len() {
        // a label is a jump destination, so it starts a fresh block
        // unless the current one is still empty
        if matches!(instructions[i].op(), Opcode::Label(_)) && !blocks[cur].instructions.is_empty()
        {
            let next = new_block(&mut blocks);
            link_default(&mut blocks, cur, next);
            cur = next;
        }

        blocks[cur].instructions.push(InsId(i));
        instructions[i].block = Some(BlockId(cur));

        let is_callsub = matches!(instructions[i].op(), Opcode::Callsub(_));
        let is_jump = matches!(instructions[i].op(), Opcode::B(_));
        if instructions[i].next.len() > 1 || is_callsub {
            // never create an empty trailing block
            if i == last {
                continue;
            }
            let next = new_block(&mut blocks);
            link_default(&mut blocks, cur, next);
            cur = next;
        } else if instructions[i].next.is_empty() || is_jump {
            if i == last {
                continue;
            }
            // no default edge; pass 4 supplies any onward reachability
            let next = new_block(&mut blocks);
            cur = next;
        }
    }
    blocks
}

fn new_block(blocks: &mut Vec<BasicBlock>) -> usize {
    blocks.push(BasicBlock::new());
    blocks.len() - 1
}

fn link_default(blocks: &mut [BasicBlock], from: usize, to: usize) {
    blocks[from].default_next.push(BlockId(to));
    blocks[to].default_prev.push(BlockId(from));
}

/// Fourth pass: add jump edges between basic blocks, derived from the
/// jump successors of each exit instruction.
fn fourth_pass(instructions: &mut [Instruction], blocks: &mut [BasicBlock]) {
    for b in 0..blocks.len() {
        let exit = *blocks[b]
            .instructions
            .last()
            .expect("basic blocks are never empty");
        let nexts: Vec<InsId> = instructions[exit.0].next.clone();
        for next_ins in nexts {
            let next_block = instructions[next_ins.0]
                .block
                .expect("every instruction belongs to a block");
            if !blocks[b].has_successor(next_block) {
                blocks[b].jump_next.push(next_block);
                blocks[next_block.0].jump_prev.push(BlockId(b));
            }
        }
    }
}

/// Sort blocks by the source line of their entry instruction and
/// assign the stable index `0, 1, 2, ...`.
fn sort_blocks(instructions: &mut [Instruction], blocks: &mut Vec<BasicBlock>) {
    let mut order: Vec<usize> = (0..blocks.len()).collect();
    order.sort_by_key(|&b| instructions[blocks[b].instructions[0].0].line());

    let mut remap = vec![0usize; blocks.len()];
    for (new, &old) in order.iter().enumerate() {
        remap[old] = new;
    }

    let mut drained: Vec<Option<BasicBlock>> = mem::take(blocks).into_iter().map(Some).collect();
    *blocks = order
        .iter()
        .map(|&old| drained[old].take().expect("each block is moved once"))
        .collect();

    for (i, block) in blocks.iter_mut().enumerate() {
        block.idx = i;
        for edge in block
            .default_next
            .iter_mut()
            .chain(block.default_prev.iter_mut())
            .chain(block.jump_next.iter_mut())
            .chain(block.jump_prev.iter_mut())
        {
            *edge = BlockId(remap[edge.0]);
        }
    }
    for ins in instructions.iter_mut() {
        ins.block = ins.block.map(|b| BlockId(remap[b.0]));
    }
}

/// The first instruction restricted to a single mode decides the
/// program mode.
fn detect_contract_type(instructions: &[Instruction]) -> ContractType {
    instructions
        .iter()
        .map(|ins| ins.op().mode())
        .find(|mode| *mode != ContractType::Any)
        .unwrap_or(ContractType::Any)
}

/// Check instruction and field versions against the program version
/// and detect mode conflicts. Non-fatal; diagnostics are collected and
/// logged.
fn verify_version_and_mode(
    instructions: &[Instruction],
    program_version: u64,
) -> Vec<ValidationDiagnostic> {
    let mut diagnostics = Vec::new();
    let mut stateless: Vec<(usize, String)> = Vec::new();
    let mut stateful: Vec<(usize, String)> = Vec::new();

    for ins in instructions {
        if program_version < ins.op().version() {
            diagnostics.push(ValidationDiagnostic::InstructionVersion {
                line: ins.line(),
                instruction: ins.op().to_string(),
                required: ins.op().version(),
                program: program_version,
            });
        } else if let Some((field, required)) = ins.op().field_version() {
            if program_version < required {
                diagnostics.push(ValidationDiagnostic::FieldVersion {
                    line: ins.line(),
                    instruction: ins.op().to_string(),
                    field,
                    required,
                    program: program_version,
                });
            }
        }
        match ins.op().mode() {
            ContractType::Stateless => stateless.push((ins.line(), ins.op().to_string())),
            ContractType::Stateful => stateful.push((ins.line(), ins.op().to_string())),
            ContractType::Any => {}
        }
    }

    if !stateless.is_empty() && !stateful.is_empty() {
        diagnostics.push(ValidationDiagnostic::ModeConflict {
            stateless,
            stateful,
        });
    }

    for diagnostic in &diagnostics {
        tracing::warn!("{diagnostic}");
    }
    diagnostics
}

/// Collect the blocks of each called subroutine and assign every block
/// an owner, defaulting to the synthetic `__main__` subroutine.
fn discover_subroutines(
    instructions: &mut [Instruction],
    blocks: &mut [BasicBlock],
    labels: &HashMap<String, InsId>,
    subroutine_callsubs: Vec<(String, Vec<InsId>)>,
) -> Result<(Vec<Subroutine>, BTreeMap<String, SubroutineId>, SubroutineId), ParseError> {
    let mut subroutines: Vec<Subroutine> = Vec::new();
    let mut subroutine_ids: BTreeMap<String, SubroutineId> = BTreeMap::new();

    for (name, callsubs) in subroutine_callsubs {
        let label_ins = labels.get(&name).ok_or_else(|| ParseError {
            line: instructions[callsubs[0].0].line() - 1,
            reason: format!("callsub to undefined label: {name}"),
        })?;
        let entry = instructions[label_ins.0]
            .block
            .expect("every instruction belongs to a block");
        let id = SubroutineId(subroutines.len());

        blocks[entry.0].annotations.push(format!("Subroutine {name}"));
        let sub_blocks = reachable_blocks(blocks, entry);
        for block in &sub_blocks {
            blocks[block.0].subroutine = Some(id);
        }
        let caller_blocks: Vec<BlockId> = callsubs
            .iter()
            .map(|c| {
                instructions[c.0]
                    .block
                    .expect("every instruction belongs to a block")
            })
            .collect();
        for callsub in &callsubs {
            instructions[callsub.0].called_subroutine = Some(id);
        }

        debug!(subroutine = %name, blocks = sub_blocks.len(), "subroutine discovered");
        subroutines.push(Subroutine::new(name.clone(), entry, sub_blocks, caller_blocks));
        subroutine_ids.insert(name, id);
    }

    let main_id = SubroutineId(subroutines.len());
    let main_blocks = reachable_blocks(blocks, BlockId(0));
    for block in &main_blocks {
        blocks[block.0].subroutine = Some(main_id);
    }
    subroutines.push(Subroutine::new(
        MAIN_SUBROUTINE,
        BlockId(0),
        main_blocks,
        Vec::new(),
    ));
    // unreachable blocks are not part of any subroutine; own them with
    // the main program
    for block in blocks.iter_mut() {
        if block.subroutine.is_none() {
            block.subroutine = Some(main_id);
        }
    }

    Ok((subroutines, subroutine_ids, main_id))
}

/// Depth-first reachability over successor edges. The walk does not
/// stop at `retsub` exits.
fn reachable_blocks(blocks: &[BasicBlock], entry: BlockId) -> Vec<BlockId> {
    let mut result: Vec<BlockId> = Vec::new();
    let mut seen = vec![false; blocks.len()];
    let mut stack = vec![entry];
    seen[entry.0] = true;

    while let Some(block) = stack.pop() {
        result.push(block);
        for next in blocks[block.0].successors() {
            if !seen[next.0] {
                seen[next.0] = true;
                stack.push(next);
            }
        }
    }
    result
}

/// Publish the constant pools when exactly one declaring instruction
/// exists and it sits in the program entry block.
fn resolve_constant_pools(
    instructions: &[Instruction],
    intcblocks: &[InsId],
    bytecblocks: &[InsId],
) -> (Option<Vec<u64>>, Option<Vec<String>>) {
    let entry = BlockId(0);
    let int_constants = match intcblocks {
        [only] if instructions[only.0].block == Some(entry) => {
            match instructions[only.0].op() {
                Opcode::IntcBlock(constants) => Some(constants.clone()),
                _ => None,
            }
        }
        _ => None,
    };
    let byte_constants = match bytecblocks {
        [only] if instructions[only.0].block == Some(entry) => {
            match instructions[only.0].op() {
                Opcode::BytecBlock(constants) => Some(constants.clone()),
                _ => None,
            }
        }
        _ => None,
    };
    (int_constants, byte_constants)
}
