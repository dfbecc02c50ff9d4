//! Symbolic reconstruction of the stack effect of a basic block.
//!
//! Each block is lifted into a forest of value expressions: what the
//! block consumes from the stack it entered with, what it leaves
//! behind, the facts it asserts and the expression its exit branches
//! on. Values the analyzer cannot name (scratch slots, frame slots,
//! multi-word results) collapse to [`StackValue::Unknown`].
//!
//! Models are memoized per block; the cache is cleared once dataflow
//! completes since the entry-argument equations are large and unused
//! afterwards.

use std::collections::HashMap;
use std::rc::Rc;

use teal_asm::Opcode;

use crate::basic_block::BlockId;
use crate::instruction::InsId;
use crate::program::Teal;

/// Symbolic value of one stack slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackValue {
    /// The i-th value from the top of the stack at block entry.
    Arg(usize),
    /// An integer constant.
    Int(u64),
    /// A byte constant, stored in its source spelling.
    Bytes(String),
    /// A value the analyzer does not track.
    Unknown,
    /// Application of an opcode to operand values.
    Op {
        /// The instruction producing the value.
        ins: InsId,
        /// Operand expressions in push order.
        operands: Vec<StackValue>,
    },
}

impl StackValue {
    /// Whether the expression references the entry stack.
    pub fn has_entry_refs(&self) -> bool {
        match self {
            StackValue::Arg(_) => true,
            StackValue::Op { operands, .. } => operands.iter().any(StackValue::has_entry_refs),
            _ => false,
        }
    }
}

/// Stack effect of one basic block.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStackModel {
    /// Number of entry-stack values the block reads.
    pub consumed: usize,
    /// Values left on the stack at exit, bottom first.
    pub outputs: Vec<StackValue>,
    /// Expressions consumed by `assert` instructions in the block.
    pub asserts: Vec<StackValue>,
    /// Expression the exit `bz`/`bnz`/`switch` branches on.
    pub branch: Option<StackValue>,
    /// Expression consumed by an exit `return`.
    pub exit_value: Option<StackValue>,
}

/// Per-program memoization of block stack models and entry-argument
/// equations.
#[derive(Debug, Default)]
pub struct StackModelCache {
    models: HashMap<BlockId, Rc<BlockStackModel>>,
    equations: HashMap<(BlockId, usize), Option<StackValue>>,
}

/// Recursion limit when chasing entry arguments through predecessors.
const EQUATION_DEPTH: usize = 8;

impl StackModelCache {
    /// The memoized stack model of a block.
    pub fn model(&mut self, teal: &Teal, block: BlockId) -> Rc<BlockStackModel> {
        if let Some(model) = self.models.get(&block) {
            return Rc::clone(model);
        }
        let model = Rc::new(build_model(teal, block));
        self.models.insert(block, Rc::clone(&model));
        model
    }

    /// Resolve the expression a block's i-th entry value was produced
    /// by, chasing through single-predecessor chains.
    ///
    /// Returns `None` when the producer is ambiguous (several
    /// predecessors), out of reach, or itself tied to an entry stack.
    pub fn resolve_entry_arg(
        &mut self,
        teal: &Teal,
        block: BlockId,
        arg: usize,
    ) -> Option<StackValue> {
        self.resolve_at_depth(teal, block, arg, EQUATION_DEPTH)
    }

    fn resolve_at_depth(
        &mut self,
        teal: &Teal,
        block: BlockId,
        arg: usize,
        depth: usize,
    ) -> Option<StackValue> {
        if depth == 0 {
            return None;
        }
        if let Some(resolved) = self.equations.get(&(block, arg)) {
            return resolved.clone();
        }
        let preds: Vec<BlockId> = teal.block(block).predecessors().collect();
        let resolved = match preds.as_slice() {
            [pred] if *pred != block => {
                let model = self.model(teal, *pred);
                let outputs = model.outputs.len();
                if arg < outputs {
                    let value = model.outputs[outputs - 1 - arg].clone();
                    // values tied to the predecessor's own entry stack
                    // are meaningless here
                    (!value.has_entry_refs()).then_some(value)
                } else {
                    let deeper = arg - outputs + model.consumed;
                    self.resolve_at_depth(teal, *pred, deeper, depth - 1)
                }
            }
            _ => None,
        };
        self.equations.insert((block, arg), resolved.clone());
        resolved
    }

    /// Drop every memoized model and equation.
    pub fn clear(&mut self) {
        self.models.clear();
        self.equations.clear();
    }
}

fn pop(stack: &mut Vec<StackValue>, consumed: &mut usize) -> StackValue {
    stack.pop().unwrap_or_else(|| {
        let value = StackValue::Arg(*consumed);
        *consumed += 1;
        value
    })
}

/// Extend the represented stack downwards until it holds `depth`
/// values, borrowing from the entry stack.
fn ensure_depth(stack: &mut Vec<StackValue>, consumed: &mut usize, depth: usize) {
    while stack.len() < depth {
        stack.insert(0, StackValue::Arg(*consumed));
        *consumed += 1;
    }
}

fn build_model(teal: &Teal, block: BlockId) -> BlockStackModel {
    let mut stack: Vec<StackValue> = Vec::new();
    let mut consumed = 0usize;
    let mut asserts = Vec::new();
    let mut branch = None;
    let mut exit_value = None;

    for &ins_id in teal.block(block).instructions() {
        let op = teal.ins(ins_id).op();
        match op {
            Opcode::Int(n) | Opcode::PushInt(n) => stack.push(StackValue::Int(*n)),
            Opcode::Byte(b) | Opcode::PushBytes(b) | Opcode::Addr(b) | Opcode::Method(b) => {
                stack.push(StackValue::Bytes(b.clone()))
            }
            Opcode::Intc(n) => stack.push(int_constant(teal, *n as usize)),
            Opcode::Intc0 => stack.push(int_constant(teal, 0)),
            Opcode::Intc1 => stack.push(int_constant(teal, 1)),
            Opcode::Intc2 => stack.push(int_constant(teal, 2)),
            Opcode::Intc3 => stack.push(int_constant(teal, 3)),
            Opcode::Bytec(n) => stack.push(byte_constant(teal, *n as usize)),
            Opcode::Bytec0 => stack.push(byte_constant(teal, 0)),
            Opcode::Bytec1 => stack.push(byte_constant(teal, 1)),
            Opcode::Bytec2 => stack.push(byte_constant(teal, 2)),
            Opcode::Bytec3 => stack.push(byte_constant(teal, 3)),
            Opcode::Pop => {
                pop(&mut stack, &mut consumed);
            }
            Opcode::Dup => {
                let value = pop(&mut stack, &mut consumed);
                stack.push(value.clone());
                stack.push(value);
            }
            Opcode::Dup2 => {
                let b = pop(&mut stack, &mut consumed);
                let a = pop(&mut stack, &mut consumed);
                stack.push(a.clone());
                stack.push(b.clone());
                stack.push(a);
                stack.push(b);
            }
            Opcode::Swap => {
                let b = pop(&mut stack, &mut consumed);
                let a = pop(&mut stack, &mut consumed);
                stack.push(b);
                stack.push(a);
            }
            Opcode::Dig(n) => {
                let n = *n as usize;
                let value = if stack.len() > n {
                    stack[stack.len() - 1 - n].clone()
                } else {
                    StackValue::Arg(consumed + n - stack.len())
                };
                stack.push(value);
            }
            Opcode::Cover(n) => {
                let n = *n as usize;
                let value = pop(&mut stack, &mut consumed);
                ensure_depth(&mut stack, &mut consumed, n);
                let at = stack.len() - n;
                stack.insert(at, value);
            }
            Opcode::Uncover(n) => {
                let n = *n as usize;
                ensure_depth(&mut stack, &mut consumed, n + 1);
                let value = stack.remove(stack.len() - 1 - n);
                stack.push(value);
            }
            Opcode::Select => {
                for _ in 0..3 {
                    pop(&mut stack, &mut consumed);
                }
                stack.push(StackValue::Unknown);
            }
            Opcode::FrameDig(_) => stack.push(StackValue::Unknown),
            Opcode::Assert => {
                let fact = pop(&mut stack, &mut consumed);
                asserts.push(fact);
            }
            Opcode::Return => {
                exit_value = Some(pop(&mut stack, &mut consumed));
            }
            Opcode::Bz(_) | Opcode::Bnz(_) | Opcode::Switch(_) => {
                branch = Some(pop(&mut stack, &mut consumed));
            }
            _ => {
                let (pops, pushes) = op.stack_arity();
                let mut operands: Vec<StackValue> =
                    (0..pops).map(|_| pop(&mut stack, &mut consumed)).collect();
                operands.reverse();
                if pushes == 1 {
                    stack.push(StackValue::Op {
                        ins: ins_id,
                        operands,
                    });
                } else {
                    for _ in 0..pushes {
                        stack.push(StackValue::Unknown);
                    }
                }
            }
        }
    }

    BlockStackModel {
        consumed,
        outputs: stack,
        asserts,
        branch,
        exit_value,
    }
}

fn int_constant(teal: &Teal, index: usize) -> StackValue {
    match teal.int_constants().and_then(|pool| pool.get(index)) {
        Some(value) => StackValue::Int(*value),
        None => StackValue::Unknown,
    }
}

fn byte_constant(teal: &Teal, index: usize) -> StackValue {
    match teal.byte_constants().and_then(|pool| pool.get(index)) {
        Some(value) => StackValue::Bytes(value.clone()),
        None => StackValue::Unknown,
    }
}
