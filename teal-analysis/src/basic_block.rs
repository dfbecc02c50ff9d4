//! Basic blocks of the control-flow graph.

use crate::dataflow::TransactionContext;
use crate::instruction::InsId;
use crate::subroutine::SubroutineId;

/// Index of a basic block in the program arena.
///
/// After parsing, blocks are sorted by the source line of their entry
/// instruction and this index equals [`BasicBlock::idx`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub(crate) usize);

impl BlockId {
    /// Position of the block in the program's block list.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A maximal straight-line sequence of instructions.
///
/// Only the entry instruction is a jump target and only the exit
/// instruction may branch, terminate, call or return. Default edges
/// represent fall-through, jump edges represent branch targets.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicBlock {
    pub(crate) idx: usize,
    pub(crate) instructions: Vec<InsId>,
    pub(crate) default_next: Vec<BlockId>,
    pub(crate) default_prev: Vec<BlockId>,
    pub(crate) jump_next: Vec<BlockId>,
    pub(crate) jump_prev: Vec<BlockId>,
    pub(crate) subroutine: Option<SubroutineId>,
    pub(crate) cost: u64,
    pub(crate) annotations: Vec<String>,
    pub(crate) context: TransactionContext,
}

impl BasicBlock {
    pub(crate) fn new() -> Self {
        BasicBlock {
            idx: usize::MAX,
            instructions: Vec::new(),
            default_next: Vec::new(),
            default_prev: Vec::new(),
            jump_next: Vec::new(),
            jump_prev: Vec::new(),
            subroutine: None,
            cost: 0,
            annotations: Vec::new(),
            context: TransactionContext::default(),
        }
    }

    pub(crate) fn has_successor(&self, block: BlockId) -> bool {
        self.default_next.contains(&block) || self.jump_next.contains(&block)
    }

    /// Stable index assigned by entry-line order.
    pub fn idx(&self) -> usize {
        self.idx
    }

    /// Instructions of the block, entry first, exit last.
    pub fn instructions(&self) -> &[InsId] {
        &self.instructions
    }

    /// The entry instruction.
    pub fn entry(&self) -> InsId {
        *self
            .instructions
            .first()
            .expect("basic blocks are never empty")
    }

    /// The exit instruction.
    pub fn exit(&self) -> InsId {
        *self
            .instructions
            .last()
            .expect("basic blocks are never empty")
    }

    /// Fall-through successors.
    pub fn default_successors(&self) -> &[BlockId] {
        &self.default_next
    }

    /// Branch-target successors.
    pub fn jump_successors(&self) -> &[BlockId] {
        &self.jump_next
    }

    /// All successors, default edges first.
    pub fn successors(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.default_next.iter().chain(&self.jump_next).copied()
    }

    /// All predecessors, default edges first.
    pub fn predecessors(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.default_prev.iter().chain(&self.jump_prev).copied()
    }

    /// Fall-through predecessors.
    pub fn default_predecessors(&self) -> &[BlockId] {
        &self.default_prev
    }

    /// Branch-source predecessors.
    pub fn jump_predecessors(&self) -> &[BlockId] {
        &self.jump_prev
    }

    /// The subroutine owning the block.
    ///
    /// Always present on a fully parsed program.
    pub fn subroutine(&self) -> Option<SubroutineId> {
        self.subroutine
    }

    /// Static execution-cost estimate, the sum over the instructions.
    pub fn cost(&self) -> u64 {
        self.cost
    }

    /// Notes attached during parsing and subroutine discovery.
    pub fn annotations(&self) -> &[String] {
        &self.annotations
    }

    /// Transaction-context constraints deduced by the dataflow
    /// analyses.
    pub fn context(&self) -> &TransactionContext {
        &self.context
    }
}
