//! The parsed program and its consumer surface.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use teal_asm::ContractType;

use crate::basic_block::{BasicBlock, BlockId};
use crate::dataflow;
use crate::detectors::{AbstractDetector, DetectorReport};
use crate::error::{TealError, ValidationDiagnostic};
use crate::instruction::{InsId, Instruction};
use crate::output;
use crate::printers::AbstractPrinter;
use crate::subroutine::{Subroutine, SubroutineId};

/// A parsed TEAL program.
///
/// Owns every instruction, basic block and subroutine; all
/// cross-references between them are indices into this arena. The
/// structure is immutable once [`crate::parser::parse_teal`] returns,
/// apart from detector and printer registration.
#[derive(Debug)]
pub struct Teal {
    pub(crate) version: u64,
    pub(crate) mode: ContractType,
    pub(crate) contract_name: String,
    pub(crate) instructions: Vec<Instruction>,
    pub(crate) blocks: Vec<BasicBlock>,
    pub(crate) main: SubroutineId,
    pub(crate) subroutines: Vec<Subroutine>,
    pub(crate) subroutine_ids: BTreeMap<String, SubroutineId>,
    pub(crate) labels: HashMap<String, InsId>,
    pub(crate) int_constants: Option<Vec<u64>>,
    pub(crate) byte_constants: Option<Vec<String>>,
    pub(crate) diagnostics: Vec<ValidationDiagnostic>,
    pub(crate) detectors: Vec<Box<dyn AbstractDetector>>,
    pub(crate) printers: Vec<Box<dyn AbstractPrinter>>,
}

impl Teal {
    /// Declared program version, 1 when no leading pragma is present.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Execution mode the program is inferred to run in.
    pub fn mode(&self) -> ContractType {
        self.mode
    }

    /// Name the caller supplied for the contract.
    pub fn contract_name(&self) -> &str {
        &self.contract_name
    }

    /// The instruction behind an id.
    pub fn ins(&self, id: InsId) -> &Instruction {
        &self.instructions[id.0]
    }

    /// All instructions in source order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// The basic block behind an id.
    pub fn block(&self, id: BlockId) -> &BasicBlock {
        &self.blocks[id.0]
    }

    pub(crate) fn block_mut(&mut self, id: BlockId) -> &mut BasicBlock {
        &mut self.blocks[id.0]
    }

    /// All basic blocks in index order.
    pub fn blocks(&self) -> &[BasicBlock] {
        &self.blocks
    }

    /// Ids of all basic blocks in index order.
    pub fn block_ids(&self) -> impl Iterator<Item = BlockId> {
        (0..self.blocks.len()).map(BlockId)
    }

    /// The subroutine behind an id.
    pub fn subroutine(&self, id: SubroutineId) -> &Subroutine {
        &self.subroutines[id.0]
    }

    /// Every subroutine, the synthetic `__main__` included.
    pub fn subroutines(&self) -> &[Subroutine] {
        &self.subroutines
    }

    /// The synthetic `__main__` subroutine.
    pub fn main(&self) -> &Subroutine {
        &self.subroutines[self.main.0]
    }

    /// Id of the synthetic `__main__` subroutine.
    pub fn main_id(&self) -> SubroutineId {
        self.main
    }

    /// Look up a discovered subroutine by its label name.
    pub fn subroutine_by_name(&self, name: &str) -> Option<&Subroutine> {
        self.subroutine_ids.get(name).map(|id| self.subroutine(*id))
    }

    /// The label instruction a name resolves to.
    pub fn label(&self, name: &str) -> Option<InsId> {
        self.labels.get(name).copied()
    }

    /// The resolved integer constant pool, when unambiguous.
    pub fn int_constants(&self) -> Option<&[u64]> {
        self.int_constants.as_deref()
    }

    /// The resolved byte constant pool, when unambiguous.
    pub fn byte_constants(&self) -> Option<&[String]> {
        self.byte_constants.as_deref()
    }

    /// Non-fatal findings of the version and mode validation.
    pub fn diagnostics(&self) -> &[ValidationDiagnostic] {
        &self.diagnostics
    }

    /// Re-run every transaction-context analysis, overwriting the
    /// per-block records.
    pub fn run_transaction_context_analysis(&mut self) {
        dataflow::apply_transaction_context_analysis(self);
    }

    /// Register a detector to run over the program.
    pub fn register_detector(&mut self, detector: Box<dyn AbstractDetector>) {
        self.detectors.push(detector);
    }

    /// Run every registered detector.
    pub fn run_detectors(&self) -> Vec<DetectorReport> {
        self.detectors.iter().map(|d| d.detect(self)).collect()
    }

    /// Register a printer to run over the program.
    pub fn register_printer(&mut self, printer: Box<dyn AbstractPrinter>) {
        self.printers.push(printer);
    }

    /// Run every registered printer, writing into `dest`.
    pub fn run_printers(&self, dest: &Path) -> Result<(), TealError> {
        for printer in &self.printers {
            printer.print(self, dest)?;
        }
        Ok(())
    }

    /// Export the CFG in dot format to the given file path.
    pub fn export_cfg(&self, path: &Path) -> Result<(), TealError> {
        output::cfg_to_dot(self, path)
    }
}
