//! Vulnerability detectors and the traversal they share.
//!
//! Detectors are polymorphic consumers over the parsed program: each
//! reports a description and the execution paths exhibiting the
//! finding. A path is a sequence of block indices; a block id repeats
//! when a subroutine is called more than once.

mod can_delete;
mod can_update;

use std::collections::HashSet;

use serde::Serialize;
use teal_asm::Opcode;

use crate::basic_block::BlockId;
use crate::error::TealError;
use crate::program::Teal;

pub use can_delete::CanDelete;
pub use can_update::CanUpdate;

/// A vulnerability detector run over a parsed program.
pub trait AbstractDetector: std::fmt::Debug {
    /// Registry name of the detector.
    fn name(&self) -> &'static str;
    /// One-line description of what the detector reports.
    fn description(&self) -> &'static str;
    /// Run the detector.
    fn detect(&self, teal: &Teal) -> DetectorReport;
}

/// Findings of one detector run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectorReport {
    /// Registry name of the detector.
    pub check: String,
    /// Description of the finding.
    pub description: String,
    /// Vulnerable execution paths as sequences of block indices.
    pub paths: Vec<Vec<usize>>,
}

/// Every detector shipped with the analyzer.
pub fn all_detectors() -> Vec<Box<dyn AbstractDetector>> {
    vec![Box::new(CanUpdate), Box::new(CanDelete)]
}

/// Resolve detectors by registry name.
pub fn detectors_by_name(names: &[&str]) -> Result<Vec<Box<dyn AbstractDetector>>, TealError> {
    names
        .iter()
        .map(|name| {
            all_detectors()
                .into_iter()
                .find(|d| d.name() == *name)
                .ok_or_else(|| TealError::UnknownDetector((*name).to_string()))
        })
        .collect()
}

/// Walk every execution path from the program entry, descending into
/// called subroutines and returning to the call site on `retsub`, and
/// collect the paths that reach a vulnerable leaf through allowed
/// blocks only.
///
/// A block may appear several times in one path when the subroutine
/// containing it is called more than once; only exact revisits (same
/// block under the same call stack) are pruned.
pub fn collect_vulnerable_paths(
    teal: &Teal,
    allow: &dyn Fn(&Teal, BlockId) -> bool,
    vulnerable_leaf: &dyn Fn(&Teal, BlockId) -> bool,
) -> Vec<Vec<usize>> {
    let mut paths = Vec::new();
    let mut path = Vec::new();
    let mut on_path = HashSet::new();
    explore(
        teal,
        BlockId(0),
        &mut Vec::new(),
        &mut path,
        &mut on_path,
        allow,
        vulnerable_leaf,
        &mut paths,
    );
    paths
}

type PathKey = (usize, Vec<Option<usize>>);

#[allow(clippy::too_many_arguments)]
fn explore(
    teal: &Teal,
    block_id: BlockId,
    calls: &mut Vec<Option<BlockId>>,
    path: &mut Vec<usize>,
    on_path: &mut HashSet<PathKey>,
    allow: &dyn Fn(&Teal, BlockId) -> bool,
    vulnerable_leaf: &dyn Fn(&Teal, BlockId) -> bool,
    paths: &mut Vec<Vec<usize>>,
) {
    if !allow(teal, block_id) {
        return;
    }
    let key: PathKey = (
        block_id.index(),
        calls.iter().map(|c| c.map(BlockId::index)).collect(),
    );
    if !on_path.insert(key.clone()) {
        return;
    }
    path.push(block_id.index());

    let block = teal.block(block_id);
    let exit = teal.ins(block.exit());
    match exit.op() {
        Opcode::Callsub(_) => {
            if let Some(subroutine) = exit.called_subroutine() {
                let return_point = block.default_successors().first().copied();
                calls.push(return_point);
                explore(
                    teal,
                    teal.subroutine(subroutine).entry(),
                    calls,
                    path,
                    on_path,
                    allow,
                    vulnerable_leaf,
                    paths,
                );
                calls.pop();
            }
        }
        Opcode::Retsub => {
            if let Some(return_point) = calls.pop() {
                if let Some(return_point) = return_point {
                    explore(
                        teal,
                        return_point,
                        calls,
                        path,
                        on_path,
                        allow,
                        vulnerable_leaf,
                        paths,
                    );
                }
                calls.push(return_point);
            }
        }
        _ => {
            let successors: Vec<BlockId> = block.successors().collect();
            if successors.is_empty() {
                if vulnerable_leaf(teal, block_id) {
                    paths.push(path.clone());
                }
            } else {
                for successor in successors {
                    explore(
                        teal,
                        successor,
                        calls,
                        path,
                        on_path,
                        allow,
                        vulnerable_leaf,
                        paths,
                    );
                }
            }
        }
    }

    path.pop();
    on_path.remove(&key);
}

/// Whether a leaf block approves the transaction: it exits through
/// `return` and is not the explicit `int 0; return` rejection.
pub(crate) fn returns_approval(teal: &Teal, block_id: BlockId) -> bool {
    let block = teal.block(block_id);
    if !matches!(teal.ins(block.exit()).op(), Opcode::Return) {
        return false;
    }
    let instructions = block.instructions();
    if instructions.len() < 2 {
        return true;
    }
    let before_exit = teal.ins(instructions[instructions.len() - 2]).op();
    !matches!(before_exit, Opcode::Int(0) | Opcode::PushInt(0))
}
