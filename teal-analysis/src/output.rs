//! Output artifacts: dot export of the CFG and the JSON report.

use std::fs;
use std::path::Path;

use itertools::Itertools;
use serde::Serialize;

use crate::detectors::DetectorReport;
use crate::error::TealError;
use crate::program::Teal;

/// Render the CFG in dot format: one node per block labeled with its
/// index, cost and instructions, one edge per block link.
pub fn render_dot(teal: &Teal) -> String {
    let mut dot = String::from("digraph g {\n");
    for block in teal.blocks() {
        let instructions = block
            .instructions()
            .iter()
            .map(|id| {
                let ins = teal.ins(*id);
                escape(&format!("{}: {}", ins.line(), ins.op()))
            })
            .join("\\l");
        dot.push_str(&format!(
            "{} [label=\"block {}; cost = {}\\l{}\\l\" shape=box]\n",
            block.idx(),
            block.idx(),
            block.cost(),
            instructions,
        ));
        for successor in block.successors() {
            dot.push_str(&format!("{} -> {}\n", block.idx(), successor.index()));
        }
    }
    dot.push_str("}\n");
    dot
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Write the dot export of the CFG to the given file path.
pub fn cfg_to_dot(teal: &Teal, path: &Path) -> Result<(), TealError> {
    fs::write(path, render_dot(teal))?;
    Ok(())
}

/// Top-level shape of the JSON report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    /// Whether the analysis ran to completion.
    pub success: bool,
    /// The error aborting the analysis, if any.
    pub error: Option<String>,
    /// Findings of every detector that ran.
    pub result: Vec<DetectorReport>,
}

impl AnalysisReport {
    /// Report of a completed run.
    pub fn completed(result: Vec<DetectorReport>) -> Self {
        AnalysisReport {
            success: true,
            error: None,
            result,
        }
    }

    /// Report of a run aborted by a user-facing error.
    pub fn failed(error: impl Into<String>) -> Self {
        AnalysisReport {
            success: false,
            error: Some(error.into()),
            result: Vec::new(),
        }
    }

    /// Serialize the report to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, TealError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
