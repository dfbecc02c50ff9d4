//! Printers: consumers that render the parsed program into files.

use std::path::Path;

use crate::error::TealError;
use crate::output;
use crate::program::Teal;

/// A printer run over a parsed program, writing into a destination
/// directory.
pub trait AbstractPrinter: std::fmt::Debug {
    /// Registry name of the printer.
    fn name(&self) -> &'static str;
    /// Render the program into `dest`.
    fn print(&self, teal: &Teal, dest: &Path) -> Result<(), TealError>;
}

/// Writes the CFG of the program in dot format.
#[derive(Debug)]
pub struct CfgPrinter;

impl AbstractPrinter for CfgPrinter {
    fn name(&self) -> &'static str {
        "cfg"
    }

    fn print(&self, teal: &Teal, dest: &Path) -> Result<(), TealError> {
        let filename = if teal.contract_name().is_empty() {
            "cfg.dot".to_string()
        } else {
            format!("{}_cfg.dot", teal.contract_name())
        };
        output::cfg_to_dot(teal, &dest.join(filename))
    }
}

/// Every printer shipped with the analyzer.
pub fn all_printers() -> Vec<Box<dyn AbstractPrinter>> {
    vec![Box::new(CfgPrinter)]
}

/// Resolve printers by registry name.
pub fn printers_by_name(names: &[&str]) -> Result<Vec<Box<dyn AbstractPrinter>>, TealError> {
    names
        .iter()
        .map(|name| {
            all_printers()
                .into_iter()
                .find(|p| p.name() == *name)
                .ok_or_else(|| TealError::UnknownPrinter((*name).to_string()))
        })
        .collect()
}
