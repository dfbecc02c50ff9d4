//! Static analyzer for TEAL smart contracts.
//!
//! The analyzer parses a program into its control-flow graph,
//! discovers subroutines, validates instruction and field versions
//! against the program version, resolves the constant pools when
//! unambiguous, lifts each basic block into a symbolic stack model and
//! runs a family of transaction-context dataflow analyses. Detectors
//! and printers consume the resulting [`program::Teal`] object.
//!
//! ```
//! use teal_analysis::prelude::*;
//!
//! let teal = parse_teal("#pragma version 7\nint 1\nreturn", "approval").unwrap();
//! assert_eq!(teal.version(), 7);
//! for report in teal.blocks().iter().map(|b| b.context()) {
//!     assert!(report.group_indices().is_some());
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(unused_must_use)]

pub mod basic_block;
pub mod dataflow;
pub mod detectors;
pub mod error;
pub mod instruction;
pub mod output;
pub mod parser;
pub mod printers;
pub mod program;
pub mod stack_ast;
pub mod subroutine;

#[doc(no_inline)]
pub use teal_asm;

pub mod prelude {
    //! Re-exports of the types most consumers need.
    #[doc(no_inline)]
    pub use teal_asm::{
        ContractType, GlobalField, OnComplete, Opcode, TransactionField, TxType,
    };

    pub use crate::{
        basic_block::{BasicBlock, BlockId},
        dataflow::{AddressValue, FeeBound, TransactionContext, MAX_GROUP_SIZE},
        detectors::{
            all_detectors, collect_vulnerable_paths, detectors_by_name, AbstractDetector,
            CanDelete, CanUpdate, DetectorReport,
        },
        error::{ParseError, TealError, ValidationDiagnostic},
        instruction::{InsId, Instruction},
        output::{cfg_to_dot, render_dot, AnalysisReport},
        parser::parse_teal,
        printers::{all_printers, printers_by_name, AbstractPrinter, CfgPrinter},
        program::Teal,
        stack_ast::{BlockStackModel, StackModelCache, StackValue},
        subroutine::{Subroutine, SubroutineId, MAIN_SUBROUTINE},
    };
}
