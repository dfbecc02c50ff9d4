//! Atomic types of the TEAL instruction set.
//!
//! This crate holds the data model shared by every consumer of TEAL
//! assembly text: the [`Opcode`] representation with one variant per
//! opcode, the transaction-field families, per-opcode and per-field
//! minimum versions and execution-mode restrictions, the single-line
//! text parser and the ARC-4 method-selector derivation.

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(unused_must_use)]

mod field;
mod opcode;
mod parser;
mod selector;

pub use field::{
    AcctParamsField, AppParamsField, AssetHoldingField, AssetParamsField, GlobalField, OnComplete,
    TransactionField, TxType,
};
pub use opcode::{ContractType, Opcode};
pub use parser::{parse_int, parse_line, parse_transaction_field, ParseError};
pub use selector::method_selector;
