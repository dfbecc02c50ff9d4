//! Error and diagnostic types of the analyzer.

use core::fmt;

/// Fatal failure to parse the source text.
///
/// Carries the 0-based index of the offending line. No program is
/// produced when parsing fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("parse error at line {line}: {reason}")]
pub struct ParseError {
    /// 0-based index of the line that failed to parse.
    pub line: usize,
    /// Human-readable description of the failure.
    pub reason: String,
}

/// User-facing analyzer error.
#[derive(Debug, thiserror::Error)]
pub enum TealError {
    /// A detector was requested by a name no detector carries.
    #[error("{0} is not a detector")]
    UnknownDetector(String),
    /// A printer was requested by a name no printer carries.
    #[error("{0} is not a printer")]
    UnknownPrinter(String),
    /// Failure writing an output artifact.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// Failure serializing the analysis report.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Non-fatal finding of the version and mode validation.
///
/// Diagnostics are collected on the program and logged; parsing and
/// analysis continue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationDiagnostic {
    /// An instruction requires a newer program version.
    InstructionVersion {
        /// 1-based source line of the instruction.
        line: usize,
        /// Source spelling of the instruction.
        instruction: String,
        /// Version the instruction was introduced in.
        required: u64,
        /// Declared program version.
        program: u64,
    },
    /// A context field requires a newer program version.
    FieldVersion {
        /// 1-based source line of the instruction.
        line: usize,
        /// Source spelling of the instruction.
        instruction: String,
        /// Name of the field.
        field: String,
        /// Version the field was introduced in.
        required: u64,
        /// Declared program version.
        program: u64,
    },
    /// The program mixes signature-only and application-only
    /// instructions.
    ModeConflict {
        /// Lines and spellings of the signature-only instructions.
        stateless: Vec<(usize, String)>,
        /// Lines and spellings of the application-only instructions.
        stateful: Vec<(usize, String)>,
    },
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationDiagnostic::InstructionVersion {
                line,
                instruction,
                required,
                program,
            } => write!(
                f,
                "{line}: {instruction} instruction is not supported in Teal version {program}, \
                 it is supported from Teal version {required}"
            ),
            ValidationDiagnostic::FieldVersion {
                line,
                instruction,
                field,
                required,
                program,
            } => write!(
                f,
                "{line}: {instruction}, field {field} is not supported in Teal version \
                 {program}, it is supported from Teal version {required}"
            ),
            ValidationDiagnostic::ModeConflict {
                stateless,
                stateful,
            } => {
                writeln!(
                    f,
                    "program contains instructions specific to both Application and Signature Mode"
                )?;
                writeln!(f, "Instructions supported only in Signature Mode:")?;
                for (line, ins) in stateless {
                    writeln!(f, "\t{line}: {ins}")?;
                }
                writeln!(f, "Instructions supported only in Application Mode:")?;
                for (line, ins) in stateful {
                    writeln!(f, "\t{line}: {ins}")?;
                }
                Ok(())
            }
        }
    }
}
