//! Error types for translation and execution

use std::path::PathBuf;

use thiserror::Error;

/// A single malformed command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("'{command}' expects {expected} operand(s), found {found}")]
    OperandCount {
        command: String,
        expected: usize,
        found: usize,
    },

    #[error("unknown segment '{0}'")]
    UnknownSegment(String),

    #[error("segment '{0}' is not supported")]
    UnsupportedSegment(String),

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("offset {offset} out of range for segment '{segment}' (max {max})")]
    OffsetOutOfRange {
        segment: &'static str,
        offset: u16,
        max: u16,
    },

    #[error("count {count} too large (max {max})")]
    CountOutOfRange { count: u16, max: u16 },

    #[error("cannot pop into the constant segment")]
    PopConstant,

    #[error("invalid symbol '{0}'")]
    InvalidSymbol(String),
}

/// Failure of a translation run
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("{unit}:{line}: {source} (in '{text}')")]
    Parse {
        unit: String,
        line: usize,
        text: String,
        #[source]
        source: ParseError,
    },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no .vm files found in {}", .0.display())]
    NoSources(PathBuf),

    #[error("execution failed: {0}")]
    Execution(#[from] EmulatorError),
}

/// Failure while running generated code on the reference machine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmulatorError {
    #[error("label '{0}' declared twice")]
    DuplicateLabel(String),

    #[error("address {address} out of range at pc {pc}")]
    AddressOutOfRange { address: i32, pc: usize },

    #[error("program needs {0} instructions, more than ROM holds")]
    ProgramTooLarge(usize),
}
