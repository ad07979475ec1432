//! VM command types
//!
//! The closed instruction set of the stack VM. Values are produced by the
//! parser and consumed once by the code generator.

use std::fmt;

/// Fixed base of the temp window
pub const TEMP_BASE: u16 = 5;
/// Number of temp slots
pub const TEMP_SIZE: u16 = 8;
/// Largest literal an address instruction can carry
pub const MAX_CONSTANT: u16 = 0x7FFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Constant,
    Local,
    Argument,
    This,
    That,
    Temp,
    Pointer,
}

impl Segment {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "constant" => Some(Segment::Constant),
            "local" => Some(Segment::Local),
            "argument" => Some(Segment::Argument),
            "this" => Some(Segment::This),
            "that" => Some(Segment::That),
            "temp" => Some(Segment::Temp),
            "pointer" => Some(Segment::Pointer),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Segment::Constant => "constant",
            Segment::Local => "local",
            Segment::Argument => "argument",
            Segment::This => "this",
            Segment::That => "that",
            Segment::Temp => "temp",
            Segment::Pointer => "pointer",
        }
    }

    /// Largest offset the segment accepts
    pub fn max_offset(&self) -> u16 {
        match self {
            Segment::Constant => MAX_CONSTANT,
            Segment::Temp => TEMP_SIZE - 1,
            Segment::Pointer => 1,
            Segment::Local | Segment::Argument | Segment::This | Segment::That => MAX_CONSTANT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    Gt,
    Lt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitwiseOp {
    And,
    Or,
    Not,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Memory access
    Push(Segment, u16),
    Pop(Segment, u16),

    // Stack arithmetic
    Arithmetic(ArithmeticOp),
    Comparison(ComparisonOp),
    Bitwise(BitwiseOp),

    // Branching
    Label(String),
    Goto(String),
    IfGoto(String),

    // Functions
    Function(String, u16),
    Call(String, u16),
    Return,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Push(seg, offset) => write!(f, "push {} {}", seg.name(), offset),
            Command::Pop(seg, offset) => write!(f, "pop {} {}", seg.name(), offset),
            Command::Arithmetic(ArithmeticOp::Add) => write!(f, "add"),
            Command::Arithmetic(ArithmeticOp::Sub) => write!(f, "sub"),
            Command::Arithmetic(ArithmeticOp::Neg) => write!(f, "neg"),
            Command::Comparison(ComparisonOp::Eq) => write!(f, "eq"),
            Command::Comparison(ComparisonOp::Gt) => write!(f, "gt"),
            Command::Comparison(ComparisonOp::Lt) => write!(f, "lt"),
            Command::Bitwise(BitwiseOp::And) => write!(f, "and"),
            Command::Bitwise(BitwiseOp::Or) => write!(f, "or"),
            Command::Bitwise(BitwiseOp::Not) => write!(f, "not"),
            Command::Label(name) => write!(f, "label {}", name),
            Command::Goto(name) => write!(f, "goto {}", name),
            Command::IfGoto(name) => write!(f, "if-goto {}", name),
            Command::Function(name, locals) => write!(f, "function {} {}", name, locals),
            Command::Call(name, args) => write!(f, "call {} {}", name, args),
            Command::Return => write!(f, "return"),
        }
    }
}
