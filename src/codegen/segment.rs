//! Memory segment address resolution

use crate::asm::{AsmProgram, Comp, Dest};
use crate::command::{Segment, TEMP_BASE};
use crate::error::ParseError;

/// Where a segment cell lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// No address; the value is the literal
    Constant(u16),
    /// RAM[RAM[base] + offset]
    Indirect { base: &'static str, offset: u16 },
    /// Fixed RAM cell
    Direct(u16),
    /// A base-pointer cell itself (THIS or THAT)
    Register(&'static str),
}

pub fn resolve(segment: Segment, offset: u16) -> Result<Location, ParseError> {
    if offset > segment.max_offset() {
        return Err(ParseError::OffsetOutOfRange {
            segment: segment.name(),
            offset,
            max: segment.max_offset(),
        });
    }

    let location = match segment {
        Segment::Constant => Location::Constant(offset),
        Segment::Temp => Location::Direct(TEMP_BASE + offset),
        Segment::Pointer if offset == 0 => Location::Register("THIS"),
        Segment::Pointer => Location::Register("THAT"),
        Segment::Local => Location::Indirect { base: "LCL", offset },
        Segment::Argument => Location::Indirect { base: "ARG", offset },
        Segment::This => Location::Indirect { base: "THIS", offset },
        Segment::That => Location::Indirect { base: "THAT", offset },
    };
    Ok(location)
}

impl Location {
    /// Emit the steps that leave the cell's address in A. May clobber D.
    /// Constants have no address and emit nothing.
    pub fn emit_address(&self, out: &mut AsmProgram) {
        match self {
            Location::Constant(_) => {}
            Location::Indirect { base, offset: 0 } => {
                out.load_symbol(*base);
                out.assign(Dest::A, Comp::M);
            }
            Location::Indirect { base, offset } => {
                out.load(*offset);
                out.assign(Dest::D, Comp::A);
                out.load_symbol(*base);
                out.assign(Dest::A, Comp::DPlusM);
            }
            Location::Direct(address) => out.load(*address),
            Location::Register(name) => out.load_symbol(*name),
        }
    }
}
