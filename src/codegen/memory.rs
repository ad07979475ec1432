//! push / pop code generation

use super::segment::{resolve, Location};
use super::CodeGen;
use crate::asm::{AsmProgram, Comp, Dest};
use crate::command::Segment;
use crate::error::ParseError;

/// Scratch cell holding a pop destination
const ADDR_SCRATCH: &str = "R13";

/// RAM[SP] = D; SP++
pub(super) fn push_d(out: &mut AsmProgram) {
    out.load_symbol("SP");
    out.assign(Dest::A, Comp::M);
    out.assign(Dest::M, Comp::D);
    out.load_symbol("SP");
    out.assign(Dest::M, Comp::MPlusOne);
}

/// SP--; D = RAM[SP]
pub(super) fn pop_d(out: &mut AsmProgram) {
    out.load_symbol("SP");
    out.assign(Dest::AM, Comp::MMinusOne);
    out.assign(Dest::D, Comp::M);
}

impl CodeGen {
    pub(super) fn emit_push(&mut self, segment: Segment, offset: u16) -> Result<(), ParseError> {
        let location = resolve(segment, offset)?;
        match location {
            Location::Constant(value) => {
                self.out.load(value);
                self.out.assign(Dest::D, Comp::A);
            }
            _ => {
                location.emit_address(&mut self.out);
                self.out.assign(Dest::D, Comp::M);
            }
        }
        push_d(&mut self.out);
        Ok(())
    }

    pub(super) fn emit_pop(&mut self, segment: Segment, offset: u16) -> Result<(), ParseError> {
        match resolve(segment, offset)? {
            Location::Constant(_) => return Err(ParseError::PopConstant),
            location @ Location::Indirect { .. } => {
                // The address computation needs D, so park it before popping
                location.emit_address(&mut self.out);
                self.out.assign(Dest::D, Comp::A);
                self.out.load_symbol(ADDR_SCRATCH);
                self.out.assign(Dest::M, Comp::D);
                pop_d(&mut self.out);
                self.out.load_symbol(ADDR_SCRATCH);
                self.out.assign(Dest::A, Comp::M);
                self.out.assign(Dest::M, Comp::D);
            }
            location => {
                pop_d(&mut self.out);
                location.emit_address(&mut self.out);
                self.out.assign(Dest::M, Comp::D);
            }
        }
        Ok(())
    }
}
