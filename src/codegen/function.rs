//! Function entry, call and return code generation
//!
//! Calling convention, stack growing upward:
//!
//! ```text
//!   ARG ->  argument 0 .. argument n-1
//!           return address
//!           saved LCL
//!           saved ARG
//!           saved THIS
//!           saved THAT
//!   LCL ->  local 0 .. local k-1
//!   SP  ->
//! ```
//!
//! On return the callee's value lands in the old `argument 0` slot and SP
//! points just above it.

use super::memory::push_d;
use super::CodeGen;
use crate::asm::{Comp, Dest, Jump, STACK_BASE};

/// Words pushed by a call between the arguments and the callee's locals
pub const FRAME_SIZE: u16 = 5;

/// Holds the callee frame base during return
const FRAME: &str = "R13";
/// Holds the return address during return
const RET: &str = "R14";

impl CodeGen {
    pub(super) fn emit_function(&mut self, name: &str, locals: u16) {
        self.current_function = Some(name.to_string());
        self.out.label(name);
        for _ in 0..locals {
            self.out.load_symbol("SP");
            self.out.assign(Dest::A, Comp::M);
            self.out.assign(Dest::M, Comp::Zero);
            self.out.load_symbol("SP");
            self.out.assign(Dest::M, Comp::MPlusOne);
        }
    }

    pub(super) fn emit_call(&mut self, name: &str, args: u16) {
        self.call_counter += 1;
        let return_label = format!("RETURN{}", self.call_counter);

        self.out.load_symbol(return_label.as_str());
        self.out.assign(Dest::D, Comp::A);
        push_d(&mut self.out);
        for saved in ["LCL", "ARG", "THIS", "THAT"] {
            self.out.load_symbol(saved);
            self.out.assign(Dest::D, Comp::M);
            push_d(&mut self.out);
        }

        // ARG = SP - args - 5
        self.out.load_symbol("SP");
        self.out.assign(Dest::D, Comp::M);
        self.out.load(args.saturating_add(FRAME_SIZE));
        self.out.assign(Dest::D, Comp::DMinusA);
        self.out.load_symbol("ARG");
        self.out.assign(Dest::M, Comp::D);

        // LCL = SP
        self.out.load_symbol("SP");
        self.out.assign(Dest::D, Comp::M);
        self.out.load_symbol("LCL");
        self.out.assign(Dest::M, Comp::D);

        self.out.load_symbol(name);
        self.out.jump(Comp::Zero, Jump::JMP);
        self.out.label(return_label);
    }

    /// D = RAM[FRAME - back]
    fn read_frame(&mut self, back: u16) {
        self.out.load_symbol(FRAME);
        self.out.assign(Dest::D, Comp::M);
        self.out.load(back);
        self.out.assign(Dest::A, Comp::DMinusA);
        self.out.assign(Dest::D, Comp::M);
    }

    pub(super) fn emit_return(&mut self) {
        // FRAME = LCL
        self.out.load_symbol("LCL");
        self.out.assign(Dest::D, Comp::M);
        self.out.load_symbol(FRAME);
        self.out.assign(Dest::M, Comp::D);

        // RET = *(FRAME - 5), read before the return value can overwrite it
        self.read_frame(FRAME_SIZE);
        self.out.load_symbol(RET);
        self.out.assign(Dest::M, Comp::D);

        // *ARG = pop()
        self.out.load_symbol("SP");
        self.out.assign(Dest::AM, Comp::MMinusOne);
        self.out.assign(Dest::D, Comp::M);
        self.out.load_symbol("ARG");
        self.out.assign(Dest::A, Comp::M);
        self.out.assign(Dest::M, Comp::D);

        // SP = ARG + 1
        self.out.load_symbol("ARG");
        self.out.assign(Dest::D, Comp::MPlusOne);
        self.out.load_symbol("SP");
        self.out.assign(Dest::M, Comp::D);

        // Saved pointers are addressed from FRAME, never from LCL/ARG
        for (back, register) in [(1, "THAT"), (2, "THIS"), (3, "ARG"), (4, "LCL")] {
            self.read_frame(back);
            self.out.load_symbol(register);
            self.out.assign(Dest::M, Comp::D);
        }

        self.out.load_symbol(RET);
        self.out.assign(Dest::A, Comp::M);
        self.out.jump(Comp::Zero, Jump::JMP);
    }

    /// SP = 256; call Sys.init 0
    pub fn bootstrap(&mut self) {
        self.out.comment("bootstrap");
        self.out.load(STACK_BASE);
        self.out.assign(Dest::D, Comp::A);
        self.out.load_symbol("SP");
        self.out.assign(Dest::M, Comp::D);
        self.out.comment("call Sys.init 0");
        self.emit_call("Sys.init", 0);
    }
}
