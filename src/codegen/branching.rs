//! label / goto / if-goto code generation

use super::memory::pop_d;
use super::CodeGen;
use crate::asm::{Comp, Jump};

impl CodeGen {
    /// Qualify a source label with the enclosing function, if any
    pub fn scoped_label(&self, name: &str) -> String {
        match &self.current_function {
            Some(function) => format!("{}${}", function, name),
            None => name.to_string(),
        }
    }

    pub(super) fn emit_label(&mut self, name: &str) {
        let label = self.scoped_label(name);
        self.out.label(label);
    }

    pub(super) fn emit_goto(&mut self, name: &str) {
        let label = self.scoped_label(name);
        self.out.load_symbol(label);
        self.out.jump(Comp::Zero, Jump::JMP);
    }

    /// Jumps when the popped value is anything but false
    pub(super) fn emit_if_goto(&mut self, name: &str) {
        let label = self.scoped_label(name);
        pop_d(&mut self.out);
        self.out.load_symbol(label);
        self.out.jump(Comp::D, Jump::JNE);
    }
}
