//! Arithmetic, bitwise and comparison code generation
//!
//! Binary operators pop the right operand into D and combine it in place
//! with the left operand, which becomes the new top of stack. Comparisons
//! compute `left - right` and branch on it, so operands whose difference
//! overflows 16 bits compare wrongly, exactly as on the hardware.

use super::memory::pop_d;
use super::CodeGen;
use crate::asm::{Comp, Dest, Jump};
use crate::command::{ArithmeticOp, BitwiseOp, ComparisonOp};

impl CodeGen {
    /// A = address of the top of stack, SP unchanged
    fn select_top(&mut self) {
        self.out.load_symbol("SP");
        self.out.assign(Dest::A, Comp::MMinusOne);
    }

    fn emit_unary(&mut self, comp: Comp) {
        self.select_top();
        self.out.assign(Dest::M, comp);
    }

    fn emit_binary(&mut self, comp: Comp) {
        pop_d(&mut self.out);
        self.select_top();
        self.out.assign(Dest::M, comp);
    }

    pub(super) fn emit_arithmetic(&mut self, op: ArithmeticOp) {
        match op {
            ArithmeticOp::Add => self.emit_binary(Comp::DPlusM),
            ArithmeticOp::Sub => self.emit_binary(Comp::MMinusD),
            ArithmeticOp::Neg => self.emit_unary(Comp::NegM),
        }
    }

    pub(super) fn emit_bitwise(&mut self, op: BitwiseOp) {
        match op {
            BitwiseOp::And => self.emit_binary(Comp::DAndM),
            BitwiseOp::Or => self.emit_binary(Comp::DOrM),
            BitwiseOp::Not => self.emit_unary(Comp::NotM),
        }
    }

    pub(super) fn emit_comparison(&mut self, op: ComparisonOp) {
        self.comparison_counter += 1;
        let id = self.comparison_counter;
        let true_label = format!("TRUE{}", id);
        let end_label = format!("END{}", id);
        let jump = match op {
            ComparisonOp::Eq => Jump::JEQ,
            ComparisonOp::Gt => Jump::JGT,
            ComparisonOp::Lt => Jump::JLT,
        };

        pop_d(&mut self.out);
        self.select_top();
        self.out.assign(Dest::D, Comp::MMinusD);
        self.out.load_symbol(true_label.as_str());
        self.out.jump(Comp::D, jump);

        self.select_top();
        self.out.assign(Dest::M, Comp::Zero);
        self.out.load_symbol(end_label.as_str());
        self.out.jump(Comp::Zero, Jump::JMP);

        self.out.label(true_label);
        self.select_top();
        self.out.assign(Dest::M, Comp::MinusOne);

        self.out.label(end_label);
    }
}
