//! Hack assembly generation for VM commands
//!
//! [`CodeGen`] holds everything that must survive from one command to the
//! next within a run: the output buffer, the label counters and the name of
//! the function currently being emitted. One instance spans every unit of a
//! multi-file translation so labels stay unique across files.

mod arithmetic;
mod branching;
mod function;
mod memory;
mod segment;

pub use function::FRAME_SIZE;

use log::{debug, trace};

use crate::asm::AsmProgram;
use crate::command::Command;
use crate::error::{ParseError, TranslateError};
use crate::lexer::SourceLine;
use crate::parser::Parser;

pub struct CodeGen {
    out: AsmProgram,

    /// Source of TRUE<n>/END<n> ids; never reset
    comparison_counter: u32,

    /// Source of RETURN<n> ids; never reset
    call_counter: u32,

    /// Set by `function`, read by label/goto/if-goto
    current_function: Option<String>,
}

impl Default for CodeGen {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeGen {
    pub fn new() -> Self {
        CodeGen {
            out: AsmProgram::new(),
            comparison_counter: 0,
            call_counter: 0,
            current_function: None,
        }
    }

    pub fn current_function(&self) -> Option<&str> {
        self.current_function.as_deref()
    }

    #[cfg(test)]
    pub fn output(&self) -> &AsmProgram {
        &self.out
    }

    pub fn finish(self) -> AsmProgram {
        self.out
    }

    /// Emit one command, preceded by its source text as a comment.
    /// On error nothing is emitted.
    pub fn translate(&mut self, command: &Command) -> Result<(), ParseError> {
        let mark = self.out.len();
        self.out.comment(command.to_string());

        let result = match command {
            Command::Push(segment, offset) => self.emit_push(*segment, *offset),
            Command::Pop(segment, offset) => self.emit_pop(*segment, *offset),
            Command::Arithmetic(op) => {
                self.emit_arithmetic(*op);
                Ok(())
            }
            Command::Comparison(op) => {
                self.emit_comparison(*op);
                Ok(())
            }
            Command::Bitwise(op) => {
                self.emit_bitwise(*op);
                Ok(())
            }
            Command::Label(name) => {
                self.emit_label(name);
                Ok(())
            }
            Command::Goto(name) => {
                self.emit_goto(name);
                Ok(())
            }
            Command::IfGoto(name) => {
                self.emit_if_goto(name);
                Ok(())
            }
            Command::Function(name, locals) => {
                self.emit_function(name, *locals);
                Ok(())
            }
            Command::Call(name, args) => {
                self.emit_call(name, *args);
                Ok(())
            }
            Command::Return => {
                self.emit_return();
                Ok(())
            }
        };

        if result.is_err() {
            self.out.truncate(mark);
        } else {
            trace!("{} -> {} lines", command, self.out.len() - mark);
        }
        result
    }

    /// Parse and emit a whole unit, stopping at the first bad line
    pub fn translate_unit(&mut self, unit: &str, lines: &[SourceLine]) -> Result<usize, TranslateError> {
        let parser = Parser::new(unit);
        for line in lines {
            let command = parser.parse_located(line)?;
            self.translate(&command).map_err(|source| TranslateError::Parse {
                unit: unit.to_string(),
                line: line.number,
                text: line.text.clone(),
                source,
            })?;
        }
        debug!(
            "{}: {} commands, {} lines emitted so far, scope {:?}",
            unit,
            lines.len(),
            self.out.len(),
            self.current_function()
        );
        Ok(lines.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asm::Asm;
    use crate::command::{ArithmeticOp, Segment};
    use crate::emulator::{Machine, STACK_BASE};
    use crate::error::EmulatorError;
    use crate::lexer::Lexer;
    use std::collections::HashSet;

    #[test]
    fn test_comment_precedes_each_block() {
        let mut gen = CodeGen::new();
        gen.translate(&Command::Arithmetic(ArithmeticOp::Add)).unwrap();
        gen.translate(&Command::Return).unwrap();
        let comments: Vec<&Asm> = gen
            .output()
            .lines()
            .iter()
            .filter(|l| matches!(l, Asm::Comment(_)))
            .collect();
        assert_eq!(comments, vec![&Asm::Comment("add".into()), &Asm::Comment("return".into())]);
        assert_eq!(gen.output().lines()[0], Asm::Comment("add".into()));
    }

    #[test]
    fn test_failed_command_emits_nothing() {
        let mut gen = CodeGen::new();
        gen.translate(&Command::Push(Segment::Constant, 1)).unwrap();
        let before = gen.output().clone();
        assert!(gen.translate(&Command::Pop(Segment::Pointer, 4)).is_err());
        assert_eq!(gen.output(), &before);
    }

    #[test]
    fn test_state_persists_across_units() {
        let mut gen = CodeGen::new();
        gen.translate_unit("A", &Lexer::new("function A.f 0\npush constant 1\npush constant 2\neq").lines())
            .unwrap();
        gen.translate_unit("B", &Lexer::new("push constant 1\npush constant 2\ngt\nlabel X").lines())
            .unwrap();
        let text = gen.output().to_string();
        assert!(text.contains("(TRUE1)"));
        assert!(text.contains("(TRUE2)"));
        // Unit B has no function of its own yet, so it stays in A.f's scope
        assert!(text.contains("(A.f$X)"));
    }

    #[test]
    fn test_translate_unit_reports_line() {
        let mut gen = CodeGen::new();
        let lines = Lexer::new("push constant 1\n\n// note\npush static 3\n").lines();
        match gen.translate_unit("Main.vm", &lines) {
            Err(TranslateError::Parse { unit, line, source, .. }) => {
                assert_eq!(unit, "Main.vm");
                assert_eq!(line, 4);
                assert_eq!(source, ParseError::UnsupportedSegment("static".into()));
            }
            other => panic!("Expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_no_duplicate_labels_in_mixed_program() {
        let source = "\
            function Main.main 1\n\
            label LOOP\n\
            push constant 1\npush constant 2\nlt\n\
            call Main.g 0\n\
            push constant 3\npush constant 3\neq\n\
            call Main.g 0\n\
            goto LOOP\n\
            function Main.g 0\n\
            label LOOP\n\
            push constant 0\n\
            return";
        let mut gen = CodeGen::new();
        gen.translate_unit("Main", &Lexer::new(source).lines()).unwrap();
        let labels: Vec<&String> = gen
            .output()
            .lines()
            .iter()
            .filter_map(|l| match l {
                Asm::Label(name) => Some(name),
                _ => None,
            })
            .collect();
        let unique: HashSet<&String> = labels.iter().copied().collect();
        assert_eq!(labels.len(), unique.len());
        // Machine::load rejects duplicates as well
        assert!(Machine::load(gen.output()).is_ok());
    }

    #[test]
    fn test_bare_label_can_collide_with_generated_label() {
        let source = "label END1\npush constant 1\npush constant 1\neq";
        let mut gen = CodeGen::new();
        gen.translate_unit("Main", &Lexer::new(source).lines()).unwrap();
        assert_eq!(
            Machine::load(gen.output()).err(),
            Some(EmulatorError::DuplicateLabel("END1".into()))
        );

        // The same name inside a function is scoped and stays distinct
        let mut gen = CodeGen::new();
        gen.translate_unit("Main", &Lexer::new(&format!("function Main.f 0\n{}", source)).lines())
            .unwrap();
        assert!(Machine::load(gen.output()).is_ok());
    }

    #[test]
    fn test_stack_depth_matches_net_effect() {
        // +1 +1 -1 +1 -1 +2(locals) +1 -1(cmp) -1(pop)
        let source = "\
            push constant 4\n\
            push constant 6\n\
            add\n\
            push constant 1\n\
            sub\n\
            function Main.x 2\n\
            push constant 9\n\
            gt\n\
            pop temp 0";
        let mut gen = CodeGen::new();
        gen.translate_unit("Main", &Lexer::new(source).lines()).unwrap();
        let mut m = Machine::load(gen.output()).unwrap();
        m.set_ram(0, STACK_BASE as i16);
        m.run(10_000).unwrap();
        assert_eq!(m.ram(0), STACK_BASE as i16 + 2);
        assert_eq!(m.stack(), &[9, 0]);
    }
}
