//! Parser for VM commands

use crate::codegen::FRAME_SIZE;
use crate::command::{ArithmeticOp, BitwiseOp, Command, ComparisonOp, Segment, MAX_CONSTANT};
use crate::error::{ParseError, TranslateError};
use crate::lexer::SourceLine;

pub struct Parser {
    /// Unit name used in error messages
    unit: String,
}

impl Parser {
    pub fn new(unit: &str) -> Self {
        Parser { unit: unit.to_string() }
    }

    /// Parse every line of a unit, stopping at the first malformed one
    pub fn parse(&self, lines: &[SourceLine]) -> Result<Vec<Command>, TranslateError> {
        lines.iter().map(|line| self.parse_located(line)).collect()
    }

    /// Parse one line, attaching unit and line number on failure
    pub fn parse_located(&self, line: &SourceLine) -> Result<Command, TranslateError> {
        Self::parse_line(line).map_err(|source| TranslateError::Parse {
            unit: self.unit.clone(),
            line: line.number,
            text: line.text.clone(),
            source,
        })
    }

    pub fn parse_line(line: &SourceLine) -> Result<Command, ParseError> {
        let (keyword, operands) = match line.words.split_first() {
            Some((k, rest)) => (k.as_str(), rest),
            None => return Err(ParseError::UnknownCommand(String::new())),
        };

        let nullary = |command: Command| operands_of::<0>(keyword, operands).map(|_| command);

        let command = match keyword {
            "add" => nullary(Command::Arithmetic(ArithmeticOp::Add))?,
            "sub" => nullary(Command::Arithmetic(ArithmeticOp::Sub))?,
            "neg" => nullary(Command::Arithmetic(ArithmeticOp::Neg))?,
            "eq" => nullary(Command::Comparison(ComparisonOp::Eq))?,
            "gt" => nullary(Command::Comparison(ComparisonOp::Gt))?,
            "lt" => nullary(Command::Comparison(ComparisonOp::Lt))?,
            "and" => nullary(Command::Bitwise(BitwiseOp::And))?,
            "or" => nullary(Command::Bitwise(BitwiseOp::Or))?,
            "not" => nullary(Command::Bitwise(BitwiseOp::Not))?,
            "return" => nullary(Command::Return)?,
            "label" | "goto" | "if-goto" => {
                let [name] = operands_of::<1>(keyword, operands)?;
                let name = parse_symbol(name)?;
                match keyword {
                    "label" => Command::Label(name),
                    "goto" => Command::Goto(name),
                    _ => Command::IfGoto(name),
                }
            }
            "push" => {
                let [segment, offset] = operands_of::<2>(keyword, operands)?;
                let (segment, offset) = parse_segment_offset(segment, offset)?;
                Command::Push(segment, offset)
            }
            "pop" => {
                let [segment, offset] = operands_of::<2>(keyword, operands)?;
                let (segment, offset) = parse_segment_offset(segment, offset)?;
                if segment == Segment::Constant {
                    return Err(ParseError::PopConstant);
                }
                Command::Pop(segment, offset)
            }
            "function" => {
                let [name, locals] = operands_of::<2>(keyword, operands)?;
                Command::Function(parse_symbol(name)?, parse_count(locals)?)
            }
            "call" => {
                let [name, args] = operands_of::<2>(keyword, operands)?;
                Command::Call(parse_symbol(name)?, parse_count(args)?)
            }
            _ => return Err(ParseError::UnknownCommand(keyword.to_string())),
        };

        Ok(command)
    }
}

/// Exactly `N` operands, or an operand-count error naming the command
fn operands_of<'a, const N: usize>(
    keyword: &str,
    operands: &'a [String],
) -> Result<&'a [String; N], ParseError> {
    operands.try_into().map_err(|_| ParseError::OperandCount {
        command: keyword.to_string(),
        expected: N,
        found: operands.len(),
    })
}

fn parse_number(word: &str) -> Result<u16, ParseError> {
    if !word.chars().all(|c| c.is_ascii_digit()) {
        return Err(ParseError::InvalidNumber(word.to_string()));
    }
    word.parse::<u16>()
        .map_err(|_| ParseError::InvalidNumber(word.to_string()))
}

/// Local/argument counts; a call adds the frame size and loads the sum
fn parse_count(word: &str) -> Result<u16, ParseError> {
    let count = parse_number(word)?;
    let max = MAX_CONSTANT - FRAME_SIZE;
    if count > max {
        return Err(ParseError::CountOutOfRange { count, max });
    }
    Ok(count)
}

fn parse_segment_offset(segment: &str, offset: &str) -> Result<(Segment, u16), ParseError> {
    let seg = match Segment::from_name(segment) {
        Some(s) => s,
        None if segment == "static" => {
            return Err(ParseError::UnsupportedSegment(segment.to_string()))
        }
        None => return Err(ParseError::UnknownSegment(segment.to_string())),
    };

    let offset = parse_number(offset)?;
    if offset > seg.max_offset() {
        return Err(ParseError::OffsetOutOfRange {
            segment: seg.name(),
            offset,
            max: seg.max_offset(),
        });
    }
    Ok((seg, offset))
}

/// Labels and function names: no leading digit; letters, digits, `_.$:`
fn parse_symbol(word: &str) -> Result<String, ParseError> {
    let valid_char = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$' | ':');
    let first_ok = word.chars().next().is_some_and(|c| !c.is_ascii_digit());
    if first_ok && word.chars().all(valid_char) {
        Ok(word.to_string())
    } else {
        Err(ParseError::InvalidSymbol(word.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Command, ParseError> {
        Parser::parse_line(&SourceLine::new(1, text))
    }

    #[test]
    fn test_parse_memory_access() {
        assert_eq!(parse("push constant 7").unwrap(), Command::Push(Segment::Constant, 7));
        assert_eq!(parse("pop local 2").unwrap(), Command::Pop(Segment::Local, 2));
        assert_eq!(parse("push pointer 1").unwrap(), Command::Push(Segment::Pointer, 1));
        assert_eq!(parse("pop temp 7").unwrap(), Command::Pop(Segment::Temp, 7));
    }

    #[test]
    fn test_parse_stack_ops() {
        assert_eq!(parse("sub").unwrap(), Command::Arithmetic(ArithmeticOp::Sub));
        assert_eq!(parse("lt").unwrap(), Command::Comparison(ComparisonOp::Lt));
        assert_eq!(parse("or").unwrap(), Command::Bitwise(BitwiseOp::Or));
    }

    #[test]
    fn test_parse_branching_and_functions() {
        assert_eq!(parse("label LOOP_START").unwrap(), Command::Label("LOOP_START".into()));
        assert_eq!(parse("if-goto END").unwrap(), Command::IfGoto("END".into()));
        assert_eq!(
            parse("function Main.fib 2").unwrap(),
            Command::Function("Main.fib".into(), 2)
        );
        assert_eq!(parse("call Math.multiply 2").unwrap(), Command::Call("Math.multiply".into(), 2));
        assert_eq!(parse("return").unwrap(), Command::Return);
    }

    #[test]
    fn test_rejects_pop_constant() {
        assert_eq!(parse("pop constant 3"), Err(ParseError::PopConstant));
    }

    #[test]
    fn test_rejects_out_of_range_offsets() {
        assert!(matches!(parse("push temp 8"), Err(ParseError::OffsetOutOfRange { .. })));
        assert!(matches!(parse("pop pointer 2"), Err(ParseError::OffsetOutOfRange { .. })));
        assert!(matches!(parse("push constant 32768"), Err(ParseError::OffsetOutOfRange { .. })));
    }

    #[test]
    fn test_rejects_static_as_unsupported() {
        assert_eq!(
            parse("push static 0"),
            Err(ParseError::UnsupportedSegment("static".into()))
        );
        assert_eq!(parse("push heap 0"), Err(ParseError::UnknownSegment("heap".into())));
    }

    #[test]
    fn test_rejects_wrong_operand_count() {
        assert_eq!(
            parse("add 1"),
            Err(ParseError::OperandCount { command: "add".into(), expected: 0, found: 1 })
        );
        assert!(matches!(parse("push constant"), Err(ParseError::OperandCount { .. })));
        assert!(matches!(parse("call Foo"), Err(ParseError::OperandCount { .. })));
    }

    #[test]
    fn test_rejects_bad_numbers_and_symbols() {
        assert_eq!(parse("push local -1"), Err(ParseError::InvalidNumber("-1".into())));
        assert_eq!(parse("function f x"), Err(ParseError::InvalidNumber("x".into())));
        assert!(matches!(parse("call f 40000"), Err(ParseError::CountOutOfRange { .. })));
        assert_eq!(parse("label 1abc"), Err(ParseError::InvalidSymbol("1abc".into())));
        assert_eq!(parse("goto a-b"), Err(ParseError::InvalidSymbol("a-b".into())));
    }

    #[test]
    fn test_rejects_unknown_command() {
        assert_eq!(parse("mul"), Err(ParseError::UnknownCommand("mul".into())));
        assert_eq!(parse("mul 1 2"), Err(ParseError::UnknownCommand("mul".into())));
    }

    #[test]
    fn test_every_keyword_checks_its_own_operand_count() {
        let cases = [
            ("return x", 0, 1),
            ("not a b", 0, 2),
            ("label", 1, 0),
            ("goto A B", 1, 2),
            ("if-goto", 1, 0),
            ("pop local", 2, 1),
            ("function f", 2, 1),
            ("call f 1 2", 2, 3),
        ];
        for (text, expected, found) in cases {
            let keyword = text.split_whitespace().next().unwrap();
            assert_eq!(
                parse(text),
                Err(ParseError::OperandCount { command: keyword.into(), expected, found }),
                "{}",
                text
            );
        }
    }

    #[test]
    fn test_parse_unit_reports_first_failure_line() {
        let lines = vec![
            SourceLine::new(1, "push constant 1"),
            SourceLine::new(3, "pop constant 1"),
            SourceLine::new(4, "bogus"),
        ];
        match Parser::new("Test.vm").parse(&lines) {
            Err(TranslateError::Parse { unit, line, source, .. }) => {
                assert_eq!(unit, "Test.vm");
                assert_eq!(line, 3);
                assert_eq!(source, ParseError::PopConstant);
            }
            other => panic!("Expected parse error, got {:?}", other),
        }
    }
}
