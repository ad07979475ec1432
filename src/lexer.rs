//! Lexer for VM source units
//!
//! Splits a unit into cleaned lines: comments removed, surrounding whitespace
//! trimmed, blank lines dropped. Each surviving line is one VM command.

/// One non-empty source line, already split into words
#[derive(Debug, Clone, PartialEq)]
pub struct SourceLine {
    /// 1-based line number in the unit
    pub number: usize,
    /// Cleaned text (no comment, trimmed)
    pub text: String,
    pub words: Vec<String>,
}

impl SourceLine {
    pub fn new(number: usize, text: &str) -> Self {
        SourceLine {
            number,
            text: text.to_string(),
            words: text.split_whitespace().map(str::to_string).collect(),
        }
    }
}

pub struct Lexer<'a> {
    input: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer { input }
    }

    fn strip_comment(line: &str) -> &str {
        match line.find("//") {
            Some(idx) => &line[..idx],
            None => line,
        }
    }

    /// Collect every line that carries a command
    pub fn lines(&self) -> Vec<SourceLine> {
        self.input
            .lines()
            .enumerate()
            .filter_map(|(idx, raw)| {
                let text = Self::strip_comment(raw).trim();
                if text.is_empty() {
                    None
                } else {
                    Some(SourceLine::new(idx + 1, text))
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_blank_and_comment_lines() {
        let lines = Lexer::new("// header\n\n   \npush constant 7\n// trailer\n").lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "push constant 7");
        assert_eq!(lines[0].number, 4);
    }

    #[test]
    fn test_strips_inline_comment() {
        let lines = Lexer::new("add // sum them").lines();
        assert_eq!(lines[0].text, "add");
        assert_eq!(lines[0].words, vec!["add"]);
    }

    #[test]
    fn test_splits_on_tabs_and_runs_of_spaces() {
        let lines = Lexer::new("pop\tlocal    2").lines();
        assert_eq!(lines[0].words, vec!["pop", "local", "2"]);
    }

    #[test]
    fn test_accepts_crlf() {
        let lines = Lexer::new("push constant 1\r\nneg\r\n").lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "push constant 1");
        assert_eq!(lines[1].text, "neg");
        assert_eq!(lines[1].number, 2);
    }
}
