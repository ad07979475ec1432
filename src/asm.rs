//! Hack assembly representation
//!
//! The target machine has one data register (D), one address register (A)
//! and addressable RAM (M = RAM[A]). Every generated line is one of the
//! variants of [`Asm`]; [`AsmProgram`] is the ordered output buffer.

use std::fmt;

/// First stack cell; the bootstrap points SP here
pub const STACK_BASE: u16 = 256;

/// Destination of a compute instruction
// Full Hack set; the translator itself emits only some of these
#[allow(clippy::upper_case_acronyms, dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dest {
    M,
    D,
    MD,
    A,
    AM,
    AD,
    AMD,
}

impl Dest {
    pub fn writes_a(&self) -> bool {
        matches!(self, Dest::A | Dest::AM | Dest::AD | Dest::AMD)
    }

    pub fn writes_d(&self) -> bool {
        matches!(self, Dest::D | Dest::MD | Dest::AD | Dest::AMD)
    }

    pub fn writes_m(&self) -> bool {
        matches!(self, Dest::M | Dest::MD | Dest::AM | Dest::AMD)
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            Dest::M => "M",
            Dest::D => "D",
            Dest::MD => "MD",
            Dest::A => "A",
            Dest::AM => "AM",
            Dest::AD => "AD",
            Dest::AMD => "AMD",
        }
    }
}

/// ALU computation
// Full Hack set; the translator itself emits only some of these
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comp {
    Zero,
    One,
    MinusOne,
    D,
    A,
    M,
    NotD,
    NotA,
    NotM,
    NegD,
    NegA,
    NegM,
    DPlusOne,
    APlusOne,
    MPlusOne,
    DMinusOne,
    AMinusOne,
    MMinusOne,
    DPlusA,
    DPlusM,
    DMinusA,
    DMinusM,
    AMinusD,
    MMinusD,
    DAndA,
    DAndM,
    DOrA,
    DOrM,
}

impl Comp {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Comp::Zero => "0",
            Comp::One => "1",
            Comp::MinusOne => "-1",
            Comp::D => "D",
            Comp::A => "A",
            Comp::M => "M",
            Comp::NotD => "!D",
            Comp::NotA => "!A",
            Comp::NotM => "!M",
            Comp::NegD => "-D",
            Comp::NegA => "-A",
            Comp::NegM => "-M",
            Comp::DPlusOne => "D+1",
            Comp::APlusOne => "A+1",
            Comp::MPlusOne => "M+1",
            Comp::DMinusOne => "D-1",
            Comp::AMinusOne => "A-1",
            Comp::MMinusOne => "M-1",
            Comp::DPlusA => "D+A",
            Comp::DPlusM => "D+M",
            Comp::DMinusA => "D-A",
            Comp::DMinusM => "D-M",
            Comp::AMinusD => "A-D",
            Comp::MMinusD => "M-D",
            Comp::DAndA => "D&A",
            Comp::DAndM => "D&M",
            Comp::DOrA => "D|A",
            Comp::DOrM => "D|M",
        }
    }

    /// Whether the computation reads RAM[A]
    pub fn reads_m(&self) -> bool {
        matches!(
            self,
            Comp::M
                | Comp::NotM
                | Comp::NegM
                | Comp::MPlusOne
                | Comp::MMinusOne
                | Comp::DPlusM
                | Comp::DMinusM
                | Comp::MMinusD
                | Comp::DAndM
                | Comp::DOrM
        )
    }
}

/// Jump condition, tested against the ALU output
// Full Hack set; the translator itself emits only some of these
#[allow(clippy::upper_case_acronyms, dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Jump {
    JGT,
    JEQ,
    JGE,
    JLT,
    JNE,
    JLE,
    JMP,
}

impl Jump {
    pub fn taken(&self, value: i16) -> bool {
        match self {
            Jump::JGT => value > 0,
            Jump::JEQ => value == 0,
            Jump::JGE => value >= 0,
            Jump::JLT => value < 0,
            Jump::JNE => value != 0,
            Jump::JLE => value <= 0,
            Jump::JMP => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
    Value(u16),
    Symbol(String),
}

/// One line of generated assembly
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Asm {
    Comment(String),
    Address(Address),
    Compute {
        dest: Option<Dest>,
        comp: Comp,
        jump: Option<Jump>,
    },
    Label(String),
}

impl fmt::Display for Asm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Asm::Comment(text) => write!(f, "// {}", text),
            Asm::Address(Address::Value(v)) => write!(f, "@{}", v),
            Asm::Address(Address::Symbol(s)) => write!(f, "@{}", s),
            Asm::Compute { dest, comp, jump } => {
                if let Some(d) = dest {
                    write!(f, "{}=", d.mnemonic())?;
                }
                write!(f, "{}", comp.mnemonic())?;
                if let Some(j) = jump {
                    write!(f, ";{:?}", j)?;
                }
                Ok(())
            }
            Asm::Label(name) => write!(f, "({})", name),
        }
    }
}

/// Ordered output of a translation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AsmProgram {
    lines: Vec<Asm>,
}

impl AsmProgram {
    pub fn new() -> Self {
        AsmProgram { lines: Vec::new() }
    }

    pub fn lines(&self) -> &[Asm] {
        &self.lines
    }

    /// Number of emitted lines, comments and labels included
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of lines that occupy ROM
    pub fn instruction_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| matches!(l, Asm::Address(_) | Asm::Compute { .. }))
            .count()
    }

    pub fn comment(&mut self, text: impl Into<String>) {
        self.lines.push(Asm::Comment(text.into()));
    }

    /// @value
    pub fn load(&mut self, value: u16) {
        self.lines.push(Asm::Address(Address::Value(value)));
    }

    /// @symbol
    pub fn load_symbol(&mut self, symbol: impl Into<String>) {
        self.lines.push(Asm::Address(Address::Symbol(symbol.into())));
    }

    /// dest=comp
    pub fn assign(&mut self, dest: Dest, comp: Comp) {
        self.lines.push(Asm::Compute { dest: Some(dest), comp, jump: None });
    }

    /// comp;jump
    pub fn jump(&mut self, comp: Comp, jump: Jump) {
        self.lines.push(Asm::Compute { dest: None, comp, jump: Some(jump) });
    }

    /// (name)
    pub fn label(&mut self, name: impl Into<String>) {
        self.lines.push(Asm::Label(name.into()));
    }

    /// Drop everything emitted after `len` lines
    pub fn truncate(&mut self, len: usize) {
        self.lines.truncate(len);
    }
}

impl fmt::Display for AsmProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lines() {
        let mut asm = AsmProgram::new();
        asm.comment("push constant 7");
        asm.load(7);
        asm.assign(Dest::D, Comp::A);
        asm.load_symbol("SP");
        asm.assign(Dest::AM, Comp::MMinusOne);
        asm.jump(Comp::Zero, Jump::JMP);
        asm.label("LOOP");
        assert_eq!(
            asm.to_string(),
            "// push constant 7\n@7\nD=A\n@SP\nAM=M-1\n0;JMP\n(LOOP)\n"
        );
        assert_eq!(asm.len(), 7);
        assert_eq!(asm.instruction_count(), 5);
    }

    #[test]
    fn test_jump_conditions() {
        assert!(Jump::JEQ.taken(0));
        assert!(!Jump::JEQ.taken(-1));
        assert!(Jump::JNE.taken(-1));
        assert!(Jump::JLT.taken(i16::MIN));
        assert!(Jump::JGE.taken(0));
        assert!(!Jump::JGT.taken(0));
    }

    #[test]
    fn test_every_instruction_form_renders() {
        let dests = [
            (Dest::M, "M"),
            (Dest::D, "D"),
            (Dest::MD, "MD"),
            (Dest::A, "A"),
            (Dest::AM, "AM"),
            (Dest::AD, "AD"),
            (Dest::AMD, "AMD"),
        ];
        for (dest, text) in dests {
            assert_eq!(dest.mnemonic(), text);
        }

        let comps = [
            (Comp::Zero, "0"),
            (Comp::One, "1"),
            (Comp::MinusOne, "-1"),
            (Comp::D, "D"),
            (Comp::A, "A"),
            (Comp::M, "M"),
            (Comp::NotD, "!D"),
            (Comp::NotA, "!A"),
            (Comp::NotM, "!M"),
            (Comp::NegD, "-D"),
            (Comp::NegA, "-A"),
            (Comp::NegM, "-M"),
            (Comp::DPlusOne, "D+1"),
            (Comp::APlusOne, "A+1"),
            (Comp::MPlusOne, "M+1"),
            (Comp::DMinusOne, "D-1"),
            (Comp::AMinusOne, "A-1"),
            (Comp::MMinusOne, "M-1"),
            (Comp::DPlusA, "D+A"),
            (Comp::DPlusM, "D+M"),
            (Comp::DMinusA, "D-A"),
            (Comp::DMinusM, "D-M"),
            (Comp::AMinusD, "A-D"),
            (Comp::MMinusD, "M-D"),
            (Comp::DAndA, "D&A"),
            (Comp::DAndM, "D&M"),
            (Comp::DOrA, "D|A"),
            (Comp::DOrM, "D|M"),
        ];
        for (comp, text) in comps {
            assert_eq!(comp.mnemonic(), text);
            assert_eq!(comp.reads_m(), text.contains('M'));
        }

        let jumps = [Jump::JGT, Jump::JEQ, Jump::JGE, Jump::JLT, Jump::JNE, Jump::JLE, Jump::JMP];
        let rendered: Vec<String> = jumps
            .iter()
            .map(|&jump| Asm::Compute { dest: Some(Dest::AD), comp: Comp::DMinusM, jump: Some(jump) }.to_string())
            .collect();
        assert_eq!(rendered[2], "AD=D-M;JGE");
        assert_eq!(rendered[5], "AD=D-M;JLE");
        assert!(Jump::JLE.taken(0) && !Jump::JLE.taken(1));
        assert!(Jump::JGE.taken(0) && !Jump::JGE.taken(-1));
    }

    #[test]
    fn test_dest_flags() {
        assert!(Dest::AMD.writes_a() && Dest::AMD.writes_m() && Dest::AMD.writes_d());
        assert!(Dest::MD.writes_m() && !Dest::MD.writes_a());
        assert!(Comp::DPlusM.reads_m());
        assert!(!Comp::DPlusA.reads_m());
    }
}
