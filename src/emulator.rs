//! Hack CPU reference machine
//!
//! Loads an [`AsmProgram`] directly (no binary encoding step), resolves its
//! symbols the way the Hack assembler does and executes it one instruction
//! at a time. Words are 16-bit and arithmetic wraps.

use std::collections::HashMap;

use log::trace;

use crate::asm::{Address, Asm, AsmProgram, Comp, Dest, Jump};
use crate::error::EmulatorError;

pub use crate::asm::STACK_BASE;

/// First RAM cell handed out to user symbols
pub const VARIABLE_BASE: u16 = 16;
pub const RAM_SIZE: usize = 0x8000;
pub const ROM_SIZE: usize = 0x8000;

const PREDEFINED: [(&str, u16); 7] = [
    ("SP", 0),
    ("LCL", 1),
    ("ARG", 2),
    ("THIS", 3),
    ("THAT", 4),
    ("SCREEN", 0x4000),
    ("KBD", 0x6000),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Instr {
    Load(u16),
    Compute {
        dest: Option<Dest>,
        comp: Comp,
        jump: Option<Jump>,
    },
}

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    /// PC moved past the last instruction
    Finished,
    /// Reached a jump to itself (`(X) @X 0;JMP`)
    Looping,
    StepLimit,
}

pub struct Machine {
    rom: Vec<Instr>,
    ram: Vec<i16>,
    a: i16,
    d: i16,
    pc: usize,
}

fn predefined(symbol: &str) -> Option<u16> {
    if let Some(&(_, addr)) = PREDEFINED.iter().find(|(name, _)| *name == symbol) {
        return Some(addr);
    }
    let reg = symbol.strip_prefix('R')?;
    match reg.parse::<u16>() {
        Ok(n) if n < 16 && n.to_string() == reg => Some(n),
        _ => None,
    }
}

fn eval(comp: Comp, a: i16, d: i16, m: i16) -> i16 {
    match comp {
        Comp::Zero => 0,
        Comp::One => 1,
        Comp::MinusOne => -1,
        Comp::D => d,
        Comp::A => a,
        Comp::M => m,
        Comp::NotD => !d,
        Comp::NotA => !a,
        Comp::NotM => !m,
        Comp::NegD => d.wrapping_neg(),
        Comp::NegA => a.wrapping_neg(),
        Comp::NegM => m.wrapping_neg(),
        Comp::DPlusOne => d.wrapping_add(1),
        Comp::APlusOne => a.wrapping_add(1),
        Comp::MPlusOne => m.wrapping_add(1),
        Comp::DMinusOne => d.wrapping_sub(1),
        Comp::AMinusOne => a.wrapping_sub(1),
        Comp::MMinusOne => m.wrapping_sub(1),
        Comp::DPlusA => d.wrapping_add(a),
        Comp::DPlusM => d.wrapping_add(m),
        Comp::DMinusA => d.wrapping_sub(a),
        Comp::DMinusM => d.wrapping_sub(m),
        Comp::AMinusD => a.wrapping_sub(d),
        Comp::MMinusD => m.wrapping_sub(d),
        Comp::DAndA => d & a,
        Comp::DAndM => d & m,
        Comp::DOrA => d | a,
        Comp::DOrM => d | m,
    }
}

impl Machine {
    /// Resolve labels and variables and load the program into ROM
    pub fn load(program: &AsmProgram) -> Result<Self, EmulatorError> {
        // First pass: label addresses
        let mut symbols: HashMap<String, u16> = HashMap::new();
        let mut rom_len = 0usize;
        for line in program.lines() {
            match line {
                Asm::Label(name) => {
                    if symbols.insert(name.clone(), rom_len as u16).is_some() {
                        return Err(EmulatorError::DuplicateLabel(name.clone()));
                    }
                }
                Asm::Address(_) | Asm::Compute { .. } => rom_len += 1,
                Asm::Comment(_) => {}
            }
        }
        if rom_len > ROM_SIZE {
            return Err(EmulatorError::ProgramTooLarge(rom_len));
        }

        // Second pass: instructions, with variables allocated on first use
        let mut next_variable = VARIABLE_BASE;
        let mut rom = Vec::with_capacity(rom_len);
        for line in program.lines() {
            match line {
                Asm::Address(Address::Value(v)) => rom.push(Instr::Load(*v)),
                Asm::Address(Address::Symbol(s)) => {
                    let value = match predefined(s).or_else(|| symbols.get(s).copied()) {
                        Some(v) => v,
                        None => {
                            let v = next_variable;
                            next_variable += 1;
                            symbols.insert(s.clone(), v);
                            v
                        }
                    };
                    rom.push(Instr::Load(value));
                }
                Asm::Compute { dest, comp, jump } => rom.push(Instr::Compute {
                    dest: *dest,
                    comp: *comp,
                    jump: *jump,
                }),
                Asm::Label(_) | Asm::Comment(_) => {}
            }
        }

        Ok(Machine {
            rom,
            ram: vec![0; RAM_SIZE],
            a: 0,
            d: 0,
            pc: 0,
        })
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn ram(&self, address: u16) -> i16 {
        self.ram.get(address as usize).copied().unwrap_or(0)
    }

    pub fn set_ram(&mut self, address: u16, value: i16) {
        if let Some(cell) = self.ram.get_mut(address as usize) {
            *cell = value;
        }
    }

    /// Cells from the stack base up to (not including) SP
    pub fn stack(&self) -> &[i16] {
        let sp = (self.ram[0].max(0) as usize).min(RAM_SIZE);
        let base = STACK_BASE as usize;
        if sp <= base {
            &[]
        } else {
            &self.ram[base..sp]
        }
    }

    fn cell(&self, address: i16) -> Result<usize, EmulatorError> {
        if address < 0 || address as usize >= RAM_SIZE {
            Err(EmulatorError::AddressOutOfRange { address: address as i32, pc: self.pc })
        } else {
            Ok(address as usize)
        }
    }

    /// Execute one instruction; `Some` when the machine stopped
    pub fn step(&mut self) -> Result<Option<Halt>, EmulatorError> {
        let instr = match self.rom.get(self.pc) {
            Some(i) => *i,
            None => return Ok(Some(Halt::Finished)),
        };

        match instr {
            Instr::Load(value) => {
                self.a = value as i16;
                self.pc += 1;
            }
            Instr::Compute { dest, comp, jump } => {
                let a = self.a;
                let m = if comp.reads_m() { self.ram[self.cell(a)?] } else { 0 };
                let value = eval(comp, a, self.d, m);

                if let Some(dest) = dest {
                    if dest.writes_m() {
                        let cell = self.cell(a)?;
                        self.ram[cell] = value;
                    }
                    if dest.writes_a() {
                        self.a = value;
                    }
                    if dest.writes_d() {
                        self.d = value;
                    }
                }

                match jump {
                    Some(j) if j.taken(value) => {
                        let target = a as u16 as usize;
                        let self_loop = dest.is_none()
                            && target + 1 == self.pc
                            && self.rom.get(target) == Some(&Instr::Load(target as u16));
                        self.pc = target;
                        if self_loop {
                            return Ok(Some(Halt::Looping));
                        }
                    }
                    _ => self.pc += 1,
                }
            }
        }
        Ok(None)
    }

    pub fn run(&mut self, max_steps: usize) -> Result<Halt, EmulatorError> {
        for _ in 0..max_steps {
            if let Some(halt) = self.step()? {
                trace!("halted ({:?}) at pc {}", halt, self.pc);
                return Ok(halt);
            }
        }
        Ok(Halt::StepLimit)
    }
}
