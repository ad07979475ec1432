//! vmtranslator - Hack VM to Hack assembly translator

mod asm;
mod codegen;
mod command;
mod config;
mod emulator;
mod error;
mod lexer;
mod logger;
mod parser;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser as _;
use log::{info, warn};

use codegen::CodeGen;
use config::{Args, Config};
use emulator::{Halt, Machine};
use error::TranslateError;
use lexer::{Lexer, SourceLine};
use parser::Parser;

/// One source unit: display name and its cleaned lines
struct Unit {
    name: String,
    lines: Vec<SourceLine>,
}

fn main() {
    let config = Config::from_args(Args::parse());
    logger::init(config.log_level);

    if let Err(e) = run(&config) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(config: &Config) -> Result<(), TranslateError> {
    let units = load_units(&config.input, config.is_dir)?;

    if config.print_commands {
        return print_commands(&units);
    }

    let mut gen = CodeGen::new();
    if config.bootstrap {
        gen.bootstrap();
    }
    for unit in &units {
        info!("translating {} ({} commands)", unit.name, unit.lines.len());
        gen.translate_unit(&unit.name, &unit.lines)?;
    }
    let program = gen.finish();
    if program.is_empty() {
        warn!("no commands found in {}", config.input.display());
    }

    // Written only once every unit translated cleanly
    fs::write(&config.output, program.to_string()).map_err(|source| TranslateError::Io {
        path: config.output.clone(),
        source,
    })?;
    println!(
        "Translated {} unit(s): {} instructions to {}",
        units.len(),
        program.instruction_count(),
        config.output.display()
    );

    if let Some(steps) = config.run_steps {
        let mut machine = Machine::load(&program)?;
        if !config.bootstrap {
            machine.set_ram(0, emulator::STACK_BASE as i16);
        }
        let halt = machine.run(steps)?;
        if halt == Halt::StepLimit {
            warn!("stopped after {} steps", steps);
        }
        println!("Halt: {:?} at pc {}", halt, machine.pc());
        println!("SP: {}", machine.ram(0));
        println!("Stack: {:?}", machine.stack());
    }

    Ok(())
}

fn read_unit(path: &Path) -> Result<Unit, TranslateError> {
    let source = fs::read_to_string(path).map_err(|source| TranslateError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(Unit {
        name,
        lines: Lexer::new(&source).lines(),
    })
}

/// A single file, or every .vm file of a directory in name order
fn load_units(input: &Path, is_dir: bool) -> Result<Vec<Unit>, TranslateError> {
    if !is_dir {
        return Ok(vec![read_unit(input)?]);
    }

    let io_err = |source: std::io::Error| TranslateError::Io {
        path: input.to_path_buf(),
        source,
    };
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(input).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "vm") {
            paths.push(path);
        }
    }
    if paths.is_empty() {
        return Err(TranslateError::NoSources(input.to_path_buf()));
    }
    paths.sort();

    paths.iter().map(|p| read_unit(p)).collect()
}

fn print_commands(units: &[Unit]) -> Result<(), TranslateError> {
    for unit in units {
        let commands = Parser::new(&unit.name).parse(&unit.lines)?;
        println!("{}:", unit.name);
        for (line, command) in unit.lines.iter().zip(&commands) {
            println!("  {:4}  {}", line.number, command);
        }
    }
    Ok(())
}
