//! Command-line arguments and the run configuration resolved from them

use std::path::{Path, PathBuf};

use clap::Parser;
use log::LevelFilter;

use crate::logger::{self, LOG_ENV};

#[derive(Debug, Parser)]
#[command(name = "vmtranslator", version, about = "Translate Hack VM code to Hack assembly")]
pub struct Args {
    /// A .vm file or a directory of .vm files
    pub input: PathBuf,

    /// Output file (default: X.asm beside X.vm, or DIR/DIR.asm)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Emit SP=256 and call Sys.init first (default for directories)
    #[arg(long, conflicts_with = "no_bootstrap")]
    pub bootstrap: bool,

    /// Never emit the bootstrap
    #[arg(long)]
    pub no_bootstrap: bool,

    /// Print the parsed commands and stop
    #[arg(long)]
    pub commands: bool,

    /// Execute the result for up to N steps and print the stack
    #[arg(long, value_name = "N")]
    pub run: Option<usize>,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Everything a run needs, with defaults filled in
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub is_dir: bool,
    pub bootstrap: bool,
    pub print_commands: bool,
    pub run_steps: Option<usize>,
    pub log_level: LevelFilter,
}

impl Config {
    pub fn from_args(args: Args) -> Self {
        let env_level = std::env::var(LOG_ENV).ok();
        Self::resolve(args, Path::is_dir, env_level.as_deref())
    }

    fn resolve(args: Args, is_dir: fn(&Path) -> bool, env_level: Option<&str>) -> Self {
        let is_dir = is_dir(&args.input);
        let output = args
            .output
            .clone()
            .unwrap_or_else(|| default_output(&args.input, is_dir));
        let bootstrap = if args.bootstrap {
            true
        } else if args.no_bootstrap {
            false
        } else {
            is_dir
        };

        let log_level = if args.quiet {
            LevelFilter::Error
        } else {
            match args.verbose {
                0 => env_level.and_then(logger::parse_level).unwrap_or(LevelFilter::Warn),
                1 => LevelFilter::Info,
                2 => LevelFilter::Debug,
                _ => LevelFilter::Trace,
            }
        };

        Config {
            input: args.input,
            output,
            is_dir,
            bootstrap,
            print_commands: args.commands,
            run_steps: args.run,
            log_level,
        }
    }
}

/// X.vm -> X.asm; DIR -> DIR/DIR.asm
pub fn default_output(input: &Path, is_dir: bool) -> PathBuf {
    if is_dir {
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "out".to_string());
        input.join(format!("{}.asm", name))
    } else {
        input.with_extension("asm")
    }
}
