use clap::{Parser, Subcommand, ValueEnum};
use loxwalk::config::{Config, Mode, Redeclaration};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "loxwalk")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Tree-walking interpreter for a small Lox-style language", long_about = None)]
pub struct Args {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` wins if set.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(long = "redeclaration", value_name = "POLICY", default_value = "allow", global = true)]
    pub redeclaration: RedeclarationArg,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print every token of FILE
    Tokenize { file: PathBuf },
    /// Print each statement of FILE as an S-expression
    Parse { file: PathBuf },
    /// Run FILE, printing the value of each expression statement
    Evaluate { file: PathBuf },
    /// Run FILE as a program
    Run { file: PathBuf },
    /// Start an interactive session
    Repl,
}

impl Command {
    pub fn mode(&self) -> Mode {
        match self {
            Self::Tokenize { .. } => Mode::Tokenize,
            Self::Parse { .. } => Mode::Parse,
            Self::Evaluate { .. } => Mode::Evaluate,
            Self::Run { .. } => Mode::Run,
            Self::Repl => Mode::Repl,
        }
    }

    pub fn file(&self) -> Option<&Path> {
        match self {
            Self::Tokenize { file }
            | Self::Parse { file }
            | Self::Evaluate { file }
            | Self::Run { file } => Some(file),
            Self::Repl => None,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum RedeclarationArg {
    Allow,
    Warn,
    Deny,
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        let redeclaration = match args.redeclaration {
            RedeclarationArg::Allow => Redeclaration::Allow,
            RedeclarationArg::Warn => Redeclaration::Warn,
            RedeclarationArg::Deny => Redeclaration::Deny,
        };
        Config::new(args.command.mode()).with_redeclaration(redeclaration)
    }
}
