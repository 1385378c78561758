use crate::config::{Config, Mode, Redeclaration};
use crate::expr::{EvalErr, Val};
use crate::parser::{ParseErr, Parser};
use crate::resolver::{Resolver, ResolverErr};
use crate::scanner::{scan, ScanErr};
use crate::scope::ScopeLink;
use crate::statement::Stmt;
use crate::token::Token;
use std::io::{self, Stdout, Write};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InterpretErr {
    #[error("{}", join_lines(.0))]
    ScanErrs(Vec<ScanErr>),
    #[error(transparent)]
    ParseErr(#[from] ParseErr),
    #[error("{}", join_lines(.0))]
    ResolverErrs(Vec<ResolverErr>),
    #[error(transparent)]
    EvalErr(#[from] EvalErr),
}

fn join_lines<T: ToString>(errs: &[T]) -> String {
    errs.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

impl InterpretErr {
    /// Process exit status for this failure: 65 for anything found before
    /// evaluation starts, 70 for runtime errors, 1 if output couldn't be written.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::ScanErrs(_) | Self::ParseErr(_) | Self::ResolverErrs(_) => 65,
            Self::EvalErr(EvalErr::Io(_)) => 1,
            Self::EvalErr(_) => 70,
        }
    }
}

impl From<io::Error> for InterpretErr {
    fn from(value: io::Error) -> Self {
        Self::EvalErr(EvalErr::Io(value))
    }
}

/// One interpreter session: a global scope that lives across `run` calls and
/// the sink that program output goes to.
pub struct Interpreter<W: Write = Stdout> {
    global_scope: ScopeLink,
    config: Config,
    out: W,
}

impl Interpreter {
    pub fn with_config(config: Config) -> Interpreter {
        Interpreter::with_output(config, io::stdout())
    }
}

impl<W: Write> Interpreter<W> {
    pub fn with_output(config: Config, out: W) -> Interpreter<W> {
        Interpreter {
            global_scope: Default::default(),
            config,
            out,
        }
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Runs `code` through the stages selected by the configured mode.
    #[tracing::instrument(level = "debug", skip_all, fields(mode = ?self.config.mode))]
    pub fn run(&mut self, code: &str) -> Result<(), InterpretErr> {
        let (tokens, errs) = scan(code);

        if self.config.mode == Mode::Tokenize {
            self.write_tokens(&tokens)?;
        }
        if !errs.is_empty() {
            return Err(InterpretErr::ScanErrs(errs));
        }
        if self.config.mode == Mode::Tokenize {
            return Ok(());
        }

        let program = Parser::new(&tokens, self.config.mode.requires_semicolons()).parse()?;

        if self.config.mode == Mode::Parse {
            for stmt in program.iter() {
                writeln!(self.out, "{stmt}")?;
            }
            return Ok(());
        }

        if self.config.redeclaration != Redeclaration::Allow {
            Resolver::new(self.config.redeclaration)
                .resolve(&program)
                .map_err(InterpretErr::ResolverErrs)?;
        }

        self.interpret(&program)?;
        Ok(())
    }

    pub fn interpret<'p>(
        &mut self,
        program: impl IntoIterator<Item = &'p Stmt>,
    ) -> Result<(), EvalErr> {
        let echo = self.config.mode.echoes_values();
        for stmt in program.into_iter() {
            tracing::trace!(%stmt, "executing");
            let val = stmt.exec(&self.global_scope, &mut self.out)?;
            if let (true, Some(val)) = (echo, val) {
                writeln!(self.out, "{val}")?;
            }
        }
        Ok(())
    }

    fn write_tokens(&mut self, tokens: &[Token]) -> io::Result<()> {
        for token in tokens {
            writeln!(self.out, "{token}")?;
        }
        Ok(())
    }

    pub fn get_global(&self, id: &str) -> Option<Val> {
        (*self.global_scope).borrow().try_get_here(id)
    }
}
