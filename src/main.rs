mod cli;

use std::{
    fs,
    io::{self, stdin, IsTerminal},
    path::Path,
    process::ExitCode,
};

use clap::Parser;
use cli::Args;
use loxwalk::config::Config;
use loxwalk::interpreter::Interpreter;
use rustyline::error::ReadlineError;
use rustyline::validate::MatchingBracketValidator;
use rustyline::{
    Cmd, ConditionalEventHandler, Editor, Event, EventContext, EventHandler, KeyEvent, Movement,
    RepeatCount,
};
use rustyline::{Completer, Helper, Highlighter, Hinter, Validator};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            // --help and --version land here too.
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_tracing(args.verbose);
    let config = Config::from(&args);

    match args.command.file() {
        Some(path) => run_file(path, config),
        None => run_prompt(config),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn run_file(path: &Path, config: Config) -> ExitCode {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            eprintln!("Error reading file {}: {err}", path.display());
            return ExitCode::FAILURE;
        }
    };

    let mut interpreter = Interpreter::with_config(config);
    match interpreter.run(&content) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}

struct TabEventHandler;
impl ConditionalEventHandler for TabEventHandler {
    fn handle(&self, _: &Event, _n: RepeatCount, _: bool, _: &EventContext) -> Option<Cmd> {
        Some(Cmd::Indent(Movement::WholeLine))
    }
}

#[derive(Helper, Completer, Hinter, Highlighter, Validator)]
struct ReplHelper {
    #[rustyline(Completer)]
    completer: (),
    #[rustyline(Validator)]
    validator: MatchingBracketValidator,
}

fn run_prompt(config: Config) -> ExitCode {
    let mut interpreter = Interpreter::with_config(config);

    // Piped input runs as a single program.
    if !stdin().is_terminal() {
        let program = match io::read_to_string(stdin().lock()) {
            Ok(program) => program,
            Err(err) => {
                eprintln!("Error reading stdin: {err}");
                return ExitCode::FAILURE;
            }
        };
        return match interpreter.run(&program) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("{err}");
                ExitCode::from(err.exit_code())
            }
        };
    }

    let h = ReplHelper {
        completer: (),
        validator: MatchingBracketValidator::new(),
    };
    let mut rl = match Editor::new() {
        Ok(rl) => rl,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    rl.set_helper(Some(h));
    rl.bind_sequence(
        KeyEvent::from('\t'),
        EventHandler::Conditional(Box::new(TabEventHandler)),
    );

    loop {
        match rl.readline("> ") {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());
                // A failed line leaves the session and its globals intact.
                if let Err(err) = interpreter.run(&line) {
                    eprintln!("{err}");
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        }
    }
}
