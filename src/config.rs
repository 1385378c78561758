/// Which pipeline stages run and what gets written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Scan only; list every token.
    Tokenize,
    /// Scan and parse; print each statement as an S-expression.
    Parse,
    /// Run each statement and print every expression statement's value.
    Evaluate,
    /// Run the program; only `print` produces output.
    Run,
    /// Interactive session: strict like `Run`, echoing like `Evaluate`.
    Repl,
}

impl Mode {
    pub fn requires_semicolons(self) -> bool {
        matches!(self, Mode::Run | Mode::Repl)
    }

    pub fn echoes_values(self) -> bool {
        matches!(self, Mode::Evaluate | Mode::Repl)
    }
}

/// What to do about `var x` declared twice in one scope before `x` is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Redeclaration {
    #[default]
    Allow,
    Warn,
    Deny,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub mode: Mode,
    pub redeclaration: Redeclaration,
}

impl Config {
    pub fn new(mode: Mode) -> Self {
        Config {
            mode,
            redeclaration: Redeclaration::default(),
        }
    }

    pub fn with_redeclaration(mut self, redeclaration: Redeclaration) -> Self {
        self.redeclaration = redeclaration;
        self
    }
}
