//! Process-level error type.
//!
//! Every fallible step returns `Result<_, AppError>`; `main` maps the error to
//! an exit code:
//!
//! - `2` input or configuration problems (files, columns, geometry, schema)
//! - `3` empty dataset
//! - `4` output problems (figure, file writes, stdout)

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub const INPUT: u8 = 2;
    pub const EMPTY: u8 = 3;
    pub const OUTPUT: u8 = 4;

    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn input(message: impl Into<String>) -> Self {
        Self::new(Self::INPUT, message)
    }

    pub fn output(message: impl Into<String>) -> Self {
        Self::new(Self::OUTPUT, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
