use std::error::Error;
use std::fmt::{Display, Formatter};

pub type UcodeResult<T> = Result<T, UcodeError>;
pub type ParserResult<T> = UcodeResult<T>;
pub type TaskResult<T> = UcodeResult<T>;

/// Failure classes, each with its own process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UcodeErrorCategory {
    /// Bad configuration or input tables (exit 2).
    InputValidation,
    /// Unreadable or unwritable files (exit 3).
    IoSystem,
    /// External simulator failures (exit 4).
    Computation,
    /// Broken internal assumptions (exit 5).
    Internal,
}

impl UcodeErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::InputValidation => 2,
            Self::IoSystem => 3,
            Self::Computation => 4,
            Self::Internal => 5,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InputValidation => "input",
            Self::IoSystem => "io",
            Self::Computation => "computation",
            Self::Internal => "internal",
        }
    }
}

/// Categorized failure carried through every workflow task.
///
/// `placeholder` is a stable dotted code (`INPUT.PDATA_START_VALUE`,
/// `IO.JIF_WRITE`, ...) that scripts can match on without parsing messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UcodeError {
    category: UcodeErrorCategory,
    placeholder: &'static str,
    message: String,
}

impl UcodeError {
    fn with_category(
        category: UcodeErrorCategory,
        placeholder: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            placeholder,
            message: message.into(),
        }
    }

    pub fn input_validation(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::with_category(UcodeErrorCategory::InputValidation, placeholder, message)
    }

    pub fn io_system(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::with_category(UcodeErrorCategory::IoSystem, placeholder, message)
    }

    pub fn computation(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::with_category(UcodeErrorCategory::Computation, placeholder, message)
    }

    pub fn internal(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::with_category(UcodeErrorCategory::Internal, placeholder, message)
    }

    /// Same code and category, message suffixed with the file it came from.
    pub fn in_file(self, origin: impl Display) -> Self {
        Self {
            message: format!("{} (in '{}')", self.message, origin),
            ..self
        }
    }

    pub const fn category(&self) -> UcodeErrorCategory {
        self.category
    }

    pub const fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }

    /// `ERROR: [CODE] message`, the first stderr line of a failed run.
    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.placeholder, self.message)
    }

    pub fn exit_line(&self) -> String {
        format!("FATAL EXIT CODE: {}", self.exit_code())
    }
}

impl Display for UcodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} error [{}]: {}",
            self.category.as_str(),
            self.placeholder,
            self.message
        )
    }
}

impl Error for UcodeError {}
