use crate::analytics::AnalyticsError;

/// Application-level error: a user-facing message plus the process exit code.
///
/// Exit codes:
/// - `2`: input/configuration problems (missing files, bad CSV schema)
/// - `3`: inputs parsed but no usable data remains
/// - `4`: terminal/runtime failures
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
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

impl From<AnalyticsError> for AppError {
    fn from(err: AnalyticsError) -> Self {
        let code = match err {
            AnalyticsError::EmptySeries => 3,
            AnalyticsError::InvalidHorizon(_) => 2,
        };
        AppError::new(code, err.to_string())
    }
}
