use std::fmt;
use thiserror::Error;

/// 啟動器的各個階段，用於錯誤訊息與退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchStep {
    CreateEnvironment,
    InstallDependencies,
    RunApplication,
}

impl fmt::Display for LaunchStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LaunchStep::CreateEnvironment => "Virtual environment creation",
            LaunchStep::InstallDependencies => "Dependency installation",
            LaunchStep::RunApplication => "Application",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum ExtractorError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV output error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("{step} failed with exit code {code}")]
    LaunchStepFailed { step: LaunchStep, code: i32 },

    #[error("Failed to start '{program}': {source}")]
    SpawnError {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Data,
    Process,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ExtractorError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ExtractorError::HttpError(_) => ErrorCategory::Network,
            ExtractorError::ConfigError { .. }
            | ExtractorError::MissingConfigError { .. }
            | ExtractorError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ExtractorError::CsvError(_)
            | ExtractorError::SerializationError(_)
            | ExtractorError::ProcessingError { .. } => ErrorCategory::Data,
            ExtractorError::LaunchStepFailed { .. } | ExtractorError::SpawnError { .. } => {
                ErrorCategory::Process
            }
            ExtractorError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Process | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 程序退出碼：啟動步驟失敗時沿用子程序的退出碼
    pub fn exit_code(&self) -> i32 {
        match self {
            ExtractorError::LaunchStepFailed { code, .. } => *code,
            ExtractorError::SpawnError { .. } => 127,
            _ => match self.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            },
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ExtractorError::HttpError(e) if e.is_timeout() => {
                "The remote page took too long to respond".to_string()
            }
            ExtractorError::HttpError(e) if e.is_status() => match e.status() {
                Some(status) => format!("The remote page answered with status {}", status),
                None => "The remote page answered with an error status".to_string(),
            },
            ExtractorError::HttpError(_) => "Could not reach the remote page".to_string(),
            ExtractorError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            ExtractorError::MissingConfigError { field } => {
                format!("Missing required setting '{}'", field)
            }
            ExtractorError::LaunchStepFailed { step, code } => {
                format!("{} failed (exit code {})", step, code)
            }
            ExtractorError::SpawnError { program, .. } => {
                format!("Could not start '{}'", program)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ExtractorError::HttpError(_) => "Check the URL and your network connection, then retry",
            ExtractorError::ConfigError { .. }
            | ExtractorError::MissingConfigError { .. }
            | ExtractorError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command-line flags and try again"
            }
            ExtractorError::LaunchStepFailed {
                step: LaunchStep::CreateEnvironment,
                ..
            } => "Make sure python3 with the venv module is installed",
            ExtractorError::LaunchStepFailed {
                step: LaunchStep::InstallDependencies,
                ..
            } => "Check requirements.txt and your network connection, or delete the venv directory and retry",
            ExtractorError::LaunchStepFailed { .. } => "See the application output above",
            ExtractorError::SpawnError { .. } => "Make sure the program exists and is on PATH",
            ExtractorError::IoError(_) => "Check file permissions and available disk space",
            _ => "Re-run with --verbose for more details",
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractorError>;
