use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing column '{column}' in {file}{}", line_suffix(.line))]
    MissingColumnError {
        file: String,
        column: String,
        line: Option<u64>,
    },

    #[error("Malformed GeoJSON in {file}: {message}")]
    GeoJsonError { file: String, message: String },

    #[error("No input found: {message}")]
    EmptyInputError { message: String },

    #[error("Failed to write {path}: {source}")]
    OutputError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

fn line_suffix(line: &Option<u64>) -> String {
    match line {
        Some(line) => format!(" (line {})", line),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Processing,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ConfigValidationError { .. } | EtlError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            EtlError::IoError(_) | EtlError::EmptyInputError { .. } => ErrorCategory::Input,
            EtlError::CsvError(_)
            | EtlError::SerializationError(_)
            | EtlError::MissingColumnError { .. }
            | EtlError::GeoJsonError { .. } => ErrorCategory::Processing,
            EtlError::OutputError { .. } => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration | ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Processing => ErrorSeverity::Medium,
            ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    /// Process exit code the binary reports for this error.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::ConfigValidationError { field, .. }
            | EtlError::InvalidConfigValueError { field, .. } => {
                format!("Check the '{}' setting in the configuration file", field)
            }
            EtlError::IoError(_) => {
                "Make sure the input files exist and the working directory is correct".to_string()
            }
            EtlError::EmptyInputError { .. } => {
                "Point [geojson].input_dir at a directory with at least one feature collection"
                    .to_string()
            }
            EtlError::CsvError(_) => "Check the CSV file for an inconsistent header".to_string(),
            EtlError::MissingColumnError { column, .. } => format!(
                "Add a '{}' column to the file or set dedup_column/label_column for this cluster",
                column
            ),
            EtlError::GeoJsonError { file, .. } => {
                format!("Validate {} as a GeoJSON FeatureCollection", file)
            }
            EtlError::SerializationError(_) => "Check the input files for invalid JSON".to_string(),
            EtlError::OutputError { .. } => {
                "Check free disk space and write permissions on the output directory".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Input => format!("Could not read input: {}", self),
            ErrorCategory::Processing => format!("Could not process input data: {}", self),
            ErrorCategory::Output => format!("Could not write output: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
