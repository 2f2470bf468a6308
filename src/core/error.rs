use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigInvalidJson,

    ValidationMissingArgument,
    ValidationInvalidArgument,

    VersionInvalidFormat,

    FileAccessFailed,
    XmlParseFailed,

    InternalUnexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigInvalidJson => "config.invalid_json",

            ErrorCode::ValidationMissingArgument => "validation.missing_argument",
            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",

            ErrorCode::VersionInvalidFormat => "version.invalid_format",

            ErrorCode::FileAccessFailed => "file.access_failed",
            ErrorCode::XmlParseFailed => "xml.parse_failed",

            ErrorCode::InternalUnexpected => "internal.unexpected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingArgumentDetails {
    pub args: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidVersionDetails {
    pub version: String,
    pub expected: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAccessDetails {
    pub path: String,
    pub operation: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct XmlParseDetails {
    pub path: String,
    pub position: u64,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidJsonDetails {
    pub path: String,
    pub error: String,
}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
        }
    }

    pub fn validation_missing_argument(args: Vec<String>) -> Self {
        Self::new(
            ErrorCode::ValidationMissingArgument,
            "Missing required argument",
            to_details(MissingArgumentDetails { args }),
        )
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
        value: Option<String>,
    ) -> Self {
        Self::new(
            ErrorCode::ValidationInvalidArgument,
            "Invalid argument",
            to_details(InvalidArgumentDetails {
                field: field.into(),
                problem: problem.into(),
                value,
            }),
        )
    }

    pub fn version_invalid_format(version: impl Into<String>) -> Self {
        let version = version.into();
        Self::new(
            ErrorCode::VersionInvalidFormat,
            format!("Bad version number {}", version),
            to_details(InvalidVersionDetails {
                version,
                expected: "major.minor.release".to_string(),
            }),
        )
        .with_hint("Only major.minor.release format is currently supported")
        .with_hint("Usage: stamp-version <version> <project-file> [project-file ...]")
    }

    pub fn file_access(
        path: impl Into<String>,
        operation: impl Into<String>,
        err: impl std::fmt::Display,
    ) -> Self {
        let path = path.into();
        let operation = operation.into();
        Self::new(
            ErrorCode::FileAccessFailed,
            format!("Failed to {} {}: {}", operation, path, err),
            to_details(FileAccessDetails {
                path,
                operation,
                error: err.to_string(),
            }),
        )
    }

    pub fn xml_parse(path: impl Into<String>, position: u64, err: impl std::fmt::Display) -> Self {
        let path = path.into();
        Self::new(
            ErrorCode::XmlParseFailed,
            format!("Invalid XML in {} at position {}: {}", path, position, err),
            to_details(XmlParseDetails {
                path,
                position,
                error: err.to_string(),
            }),
        )
    }

    pub fn config_invalid_json(path: impl Into<String>, err: serde_json::Error) -> Self {
        Self::new(
            ErrorCode::ConfigInvalidJson,
            "Invalid JSON in configuration",
            to_details(ConfigInvalidJsonDetails {
                path: path.into(),
                error: err.to_string(),
            }),
        )
    }

    pub fn internal_unexpected(message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InternalUnexpected,
            message,
            Value::Object(serde_json::Map::new()),
        )
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_invalid_format_carries_hints() {
        let err = Error::version_invalid_format("1.2");
        assert_eq!(err.code.as_str(), "version.invalid_format");
        assert_eq!(err.message, "Bad version number 1.2");
        assert_eq!(err.hints.len(), 2);
        assert_eq!(err.details["version"], "1.2");
    }

    #[test]
    fn file_access_names_path_and_operation() {
        let err = Error::file_access("/tmp/a.dproj", "open", "No such file or directory");
        assert_eq!(err.code, ErrorCode::FileAccessFailed);
        assert!(err.message.contains("/tmp/a.dproj"));
        assert_eq!(err.details["operation"], "open");
    }
}
