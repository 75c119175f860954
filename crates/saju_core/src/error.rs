use std::fmt;

#[derive(Debug)]
pub enum AnalysisError {
    /// 알 수 없는 천간 이름
    UnknownStem(String),
    /// 알 수 없는 지지 이름
    UnknownBranch(String),
    InvalidPillarCount { expected: usize, found: usize },
    InvalidRequest(String),
    SerializationError(String),
    DeserializationError(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AnalysisError::UnknownStem(name) => {
                write!(f, "Unknown stem: {}", name)
            }
            AnalysisError::UnknownBranch(name) => {
                write!(f, "Unknown branch: {}", name)
            }
            AnalysisError::InvalidPillarCount { expected, found } => {
                write!(f, "Invalid pillar count: expected {}, found {}", expected, found)
            }
            AnalysisError::InvalidRequest(msg) => {
                write!(f, "Invalid request: {}", msg)
            }
            AnalysisError::SerializationError(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            AnalysisError::DeserializationError(msg) => {
                write!(f, "Deserialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for AnalysisError {}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() {
            AnalysisError::DeserializationError(err.to_string())
        } else {
            AnalysisError::SerializationError(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
