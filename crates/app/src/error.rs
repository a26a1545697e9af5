#![forbid(unsafe_code)]

use cm_core::DataError;

#[derive(Debug)]
pub(crate) enum AppError {
    Data(DataError),
    ReadOnly,
    InvalidParams(String),
    UnknownMethod(String),
    Internal(String),
}

impl AppError {
    pub(crate) fn rpc_code(&self) -> i64 {
        match self {
            Self::Data(_) | Self::ReadOnly => -32000,
            Self::InvalidParams(_) => -32602,
            Self::UnknownMethod(_) => -32601,
            Self::Internal(_) => -32603,
        }
    }

    /// Machine-readable code carried in `error.data.code` for domain failures.
    pub(crate) fn data_code(&self) -> Option<&'static str> {
        match self {
            Self::Data(err) => Some(err.code()),
            Self::ReadOnly => Some("READ_ONLY"),
            _ => None,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Data(err) => write!(f, "{err}"),
            Self::ReadOnly => f.write_str("読み取り専用モードでは編集できません"),
            Self::InvalidParams(message) => write!(f, "Invalid params: {message}"),
            Self::UnknownMethod(method) => write!(f, "Method not found: {method}"),
            Self::Internal(message) => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<DataError> for AppError {
    fn from(value: DataError) -> Self {
        Self::Data(value)
    }
}
