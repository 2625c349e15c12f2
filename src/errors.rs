use thiserror::Error;

#[derive(Debug, Error)]
pub enum BenchDeltaError {
    #[error("io error: {0}")]
    Io(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl BenchDeltaError {
    pub fn io<T: Into<String>>(msg: T) -> Self {
        BenchDeltaError::Io(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        BenchDeltaError::Config(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        BenchDeltaError::Serialization(msg.into())
    }
}

impl From<std::io::Error> for BenchDeltaError {
    fn from(err: std::io::Error) -> Self {
        BenchDeltaError::io(err.to_string())
    }
}

impl From<serde_json::Error> for BenchDeltaError {
    fn from(err: serde_json::Error) -> Self {
        BenchDeltaError::serialization(err.to_string())
    }
}
