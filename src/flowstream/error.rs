use std::fmt;

/// Errors that can occur during engine configuration and stream processing
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Invalid construction parameters (window sizes, capacities, field sets)
    ConfigError { message: String },

    /// A configured field index does not match the record schema
    SchemaError {
        message: String,
        field: Option<usize>,
    },

    /// A feature could not be constructed or published
    FeatureError { message: String },

    /// A subscriber rejected a published update
    SubscriberError { message: String },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            EngineError::SchemaError { message, field } => {
                if let Some(index) = field {
                    write!(f, "Schema error at field {}: {}", index, message)
                } else {
                    write!(f, "Schema error: {}", message)
                }
            }
            EngineError::FeatureError { message } => {
                write!(f, "Feature error: {}", message)
            }
            EngineError::SubscriberError { message } => {
                write!(f, "Subscriber error: {}", message)
            }
        }
    }
}

impl std::error::Error for EngineError {}

impl EngineError {
    /// Convenience constructor for configuration faults
    pub fn config(message: impl Into<String>) -> Self {
        EngineError::ConfigError {
            message: message.into(),
        }
    }

    /// Convenience constructor for schema violations at a known field index
    pub fn schema_at(field: usize, message: impl Into<String>) -> Self {
        EngineError::SchemaError {
            message: message.into(),
            field: Some(field),
        }
    }
}

/// Result type alias used throughout the engine
pub type Result<T> = std::result::Result<T, EngineError>;
