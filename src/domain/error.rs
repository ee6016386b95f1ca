use thiserror::Error;

/// Errors raised by entity validation, repositories and services
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid ID format: {message}")]
    InvalidId { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

macro_rules! constructors {
    ($($name:ident => $variant:ident),+ $(,)?) => {
        $(
            pub fn $name(message: impl Into<String>) -> Self {
                Self::$variant { message: message.into() }
            }
        )+
    };
}

impl DomainError {
    constructors! {
        not_found => NotFound,
        validation => Validation,
        invalid_id => InvalidId,
        conflict => Conflict,
        configuration => Configuration,
        storage => Storage,
        internal => Internal,
    }

    /// Check that `value` lies in `min..=max`, naming the offending field otherwise
    pub fn check_range(field: &str, value: i32, min: i32, max: i32) -> Result<(), Self> {
        if (min..=max).contains(&value) {
            return Ok(());
        }

        Err(Self::validation(format!(
            "'{}' must be between {} and {}, got {}",
            field, min, max, value
        )))
    }

    /// The message without the variant prefix
    pub fn message(&self) -> &str {
        match self {
            Self::NotFound { message }
            | Self::Validation { message }
            | Self::InvalidId { message }
            | Self::Conflict { message }
            | Self::Configuration { message }
            | Self::Storage { message }
            | Self::Internal { message } => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("Department '7' not found");
        assert_eq!(error.to_string(), "Not found: Department '7' not found");
    }

    #[test]
    fn test_message_strips_prefix() {
        let error = DomainError::storage("pool closed");

        assert_eq!(error.to_string(), "Storage error: pool closed");
        assert_eq!(error.message(), "pool closed");
    }

    #[test]
    fn test_check_range_bounds_inclusive() {
        assert!(DomainError::check_range("stress", 0, 0, 6).is_ok());
        assert!(DomainError::check_range("stress", 6, 0, 6).is_ok());
    }

    #[test]
    fn test_check_range_reports_field() {
        let err = DomainError::check_range("fortitude", 7, 0, 5).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: 'fortitude' must be between 0 and 5, got 7"
        );
        assert!(DomainError::check_range("x", -1, 0, 27).is_err());
    }
}
