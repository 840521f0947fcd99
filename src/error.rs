use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Gateway declined the request (IsoCode {}): {message}", .iso_code.as_deref().unwrap_or("none"))]
    Declined {
        iso_code: Option<String>,
        message: String,
    },
    #[error("Gateway approved the request but returned no DataVaultToken")]
    MissingToken,
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GatewayError>;

/// The constraint a field failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    Missing,
    WrongType { expected: &'static str },
    MinLength { min: usize, actual: usize },
    MaxLength { max: usize, actual: usize },
    ExactLength { expected: usize, actual: usize },
    Charset { allowed: &'static str },
    DisallowedCharacter(char),
    NotInEnumeration { allowed: &'static [&'static str] },
    FixedValue { expected: &'static str },
    ConflictsWith(&'static str),
    OutOfRange(&'static str),
    NotAllowed(&'static str),
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Missing => write!(f, "required field is missing"),
            Constraint::WrongType { expected } => write!(f, "expected {expected}"),
            Constraint::MinLength { min, actual } => {
                write!(f, "must be at least {min} characters (got {actual})")
            }
            Constraint::MaxLength { max, actual } => {
                write!(f, "must be at most {max} characters (got {actual})")
            }
            Constraint::ExactLength { expected, actual } => {
                write!(f, "must be exactly {expected} characters (got {actual})")
            }
            Constraint::Charset { allowed } => write!(f, "must contain only {allowed}"),
            Constraint::DisallowedCharacter(c) => write!(f, "must not contain {c:?}"),
            Constraint::NotInEnumeration { allowed } => {
                write!(f, "must be one of {}", allowed.join(", "))
            }
            Constraint::FixedValue { expected } => write!(f, "must be {expected:?}"),
            Constraint::ConflictsWith(other) => write!(f, "must not be sent together with {other}"),
            Constraint::OutOfRange(reason) => write!(f, "{reason}"),
            Constraint::NotAllowed(reason) => write!(f, "{reason}"),
        }
    }
}

/// A single field that failed validation, keyed by its input path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub constraint: Constraint,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, constraint: Constraint) -> Self {
        Self {
            field: field.into(),
            constraint,
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.constraint)
    }
}

/// Every violation found in one input record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }

    pub fn single(field: impl Into<String>, constraint: Constraint) -> Self {
        Self::new(vec![FieldViolation::new(field, constraint)])
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Returns the constraint violated by `field`, if any.
    pub fn constraint_for(&self, field: &str) -> Option<&Constraint> {
        self.violations
            .iter()
            .find(|v| v.field == field)
            .map(|v| &v.constraint)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed: ")?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_lists_every_violation() {
        let err = ValidationError::new(vec![
            FieldViolation::new("cardNumber", Constraint::Charset { allowed: "digits" }),
            FieldViolation::new("CVC", Constraint::Missing),
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: cardNumber: must contain only digits; CVC: required field is missing"
        );
        assert_eq!(err.constraint_for("CVC"), Some(&Constraint::Missing));
        assert_eq!(err.constraint_for("expiration"), None);
    }

    #[test]
    fn test_declined_without_iso_code() {
        let err = GatewayError::Declined {
            iso_code: None,
            message: "VALIDATION_ERROR:Store".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Gateway declined the request (IsoCode none): VALIDATION_ERROR:Store"
        );
    }
}
