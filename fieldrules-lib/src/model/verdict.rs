//! Validation results

/// The outcome of evaluating one field.
///
/// A new verdict is produced on every evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verdict {
    /// `Some(true)` if every rule passed, `Some(false)` if one failed,
    /// `None` if no rule was evaluated (the field's chain is empty).
    pub is_valid: Option<bool>,
    /// Message of the first failing rule. Empty when valid, or when the
    /// message catalog has no template for the failing rule.
    pub error_message: String,
}

impl Verdict {
    /// A verdict for a field no rule has been evaluated on.
    pub fn pending() -> Self {
        Self::default()
    }

    /// A passing verdict.
    pub fn valid() -> Self {
        Self {
            is_valid: Some(true),
            error_message: String::new(),
        }
    }

    /// A failing verdict with its message.
    pub fn invalid(error_message: impl Into<String>) -> Self {
        Self {
            is_valid: Some(false),
            error_message: error_message.into(),
        }
    }

    /// Check if the field passed every rule.
    pub fn is_valid(&self) -> bool {
        self.is_valid == Some(true)
    }

    /// Check if a rule failed.
    pub fn is_invalid(&self) -> bool {
        self.is_valid == Some(false)
    }

    /// Check if nothing was evaluated.
    pub fn is_pending(&self) -> bool {
        self.is_valid.is_none()
    }
}

/// Information about a single field validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field name.
    pub field_name: String,
    /// Error message.
    pub message: String,
}

/// Result of validating every field of a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ValidationResult {
    /// All fields passed validation.
    #[default]
    Valid,
    /// One or more fields failed validation.
    Invalid(Vec<FieldError>),
}

impl ValidationResult {
    /// Check if all fields passed validation.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Check if any field failed validation.
    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    /// Get all validation errors.
    pub fn errors(&self) -> &[FieldError] {
        match self {
            Self::Valid => &[],
            Self::Invalid(errors) => errors,
        }
    }

    /// Get the first validation error (if any).
    pub fn first_error(&self) -> Option<&FieldError> {
        self.errors().first()
    }

    /// Get the error of a specific field (if it failed).
    pub fn error_for(&self, field: &str) -> Option<&FieldError> {
        self.errors().iter().find(|e| e.field_name == field)
    }
}

impl From<Vec<FieldError>> for ValidationResult {
    fn from(errors: Vec<FieldError>) -> Self {
        if errors.is_empty() {
            Self::Valid
        } else {
            Self::Invalid(errors)
        }
    }
}
