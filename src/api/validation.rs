use std::fmt::Display;

pub const TITLE_MIN: usize = 3;
pub const TITLE_MAX: usize = 80;
pub const DESCRIPTION_MAX: usize = 180;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new<T: Into<String>>(field: &'static str, message: T) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every failed check of one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(pub Vec<FieldError>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    /// `Ok` when nothing was collected
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        write!(f, "{}", joined)
    }
}

/// Request payloads checked before they reach the service
pub trait Validate {
    fn validate(&self) -> Result<(), FieldErrors>;
}

pub fn check_not_blank(field: &'static str, value: &str, errors: &mut FieldErrors) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "must not be blank"));
    }
}

/// Length is counted in characters, not bytes
pub fn check_size(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
    errors: &mut FieldErrors,
) {
    let len = value.chars().count();

    if len < min || len > max {
        errors.push(FieldError::new(
            field,
            format!("size must be between {} and {}", min, max),
        ));
    }
}

pub fn check_title(title: &str, errors: &mut FieldErrors) {
    check_not_blank("title", title, errors);
    check_size("title", title, TITLE_MIN, TITLE_MAX, errors);
}

pub fn check_description(description: Option<&str>, errors: &mut FieldErrors) {
    if let Some(description) = description {
        check_size("description", description, 0, DESCRIPTION_MAX, errors);
    }
}
