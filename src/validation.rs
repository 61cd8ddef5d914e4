use crate::errors::{DomainError, DomainResult, ValidationError};
use regex::Regex;
use std::sync::OnceLock;

/// A trait that inputs crossing into the tree implement for validation.
pub trait Validate {
    /// Validates the value and returns an error if validation fails.
    fn validate(&self) -> DomainResult<()>;
}

// Local capture URIs handed over by the camera layer
fn local_uri_regex() -> &'static Regex {
    static LOCAL_URI_REGEX: OnceLock<Regex> = OnceLock::new();
    LOCAL_URI_REGEX.get_or_init(|| {
        Regex::new(r"^(file|content|ph|assets-library)://\S+$").expect("static regex")
    })
}

/// Struct for configuring validations in a fluent style
#[derive(Default)]
pub struct ValidationBuilder<T> {
    field_name: String,
    value: Option<T>,
    errors: Vec<ValidationError>,
}

impl<T> ValidationBuilder<T> {
    pub fn new(field_name: &str, value: Option<T>) -> Self {
        Self {
            field_name: field_name.to_string(),
            value,
            errors: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self
    where
        T: Default + PartialEq,
    {
        if self.value.is_none() || self.value == Some(T::default()) {
            self.errors.push(ValidationError::required(&self.field_name));
        }
        self
    }

    pub fn validate_with<F>(mut self, validator: F) -> Self
    where
        F: FnOnce(&T) -> Result<(), ValidationError>,
    {
        if let Some(value) = &self.value {
            if let Err(err) = validator(value) {
                self.errors.push(err);
            }
        }
        self
    }

    /// Complete validation and return the first failure
    pub fn validate(self) -> DomainResult<()> {
        match self.errors.into_iter().next() {
            None => Ok(()),
            Some(error) => Err(DomainError::Validation(error)),
        }
    }
}

/// String-specific validations
impl ValidationBuilder<String> {
    pub fn max_length(mut self, max: usize) -> Self {
        if let Some(value) = &self.value {
            if value.chars().count() > max {
                self.errors.push(ValidationError::max_length(&self.field_name, max));
            }
        }
        self
    }

    pub fn matches_pattern(mut self, pattern: &Regex, message: &str) -> Self {
        if let Some(value) = &self.value {
            if !pattern.is_match(value) {
                self.errors.push(ValidationError::format(&self.field_name, message));
            }
        }
        self
    }

    pub fn local_uri(self) -> Self {
        self.matches_pattern(local_uri_regex(), "must be a local file URI")
    }

    /// The value must parse as an `image/*` media type
    pub fn image_mime(mut self) -> Self {
        if let Some(value) = &self.value {
            match value.parse::<mime::Mime>() {
                Ok(parsed) if parsed.type_() == mime::IMAGE => {}
                Ok(_) => self
                    .errors
                    .push(ValidationError::invalid_value(&self.field_name, "must be an image media type")),
                Err(_) => self
                    .errors
                    .push(ValidationError::format(&self.field_name, "must be a valid media type")),
            }
        }
        self
    }
}

/// Numeric validations
impl<T> ValidationBuilder<T>
where
    T: PartialOrd + Clone + std::fmt::Display,
{
    pub fn range(mut self, min: T, max: T) -> Self {
        if let Some(value) = &self.value {
            if value < &min || value > &max {
                self.errors.push(ValidationError::range(&self.field_name, min, max));
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_uri_validation() {
        assert!(local_uri_regex().is_match("file:///var/mobile/photo.jpg"));
        assert!(local_uri_regex().is_match("ph://ABC-123/L0/001"));
        assert!(!local_uri_regex().is_match("https://example.com/a.jpg"));
        assert!(!local_uri_regex().is_match("file://"));
    }

    #[test]
    fn test_validation_builder() {
        let result = ValidationBuilder::new("localUri", Some("".to_string()))
            .required()
            .validate();
        assert!(matches!(
            result,
            Err(DomainError::Validation(ValidationError::Required { .. }))
        ));

        let result = ValidationBuilder::new("mimeType", Some("image/jpeg".to_string()))
            .image_mime()
            .validate();
        assert!(result.is_ok());

        let result = ValidationBuilder::new("mimeType", Some("application/pdf".to_string()))
            .image_mime()
            .validate();
        assert!(result.is_err());

        let result = ValidationBuilder::new("notes", Some("abcdef".to_string()))
            .max_length(5)
            .validate();
        assert!(result.is_err());

        let result = ValidationBuilder::new("formStep", Some(12u8)).range(1, 9).validate();
        assert!(matches!(
            result,
            Err(DomainError::Validation(ValidationError::Range { .. }))
        ));
    }
}
