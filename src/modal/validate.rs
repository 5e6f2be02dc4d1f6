//! Form validation for modal confirmation.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;
use validator::Validate;

/// Per-field validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{} field(s) failed validation", .fields.len())]
pub struct FieldErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn with(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.add(field, message);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut out = Self::new();
        for (field, errs) in errors.field_errors() {
            for err in errs.iter() {
                let message = err
                    .message
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| err.code.to_string());
                out.add(field.to_string(), message);
            }
        }
        out
    }
}

/// Something a modal can validate before it confirms, typically the form
/// rendered inside it.
#[async_trait]
pub trait Validatable: Send + Sync {
    type Values: Send;

    /// Validate every field and return the collected values.
    async fn validate_fields(&self) -> Result<Self::Values, FieldErrors>;
}

/// A [`Validatable`] over any `validator::Validate` value. The renderer
/// updates the values as the user types; confirmation validates a snapshot.
#[derive(Debug, Default)]
pub struct ValidatedForm<T> {
    values: Mutex<T>,
}

impl<T: Clone> ValidatedForm<T> {
    pub fn new(initial: T) -> Self {
        Self {
            values: Mutex::new(initial),
        }
    }

    pub fn values(&self) -> T {
        self.values.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn set(&self, values: T) {
        *self.values.lock().unwrap_or_else(|e| e.into_inner()) = values;
    }

    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.values.lock().unwrap_or_else(|e| e.into_inner()));
    }
}

#[async_trait]
impl<T> Validatable for ValidatedForm<T>
where
    T: Validate + Clone + Send + 'static,
{
    type Values = T;

    async fn validate_fields(&self) -> Result<T, FieldErrors> {
        let snapshot = self.values();
        snapshot.validate().map_err(FieldErrors::from)?;
        Ok(snapshot)
    }
}
