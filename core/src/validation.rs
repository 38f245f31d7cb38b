//! Validation of untrusted request bodies.
//!
//! Handlers hand over raw [`serde_json::Value`]s; nothing reaches the store
//! until it has passed through a [`Validator`]. Each validator returns either
//! the normalized input or a [`ValidationError`] naming what was wrong.
//!
//! Text fields are trimmed before their length is checked, and length is
//! counted in characters (Unicode scalar values), not bytes.

use serde_json::{Map, Value};
use std::ops::RangeInclusive;
use thiserror::Error;

use crate::request::{NewItemRequest, RequestId, RequestStatus, StatusEdit};

/// Allowed length of `requestorName`, in characters.
pub const REQUESTOR_NAME_LEN: RangeInclusive<usize> = 3..=30;

/// Allowed length of `itemRequested`, in characters.
pub const ITEM_REQUESTED_LEN: RangeInclusive<usize> = 2..=100;

/// Why a piece of input was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The body could not be read as JSON at all.
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    /// The body was JSON but not an object.
    #[error("expected a JSON object")]
    NotAnObject,

    /// A required field is absent or null.
    #[error("missing field `{0}`")]
    Missing(&'static str),

    /// A field that must be a string is some other JSON type.
    #[error("field `{0}` must be a string")]
    NotAString(&'static str),

    /// A text field is empty or whitespace only.
    #[error("field `{0}` must not be blank")]
    Blank(&'static str),

    /// A text field is outside its length bounds.
    #[error("field `{field}` must be {min}-{max} characters, got {actual}")]
    Length {
        /// Offending field
        field: &'static str,
        /// Minimum length
        min: usize,
        /// Maximum length
        max: usize,
        /// Length that was supplied
        actual: usize,
    },

    /// A status string is not one of the known statuses.
    #[error("unknown status `{0}`")]
    UnknownStatus(String),

    /// An id string is not a well-formed identifier.
    #[error("invalid id format: {0}")]
    MalformedId(String),
}

/// A schema that turns untrusted JSON into a typed, normalized value.
pub trait Validator {
    /// The normalized value produced on success.
    type Output;

    /// Check `input` against the schema.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered.
    fn validate(&self, input: &Value) -> Result<Self::Output, ValidationError>;
}

/// Schema for the create operation: `{requestorName, itemRequested}`.
///
/// Any other fields, `status` included, are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateRequestSchema;

impl Validator for CreateRequestSchema {
    type Output = NewItemRequest;

    fn validate(&self, input: &Value) -> Result<NewItemRequest, ValidationError> {
        let object = as_object(input)?;
        Ok(NewItemRequest {
            requestor_name: bounded_text(object, "requestorName", &REQUESTOR_NAME_LEN)?,
            item_requested: bounded_text(object, "itemRequested", &ITEM_REQUESTED_LEN)?,
        })
    }
}

/// Schema for the edit-status operation: `{id, status}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EditStatusSchema;

impl Validator for EditStatusSchema {
    type Output = StatusEdit;

    fn validate(&self, input: &Value) -> Result<StatusEdit, ValidationError> {
        let object = as_object(input)?;

        let raw_id = required_str(object, "id")?;
        if raw_id.trim().is_empty() {
            return Err(ValidationError::Blank("id"));
        }
        let id = RequestId::parse(raw_id)
            .ok_or_else(|| ValidationError::MalformedId(raw_id.to_string()))?;

        let raw_status = required_str(object, "status")?;
        if raw_status.trim().is_empty() {
            return Err(ValidationError::Blank("status"));
        }
        let status = raw_status.parse::<RequestStatus>()?;

        Ok(StatusEdit { id, status })
    }
}

/// Validate a create body.
///
/// # Errors
///
/// See [`CreateRequestSchema`].
pub fn validate_create(input: &Value) -> Result<NewItemRequest, ValidationError> {
    CreateRequestSchema.validate(input)
}

/// Validate an edit-status body.
///
/// # Errors
///
/// See [`EditStatusSchema`].
pub fn validate_edit_status(input: &Value) -> Result<StatusEdit, ValidationError> {
    EditStatusSchema.validate(input)
}

/// Whether `value` is exactly one of the known status strings.
#[must_use]
pub fn is_valid_status(value: &str) -> bool {
    RequestStatus::parse(value).is_some()
}

/// Whether `value` is a well-formed store identifier.
///
/// Does not check that a record with this id exists.
#[must_use]
pub fn is_valid_id(value: &str) -> bool {
    RequestId::parse(value).is_some()
}

fn as_object(input: &Value) -> Result<&Map<String, Value>, ValidationError> {
    input.as_object().ok_or(ValidationError::NotAnObject)
}

fn required_str<'a>(
    object: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, ValidationError> {
    match object.get(field) {
        None | Some(Value::Null) => Err(ValidationError::Missing(field)),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(ValidationError::NotAString(field)),
    }
}

fn bounded_text(
    object: &Map<String, Value>,
    field: &'static str,
    bounds: &RangeInclusive<usize>,
) -> Result<String, ValidationError> {
    let trimmed = required_str(object, field)?.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Blank(field));
    }

    let actual = trimmed.chars().count();
    if !bounds.contains(&actual) {
        return Err(ValidationError::Length {
            field,
            min: *bounds.start(),
            max: *bounds.end(),
            actual,
        });
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn create_accepts_and_trims() {
        let input = json!({ "requestorName": "  Ada Lovelace ", "itemRequested": "Standing desk" });
        let valid = validate_create(&input).unwrap();
        assert_eq!(valid.requestor_name, "Ada Lovelace");
        assert_eq!(valid.item_requested, "Standing desk");
    }

    #[test]
    fn create_ignores_status() {
        let input = json!({
            "requestorName": "Ada Lovelace",
            "itemRequested": "Standing desk",
            "status": "approved"
        });
        assert!(validate_create(&input).is_ok());
    }

    #[test]
    fn create_requires_both_fields() {
        assert_eq!(
            validate_create(&json!({ "itemRequested": "Desk" })),
            Err(ValidationError::Missing("requestorName"))
        );
        assert_eq!(
            validate_create(&json!({ "requestorName": "Ada", "itemRequested": null })),
            Err(ValidationError::Missing("itemRequested"))
        );
    }

    #[test]
    fn create_rejects_non_strings_and_non_objects() {
        assert_eq!(
            validate_create(&json!({ "requestorName": 42, "itemRequested": "Desk" })),
            Err(ValidationError::NotAString("requestorName"))
        );
        assert_eq!(validate_create(&json!(["Ada", "Desk"])), Err(ValidationError::NotAnObject));
    }

    #[test]
    fn create_rejects_blank() {
        assert_eq!(
            validate_create(&json!({ "requestorName": "    ", "itemRequested": "Desk" })),
            Err(ValidationError::Blank("requestorName"))
        );
    }

    #[test]
    fn create_length_bounds_are_inclusive() {
        let at = |name: &str, item: &str| {
            validate_create(&json!({ "requestorName": name, "itemRequested": item }))
        };
        assert!(at("Ada", "ok").is_ok());
        assert!(at(&"a".repeat(30), &"b".repeat(100)).is_ok());
        assert_eq!(
            at("Al", "ok"),
            Err(ValidationError::Length { field: "requestorName", min: 3, max: 30, actual: 2 })
        );
        assert!(at(&"a".repeat(31), "ok").is_err());
        assert!(at("Ada", "x").is_err());
        assert!(at("Ada", &"b".repeat(101)).is_err());
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // Three characters, six bytes.
        assert!(validate_create(&json!({ "requestorName": "éàü", "itemRequested": "ok" })).is_ok());
    }

    #[test]
    fn edit_status_accepts_valid_input() {
        let id = RequestId::new();
        let edit = validate_edit_status(&json!({ "id": id.to_string(), "status": "approved" })).unwrap();
        assert_eq!(edit, StatusEdit { id, status: RequestStatus::Approved });
    }

    #[test]
    fn edit_status_rejects_bad_id() {
        assert_eq!(
            validate_edit_status(&json!({ "id": "123", "status": "approved" })),
            Err(ValidationError::MalformedId("123".to_string()))
        );
        assert_eq!(
            validate_edit_status(&json!({ "status": "approved" })),
            Err(ValidationError::Missing("id"))
        );
    }

    #[test]
    fn edit_status_rejects_bad_status() {
        let id = RequestId::new().to_string();
        assert_eq!(
            validate_edit_status(&json!({ "id": id, "status": "" })),
            Err(ValidationError::Blank("status"))
        );
        assert_eq!(
            validate_edit_status(&json!({ "id": id, "status": "APPROVED" })),
            Err(ValidationError::UnknownStatus("APPROVED".to_string()))
        );
    }

    #[test]
    fn membership_helpers() {
        assert!(is_valid_status("completed"));
        assert!(!is_valid_status("bogus"));
        assert!(is_valid_id(&RequestId::new().to_string()));
        assert!(!is_valid_id("zzzz"));
    }

    proptest! {
        #[test]
        fn short_or_long_names_are_rejected(len in prop_oneof![1usize..3, 31usize..64]) {
            let name = "n".repeat(len);
            let result = validate_create(&json!({ "requestorName": name, "itemRequested": "Desk" }));
            let is_length_error = matches!(result, Err(ValidationError::Length { field: "requestorName", .. }));
            prop_assert!(is_length_error);
        }

        #[test]
        fn in_bounds_names_are_accepted(name in "[A-Za-z][A-Za-z ]{1,28}[A-Za-z]") {
            let result = validate_create(&json!({ "requestorName": name, "itemRequested": "Desk" }));
            prop_assert!(result.is_ok());
        }
    }
}
