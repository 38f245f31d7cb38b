//! The item request entity and its identifiers.
//!
//! The JSON shape of [`ItemRequest`] is the record shape clients see:
//!
//! ```json
//! {
//!   "id": "6f1c2b9e-8d1a-4c3e-9f7a-2b5d4e6f8a0c",
//!   "requestorName": "Ada Lovelace",
//!   "itemRequested": "Standing desk",
//!   "requestCreatedDate": "2024-05-01T12:00:00Z",
//!   "lastEditedDate": "2024-05-01T12:00:00Z",
//!   "status": "pending"
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::validation::ValidationError;

/// Opaque identifier of an item request, assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Borrow the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Parse an identifier from its textual form.
    ///
    /// Returns `None` if `value` is not a well-formed identifier. This is a
    /// format check only; it says nothing about whether a record exists.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Uuid::parse_str(value).ok().map(Self)
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle status of an item request.
///
/// No transition graph is enforced: a request may move from any status to
/// any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Newly submitted, awaiting review. Every request starts here.
    Pending,
    /// Accepted by staff.
    Approved,
    /// Item has been handed over.
    Completed,
    /// Declined by staff.
    Rejected,
}

impl RequestStatus {
    /// Every status, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Approved,
        Self::Completed,
        Self::Rejected,
    ];

    /// Wire and database representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }

    /// Parse a status from its wire representation.
    ///
    /// Matching is exact: `"approved"` parses, `"Approved"` and `" approved"` do not.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == value)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ValidationError::UnknownStatus(s.to_string()))
    }
}

/// A persisted item request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequest {
    /// Store-assigned identifier
    pub id: RequestId,
    /// Who asked (3-30 characters)
    pub requestor_name: String,
    /// What they asked for (2-100 characters)
    pub item_requested: String,
    /// Set once at creation
    pub request_created_date: DateTime<Utc>,
    /// Set at creation, overwritten by every status edit
    pub last_edited_date: DateTime<Utc>,
    /// Current lifecycle status
    pub status: RequestStatus,
}

/// Validated input for creating a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItemRequest {
    /// Trimmed requestor name
    pub requestor_name: String,
    /// Trimmed item description
    pub item_requested: String,
}

/// Validated input for a status edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusEdit {
    /// Target request
    pub id: RequestId,
    /// New status
    pub status: RequestStatus,
}

/// A request ready to be inserted, minus the id the store will assign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDraft {
    /// Requestor name
    pub requestor_name: String,
    /// Item description
    pub item_requested: String,
    /// Initial status
    pub status: RequestStatus,
    /// Creation time, also used as the initial last-edited time
    pub created_at: DateTime<Utc>,
}

impl RequestDraft {
    /// Build a draft in the [`RequestStatus::Pending`] state.
    #[must_use]
    pub fn pending(input: NewItemRequest, now: DateTime<Utc>) -> Self {
        Self {
            requestor_name: input.requestor_name,
            item_requested: input.item_requested,
            status: RequestStatus::Pending,
            created_at: now,
        }
    }

    /// Materialize the draft under the given id.
    #[must_use]
    pub fn into_request(self, id: RequestId) -> ItemRequest {
        ItemRequest {
            id,
            requestor_name: self.requestor_name,
            item_requested: self.item_requested,
            request_created_date: self.created_at,
            last_edited_date: self.created_at,
            status: self.status,
        }
    }
}
