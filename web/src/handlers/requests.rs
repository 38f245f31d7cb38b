//! Item request endpoints.
//!
//! - `GET /request` - list one page, optionally filtered by status
//! - `PUT /request` - create a pending request
//! - `PATCH /request` - change a request's status

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};
use item_requests_core::{ItemRequest, ListQuery, Page};
use serde_json::Value;

use crate::{AppState, WebResult};

/// Query parameters for listing requests.
///
/// Both are kept as raw strings: unknown statuses and non-numeric pages are
/// not errors. When a key repeats, its first value is used.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListParams {
    /// Status to filter by; empty or unknown means all
    pub status: Option<String>,
    /// 1-based page number
    pub page: Option<String>,
}

impl ListParams {
    /// Pick `status` and `page` out of decoded query pairs.
    #[must_use]
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "status" => &mut params.status,
                "page" => &mut params.page,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }
}

/// List one page of requests, newest first.
///
/// # Errors
///
/// `500 UNKNOWN_ERROR` if the store fails.
pub async fn list_requests(
    State(state): State<AppState>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> WebResult<Json<Page<ItemRequest>>> {
    let params = pairs.map_or_else(
        |rejection| {
            tracing::debug!(error = %rejection, "Unreadable list query, using defaults");
            ListParams::default()
        },
        |Query(pairs)| ListParams::from_pairs(pairs),
    );

    let query = ListQuery::from_params(params.status.as_deref(), params.page.as_deref());
    let page = state.service.list_requests(query).await?;
    Ok(Json(page))
}

/// Create a new request in the `pending` state.
///
/// # Errors
///
/// - `400 INVALID_INPUT` if the body is not JSON or fails validation
/// - `500 UNKNOWN_ERROR` if the store fails
pub async fn create_request(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> WebResult<(StatusCode, Json<ItemRequest>)> {
    let Json(body) = body?;
    let created = state.service.create_request(&body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Change the status of an existing request.
///
/// # Errors
///
/// - `400 INVALID_INPUT` if the body is invalid or no request has the id
/// - `500 UNKNOWN_ERROR` if the store fails
pub async fn edit_status(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> WebResult<Json<ItemRequest>> {
    let Json(body) = body?;
    let updated = state.service.edit_status(&body).await?;
    Ok(Json(updated))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_first_value_of_a_repeated_key_wins() {
        let params = ListParams::from_pairs(pairs(&[
            ("status", "approved"),
            ("page", "2"),
            ("status", "rejected"),
            ("page", "9"),
        ]));
        assert_eq!(params.status.as_deref(), Some("approved"));
        assert_eq!(params.page.as_deref(), Some("2"));
    }

    #[test]
    fn test_unrelated_keys_are_ignored() {
        let params = ListParams::from_pairs(pairs(&[("sort", "asc"), ("page", "3")]));
        assert_eq!(params.status, None);
        assert_eq!(params.page.as_deref(), Some("3"));
    }
}
