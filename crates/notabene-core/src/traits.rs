//! Repository traits for notabene stores.
//!
//! These traits define the interfaces the Postgres layer implements, and let
//! the reminder scan job be exercised against in-memory fakes in tests.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{EntitlementRequest, Note, OwnerIdentity, ReminderWindow};

/// Request body for creating a note.
///
/// Deliberately has no `id` or owner fields: the store assigns the id and the
/// owner always comes from the authenticated caller, so client-supplied
/// values for either are ignored at the serde boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateNoteRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub reminder: Option<DateTime<Utc>>,
}

/// Request body for updating a note. Same shape as creation; the update is a
/// full replacement of the client-editable fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdateNoteRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub reminder: Option<DateTime<Utc>>,
}

/// Request body for creating an entitlement request.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateEntitlementRequest {
    #[schema(value_type = String, example = "9.99")]
    pub amount: BigDecimal,
    #[serde(default)]
    pub payment_status: bool,
}

/// Repository for note CRUD and reminder-window queries.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Insert a new note owned by `owner`. The id is store-assigned.
    async fn insert(&self, owner: &OwnerIdentity, req: CreateNoteRequest) -> Result<Note>;

    /// Fetch a note by id, scoped to its owner.
    async fn fetch(&self, id: Uuid, owner_id: &str) -> Result<Note>;

    /// Replace the client-editable fields of a note.
    ///
    /// When the new reminder is strictly later than the stored one, the
    /// `email_sent` flag is reset so the rescheduled reminder re-fires.
    async fn update(&self, id: Uuid, owner: &OwnerIdentity, req: UpdateNoteRequest)
        -> Result<Note>;

    /// Delete a note. Deleting an absent id is a no-op.
    async fn delete(&self, id: Uuid, owner_id: &str) -> Result<()>;

    /// All notes for an owner.
    async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<Note>>;

    /// Archived notes for an owner.
    async fn list_archived_for_owner(&self, owner_id: &str) -> Result<Vec<Note>>;

    /// Pinned notes for an owner.
    async fn list_pinned_for_owner(&self, owner_id: &str) -> Result<Vec<Note>>;

    /// Unread notes for an owner whose reminder falls inside `window`.
    /// Notes already emailed are excluded.
    async fn list_due_for_owner(&self, owner_id: &str, window: ReminderWindow)
        -> Result<Vec<Note>>;

    /// Scan query: notes across all owners with `email_sent = false`,
    /// `read_notification = false`, and a reminder inside `window`.
    async fn list_due_unnotified(&self, window: ReminderWindow) -> Result<Vec<Note>>;

    /// Record that the reminder email for a note was dispatched.
    async fn mark_email_sent(&self, id: Uuid) -> Result<()>;

    /// Set the read-notification flag, scoped to the owner.
    async fn set_read_notification(&self, id: Uuid, owner_id: &str, read: bool) -> Result<()>;
}

/// Repository for entitlement (pro-upgrade) requests.
#[async_trait]
pub trait EntitlementRepository: Send + Sync {
    /// Insert a new request for `owner`. `pro_user` always starts false.
    async fn insert(
        &self,
        owner: &OwnerIdentity,
        req: CreateEntitlementRequest,
    ) -> Result<EntitlementRequest>;

    /// All requests created by an owner.
    async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<EntitlementRequest>>;

    /// All requests not yet elevated (`pro_user = false`), across owners.
    async fn list_pending(&self) -> Result<Vec<EntitlementRequest>>;

    /// Flip `pro_user` to true for a request.
    async fn elevate(&self, id: Uuid) -> Result<EntitlementRequest>;

    /// Whether the owner has at least one request with `pro_user = true`.
    async fn has_pro(&self, owner_id: &str) -> Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_note_request_ignores_client_id_and_owner() {
        // Clients migrating from older frontends still send id/owner fields;
        // they must not leak into the typed request.
        let json = r#"{
            "id": "11111111-1111-1111-1111-111111111111",
            "owner_id": "mallory",
            "owner_email": "mallory@example.com",
            "email_sent": true,
            "title": "hello",
            "content": "world",
            "color": "red",
            "pinned": false,
            "archived": false,
            "reminder": null
        }"#;

        let req: CreateNoteRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.title, "hello");
        assert_eq!(req.content, "world");
        assert_eq!(req.color, "red");
    }

    #[test]
    fn test_create_note_request_defaults() {
        let req: CreateNoteRequest = serde_json::from_str(r#"{"title": "t"}"#).unwrap();
        assert_eq!(req.title, "t");
        assert!(req.content.is_empty());
        assert!(!req.pinned);
        assert!(req.reminder.is_none());
    }

    #[test]
    fn test_create_entitlement_request_parses_amount() {
        let req: CreateEntitlementRequest =
            serde_json::from_str(r#"{"amount": "9.99", "payment_status": true}"#).unwrap();
        assert_eq!(req.amount.to_string(), "9.99");
        assert!(req.payment_status);
    }
}
