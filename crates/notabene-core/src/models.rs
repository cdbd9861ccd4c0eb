//! Data models for notabene entities.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user-owned note with an optional reminder.
///
/// `owner_id` is the identity provider's subject claim for the owning user;
/// it is assigned server-side on every write and never read from a request
/// body. `email_sent` is flipped by the reminder scan job after a successful
/// dispatch so the same reminder never fires twice.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub color: String,
    pub pinned: bool,
    pub archived: bool,
    /// When set, the reminder scan job emails the owner as this time approaches.
    pub reminder: Option<DateTime<Utc>>,
    pub owner_id: String,
    /// Captured from the caller's `email` claim at create/update time.
    pub owner_email: String,
    pub email_sent: bool,
    pub read_notification: bool,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
}

/// A record of a payment/upgrade request gating reminder emails.
///
/// `pro_user` starts false and is flipped to true only by the elevate
/// operation. An owner with at least one `pro_user = true` request is
/// entitled to reminder emails.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct EntitlementRequest {
    pub id: Uuid,
    #[schema(value_type = String, example = "9.99")]
    pub amount: BigDecimal,
    pub payment_status: bool,
    pub pro_user: bool,
    pub owner_id: String,
    pub username: String,
    pub owner_email: String,
    pub created_at_utc: DateTime<Utc>,
}

/// Identity claims extracted from a validated bearer token.
///
/// The subject string is the sole ownership key for notes and entitlement
/// requests; the API layer builds this once per request and hands it to the
/// stores, so nothing below the middleware ever touches a raw token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerIdentity {
    /// IdP subject claim; equals `Note::owner_id`.
    pub subject: String,
    /// IdP email claim; stored on notes and entitlement requests.
    pub email: String,
    /// Preferred username, when the IdP supplies one.
    pub username: Option<String>,
}

/// The time range checked for due-soon reminders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReminderWindow {
    /// Window starting at `now` and extending `horizon` into the future.
    pub fn from_now(now: DateTime<Utc>, horizon: Duration) -> Self {
        Self {
            start: now,
            end: now + horizon,
        }
    }

    /// Whether `at` falls inside the window (inclusive on both ends).
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at <= self.end
    }
}
