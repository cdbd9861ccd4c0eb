//! Note repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use notabene_core::{
    CreateNoteRequest, Error, Note, NoteRepository, OwnerIdentity, ReminderWindow, Result,
    UpdateNoteRequest,
};

/// PostgreSQL implementation of NoteRepository.
#[derive(Clone)]
pub struct PgNoteRepository {
    pool: Pool<Postgres>,
}

impl PgNoteRepository {
    /// Create a new PgNoteRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

const NOTE_COLUMNS: &str = "id, title, content, color, pinned, archived, reminder, \
     owner_id, owner_email, email_sent, read_notification, created_at_utc, updated_at_utc";

/// Map a database row to a Note.
fn map_row_to_note(row: PgRow) -> Note {
    Note {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        color: row.get("color"),
        pinned: row.get("pinned"),
        archived: row.get("archived"),
        reminder: row.get("reminder"),
        owner_id: row.get("owner_id"),
        owner_email: row.get("owner_email"),
        email_sent: row.get("email_sent"),
        read_notification: row.get("read_notification"),
        created_at_utc: row.get("created_at_utc"),
        updated_at_utc: row.get("updated_at_utc"),
    }
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn insert(&self, owner: &OwnerIdentity, req: CreateNoteRequest) -> Result<Note> {
        // The id is always server-assigned; anything the client sent was
        // dropped at the serde boundary.
        let id = Uuid::now_v7();

        let row = sqlx::query(&format!(
            "INSERT INTO note \
                 (id, title, content, color, pinned, archived, reminder, \
                  owner_id, owner_email, email_sent, read_notification, \
                  created_at_utc, updated_at_utc) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, false, false, now(), now()) \
             RETURNING {NOTE_COLUMNS}"
        ))
        .bind(id)
        .bind(&req.title)
        .bind(&req.content)
        .bind(&req.color)
        .bind(req.pinned)
        .bind(req.archived)
        .bind(req.reminder)
        .bind(&owner.subject)
        .bind(&owner.email)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            op = "insert_note",
            note_id = %id,
            owner_id = %owner.subject,
            "Note created"
        );
        Ok(map_row_to_note(row))
    }

    async fn fetch(&self, id: Uuid, owner_id: &str) -> Result<Note> {
        let row = sqlx::query(&format!(
            "SELECT {NOTE_COLUMNS} FROM note WHERE id = $1 AND owner_id = $2"
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.map(map_row_to_note).ok_or(Error::NoteNotFound(id))
    }

    async fn update(
        &self,
        id: Uuid,
        owner: &OwnerIdentity,
        req: UpdateNoteRequest,
    ) -> Result<Note> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let existing = sqlx::query(
            "SELECT reminder, email_sent FROM note \
             WHERE id = $1 AND owner_id = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(&owner.subject)
        .fetch_optional(&mut *tx)
        .await
        .map_err(Error::Database)?
        .ok_or(Error::NoteNotFound(id))?;

        let stored_reminder: Option<DateTime<Utc>> = existing.get("reminder");
        let mut email_sent: bool = existing.get("email_sent");

        // A reminder pushed strictly later than the stored one must re-fire,
        // so the sent flag is cleared. Earlier or equal reminders keep it.
        if let (Some(new), Some(old)) = (req.reminder, stored_reminder) {
            if new > old {
                email_sent = false;
            }
        }

        let row = sqlx::query(&format!(
            "UPDATE note SET \
                 title = $1, content = $2, color = $3, pinned = $4, archived = $5, \
                 reminder = $6, owner_email = $7, email_sent = $8, updated_at_utc = now() \
             WHERE id = $9 \
             RETURNING {NOTE_COLUMNS}"
        ))
        .bind(&req.title)
        .bind(&req.content)
        .bind(&req.color)
        .bind(req.pinned)
        .bind(req.archived)
        .bind(req.reminder)
        .bind(&owner.email)
        .bind(email_sent)
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(Error::Database)?;

        tx.commit().await.map_err(Error::Database)?;
        Ok(map_row_to_note(row))
    }

    async fn delete(&self, id: Uuid, owner_id: &str) -> Result<()> {
        // Deleting an absent or foreign id is a no-op, matching the
        // store-level delete semantics callers rely on.
        sqlx::query("DELETE FROM note WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }

    async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<Note>> {
        let rows = sqlx::query(&format!(
            "SELECT {NOTE_COLUMNS} FROM note \
             WHERE owner_id = $1 ORDER BY created_at_utc DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.into_iter().map(map_row_to_note).collect())
    }

    async fn list_archived_for_owner(&self, owner_id: &str) -> Result<Vec<Note>> {
        let rows = sqlx::query(&format!(
            "SELECT {NOTE_COLUMNS} FROM note \
             WHERE owner_id = $1 AND archived = true ORDER BY created_at_utc DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.into_iter().map(map_row_to_note).collect())
    }

    async fn list_pinned_for_owner(&self, owner_id: &str) -> Result<Vec<Note>> {
        let rows = sqlx::query(&format!(
            "SELECT {NOTE_COLUMNS} FROM note \
             WHERE owner_id = $1 AND pinned = true ORDER BY created_at_utc DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.into_iter().map(map_row_to_note).collect())
    }

    async fn list_due_for_owner(
        &self,
        owner_id: &str,
        window: ReminderWindow,
    ) -> Result<Vec<Note>> {
        let rows = sqlx::query(&format!(
            "SELECT {NOTE_COLUMNS} FROM note \
             WHERE owner_id = $1 \
               AND reminder BETWEEN $2 AND $3 \
               AND email_sent = false \
               AND read_notification = false \
             ORDER BY reminder ASC"
        ))
        .bind(owner_id)
        .bind(window.start)
        .bind(window.end)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.into_iter().map(map_row_to_note).collect())
    }

    async fn list_due_unnotified(&self, window: ReminderWindow) -> Result<Vec<Note>> {
        // Cross-owner scan query. A NULL reminder never matches BETWEEN, so
        // reminder-less notes are excluded here, not in application code.
        let rows = sqlx::query(&format!(
            "SELECT {NOTE_COLUMNS} FROM note \
             WHERE reminder BETWEEN $1 AND $2 \
               AND email_sent = false \
               AND read_notification = false \
             ORDER BY reminder ASC"
        ))
        .bind(window.start)
        .bind(window.end)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.into_iter().map(map_row_to_note).collect())
    }

    async fn mark_email_sent(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE note SET email_sent = true, updated_at_utc = now() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }

    async fn set_read_notification(&self, id: Uuid, owner_id: &str, read: bool) -> Result<()> {
        sqlx::query(
            "UPDATE note SET read_notification = $1, updated_at_utc = now() \
             WHERE id = $2 AND owner_id = $3",
        )
        .bind(read)
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(())
    }
}
