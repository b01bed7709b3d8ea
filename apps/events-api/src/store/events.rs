use sqlx::SqlitePool;

use super::{is_foreign_key_violation, is_unique_violation, StoreError};
use crate::models::{Event, EventFields};

const EVENT_COLUMNS: &str = "id, name, description, location, date_time, user_id";

fn event_not_found(id: i64) -> StoreError {
    StoreError::NotFound(format!("Event {} not found", id))
}

/// Event and registration store backed by the `events` and
/// `registrations` tables
#[derive(Debug, Clone)]
pub struct EventStore {
    pool: SqlitePool,
}

impl EventStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, owner_id: i64, fields: EventFields) -> Result<Event, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO events (name, description, location, date_time, user_id)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(&fields.location)
        .bind(fields.date_time)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        tracing::info!("User {} created event {}", owner_id, id);

        Ok(Event {
            id,
            name: fields.name,
            description: fields.description,
            location: fields.location,
            date_time: fields.date_time,
            user_id: owner_id,
        })
    }

    /// All events in id order
    pub async fn list(&self) -> Result<Vec<Event>, StoreError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {} FROM events ORDER BY id",
            EVENT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    pub async fn get(&self, id: i64) -> Result<Event, StoreError> {
        sqlx::query_as::<_, Event>(&format!(
            "SELECT {} FROM events WHERE id = ?",
            EVENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| event_not_found(id))
    }

    /// Replace the descriptive fields of an event owned by `requester_id`
    pub async fn update(
        &self,
        id: i64,
        requester_id: i64,
        fields: EventFields,
    ) -> Result<Event, StoreError> {
        // Ownership is part of the WHERE clause so check and write are one
        // statement; a miss is then told apart by a second lookup.
        let result = sqlx::query(
            r#"
            UPDATE events
            SET name = ?, description = ?, location = ?, date_time = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(&fields.location)
        .bind(fields.date_time)
        .bind(id)
        .bind(requester_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(self.explain_miss(id).await);
        }

        tracing::info!("User {} updated event {}", requester_id, id);

        Ok(Event {
            id,
            name: fields.name,
            description: fields.description,
            location: fields.location,
            date_time: fields.date_time,
            user_id: requester_id,
        })
    }

    /// Delete an event owned by `requester_id` along with its registrations
    pub async fn delete(&self, id: i64, requester_id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM events WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(requester_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(self.explain_miss(id).await);
        }

        tracing::info!("User {} deleted event {}", requester_id, id);
        Ok(())
    }

    /// Record that `user_id` attends `event_id`
    ///
    /// Fails with `Conflict` when the pair is already registered; the
    /// UNIQUE(user_id, event_id) constraint decides this.
    pub async fn register(&self, user_id: i64, event_id: i64) -> Result<(), StoreError> {
        self.get(event_id).await?;

        let inserted = sqlx::query("INSERT INTO registrations (user_id, event_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(event_id)
            .execute(&self.pool)
            .await;

        match inserted {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(StoreError::Conflict(
                    "Already registered for this event".to_string(),
                ));
            }
            Err(e) if is_foreign_key_violation(&e) => {
                // Either the event was deleted after the lookup or the
                // caller's account row is gone.
                return Err(match self.get(event_id).await {
                    Ok(_) => StoreError::UnknownUser(user_id),
                    Err(e) => e,
                });
            }
            Err(e) => return Err(StoreError::Database(e)),
        }

        tracing::info!("User {} registered for event {}", user_id, event_id);
        Ok(())
    }

    /// Remove a registration; a missing registration is `NotFound`
    pub async fn unregister(&self, user_id: i64, event_id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM registrations WHERE user_id = ? AND event_id = ?")
            .bind(user_id)
            .bind(event_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!(
                "No registration for event {}",
                event_id
            )));
        }

        tracing::info!("User {} unregistered from event {}", user_id, event_id);
        Ok(())
    }

    /// Ids of users registered for an existing event
    pub async fn registrations_for(&self, event_id: i64) -> Result<Vec<i64>, StoreError> {
        self.get(event_id).await?;

        let user_ids = sqlx::query_scalar::<_, i64>(
            "SELECT user_id FROM registrations WHERE event_id = ? ORDER BY user_id",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(user_ids)
    }

    /// Decide why an ownership-scoped write touched no rows
    async fn explain_miss(&self, id: i64) -> StoreError {
        match self.get(id).await {
            Ok(_) => StoreError::Forbidden(id),
            Err(e) => e,
        }
    }
}
