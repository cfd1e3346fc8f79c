//! PostgreSQL implementation of the persistence layer.
//!
//! Roster mutations lock the activity row with `SELECT ... FOR UPDATE`
//! and re-validate capacity and uniqueness inside the same transaction,
//! so concurrent writers on one activity serialize at the database as
//! well as in the registry. Transient failures are retried with a
//! bounded linear backoff before surfacing [`GatewayError::TransientStore`].

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{ActivityRecord, ParticipantRecord};
use crate::domain::{ActivityDetails, ActivityEntry, Participant};
use crate::error::GatewayError;

/// PostgreSQL-backed roster store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
    retry_attempts: u32,
    retry_backoff: Duration,
}

impl PostgresStore {
    /// Creates a new store with the given connection pool and retry policy.
    #[must_use]
    pub fn new(pool: PgPool, retry_attempts: u32, retry_backoff: Duration) -> Self {
        Self {
            pool,
            retry_attempts: retry_attempts.max(1),
            retry_backoff,
        }
    }

    /// Runs the embedded schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::TransientStore`] if a migration fails.
    pub async fn run_migrations(&self) -> Result<(), GatewayError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| GatewayError::TransientStore(e.to_string()))
    }

    /// Returns the number of activity rows.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::TransientStore`] on database failure.
    pub async fn count_activities(&self) -> Result<i64, GatewayError> {
        self.with_retry(|| async {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM activities")
                .fetch_one(&self.pool)
                .await
                .map_err(store_err)
        })
        .await
    }

    /// Inserts a new activity row.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ActivityExists`] if the name is taken, or
    /// [`GatewayError::TransientStore`] after retries on database failure.
    pub async fn insert_activity(&self, entry: &ActivityEntry) -> Result<Uuid, GatewayError> {
        self.with_retry(|| async {
            let id = Uuid::new_v4();
            sqlx::query(
                "INSERT INTO activities (id, name, description, schedule, max_participants, created_at) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(id)
            .bind(&entry.name)
            .bind(&entry.description)
            .bind(&entry.schedule)
            .bind(i32::try_from(entry.max_participants).unwrap_or(i32::MAX))
            .bind(entry.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    GatewayError::ActivityExists(entry.name.clone())
                } else {
                    store_err(e)
                }
            })?;
            Ok(id)
        })
        .await
    }

    /// Overwrites the mutable fields of an activity with merged details.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ActivityNotFound`] if no row matches, or
    /// [`GatewayError::TransientStore`] after retries on database failure.
    pub async fn update_activity(
        &self,
        name: &str,
        details: &ActivityDetails,
    ) -> Result<(), GatewayError> {
        self.with_retry(|| async {
            let result = sqlx::query(
                "UPDATE activities SET description = $2, schedule = $3, max_participants = $4 \
                 WHERE name = $1",
            )
            .bind(name)
            .bind(&details.description)
            .bind(&details.schedule)
            .bind(i32::try_from(details.max_participants).unwrap_or(i32::MAX))
            .execute(&self.pool)
            .await
            .map_err(store_err)?;

            if result.rows_affected() == 0 {
                return Err(GatewayError::ActivityNotFound(name.to_string()));
            }
            Ok(())
        })
        .await
    }

    /// Enrolls a participant inside a single transaction.
    ///
    /// Locks the activity row, re-checks the duplicate-email and capacity
    /// invariants, inserts, and returns the new participant count.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ActivityNotFound`],
    /// [`GatewayError::AlreadySignedUp`], [`GatewayError::ActivityFull`],
    /// or [`GatewayError::TransientStore`] after retries.
    pub async fn insert_participant(
        &self,
        activity_name: &str,
        participant: &Participant,
    ) -> Result<u32, GatewayError> {
        self.with_retry(|| self.insert_participant_once(activity_name, participant))
            .await
    }

    async fn insert_participant_once(
        &self,
        activity_name: &str,
        participant: &Participant,
    ) -> Result<u32, GatewayError> {
        let mut tx = self.pool.begin().await.map_err(store_err)?;

        let row = sqlx::query_as::<_, (Uuid, i32)>(
            "SELECT id, max_participants FROM activities WHERE name = $1 FOR UPDATE",
        )
        .bind(activity_name)
        .fetch_optional(&mut *tx)
        .await
        .map_err(store_err)?;

        let Some((activity_id, max_participants)) = row else {
            return Err(GatewayError::ActivityNotFound(activity_name.to_string()));
        };

        let already = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM participants WHERE activity_id = $1 AND email = $2)",
        )
        .bind(activity_id)
        .bind(&participant.email)
        .fetch_one(&mut *tx)
        .await
        .map_err(store_err)?;

        if already {
            return Err(GatewayError::AlreadySignedUp {
                activity: activity_name.to_string(),
                email: participant.email.clone(),
            });
        }

        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM participants WHERE activity_id = $1",
        )
        .bind(activity_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(store_err)?;

        if count >= i64::from(max_participants) {
            return Err(GatewayError::ActivityFull(activity_name.to_string()));
        }

        sqlx::query(
            "INSERT INTO participants (id, activity_id, email, name, grade, signed_up_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(Uuid::new_v4())
        .bind(activity_id)
        .bind(&participant.email)
        .bind(&participant.name)
        .bind(participant.grade)
        .bind(participant.signed_up_at)
        .execute(&mut *tx)
        .await
        .map_err(store_err)?;

        tx.commit().await.map_err(store_err)?;

        Ok(u32::try_from(count.saturating_add(1)).unwrap_or(u32::MAX))
    }

    /// Withdraws a participant inside a single transaction.
    ///
    /// Locks the activity row, deletes the matching participant, and
    /// returns the new participant count.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ActivityNotFound`],
    /// [`GatewayError::NotSignedUp`], or
    /// [`GatewayError::TransientStore`] after retries.
    pub async fn delete_participant(
        &self,
        activity_name: &str,
        email: &str,
    ) -> Result<u32, GatewayError> {
        self.with_retry(|| self.delete_participant_once(activity_name, email))
            .await
    }

    async fn delete_participant_once(
        &self,
        activity_name: &str,
        email: &str,
    ) -> Result<u32, GatewayError> {
        let mut tx = self.pool.begin().await.map_err(store_err)?;

        let row = sqlx::query_as::<_, (Uuid,)>(
            "SELECT id FROM activities WHERE name = $1 FOR UPDATE",
        )
        .bind(activity_name)
        .fetch_optional(&mut *tx)
        .await
        .map_err(store_err)?;

        let Some((activity_id,)) = row else {
            return Err(GatewayError::ActivityNotFound(activity_name.to_string()));
        };

        let result = sqlx::query("DELETE FROM participants WHERE activity_id = $1 AND email = $2")
            .bind(activity_id)
            .bind(email)
            .execute(&mut *tx)
            .await
            .map_err(store_err)?;

        if result.rows_affected() == 0 {
            return Err(GatewayError::NotSignedUp {
                activity: activity_name.to_string(),
                email: email.to_string(),
            });
        }

        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM participants WHERE activity_id = $1",
        )
        .bind(activity_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(store_err)?;

        tx.commit().await.map_err(store_err)?;

        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    /// Loads all activities with their rosters, for registry hydration
    /// at startup.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::TransientStore`] on database failure.
    pub async fn fetch_all_activities(&self) -> Result<Vec<ActivityEntry>, GatewayError> {
        let activity_rows = sqlx::query_as::<_, (Uuid, String, String, String, i32, DateTime<Utc>)>(
            "SELECT id, name, description, schedule, max_participants, created_at \
             FROM activities ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        let participant_rows =
            sqlx::query_as::<_, (Uuid, String, Option<String>, Option<i32>, DateTime<Utc>)>(
                "SELECT activity_id, email, name, grade, signed_up_at \
                 FROM participants ORDER BY signed_up_at ASC",
            )
            .fetch_all(&self.pool)
            .await
            .map_err(store_err)?;

        let records: Vec<ActivityRecord> = activity_rows
            .into_iter()
            .map(
                |(id, name, description, schedule, max_participants, created_at)| ActivityRecord {
                    id,
                    name,
                    description,
                    schedule,
                    max_participants,
                    created_at,
                },
            )
            .collect();

        let mut rosters: HashMap<Uuid, Vec<ParticipantRecord>> = HashMap::new();
        for (activity_id, email, name, grade, signed_up_at) in participant_rows {
            rosters
                .entry(activity_id)
                .or_default()
                .push(ParticipantRecord {
                    activity_id,
                    email,
                    name,
                    grade,
                    signed_up_at,
                });
        }

        Ok(records
            .into_iter()
            .map(|record| {
                let participants = rosters
                    .remove(&record.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|p| Participant {
                        email: p.email,
                        name: p.name,
                        grade: p.grade,
                        signed_up_at: p.signed_up_at,
                    })
                    .collect();
                ActivityEntry {
                    name: record.name,
                    description: record.description,
                    schedule: record.schedule,
                    max_participants: u32::try_from(record.max_participants).unwrap_or_default(),
                    participants,
                    created_at: record.created_at,
                    last_modified_at: record.created_at,
                }
            })
            .collect())
    }

    /// Inserts the given activities. Used to seed an empty store.
    ///
    /// # Errors
    ///
    /// Returns the first insertion error encountered.
    pub async fn seed_activities(&self, entries: &[ActivityEntry]) -> Result<(), GatewayError> {
        for entry in entries {
            self.insert_activity(entry).await?;
        }
        Ok(())
    }

    /// Retries `op` on [`GatewayError::TransientStore`] with a bounded
    /// linear backoff. Domain errors are returned immediately.
    async fn with_retry<T, F, Fut>(&self, op: F) -> Result<T, GatewayError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, GatewayError>>,
    {
        let mut attempt = 0u32;
        loop {
            match op().await {
                Err(GatewayError::TransientStore(msg)) => {
                    attempt += 1;
                    if attempt >= self.retry_attempts {
                        return Err(GatewayError::TransientStore(msg));
                    }
                    tracing::warn!(attempt, error = %msg, "retrying store operation");
                    tokio::time::sleep(self.retry_backoff).await;
                }
                other => return other,
            }
        }
    }
}

/// Maps a sqlx error to a retryable [`GatewayError::TransientStore`].
fn store_err(e: sqlx::Error) -> GatewayError {
    GatewayError::TransientStore(e.to_string())
}

/// Returns `true` if the error is a unique-constraint violation.
fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}
