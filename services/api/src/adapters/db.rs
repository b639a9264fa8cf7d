//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `PreferenceStore` and `ShiftSink` ports from the `core` crate. It reads
//! and writes the co-op app's existing PostgreSQL tables using `sqlx`.

use async_trait::async_trait;
use shift_watch_core::catalog::shift_type_id;
use shift_watch_core::domain::{MatchResult, Preference, UserAccount, UserId, UserPreferences};
use shift_watch_core::ports::{PortError, PortResult, PreferenceStore, ShiftSink};
use sqlx::{FromRow, PgPool};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the store and sink ports.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: i32,
    email: String,
    name: String,
    notification_email: Option<String>,
    coop_username: Option<String>,
}
impl UserRecord {
    fn to_domain(self) -> UserAccount {
        UserAccount {
            id: self.id,
            email: self.email,
            name: self.name,
            notification_email: self.notification_email,
            portal_username: self.coop_username.filter(|u| !u.trim().is_empty()),
        }
    }
}

#[derive(FromRow)]
struct PreferenceRecord {
    id: i32,
    user_id: i32,
    shift_type: String,
    days: Vec<String>,
    time_range_start: String,
    time_range_end: String,
    notification_email: String,
    is_active: bool,
}
impl PreferenceRecord {
    fn to_domain(self) -> Preference {
        Preference {
            id: self.id,
            user_id: self.user_id,
            shift_type: self.shift_type,
            days: self.days,
            time_range_start: self.time_range_start,
            time_range_end: self.time_range_end,
            notification_email: self.notification_email,
            is_active: self.is_active,
        }
    }
}

const PREFERENCE_COLUMNS: &str = "id, user_id, shift_type, days, time_range_start, time_range_end, \
     notification_email, COALESCE(is_active, TRUE) AS is_active";

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// `PreferenceStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl PreferenceStore for DbAdapter {
    async fn list_active_preferences(&self, user_id: UserId) -> PortResult<Vec<Preference>> {
        let sql = format!(
            "SELECT {} FROM shift_preferences \
             WHERE user_id = $1 AND COALESCE(is_active, TRUE) \
             ORDER BY created_at DESC, id DESC",
            PREFERENCE_COLUMNS
        );
        let records = sqlx::query_as::<_, PreferenceRecord>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(records.into_iter().map(PreferenceRecord::to_domain).collect())
    }

    async fn list_users_with_active_preferences(&self) -> PortResult<Vec<UserPreferences>> {
        let users = sqlx::query_as::<_, UserRecord>(
            "SELECT u.id, u.email, u.name, u.notification_email, u.coop_username FROM users u \
             WHERE COALESCE(u.is_active, TRUE) AND u.deleted_at IS NULL \
             AND EXISTS (SELECT 1 FROM shift_preferences p \
                         WHERE p.user_id = u.id AND COALESCE(p.is_active, TRUE)) \
             ORDER BY u.id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        let user_ids: Vec<i32> = users.iter().map(|u| u.id).collect();
        let sql = format!(
            "SELECT {} FROM shift_preferences \
             WHERE user_id = ANY($1) AND COALESCE(is_active, TRUE) \
             ORDER BY created_at DESC, id DESC",
            PREFERENCE_COLUMNS
        );
        let preferences = sqlx::query_as::<_, PreferenceRecord>(&sql)
            .bind(&user_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;

        let mut grouped: Vec<UserPreferences> = users
            .into_iter()
            .map(|u| UserPreferences {
                user: u.to_domain(),
                preferences: Vec::new(),
            })
            .collect();
        for record in preferences {
            if let Some(entry) = grouped.iter_mut().find(|e| e.user.id == record.user_id) {
                entry.preferences.push(record.to_domain());
            }
        }
        Ok(grouped)
    }

    async fn get_user(&self, user_id: UserId) -> PortResult<UserAccount> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, email, name, notification_email, coop_username FROM users \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound(format!("User {} not found", user_id)),
            _ => PortError::Unexpected(e.to_string()),
        })?;
        Ok(record.to_domain())
    }
}

//=========================================================================================
// `ShiftSink` Trait Implementation
//=========================================================================================

#[async_trait]
impl ShiftSink for DbAdapter {
    async fn record_available_shifts(
        &self,
        user: &UserAccount,
        matches: &[MatchResult],
    ) -> PortResult<()> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        for result in matches {
            for shift in &result.shifts {
                sqlx::query(
                    "INSERT INTO available_shifts \
                     (shift_type, shift_type_id, day, date, time, href, is_available, found_at) \
                     VALUES ($1, $2, $3, $4, $5, $6, TRUE, NOW())",
                )
                .bind(&shift.shift_type)
                .bind(shift_type_id(&shift.shift_type) as i32)
                .bind(&shift.day)
                .bind(&shift.date)
                .bind(&shift.time)
                .bind(&shift.href)
                .execute(&mut *tx)
                .await
                .map_err(unexpected)?;
            }
        }

        sqlx::query(
            "INSERT INTO notifications (user_id, type, title, message, is_read, sent_at) \
             VALUES ($1, 'SHIFT_AVAILABLE', $2, $3, FALSE, NOW())",
        )
        .bind(user.id)
        .bind(notification_title(matches))
        .bind(notification_message(matches))
        .execute(&mut *tx)
        .await
        .map_err(unexpected)?;

        tx.commit().await.map_err(unexpected)
    }
}

fn notification_title(matches: &[MatchResult]) -> String {
    let count: usize = matches.iter().map(|m| m.shifts.len()).sum();
    format!("{} matching shift(s) available", count)
}

/// One line per shift: "Mon 3/17/2025 9:00 AM - Checkout 💳 (https://...)".
fn notification_message(matches: &[MatchResult]) -> String {
    matches
        .iter()
        .flat_map(|m| &m.shifts)
        .map(|s| format!("{} {} {} - {} ({})", s.day, s.date, s.time, s.description, s.href))
        .collect::<Vec<_>>()
        .join("\n")
}
