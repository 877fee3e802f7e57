//! User profile business logic.
//!
//! Accounts live with the external auth provider; this module keeps the matching profile
//! row. [`ensure_profile`] is called once when a session starts so that every later write
//! can assume the profile exists.

use crate::{
    core::budget::validate_amount,
    entities::{User, user},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{Set, SqlErr, prelude::*};
use tracing::{info, warn};

/// Fallback display name when the email has no usable local part.
pub const DEFAULT_DISPLAY_NAME: &str = "User";

/// Derives a display name from the part of `email` before the `@`.
#[must_use]
pub fn default_display_name(email: &str) -> String {
    email
        .split('@')
        .next()
        .map(str::trim)
        .filter(|local| !local.is_empty())
        .unwrap_or(DEFAULT_DISPLAY_NAME)
        .to_string()
}

/// Retrieves a profile by user ID.
pub async fn get_profile(db: &DatabaseConnection, user_id: &str) -> Result<Option<user::Model>> {
    User::find_by_id(user_id.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Returns the user's profile, creating it on first use.
///
/// Calling this repeatedly, or concurrently from two sessions, yields a single row: if the
/// insert loses a race against another session the existing row is returned.
pub async fn ensure_profile(
    db: &DatabaseConnection,
    user_id: &str,
    email: &str,
) -> Result<user::Model> {
    if let Some(existing) = get_profile(db, user_id).await? {
        return Ok(existing);
    }

    let profile = user::ActiveModel {
        id: Set(user_id.to_string()),
        email: Set(email.trim().to_string()),
        display_name: Set(default_display_name(email)),
        monthly_budget: Set(0.0),
        created_at: Set(Utc::now()),
    };

    match profile.insert(db).await {
        Ok(created) => {
            info!("Created profile for user {user_id}");
            Ok(created)
        }
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            warn!("Profile for user {user_id} was created concurrently");
            get_profile(db, user_id)
                .await?
                .ok_or_else(|| Error::not_found("user", user_id))
        }
        Err(err) => Err(err.into()),
    }
}

/// Sets the user's monthly budget target.
pub async fn set_monthly_budget(
    db: &DatabaseConnection,
    user_id: &str,
    amount: f64,
) -> Result<user::Model> {
    validate_amount(amount)?;

    let existing = get_profile(db, user_id)
        .await?
        .ok_or_else(|| Error::not_found("user", user_id))?;

    let mut active_model: user::ActiveModel = existing.into();
    active_model.monthly_budget = Set(amount);
    active_model.update(db).await.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::PaginatorTrait;

    #[test]
    fn test_default_display_name() {
        assert_eq!(default_display_name("sam.lee@uni.edu"), "sam.lee");
        assert_eq!(default_display_name("@uni.edu"), DEFAULT_DISPLAY_NAME);
        assert_eq!(default_display_name(""), DEFAULT_DISPLAY_NAME);
    }

    #[tokio::test]
    async fn test_ensure_profile_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;

        let first = ensure_profile(&db, TEST_USER, "student@uni.edu").await?;
        let second = ensure_profile(&db, TEST_USER, "other@uni.edu").await?;

        assert_eq!(first, second);
        assert_eq!(first.display_name, "student");
        assert_eq!(first.monthly_budget, 0.0);
        assert_eq!(User::find().count(&db).await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_set_monthly_budget() -> Result<()> {
        let db = setup_test_db().await?;
        ensure_profile(&db, TEST_USER, "student@uni.edu").await?;

        let updated = set_monthly_budget(&db, TEST_USER, 450.0).await?;
        assert_eq!(updated.monthly_budget, 450.0);

        let invalid = set_monthly_budget(&db, TEST_USER, f64::NAN).await;
        assert!(matches!(invalid, Err(Error::InvalidAmount { .. })));

        let missing = set_monthly_budget(&db, "nobody", 10.0).await;
        assert!(matches!(missing, Err(Error::NotFound { .. })));

        Ok(())
    }
}
