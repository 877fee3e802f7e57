//! User profile entity - One row per authenticated account.
//!
//! The `id` is the identifier issued by the external auth provider, so it is a string
//! primary key rather than an auto-incremented integer.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User profile database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Auth-provider user ID
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Email address the account signed up with
    pub email: String,
    /// Name shown in greetings and reports
    pub display_name: String,
    /// Monthly budget target in dollars
    pub monthly_budget: f64,
    /// When the profile row was created
    pub created_at: DateTimeUtc,
}

/// Profiles are referenced by `user_id` columns but carry no declared relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
