//! Wallet card entity - Student IDs, loyalty cards, and discount cards.
//!
//! Cards are independent of the budget: they never reference transactions.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The kind of card stored in the wallet
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    /// University or school identity card
    #[sea_orm(string_value = "student_id")]
    StudentId,
    /// Store loyalty card
    #[sea_orm(string_value = "loyalty")]
    Loyalty,
    /// Discount or membership card
    #[sea_orm(string_value = "discount")]
    Discount,
}

/// Wallet card database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "wallet_cards")]
pub struct Model {
    /// Unique identifier for the card
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user ID
    pub user_id: String,
    /// Name printed on or given to the card
    pub card_name: String,
    /// Card kind
    pub card_type: CardType,
    /// Card number, if the card has one
    pub card_number: Option<String>,
    /// Scanned barcode payload
    pub barcode_data: Option<String>,
    /// Barcode symbology (e.g., `"ean13"`, `"qr"`)
    pub barcode_format: Option<String>,
    /// Free-form notes
    pub notes: Option<String>,
    /// When the card was added
    pub created_at: DateTimeUtc,
    /// When the card was last edited
    pub updated_at: DateTimeUtc,
}

/// `WalletCard` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
