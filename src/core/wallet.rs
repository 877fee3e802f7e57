//! Wallet business logic - Student ID, loyalty, and discount cards.
//!
//! Cards are stored with whatever barcode payload the scanner produced; this module only
//! stores and retrieves them.

use crate::{
    core::budget::validate_name,
    entities::{WalletCard, wallet_card, wallet_card::CardType},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::debug;

/// Fields for a new card.
#[derive(Debug, Clone)]
pub struct NewCard {
    /// Card name, must not be blank
    pub card_name: String,
    /// Card kind
    pub card_type: CardType,
    /// Printed card number
    pub card_number: Option<String>,
    /// Scanned barcode payload
    pub barcode_data: Option<String>,
    /// Barcode symbology
    pub barcode_format: Option<String>,
    /// Free-form notes
    pub notes: Option<String>,
}

/// Partial update for a card. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct CardUpdate {
    /// New name
    pub card_name: Option<String>,
    /// New kind
    pub card_type: Option<CardType>,
    /// New card number
    pub card_number: Option<String>,
    /// New barcode payload
    pub barcode_data: Option<String>,
    /// New barcode symbology
    pub barcode_format: Option<String>,
    /// New notes
    pub notes: Option<String>,
}

/// Treats blank strings as absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Retrieves a user's cards, most recently added first.
pub async fn get_cards(db: &DatabaseConnection, user_id: &str) -> Result<Vec<wallet_card::Model>> {
    WalletCard::find()
        .filter(wallet_card::Column::UserId.eq(user_id))
        .order_by_desc(wallet_card::Column::CreatedAt)
        .order_by_desc(wallet_card::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a card by its ID.
pub async fn get_card(db: &DatabaseConnection, card_id: i64) -> Result<Option<wallet_card::Model>> {
    WalletCard::find_by_id(card_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Adds a card to a user's wallet.
pub async fn add_card(
    db: &DatabaseConnection,
    user_id: &str,
    card: NewCard,
) -> Result<wallet_card::Model> {
    let card_name = validate_name(&card.card_name, "Card")?;
    let now = Utc::now();

    let model = wallet_card::ActiveModel {
        user_id: Set(user_id.to_string()),
        card_name: Set(card_name),
        card_type: Set(card.card_type),
        card_number: Set(non_blank(card.card_number)),
        barcode_data: Set(non_blank(card.barcode_data)),
        barcode_format: Set(non_blank(card.barcode_format)),
        notes: Set(non_blank(card.notes)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let created = model.insert(db).await?;
    debug!("Added {:?} card {} for user {user_id}", created.card_type, created.id);
    Ok(created)
}

/// Applies a partial update to a card and refreshes `updated_at`.
pub async fn update_card(
    db: &DatabaseConnection,
    card_id: i64,
    update: CardUpdate,
) -> Result<wallet_card::Model> {
    let existing = get_card(db, card_id)
        .await?
        .ok_or_else(|| Error::not_found("wallet card", card_id))?;

    let mut active_model: wallet_card::ActiveModel = existing.into();
    if let Some(name) = update.card_name {
        active_model.card_name = Set(validate_name(&name, "Card")?);
    }
    if let Some(card_type) = update.card_type {
        active_model.card_type = Set(card_type);
    }
    if update.card_number.is_some() {
        active_model.card_number = Set(non_blank(update.card_number));
    }
    if update.barcode_data.is_some() {
        active_model.barcode_data = Set(non_blank(update.barcode_data));
    }
    if update.barcode_format.is_some() {
        active_model.barcode_format = Set(non_blank(update.barcode_format));
    }
    if update.notes.is_some() {
        active_model.notes = Set(non_blank(update.notes));
    }
    active_model.updated_at = Set(Utc::now());

    active_model.update(db).await.map_err(Into::into)
}

/// Removes a card from the wallet.
pub async fn delete_card(db: &DatabaseConnection, card_id: i64) -> Result<()> {
    let result = WalletCard::delete_by_id(card_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found("wallet card", card_id));
    }
    Ok(())
}
