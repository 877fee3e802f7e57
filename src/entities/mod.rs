//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod category;
pub mod grocery_item;
pub mod grocery_list;
pub mod transaction;
pub mod user;
pub mod wallet_card;

// Re-export specific types to avoid conflicts
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use grocery_item::{
    Column as GroceryItemColumn, Entity as GroceryItem, Model as GroceryItemModel,
};
pub use grocery_list::{
    Column as GroceryListColumn, Entity as GroceryList, Model as GroceryListModel,
};
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel,
    TransactionKind,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
pub use wallet_card::{
    CardType, Column as WalletCardColumn, Entity as WalletCard, Model as WalletCardModel,
};
