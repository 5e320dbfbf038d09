use redb::TableDefinition;

/// Users table: user_id -> UserRecord (serialized)
pub const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Email index: normalized email -> user_id
/// Enforces email uniqueness and serves login lookups
pub const USER_EMAILS: TableDefinition<&str, &str> = TableDefinition::new("user_emails");

/// Sets table: set_id -> SetRecord (serialized)
pub const SETS: TableDefinition<&str, &[u8]> = TableDefinition::new("sets");

/// Cards table: card_id -> CardRecord (serialized)
pub const CARDS: TableDefinition<&str, &[u8]> = TableDefinition::new("cards");

/// User sets index: user_id -> Vec<set_id>
/// Used for listing and cascade delete when a user is removed
pub const USER_SETS: TableDefinition<&str, &[u8]> = TableDefinition::new("user_sets");

/// Set cards index: set_id -> Vec<card_id> in insertion order
pub const SET_CARDS: TableDefinition<&str, &[u8]> = TableDefinition::new("set_cards");
