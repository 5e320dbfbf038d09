pub mod auth;
pub mod cards;
pub mod health;
pub mod sets;
pub mod stats;

pub use auth::{
    delete_account, get_me, get_streak, login, register_user, update_details, update_password,
};
pub use cards::{due_cards, update_card_status};
pub use health::health_check;
pub use sets::{add_card, create_set, delete_card, delete_set, get_set, list_sets, update_set};
pub use stats::get_stats;
