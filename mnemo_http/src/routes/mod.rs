pub mod chat;
pub mod health;
pub mod memories;
pub mod sessions;
pub mod users;
