#![warn(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation
)]

//! Flat-file JSON identity collaborators: users, sessions, and the role
//! registry.

mod fs_store;
mod roles;
mod session;
mod user;

pub use roles::RoleRegistry;
pub use session::{SessionRecord, SessionStore};
pub use user::{UserRecord, UserStore};
