pub mod closures;
pub mod connection;
pub mod groups;
pub mod history;
pub mod matches;
pub mod models;
pub mod players;
pub mod seasons;
pub mod setup;

pub use connection::{DbConn, DbPool, create_memory_pool, create_pool, get_connection};
pub use models::*;
