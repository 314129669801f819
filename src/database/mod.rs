pub mod connection;
pub mod migrations;

pub use connection::{establish_connection, test_connection};
pub use migrations::run_migrations;
