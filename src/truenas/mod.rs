pub mod client;
pub mod connection;
pub mod types;

pub use client::TrueNasClient;
pub use connection::ConnectionManager;
