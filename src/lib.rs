pub mod codec;
pub mod commands;
pub mod connection;
pub mod parser;
pub mod registry;
pub mod response;
pub mod server;
pub mod store;
pub mod value;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Result<T> = std::result::Result<T, Error>;
