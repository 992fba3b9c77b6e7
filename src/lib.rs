pub mod comments;
pub mod config;
pub mod seed;
pub mod server;
pub mod shared;
pub mod tickets;
