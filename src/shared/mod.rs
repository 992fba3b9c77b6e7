pub mod enums;
pub mod error;
pub mod extract;
pub mod response;
pub mod schema;
pub mod state;
pub mod utils;
