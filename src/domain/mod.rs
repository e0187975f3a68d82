pub mod record;
pub mod resource;
pub mod transaction;
pub mod types;
