pub mod messages;
pub mod ndjson;
pub mod traits;
