pub mod db;
pub mod memorydb;
pub mod query_timeout;
pub mod waitlistdb;
