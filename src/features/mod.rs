pub mod message_log;
pub mod providers;
