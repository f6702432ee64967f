pub mod announce;
pub mod config;
pub mod countdown;
pub mod protocol;
