pub mod community;
pub mod ids;
pub mod member;
pub mod message;
pub mod report;
pub mod snowflake;
