pub mod discord_rest;
pub mod payloads;
pub mod permissions;
