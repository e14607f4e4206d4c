pub mod directory;
pub mod history;
pub mod resolver;
pub mod roster;
