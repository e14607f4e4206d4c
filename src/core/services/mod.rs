pub mod activity_index;
pub mod crawler;
pub mod history_walker;
pub mod report_builder;
