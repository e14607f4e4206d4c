pub mod exporters;
pub mod gateway;
