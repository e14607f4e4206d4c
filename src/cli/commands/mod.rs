pub mod audit;
pub mod decode;
pub mod init;
pub mod status;
