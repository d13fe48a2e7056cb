pub mod init;
pub mod partition;
pub mod plan;
pub mod render;
pub mod status;
