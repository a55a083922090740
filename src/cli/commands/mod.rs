pub mod init;
pub mod translate;
