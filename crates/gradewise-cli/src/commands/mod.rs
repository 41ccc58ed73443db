pub mod evaluate;
pub mod init;
pub mod show;
