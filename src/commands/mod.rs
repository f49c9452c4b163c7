pub mod init;
pub mod search;
pub mod serve;
