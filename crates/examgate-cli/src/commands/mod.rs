pub mod accounts;
pub mod init;
pub mod run;
pub mod validate;
