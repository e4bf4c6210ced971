pub mod convert;
pub mod init;
pub mod inspect;
pub mod serve;
