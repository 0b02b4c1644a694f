pub mod conferences;
pub mod init;
pub mod schedule;
pub mod status;
pub mod sync;
pub mod teams;
pub mod track;
pub mod untrack;
