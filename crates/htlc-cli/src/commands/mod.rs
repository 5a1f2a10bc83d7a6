pub mod hash;
pub mod init;
pub mod simulate;
pub mod verify;
