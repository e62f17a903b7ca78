//! Commands for the admin CLI.

pub mod allow_sender;
pub mod allow_token;
pub mod approve;
pub mod authorize;
pub mod balance;
pub mod deposit;
pub mod deposits;
pub mod init;
pub mod mint;
pub mod revert;
pub mod set_trustee;
pub mod status;
