pub mod auth;
pub mod completions;
pub mod content;
pub mod init;
pub mod search;
pub mod serve;
