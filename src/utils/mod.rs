//! Shared utilities: HTTP downloads and file system helpers.

pub mod fs;
pub mod http;
