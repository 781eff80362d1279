//! Infrastructure layer for chatpair.
//!
//! Contains the SQLite implementation of the store traits defined in
//! `chatpair-core`, the `config.toml` loader, and data directory resolution.

pub mod config;
pub mod sqlite;

use std::path::PathBuf;

/// Resolve the data directory holding the database and `config.toml`.
///
/// `CHATPAIR_DATA_DIR` wins, then `~/.chatpair`, then `./.chatpair`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CHATPAIR_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".chatpair");
    }

    PathBuf::from(".chatpair")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_data_dir_from_env() {
        // SAFETY: This test is single-threaded and restores the env var immediately.
        unsafe {
            std::env::set_var("CHATPAIR_DATA_DIR", "/tmp/test-chatpair");
        }
        let dir = resolve_data_dir();
        assert_eq!(dir, PathBuf::from("/tmp/test-chatpair"));
        unsafe {
            std::env::remove_var("CHATPAIR_DATA_DIR");
        }
    }
}
