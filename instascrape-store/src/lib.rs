// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `instascrape` Store
//!
//! Everything `instascrape` keeps on disk or in the system keychain:
//!
//! - **`FileSessionCache`**: one JSON file per account, written atomically
//! - **Config**: client settings with defaults
//! - **Keychain**: account passwords
//! - **Persistence**: JSON file helpers with owner-only permissions
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use instascrape_fetch::{Credentials, InstaClient};
//! use instascrape_store::{Config, FileSessionCache};
//!
//! let config = Config::load()?;
//! let client = InstaClient::builder()
//!     .credentials(Credentials::new("jane", "secret"))
//!     .session_cache(Arc::new(FileSessionCache::new(config.session_dir())))
//!     .build()?;
//! client.login(false).await?;
//! ```

pub mod config;
pub mod error;
pub mod keychain;
pub mod persistence;
pub mod session_cache;

pub use config::Config;
pub use error::StoreError;
pub use persistence::{
    default_cache_dir, default_config_dir, default_config_path, default_session_dir, ensure_dir,
    load_json, save_json,
};
pub use session_cache::FileSessionCache;
