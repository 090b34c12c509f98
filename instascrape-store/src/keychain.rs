//! Password storage in the system keychain.
//!
//! - macOS: Keychain Services
//! - Windows: Credential Manager
//! - Linux: Secret Service (GNOME Keyring, KDE Wallet)
//!
//! Entries live under the service name [`SERVICE`] with the account
//! username as the entry user.

use keyring::Entry;
use tracing::debug;

use crate::error::StoreError;

/// Keychain service name.
pub const SERVICE: &str = "instascrape";

fn entry(username: &str) -> Result<Entry, StoreError> {
    Entry::new(SERVICE, username)
        .map_err(|e| StoreError::Keychain(format!("Failed to create keychain entry: {e}")))
}

/// Stores the password for `username`.
pub fn store_password(username: &str, password: &str) -> Result<(), StoreError> {
    entry(username)?
        .set_password(password)
        .map_err(|e| StoreError::Keychain(format!("Failed to store password: {e}")))?;
    debug!(username, "Password stored in keychain");
    Ok(())
}

/// Returns the stored password for `username`, if any.
///
/// Keychain failures are treated as "no password".
pub fn get_password(username: &str) -> Option<String> {
    let password = entry(username).ok()?.get_password().ok()?;
    if password.is_empty() {
        return None;
    }
    debug!(username, "Password retrieved from keychain");
    Some(password)
}

/// Deletes the stored password for `username`. A missing entry is fine.
pub fn delete_password(username: &str) -> Result<(), StoreError> {
    match entry(username)?.delete_credential() {
        Ok(()) => {
            debug!(username, "Password deleted from keychain");
            Ok(())
        }
        Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(StoreError::Keychain(format!("Failed to delete password: {e}"))),
    }
}

/// Returns true if a password is stored for `username`.
pub fn has_password(username: &str) -> bool {
    get_password(username).is_some()
}
