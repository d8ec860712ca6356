//! Login flag persistence.
//!
//! The only durable user state: `isLoggedIn = "true"` in the session
//! namespace.  No expiry, no credentials.

use log::info;

use crate::app::ports::{StorageError, StoragePort};

pub const SESSION_NAMESPACE: &str = "session";
pub const LOGIN_KEY: &str = "isLoggedIn";
const LOGGED_IN: &[u8] = b"true";

/// Where a fresh start should land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landing {
    Dashboard,
    Welcome,
}

pub fn login(store: &mut impl StoragePort) -> Result<(), StorageError> {
    store.write(SESSION_NAMESPACE, LOGIN_KEY, LOGGED_IN)?;
    info!("session: logged in");
    Ok(())
}

pub fn logout(store: &mut impl StoragePort) -> Result<(), StorageError> {
    store.delete(SESSION_NAMESPACE, LOGIN_KEY)?;
    info!("session: logged out");
    Ok(())
}

/// True only when the stored value is exactly `"true"`.
pub fn is_logged_in(store: &impl StoragePort) -> bool {
    let mut buf = [0u8; 8];
    match store.read(SESSION_NAMESPACE, LOGIN_KEY, &mut buf) {
        Ok(n) => &buf[..n] == LOGGED_IN,
        Err(_) => false,
    }
}

pub fn landing(store: &impl StoragePort) -> Landing {
    if is_logged_in(store) {
        Landing::Dashboard
    } else {
        Landing::Welcome
    }
}
