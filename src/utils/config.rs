/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/
use serde::de::DeserializeOwned;
use std::env;
use std::fmt::Debug;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, error};

use crate::error::AppError;

/// Gets an environment variable or returns a default value if not found or cannot be parsed
///
/// # Arguments
///
/// * `env_var` - The name of the environment variable
/// * `default` - The default value to use if the environment variable is not found or cannot be parsed
///
/// # Returns
///
/// The parsed value of the environment variable or the default value
pub fn get_env_or_default<T: FromStr>(env_var: &str, default: T) -> T
where
    <T as FromStr>::Err: Debug,
{
    match env::var(env_var) {
        Ok(val) => val.parse::<T>().unwrap_or_else(|_| {
            error!("Failed to parse {}: {}, using default", env_var, val);
            default
        }),
        Err(_) => default,
    }
}

/// Gets an environment variable and parses it, returning None if not found or invalid
pub fn get_env_or_none<T: FromStr>(env_var: &str) -> Option<T>
where
    <T as FromStr>::Err: Debug,
{
    env::var(env_var).ok().and_then(|val| val.parse::<T>().ok())
}

/// Reads and parses a JSON document from disk
///
/// The read is synchronous and happens once; a missing file surfaces as
/// [`AppError::Io`] and malformed content as [`AppError::Json`].
pub fn read_json_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, AppError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| {
        error!("Failed to read {}: {e}", path.display());
        AppError::Io(e)
    })?;
    debug!("Read {} bytes from {}", contents.len(), path.display());
    Ok(serde_json::from_str(&contents)?)
}
