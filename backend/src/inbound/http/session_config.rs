//! Session cookie configuration.
//!
//! Turns the session toggles from the application settings into a signing
//! key and cookie flags, enforcing stricter rules for release builds.

use std::path::{Path, PathBuf};

use actix_web::cookie::Key;
use tracing::warn;
use zeroize::Zeroize;

/// Minimum key file length.
pub const SESSION_KEY_MIN_LEN: usize = 64;

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds fall back to a throwaway key when none is readable.
    Debug,
    /// Release builds need a real key unless ephemeral keys are allowed.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use circle::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// assert_eq!(mode == BuildMode::Debug, cfg!(debug_assertions));
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Raw session toggles as read from configuration.
#[derive(Clone, Debug)]
pub struct SessionOptions {
    pub key_file: PathBuf,
    pub cookie_secure: bool,
    pub allow_ephemeral: bool,
}

/// Session settings ready to hand to the cookie middleware.
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
}

#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
}

/// Load the session key and cookie flags.
///
/// # Examples
///
/// ```rust
/// use circle::inbound::http::session_config::{session_settings, BuildMode, SessionOptions};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let key_file = std::env::temp_dir().join("circle_session_key_example");
/// std::fs::write(&key_file, vec![b'k'; 64])?;
///
/// let options = SessionOptions {
///     key_file: key_file.clone(),
///     cookie_secure: true,
///     allow_ephemeral: false,
/// };
/// let settings = session_settings(&options, BuildMode::Release)?;
/// assert!(settings.cookie_secure);
///
/// std::fs::remove_file(&key_file)?;
/// # Ok(())
/// # }
/// ```
pub fn session_settings(
    options: &SessionOptions,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let key = load_key(&options.key_file, mode, options.allow_ephemeral)?;
    if !options.cookie_secure {
        warn!("session cookies are not marked Secure");
    }
    Ok(SessionSettings {
        key,
        cookie_secure: options.cookie_secure,
    })
}

fn load_key(path: &Path, mode: BuildMode, allow_ephemeral: bool) -> Result<Key, SessionConfigError> {
    match std::fs::read(path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path: path.to_path_buf(),
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode == BuildMode::Debug || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key; sessions will not survive a restart"
            );
            Ok(Key::generate())
        }
        Err(error) => Err(SessionConfigError::KeyRead {
            path: path.to_path_buf(),
            source: error,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    struct TempKeyFile {
        path: PathBuf,
    }

    impl TempKeyFile {
        fn new(len: usize) -> Self {
            let path = std::env::temp_dir().join(format!("session-key-{}", Uuid::new_v4()));
            std::fs::write(&path, vec![b'a'; len]).expect("write key file");
            Self { path }
        }
    }

    impl Drop for TempKeyFile {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.path);
        }
    }

    fn options(key_file: PathBuf, allow_ephemeral: bool) -> SessionOptions {
        SessionOptions {
            key_file,
            cookie_secure: true,
            allow_ephemeral,
        }
    }

    fn missing_path() -> PathBuf {
        std::env::temp_dir().join(format!("missing-{}", Uuid::new_v4()))
    }

    #[rstest]
    fn release_accepts_long_enough_key() {
        let key = TempKeyFile::new(SESSION_KEY_MIN_LEN);
        let settings =
            session_settings(&options(key.path.clone(), false), BuildMode::Release).expect("ok");
        assert!(settings.cookie_secure);
    }

    #[rstest]
    #[case(BuildMode::Release)]
    #[case(BuildMode::Debug)]
    fn short_keys_are_rejected(#[case] mode: BuildMode) {
        let key = TempKeyFile::new(SESSION_KEY_MIN_LEN - 1);
        let result = session_settings(&options(key.path.clone(), true), mode);
        assert!(matches!(
            result,
            Err(SessionConfigError::KeyTooShort { length, .. }) if length == SESSION_KEY_MIN_LEN - 1
        ));
    }

    #[rstest]
    #[case(BuildMode::Release, false, false)]
    #[case(BuildMode::Release, true, true)]
    #[case(BuildMode::Debug, false, true)]
    fn missing_key_falls_back_only_when_allowed(
        #[case] mode: BuildMode,
        #[case] allow_ephemeral: bool,
        #[case] succeeds: bool,
    ) {
        let result = session_settings(&options(missing_path(), allow_ephemeral), mode);
        assert_eq!(result.is_ok(), succeeds);
    }

    #[rstest]
    fn same_key_file_derives_same_key() {
        let key = TempKeyFile::new(SESSION_KEY_MIN_LEN);
        let first = load_key(&key.path, BuildMode::Release, false).expect("key");
        let second = load_key(&key.path, BuildMode::Release, false).expect("key");
        assert_eq!(first.master(), second.master());
    }
}
