//! Runtime configuration from environment variables.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `BLOCKFALL_SEED` | system clock | RNG seed for piece selection |
//! | `BLOCKFALL_SAVE_PATH` | XDG data dir | Save file location |
//! | `BLOCKFALL_LOG_PATH` | unset | Enables file logging |
//! | `BLOCKFALL_SOFT_DROP_RELEASE_MS` | 300 | Soft drop auto-release timeout |
//! | `BLOCKFALL_BELL` | off | Ring the terminal bell on landings and game over |

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::input::DEFAULT_KEY_RELEASE_TIMEOUT_MS;
use crate::save::{save_path_in, SAVE_PATH_ENV};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Explicit seed; `None` derives one from the clock at startup
    pub seed: Option<u32>,
    pub save_path: PathBuf,
    pub log_path: Option<PathBuf>,
    pub soft_drop_release_ms: u32,
    pub bell: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    /// Build from an arbitrary variable source. Unparsable values fall back
    /// to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        let text = |key: &str| {
            lookup(key)
                .and_then(|v| v.into_string().ok())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let seed = text("BLOCKFALL_SEED").and_then(|s| s.parse().ok());

        let save_path = match lookup(SAVE_PATH_ENV).filter(|v| !v.is_empty()) {
            Some(explicit) => PathBuf::from(explicit),
            None => save_path_in(
                lookup("XDG_DATA_HOME").map(PathBuf::from),
                lookup("HOME").map(PathBuf::from),
            ),
        };

        let log_path = lookup("BLOCKFALL_LOG_PATH")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let soft_drop_release_ms = text("BLOCKFALL_SOFT_DROP_RELEASE_MS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_KEY_RELEASE_TIMEOUT_MS);

        let bell = text("BLOCKFALL_BELL")
            .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);

        Self {
            seed,
            save_path,
            log_path,
            soft_drop_release_ms,
            bell,
        }
    }

    /// The configured seed, or one taken from the system clock
    pub fn resolve_seed(&self) -> u32 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.subsec_nanos() ^ (d.as_secs() as u32))
                .unwrap_or(1)
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, OsString> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), OsString::from(v)))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_without_variables() {
        let cfg = config(&[]);
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.save_path, PathBuf::from("blockfall-save.json"));
        assert_eq!(cfg.log_path, None);
        assert_eq!(cfg.soft_drop_release_ms, 300);
        assert!(!cfg.bell);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let cfg = config(&[
            ("BLOCKFALL_SEED", "42"),
            ("BLOCKFALL_SAVE_PATH", "/tmp/game.json"),
            ("BLOCKFALL_LOG_PATH", "/tmp/blockfall.log"),
            ("BLOCKFALL_SOFT_DROP_RELEASE_MS", " 120 "),
            ("BLOCKFALL_BELL", "TRUE"),
        ]);
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.resolve_seed(), 42);
        assert_eq!(cfg.save_path, PathBuf::from("/tmp/game.json"));
        assert_eq!(cfg.log_path, Some(PathBuf::from("/tmp/blockfall.log")));
        assert_eq!(cfg.soft_drop_release_ms, 120);
        assert!(cfg.bell);
    }

    #[test]
    fn save_path_falls_back_to_home() {
        let cfg = config(&[("HOME", "/home/player")]);
        assert_eq!(
            cfg.save_path,
            PathBuf::from("/home/player/.local/share/blockfall/save.json")
        );
    }

    #[test]
    fn garbage_values_use_defaults() {
        let cfg = config(&[
            ("BLOCKFALL_SEED", "lots"),
            ("BLOCKFALL_SOFT_DROP_RELEASE_MS", "-5"),
            ("BLOCKFALL_BELL", "maybe"),
        ]);
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.soft_drop_release_ms, 300);
        assert!(!cfg.bell);
    }
}
