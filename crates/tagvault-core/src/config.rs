//! Options injected into row construction and processing.
//!
//! Hosts usually embed these in their own config file under a `[rows]` table
//! and hand the parsed value to [`RowFactory::with_options`](crate::RowFactory::with_options).

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowOptions {
    /// Emit `tracing` debug events while building, decrypting and resolving rows.
    pub debug: bool,
}

impl RowOptions {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }

    /// Parse options from a TOML fragment. Missing keys take their defaults.
    ///
    /// ```
    /// use tagvault_core::RowOptions;
    ///
    /// let opts = RowOptions::from_toml_str("debug = true").unwrap();
    /// assert!(opts.debug);
    /// ```
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VaultError;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let opts = RowOptions::from_toml_str("").unwrap();
        assert_eq!(opts, RowOptions::default());
        assert!(!opts.debug);
    }

    #[test]
    fn test_embedded_section() {
        #[derive(Deserialize)]
        struct HostConfig {
            rows: RowOptions,
        }

        let host: HostConfig = toml::from_str("[rows]\ndebug = true\n").unwrap();
        assert!(host.rows.debug);
    }

    #[test]
    fn test_bad_type_is_config_error() {
        let result = RowOptions::from_toml_str("debug = \"yes\"");
        assert!(matches!(result, Err(VaultError::Config(_))));
    }
}
