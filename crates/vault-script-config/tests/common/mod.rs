// crates/vault-script-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across integration tests for vault-script-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use vault_script_config::ConfigError;
use vault_script_config::HarnessConfig;

/// Parses a TOML string into a `HarnessConfig` for tests.
pub fn config_from_toml(toml_str: &str) -> Result<HarnessConfig, toml::de::Error> {
    toml::from_str(toml_str)
}

/// Returns a minimal config with all defaults applied.
pub fn minimal_config() -> Result<HarnessConfig, toml::de::Error> {
    config_from_toml("")
}

/// Returns a config registering the standard USDe/pUSDe deployment.
pub fn deployment_config() -> Result<HarnessConfig, toml::de::Error> {
    config_from_toml(
        r#"
[[symbols]]
name = "USDe"
kind = "asset"
address = "0x00000000000000000000000000000000000000a1"

[[symbols]]
name = "pUSDe"
kind = "vault"
address = "0x00000000000000000000000000000000000000B2"

[[symbols]]
name = "pUSDeDepositor"
kind = "depositor"
address = "0x00000000000000000000000000000000000000c3"

[[roles]]
name = "admin"
index = 3
"#,
    )
}

/// Asserts that `result` failed with a message containing `needle`.
pub fn assert_invalid<T>(result: Result<T, ConfigError>, needle: &str) -> Result<(), String> {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}
