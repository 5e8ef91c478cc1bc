// crates/vault-script-config/src/config.rs
// ============================================================================
// Module: Vault Script Configuration
// Description: Configuration loading and validation for the script harness.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: vault-script-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! It seeds the interpreter settings, the execution context symbol and role
//! tables, and the audit sink. Missing or invalid configuration fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use vault_script_core::ActorIndex;
use vault_script_core::Address;
use vault_script_core::ExecutionContext;
use vault_script_core::FileAuditSink;
use vault_script_core::HandleKind;
use vault_script_core::InterpreterSettings;
use vault_script_core::LedgerHandle;
use vault_script_core::NoopAuditSink;
use vault_script_core::ScriptAuditSink;
use vault_script_core::ScriptLimits;
use vault_script_core::StderrAuditSink;
use vault_script_core::SymbolName;
use vault_script_core::runtime::settings::DEFAULT_AUTO_MINT_ASSETS;
use vault_script_core::runtime::settings::DEFAULT_BALANCE_TOLERANCE;
use vault_script_core::runtime::settings::DEFAULT_DEPOSITOR_SUFFIX;
use vault_script_core::runtime::settings::DEFAULT_VAULT;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "vault-script.toml";
/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "VAULT_SCRIPT_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of configured symbols.
pub(crate) const MAX_SYMBOLS: usize = 256;
/// Maximum number of configured roles.
pub(crate) const MAX_ROLES: usize = 64;
/// Maximum length of a symbol or role name.
pub(crate) const MAX_NAME_LENGTH: usize = 64;
/// Upper bound for `interpreter.max_script_bytes`.
pub(crate) const MAX_SCRIPT_BYTES_LIMIT: usize = 16 * 1024 * 1024;
/// Upper bound for `interpreter.max_script_lines`.
pub(crate) const MAX_SCRIPT_LINES_LIMIT: usize = 65_536;

// ============================================================================
// SECTION: Config Model
// ============================================================================

/// Harness configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Interpreter tunables.
    #[serde(default)]
    pub interpreter: InterpreterConfig,
    /// Contract symbols registered in every new context.
    #[serde(default)]
    pub symbols: Vec<SymbolConfig>,
    /// Actor roles registered in every new context.
    #[serde(default)]
    pub roles: Vec<RoleConfig>,
    /// Audit output.
    #[serde(default)]
    pub audit: AuditConfig,
}

/// `[interpreter]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpreterConfig {
    /// Allowed absolute difference for balance assertions (fixed-point units).
    #[serde(default = "default_balance_tolerance")]
    pub balance_tolerance: u64,
    /// Vault used when a line names none.
    #[serde(default = "default_vault")]
    pub default_vault: String,
    /// Suffix naming a vault's depositor.
    #[serde(default = "default_depositor_suffix")]
    pub depositor_suffix: String,
    /// Assets whose deposit shortfall is minted automatically.
    #[serde(default = "default_auto_mint_assets")]
    pub auto_mint_assets: Vec<String>,
    /// Maximum script size in bytes.
    #[serde(default = "default_max_script_bytes")]
    pub max_script_bytes: usize,
    /// Maximum command lines per script.
    #[serde(default = "default_max_script_lines")]
    pub max_script_lines: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            balance_tolerance: default_balance_tolerance(),
            default_vault: default_vault(),
            depositor_suffix: default_depositor_suffix(),
            auto_mint_assets: default_auto_mint_assets(),
            max_script_bytes: default_max_script_bytes(),
            max_script_lines: default_max_script_lines(),
        }
    }
}

/// `[[symbols]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolConfig {
    /// Script-level name (`USDe`).
    pub name: String,
    /// Contract kind.
    pub kind: HandleKind,
    /// Contract address (`0x` + 40 hex digits).
    pub address: String,
}

/// `[[roles]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleConfig {
    /// Role name (`owner`).
    pub name: String,
    /// Signer index bound to the role.
    pub index: u32,
}

/// Audit sink selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// Discard events.
    #[default]
    Noop,
    /// JSON lines on stderr.
    Stderr,
    /// JSON lines appended to `audit.path`.
    File,
}

/// `[audit]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Sink kind.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Log file path for file sinks.
    #[serde(default)]
    pub path: Option<String>,
}

// ============================================================================
// SECTION: Loading and Validation
// ============================================================================

impl HarnessConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.interpreter.validate()?;
        validate_symbols(&self.symbols)?;
        validate_roles(&self.roles)?;
        self.audit.validate()
    }

    /// Returns the interpreter settings described by `[interpreter]`.
    #[must_use]
    pub fn interpreter_settings(&self) -> InterpreterSettings {
        let interpreter = &self.interpreter;
        InterpreterSettings {
            balance_tolerance: u128::from(interpreter.balance_tolerance),
            default_vault: SymbolName::new(interpreter.default_vault.as_str()),
            depositor_suffix: interpreter.depositor_suffix.clone(),
            auto_mint_assets: interpreter
                .auto_mint_assets
                .iter()
                .map(|asset| SymbolName::new(asset.as_str()))
                .collect(),
            limits: ScriptLimits {
                max_bytes: interpreter.max_script_bytes,
                max_lines: interpreter.max_script_lines,
            },
        }
    }

    /// Builds an execution context seeded with configured symbols and roles.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a symbol address is malformed.
    pub fn build_context(&self) -> Result<ExecutionContext, ConfigError> {
        let mut context = ExecutionContext::new();
        for symbol in &self.symbols {
            let address = parse_address(symbol)?;
            context.register(
                SymbolName::new(symbol.name.as_str()),
                LedgerHandle::new(symbol.kind, address),
            );
        }
        for role in &self.roles {
            context.register_role(role.name.clone(), ActorIndex::new(role.index));
        }
        Ok(context)
    }

    /// Builds the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the audit file cannot be opened, or
    /// [`ConfigError::Invalid`] when a file sink has no path.
    pub fn build_audit_sink(&self) -> Result<Arc<dyn ScriptAuditSink>, ConfigError> {
        match self.audit.sink {
            AuditSinkKind::Noop => Ok(Arc::new(NoopAuditSink)),
            AuditSinkKind::Stderr => Ok(Arc::new(StderrAuditSink)),
            AuditSinkKind::File => {
                let path = self.audit.path.as_deref().ok_or_else(|| {
                    ConfigError::Invalid("audit.path is required for file sinks".to_string())
                })?;
                let sink = FileAuditSink::new(Path::new(path.trim()))
                    .map_err(|err| ConfigError::Io(err.to_string()))?;
                Ok(Arc::new(sink))
            }
        }
    }
}

impl InterpreterConfig {
    /// Validates interpreter tunables.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_name("interpreter.default_vault", &self.default_vault)?;
        validate_name("interpreter.depositor_suffix", &self.depositor_suffix)?;
        for asset in &self.auto_mint_assets {
            validate_name("interpreter.auto_mint_assets", asset)?;
        }
        if self.max_script_bytes == 0 || self.max_script_bytes > MAX_SCRIPT_BYTES_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "interpreter.max_script_bytes must be between 1 and {MAX_SCRIPT_BYTES_LIMIT}"
            )));
        }
        if self.max_script_lines == 0 || self.max_script_lines > MAX_SCRIPT_LINES_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "interpreter.max_script_lines must be between 1 and {MAX_SCRIPT_LINES_LIMIT}"
            )));
        }
        Ok(())
    }
}

impl AuditConfig {
    /// Validates the audit sink selection.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, self.path.as_deref()) {
            (AuditSinkKind::File, Some(path)) => validate_path_string("audit.path", path),
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required for file sinks".to_string()))
            }
            (_, Some(_)) => {
                Err(ConfigError::Invalid("audit.path requires sink = \"file\"".to_string()))
            }
            (_, None) => Ok(()),
        }
    }
}

/// Validates symbol entries.
fn validate_symbols(symbols: &[SymbolConfig]) -> Result<(), ConfigError> {
    if symbols.len() > MAX_SYMBOLS {
        return Err(ConfigError::Invalid(format!("too many symbols (max {MAX_SYMBOLS})")));
    }
    let mut seen = BTreeSet::new();
    for symbol in symbols {
        validate_name("symbols.name", &symbol.name)?;
        if !seen.insert(symbol.name.as_str()) {
            return Err(ConfigError::Invalid(format!("duplicate symbols.name: {}", symbol.name)));
        }
        parse_address(symbol)?;
    }
    Ok(())
}

/// Validates role entries.
fn validate_roles(roles: &[RoleConfig]) -> Result<(), ConfigError> {
    if roles.len() > MAX_ROLES {
        return Err(ConfigError::Invalid(format!("too many roles (max {MAX_ROLES})")));
    }
    let mut seen = BTreeSet::new();
    for role in roles {
        validate_name("roles.name", &role.name)?;
        if !seen.insert(role.name.as_str()) {
            return Err(ConfigError::Invalid(format!("duplicate roles.name: {}", role.name)));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from an explicit path or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().to_string_lossy().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates an identifier-shaped name.
fn validate_name(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.len() > MAX_NAME_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds {MAX_NAME_LENGTH} bytes")));
    }
    if !SymbolName::is_valid(value) {
        return Err(ConfigError::Invalid(format!(
            "{field} must be ascii alphanumeric or underscore: {value}"
        )));
    }
    Ok(())
}

/// Parses a symbol's address.
fn parse_address(symbol: &SymbolConfig) -> Result<Address, ConfigError> {
    Address::parse(symbol.address.trim()).ok_or_else(|| {
        ConfigError::Invalid(format!(
            "symbols.address for {} must be 0x followed by 40 hex digits",
            symbol.name
        ))
    })
}

/// Default for `interpreter.balance_tolerance`.
fn default_balance_tolerance() -> u64 {
    u64::try_from(DEFAULT_BALANCE_TOLERANCE).unwrap_or(1)
}

/// Default for `interpreter.default_vault`.
fn default_vault() -> String {
    DEFAULT_VAULT.to_string()
}

/// Default for `interpreter.depositor_suffix`.
fn default_depositor_suffix() -> String {
    DEFAULT_DEPOSITOR_SUFFIX.to_string()
}

/// Default for `interpreter.auto_mint_assets`.
fn default_auto_mint_assets() -> Vec<String> {
    DEFAULT_AUTO_MINT_ASSETS.iter().map(|asset| (*asset).to_string()).collect()
}

/// Default for `interpreter.max_script_bytes`.
fn default_max_script_bytes() -> usize {
    ScriptLimits::default().max_bytes
}

/// Default for `interpreter.max_script_lines`.
fn default_max_script_lines() -> usize {
    ScriptLimits::default().max_lines
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::validate_name;
    use super::validate_path_string;

    #[test]
    fn validate_name_rejects_dashes_and_blanks() {
        assert!(validate_name("field", "pUSDe").is_ok());
        assert!(validate_name("field", "p-USDe").is_err());
        assert!(validate_name("field", "").is_err());
    }

    #[test]
    fn validate_path_string_rejects_blank_paths() {
        assert!(validate_path_string("audit.path", "./audit.jsonl").is_ok());
        assert!(validate_path_string("audit.path", "   ").is_err());
    }
}
