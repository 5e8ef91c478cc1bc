// crates/vault-script-core/src/core/identifiers.rs
// ============================================================================
// Module: Vault Script Identifiers
// Description: Typed identifiers for actors, symbols, and ledger addresses.
// Purpose: Keep script names and ledger addresses from mixing at call sites.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Scripts name actors by index (`User1`) or role (`owner`) and contracts by
//! symbol (`USDe`, `pUSDe`). Ledger calls take addresses. Each concept gets
//! its own type so resolution steps are explicit.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Number of hex digits in an account address.
const ADDRESS_HEX_DIGITS: usize = 40;
/// Prefix used by actor tokens in scripts.
pub const ACTOR_PREFIX: &str = "User";

// ============================================================================
// SECTION: Address
// ============================================================================

/// Ledger account or contract address.
///
/// # Invariants
/// - Opaque to the interpreter; compared by exact string equality.
/// - [`Address::parse`] yields lowercase `0x`-prefixed 40-digit hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Wraps an address string without validation.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Parses a `0x`-prefixed hex address, normalizing to lowercase.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let hex = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X"))?;
        if hex.len() != ADDRESS_HEX_DIGITS || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        Some(Self(format!("0x{}", hex.to_ascii_lowercase())))
    }

    /// Builds a deterministic address from a numeric seed.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self(format!("0x{seed:040x}"))
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// SECTION: Symbols
// ============================================================================

/// Script-level contract name (`USDe`, `pUSDeDepositor`).
///
/// # Invariants
/// - Names are case-sensitive.
/// - Script-parsed names contain only ASCII alphanumerics and `_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolName(String);

impl SymbolName {
    /// Creates a new symbol name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns this symbol with `suffix` appended (`pUSDe` -> `pUSDeDepositor`).
    #[must_use]
    pub fn with_suffix(&self, suffix: &str) -> Self {
        Self(format!("{}{suffix}", self.0))
    }

    /// Returns true when `name` is a non-empty word of ASCII alphanumerics or `_`.
    #[must_use]
    pub fn is_valid(name: &str) -> bool {
        !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
    }
}

impl fmt::Display for SymbolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for SymbolName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Actors
// ============================================================================

/// Signer index referenced by `User<N>` tokens.
///
/// # Invariants
/// - Zero-based, matching the signer registry order (`User0` is the deployer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorIndex(u32);

impl ActorIndex {
    /// Creates an actor index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Parses a `User<N>` token.
    #[must_use]
    pub fn parse_token(token: &str) -> Option<Self> {
        let digits = token.strip_prefix(ACTOR_PREFIX)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().map(Self)
    }
}

impl fmt::Display for ActorIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ACTOR_PREFIX}{}", self.0)
    }
}

/// Reference to an actor before resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ActorRef {
    /// Signer index (`User1`).
    Index(ActorIndex),
    /// Named role (`owner`) looked up in the context role table.
    Role(String),
}

impl fmt::Display for ActorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => index.fmt(f),
            Self::Role(role) => role.fmt(f),
        }
    }
}

/// Actor resolved against the signer registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Signer index backing the actor.
    pub index: ActorIndex,
    /// Signer address.
    pub address: Address,
}
