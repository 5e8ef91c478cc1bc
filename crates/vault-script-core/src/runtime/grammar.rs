// crates/vault-script-core/src/runtime/grammar.rs
// ============================================================================
// Module: Vault Script Grammar
// Description: Ordered line rules that turn script text into commands.
// Purpose: Parse one trimmed line into a typed `Command`, first match wins.
// Dependencies: crate::core, crate::runtime::error
// ============================================================================

//! ## Overview
//! The grammar is an ordered table of [`GrammarRule`]s. Each rule tokenizes
//! the line on whitespace and either consumes every token or declines. The
//! first rule that accepts the line governs; rule order is part of the
//! contract because rules may overlap (`balance: User2 ...` is both an actor
//! holder and a named holder).
//!
//! ### Grammar
//! ```text
//! User<N>: deposit <amount> <TOKEN>[ into <VAULT>]
//! User<N>: withdraw <amount|amount%> <TOKEN>[ from <VAULT>]
//! User<N>: mint <amount> <TOKEN>
//! User<N>: cooldown <amount|amount%> <VAULT>
//! User<N>: unstake from <VAULT>
//! balance: (User<N>|<NAME>) <amount> <TOKEN>
//! totalSupply: <amount> <TOKEN>
//! wait: <N> (days|hours)
//! error: <line> | <expectedSubstring>
//! ```

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::amount::AmountSpec;
use crate::core::amount::DecimalLiteral;
use crate::core::command::Command;
use crate::core::command::Holder;
use crate::core::identifiers::ActorIndex;
use crate::core::identifiers::SymbolName;
use crate::core::script::Script;
use crate::core::script::ScriptLine;
use crate::core::time::WaitDuration;
use crate::core::time::WaitUnit;
use crate::runtime::error::ScriptError;
use crate::runtime::error::ScriptFailure;

// ============================================================================
// SECTION: Rule Table
// ============================================================================

/// Outcome of a rule: `None` declines, `Some` governs the line.
type RuleOutcome = Option<Result<Command, ScriptError>>;

/// One grammar rule.
#[derive(Clone, Copy)]
pub struct GrammarRule {
    /// Stable rule name.
    pub name: &'static str,
    /// Rule parser.
    parse: fn(&str) -> RuleOutcome,
}

impl GrammarRule {
    /// Returns true when this rule would govern `line` on its own.
    #[must_use]
    pub fn matches(&self, line: &str) -> bool {
        (self.parse)(line.trim()).is_some()
    }
}

/// Grammar rules in match order.
pub const GRAMMAR: &[GrammarRule] = &[
    GrammarRule {
        name: "error",
        parse: parse_error,
    },
    GrammarRule {
        name: "wait",
        parse: parse_wait,
    },
    GrammarRule {
        name: "deposit_into",
        parse: parse_deposit_into,
    },
    GrammarRule {
        name: "deposit",
        parse: parse_deposit,
    },
    GrammarRule {
        name: "withdraw_from",
        parse: parse_withdraw_from,
    },
    GrammarRule {
        name: "withdraw",
        parse: parse_withdraw,
    },
    GrammarRule {
        name: "mint",
        parse: parse_mint,
    },
    GrammarRule {
        name: "cooldown",
        parse: parse_cooldown,
    },
    GrammarRule {
        name: "unstake",
        parse: parse_unstake,
    },
    GrammarRule {
        name: "balance_actor",
        parse: parse_balance_actor,
    },
    GrammarRule {
        name: "balance_named",
        parse: parse_balance_named,
    },
    GrammarRule {
        name: "total_supply",
        parse: parse_total_supply,
    },
];

// ============================================================================
// SECTION: Public API
// ============================================================================

/// Parses one script line into a command.
///
/// # Errors
///
/// Returns [`ScriptError::UnrecognizedLine`] when no rule accepts the line.
pub fn parse_line(line: &str) -> Result<Command, ScriptError> {
    let trimmed = line.trim();
    GRAMMAR.iter().find_map(|rule| (rule.parse)(trimmed)).unwrap_or_else(|| {
        Err(ScriptError::UnrecognizedLine {
            line: trimmed.to_string(),
        })
    })
}

/// Returns the name of the rule that governs `line`, if any.
#[must_use]
pub fn governing_rule(line: &str) -> Option<&'static str> {
    GRAMMAR.iter().find(|rule| rule.matches(line)).map(|rule| rule.name)
}

/// Parses every line of a script without executing anything.
///
/// # Errors
///
/// Returns [`ScriptFailure`] for the first line that does not parse.
pub fn parse_script(script: &Script) -> Result<Vec<(ScriptLine, Command)>, ScriptFailure> {
    script
        .lines()
        .iter()
        .map(|line| {
            parse_line(&line.text).map(|command| (line.clone(), command)).map_err(|source| {
                ScriptFailure {
                    line_number: line.number,
                    line: line.text.clone(),
                    source,
                }
            })
        })
        .collect()
}

// ============================================================================
// SECTION: Tokens
// ============================================================================

/// Whitespace token cursor.
struct Tokens<'a> {
    /// Tokens in order.
    items: Vec<&'a str>,
    /// Index of the next token.
    position: usize,
}

impl<'a> Tokens<'a> {
    /// Splits a line into tokens.
    fn new(line: &'a str) -> Self {
        Self {
            items: line.split_whitespace().collect(),
            position: 0,
        }
    }

    /// Returns the next token.
    fn take(&mut self) -> Option<&'a str> {
        let token = self.items.get(self.position).copied()?;
        self.position += 1;
        Some(token)
    }

    /// Consumes an exact keyword.
    fn keyword(&mut self, keyword: &str) -> Option<()> {
        (self.take()? == keyword).then_some(())
    }

    /// Consumes a `User<N>:` line header.
    fn actor_header(&mut self) -> Option<ActorIndex> {
        ActorIndex::parse_token(self.take()?.strip_suffix(':')?)
    }

    /// Consumes an absolute amount literal.
    fn amount(&mut self) -> Option<DecimalLiteral> {
        let token = self.take()?;
        is_amount_literal(token).then(|| DecimalLiteral::new(token))
    }

    /// Consumes an absolute or percentage amount literal.
    fn amount_spec(&mut self) -> Option<AmountSpec> {
        let token = self.take()?;
        if let Some(percent) = token.strip_suffix('%') {
            return is_amount_literal(percent)
                .then(|| AmountSpec::Percent(DecimalLiteral::new(percent)));
        }
        is_amount_literal(token).then(|| AmountSpec::Absolute(DecimalLiteral::new(token)))
    }

    /// Consumes a symbol name.
    fn symbol(&mut self) -> Option<SymbolName> {
        let token = self.take()?;
        SymbolName::is_valid(token).then(|| SymbolName::new(token))
    }

    /// Succeeds only when every token was consumed.
    fn finish(&self) -> Option<()> {
        (self.position == self.items.len()).then_some(())
    }
}

/// Returns true for `[0-9.]+` literals; numeric validity is checked later.
fn is_amount_literal(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit() || b == b'.')
}

// ============================================================================
// SECTION: Rules
// ============================================================================

/// `error: <line> | <expected>`; the split happens at the last `|`.
fn parse_error(line: &str) -> RuleOutcome {
    let rest = line.strip_prefix("error:")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let (inner, expected) = rest.rsplit_once('|')?;
    let (inner, expected) = (inner.trim(), expected.trim());
    if inner.is_empty() || expected.is_empty() {
        return None;
    }
    Some(parse_line(inner).map(|command| Command::ExpectFailure {
        inner: Box::new(command),
        inner_line: inner.to_string(),
        expected: expected.to_string(),
    }))
}

/// `wait: <N> (days|hours)`.
fn parse_wait(line: &str) -> RuleOutcome {
    let mut tokens = Tokens::new(line);
    tokens.keyword("wait:")?;
    let amount = tokens.take()?;
    if amount.is_empty() || !amount.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let unit = WaitUnit::parse(tokens.take()?)?;
    tokens.finish()?;
    let Ok(amount) = amount.parse::<u64>() else {
        return Some(Err(ScriptError::TimeOverflow {
            seconds_label: format!("{amount} {}", unit.as_str()),
        }));
    };
    Some(Ok(Command::Wait {
        duration: WaitDuration::new(amount, unit),
    }))
}

/// `User<N>: deposit <amount> <TOKEN> into <VAULT>`.
fn parse_deposit_into(line: &str) -> RuleOutcome {
    let mut tokens = Tokens::new(line);
    let actor = tokens.actor_header()?;
    tokens.keyword("deposit")?;
    let amount = tokens.amount()?;
    let token = tokens.symbol()?;
    tokens.keyword("into")?;
    let vault = tokens.symbol()?;
    tokens.finish()?;
    Some(Ok(Command::Deposit {
        actor,
        amount,
        token,
        vault: Some(vault),
    }))
}

/// `User<N>: deposit <amount> <TOKEN>`.
fn parse_deposit(line: &str) -> RuleOutcome {
    let mut tokens = Tokens::new(line);
    let actor = tokens.actor_header()?;
    tokens.keyword("deposit")?;
    let amount = tokens.amount()?;
    let token = tokens.symbol()?;
    tokens.finish()?;
    Some(Ok(Command::Deposit {
        actor,
        amount,
        token,
        vault: None,
    }))
}

/// `User<N>: withdraw <amount|amount%> <TOKEN> from <VAULT>`.
fn parse_withdraw_from(line: &str) -> RuleOutcome {
    let mut tokens = Tokens::new(line);
    let actor = tokens.actor_header()?;
    tokens.keyword("withdraw")?;
    let amount = tokens.amount_spec()?;
    let token = tokens.symbol()?;
    tokens.keyword("from")?;
    let vault = tokens.symbol()?;
    tokens.finish()?;
    Some(Ok(Command::Withdraw {
        actor,
        amount,
        token,
        vault: Some(vault),
    }))
}

/// `User<N>: withdraw <amount|amount%> <TOKEN>`.
fn parse_withdraw(line: &str) -> RuleOutcome {
    let mut tokens = Tokens::new(line);
    let actor = tokens.actor_header()?;
    tokens.keyword("withdraw")?;
    let amount = tokens.amount_spec()?;
    let token = tokens.symbol()?;
    tokens.finish()?;
    Some(Ok(Command::Withdraw {
        actor,
        amount,
        token,
        vault: None,
    }))
}

/// `User<N>: mint <amount> <TOKEN>`.
fn parse_mint(line: &str) -> RuleOutcome {
    let mut tokens = Tokens::new(line);
    let actor = tokens.actor_header()?;
    tokens.keyword("mint")?;
    let amount = tokens.amount()?;
    let token = tokens.symbol()?;
    tokens.finish()?;
    Some(Ok(Command::Mint {
        actor,
        amount,
        token,
    }))
}

/// `User<N>: cooldown <amount|amount%> <VAULT>`.
fn parse_cooldown(line: &str) -> RuleOutcome {
    let mut tokens = Tokens::new(line);
    let actor = tokens.actor_header()?;
    tokens.keyword("cooldown")?;
    let amount = tokens.amount_spec()?;
    let vault = tokens.symbol()?;
    tokens.finish()?;
    Some(Ok(Command::Cooldown {
        actor,
        amount,
        vault,
    }))
}

/// `User<N>: unstake from <VAULT>`.
fn parse_unstake(line: &str) -> RuleOutcome {
    let mut tokens = Tokens::new(line);
    let actor = tokens.actor_header()?;
    tokens.keyword("unstake")?;
    tokens.keyword("from")?;
    let vault = tokens.symbol()?;
    tokens.finish()?;
    Some(Ok(Command::Unstake {
        actor,
        vault,
    }))
}

/// `balance: User<N> <amount> <TOKEN>`.
fn parse_balance_actor(line: &str) -> RuleOutcome {
    let mut tokens = Tokens::new(line);
    tokens.keyword("balance:")?;
    let actor = ActorIndex::parse_token(tokens.take()?)?;
    let amount = tokens.amount()?;
    let token = tokens.symbol()?;
    tokens.finish()?;
    Some(Ok(Command::Balance {
        holder: Holder::Actor(actor),
        amount,
        token,
    }))
}

/// `balance: <NAME> <amount> <TOKEN>`.
fn parse_balance_named(line: &str) -> RuleOutcome {
    let mut tokens = Tokens::new(line);
    tokens.keyword("balance:")?;
    let holder = tokens.symbol()?;
    let amount = tokens.amount()?;
    let token = tokens.symbol()?;
    tokens.finish()?;
    Some(Ok(Command::Balance {
        holder: Holder::Named(holder.as_str().to_string()),
        amount,
        token,
    }))
}

/// `totalSupply: <amount> <TOKEN>`.
fn parse_total_supply(line: &str) -> RuleOutcome {
    let mut tokens = Tokens::new(line);
    tokens.keyword("totalSupply:")?;
    let amount = tokens.amount()?;
    let token = tokens.symbol()?;
    tokens.finish()?;
    Some(Ok(Command::TotalSupply {
        amount,
        token,
    }))
}
