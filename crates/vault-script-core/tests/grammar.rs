// crates/vault-script-core/tests/grammar.rs
// ============================================================================
// Module: Grammar Tests
// Description: Tests for line rules, rule ordering, and dry-run parsing.
// ============================================================================
//! ## Overview
//! Validates that each script verb parses into the expected command, that
//! the first matching rule governs overlapping lines, and that malformed
//! lines are rejected without touching a ledger.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use vault_script_core::ActorIndex;
use vault_script_core::AmountSpec;
use vault_script_core::Command;
use vault_script_core::DecimalLiteral;
use vault_script_core::Holder;
use vault_script_core::Script;
use vault_script_core::ScriptError;
use vault_script_core::ScriptLimits;
use vault_script_core::SymbolName;
use vault_script_core::WaitDuration;
use vault_script_core::WaitUnit;
use vault_script_core::runtime::GRAMMAR;
use vault_script_core::runtime::governing_rule;
use vault_script_core::runtime::parse_line;
use vault_script_core::runtime::parse_script;

fn assert_unrecognized(line: &str) {
    match parse_line(line) {
        Err(ScriptError::UnrecognizedLine {
            ..
        }) => {}
        other => panic!("expected unrecognized line for `{line}`, got {other:?}"),
    }
}

// ============================================================================
// SECTION: Rule Ordering
// ============================================================================

#[test]
fn grammar_rules_keep_documented_order() {
    let names: Vec<&str> = GRAMMAR.iter().map(|rule| rule.name).collect();
    assert_eq!(
        names,
        [
            "error",
            "wait",
            "deposit_into",
            "deposit",
            "withdraw_from",
            "withdraw",
            "mint",
            "cooldown",
            "unstake",
            "balance_actor",
            "balance_named",
            "total_supply",
        ]
    );
}

#[test]
fn first_matching_rule_governs_overlapping_balance_lines() {
    let line = "balance: User2 3 USDe";
    let matching: Vec<&str> =
        GRAMMAR.iter().filter(|rule| rule.matches(line)).map(|rule| rule.name).collect();
    assert_eq!(matching, ["balance_actor", "balance_named"]);
    assert_eq!(governing_rule(line), Some("balance_actor"));
    assert_eq!(
        parse_line(line).unwrap(),
        Command::Balance {
            holder: Holder::Actor(ActorIndex::new(2)),
            amount: DecimalLiteral::new("3"),
            token: SymbolName::new("USDe"),
        }
    );
}

#[test]
fn withdraw_from_rule_precedes_bare_withdraw() {
    assert_eq!(governing_rule("User1: withdraw 5 USDe from sUSDe"), Some("withdraw_from"));
    assert_eq!(governing_rule("User1: withdraw 5 USDe"), Some("withdraw"));
    assert!(!GRAMMAR[5].matches("User1: withdraw 5 USDe from sUSDe"));
}

// ============================================================================
// SECTION: Verbs
// ============================================================================

#[test]
fn deposit_parses_with_and_without_vault() {
    assert_eq!(
        parse_line("User1: deposit 10 USDe").unwrap(),
        Command::Deposit {
            actor: ActorIndex::new(1),
            amount: DecimalLiteral::new("10"),
            token: SymbolName::new("USDe"),
            vault: None,
        }
    );
    assert_eq!(
        parse_line("  User12: deposit 0.5 USDe into sUSDe  ").unwrap(),
        Command::Deposit {
            actor: ActorIndex::new(12),
            amount: DecimalLiteral::new("0.5"),
            token: SymbolName::new("USDe"),
            vault: Some(SymbolName::new("sUSDe")),
        }
    );
}

#[test]
fn withdraw_and_cooldown_accept_percentages() {
    assert_eq!(
        parse_line("User2: withdraw 100% USDe").unwrap(),
        Command::Withdraw {
            actor: ActorIndex::new(2),
            amount: AmountSpec::Percent(DecimalLiteral::new("100")),
            token: SymbolName::new("USDe"),
            vault: None,
        }
    );
    assert_eq!(
        parse_line("User3: cooldown 25% sUSDe").unwrap(),
        Command::Cooldown {
            actor: ActorIndex::new(3),
            amount: AmountSpec::Percent(DecimalLiteral::new("25")),
            vault: SymbolName::new("sUSDe"),
        }
    );
    assert_eq!(
        parse_line("User3: cooldown 7.25 sUSDe").unwrap(),
        Command::Cooldown {
            actor: ActorIndex::new(3),
            amount: AmountSpec::Absolute(DecimalLiteral::new("7.25")),
            vault: SymbolName::new("sUSDe"),
        }
    );
}

#[test]
fn absolute_only_verbs_reject_percentages() {
    assert_unrecognized("User1: deposit 10% USDe");
    assert_unrecognized("User1: mint 10% USDe");
    assert_unrecognized("balance: User1 10% USDe");
    assert_unrecognized("totalSupply: 10% pUSDe");
}

#[test]
fn remaining_verbs_parse() {
    assert_eq!(
        parse_line("User1: mint 1000 USDe").unwrap(),
        Command::Mint {
            actor: ActorIndex::new(1),
            amount: DecimalLiteral::new("1000"),
            token: SymbolName::new("USDe"),
        }
    );
    assert_eq!(
        parse_line("User4: unstake from sUSDe").unwrap(),
        Command::Unstake {
            actor: ActorIndex::new(4),
            vault: SymbolName::new("sUSDe"),
        }
    );
    assert_eq!(
        parse_line("balance: pUSDe 30 USDe").unwrap(),
        Command::Balance {
            holder: Holder::Named("pUSDe".to_string()),
            amount: DecimalLiteral::new("30"),
            token: SymbolName::new("USDe"),
        }
    );
    assert_eq!(
        parse_line("totalSupply: 30 pUSDe").unwrap(),
        Command::TotalSupply {
            amount: DecimalLiteral::new("30"),
            token: SymbolName::new("pUSDe"),
        }
    );
    assert_eq!(
        parse_line("wait: 8 hours").unwrap(),
        Command::Wait {
            duration: WaitDuration::new(8, WaitUnit::Hours),
        }
    );
}

#[test]
fn malformed_lines_are_unrecognized() {
    assert_unrecognized("frobnicate: 5 USDe");
    assert_unrecognized("User1: deposit 10 USDe extra");
    assert_unrecognized("User1 deposit 10 USDe");
    assert_unrecognized("user1: deposit 10 USDe");
    assert_unrecognized("User1: deposit -10 USDe");
    assert_unrecognized("User1: deposit 1e18 USDe");
    assert_unrecognized("wait: 1.5 days");
    assert_unrecognized("wait: 2 weeks");
    assert_unrecognized("User1: unstake sUSDe");
}

#[test]
fn lexically_valid_amounts_defer_numeric_checks() {
    let command = parse_line("User1: mint 1.2.3 USDe").unwrap();
    let Command::Mint {
        amount,
        ..
    } = command
    else {
        panic!("expected mint");
    };
    assert!(amount.to_fixed_point().is_err());
}

#[test]
fn wait_amounts_beyond_u64_report_time_overflow() {
    let error = parse_line("wait: 99999999999999999999 days").unwrap_err();
    assert_eq!(
        error,
        ScriptError::TimeOverflow {
            seconds_label: "99999999999999999999 days".to_string(),
        }
    );
    assert_eq!(governing_rule("wait: 99999999999999999999 hours"), Some("wait"));
    assert_unrecognized("wait: 99999999999999999999 weeks");
}

// ============================================================================
// SECTION: Error Expectations
// ============================================================================

#[test]
fn error_lines_wrap_the_nested_command() {
    assert_eq!(
        parse_line("error: User1: withdraw 1 USDe | ERC4626ExceededMaxWithdraw").unwrap(),
        Command::ExpectFailure {
            inner: Box::new(Command::Withdraw {
                actor: ActorIndex::new(1),
                amount: AmountSpec::Absolute(DecimalLiteral::new("1")),
                token: SymbolName::new("USDe"),
                vault: None,
            }),
            inner_line: "User1: withdraw 1 USDe".to_string(),
            expected: "ERC4626ExceededMaxWithdraw".to_string(),
        }
    );
}

#[test]
fn nested_error_lines_split_at_last_separator() {
    let Command::ExpectFailure {
        inner,
        expected,
        ..
    } = parse_line("error: error: User1: unstake from sUSDe | InvalidCooldown | expected failure")
        .unwrap()
    else {
        panic!("expected error wrapper");
    };
    assert_eq!(expected, "expected failure");
    assert!(matches!(*inner, Command::ExpectFailure { .. }));
}

#[test]
fn error_lines_need_separator_and_expectation() {
    assert_unrecognized("error: User1: withdraw 1 USDe");
    assert_unrecognized("error: User1: withdraw 1 USDe |   ");
    assert_unrecognized("error:User1: withdraw 1 USDe | boom");
    assert_unrecognized("error: frobnicate 5 | boom");
}

// ============================================================================
// SECTION: Dry Run
// ============================================================================

#[test]
fn parse_script_reports_first_bad_line_number() {
    let script = Script::parse(
        "# setup\nUser1: deposit 10 USDe\n\n// check\nbalance: pUSDe 10 USDe\nnope\n",
        ScriptLimits::default(),
    )
    .unwrap();
    let failure = parse_script(&script).unwrap_err();
    assert_eq!(failure.line_number, 6);
    assert_eq!(failure.line, "nope");
    assert_eq!(failure.source.kind(), "unrecognized_line");
    assert_eq!(failure.source.to_string(), "Invalid line: nope");
}

#[test]
fn comment_only_scripts_are_empty() {
    let script = Script::parse("# setup\n\n   // nothing yet\n", ScriptLimits::default()).unwrap();
    assert!(script.is_empty());
    assert!(parse_script(&script).unwrap().is_empty());
}

#[test]
fn parse_script_returns_commands_in_order() {
    let script =
        Script::parse("User1: deposit 10 USDe\nwait: 1 days\n", ScriptLimits::default()).unwrap();
    let commands = parse_script(&script).unwrap();
    let verbs: Vec<&str> = commands.iter().map(|(_, command)| command.verb()).collect();
    assert_eq!(verbs, ["deposit", "wait"]);
    assert!(!script.is_empty());
    assert_eq!(commands[1].0.number, 2);
}
