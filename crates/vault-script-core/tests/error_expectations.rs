// crates/vault-script-core/tests/error_expectations.rs
// ============================================================================
// Module: Error Expectation Tests
// Description: Tests for `error:` lines absorbing expected failures.
// ============================================================================
//! ## Overview
//! An `error:` line passes only when its nested command fails with a ledger
//! or assertion failure whose message contains the expected text. Every
//! other outcome aborts the script.

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

mod common;

use common::deploy;
use common::units;
use vault_script_core::ActorIndex;
use vault_script_core::CommandOutcome;
use vault_script_core::Ledger;
use vault_script_core::ScriptError;
use vault_script_core::SignerRegistry;

#[tokio::test]
async fn matching_revert_is_absorbed_and_script_continues() {
    let mut deployment = deploy();
    let interpreter = deployment.interpreter();
    let report = interpreter
        .run_script(
            &mut deployment.context,
            "User1: deposit 10 USDe
             error: User1: withdraw 11 USDe | ERC4626ExceededMaxWithdraw
             User1: withdraw 10 USDe
             balance: User1 10 USDe",
        )
        .await
        .unwrap();
    assert_eq!(report.absorbed_failures(), 1);
    let CommandOutcome::FailureAbsorbed {
        message,
    } = &report.lines[1].outcome
    else {
        panic!("expected absorbed failure, got {:?}", report.lines[1].outcome);
    };
    assert!(message.starts_with("execution reverted: ERC4626ExceededMaxWithdraw"));
    assert_eq!(report.lines[1].verb, "error");
}

#[tokio::test]
async fn reverted_command_leaves_ledger_untouched() {
    let mut deployment = deploy();
    deployment.ledger.set_deposits_enabled(&deployment.pusde, false).unwrap();
    let interpreter = deployment.interpreter();
    interpreter
        .run_script(
            &mut deployment.context,
            "error: User1: deposit 10 USDe into pUSDe | DepositsDisabled
             totalSupply: 0 pUSDe",
        )
        .await
        .unwrap();
    let vault_usde =
        deployment.ledger.balance_of(&deployment.usde, &deployment.pusde).await.unwrap();
    assert_eq!(vault_usde, 0);
}

#[tokio::test]
async fn successful_nested_command_fails_the_expectation() {
    let mut deployment = deploy();
    let interpreter = deployment.interpreter();
    let failure = interpreter
        .run_script(&mut deployment.context, "error: User1: mint 1 USDe | anything")
        .await
        .unwrap_err();
    assert_eq!(
        failure.source,
        ScriptError::ExpectedFailureNotRaised {
            line: "User1: mint 1 USDe".to_string(),
            expected: "anything".to_string(),
        }
    );
}

#[tokio::test]
async fn different_message_fails_the_expectation() {
    let mut deployment = deploy();
    let interpreter = deployment.interpreter();
    let failure = interpreter
        .run_script(
            &mut deployment.context,
            "error: User1: withdraw 1 USDe | erc4626ExceededMaxWithdraw",
        )
        .await
        .unwrap_err();
    let ScriptError::ErrorMessageMismatch {
        expected,
        actual,
    } = &failure.source
    else {
        panic!("expected message mismatch, got {failure:?}");
    };
    assert_eq!(expected, "erc4626ExceededMaxWithdraw");
    assert!(actual.contains("ERC4626ExceededMaxWithdraw"));
}

#[tokio::test]
async fn assertion_failures_are_expectable() {
    let mut deployment = deploy();
    let interpreter = deployment.interpreter();
    let report = interpreter
        .run_script(
            &mut deployment.context,
            "User1: mint 5 USDe
             error: balance: User1 6 USDe | balance mismatch
             error: totalSupply: 6 USDe | total supply mismatch",
        )
        .await
        .unwrap();
    assert_eq!(report.absorbed_failures(), 2);
}

#[tokio::test]
async fn authoring_errors_are_never_absorbed() {
    let mut deployment = deploy();
    let interpreter = deployment.interpreter();
    let failure = interpreter
        .run_script(&mut deployment.context, "error: User1: mint 1 FOO | unknown symbol")
        .await
        .unwrap_err();
    assert_eq!(failure.source.kind(), "unknown_symbol");

    let failure = interpreter
        .run_script(&mut deployment.context, "error: User1: cooldown 1 pUSDe | staking_vault")
        .await
        .unwrap_err();
    assert_eq!(failure.source.kind(), "handle_kind");

    let failure = interpreter
        .run_script(&mut deployment.context, "error: User1: withdraw 12.5% USDe | percentage")
        .await
        .unwrap_err();
    assert_eq!(failure.source.kind(), "amount_parse");
}

#[tokio::test]
async fn oversized_percentages_reach_the_vault() {
    let mut deployment = deploy();
    let interpreter = deployment.interpreter();
    let report = interpreter
        .run_script(
            &mut deployment.context,
            "User1: deposit 10 USDe
             error: User1: withdraw 200% USDe | ERC4626ExceededMaxRedeem
             User1: deposit 10 USDe into sUSDe
             error: User1: cooldown 150% sUSDe | ExcessiveWithdrawAmount
             balance: User1 10 pUSDe
             balance: User1 10 sUSDe",
        )
        .await
        .unwrap();
    assert_eq!(report.absorbed_failures(), 2);
}

#[tokio::test]
async fn only_one_layer_of_failure_is_absorbed() {
    let mut deployment = deploy();
    let interpreter = deployment.interpreter();
    let failure = interpreter
        .run_script(
            &mut deployment.context,
            "error: error: User1: withdraw 1 USDe | ERC4626ExceededMaxWithdraw | reverted",
        )
        .await
        .unwrap_err();
    assert_eq!(failure.source.kind(), "expected_failure_not_raised");
}

#[tokio::test]
async fn allowance_errors_are_reported_by_name() {
    let mut deployment = deploy();
    let interpreter = deployment.interpreter();
    let actor = interpreter
        .run_script(&mut deployment.context, "User1: deposit 2 USDe")
        .await
        .map(|_| deployment.context.current_actor().cloned().unwrap())
        .unwrap();
    let owner = deployment.ledger.signer(ActorIndex::new(0)).await.unwrap();
    let error = deployment
        .ledger
        .withdraw(&owner, &deployment.pusde, units(1), &owner, &actor.address)
        .await
        .unwrap_err();
    assert!(error.to_string().contains("ERC20InsufficientAllowance"));
}
