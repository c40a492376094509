//! End-to-end lending scenarios against mock collaborators

mod common;

use common::{id, tokens, usd, weth_id, Harness, DAY, START, YEAR};
use lendpool_core::Amount;
use lendpool_custody::AssetTransfer;
use lendpool_ledger::{Health, LendingError, LendingEvent, PositionStatus};

#[test]
fn test_health_factor_after_borrow() {
    let mut h = Harness::new();
    let (alice, bob) = (id("alice"), id("bob"));
    h.fund_pool(&bob, tokens(20_000));
    h.pledge(&alice, tokens(10));

    assert_eq!(h.ledger.collateral_value(&alice).unwrap(), tokens(20_000));
    h.ledger.borrow(&alice, tokens(10_000)).unwrap();

    assert_eq!(h.ledger.health_factor(&alice).unwrap(), 16_000);
    assert_eq!(h.ledger.max_borrowable(&alice).unwrap(), tokens(5_000));
    assert_eq!(h.usdc.balance_of(&alice), tokens(10_000));
    assert_eq!(h.ledger.utilization_bps().unwrap(), 5_000);
    assert_eq!(
        h.ledger.position_status(&alice).unwrap(),
        PositionStatus::Borrowing(Health::Healthy)
    );
    h.assert_totals();
}

#[test]
fn test_one_year_of_borrow_interest() {
    let mut h = Harness::new();
    let (alice, bob) = (id("alice"), id("bob"));
    h.fund_pool(&bob, tokens(20_000));
    h.pledge(&alice, tokens(10));
    h.ledger.borrow(&alice, tokens(10_000)).unwrap();

    h.clock.advance(YEAR);

    // Preview matches the stored debt after a real accrual
    assert_eq!(h.ledger.current_debt(&alice).unwrap(), tokens(10_500));
    h.usdc.mint(&alice, tokens(500));
    let repaid = h.ledger.repay(&alice, tokens(10_500)).unwrap();

    assert_eq!(repaid, tokens(10_500));
    let account = h.ledger.account(&alice).unwrap();
    assert!(!account.borrow.has_debt());
    assert_eq!(account.borrow.last_accrual, 0);
    assert!(h.ledger.pool().total_borrowed.is_zero());

    let events = h.sink.take();
    assert!(events.contains(&LendingEvent::BorrowInterestAccrued {
        account: alice.clone(),
        interest: tokens(500),
    }));
    h.assert_totals();
}

#[test]
fn test_liquidation_after_price_drop() {
    let mut h = Harness::new();
    let (alice, bob, carol) = (id("alice"), id("bob"), id("carol"));
    h.fund_pool(&bob, tokens(20_000));
    h.pledge(&alice, tokens(10));
    h.ledger.borrow(&alice, tokens(10_000)).unwrap();

    h.clock.advance(30 * DAY);
    h.oracle.set_price(weth_id(), usd(1_200));

    let debt = h.ledger.current_debt(&alice).unwrap();
    assert_eq!(debt, Amount::new(10_041_095_890_410_958_904_109));
    assert_eq!(h.ledger.health_factor(&alice).unwrap(), 9_560);
    assert!(h.ledger.can_liquidate(&alice).unwrap());
    assert_eq!(h.ledger.liquidatable_accounts().unwrap(), vec![alice.clone()]);

    h.usdc.mint(&carol, tokens(20_000));
    let result = h.ledger.liquidate(&carol, &alice, tokens(20_000)).unwrap();

    // Clamped to the debt; 10543.15 worth of collateral at 1200
    assert_eq!(result.debt_covered, debt);
    assert_eq!(result.collateral_seized, Amount::new(8_785_958_904_109_589_041));
    assert_eq!(result.remaining_debt, Amount::ZERO);
    assert!(!result.capped);

    let account = h.ledger.account(&alice).unwrap();
    assert!(!account.borrow.has_debt());
    assert_eq!(account.borrow.last_accrual, 0);
    assert_eq!(
        account.collateral,
        Amount::new(10_000_000_000_000_000_000 - 8_785_958_904_109_589_041)
    );
    assert_eq!(h.weth.balance_of(&carol), result.collateral_seized);
    assert_eq!(h.usdc.balance_of(&carol), tokens(20_000).saturating_sub(debt));
    assert_eq!(
        h.ledger.position_status(&alice).unwrap(),
        PositionStatus::Collateralized
    );
    h.assert_totals();
}

#[test]
fn test_deeply_underwater_seizure_capped() {
    let mut h = Harness::new();
    let (alice, bob, carol) = (id("alice"), id("bob"), id("carol"));
    h.fund_pool(&bob, tokens(20_000));
    h.pledge(&alice, tokens(10));
    h.ledger.borrow(&alice, tokens(10_000)).unwrap();

    h.oracle.set_price(weth_id(), usd(500));
    h.usdc.mint(&carol, tokens(10_000));
    let result = h.ledger.liquidate(&carol, &alice, tokens(10_000)).unwrap();

    assert!(result.capped);
    assert_eq!(result.collateral_seized, tokens(10));
    assert!(h.ledger.account(&alice).unwrap().collateral.is_zero());
    h.assert_totals();
}

#[test]
fn test_partial_liquidation_keeps_timestamp() {
    let mut h = Harness::new();
    let (alice, bob, carol) = (id("alice"), id("bob"), id("carol"));
    h.fund_pool(&bob, tokens(20_000));
    h.pledge(&alice, tokens(10));
    h.ledger.borrow(&alice, tokens(10_000)).unwrap();
    h.oracle.set_price(weth_id(), usd(1_200));

    h.usdc.mint(&carol, tokens(1_000));
    let result = h.ledger.liquidate(&carol, &alice, tokens(1_000)).unwrap();

    assert_eq!(result.remaining_debt, tokens(9_000));
    // 1050 worth at 1200 = 0.875 units
    assert_eq!(result.collateral_seized, Amount::new(875_000_000_000_000_000));
    assert_eq!(h.ledger.account(&alice).unwrap().borrow.last_accrual, START);
    h.assert_totals();
}

#[test]
fn test_healthy_position_cannot_be_liquidated() {
    let mut h = Harness::new();
    let (alice, bob, carol) = (id("alice"), id("bob"), id("carol"));
    h.fund_pool(&bob, tokens(20_000));
    h.pledge(&alice, tokens(10));
    h.ledger.borrow(&alice, tokens(10_000)).unwrap();
    h.usdc.mint(&carol, tokens(1_000));

    let result = h.ledger.liquidate(&carol, &alice, tokens(1_000));
    assert_eq!(
        result,
        Err(LendingError::PositionHealthy {
            account: "alice".to_string(),
            health_factor: 16_000,
        })
    );

    let result = h.ledger.liquidate(&carol, &id("nobody"), tokens(1_000));
    assert!(matches!(result, Err(LendingError::PositionHealthy { .. })));
    assert!(h.ledger.account(&id("nobody")).is_none());
    assert_eq!(h.usdc.balance_of(&carol), tokens(1_000));
}

#[test]
fn test_borrow_without_collateral() {
    let mut h = Harness::new();
    let (alice, bob) = (id("alice"), id("bob"));
    h.fund_pool(&bob, tokens(20_000));
    let pool_before = h.ledger.pool().clone();
    h.sink.take();

    let result = h.ledger.borrow(&alice, tokens(100));

    assert!(matches!(result, Err(LendingError::InsufficientCollateral { .. })));
    assert_eq!(h.ledger.pool(), &pool_before);
    assert!(h.ledger.account(&alice).is_none());
    assert!(h.usdc.balance_of(&alice).is_zero());
    assert!(h.sink.events().is_empty());
}

#[test]
fn test_borrow_above_ltv_rejected() {
    let mut h = Harness::new();
    let (alice, bob) = (id("alice"), id("bob"));
    h.fund_pool(&bob, tokens(20_000));
    h.pledge(&alice, tokens(10));

    let result = h.ledger.borrow(&alice, tokens(15_001));
    assert_eq!(
        result,
        Err(LendingError::BorrowExceedsLimit {
            account: "alice".to_string(),
            debt: tokens(15_001),
            limit: tokens(15_000),
        })
    );
    h.ledger.borrow(&alice, tokens(15_000)).unwrap();
    h.assert_totals();
}

#[test]
fn test_unsafe_collateral_withdrawal() {
    let mut h = Harness::new();
    let (alice, bob) = (id("alice"), id("bob"));
    h.fund_pool(&bob, tokens(20_000));
    h.pledge(&alice, tokens(10));
    h.ledger.borrow(&alice, tokens(10_000)).unwrap();

    let result = h.ledger.withdraw_collateral(&alice, tokens(5));
    assert_eq!(
        result,
        Err(LendingError::HealthFactorTooLow {
            account: "alice".to_string(),
            health_factor: 8_000,
        })
    );
    assert_eq!(h.ledger.account(&alice).unwrap().collateral, tokens(10));
    assert!(h.weth.balance_of(&alice).is_zero());

    h.ledger.withdraw_collateral(&alice, tokens(2)).unwrap();
    assert_eq!(h.ledger.account(&alice).unwrap().collateral, tokens(8));
    assert_eq!(h.weth.balance_of(&alice), tokens(2));
    h.assert_totals();
}

#[test]
fn test_withdraw_more_collateral_than_pledged() {
    let mut h = Harness::new();
    let alice = id("alice");
    h.pledge(&alice, tokens(1));
    let result = h.ledger.withdraw_collateral(&alice, tokens(2));
    assert!(matches!(result, Err(LendingError::InsufficientCollateral { .. })));
}

#[test]
fn test_same_instant_supply_withdraw_round_trip() {
    let mut h = Harness::new();
    let alice = id("alice");
    h.usdc.mint(&alice, tokens(1_000));

    h.ledger.supply(&alice, tokens(1_000)).unwrap();
    h.ledger.withdraw_supply(&alice, tokens(1_000)).unwrap();

    let account = h.ledger.account(&alice).unwrap();
    assert!(account.supply.principal.is_zero());
    assert!(account.supply.accrued_interest.is_zero());
    assert_eq!(h.usdc.balance_of(&alice), tokens(1_000));
    assert_eq!(
        h.ledger.position_status(&alice).unwrap(),
        PositionStatus::Empty
    );
    h.assert_totals();
}

#[test]
fn test_supplier_claims_interest() {
    let mut h = Harness::new();
    let (alice, bob) = (id("alice"), id("bob"));
    h.fund_pool(&bob, tokens(20_000));
    h.pledge(&alice, tokens(10));
    h.ledger.borrow(&alice, tokens(10_000)).unwrap();
    h.clock.advance(YEAR);
    h.usdc.mint(&alice, tokens(500));
    h.ledger.repay(&alice, tokens(10_500)).unwrap();

    let balance = h.ledger.supply_balance(&bob).unwrap();
    assert_eq!(balance.interest, tokens(400));
    assert_eq!(balance.total, tokens(20_400));

    let claimed = h.ledger.claim_supply_interest(&bob).unwrap();

    assert_eq!(claimed, tokens(400));
    assert_eq!(h.usdc.balance_of(&bob), tokens(400));
    let account = h.ledger.account(&bob).unwrap();
    assert_eq!(account.supply.principal, tokens(20_000));
    assert!(account.supply.accrued_interest.is_zero());

    // Nothing left to claim at the same instant
    assert_eq!(
        h.ledger.claim_supply_interest(&bob),
        Err(LendingError::ZeroAmount)
    );
    h.assert_totals();
}

#[test]
fn test_withdrawal_limited_by_custody() {
    let mut h = Harness::new();
    let (alice, bob) = (id("alice"), id("bob"));
    h.fund_pool(&bob, tokens(20_000));
    h.pledge(&alice, tokens(10));
    h.ledger.borrow(&alice, tokens(10_000)).unwrap();

    let result = h.ledger.withdraw_supply(&bob, tokens(15_000));
    assert_eq!(
        result,
        Err(LendingError::InsufficientLiquidity {
            available: tokens(10_000),
            requested: tokens(15_000),
        })
    );
    assert_eq!(h.ledger.account(&bob).unwrap().supply.principal, tokens(20_000));
}

#[test]
fn test_missing_price_blocks_borrow() {
    let mut h = Harness::new();
    let (alice, bob) = (id("alice"), id("bob"));
    h.fund_pool(&bob, tokens(20_000));
    h.pledge(&alice, tokens(10));
    h.oracle.remove_price(&weth_id());

    let result = h.ledger.borrow(&alice, tokens(100));
    assert!(matches!(result, Err(LendingError::InvalidOraclePrice { .. })));

    h.oracle.set_price(weth_id(), 0);
    let result = h.ledger.borrow(&alice, tokens(100));
    assert!(matches!(result, Err(LendingError::InvalidOraclePrice { .. })));
    assert!(h.ledger.pool().total_borrowed.is_zero());
}

#[test]
fn test_failed_collateral_leg_refunds_liquidator() {
    let mut h = Harness::new();
    let (alice, bob, carol) = (id("alice"), id("bob"), id("carol"));
    h.fund_pool(&bob, tokens(20_000));
    h.pledge(&alice, tokens(10));
    h.ledger.borrow(&alice, tokens(10_000)).unwrap();
    h.oracle.set_price(weth_id(), usd(1_200));
    h.usdc.mint(&carol, tokens(5_000));
    let pool_before = h.ledger.pool().clone();
    let account_before = h.ledger.account(&alice).unwrap().clone();
    let custody_before = h.usdc.custody_balance();
    h.sink.take();

    h.weth.set_fail_transfers(true);
    let result = h.ledger.liquidate(&carol, &alice, tokens(5_000));

    assert!(matches!(result, Err(LendingError::Transfer(_))));
    assert_eq!(h.ledger.pool(), &pool_before);
    assert_eq!(h.ledger.account(&alice).unwrap(), &account_before);
    assert_eq!(h.usdc.balance_of(&carol), tokens(5_000));
    assert_eq!(h.usdc.custody_balance(), custody_before);
    assert!(h.sink.events().is_empty());
}

#[test]
fn test_failed_outbound_transfer_rolls_back_borrow() {
    let mut h = Harness::new();
    let (alice, bob) = (id("alice"), id("bob"));
    h.fund_pool(&bob, tokens(20_000));
    h.pledge(&alice, tokens(10));
    h.usdc.set_fail_transfers(true);

    let result = h.ledger.borrow(&alice, tokens(1_000));

    assert!(matches!(result, Err(LendingError::Transfer(_))));
    let account = h.ledger.account(&alice).unwrap();
    assert!(account.borrow.principal.is_zero());
    assert_eq!(account.borrow.last_accrual, 0);
    assert!(h.ledger.pool().total_borrowed.is_zero());
    assert_eq!(h.usdc.custody_balance(), tokens(20_000));
}

#[test]
fn test_events_published_in_order() {
    let mut h = Harness::new();
    let (alice, bob) = (id("alice"), id("bob"));
    h.fund_pool(&bob, tokens(20_000));
    h.pledge(&alice, tokens(10));
    h.ledger.borrow(&alice, tokens(10_000)).unwrap();
    h.sink.take();

    h.clock.advance(YEAR);
    h.ledger.borrow(&alice, tokens(1_000)).unwrap();

    let events = h.sink.events();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|(at, _)| *at == START + YEAR));
    assert_eq!(
        events[0].1,
        LendingEvent::BorrowInterestAccrued {
            account: alice.clone(),
            interest: tokens(500),
        }
    );
    assert_eq!(
        events[1].1,
        LendingEvent::Borrowed {
            account: alice.clone(),
            amount: tokens(1_000),
            total_debt: tokens(11_500),
        }
    );
}

#[test]
fn test_account_snapshot() {
    let mut h = Harness::new();
    let (alice, bob) = (id("alice"), id("bob"));
    h.fund_pool(&bob, tokens(20_000));
    h.pledge(&alice, tokens(10));
    h.ledger.borrow(&alice, tokens(10_000)).unwrap();

    let snapshot = h.ledger.account_snapshot(&alice).unwrap();
    assert_eq!(snapshot.collateral_value, tokens(20_000));
    assert_eq!(snapshot.debt, tokens(10_000));
    assert_eq!(snapshot.health_factor, 16_000);
    assert_eq!(snapshot.max_borrowable, tokens(5_000));
    assert_eq!(snapshot.status, PositionStatus::Borrowing(Health::Healthy));

    let supplier = h.ledger.account_snapshot(&bob).unwrap();
    assert_eq!(supplier.health_factor, u128::MAX);
    assert_eq!(supplier.status, PositionStatus::Supplied);
}
