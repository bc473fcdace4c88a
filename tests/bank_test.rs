use bank_ledger::{AuthorizationState, Bank, Error, Money};

fn m(minor: i64) -> Money {
    Money::from_minor(minor)
}

#[test]
fn deposit_then_withdraw_restores_the_balance() {
    let bank = Bank::new();
    let account = bank.open_account_with_balance(m(1000)).unwrap();

    bank.deposit(&account, m(250)).unwrap();
    bank.withdraw(&account, m(250)).unwrap();

    assert_eq!(bank.balance(&account).unwrap(), m(1000));
    assert_eq!(bank.held(&account).unwrap(), Money::ZERO);
}

#[test]
fn new_accounts_start_empty() {
    let bank = Bank::new();
    let account = bank.open_account().unwrap();

    assert_eq!(bank.balance(&account).unwrap(), Money::ZERO);
    assert_eq!(bank.held(&account).unwrap(), Money::ZERO);
    assert_eq!(bank.available(&account).unwrap(), Money::ZERO);
}

#[test]
fn negative_or_zero_amounts_are_rejected() {
    let bank = Bank::new();
    let account = bank.open_account_with_balance(m(1000)).unwrap();

    assert!(matches!(bank.deposit(&account, m(-100)), Err(Error::InvalidAmount(_))));
    assert!(matches!(bank.withdraw(&account, Money::ZERO), Err(Error::InvalidAmount(_))));
    assert!(matches!(bank.authorize(&account, m(-1)), Err(Error::InvalidAmount(_))));
    assert_eq!(bank.balance(&account).unwrap(), m(1000));
}

#[test]
fn withdrawal_beyond_available_fails() {
    let bank = Bank::new();
    let account = bank.open_account_with_balance(m(1000)).unwrap();

    assert!(matches!(bank.withdraw(&account, m(1001)), Err(Error::InsufficientFunds)));
    assert_eq!(bank.balance(&account).unwrap(), m(1000));
}

#[test]
fn authorize_holds_funds_without_debiting() {
    let bank = Bank::new();
    let account = bank.open_account_with_balance(m(1000)).unwrap();

    bank.authorize(&account, m(400)).unwrap();

    assert_eq!(bank.balance(&account).unwrap(), m(1000));
    assert_eq!(bank.held(&account).unwrap(), m(400));
    assert_eq!(bank.available(&account).unwrap(), m(600));
}

#[test]
fn authorize_beyond_available_fails_and_changes_nothing() {
    let bank = Bank::new();
    let account = bank.open_account().unwrap();
    bank.deposit(&account, m(100)).unwrap();

    assert!(matches!(bank.authorize(&account, m(150)), Err(Error::InsufficientFunds)));
    assert_eq!(bank.balance(&account).unwrap(), m(100));
    assert_eq!(bank.held(&account).unwrap(), Money::ZERO);
}

#[test]
fn cancel_releases_the_hold() {
    let bank = Bank::new();
    let account = bank.open_account_with_balance(m(1000)).unwrap();
    let auth = bank.authorize(&account, m(200)).unwrap();

    let record = bank.cancel(auth).unwrap();

    assert_eq!(record.state(), AuthorizationState::Canceled);
    assert_eq!(bank.balance(&account).unwrap(), m(1000));
    assert_eq!(bank.held(&account).unwrap(), Money::ZERO);
    assert_eq!(bank.available(&account).unwrap(), m(1000));
}

#[test]
fn cancel_is_single_shot() {
    let bank = Bank::new();
    let account = bank.open_account_with_balance(m(1000)).unwrap();
    let auth = bank.authorize(&account, m(200)).unwrap();

    bank.cancel(auth).unwrap();
    assert!(matches!(
        bank.cancel(auth),
        Err(Error::InvalidState(AuthorizationState::Canceled))
    ));
}

#[test]
fn full_capture_debits_the_authorized_amount() {
    let bank = Bank::new();
    let account = bank.open_account_with_balance(m(1000)).unwrap();
    let auth = bank.authorize(&account, m(400)).unwrap();

    let record = bank.capture(auth, m(400)).unwrap();

    assert_eq!(record.state(), AuthorizationState::Captured);
    assert_eq!(record.captured_amount(), Some(m(400)));
    assert_eq!(bank.balance(&account).unwrap(), m(600));
    assert_eq!(bank.held(&account).unwrap(), Money::ZERO);
}

#[test]
fn partial_capture_releases_the_remainder() {
    let bank = Bank::new();
    let account = bank.open_account_with_balance(m(1000)).unwrap();
    let auth = bank.authorize(&account, m(400)).unwrap();

    bank.capture(auth, m(300)).unwrap();

    // net balance down by the captured amount, nothing left on hold
    assert_eq!(bank.balance(&account).unwrap(), m(700));
    assert_eq!(bank.held(&account).unwrap(), Money::ZERO);
    assert_eq!(bank.available(&account).unwrap(), m(700));
}

#[test]
fn capture_beyond_authorized_amount_fails() {
    let bank = Bank::new();
    let account = bank.open_account_with_balance(m(1000)).unwrap();
    let auth = bank.authorize(&account, m(200)).unwrap();

    assert!(matches!(bank.capture(auth, m(250)), Err(Error::InvalidAmount(_))));

    // nothing moved, the authorization is still open
    let record = bank.authorization(auth).unwrap();
    assert_eq!(record.state(), AuthorizationState::Authorized);
    assert_eq!(bank.balance(&account).unwrap(), m(1000));
    assert_eq!(bank.held(&account).unwrap(), m(200));
}

#[test]
fn captured_authorizations_cannot_be_captured_or_canceled_again() {
    let bank = Bank::new();
    let account = bank.open_account_with_balance(m(1000)).unwrap();
    let auth = bank.authorize(&account, m(200)).unwrap();
    bank.capture(auth, m(200)).unwrap();

    assert!(matches!(
        bank.capture(auth, m(1)),
        Err(Error::InvalidState(AuthorizationState::Captured))
    ));
    assert!(matches!(
        bank.cancel(auth),
        Err(Error::InvalidState(AuthorizationState::Captured))
    ));
    assert_eq!(bank.balance(&account).unwrap(), m(800));
}

#[test]
fn canceled_authorizations_cannot_be_captured_or_refunded() {
    let bank = Bank::new();
    let account = bank.open_account_with_balance(m(1000)).unwrap();
    let auth = bank.authorize(&account, m(200)).unwrap();
    bank.cancel(auth).unwrap();

    assert!(matches!(
        bank.capture(auth, m(100)),
        Err(Error::InvalidState(AuthorizationState::Canceled))
    ));
    assert!(matches!(
        bank.refund(auth, m(100)),
        Err(Error::InvalidState(AuthorizationState::Canceled))
    ));
    assert_eq!(bank.balance(&account).unwrap(), m(1000));
}

#[test]
fn refund_requires_a_capture() {
    let bank = Bank::new();
    let account = bank.open_account_with_balance(m(1000)).unwrap();
    let auth = bank.authorize(&account, m(200)).unwrap();

    assert!(matches!(
        bank.refund(auth, m(100)),
        Err(Error::InvalidState(AuthorizationState::Authorized))
    ));
    assert_eq!(bank.held(&account).unwrap(), m(200));
}

#[test]
fn partial_refunds_accumulate_to_full() {
    let bank = Bank::new();
    let account = bank.open_account_with_balance(m(1000)).unwrap();
    let auth = bank.authorize(&account, m(100)).unwrap();
    bank.capture(auth, m(100)).unwrap();

    let record = bank.refund(auth, m(50)).unwrap();
    assert_eq!(record.state(), AuthorizationState::Captured);
    assert_eq!(record.refunded_amount(), m(50));
    assert_eq!(bank.balance(&account).unwrap(), m(950));

    let record = bank.refund(auth, m(50)).unwrap();
    assert_eq!(record.state(), AuthorizationState::Refunded);
    assert_eq!(bank.balance(&account).unwrap(), m(1000));

    // fully refunded is terminal
    assert!(matches!(
        bank.refund(auth, m(1)),
        Err(Error::InvalidState(AuthorizationState::Refunded))
    ));
}

#[test]
fn refunds_never_exceed_the_captured_amount() {
    let bank = Bank::new();
    let account = bank.open_account_with_balance(m(1000)).unwrap();
    let auth = bank.authorize(&account, m(400)).unwrap();
    bank.capture(auth, m(300)).unwrap();

    bank.refund(auth, m(250)).unwrap();
    assert!(matches!(bank.refund(auth, m(51)), Err(Error::InvalidAmount(_))));
    assert!(matches!(bank.refund(auth, Money::ZERO), Err(Error::InvalidAmount(_))));
    assert_eq!(bank.balance(&account).unwrap(), m(950));
}

#[test]
fn authorize_capture_refund_sequence() {
    let bank = Bank::new();
    let account = bank.open_account().unwrap();
    bank.deposit(&account, m(1000)).unwrap();

    let auth = bank.authorize(&account, m(400)).unwrap();
    bank.capture(auth, m(300)).unwrap();
    bank.refund(auth, m(100)).unwrap();

    assert_eq!(bank.balance(&account).unwrap(), m(800));
    assert_eq!(bank.held(&account).unwrap(), Money::ZERO);

    let record = bank.authorization(auth).unwrap();
    assert_eq!(record.state(), AuthorizationState::Captured);
    assert_eq!(record.refunded_amount(), m(100));
}

#[test]
fn unknown_identifiers_are_reported_as_such() {
    let bank = Bank::new();
    let other = Bank::new();
    let foreign_account = other.open_account().unwrap();
    let foreign_auth = {
        let account = other.open_account_with_balance(m(100)).unwrap();
        other.authorize(&account, m(50)).unwrap()
    };

    assert!(matches!(
        bank.deposit(&foreign_account, m(100)),
        Err(Error::AccountNotFound(_))
    ));
    assert!(matches!(
        bank.cancel(foreign_auth),
        Err(Error::AuthorizationNotFound(_))
    ));
    assert!(matches!(
        bank.authorization(foreign_auth),
        Err(Error::AuthorizationNotFound(_))
    ));
}

#[test]
fn authorization_records_carry_their_account_and_code() {
    let bank = Bank::new();
    let account = bank.open_account_with_balance(m(500)).unwrap();
    let auth = bank.authorize(&account, m(200)).unwrap();

    let record = bank.authorization(auth).unwrap();
    assert_eq!(record.account_id(), &account);
    assert_eq!(record.amount(), m(200));
    assert_eq!(record.authorization_code().len(), 6);
}

#[test]
fn concurrent_deposits_are_serialized_per_account() {
    use std::sync::Arc;
    use std::thread;

    let bank = Arc::new(Bank::new());
    let account = bank.open_account().unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let bank = Arc::clone(&bank);
        let account = account.clone();
        handles.push(thread::spawn(move || {
            for _ in 0..100 {
                bank.deposit(&account, m(25)).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(bank.balance(&account).unwrap(), m(8 * 100 * 25));
}

#[test]
fn concurrent_authorize_and_capture_never_overdraw() {
    use std::sync::Arc;
    use std::thread;

    let bank = Arc::new(Bank::new());
    let account = bank.open_account_with_balance(m(1000)).unwrap();

    // 16 workers each try to authorize-and-capture 100; only ten holds fit.
    let mut handles = Vec::new();
    for _ in 0..16 {
        let bank = Arc::clone(&bank);
        let account = account.clone();
        handles.push(thread::spawn(move || {
            match bank.authorize(&account, m(100)) {
                Ok(auth) => {
                    bank.capture(auth, m(100)).unwrap();
                    true
                }
                Err(Error::InsufficientFunds) => false,
                Err(e) => panic!("unexpected error: {}", e),
            }
        }));
    }

    let captured = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|captured| *captured)
        .count();

    assert_eq!(captured, 10);
    assert_eq!(bank.balance(&account).unwrap(), Money::ZERO);
    assert_eq!(bank.held(&account).unwrap(), Money::ZERO);
}

mod properties {
    use super::m;
    use bank_ledger::{AuthorizationId, Bank, Error, Money};
    use proptest::prelude::*;

    proptest! {
        /// Random interleavings of ledger commands never violate
        /// `balance >= held >= 0`.
        #[test]
        fn balance_covers_held_under_random_commands(
            ops in prop::collection::vec((0u8..6u8, 1i64..10_000i64), 1..64)
        ) {
            let bank = Bank::new();
            let account = bank.open_account().unwrap();
            let mut auths: Vec<AuthorizationId> = Vec::new();

            for (op, amount) in ops {
                let amount = m(amount);
                let result = match op {
                    0 => bank.deposit(&account, amount).map(drop),
                    1 => bank.withdraw(&account, amount).map(drop),
                    2 => bank.authorize(&account, amount).map(|id| auths.push(id)),
                    3 => auths.last().map_or(Ok(()), |id| bank.cancel(*id).map(drop)),
                    4 => auths.last().map_or(Ok(()), |id| bank.capture(*id, amount).map(drop)),
                    _ => auths.last().map_or(Ok(()), |id| bank.refund(*id, amount).map(drop)),
                };
                if let Err(e) = result {
                    prop_assert!(!matches!(e, Error::LedgerCorruption(_)), "fatal: {}", e);
                }

                let balance = bank.balance(&account).unwrap();
                let held = bank.held(&account).unwrap();
                prop_assert!(held >= Money::ZERO);
                prop_assert!(balance >= held);
            }
        }
    }
}
