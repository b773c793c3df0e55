use bank::ids::AccountId;
use bank::{AccountError, Ledger, LedgerError, Money, TransactionType};

use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

const DEADLOCK_TIMEOUT: Duration = Duration::from_secs(30);

fn id(id: &str) -> AccountId {
    AccountId::from(id)
}

/// Runs `work` on its own thread and fails the test if it doesn't finish in time
fn run_with_timeout(work: impl FnOnce() + Send + 'static) {
    let (done_tx, done_rx) = mpsc::channel();

    thread::spawn(move || {
        work();
        let _ = done_tx.send(());
    });

    done_rx
        .recv_timeout(DEADLOCK_TIMEOUT)
        .expect("operations did not complete, possible deadlock");
}

fn replay(ledger: &Ledger, account: &AccountId) -> Money {
    let replayed = ledger
        .history(account)
        .unwrap()
        .iter()
        .fold(0, |balance, tx| {
            if tx.transaction_type().is_credit() {
                balance + tx.amount().0
            } else {
                balance - tx.amount().0
            }
        });

    Money(replayed)
}

#[test]
fn concurrent_mixed_operations_conserve_money() {
    let ledger = Arc::new(Ledger::new());
    ledger.add_account("ACC001", "Ahmet", Money(1000000)).unwrap();
    ledger.add_account("ACC002", "Ayse", Money(500000)).unwrap();

    let handles = vec![
        {
            let ledger = Arc::clone(&ledger);
            thread::spawn(move || ledger.deposit(&id("ACC001"), Money(50000)))
        },
        {
            let ledger = Arc::clone(&ledger);
            thread::spawn(move || ledger.withdraw(&id("ACC001"), Money(30000)))
        },
        {
            let ledger = Arc::clone(&ledger);
            thread::spawn(move || ledger.transfer(&id("ACC001"), &id("ACC002"), Money(100000)))
        },
        {
            let ledger = Arc::clone(&ledger);
            thread::spawn(move || ledger.transfer(&id("ACC002"), &id("ACC001"), Money(50000)))
        },
    ];

    for handle in handles {
        assert_eq!(handle.join().unwrap(), Ok(()));
    }

    let a = ledger.balance(&id("ACC001")).unwrap();
    let b = ledger.balance(&id("ACC002")).unwrap();

    // the deposit and withdrawal are the only flows in or out of the pair
    assert_eq!(a.0 + b.0, 1500000 + 50000 - 30000);
    assert_eq!(a, Money(970000));
    assert_eq!(b, Money(550000));

    assert_eq!(replay(&ledger, &id("ACC001")), a);
    assert_eq!(replay(&ledger, &id("ACC002")), b);
}

#[test]
fn opposite_transfers_do_not_deadlock() {
    let ledger = Arc::new(Ledger::new());
    ledger.add_account("A", "Alice", Money(1000)).unwrap();
    ledger.add_account("B", "Bob", Money(1000)).unwrap();

    let worker_ledger = Arc::clone(&ledger);

    run_with_timeout(move || {
        let forward = {
            let ledger = Arc::clone(&worker_ledger);
            thread::spawn(move || {
                for _ in 0..10000 {
                    let _ = ledger.transfer(&id("A"), &id("B"), Money(3));
                }
            })
        };

        let backward = {
            let ledger = Arc::clone(&worker_ledger);
            thread::spawn(move || {
                for _ in 0..10000 {
                    let _ = ledger.transfer(&id("B"), &id("A"), Money(5));
                }
            })
        };

        forward.join().unwrap();
        backward.join().unwrap();
    });

    let a = ledger.balance(&id("A")).unwrap();
    let b = ledger.balance(&id("B")).unwrap();

    assert_eq!(a.0 + b.0, 2000);
    assert!(!a.is_negative());
    assert!(!b.is_negative());

    assert_eq!(replay(&ledger, &id("A")), a);
    assert_eq!(replay(&ledger, &id("B")), b);
}

#[test]
fn transfer_legs_always_pair_up() {
    let accounts = ["A", "B", "C", "D"];

    let ledger = Arc::new(Ledger::new());
    for account in accounts {
        ledger.add_account(account, account, Money(500)).unwrap();
    }

    let worker_ledger = Arc::clone(&ledger);

    run_with_timeout(move || {
        let handles = (0..8)
            .map(|worker| {
                let ledger = Arc::clone(&worker_ledger);
                thread::spawn(move || {
                    for step in 0..2000 {
                        let from = accounts[(worker + step) % accounts.len()];
                        let to = accounts[(worker * 3 + step * 7 + 1) % accounts.len()];
                        let amount = Money(((worker + step) % 200) as i64 + 1);

                        match ledger.transfer(&id(from), &id(to), amount) {
                            Ok(()) => {}
                            Err(LedgerError::SameAccount(_)) => assert_eq!(from, to),
                            Err(LedgerError::Account(AccountError::InsufficientBalance {
                                requested,
                                available,
                            })) => assert!(available < requested),
                            Err(e) => panic!("unexpected transfer failure: {e}"),
                        }
                    }
                })
            })
            .collect::<Vec<_>>();

        for handle in handles {
            handle.join().unwrap();
        }
    });

    let total: i64 = accounts
        .iter()
        .map(|account| ledger.balance(&id(account)).unwrap().0)
        .sum();
    assert_eq!(total, 500 * accounts.len() as i64);

    let mut transfers_out = 0;
    let mut transfers_in = 0;

    for account in accounts {
        let account = id(account);
        assert_eq!(replay(&ledger, &account), ledger.balance(&account).unwrap());

        for tx in ledger.history(&account).unwrap() {
            match tx.transaction_type() {
                TransactionType::TransferOut => transfers_out += tx.amount().0,
                TransactionType::TransferIn => transfers_in += tx.amount().0,
                _ => {}
            }
        }
    }

    assert_eq!(transfers_out, transfers_in);
}

#[test]
fn concurrent_withdrawals_never_overdraw() {
    let ledger = Arc::new(Ledger::new());
    ledger.add_account("ACC001", "Ahmet", Money(1000)).unwrap();

    let handles = (0..8)
        .map(|_| {
            let ledger = Arc::clone(&ledger);
            thread::spawn(move || {
                (0..100)
                    .filter(|_| ledger.withdraw(&id("ACC001"), Money(7)).is_ok())
                    .count()
            })
        })
        .collect::<Vec<_>>();

    let successes: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

    // 1000 / 7 = 142 withdrawals fit, leaving 6
    assert_eq!(successes, 142);
    assert_eq!(ledger.balance(&id("ACC001")), Ok(Money(6)));
}

#[test]
fn unknown_accounts_fail_without_side_effects() {
    let ledger = Ledger::new();
    ledger.add_account("ACC001", "Ahmet", Money(1000000)).unwrap();

    assert_eq!(
        ledger.transfer(&id("ACC001"), &id("UNKNOWN"), Money(10000)),
        Err(LedgerError::AccountNotFound(id("UNKNOWN")))
    );
    assert_eq!(ledger.balance(&id("ACC001")), Ok(Money(1000000)));
    assert_eq!(ledger.history(&id("ACC001")).unwrap().len(), 1);

    let balance = ledger.balance(&id("ACC001")).unwrap();
    let mut requested = balance;
    requested.add(&Money(1)).unwrap();

    assert!(matches!(
        ledger.withdraw(&id("ACC001"), requested),
        Err(LedgerError::Account(AccountError::InsufficientBalance { .. }))
    ));
    assert_eq!(ledger.balance(&id("ACC001")), Ok(balance));
}
