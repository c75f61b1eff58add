use divvy_engine::config::EngineConfig;
use divvy_engine::core::debt::DebtSet;
use divvy_engine::core::transaction::{SplitMethod, Transaction};
use divvy_engine::core::user::UserId;
use divvy_engine::optimization::netting::{NetDebt, NettingEngine};
use divvy_engine::optimization::settlement::SettlementPlanner;
use divvy_engine::rewards::{Achievement, ActivityEvent, RewardEngine};
use divvy_engine::split::SplitCalculator;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

fn user(id: &str) -> UserId {
    UserId::new(id)
}

fn users(ids: &[&str]) -> Vec<UserId> {
    ids.iter().map(|id| UserId::new(*id)).collect()
}

/// Full pipeline: transactions → debts → pairwise netting → settle-up → rewards.
#[test]
fn full_pipeline_weekend_trip() {
    let calc = SplitCalculator::default();

    let cabin = Transaction::new(
        dec!(600),
        users(&["alice"]),
        users(&["alice", "bob", "carol"]),
        SplitMethod::Equal,
    )
    .with_description("Cabin");

    let groceries = Transaction::new(
        dec!(90),
        users(&["bob"]),
        users(&["alice", "bob", "carol"]),
        SplitMethod::Shares([(user("alice"), 1), (user("bob"), 1), (user("carol"), 1)].into()),
    )
    .with_description("Groceries");

    let fuel = Transaction::new(
        dec!(80),
        users(&["carol"]),
        users(&["alice", "bob"]),
        SplitMethod::Percentage([(user("alice"), dec!(75)), (user("bob"), dec!(25))].into()),
    )
    .with_description("Fuel");

    let mut debts = DebtSet::new();
    for tx in [&cabin, &groceries, &fuel] {
        debts.extend(calc.compute(tx).unwrap());
    }
    // cabin: bob, carol -> alice 200 each; groceries: alice, carol -> bob 30 each;
    // fuel: alice -> carol 60, bob -> carol 20.
    assert_eq!(debts.len(), 6);
    assert_eq!(debts.gross_total(), dec!(540));

    let netted = NettingEngine::net(debts.relations());
    assert_eq!(
        netted.net_debts(),
        vec![
            NetDebt { from: user("bob"), to: user("alice"), amount: dec!(170) },
            NetDebt { from: user("carol"), to: user("alice"), amount: dec!(140) },
            NetDebt { from: user("carol"), to: user("bob"), amount: dec!(10) },
        ]
    );

    let plan = SettlementPlanner::plan(debts.relations());
    assert!(plan.is_complete());
    assert!(plan.transfers().len() <= 2);
    // alice: +400 - 30 - 60 = +310
    assert_eq!(plan.ledger().position(&user("alice")), dec!(310));
    assert_eq!(plan.total_transferred(), dec!(310));

    // Bob pays Alice back: the pair's relations are deleted.
    let settled = debts.settle_between(&user("bob"), &user("alice"));
    assert_eq!(settled.len(), 2);
    assert!(NettingEngine::net(debts.relations())
        .between(&user("alice"), &user("bob"))
        .is_none());

    let rewards = RewardEngine::default();
    let mut bob = rewards.new_profile(user("bob"));
    let amount: Decimal = settled.iter().map(|r| r.amount()).sum();
    let outcome = rewards.apply(
        &mut bob,
        &ActivityEvent::DebtSettled { amount, days_outstanding: 2 },
    );
    assert!(outcome.unlocked.contains(&Achievement::FirstSettlement));
    assert_eq!(bob.trust_score, 55);
}

/// Reference scenarios for the split methods.
#[test]
fn split_method_scenarios() {
    let calc = SplitCalculator::default();

    let equal = Transaction::new(dec!(100), users(&["P"]), users(&["A", "B"]), SplitMethod::Equal);
    let relations = calc.compute(&equal).unwrap();
    assert_eq!(relations.len(), 2);
    assert!(relations
        .iter()
        .all(|r| r.amount() == dec!(50) && r.to() == &user("P")));

    let zero_shares = Transaction::new(
        dec!(100),
        users(&["P"]),
        users(&["A", "B"]),
        SplitMethod::Shares(BTreeMap::new()),
    );
    assert!(calc.compute(&zero_shares).unwrap().is_empty());

    let solo = Transaction::new(dec!(100), users(&["A"]), users(&["A"]), SplitMethod::Equal);
    assert!(calc.compute(&solo).unwrap().is_empty());
}

/// Adjustment splits add the fixed amounts on top of an even remainder.
#[test]
fn adjustment_split_with_two_payers() {
    let tx = Transaction::new(
        dec!(120),
        users(&["A", "B"]),
        users(&["A", "B", "C"]),
        SplitMethod::Adjustment([(user("C"), dec!(30))].into()),
    );
    let relations = SplitCalculator::default().compute(&tx).unwrap();

    // remainder 90 -> 30 each, C carries 60. Each share is split across both payers.
    let netted = NettingEngine::net(&relations);
    assert_eq!(
        netted.between(&user("A"), &user("C")),
        Some(NetDebt { from: user("C"), to: user("A"), amount: dec!(30) })
    );
    // A and B each owe the other 15, which cancels.
    assert!(netted.between(&user("A"), &user("B")).is_none());
    assert_eq!(relations.iter().map(|r| r.amount()).sum::<Decimal>(), dec!(90));
}

/// Transactions and debts round-trip through the JSON shapes the CLI reads.
#[test]
fn transactions_file_parses() {
    let json = r#"{
        "transactions": [
            {
                "description": "Rent",
                "amount": "1500",
                "payers": ["alice"],
                "dividers": ["alice", "bob"],
                "split": { "method": "exact_amount", "weights": { "alice": "900", "bob": "600" } }
            }
        ]
    }"#;
    let parsed: serde_json::Value = serde_json::from_str(json).unwrap();
    let txs: Vec<Transaction> = serde_json::from_value(parsed["transactions"].clone()).unwrap();

    let relations = SplitCalculator::default().compute(&txs[0]).unwrap();
    assert_eq!(relations.len(), 1);
    assert_eq!(relations[0].from(), &user("bob"));
    assert_eq!(relations[0].amount(), dec!(600));

    let out = serde_json::to_value(&relations[0]).unwrap();
    assert_eq!(out["from"], "bob");
    let amount: Decimal = out["amount"].as_str().unwrap().parse().unwrap();
    assert_eq!(amount, dec!(600));
}

/// Deleting a transaction removes exactly the debts it created.
#[test]
fn deleting_a_transaction_reverts_its_debts() {
    let calc = SplitCalculator::default();
    let lunch = Transaction::new(dec!(30), users(&["A"]), users(&["A", "B", "C"]), SplitMethod::Equal);
    let taxi = Transaction::new(dec!(20), users(&["B"]), users(&["A", "B"]), SplitMethod::Equal);

    let mut debts: DebtSet = calc.compute_all([&lunch, &taxi]).into_iter().collect();
    assert_eq!(debts.len(), 3);

    let removed = debts.remove_transaction(lunch.id());
    assert_eq!(removed.len(), 2);

    let netted = NettingEngine::net(debts.relations());
    assert_eq!(
        netted.net_debts(),
        vec![NetDebt { from: user("A"), to: user("B"), amount: dec!(10) }]
    );
}

/// Rounded configuration keeps relations at cent precision.
#[test]
fn rounding_from_config() {
    let config = EngineConfig::from_lookup(|var| {
        (var == "DIVVY_DECIMAL_PLACES").then(|| "2".to_string())
    })
    .unwrap();
    let calc = SplitCalculator::new(config.split);
    let tx = Transaction::new(dec!(10), users(&["A"]), users(&["A", "B", "C"]), SplitMethod::Equal);

    let relations = calc.compute(&tx).unwrap();
    assert!(relations.iter().all(|r| r.amount() == dec!(3.33)));
}
