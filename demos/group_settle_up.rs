//! A flat share's month of expenses: pairwise netting versus a full
//! settle-up plan.

use divvy_engine::core::debt::DebtSet;
use divvy_engine::core::transaction::{SplitMethod, Transaction};
use divvy_engine::core::user::UserId;
use divvy_engine::optimization::netting::NettingEngine;
use divvy_engine::optimization::settlement::SettlementPlanner;
use divvy_engine::rewards::{ActivityEvent, RewardEngine};
use divvy_engine::split::SplitCalculator;
use rust_decimal_macros::dec;

fn main() {
    let ana = UserId::new("ana");
    let ben = UserId::new("ben");
    let chi = UserId::new("chi");
    let dev = UserId::new("dev");
    let flat = vec![ana.clone(), ben.clone(), chi.clone(), dev.clone()];

    let transactions = vec![
        Transaction::new(dec!(1600), vec![ana.clone()], flat.clone(), SplitMethod::Equal)
            .with_description("Rent"),
        Transaction::new(dec!(240), vec![ben.clone()], flat.clone(), SplitMethod::Equal)
            .with_description("Groceries"),
        Transaction::new(
            dec!(90),
            vec![chi.clone()],
            flat.clone(),
            SplitMethod::Shares(
                [(ana.clone(), 1), (ben.clone(), 1), (chi.clone(), 1), (dev.clone(), 3)].into(),
            ),
        )
        .with_description("Internet"),
        Transaction::new(dec!(60), vec![dev.clone()], vec![ben.clone(), chi.clone()], SplitMethod::Equal)
            .with_description("Takeaway"),
    ];

    let calc = SplitCalculator::default();
    let debts: DebtSet = calc.compute_all(&transactions).into_iter().collect();
    println!("{} transactions produced {} debts\n", transactions.len(), debts.len());

    let netted = NettingEngine::net(debts.relations());
    println!("{}", netted);

    let plan = SettlementPlanner::plan(debts.relations());
    println!("{}", plan);

    // Everyone pays what the plan says, within the week.
    let rewards = RewardEngine::default();
    for user in &flat {
        let mut profile = rewards.new_profile(user.clone());
        for transfer in plan.payments_by(user) {
            let outcome = rewards.apply(
                &mut profile,
                &ActivityEvent::DebtSettled {
                    amount: transfer.amount,
                    days_outstanding: 3,
                },
            );
            for badge in outcome.unlocked {
                println!("{} earned the \"{}\" badge", user, badge);
            }
        }
        println!(
            "{:<4} level {} · {} XP · trust {}",
            user,
            profile.level(),
            profile.experience,
            profile.trust_score
        );
    }
}
