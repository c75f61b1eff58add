//! Splitting one dinner bill every supported way.
//!
//! Shows the debt relations each split method produces for the same
//! transaction.

use divvy_engine::core::transaction::{SplitMethod, Transaction};
use divvy_engine::core::user::UserId;
use divvy_engine::split::SplitCalculator;
use rust_decimal_macros::dec;

fn main() {
    println!("━━━ divvy-engine: one bill, five splits ━━━\n");

    let alice = UserId::new("alice");
    let bob = UserId::new("bob");
    let carol = UserId::new("carol");
    let everyone = vec![alice.clone(), bob.clone(), carol.clone()];

    let methods = vec![
        SplitMethod::Equal,
        SplitMethod::Percentage(
            [(alice.clone(), dec!(20)), (bob.clone(), dec!(30)), (carol.clone(), dec!(50))].into(),
        ),
        SplitMethod::Adjustment([(carol.clone(), dec!(15))].into()),
        SplitMethod::ExactAmount(
            [(alice.clone(), dec!(40)), (bob.clone(), dec!(25)), (carol.clone(), dec!(55))].into(),
        ),
        SplitMethod::Shares([(alice.clone(), 1), (bob.clone(), 1), (carol.clone(), 2)].into()),
    ];

    let calc = SplitCalculator::default();
    for split in methods {
        let name = split.name();
        let tx = Transaction::new(dec!(120), vec![alice.clone()], everyone.clone(), split)
            .with_description("Dinner");

        println!("{} split of {}:", name, tx.amount());
        match calc.compute(&tx) {
            Ok(debts) if debts.is_empty() => println!("  (nothing owed)"),
            Ok(debts) => {
                for d in debts {
                    println!("  {:<6} owes {:<6} {:>8}", d.from(), d.to(), d.amount().round_dp(2));
                }
            }
            Err(e) => println!("  error: {}", e),
        }
        println!();
    }
}
