use crate::core::user::UserId;
use crate::rewards::achievements::Achievement;
use crate::rewards::profile::{level_for, UserProfile};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Something the user did (or had done to them) in the app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ActivityEvent {
    TransactionRecorded { amount: Decimal },
    ReminderSent,
    ReminderReceived,
    DebtSettled { amount: Decimal, days_outstanding: u32 },
}

/// Point values and thresholds for the reward rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardsConfig {
    pub transaction_xp: u64,
    pub reminder_xp: u64,
    pub settlement_xp: u64,
    pub on_time_bonus_xp: u64,
    /// Settling within this many days counts as on time.
    pub on_time_days: u32,
    pub on_time_trust: i32,
    pub late_trust: i32,
    pub reminder_received_trust: i32,
    pub initial_trust: u8,
    pub big_spender_amount: Decimal,
    pub trustworthy_score: u8,
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            transaction_xp: 10,
            reminder_xp: 2,
            settlement_xp: 25,
            on_time_bonus_xp: 15,
            on_time_days: 7,
            on_time_trust: 5,
            late_trust: 2,
            reminder_received_trust: -3,
            initial_trust: 50,
            big_spender_amount: dec!(1000),
            trustworthy_score: 80,
        }
    }
}

/// What a single event changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardOutcome {
    pub experience_gained: u64,
    pub trust_delta: i32,
    pub unlocked: Vec<Achievement>,
    pub level_up: bool,
}

/// Applies activity events to user profiles.
#[derive(Debug, Clone, Default)]
pub struct RewardEngine {
    config: RewardsConfig,
}

impl RewardEngine {
    pub fn new(config: RewardsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RewardsConfig {
        &self.config
    }

    /// A fresh profile with the configured starting trust.
    pub fn new_profile(&self, id: UserId) -> UserProfile {
        UserProfile::new(id, self.config.initial_trust)
    }

    pub fn apply(&self, profile: &mut UserProfile, event: &ActivityEvent) -> RewardOutcome {
        let level_before = profile.level();
        let trust_before = profile.trust_score;
        let mut outcome = RewardOutcome::default();
        let mut big_spend = false;

        match event {
            ActivityEvent::TransactionRecorded { amount } => {
                profile.transactions_recorded = profile.transactions_recorded.saturating_add(1);
                outcome.experience_gained = self.config.transaction_xp;
                big_spend = *amount >= self.config.big_spender_amount;
            }
            ActivityEvent::ReminderSent => {
                profile.reminders_sent = profile.reminders_sent.saturating_add(1);
                outcome.experience_gained = self.config.reminder_xp;
            }
            ActivityEvent::ReminderReceived => {
                profile.reminders_received = profile.reminders_received.saturating_add(1);
                profile.adjust_trust(self.config.reminder_received_trust);
            }
            ActivityEvent::DebtSettled {
                days_outstanding, ..
            } => {
                profile.settlements = profile.settlements.saturating_add(1);
                outcome.experience_gained = self.config.settlement_xp;
                if *days_outstanding <= self.config.on_time_days {
                    outcome.experience_gained = outcome.experience_gained.saturating_add(self.config.on_time_bonus_xp);
                    profile.adjust_trust(self.config.on_time_trust);
                } else {
                    profile.adjust_trust(self.config.late_trust);
                }
            }
        }

        profile.experience = profile.experience.saturating_add(outcome.experience_gained);
        outcome.trust_delta = i32::from(profile.trust_score) - i32::from(trust_before);
        outcome.level_up = level_for(profile.experience) > level_before;
        outcome.unlocked = self.unlock(profile, big_spend);

        if !outcome.unlocked.is_empty() {
            log::debug!("{} unlocked {:?}", profile.id, outcome.unlocked);
        }
        outcome
    }

    fn unlock(&self, profile: &mut UserProfile, big_spend: bool) -> Vec<Achievement> {
        let earned = [
            (Achievement::FirstTransaction, profile.transactions_recorded >= 1),
            (Achievement::FirstSettlement, profile.settlements >= 1),
            (Achievement::TenSettlements, profile.settlements >= 10),
            (Achievement::BigSpender, big_spend),
            (
                Achievement::Trustworthy,
                profile.trust_score >= self.config.trustworthy_score,
            ),
            (Achievement::Nudger, profile.reminders_sent >= 10),
            (Achievement::LevelFive, profile.level() >= 5),
        ];

        earned
            .into_iter()
            .filter(|(achievement, met)| *met && profile.achievements.insert(*achievement))
            .map(|(achievement, _)| achievement)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_and_profile() -> (RewardEngine, UserProfile) {
        let engine = RewardEngine::default();
        let profile = engine.new_profile(UserId::new("alice"));
        (engine, profile)
    }

    #[test]
    fn test_first_transaction_unlocks_once() {
        let (engine, mut profile) = engine_and_profile();
        let event = ActivityEvent::TransactionRecorded { amount: dec!(20) };

        let first = engine.apply(&mut profile, &event);
        assert_eq!(first.experience_gained, 10);
        assert_eq!(first.unlocked, vec![Achievement::FirstTransaction]);

        let second = engine.apply(&mut profile, &event);
        assert!(second.unlocked.is_empty());
        assert_eq!(profile.experience, 20);
    }

    #[test]
    fn test_big_spender() {
        let (engine, mut profile) = engine_and_profile();
        let outcome = engine.apply(
            &mut profile,
            &ActivityEvent::TransactionRecorded { amount: dec!(1000) },
        );
        assert!(outcome.unlocked.contains(&Achievement::BigSpender));
    }

    #[test]
    fn test_on_time_settlement_rewards_more() {
        let (engine, mut on_time) = engine_and_profile();
        let mut late = engine.new_profile(UserId::new("bob"));

        let fast = engine.apply(
            &mut on_time,
            &ActivityEvent::DebtSettled { amount: dec!(10), days_outstanding: 3 },
        );
        let slow = engine.apply(
            &mut late,
            &ActivityEvent::DebtSettled { amount: dec!(10), days_outstanding: 30 },
        );

        assert_eq!(fast.experience_gained, 40);
        assert_eq!(fast.trust_delta, 5);
        assert_eq!(slow.experience_gained, 25);
        assert_eq!(slow.trust_delta, 2);
        assert!(fast.unlocked.contains(&Achievement::FirstSettlement));
    }

    #[test]
    fn test_reminders_lower_trust() {
        let (engine, mut profile) = engine_and_profile();
        let outcome = engine.apply(&mut profile, &ActivityEvent::ReminderReceived);
        assert_eq!(outcome.trust_delta, -3);
        assert_eq!(outcome.experience_gained, 0);
        assert_eq!(profile.trust_score, 47);
    }

    #[test]
    fn test_trust_clamps_at_zero() {
        let engine = RewardEngine::new(RewardsConfig {
            initial_trust: 2,
            ..Default::default()
        });
        let mut profile = engine.new_profile(UserId::new("dave"));
        let outcome = engine.apply(&mut profile, &ActivityEvent::ReminderReceived);
        assert_eq!(profile.trust_score, 0);
        assert_eq!(outcome.trust_delta, -2);
    }

    #[test]
    fn test_settlement_streak_unlocks_badges() {
        let (engine, mut profile) = engine_and_profile();
        let settle = ActivityEvent::DebtSettled { amount: dec!(5), days_outstanding: 1 };

        let mut unlocked = Vec::new();
        for _ in 0..10 {
            unlocked.extend(engine.apply(&mut profile, &settle).unlocked);
        }

        // 10 * (25 + 15) = 400 XP -> level 3; trust 50 + 10 * 5 = 100.
        assert_eq!(profile.level(), 3);
        assert_eq!(profile.trust_score, 100);
        assert_eq!(
            unlocked,
            vec![
                Achievement::FirstSettlement,
                Achievement::Trustworthy,
                Achievement::TenSettlements,
            ]
        );
    }

    #[test]
    fn test_nudger_and_level_up() {
        let (engine, mut profile) = engine_and_profile();
        let mut last = RewardOutcome::default();
        for _ in 0..10 {
            last = engine.apply(&mut profile, &ActivityEvent::ReminderSent);
        }
        assert_eq!(last.unlocked, vec![Achievement::Nudger]);
        assert_eq!(profile.experience, 20);
        assert!(!last.level_up);
    }

    #[test]
    fn test_experience_saturates() {
        let (engine, mut profile) = engine_and_profile();
        profile.experience = u64::MAX - 5;
        profile.settlements = u32::MAX;

        let outcome = engine.apply(
            &mut profile,
            &ActivityEvent::DebtSettled { amount: dec!(10), days_outstanding: 1 },
        );
        assert_eq!(outcome.experience_gained, 40);
        assert_eq!(profile.experience, u64::MAX);
        assert_eq!(profile.settlements, u32::MAX);
        assert!(!outcome.level_up);
    }

    #[test]
    fn test_event_json_shape() {
        let event: ActivityEvent = serde_json::from_str(
            r#"{ "event": "debt_settled", "amount": "12.5", "days_outstanding": 4 }"#,
        )
        .unwrap();
        assert_eq!(
            event,
            ActivityEvent::DebtSettled { amount: dec!(12.5), days_outstanding: 4 }
        );
    }
}
