use bevy::prelude::*;

use crate::shared::*;

/// Running economy totals for save data and the stats screen.
#[derive(Resource, Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct EconomyStats {
    pub total_earned: u64,
    pub total_spent: u64,
    pub total_transactions: u64,
}

/// Applies CoinChangeEvents to the ledger balance.
/// Spends are expected to be pre-validated with `Ledger::can_afford`; an
/// overdraft here is a sender bug and is clamped to 0 with a warning.
pub fn apply_coin_changes(
    mut coin_events: EventReader<CoinChangeEvent>,
    mut ledger: ResMut<Ledger>,
    mut stats: ResMut<EconomyStats>,
) {
    for ev in coin_events.read() {
        if ev.amount >= 0 {
            let gain = ev.amount as u32;
            ledger.credit(gain);
            stats.total_earned = stats.total_earned.saturating_add(gain as u64);
            info!(
                "[Economy] Coins +{}: {}. New balance: {}c",
                gain, ev.reason, ledger.coins
            );
        } else {
            let cost = (-ev.amount) as u32;
            if ledger.spend(cost) {
                stats.total_spent = stats.total_spent.saturating_add(cost as u64);
                info!(
                    "[Economy] Coins -{}: {}. New balance: {}c",
                    cost, ev.reason, ledger.coins
                );
            } else {
                warn!(
                    "[Economy] Tried to spend {}c but only have {}c (reason: {}). Clamping to 0.",
                    cost, ledger.coins, ev.reason
                );
                stats.total_spent = stats.total_spent.saturating_add(ledger.coins as u64);
                ledger.coins = 0;
            }
        }
        stats.total_transactions += 1;
    }
}

/// Format a coin amount as a display string (e.g. "1,234c").
pub fn format_coins(amount: u32) -> String {
    let s = amount.to_string();
    let mut result = String::new();
    let digits: Vec<char> = s.chars().collect();
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*ch);
    }
    result.push('c');
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_coins() {
        assert_eq!(format_coins(0), "0c");
        assert_eq!(format_coins(500), "500c");
        assert_eq!(format_coins(1234), "1,234c");
        assert_eq!(format_coins(25000), "25,000c");
        assert_eq!(format_coins(1000000), "1,000,000c");
    }

    #[test]
    fn test_format_coins_exact_thousands() {
        assert_eq!(format_coins(1000), "1,000c");
        assert_eq!(format_coins(100000), "100,000c");
    }

    #[test]
    fn test_economy_stats_default() {
        let stats = EconomyStats::default();
        assert_eq!(stats.total_earned, 0);
        assert_eq!(stats.total_spent, 0);
        assert_eq!(stats.total_transactions, 0);
    }
}
