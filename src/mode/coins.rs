use super::{GameMode, GameModeKind, Roster, ScoreLine};
use crate::game::components::ItemType;

/// Coins picked up from item spawns are the score.
#[derive(Debug, Clone)]
pub struct CoinCollection {
    roster: Roster,
    coins: Vec<u32>,
    /// <= 0 disables the coin-limit condition
    coin_limit: i32,
}

impl CoinCollection {
    pub fn new(roster: Roster, coin_limit: i32) -> Self {
        let coins = vec![0; roster.len()];
        Self { roster, coins, coin_limit }
    }

    pub fn coins(&self, slot: usize) -> u32 {
        self.roster
            .slots()
            .iter()
            .position(|&s| s == slot)
            .map(|i| self.coins[i])
            .unwrap_or(0)
    }
}

impl GameMode for CoinCollection {
    fn kind(&self) -> GameModeKind {
        GameModeKind::CoinCollection
    }

    fn roster(&self) -> &Roster {
        &self.roster
    }

    fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    fn on_item_collected(&mut self, slot: usize, item: ItemType) {
        if item != ItemType::Coin {
            return;
        }
        if let Some(i) = self.roster.slots().iter().position(|&s| s == slot) {
            self.coins[i] += 1;
        }
    }

    fn check_win_condition(&self) -> (bool, Vec<usize>) {
        if self.coin_limit > 0 {
            let winners = self.roster.reaching(|s| self.coins(s), self.coin_limit as u32);
            if !winners.is_empty() {
                return (true, winners);
            }
        }
        if self.roster.time_up() || self.roster.all_out() {
            return (true, self.roster.tied_for_max(|s| self.coins(s)));
        }
        (false, Vec::new())
    }

    fn status_text(&self) -> String {
        match self.roster.leader(|s| self.coins(s)) {
            Some(leader) if self.coin_limit > 0 => format!(
                "First to {} coins! Leader: {} ({})",
                self.coin_limit,
                self.roster.name(leader),
                self.coins(leader)
            ),
            _ => self.name().to_string(),
        }
    }

    fn scoreboard(&self) -> Vec<ScoreLine> {
        self.roster
            .slots()
            .iter()
            .map(|&slot| ScoreLine {
                slot,
                name: self.roster.name(slot).to_string(),
                kills: self.roster.kills(slot),
                value: self.coins(slot) as f32,
                unit: "coins",
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_coins_count() {
        let mut mode = CoinCollection::new(Roster::new(&["A", "B"], 0.0), 2);
        mode.on_item_collected(0, ItemType::Star);
        mode.on_item_collected(0, ItemType::Coin);
        assert_eq!(mode.coins(0), 1);
        assert_eq!(mode.check_win_condition(), (false, vec![]));

        mode.on_item_collected(0, ItemType::Coin);
        assert_eq!(mode.check_win_condition(), (true, vec![0]));
    }

    #[test]
    fn test_time_up_tie() {
        let mut mode = CoinCollection::new(Roster::new(&["A", "B", "C"], 5.0), 0);
        mode.on_item_collected(0, ItemType::Coin);
        mode.on_item_collected(2, ItemType::Coin);
        mode.update(5.0, &[]);
        assert_eq!(mode.check_win_condition(), (true, vec![0, 2]));
    }

    #[test]
    fn test_everyone_out_ends_on_most_coins() {
        let mut mode = CoinCollection::new(Roster::new(&["A", "B"], 0.0), 0);
        mode.on_item_collected(0, ItemType::Coin);
        mode.on_player_eliminated(0);
        mode.on_player_eliminated(1);
        assert_eq!(mode.check_win_condition(), (true, vec![0]));
    }
}
