use super::{GameMode, GameModeKind, Roster, ScoreLine};

/// Most kills wins. The round ends when someone reaches the kill limit,
/// when time runs out, or when only one player has lives left.
#[derive(Debug, Clone)]
pub struct Deathmatch {
    roster: Roster,
    /// <= 0 disables the kill-limit condition
    kill_limit: i32,
}

impl Deathmatch {
    pub fn new(roster: Roster, kill_limit: i32) -> Self {
        Self { roster, kill_limit }
    }
}

impl GameMode for Deathmatch {
    fn kind(&self) -> GameModeKind {
        GameModeKind::Deathmatch
    }

    fn roster(&self) -> &Roster {
        &self.roster
    }

    fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    fn check_win_condition(&self) -> (bool, Vec<usize>) {
        let roster = &self.roster;

        if self.kill_limit > 0 {
            let winners = roster.reaching(|s| roster.kills(s), self.kill_limit as u32);
            if !winners.is_empty() {
                return (true, winners);
            }
        }

        if roster.time_up() {
            return (true, roster.tied_for_max(|s| roster.kills(s)));
        }

        if roster.len() > 1 {
            match roster.remaining().as_slice() {
                [survivor] => return (true, vec![*survivor]),
                [] => return (true, roster.tied_for_max(|s| roster.kills(s))),
                _ => {}
            }
        }

        (false, Vec::new())
    }

    fn status_text(&self) -> String {
        if self.kill_limit <= 0 {
            return self.name().to_string();
        }
        match self.roster.leader(|s| self.roster.kills(s)) {
            Some(leader) => format!(
                "First to {} kills! Leader: {} ({})",
                self.kill_limit,
                self.roster.name(leader),
                self.roster.kills(leader)
            ),
            None => format!("First to {} kills!", self.kill_limit),
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
                value: self.roster.kills(slot) as f32,
                unit: "kills",
            })
            .collect()
    }
}
