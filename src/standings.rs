//! Win tally across a series of matches

use serde::{Deserialize, Serialize};

/// Wins recorded for one roster slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingEntry {
    pub player: u32,
    pub wins: u32,
}

/// Series results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standings {
    /// One entry per roster slot, in slot order
    pub entries: Vec<StandingEntry>,
    /// Matches that ended with no survivor (or on the clock)
    pub draws: u32,
    pub matches: u32,
}

impl Standings {
    /// Empty standings for `players` roster slots
    pub fn new(players: usize) -> Self {
        Self {
            entries: (0..players as u32)
                .map(|player| StandingEntry { player, wins: 0 })
                .collect(),
            draws: 0,
            matches: 0,
        }
    }

    /// Record one finished match
    pub fn record(&mut self, winner: Option<u32>) {
        self.matches += 1;
        let Some(id) = winner else {
            self.draws += 1;
            return;
        };
        match self.entries.iter_mut().find(|e| e.player == id) {
            Some(entry) => entry.wins += 1,
            None => self.entries.push(StandingEntry { player: id, wins: 1 }),
        }
    }

    /// Entries sorted by wins, best first (ties keep slot order)
    pub fn ranked(&self) -> Vec<&StandingEntry> {
        let mut ranked: Vec<&StandingEntry> = self.entries.iter().collect();
        ranked.sort_by(|a, b| b.wins.cmp(&a.wins));
        ranked
    }

    /// Slot with strictly the most wins, if any
    pub fn leader(&self) -> Option<u32> {
        let ranked = self.ranked();
        match ranked.as_slice() {
            [first, second, ..] if first.wins == second.wins => None,
            [first, ..] if first.wins > 0 => Some(first.player),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.matches == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_rank() {
        let mut standings = Standings::new(3);
        assert!(standings.is_empty());
        standings.record(Some(2));
        standings.record(Some(2));
        standings.record(Some(0));
        standings.record(None);

        assert_eq!(standings.matches, 4);
        assert_eq!(standings.draws, 1);
        let ranked = standings.ranked();
        assert_eq!(ranked[0].player, 2);
        assert_eq!(ranked[0].wins, 2);
        assert_eq!(ranked[1].player, 0);
        assert_eq!(standings.leader(), Some(2));
    }

    #[test]
    fn test_leader_requires_clear_lead() {
        let mut standings = Standings::new(2);
        assert_eq!(standings.leader(), None);
        standings.record(Some(0));
        standings.record(Some(1));
        assert_eq!(standings.leader(), None);
    }

    #[test]
    fn test_json_shape() {
        let mut standings = Standings::new(1);
        standings.record(Some(0));
        let json = serde_json::to_string(&standings).unwrap();
        assert_eq!(json, r#"{"entries":[{"player":0,"wins":1}],"draws":0,"matches":1}"#);
    }
}
