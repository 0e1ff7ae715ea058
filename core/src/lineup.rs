//! Lineup selection before each play.
//!
//! RULE: selection is a pure function of the roster state. Healthy
//! players fill position slots by rating weighted by energy; a slot that
//! cannot be filled takes the best healthy player of any position. When
//! nobody is healthy the whole roster is used so a play can still run.

use crate::{config::RatingRange, player::TeamGameState, snapshot::Position};
use std::cmp::Ordering;

/// `count` players drawn from any of `positions`.
#[derive(Debug, Clone, Copy)]
pub struct Slot {
    pub positions: &'static [Position],
    pub count:     usize,
}

impl Slot {
    pub const fn new(positions: &'static [Position], count: usize) -> Self {
        Self { positions, count }
    }
}

/// Lineup weight: overall rating scaled by remaining energy.
fn score(team: &TeamGameState, idx: usize, range: RatingRange) -> f64 {
    let p = &team.players[idx];
    p.overall(range) * (0.4 + 0.6 * p.energy)
}

/// Choose on-field indexes for `slots`, in slot order.
pub fn select(team: &TeamGameState, slots: &[Slot], range: RatingRange) -> Vec<usize> {
    let mut ranked: Vec<(usize, f64)> = (0..team.players.len())
        .map(|i| (i, score(team, i, range)))
        .collect();
    // Descending score, then roster order.
    ranked.sort_by(|a, b| match b.1.total_cmp(&a.1) {
        Ordering::Equal => a.0.cmp(&b.0),
        other => other,
    });

    let healthy: Vec<usize> = ranked
        .iter()
        .map(|(i, _)| *i)
        .filter(|&i| team.players[i].available())
        .collect();
    if healthy.is_empty() {
        let wanted: usize = slots.iter().map(|s| s.count).sum();
        return ranked.into_iter().take(wanted.max(1)).map(|(i, _)| i).collect();
    }

    let mut chosen: Vec<usize> = Vec::new();
    let mut unfilled = 0usize;
    for slot in slots {
        let mut filled = 0;
        for &i in &healthy {
            if filled == slot.count {
                break;
            }
            if !chosen.contains(&i) && slot.positions.contains(&team.players[i].position()) {
                chosen.push(i);
                filled += 1;
            }
        }
        unfilled += slot.count - filled;
    }

    for &i in &healthy {
        if unfilled == 0 {
            break;
        }
        if !chosen.contains(&i) {
            chosen.push(i);
            unfilled -= 1;
        }
    }
    chosen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        snapshot::{Rating, RatingsSnapshot, TeamSnapshot},
        types::Side,
    };

    const SLOTS: &[Slot] = &[
        Slot::new(&[Position::Guard], 1),
        Slot::new(&[Position::Center], 1),
    ];

    fn team(players: Vec<RatingsSnapshot>) -> TeamGameState {
        TeamGameState::from_snapshot(
            Side::Home,
            &TeamSnapshot { team_id: "t".into(), name: "T".into(), players },
        )
    }

    fn p(id: u32, pos: Position, r: f64) -> RatingsSnapshot {
        RatingsSnapshot::new(id, format!("P{id}"), pos).with_rating(Rating::Speed, r)
    }

    #[test]
    fn fills_slots_by_rating() {
        let t = team(vec![
            p(1, Position::Guard, 40.0),
            p(2, Position::Guard, 80.0),
            p(3, Position::Center, 50.0),
        ]);
        let ids: Vec<u32> = select(&t, SLOTS, RatingRange::default())
            .into_iter()
            .map(|i| t.players[i].id())
            .collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn tired_starter_goes_to_bench() {
        let mut t = team(vec![p(1, Position::Guard, 60.0), p(2, Position::Guard, 50.0)]);
        t.players[0].drain(1.0);
        let picked = select(&t, &SLOTS[..1], RatingRange::default());
        assert_eq!(t.players[picked[0]].id(), 2);
    }

    #[test]
    fn empty_slot_takes_any_healthy_player() {
        let t = team(vec![p(1, Position::Guard, 40.0), p(2, Position::Forward, 70.0)]);
        let picked = select(&t, SLOTS, RatingRange::default());
        assert_eq!(picked.len(), 2);
    }

    #[test]
    fn injured_roster_still_fields_players() {
        let mut t = team(vec![p(1, Position::Guard, 40.0), p(2, Position::Center, 70.0)]);
        for pl in &mut t.players {
            pl.injured = true;
        }
        assert_eq!(select(&t, SLOTS, RatingRange::default()).len(), 2);
    }
}
