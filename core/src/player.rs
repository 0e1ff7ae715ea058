//! In-game player and team state.
//!
//! RULE: the ratings snapshot is shared and never mutated. Only energy,
//! time played and the injury flag change during a game. Injured players
//! stay in the roster list so their box-score line survives.

use crate::{
    config::RatingRange,
    rng::GameRng,
    snapshot::{Position, Rating, RatingsSnapshot, TeamSnapshot},
    types::{PlayerId, Seconds, Side},
};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct PlayerGameState {
    pub snapshot:       Arc<RatingsSnapshot>,
    /// 1.0 fully rested, 0.0 exhausted.
    pub energy:         f64,
    pub seconds_played: Seconds,
    pub plays:          u32,
    pub injured:        bool,
}

impl PlayerGameState {
    pub fn new(snapshot: Arc<RatingsSnapshot>) -> Self {
        let energy = snapshot.starting_energy();
        let injured = snapshot.injured;
        Self {
            snapshot,
            energy,
            seconds_played: 0,
            plays: 0,
            injured,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.snapshot.player_id
    }

    pub fn name(&self) -> &str {
        &self.snapshot.name
    }

    pub fn position(&self) -> Position {
        self.snapshot.position
    }

    pub fn available(&self) -> bool {
        !self.injured
    }

    /// Multiplier on every skill; an exhausted player plays at 70%.
    pub fn fatigue_modifier(&self) -> f64 {
        0.7 + 0.3 * self.energy.clamp(0.0, 1.0)
    }

    /// A rating mapped onto [0, 1] and scaled by fatigue.
    pub fn skill(&self, rating: Rating, range: RatingRange) -> f64 {
        range.normalize(self.snapshot.rating(rating, range)) * self.fatigue_modifier()
    }

    pub fn overall(&self, range: RatingRange) -> f64 {
        range.normalize(self.snapshot.overall(range))
    }

    pub fn drain(&mut self, amount: f64) {
        self.energy = (self.energy - amount.max(0.0)).max(0.0);
    }

    pub fn recover(&mut self, amount: f64) {
        self.energy = (self.energy + amount.max(0.0)).min(1.0);
    }
}

/// One side's roster plus who is currently on the field.
#[derive(Debug, Clone)]
pub struct TeamGameState {
    pub side:     Side,
    pub team_id:  String,
    pub name:     String,
    pub players:  Vec<PlayerGameState>,
    /// Indexes into `players`, chosen before every play.
    pub on_field: Vec<usize>,
}

impl TeamGameState {
    pub fn from_snapshot(side: Side, team: &TeamSnapshot) -> Self {
        Self {
            side,
            team_id: team.team_id.clone(),
            name: team.name.clone(),
            players: team
                .players
                .iter()
                .map(|p| PlayerGameState::new(Arc::new(p.clone())))
                .collect(),
            on_field: Vec::new(),
        }
    }

    pub fn find(&self, id: PlayerId) -> Option<&PlayerGameState> {
        self.players.iter().find(|p| p.id() == id)
    }

    pub fn find_mut(&mut self, id: PlayerId) -> Option<&mut PlayerGameState> {
        self.players.iter_mut().find(|p| p.id() == id)
    }

    pub fn on_field_players(&self) -> impl Iterator<Item = &PlayerGameState> {
        self.on_field.iter().filter_map(|&i| self.players.get(i))
    }

    pub fn is_on_field(&self, id: PlayerId) -> bool {
        self.on_field_players().any(|p| p.id() == id)
    }

    /// On-field players at any of `positions` (empty = any position).
    /// Falls back to everyone on the field, then the whole roster, so a
    /// play always has someone to credit.
    pub fn candidates(&self, positions: &[Position]) -> Vec<&PlayerGameState> {
        let matching: Vec<_> = self
            .on_field_players()
            .filter(|p| positions.is_empty() || positions.contains(&p.position()))
            .collect();
        if !matching.is_empty() {
            return matching;
        }
        let field: Vec<_> = self.on_field_players().collect();
        if !field.is_empty() {
            return field;
        }
        self.players.iter().collect()
    }

    /// The highest-skill candidate; ties go to the earlier depth-chart slot.
    pub fn pick_best(
        &self,
        positions: &[Position],
        rating: Rating,
        range: RatingRange,
    ) -> Option<&PlayerGameState> {
        best_of(self.candidates(positions), rating, range)
    }

    /// A skill-weighted draw among candidates.
    pub fn pick_weighted(
        &self,
        positions: &[Position],
        rating: Rating,
        range: RatingRange,
        rng: &mut GameRng,
    ) -> Option<&PlayerGameState> {
        let pool = self.candidates(positions);
        let weights: Vec<f64> = pool.iter().map(|p| 0.05 + p.skill(rating, range)).collect();
        let idx = rng.weighted_index(&weights);
        pool.get(idx).copied()
    }

    /// Like `pick_weighted` but never returns `exclude` when anyone else fits.
    pub fn pick_other(
        &self,
        positions: &[Position],
        rating: Rating,
        range: RatingRange,
        exclude: PlayerId,
        rng: &mut GameRng,
    ) -> Option<&PlayerGameState> {
        let pool: Vec<_> = self
            .candidates(positions)
            .into_iter()
            .filter(|p| p.id() != exclude)
            .collect();
        if pool.is_empty() {
            return None;
        }
        let weights: Vec<f64> = pool.iter().map(|p| 0.05 + p.skill(rating, range)).collect();
        let idx = rng.weighted_index(&weights);
        pool.get(idx).copied()
    }

    /// Best healthy player on the whole roster, on the field or not.
    pub fn best_available(
        &self,
        positions: &[Position],
        rating: Rating,
        range: RatingRange,
    ) -> Option<&PlayerGameState> {
        let healthy: Vec<_> = self
            .players
            .iter()
            .filter(|p| p.available())
            .filter(|p| positions.is_empty() || positions.contains(&p.position()))
            .collect();
        best_of(healthy, rating, range)
    }

    /// Mean skill of the on-field candidates; the midpoint when empty.
    pub fn mean_skill(&self, positions: &[Position], rating: Rating, range: RatingRange) -> f64 {
        let pool = self.candidates(positions);
        if pool.is_empty() {
            return 0.5;
        }
        pool.iter().map(|p| p.skill(rating, range)).sum::<f64>() / pool.len() as f64
    }
}

fn best_of<'a>(
    pool: Vec<&'a PlayerGameState>,
    rating: Rating,
    range: RatingRange,
) -> Option<&'a PlayerGameState> {
    let mut best: Option<(&PlayerGameState, f64)> = None;
    for p in pool {
        let s = p.skill(rating, range);
        match best {
            Some((_, b)) if s <= b => {}
            _ => best = Some((p, s)),
        }
    }
    best.map(|(p, _)| p)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team() -> TeamGameState {
        let snap = TeamSnapshot {
            team_id: "t".into(),
            name: "T".into(),
            players: vec![
                RatingsSnapshot::new(1, "Slow", Position::Guard).with_rating(Rating::Speed, 20.0),
                RatingsSnapshot::new(2, "Fast", Position::Guard).with_rating(Rating::Speed, 90.0),
                RatingsSnapshot {
                    injured: true,
                    ..RatingsSnapshot::new(3, "Hurt", Position::Center)
                        .with_rating(Rating::Speed, 99.0)
                },
            ],
        };
        TeamGameState::from_snapshot(Side::Home, &snap)
    }

    #[test]
    fn fatigue_lowers_skill() {
        let mut t = team();
        let range = RatingRange::default();
        let fresh = t.players[1].skill(Rating::Speed, range);
        t.players[1].drain(1.0);
        let tired = t.players[1].skill(Rating::Speed, range);
        assert!(tired < fresh);
        assert!((tired / fresh - 0.7).abs() < 1e-9);
    }

    #[test]
    fn pre_game_injury_carries_over() {
        let t = team();
        assert!(t.players[2].injured);
        let best = t.best_available(&[], Rating::Speed, RatingRange::default()).unwrap();
        assert_eq!(best.id(), 2);
    }

    #[test]
    fn candidates_fall_back_to_roster() {
        let t = team();
        assert_eq!(t.candidates(&[Position::Goalie]).len(), 3);
    }

    #[test]
    fn energy_stays_in_unit_range() {
        let mut t = team();
        t.players[0].drain(5.0);
        assert_eq!(t.players[0].energy, 0.0);
        t.players[0].recover(5.0);
        assert_eq!(t.players[0].energy, 1.0);
    }
}
