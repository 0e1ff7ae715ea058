//! Play resolution context and the shared resolver wrapper.
//!
//! RULE: resolving a play reads state and draws from the RNG handle. It
//! never mutates the game. The state machine applies the outcome.

use crate::{
    config::{RatingRange, SimConfig, TuningFactors},
    finalizer::ScoringBias,
    outcome::PlayOutcome,
    player::TeamGameState,
    rng::GameRng,
    sport::{GameState, Sport},
    types::{Seconds, Side},
};

/// Everything a sport's resolver may look at.
pub struct PlayContext<'a, S: Sport> {
    pub state:  &'a GameState<S>,
    pub teams:  &'a [TeamGameState; 2],
    pub config: &'a SimConfig,
    pub bias:   ScoringBias,
}

impl<'a, S: Sport> PlayContext<'a, S> {
    pub fn offense(&self) -> Side {
        self.state.possession
    }

    pub fn defense(&self) -> Side {
        self.state.possession.other()
    }

    pub fn team(&self, side: Side) -> &'a TeamGameState {
        &self.teams[side.index()]
    }

    pub fn off_team(&self) -> &'a TeamGameState {
        self.team(self.offense())
    }

    pub fn def_team(&self) -> &'a TeamGameState {
        self.team(self.defense())
    }

    pub fn factors(&self) -> &'a TuningFactors {
        &self.config.factors
    }

    pub fn range(&self) -> RatingRange {
        self.config.rating_range
    }

    /// Scoring multiplier for `side`: home advantage times any forced bias.
    pub fn edge(&self, side: Side) -> f64 {
        let home = match side {
            Side::Home => 1.0 + self.config.factors.home_advantage,
            Side::Away => 1.0,
        };
        home * (1.0 + self.bias.boost_for(side, self.state.score))
    }

    /// Relative scoring edge of `side` over its opponent.
    pub fn tilt(&self, side: Side) -> f64 {
        self.edge(side) / self.edge(side.other())
    }

    pub fn margin(&self, side: Side) -> i64 {
        self.state.margin(side)
    }

    /// Final regulation period (or overtime) with at most `window` seconds left.
    pub fn late_game(&self, window: Seconds) -> bool {
        self.state.clock.period >= self.config.rules.num_periods
            && self.state.clock.seconds_remaining <= window
    }
}

/// Resolve one play for sport `S`, then roll for an injury among the
/// participants in order. Lower energy raises the risk.
pub fn resolve<S: Sport>(ctx: &PlayContext<'_, S>, rng: &mut GameRng) -> PlayOutcome<S::Delta> {
    let mut outcome = S::resolve(ctx, rng);
    let rate = ctx.factors().injury_rate;
    if outcome.injury.is_none() && rate > 0.0 {
        for &(side, id) in &outcome.participants {
            let Some(player) = ctx.team(side).find(id) else { continue };
            if player.injured {
                continue;
            }
            if rng.chance(rate * (2.0 - player.energy)) {
                outcome.injury = Some((side, id));
                break;
            }
        }
    }
    outcome
}
