//! The game state machine.
//!
//! PHASES (fixed order, never skipped):
//!   PreGame -> InPeriod -> BetweenPeriods -> InPeriod ... -> OvertimeCheck
//!   -> (BetweenPeriods -> InPeriod -> OvertimeCheck)* -> Final
//!
//! RULES:
//!   - `advance()` resolves exactly one play and returns whether the
//!     game is final. Period starts and ends are recorded around it.
//!   - Clock and period only move forward.
//!   - All randomness flows through the engine's GameRng.
//!   - Roster and config errors surface from `new()`, before anything is
//!     logged; in-game events are never errors.
//!   - The score and the accumulator are only touched in `commit()`.

use crate::{
    box_score::{BoxScore, GameResult},
    config::SimConfig,
    error::{ConfigError, SimResult},
    event::{kind, PlayByPlayEvent},
    finalizer::{self, ForcedOutcome, ScoringBias, Winner},
    outcome::PlayOutcome,
    play_log::PlayByPlayLog,
    player::TeamGameState,
    resolver::{self, PlayContext},
    rng::{GameRng, SeedBank, StreamSlot},
    snapshot::TeamSnapshot,
    sport::{Baseball, Basketball, Football, GameState, Hockey, Notice, Sport},
    stats::{Stat, StatAccumulator, StatDelta},
    types::{Seconds, Side, SportKind},
};
use log::{debug, info, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    PreGame,
    InPeriod,
    BetweenPeriods,
    OvertimeCheck,
    Final,
}

pub struct GameEngine<'a, S: Sport> {
    config: &'a SimConfig,
    seed:   u64,
    state:  GameState<S>,
    teams:  [TeamGameState; 2],
    phase:  GamePhase,
    rng:    GameRng,
    bias:   ScoringBias,
    stats:  StatAccumulator,
    log:    PlayByPlayLog,
}

impl<'a, S: Sport> GameEngine<'a, S> {
    /// Validate everything up front; a game that starts always finishes.
    pub fn new(
        home: &TeamSnapshot,
        away: &TeamSnapshot,
        config: &'a SimConfig,
        seed: u64,
        bias: ScoringBias,
    ) -> SimResult<Self> {
        config.validate()?;
        if config.sport != S::KIND {
            return Err(ConfigError::SportMismatch {
                engine: S::KIND.to_string(),
                config: config.sport.to_string(),
            }
            .into());
        }
        let requirements = S::requirements();
        home.check(&requirements)?;
        away.check(&requirements)?;

        let teams = [
            TeamGameState::from_snapshot(Side::Home, home),
            TeamGameState::from_snapshot(Side::Away, away),
        ];
        let state = GameState::new(&teams, config.rating_range);
        Ok(Self {
            config,
            seed,
            state,
            teams,
            phase: GamePhase::PreGame,
            rng: SeedBank::new(seed).rng(StreamSlot::Play),
            bias,
            stats: StatAccumulator::new(),
            log: PlayByPlayLog::new(),
        })
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn state(&self) -> &GameState<S> {
        &self.state
    }

    pub fn teams(&self) -> &[TeamGameState; 2] {
        &self.teams
    }

    pub fn stats(&self) -> &StatAccumulator {
        &self.stats
    }

    pub fn log(&self) -> &PlayByPlayLog {
        &self.log
    }

    pub fn is_final(&self) -> bool {
        self.phase == GamePhase::Final
    }

    /// Resolve one play. Returns true once the game is final.
    pub fn advance(&mut self) -> bool {
        match self.phase {
            GamePhase::Final => return true,
            GamePhase::PreGame | GamePhase::BetweenPeriods => self.begin_period(),
            GamePhase::InPeriod | GamePhase::OvertimeCheck => {}
        }
        self.play();
        self.settle()
    }

    /// Play to the final whistle.
    pub fn run(mut self) -> GameResult {
        while !self.advance() {}
        self.into_result()
    }

    pub fn into_result(self) -> GameResult {
        let box_score = BoxScore::build(
            S::KIND,
            self.seed,
            &self.teams,
            &self.stats,
            self.state.overtimes,
            self.state.clock.period,
        );
        GameResult { box_score, event_log: self.log.into_events() }
    }

    // ── Transitions ────────────────────────────────────────────────

    fn begin_period(&mut self) {
        let rules = &self.config.rules;
        let next = self.state.clock.period + 1;
        let overtime = next > rules.num_periods;
        let length = match (S::KIND.clocked(), overtime) {
            (false, _) => 0,
            (true, false) => rules.period_length,
            (true, true) => rules.overtime.length,
        };
        if overtime {
            self.state.overtimes += 1;
        }
        self.state.clock.start_period(next, length);
        let text = S::start_period(&mut self.state, &self.teams, self.config, &mut self.rng);
        debug!("{} period {next} starts ({length}s)", S::KIND);
        self.notice(Notice::new(self.state.possession, kind::PERIOD_START, text));
        self.phase = GamePhase::InPeriod;
    }

    /// Close the period if it is over and decide what comes next.
    fn settle(&mut self) -> bool {
        let config = self.config;
        let rules = &config.rules;
        let sudden_death =
            self.state.in_overtime(rules) && rules.overtime.sudden_death && !self.state.tied();
        if !(sudden_death || S::period_over(&self.state, rules)) {
            return false;
        }

        let period = self.state.clock.period;
        let label = S::KIND.period_label(period, rules.num_periods);
        let text = format!("End of {label}. {}", self.score_line());
        self.notice(Notice::new(self.state.possession, kind::PERIOD_END, text));
        debug!("{} period {period} over at {:?}", S::KIND, self.state.score);

        if period < rules.num_periods {
            self.phase = GamePhase::BetweenPeriods;
            return false;
        }

        self.phase = GamePhase::OvertimeCheck;
        if !self.state.tied() || rules.ties_allowed {
            return self.finish();
        }
        if self.state.overtimes < rules.overtime_limit() {
            self.phase = GamePhase::BetweenPeriods;
            return false;
        }
        if rules.overtime.shootout {
            let attempts = S::shootout(&self.state, &self.teams, config, &mut self.rng);
            for outcome in attempts {
                self.commit(outcome, 0);
            }
        }
        self.finish()
    }

    fn finish(&mut self) -> bool {
        self.phase = GamePhase::Final;
        let winner = Winner::from_score(self.state.score);
        let mut text = format!("Final: {}", self.score_line());
        if self.state.overtimes > 0 {
            if S::KIND.clocked() {
                let n = self.state.overtimes;
                text.push_str(&if n == 1 { " (OT)".to_string() } else { format!(" ({n}OT)") });
            } else {
                text.push_str(&format!(" ({} innings)", self.state.clock.period));
            }
        }
        let side = winner.side().unwrap_or(Side::Home);
        self.notice(Notice::new(side, kind::GAME_END, text));
        info!(
            "{} final {:?} winner={} seed={} events={}",
            S::KIND,
            self.state.score,
            winner,
            self.seed,
            self.log.len()
        );
        true
    }

    // ── Plays ──────────────────────────────────────────────────────

    fn play(&mut self) {
        let range = self.config.rating_range;
        for notice in S::prepare(&mut self.state, &mut self.teams, range) {
            self.notice(notice);
        }
        let outcome = {
            let ctx = PlayContext {
                state: &self.state,
                teams: &self.teams,
                config: self.config,
                bias: self.bias,
            };
            resolver::resolve::<S>(&ctx, &mut self.rng)
        };
        let used = self.state.clock.run_off(outcome.elapsed);
        self.commit(outcome, used);
    }

    /// Apply one outcome: fatigue, score, situation, injury, stats, log.
    fn commit(&mut self, outcome: PlayOutcome<S::Delta>, used: Seconds) {
        let mut stats = outcome.stats.clone();
        stats.extend(self.fatigue(used));
        for &(side, id) in &outcome.participants {
            if let Some(p) = self.teams[side.index()].find_mut(id) {
                p.plays += 1;
            }
        }

        if let Some(side) = outcome.scoring_side {
            self.state.score[side.index()] += outcome.points;
        }
        S::apply(&mut self.state, &outcome);

        let injury = outcome.injury.and_then(|(side, id)| {
            let team = &mut self.teams[side.index()];
            let team_name = team.name.clone();
            let player = team.find_mut(id)?;
            player.injured = true;
            Some(Notice::new(
                side,
                kind::INJURY,
                format!("{} ({team_name}) is injured and leaves the game", player.name()),
            ))
        });

        self.stats.apply(&stats);
        trace!(
            "{} p{} {}s {}: {}",
            S::KIND,
            self.state.clock.period,
            self.state.clock.seconds_remaining,
            outcome.kind,
            outcome.text
        );
        self.record(outcome.offense, outcome.kind, outcome.text, outcome.hide, stats);
        if let Some(notice) = injury {
            self.notice(notice);
        }
    }

    /// Drain everyone on the field, rest everyone else. Returns the
    /// time-on-ice deltas for sports that track them.
    fn fatigue(&mut self, used: Seconds) -> Vec<StatDelta> {
        let factor = self.config.factors.fatigue;
        let mut deltas = Vec::new();
        for team in &mut self.teams {
            let side = team.side;
            for idx in 0..team.players.len() {
                let on_field = team.on_field.contains(&idx);
                let player = &mut team.players[idx];
                if on_field {
                    player.drain(S::drain(used, player.position()) * factor);
                    player.seconds_played += used;
                    if S::TRACKS_TIME && used > 0 {
                        deltas.push(StatDelta::player(side, player.id(), Stat::SecondsPlayed, used));
                    }
                } else {
                    player.recover(S::recovery(used));
                }
            }
        }
        deltas
    }

    // ── Log ────────────────────────────────────────────────────────

    fn record(&mut self, side: Side, kind: &str, text: String, hide: bool, stats: Vec<StatDelta>) {
        let event = PlayByPlayEvent {
            seq: self.log.next_seq(),
            side,
            period: self.state.clock.period,
            clock: self.state.clock.seconds_remaining,
            kind: kind.to_string(),
            text,
            hide,
            score: self.state.score,
            stats,
            situation: S::snapshot(&self.state),
        };
        self.log.record(event);
    }

    fn notice(&mut self, notice: Notice) {
        self.record(notice.side, notice.kind, notice.text, notice.hide, Vec::new());
    }

    fn score_line(&self) -> String {
        format!(
            "{} {}, {} {}",
            self.teams[1].name, self.state.score[1], self.teams[0].name, self.state.score[0]
        )
    }
}

/// Simulate one game start to finish. A pure function of its inputs:
/// the same rosters, config, seed and forced outcome always produce the
/// same box score and event log.
pub fn simulate_game(
    home: &TeamSnapshot,
    away: &TeamSnapshot,
    config: &SimConfig,
    seed: u64,
    forced: Option<ForcedOutcome>,
) -> SimResult<GameResult> {
    match config.sport {
        SportKind::Basketball => finalizer::finalize::<Basketball>(home, away, config, seed, forced),
        SportKind::Football => finalizer::finalize::<Football>(home, away, config, seed, forced),
        SportKind::Hockey => finalizer::finalize::<Hockey>(home, away, config, seed, forced),
        SportKind::Baseball => finalizer::finalize::<Baseball>(home, away, config, seed, forced),
    }
}
