//! Live replay of a finished game.
//!
//! A `LiveSim` is a read-only cursor over an `Arc`-shared event log and
//! box score. Any number of viewers can replay the same game at their
//! own pace; none of them can change what happened.
//!
//! RULES:
//!   - Every raw event is applied to the `SportState` exactly once, in
//!     order. Hidden events update the state but never produce a
//!     message on their own.
//!   - The final box score is emitted once, after the last event.
//!   - After `cancel()` nothing more is emitted.

use crate::{
    box_score::{BoxScore, GameResult},
    clock::ReplaySpeed,
    command::{LiveCommand, SkipTo},
    event::{PlayByPlayEvent, Situation},
    types::{format_clock, ordinal, Seconds, Side, SportKind},
};
use serde::Serialize;
use std::{sync::Arc, time::Duration};

/// Scoreboard as of some prefix of the event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SportState {
    pub sport:         SportKind,
    /// Events applied so far.
    pub index:         usize,
    pub period:        u32,
    pub clock:         Seconds,
    /// [home, away].
    pub score:         [u32; 2],
    pub possession:    Side,
    pub situation:     Situation,
    pub last_text:     String,
    pub scoring_plays: u32,
}

impl SportState {
    pub fn new(sport: SportKind) -> Self {
        Self {
            sport,
            index: 0,
            period: 0,
            clock: 0,
            score: [0, 0],
            possession: Side::Home,
            situation: Situation::Pregame,
            last_text: String::new(),
            scoring_plays: 0,
        }
    }

    pub fn apply(&mut self, event: &PlayByPlayEvent) {
        self.index += 1;
        self.period = event.period;
        self.clock = event.clock;
        self.score = event.score;
        self.possession = event.side;
        self.situation = event.situation.clone();
        if !event.hide {
            self.last_text = event.text.clone();
            if event.is_scoring() {
                self.scoring_plays += 1;
            }
        }
    }

    /// State after the first `count` events of `log`.
    pub fn at(sport: SportKind, log: &[PlayByPlayEvent], count: usize) -> Self {
        let mut state = Self::new(sport);
        for event in log.iter().take(count) {
            state.apply(event);
        }
        state
    }

    pub fn summary_line(&self) -> String {
        let when = if self.sport.clocked() {
            format!("{} {}", ordinal(self.period), format_clock(self.clock))
        } else {
            format!("{} inning", ordinal(self.period))
        };
        let mut line = format!(
            "{when} | away {} - home {}",
            self.score[Side::Away.index()],
            self.score[Side::Home.index()]
        );
        let situation = self.situation.describe();
        if !situation.is_empty() {
            line.push_str(" | ");
            line.push_str(&situation);
        }
        line
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveMessage {
    Play { state: SportState, event: PlayByPlayEvent },
    Final { box_score: BoxScore },
}

pub struct LiveSim {
    events:     Arc<[PlayByPlayEvent]>,
    box_score:  Arc<BoxScore>,
    state:      SportState,
    cursor:     usize,
    paused:     bool,
    cancelled:  bool,
    final_sent: bool,
    speed:      ReplaySpeed,
    /// Time accumulated towards the next chunk.
    carry:      Duration,
}

impl LiveSim {
    /// Starts paused at normal speed.
    pub fn new(events: Arc<[PlayByPlayEvent]>, box_score: Arc<BoxScore>) -> Self {
        let state = SportState::new(box_score.sport);
        Self {
            events,
            box_score,
            state,
            cursor: 0,
            paused: true,
            cancelled: false,
            final_sent: false,
            speed: ReplaySpeed::Normal,
            carry: Duration::ZERO,
        }
    }

    pub fn from_result(result: GameResult) -> Self {
        Self::new(result.event_log.into(), Arc::new(result.box_score))
    }

    /// A fresh replay over the same shared data.
    pub fn replay(&self) -> Self {
        Self::new(Arc::clone(&self.events), Arc::clone(&self.box_score))
    }

    pub fn state(&self) -> &SportState {
        &self.state
    }

    /// Number of raw events consumed.
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn is_done(&self) -> bool {
        self.cancelled || self.final_sent
    }

    pub fn speed(&self) -> ReplaySpeed {
        self.speed
    }

    // ── Controls ───────────────────────────────────────────────────

    pub fn play(&mut self) {
        self.paused = false;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn set_speed(&mut self, speed: ReplaySpeed) {
        self.speed = speed;
        self.carry = Duration::ZERO;
    }

    pub fn handle(&mut self, command: LiveCommand) -> Vec<LiveMessage> {
        match command {
            LiveCommand::Play => self.play(),
            LiveCommand::Pause => self.pause(),
            LiveCommand::Next => return self.next().into_iter().collect(),
            LiveCommand::FastForward { to } => return self.fast_forward(to).into_iter().collect(),
            LiveCommand::SetSpeed { speed } => self.set_speed(speed),
            LiveCommand::Cancel => self.cancel(),
        }
        Vec::new()
    }

    // ── Cursor ─────────────────────────────────────────────────────

    /// Consume exactly one raw event, hidden or not.
    pub fn step(&mut self) -> Option<LiveMessage> {
        if self.cancelled {
            return None;
        }
        match self.events.get(self.cursor) {
            Some(event) => {
                self.state.apply(event);
                self.cursor += 1;
                Some(LiveMessage::Play { state: self.state.clone(), event: event.clone() })
            }
            None => self.final_message(),
        }
    }

    /// One chunk: consume through the next visible event.
    pub fn next(&mut self) -> Option<LiveMessage> {
        self.advance_until(|_| true)
    }

    pub fn fast_forward(&mut self, to: SkipTo) -> Option<LiveMessage> {
        match to {
            SkipTo::NextScore => self.advance_until(|e| e.is_scoring()),
            SkipTo::EndOfPeriod => self.advance_until(|e| e.is_period_end()),
            SkipTo::EndOfGame => self.advance_until(|_| false),
        }
    }

    /// Emit whatever is due after `elapsed` of wall time.
    pub fn poll(&mut self, elapsed: Duration) -> Vec<LiveMessage> {
        let mut out = Vec::new();
        if self.paused || self.is_done() {
            return out;
        }
        self.carry += elapsed;
        let interval = self.speed.interval();
        while self.carry >= interval {
            self.carry -= interval;
            match self.next() {
                Some(message) => out.push(message),
                None => break,
            }
        }
        out
    }

    /// Consume events until a visible one matches `stop`, or the log
    /// runs out (then the final message).
    fn advance_until(&mut self, stop: impl Fn(&PlayByPlayEvent) -> bool) -> Option<LiveMessage> {
        if self.cancelled {
            return None;
        }
        while let Some(event) = self.events.get(self.cursor) {
            self.state.apply(event);
            self.cursor += 1;
            if !event.hide && stop(event) {
                return Some(LiveMessage::Play { state: self.state.clone(), event: event.clone() });
            }
        }
        self.final_message()
    }

    fn final_message(&mut self) -> Option<LiveMessage> {
        if self.final_sent {
            return None;
        }
        self.final_sent = true;
        Some(LiveMessage::Final { box_score: BoxScore::clone(&self.box_score) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::SimConfig,
        engine::simulate_game,
        fixtures::demo_team,
    };

    fn game() -> GameResult {
        let config = SimConfig::default_for(SportKind::Basketball);
        let home = demo_team(SportKind::Basketball, "H", "Home", 1);
        let away = demo_team(SportKind::Basketball, "A", "Away", 2);
        simulate_game(&home, &away, &config, 9, None).unwrap()
    }

    #[test]
    fn next_skips_hidden_rows_but_applies_them() {
        let result = game();
        let hidden = result.event_log.iter().filter(|e| e.hide).count();
        let mut live = LiveSim::from_result(result.clone());
        let mut visible = 0;
        while let Some(LiveMessage::Play { event, .. }) = live.next() {
            assert!(!event.hide);
            visible += 1;
        }
        assert_eq!(visible + hidden, result.event_log.len());
        assert_eq!(live.position(), result.event_log.len());
        assert_eq!(live.state().score, result.box_score.score());
        assert!(live.is_done());
        assert!(live.next().is_none());
    }

    #[test]
    fn poll_respects_pause_and_speed() {
        let mut live = LiveSim::from_result(game());
        assert!(live.poll(Duration::from_secs(10)).is_empty());
        live.play();
        live.set_speed(ReplaySpeed::Accelerated);
        let got = live.poll(Duration::from_millis(650));
        assert_eq!(got.len(), 2);
        live.handle(LiveCommand::Pause);
        assert!(live.poll(Duration::from_secs(5)).is_empty());
    }

    #[test]
    fn fast_forward_to_end_emits_final_once() {
        let mut live = LiveSim::from_result(game());
        match live.fast_forward(SkipTo::EndOfGame) {
            Some(LiveMessage::Final { box_score }) => assert!(box_score.winner.side().is_some()),
            other => panic!("expected final, got {other:?}"),
        }
        assert!(live.fast_forward(SkipTo::EndOfGame).is_none());
    }

    #[test]
    fn fast_forward_to_period_end_stops_on_period_end() {
        let mut live = LiveSim::from_result(game());
        match live.fast_forward(SkipTo::EndOfPeriod) {
            Some(LiveMessage::Play { event, state }) => {
                assert!(event.is_period_end());
                assert_eq!(state.period, 1);
            }
            other => panic!("expected period end, got {other:?}"),
        }
    }

    #[test]
    fn cancelled_replay_emits_nothing() {
        let mut live = LiveSim::from_result(game());
        live.step();
        live.cancel();
        assert!(live.step().is_none());
        assert!(live.next().is_none());
        live.play();
        assert!(live.poll(Duration::from_secs(60)).is_empty());
    }
}
