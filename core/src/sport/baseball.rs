//! Baseball: pitch-by-pitch, no clock.
//!
//! RULE: an inning ends on the third out of the bottom half. The bottom
//! of the final inning is skipped when the home side already leads, and
//! a home lead in the bottom of the final or an extra inning ends the
//! game on the spot.
//!
//! Pitches that do not end a plate appearance are recorded as hidden
//! rows: they carry pitch counts and balls and strikes but stay out of
//! the live display.

use super::{prob, GameState, Notice, Sport};
use crate::{
    config::{GameRules, RatingRange, SimConfig},
    event::{kind, Situation},
    lineup::{self, Slot},
    outcome::PlayOutcome,
    player::{PlayerGameState, TeamGameState},
    resolver::PlayContext,
    rng::GameRng,
    snapshot::{Position, Rating, RosterRequirements},
    stats::Stat,
    types::{ordinal, PlayerId, Seconds, Side, SportKind},
};
use serde::{Deserialize, Serialize};

use Position::{Catcher, Infielder, Outfielder, Pitcher};

const FIELDERS: &[Slot] = &[
    Slot::new(&[Catcher], 1),
    Slot::new(&[Infielder], 4),
    Slot::new(&[Outfielder], 3),
];

const BATTING_ORDER: usize = 9;

#[derive(Debug, Clone, Copy, Default)]
pub struct Baseball;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Half {
    Top,
    Bottom,
}

impl Half {
    /// The side at bat in this half.
    pub fn batting(self) -> Side {
        match self {
            Half::Top => Side::Away,
            Half::Bottom => Side::Home,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BaseballSituation {
    pub half:          Half,
    pub outs:          u8,
    pub balls:         u8,
    pub strikes:       u8,
    /// Runner ids on first, second, third.
    pub bases:         [Option<PlayerId>; 3],
    pub lineups:       [Vec<PlayerId>; 2],
    pub batter_index:  [usize; 2],
    pub pitcher:       [Option<PlayerId>; 2],
    /// Pitches thrown by each side's current pitcher.
    pub pitch_count:   [u32; 2],
    pub used_pitchers: [Vec<PlayerId>; 2],
}

impl BaseballSituation {
    pub fn batter(&self, side: Side) -> Option<PlayerId> {
        let order = &self.lineups[side.index()];
        if order.is_empty() {
            return None;
        }
        order.get(self.batter_index[side.index()] % order.len()).copied()
    }
}

/// Event-log view of the situation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseballView {
    pub half:        Half,
    pub outs:        u8,
    pub balls:       u8,
    pub strikes:     u8,
    pub bases:       [Option<PlayerId>; 3],
    pub batter:      Option<PlayerId>,
    pub pitcher:     Option<PlayerId>,
    pub pitch_count: [u32; 2],
}

impl BaseballView {
    pub fn describe(&self) -> String {
        let half = match self.half {
            Half::Top => "top",
            Half::Bottom => "bottom",
        };
        let runners: Vec<String> = self
            .bases
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_some())
            .map(|(i, _)| ordinal(i as u32 + 1))
            .collect();
        let on = if runners.is_empty() {
            "bases empty".to_string()
        } else {
            format!("runners on {}", runners.join(" and "))
        };
        format!("{half}, {} out, {}-{}, {on}", self.outs, self.balls, self.strikes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseballDelta {
    pub outs:        u8,
    pub balls:       u8,
    pub strikes:     u8,
    pub bases:       [Option<PlayerId>; 3],
    /// The plate appearance ended; the next batter is due up.
    pub batter_done: bool,
}

type Outcome = PlayOutcome<BaseballDelta>;

fn pitching(p: &PlayerGameState, range: RatingRange) -> f64 {
    p.skill(Rating::Stuff, range) + p.skill(Rating::Control, range)
}

fn batting(p: &PlayerGameState, range: RatingRange) -> f64 {
    p.skill(Rating::Contact, range) + p.skill(Rating::Eye, range) + p.skill(Rating::Power, range)
}

/// Up to nine healthy non-pitchers by hitting ability; the pitcher bats
/// when only eight are available.
fn batting_order(team: &TeamGameState, range: RatingRange) -> Vec<PlayerId> {
    let mut hitters: Vec<&PlayerGameState> = team
        .players
        .iter()
        .filter(|p| p.available() && p.position() != Pitcher)
        .collect();
    hitters.sort_by(|a, b| batting(b, range).total_cmp(&batting(a, range)));
    let mut order: Vec<PlayerId> = hitters.iter().take(BATTING_ORDER).map(|p| p.id()).collect();
    if order.len() < BATTING_ORDER {
        for p in team.players.iter().filter(|p| p.available() && p.position() == Pitcher) {
            if order.len() == BATTING_ORDER {
                break;
            }
            order.push(p.id());
        }
    }
    if order.is_empty() {
        order = team.players.iter().take(BATTING_ORDER).map(|p| p.id()).collect();
    }
    order
}

fn best_pitcher(team: &TeamGameState, range: RatingRange, exclude: &[PlayerId]) -> Option<PlayerId> {
    let mut best: Option<(PlayerId, f64)> = None;
    for p in team.players.iter().filter(|p| p.available() && p.position() == Pitcher) {
        if exclude.contains(&p.id()) {
            continue;
        }
        let q = pitching(p, range);
        if best.map_or(true, |(_, b)| q > b) {
            best = Some((p.id(), q));
        }
    }
    best.map(|(id, _)| id)
}

impl Sport for Baseball {
    const KIND: SportKind = SportKind::Baseball;
    const TRACKS_TIME: bool = false;

    type Situation = BaseballSituation;
    type Delta = BaseballDelta;

    fn requirements() -> RosterRequirements {
        RosterRequirements {
            positions: &[(Pitcher, 1), (Catcher, 1), (Infielder, 4), (Outfielder, 3)],
            min_players: 9,
        }
    }

    fn new_situation(teams: &[TeamGameState; 2], range: RatingRange) -> BaseballSituation {
        let starters = [
            best_pitcher(&teams[0], range, &[]),
            best_pitcher(&teams[1], range, &[]),
        ];
        BaseballSituation {
            half: Half::Top,
            outs: 0,
            balls: 0,
            strikes: 0,
            bases: [None; 3],
            lineups: [batting_order(&teams[0], range), batting_order(&teams[1], range)],
            batter_index: [0, 0],
            pitcher: starters,
            pitch_count: [0, 0],
            used_pitchers: [
                starters[0].into_iter().collect(),
                starters[1].into_iter().collect(),
            ],
        }
    }

    fn snapshot(state: &GameState<Self>) -> Situation {
        let sit = &state.situation;
        let fielding = sit.half.batting().other();
        Situation::Baseball(BaseballView {
            half: sit.half,
            outs: sit.outs,
            balls: sit.balls,
            strikes: sit.strikes,
            bases: sit.bases,
            batter: sit.batter(sit.half.batting()),
            pitcher: sit.pitcher[fielding.index()],
            pitch_count: sit.pitch_count,
        })
    }

    fn start_period(
        state: &mut GameState<Self>,
        _teams: &[TeamGameState; 2],
        config: &SimConfig,
        _rng: &mut GameRng,
    ) -> String {
        let sit = &mut state.situation;
        sit.half = Half::Top;
        sit.outs = 0;
        sit.balls = 0;
        sit.strikes = 0;
        sit.bases = [None; 3];
        state.possession = Half::Top.batting();
        let period = state.clock.period;
        let extra = if period > config.rules.num_periods { " (extra innings)" } else { "" };
        format!("Top of the {}{extra}.", ordinal(period))
    }

    fn prepare(
        state: &mut GameState<Self>,
        teams: &mut [TeamGameState; 2],
        range: RatingRange,
    ) -> Vec<Notice> {
        let off = state.possession;
        let def = off.other();
        let sit = &mut state.situation;
        let mut notices = Vec::new();

        let fielding = &teams[def.index()];
        let current = sit.pitcher[def.index()].and_then(|id| fielding.find(id));
        let hurt = current.map_or(true, |p| p.injured);
        let tired = hurt
            || current.is_some_and(|p| {
                let endurance = range.normalize(p.snapshot.rating(Rating::Endurance, range));
                f64::from(sit.pitch_count[def.index()]) > 70.0 + 50.0 * endurance
            });
        if tired {
            // With the bullpen spent, a hurt pitcher is replaced by anyone healthy.
            let relief = best_pitcher(fielding, range, &sit.used_pitchers[def.index()]).or_else(|| {
                let emergency = fielding.players.iter().find(|p| p.available());
                emergency.filter(|_| hurt).map(|p| p.id())
            });
            if let Some(relief) = relief {
                let old = sit.pitcher[def.index()]
                    .and_then(|id| fielding.find(id))
                    .map(|p| p.name().to_string());
                let new = fielding.find(relief).map(|p| p.name().to_string()).unwrap_or_default();
                let text = match old {
                    Some(old) => format!("Pitching change for {}: {new} replaces {old}", fielding.name),
                    None => format!("{new} takes the mound for {}", fielding.name),
                };
                notices.push(Notice::new(def, kind::SUBSTITUTION, text));
                sit.pitcher[def.index()] = Some(relief);
                sit.pitch_count[def.index()] = 0;
                sit.used_pitchers[def.index()].push(relief);
            }
        }

        // Injured runners give way to a pinch runner off the bench, who
        // also takes their spot in the order.
        let batting = &teams[off.index()];
        for base in 0..sit.bases.len() {
            let Some(runner) = sit.bases[base] else { continue };
            let Some(hurt) = batting.find(runner).filter(|p| p.injured) else { continue };
            let old = hurt.name().to_string();
            let bag = ordinal(base as u32 + 1);
            let pinch = batting
                .players
                .iter()
                .filter(|p| p.available() && p.position() != Pitcher)
                .find(|p| {
                    !sit.lineups[off.index()].contains(&p.id())
                        && !sit.bases.contains(&Some(p.id()))
                })
                .map(|p| (p.id(), p.name().to_string()));
            let text = match pinch {
                Some((id, name)) => {
                    sit.bases[base] = Some(id);
                    if let Some(slot) = sit.lineups[off.index()].iter_mut().find(|r| **r == runner) {
                        *slot = id;
                    }
                    format!("{name} pinch runs for {old} at {bag} for {}", batting.name)
                }
                None => {
                    sit.bases[base] = None;
                    format!("{old} is helped off {bag}; {} have no runner left", batting.name)
                }
            };
            notices.push(Notice::new(off, kind::SUBSTITUTION, text));
        }

        // Injured batters are skipped in the order.
        let batting = &teams[off.index()];
        let len = sit.lineups[off.index()].len();
        for _ in 0..len {
            let injured = sit
                .batter(off)
                .and_then(|id| batting.find(id))
                .is_some_and(|p| p.injured);
            if !injured {
                break;
            }
            sit.batter_index[off.index()] = (sit.batter_index[off.index()] + 1) % len;
        }

        let fielding = &mut teams[def.index()];
        let mut on_field = Vec::with_capacity(9);
        if let Some(pi) = sit.pitcher[def.index()]
            .and_then(|id| fielding.players.iter().position(|p| p.id() == id))
        {
            on_field.push(pi);
        }
        for i in lineup::select(fielding, FIELDERS, range) {
            if !on_field.contains(&i) {
                on_field.push(i);
            }
        }
        fielding.on_field = on_field;

        let batting = &mut teams[off.index()];
        let order = &sit.lineups[off.index()];
        batting.on_field = batting
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.available() && order.contains(&p.id()))
            .map(|(i, _)| i)
            .collect();
        notices
    }

    fn resolve(ctx: &PlayContext<'_, Self>, rng: &mut GameRng) -> Outcome {
        pitch(ctx, rng)
    }

    fn apply(state: &mut GameState<Self>, outcome: &Outcome) {
        let off = state.possession;
        let def = off.other();
        let d = &outcome.delta;
        let sit = &mut state.situation;
        sit.pitch_count[def.index()] += 1;
        sit.outs = d.outs;
        sit.balls = d.balls;
        sit.strikes = d.strikes;
        sit.bases = d.bases;
        if d.batter_done {
            let len = sit.lineups[off.index()].len().max(1);
            sit.batter_index[off.index()] = (sit.batter_index[off.index()] + 1) % len;
        }
        if sit.outs >= 3 && sit.half == Half::Top {
            sit.half = Half::Bottom;
            sit.outs = 0;
            sit.balls = 0;
            sit.strikes = 0;
            sit.bases = [None; 3];
            state.possession = Half::Bottom.batting();
        }
    }

    fn period_over(state: &GameState<Self>, rules: &GameRules) -> bool {
        let sit = &state.situation;
        if sit.half != Half::Bottom {
            return false;
        }
        let home_leads = state.margin(Side::Home) > 0;
        sit.outs >= 3 || (state.clock.period >= rules.num_periods && home_leads)
    }

    fn drain(_elapsed: Seconds, position: Position) -> f64 {
        if position == Pitcher { 0.004 } else { 0.0004 }
    }

    fn recovery(_elapsed: Seconds) -> f64 {
        0.0005
    }
}

// ── Plate appearance ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Contact {
    GroundOut,
    FlyOut,
    LineOut,
    Single,
    Double,
    Triple,
    HomeRun,
    Error,
}

const CONTACTS: [Contact; 8] = [
    Contact::GroundOut,
    Contact::FlyOut,
    Contact::LineOut,
    Contact::Single,
    Contact::Double,
    Contact::Triple,
    Contact::HomeRun,
    Contact::Error,
];

struct AtBat<'c, 'a> {
    ctx:     &'c PlayContext<'a, Baseball>,
    off:     Side,
    def:     Side,
    batter:  &'a PlayerGameState,
    pitcher: Option<&'a PlayerGameState>,
}

impl AtBat<'_, '_> {
    fn credit_pitcher(&self, o: &mut Outcome, stat: Stat, amount: u32) {
        if let Some(p) = self.pitcher {
            o.credit(self.def, p.id(), stat, amount);
        }
    }

    fn runner_name(&self, id: PlayerId) -> String {
        self.ctx
            .off_team()
            .find(id)
            .map(|p| p.name().to_string())
            .unwrap_or_else(|| format!("#{id}"))
    }

    /// Score `runners`, crediting RBIs to the batter when `rbi`.
    fn score_runs(&self, o: &mut Outcome, runners: &[PlayerId], rbi: bool, text: &mut String) {
        for &r in runners {
            o.score(self.off, Some(r), 1);
            self.credit_pitcher(o, Stat::RunsAllowed, 1);
            if rbi {
                o.credit(self.off, self.batter.id(), Stat::RunsBattedIn, 1);
            }
            text.push_str(&format!(" {} scores.", self.runner_name(r)));
        }
    }

    fn speed(&self, id: PlayerId) -> f64 {
        self.ctx
            .off_team()
            .find(id)
            .map(|p| p.skill(Rating::Speed, self.ctx.range()))
            .unwrap_or(0.5)
    }

    fn finish_pa(&self, o: &mut Outcome, at_bat: bool) {
        o.credit(self.off, self.batter.id(), Stat::PlateAppearances, 1);
        if at_bat {
            o.credit(self.off, self.batter.id(), Stat::AtBats, 1);
        }
        o.delta.balls = 0;
        o.delta.strikes = 0;
        o.delta.batter_done = true;
    }

    fn record_outs(&self, o: &mut Outcome, outs: u8) {
        o.delta.outs += outs;
        self.credit_pitcher(o, Stat::OutsRecorded, u32::from(outs));
    }
}

fn pitch(ctx: &PlayContext<'_, Baseball>, rng: &mut GameRng) -> Outcome {
    let (off, def, range) = (ctx.offense(), ctx.defense(), ctx.range());
    let sit = &ctx.state.situation;
    let f = ctx.factors();
    let batter = sit
        .batter(off)
        .and_then(|id| ctx.off_team().find(id))
        .or_else(|| ctx.off_team().pick_best(&[], Rating::Contact, range));
    let pitcher = sit.pitcher[def.index()].and_then(|id| ctx.def_team().find(id));

    let mut o = PlayOutcome::new(
        "pitch",
        off,
        BaseballDelta {
            outs: sit.outs,
            balls: sit.balls,
            strikes: sit.strikes,
            bases: sit.bases,
            batter_done: false,
        },
    );
    let Some(batter) = batter else {
        return o.text("No batter available").hidden();
    };
    let ab = AtBat { ctx, off, def, batter, pitcher };
    ab.credit_pitcher(&mut o, Stat::PitchesThrown, 1);
    o.involve(off, batter.id());

    let contact = batter.skill(Rating::Contact, range);
    let eye = batter.skill(Rating::Eye, range);
    let (control, stuff) = pitcher
        .map(|p| (p.skill(Rating::Control, range), p.skill(Rating::Stuff, range)))
        .unwrap_or((0.3, 0.3));

    let weights = [
        0.36 * f.walk * (1.3 - 0.6 * control) * (0.8 + 0.4 * eye),
        0.17,
        0.11 * f.strikeout * (1.0 + stuff - contact).max(0.2),
        0.18,
        0.17 * (0.7 + 0.6 * contact),
        0.003,
    ];
    let pname = pitcher.map(|p| p.name()).unwrap_or("the pitcher");
    match rng.weighted_index(&weights) {
        0 => {
            o.delta.balls += 1;
            if o.delta.balls < 4 {
                let text = format!("Ball {}", o_count(&o));
                return o.kind_of("ball").hidden().text(text);
            }
            ab.finish_pa(&mut o, false);
            o.credit(off, batter.id(), Stat::Walks, 1);
            ab.credit_pitcher(&mut o, Stat::WalksAllowed, 1);
            let mut text = format!("{} walks.", batter.name());
            let scored = force(&mut o.delta.bases, batter.id());
            ab.score_runs(&mut o, &scored, true, &mut text);
            o.kind_of("walk").text(text)
        }
        1 | 2 => {
            let swinging = o.delta.strikes < 3 && rng.chance(0.5);
            o.delta.strikes += 1;
            if o.delta.strikes < 3 {
                let what = if swinging { "swinging" } else { "called" };
                let text = format!("Strike {what} {}", o_count(&o));
                return o.kind_of("strike").hidden().text(text);
            }
            ab.finish_pa(&mut o, true);
            ab.record_outs(&mut o, 1);
            o.credit(off, batter.id(), Stat::Strikeouts, 1);
            ab.credit_pitcher(&mut o, Stat::StrikeoutsPitched, 1);
            o.kind_of("strikeout")
                .text(format!("{} strikes out {}.", pname, batter.name()))
        }
        3 => {
            if o.delta.strikes < 2 {
                o.delta.strikes += 1;
            }
            let text = format!("Foul ball {}", o_count(&o));
            o.kind_of("foul").hidden().text(text)
        }
        4 => in_play(&ab, o, rng),
        _ => {
            ab.finish_pa(&mut o, false);
            o.credit(off, batter.id(), Stat::HitByPitch, 1);
            let mut text = format!("{} is hit by a pitch.", batter.name());
            let scored = force(&mut o.delta.bases, batter.id());
            ab.score_runs(&mut o, &scored, true, &mut text);
            o.kind_of("hit_by_pitch").text(text)
        }
    }
}

fn o_count(o: &Outcome) -> String {
    format!("({}-{})", o.delta.balls, o.delta.strikes)
}

/// Batter to first, forcing runners ahead. Returns runners forced home.
fn force(bases: &mut [Option<PlayerId>; 3], batter: PlayerId) -> Vec<PlayerId> {
    let mut scored = Vec::new();
    if bases[0].is_some() {
        if bases[1].is_some() {
            if let Some(r) = bases[2] {
                scored.push(r);
            }
            bases[2] = bases[1];
        }
        bases[1] = bases[0];
    }
    bases[0] = Some(batter);
    scored
}

/// Every runner moves up one base. Returns the runner from third.
fn advance_one(bases: &mut [Option<PlayerId>; 3]) -> Vec<PlayerId> {
    let scored: Vec<PlayerId> = bases[2].into_iter().collect();
    bases[2] = bases[1];
    bases[1] = bases[0];
    bases[0] = None;
    scored
}

fn in_play(ab: &AtBat<'_, '_>, mut o: Outcome, rng: &mut GameRng) -> Outcome {
    let ctx = ab.ctx;
    let (off, def, range) = (ab.off, ab.def, ctx.range());
    let f = ctx.factors();
    let batter = ab.batter;
    let contact = batter.skill(Rating::Contact, range);
    let power = batter.skill(Rating::Power, range);
    let stuff = ab.pitcher.map(|p| p.skill(Rating::Stuff, range)).unwrap_or(0.3);
    let defense = ctx.def_team().mean_skill(&[Infielder, Outfielder], Rating::Fielding, range);
    let hit_edge = (1.0 + 0.5 * (contact - stuff) + 0.3 * (0.5 - defense)).max(0.2) * ctx.tilt(off);

    let weights = [
        0.25,
        0.20,
        0.07,
        0.22 * hit_edge,
        0.065 * hit_edge * (0.7 + 0.6 * power),
        0.006 * hit_edge,
        0.04 * f.home_run * hit_edge * (0.4 + 1.2 * power),
        0.015 * f.error,
    ];
    let result = CONTACTS[rng.weighted_index(&weights)];
    let outs_before = o.delta.outs;
    let mut bases = o.delta.bases;
    let name = batter.name();
    let mut text;

    match result {
        Contact::Single | Contact::Double | Contact::Triple | Contact::HomeRun => {
            ab.finish_pa(&mut o, true);
            o.credit(off, batter.id(), Stat::Hits, 1);
            ab.credit_pitcher(&mut o, Stat::HitsAllowed, 1);
            let mut scored = Vec::new();
            let (kind, verb) = match result {
                Contact::Single => {
                    scored.extend(bases[2].take());
                    if let Some(r) = bases[1].take() {
                        if rng.chance(prob(0.6 * (0.5 + ab.speed(r)))) {
                            scored.push(r);
                        } else {
                            bases[2] = Some(r);
                        }
                    }
                    if let Some(r) = bases[0].take() {
                        if bases[2].is_none() && rng.chance(0.25) {
                            bases[2] = Some(r);
                        } else {
                            bases[1] = Some(r);
                        }
                    }
                    bases[0] = Some(batter.id());
                    ("single", "singles")
                }
                Contact::Double => {
                    o.credit(off, batter.id(), Stat::Doubles, 1);
                    scored.extend(bases[2].take());
                    scored.extend(bases[1].take());
                    if let Some(r) = bases[0].take() {
                        if rng.chance(prob(0.4 * (0.5 + ab.speed(r)))) {
                            scored.push(r);
                        } else {
                            bases[2] = Some(r);
                        }
                    }
                    bases[1] = Some(batter.id());
                    ("double", "doubles")
                }
                Contact::Triple => {
                    o.credit(off, batter.id(), Stat::Triples, 1);
                    scored.extend(bases.iter_mut().rev().filter_map(|b| b.take()));
                    bases[2] = Some(batter.id());
                    ("triple", "triples")
                }
                _ => {
                    o.credit(off, batter.id(), Stat::HomeRuns, 1);
                    ab.credit_pitcher(&mut o, Stat::HomeRunsAllowed, 1);
                    scored.extend(bases.iter_mut().rev().filter_map(|b| b.take()));
                    scored.push(batter.id());
                    ("home_run", "homers")
                }
            };
            text = format!("{name} {verb}.");
            ab.score_runs(&mut o, &scored, true, &mut text);
            o.delta.bases = bases;
            return o.kind_of(kind).text(text);
        }
        Contact::Error => {
            ab.finish_pa(&mut o, true);
            let fielders = ctx.def_team().candidates(&[Infielder, Outfielder]);
            let fielder = if fielders.is_empty() {
                None
            } else {
                fielders.get(rng.next_u64_below(fielders.len() as u64) as usize).copied()
            };
            text = match fielder {
                Some(fl) => {
                    o.credit(def, fl.id(), Stat::Errors, 1);
                    format!("{name} reaches on an error by {}.", fl.name())
                }
                None => format!("{name} reaches on an error."),
            };
            let scored = advance_one(&mut bases);
            bases[0] = Some(batter.id());
            ab.score_runs(&mut o, &scored, false, &mut text);
            o.delta.bases = bases;
            return o.kind_of("error").text(text);
        }
        Contact::GroundOut => {
            if bases[0].is_some() && outs_before < 2 && rng.chance(0.45) {
                ab.finish_pa(&mut o, true);
                ab.record_outs(&mut o, 2);
                ab.credit_pitcher(&mut o, Stat::DoublePlays, 1);
                bases[0] = None;
                text = format!("{name} grounds into a double play.");
                if o.delta.outs < 3 {
                    let scored: Vec<PlayerId> = bases[2].take().into_iter().collect();
                    bases[2] = bases[1].take();
                    ab.score_runs(&mut o, &scored, false, &mut text);
                }
                o.delta.bases = bases;
                return o.kind_of("double_play").text(text);
            }
            ab.finish_pa(&mut o, true);
            ab.record_outs(&mut o, 1);
            text = format!("{name} grounds out.");
            if o.delta.outs < 3 {
                let scored = advance_one(&mut bases);
                ab.score_runs(&mut o, &scored, true, &mut text);
            }
            o.delta.bases = bases;
            o.kind_of("ground_out").text(text)
        }
        Contact::FlyOut => {
            if outs_before < 2 && bases[2].is_some() && rng.chance(0.6) {
                ab.finish_pa(&mut o, false);
                ab.record_outs(&mut o, 1);
                o.credit(off, batter.id(), Stat::SacrificeFlies, 1);
                text = format!("{name} hits a sacrifice fly.");
                let scored: Vec<PlayerId> = bases[2].take().into_iter().collect();
                ab.score_runs(&mut o, &scored, true, &mut text);
                o.delta.bases = bases;
                return o.kind_of("sacrifice_fly").text(text);
            }
            ab.finish_pa(&mut o, true);
            ab.record_outs(&mut o, 1);
            o.kind_of("fly_out").text(format!("{name} flies out."))
        }
        Contact::LineOut => {
            ab.finish_pa(&mut o, true);
            ab.record_outs(&mut o, 1);
            o.kind_of("line_out").text(format!("{name} lines out."))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_forces_only_when_bases_behind_are_full() {
        let mut bases = [None, Some(7), None];
        assert!(force(&mut bases, 1).is_empty());
        assert_eq!(bases, [Some(1), Some(7), None]);

        let mut loaded = [Some(1), Some(2), Some(3)];
        assert_eq!(force(&mut loaded, 4), vec![3]);
        assert_eq!(loaded, [Some(4), Some(1), Some(2)]);
    }

    #[test]
    fn injured_runner_gives_way_to_a_pinch_runner() {
        use crate::fixtures::demo_team;

        let range = RatingRange::default();
        let home = demo_team(SportKind::Baseball, "HOM", "Home", 1);
        let away = demo_team(SportKind::Baseball, "AWY", "Away", 2);
        let mut teams = [
            TeamGameState::from_snapshot(Side::Home, &home),
            TeamGameState::from_snapshot(Side::Away, &away),
        ];
        let mut state = GameState::<Baseball>::new(&teams, range);
        state.possession = Side::Away;
        let runner = state.situation.lineups[Side::Away.index()][3];
        state.situation.bases = [None, Some(runner), None];
        teams[Side::Away.index()].find_mut(runner).unwrap().injured = true;

        let notices = Baseball::prepare(&mut state, &mut teams, range);

        let sit = &state.situation;
        let pinch = sit.bases[1].expect("second base still occupied");
        assert_ne!(pinch, runner);
        let away = &teams[Side::Away.index()];
        assert!(away.find(pinch).unwrap().available());
        assert_eq!(sit.lineups[Side::Away.index()][3], pinch);
        assert!(!sit.lineups[Side::Away.index()].contains(&runner));
        assert!(notices.iter().any(|n| n.kind == kind::SUBSTITUTION));
        let idx = away.players.iter().position(|p| p.id() == runner).unwrap();
        assert!(!away.on_field.contains(&idx));
    }

    #[test]
    fn advance_one_scores_runner_from_third() {
        let mut bases = [Some(1), None, Some(3)];
        assert_eq!(advance_one(&mut bases), vec![3]);
        assert_eq!(bases, [None, Some(1), None]);
    }
}
