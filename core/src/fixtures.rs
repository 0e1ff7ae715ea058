//! Deterministic demo rosters.
//!
//! Used by the runner and the tests. Same seed = same roster, names
//! included.

use crate::{
    rng::{GameRng, SeedBank, StreamSlot},
    snapshot::{Position, Rating, RatingsSnapshot, TeamSnapshot},
    types::SportKind,
};
use std::collections::HashSet;
use Position::*;
use Rating::*;

pub struct NameGenerator;

impl NameGenerator {
    pub fn full_name(rng: &mut GameRng) -> String {
        format!("{} {}", Self::pick(rng, FIRST_NAMES), Self::pick(rng, LAST_NAMES))
    }

    /// A name not yet in `taken`, which it is then added to. Rosters are
    /// far smaller than the name space, so redraws stay rare.
    pub fn unique_name(rng: &mut GameRng, taken: &mut HashSet<String>) -> String {
        loop {
            let name = Self::full_name(rng);
            if taken.insert(name.clone()) {
                return name;
            }
        }
    }

    fn pick(rng: &mut GameRng, names: &'static [&'static str]) -> &'static str {
        names[rng.next_u64_below(names.len() as u64) as usize]
    }
}

const FIRST_NAMES: &[&str] = &[
    "Marcus", "Devin", "Luka", "Tariq", "Owen", "Mateo", "Isaiah", "Caleb", "Jalen", "Nikola",
    "Andre", "Reggie", "Travis", "Darius", "Hunter", "Kenji", "Rafael", "Emeka", "Colby",
    "Brooks", "Quentin", "Sami", "Malik", "Elias", "Viktor", "Dante", "Trey", "Wes", "Omar",
    "Cody", "Felix", "Jonah", "Ty", "Rowan", "Amari", "Bo", "Gideon", "Xavier", "Lonnie",
    "Pascal",
];

const LAST_NAMES: &[&str] = &[
    "Okafor", "Lindqvist", "Barnes", "Castillo", "Whitfield", "Nakamura", "Pruitt", "Adeyemi",
    "Kowalski", "Renner", "Holloway", "Duarte", "Fitzgerald", "Marchetti", "Greer", "Ivanov",
    "Sutton", "Abernathy", "Baptiste", "Calloway", "Drummond", "Espinoza", "Farrow", "Gallo",
    "Haskins", "Iwu", "Jankowski", "Kaminski", "Lacroix", "Mbeki", "Novak", "Ortega", "Pryce",
    "Quarles", "Rasmussen", "Strand", "Toivonen", "Underwood", "Valdez", "Whitaker",
];

/// Position counts for a full demo roster.
fn depth_chart(sport: SportKind) -> &'static [(Position, usize)] {
    match sport {
        SportKind::Basketball => &[(Guard, 5), (Forward, 5), (Center, 3)],
        SportKind::Football => &[
            (Quarterback, 2),
            (RunningBack, 3),
            (WideReceiver, 5),
            (TightEnd, 2),
            (OffensiveLine, 8),
            (DefensiveLine, 6),
            (Linebacker, 5),
            (DefensiveBack, 7),
            (Kicker, 1),
            (Punter, 1),
        ],
        SportKind::Hockey => &[(Center, 4), (Winger, 8), (Defenseman, 6), (Goalie, 2)],
        SportKind::Baseball => &[
            (Pitcher, 9),
            (Catcher, 2),
            (Infielder, 6),
            (Outfielder, 5),
            (DesignatedHitter, 1),
        ],
    }
}

/// Ratings a player at `position` carries in `sport`.
fn rating_keys(sport: SportKind, position: Position) -> &'static [Rating] {
    match (sport, position) {
        (SportKind::Basketball, _) => &[
            Speed, Endurance, Passing, Defense, InsideScoring, MidRange, ThreePoint, FreeThrow,
            Rebounding, BallHandling, Blocking,
        ],
        (_, Quarterback) => &[Speed, Endurance, ThrowAccuracy, ThrowPower, Elusiveness],
        (_, RunningBack) => &[Speed, Strength, Endurance, Elusiveness, Catching],
        (_, WideReceiver) | (_, TightEnd) => &[Speed, Endurance, Catching, Elusiveness, RunBlocking],
        (_, OffensiveLine) => &[Strength, Endurance, RunBlocking, PassBlocking],
        (_, DefensiveLine) | (_, Linebacker) => {
            &[Speed, Strength, Endurance, PassRush, RunStopping, Tackling, Coverage]
        }
        (_, DefensiveBack) => &[Speed, Endurance, Coverage, Tackling, Catching],
        (_, Kicker) | (_, Punter) => &[KickPower, KickAccuracy, Endurance],
        (_, Goalie) => &[Goalkeeping, Endurance, Speed],
        (SportKind::Hockey, _) => {
            &[Speed, Strength, Endurance, Passing, Defense, Shooting, Stickhandling, Checking, Faceoffs]
        }
        (_, Pitcher) => &[Control, Stuff, Endurance, Fielding, Arm],
        _ => &[Contact, Power, Eye, Speed, Fielding, Arm, Endurance],
    }
}

/// A full roster for `sport`. Two calls with the same seed produce
/// identical ratings, which makes evenly matched opponents easy.
pub fn demo_team(sport: SportKind, team_id: &str, name: &str, seed: u64) -> TeamSnapshot {
    let mut rng = SeedBank::new(seed).rng(StreamSlot::Fixture);
    let mut players = Vec::new();
    let mut taken = HashSet::new();
    for &(position, count) in depth_chart(sport) {
        for _ in 0..count {
            let id = players.len() as u32 + 1;
            let name = NameGenerator::unique_name(&mut rng, &mut taken);
            let mut player = RatingsSnapshot::new(id, name, position);
            for &rating in rating_keys(sport, position) {
                let value = rng.normal(62.0, 10.0).clamp(30.0, 95.0).round();
                player = player.with_rating(rating, value);
            }
            players.push(player);
        }
    }
    TeamSnapshot { team_id: team_id.to_string(), name: name.to_string(), players }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sport::{Baseball, Basketball, Football, Hockey, Sport};

    #[test]
    fn demo_rosters_satisfy_requirements() {
        let checks = [
            (SportKind::Basketball, Basketball::requirements()),
            (SportKind::Football, Football::requirements()),
            (SportKind::Hockey, Hockey::requirements()),
            (SportKind::Baseball, Baseball::requirements()),
        ];
        for (sport, requirements) in checks {
            let team = demo_team(sport, "T", "Team", 11);
            assert_eq!(team.check(&requirements), Ok(()), "{sport}");
        }
    }

    #[test]
    fn names_are_unique_within_a_roster() {
        for sport in SportKind::ALL {
            for seed in [101, 202, 42] {
                let team = demo_team(sport, "T", "Team", seed);
                let names: HashSet<&str> = team.players.iter().map(|p| p.name.as_str()).collect();
                assert_eq!(names.len(), team.players.len(), "{sport} seed {seed}");
            }
        }
    }

    #[test]
    fn same_seed_same_roster() {
        let a = demo_team(SportKind::Hockey, "A", "A", 5);
        let b = demo_team(SportKind::Hockey, "B", "B", 5);
        assert_eq!(a.players, b.players);
        assert_ne!(a.players, demo_team(SportKind::Hockey, "A", "A", 6).players);
    }
}
