//! sportsim-core: deterministic play-by-play simulation for basketball,
//! football, hockey and baseball.
//!
//! RULE: the core loop does no I/O. Persistence lives behind `store`,
//! threads live in `bulk` and `viewer`.

pub mod box_score;
pub mod bulk;
pub mod clock;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod finalizer;
pub mod fixtures;
pub mod lineup;
pub mod live;
pub mod outcome;
pub mod play_log;
pub mod player;
pub mod resolver;
pub mod rng;
pub mod snapshot;
pub mod sport;
pub mod stats;
pub mod store;
pub mod types;
pub mod viewer;

pub use engine::simulate_game;
