//! Pool Core - bracket progression, scoring and ranking for NFL playoff
//! confidence pools.
//!
//! Hosts hand the engine a snapshot of rosters, recorded results and entries;
//! every view (bracket, leaderboard, projections) is derived from it. Python
//! bindings are available behind the `python` feature.

pub mod config;
pub mod constants;
pub mod entry;
pub mod error;
pub mod pool;
pub mod projection;
pub mod ranking;
pub mod resolver;
pub mod results;
pub mod scoring;
pub mod team;
pub mod topology;

#[cfg(feature = "python")]
mod python;

pub use config::EngineConfig;
pub use entry::{pick_breakdown, validate_rankings, Entry, Pick, Rankings};
pub use error::{PoolError, RankingsError, Result};
pub use pool::{Pool, ScoreUpdate};
pub use projection::{best_case_scores, completions, max_achievable, project_pool, Projection};
pub use ranking::{build_leaderboard, rank_rows, Leaderboard, LeaderboardRow};
pub use resolver::{
    championship_matchup, conference_matchup, divisional_matchups, resolve_bracket, Anomaly,
    AnomalyKind, Bracket, Game,
};
pub use results::{GameResult, Results};
pub use scoring::{all_winners, max_possible, potential, score};
pub use team::{Conference, Team, Teams};
pub use topology::{wild_card_matchups, Matchup, Round, TeamRef};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Python module definition
#[cfg(feature = "python")]
#[pymodule]
fn pool_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Classes
    m.add_class::<python::PyPool>()?;

    // Functions
    m.add_function(wrap_pyfunction!(python::py_validate_rankings, m)?)?;

    // Constants
    m.add("TOTAL_TEAMS", constants::TOTAL_TEAMS)?;
    m.add("TEAMS_PER_CONFERENCE", constants::TEAMS_PER_CONFERENCE)?;

    Ok(())
}
