//! Python bindings. Views cross the boundary as JSON strings in the same
//! camelCase shape the hosts already store.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use serde::Serialize;

use crate::config::EngineConfig;
use crate::entry::validate_rankings;
use crate::error::PoolError;
use crate::pool::Pool;
use crate::team::{Conference, Teams};
use crate::topology::Round;

fn value_error(err: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn to_json<T: Serialize>(value: &T) -> PyResult<String> {
    serde_json::to_string(value).map_err(|e| value_error(PoolError::from(e)))
}

/// Pool snapshot held on the Rust side.
#[pyclass(name = "Pool")]
pub struct PyPool {
    pool: Pool,
    config: EngineConfig,
}

#[pymethods]
impl PyPool {
    /// Build from a `{teams, results, entries}` JSON snapshot and an optional
    /// TOML engine config.
    #[new]
    #[pyo3(signature = (snapshot, config = None))]
    pub fn new(snapshot: &str, config: Option<&str>) -> PyResult<Self> {
        let pool = Pool::from_json(snapshot).map_err(value_error)?;
        let config = match config {
            Some(toml) => EngineConfig::from_toml(toml).map_err(value_error)?,
            None => EngineConfig::default(),
        };
        Ok(PyPool { pool, config })
    }

    pub fn snapshot(&self) -> PyResult<String> {
        self.pool.to_json().map_err(value_error)
    }

    pub fn bracket(&self) -> PyResult<String> {
        to_json(&self.pool.bracket())
    }

    pub fn anomalies(&self) -> PyResult<String> {
        to_json(&self.pool.anomalies())
    }

    pub fn leaderboard(&self) -> PyResult<String> {
        to_json(&self.pool.leaderboard(&self.config))
    }

    pub fn projections(&self) -> PyResult<String> {
        to_json(&self.pool.projections(&self.config))
    }

    pub fn score_updates(&self) -> PyResult<String> {
        to_json(&self.pool.score_updates())
    }

    pub fn score(&self, name: &str) -> Option<u32> {
        self.pool.score(name)
    }

    /// Picks of one participant, or `None` if they have no entry.
    pub fn picks(&self, name: &str) -> PyResult<Option<String>> {
        self.pool.picks(name).map(|p| to_json(&p)).transpose()
    }

    /// Record a game winner. `conference` is ignored for the final.
    #[pyo3(signature = (round, matchup_id, winner, conference = None, completed_at = None))]
    pub fn record_winner(
        &mut self,
        round: &str,
        matchup_id: &str,
        winner: &str,
        conference: Option<&str>,
        completed_at: Option<String>,
    ) -> PyResult<()> {
        let (round, conference) = locate(round, conference)?;
        self.pool
            .results
            .record_winner(round, conference, matchup_id, winner, completed_at);
        Ok(())
    }

    #[pyo3(signature = (round, matchup_id, conference = None))]
    pub fn clear_winner(&mut self, round: &str, matchup_id: &str, conference: Option<&str>) -> PyResult<()> {
        let (round, conference) = locate(round, conference)?;
        self.pool.results.clear_winner(round, conference, matchup_id);
        Ok(())
    }
}

fn locate(round: &str, conference: Option<&str>) -> PyResult<(Round, Conference)> {
    let round = Round::from_key(round).ok_or_else(|| value_error(format!("unknown round {}", round)))?;
    let conference = match conference {
        Some(key) => Conference::from_key(key).ok_or_else(|| value_error(format!("unknown conference {}", key)))?,
        None if !round.is_conference_round() => Conference::Afc,
        None => return Err(value_error(format!("{} needs a conference", round.label()))),
    };
    Ok((round, conference))
}

/// Check a submission. Returns `None` when valid, otherwise the reason.
#[pyfunction]
#[pyo3(name = "validate_rankings")]
pub fn py_validate_rankings(rankings: &str, teams: &str) -> PyResult<Option<String>> {
    let rankings = serde_json::from_str(rankings).map_err(value_error)?;
    let teams: Teams = serde_json::from_str(teams).map_err(value_error)?;
    Ok(validate_rankings(&rankings, &teams).err().map(|e| e.to_string()))
}
