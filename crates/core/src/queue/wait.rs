//! Wait-time estimation and formatting

use chrono::{DateTime, Utc};

use crate::agent::RunningAgentInfo;
use crate::{Error, Result};

const MINUTE_MS: i64 = 60_000;

/// Human-readable form of a wait duration in milliseconds
pub fn format_wait(ms: i64) -> Result<String> {
    if ms < 0 {
        return Err(Error::invalid_input(format!(
            "wait duration must not be negative, got {}ms",
            ms
        )));
    }
    if ms < MINUTE_MS {
        return Ok("Less than a minute".to_string());
    }

    let minutes = ms / MINUTE_MS + i64::from(ms % MINUTE_MS != 0);
    if minutes == 1 {
        return Ok("About 1 minute".to_string());
    }
    if minutes < 60 {
        return Ok(format!("About {} minutes", minutes));
    }

    let hours = minutes / 60;
    if hours > 1 {
        Ok(format!("About {} hours", hours))
    } else {
        Ok(format!("About {} hour", hours))
    }
}

/// Timing derived from one running agent's pace so far
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AgentPace {
    remaining_ms: i64,
    total_ms: i64,
}

impl AgentPace {
    /// `None` until the agent has finished at least one turn
    fn observe(agent: &RunningAgentInfo, now: DateTime<Utc>) -> Option<Self> {
        let turn = i64::from(agent.display_turn());
        if turn == 0 {
            return None;
        }
        let max_turns = i64::from(agent.max_turns);
        let elapsed = agent.elapsed_ms(now);

        Some(Self {
            remaining_ms: elapsed.saturating_mul(max_turns - turn) / turn,
            total_ms: elapsed.saturating_mul(max_turns) / turn,
        })
    }
}

/// Estimated milliseconds until the task at `position` gets a slot.
///
/// Each running agent that has completed a turn contributes its pace:
/// `remaining = elapsed / turn * (max - turn)` and
/// `total = elapsed / turn * max`. With `k` such agents sorted by remaining
/// time, position `p` waits for the `((p - 1) % k)`-th slot to free plus
/// `(p - 1) / k` average full runs ahead of it.
///
/// Returns `None` when no agent has a measurable pace or `position` is 0.
pub fn estimate_wait_ms(
    position: u32,
    agents: &[RunningAgentInfo],
    now: DateTime<Utc>,
) -> Option<i64> {
    if position == 0 {
        return None;
    }

    let mut paces: Vec<AgentPace> = agents
        .iter()
        .filter_map(|agent| AgentPace::observe(agent, now))
        .collect();
    if paces.is_empty() {
        return None;
    }
    paces.sort_by_key(|pace| pace.remaining_ms);

    let slots = paces.len() as i64;
    let total_sum: i128 = paces.iter().map(|pace| i128::from(pace.total_ms)).sum();
    // mean of i64 values always fits back into i64
    let average_total = (total_sum / i128::from(slots)) as i64;

    let ahead = i64::from(position - 1);
    let slot = (ahead % slots) as usize;
    let rounds = ahead / slots;

    Some(
        paces[slot]
            .remaining_ms
            .saturating_add(rounds.saturating_mul(average_total)),
    )
}
