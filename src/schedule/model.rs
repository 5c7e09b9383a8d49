use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("invalid JSON at line {line}, column {column}: {message}")]
    InvalidJson {
        line: usize,
        column: usize,
        message: String,
    },
    #[error("malformed timestamp '{value}', expected ISO-8601 UTC with trailing Z")]
    MalformedTimestamp { value: String },
}

/// One upcoming world-boss spawn, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldBossSpawn {
    pub start: DateTime<Utc>,
    pub boss: String,
}

/// The current view of the schedule feed. Replaced wholesale on each
/// successful fetch; the lists keep the feed's own (ascending) order.
#[derive(Debug, Clone, Default)]
pub struct ScheduleSnapshot {
    pub helltide: Vec<DateTime<Utc>>,
    pub legion: Vec<DateTime<Utc>>,
    pub world_boss: Vec<WorldBossSpawn>,
    pub skipped_records: usize,
}

/// Parse a `startTime` value from the feed. The helltide/legion lists use the
/// bare `...Z` form, the world-boss list carries fractional seconds.
pub fn parse_event_time(input: &str) -> Result<DateTime<Utc>, ScheduleError> {
    NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%SZ")
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.fZ"))
        .map(|naive| naive.and_utc())
        .map_err(|_| ScheduleError::MalformedTimestamp {
            value: input.to_string(),
        })
}

pub fn parse_schedule_text(content: &str) -> Result<ScheduleSnapshot, ScheduleError> {
    let raw =
        serde_json::from_str::<ScheduleFile>(content).map_err(|err| ScheduleError::InvalidJson {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        })?;

    let mut skipped_records = 0usize;
    let helltide = collect_start_times(raw.helltide, &mut skipped_records);
    let legion = collect_start_times(raw.legion, &mut skipped_records);

    let mut world_boss = Vec::with_capacity(raw.world_boss.len());
    for record in raw.world_boss {
        match parse_event_time(&record.start_time) {
            Ok(start) => world_boss.push(WorldBossSpawn {
                start,
                boss: record.boss,
            }),
            Err(_) => skipped_records += 1,
        }
    }

    Ok(ScheduleSnapshot {
        helltide,
        legion,
        world_boss,
        skipped_records,
    })
}

fn collect_start_times(records: Vec<EventRecordFile>, skipped: &mut usize) -> Vec<DateTime<Utc>> {
    let mut times = Vec::with_capacity(records.len());
    for record in records {
        match parse_event_time(&record.start_time) {
            Ok(time) => times.push(time),
            Err(_) => *skipped += 1,
        }
    }
    times
}

#[derive(Debug, Deserialize)]
struct ScheduleFile {
    #[serde(default)]
    helltide: Vec<EventRecordFile>,
    #[serde(default)]
    legion: Vec<EventRecordFile>,
    #[serde(default)]
    world_boss: Vec<BossRecordFile>,
}

#[derive(Debug, Deserialize)]
struct EventRecordFile {
    #[serde(rename = "startTime")]
    start_time: String,
}

#[derive(Debug, Deserialize)]
struct BossRecordFile {
    #[serde(rename = "startTime")]
    start_time: String,
    boss: String,
}
