use chrono::{DateTime, Duration, Utc};

use crate::schedule::model::{ScheduleSnapshot, WorldBossSpawn};

/// Timing parameters for one event category.
#[derive(Debug, Clone, Copy)]
pub struct CycleWindow {
    /// How long an event stays active after its start.
    pub active: Duration,
    /// How far before start the event is reported as upcoming.
    /// `None` means any future start counts.
    pub lead: Option<Duration>,
    /// Offset added to the start when computing the remaining time of an
    /// active event.
    pub display: Duration,
}

impl CycleWindow {
    pub fn helltide() -> Self {
        Self {
            active: Duration::hours(1),
            lead: Some(Duration::hours(2) + Duration::minutes(15)),
            display: Duration::hours(1),
        }
    }

    /// Legion detects "active" over a 3-minute window but displays the active
    /// countdown against a 25-minute offset. The upstream feed consumer has
    /// always behaved this way; keep both constants as-is.
    pub fn legion() -> Self {
        Self {
            active: Duration::minutes(3),
            lead: None,
            display: Duration::minutes(25),
        }
    }
}

/// The single relevant event found for a category, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleHit {
    pub start: DateTime<Utc>,
    pub active: bool,
}

/// Linear scan over start times in given order, first match wins. Active on
/// `[start, start + active)`, upcoming on `[start - lead, start)`. Entries
/// whose windows have fully passed are skipped silently.
pub fn next_cycle_event(
    starts: &[DateTime<Utc>],
    now: DateTime<Utc>,
    window: CycleWindow,
) -> Option<CycleHit> {
    for &start in starts {
        if start <= now && now < start + window.active {
            return Some(CycleHit {
                start,
                active: true,
            });
        }
        let upcoming = match window.lead {
            Some(lead) => start - lead <= now && now < start,
            None => now < start,
        };
        if upcoming {
            return Some(CycleHit {
                start,
                active: false,
            });
        }
    }
    None
}

/// First spawn strictly in the future. `None` means the local list is
/// exhausted and the caller should request a fresh snapshot.
pub fn next_world_boss(spawns: &[WorldBossSpawn], now: DateTime<Utc>) -> Option<&WorldBossSpawn> {
    spawns.iter().find(|spawn| spawn.start > now)
}

/// Remaining time to display for a hit: time to end (via the display offset)
/// when active, time to start when upcoming.
pub fn remaining(hit: CycleHit, now: DateTime<Utc>, window: CycleWindow) -> Duration {
    if hit.active {
        hit.start + window.display - now
    } else {
        hit.start - now
    }
}

/// Non-negative `H:MM:SS`, rounded to whole seconds. Hours are not padded.
pub fn format_countdown(delta: Duration) -> String {
    let millis = delta.num_milliseconds().max(0);
    let total_secs = (millis as f64 / 1000.0).round() as i64;
    format!(
        "{}:{:02}:{:02}",
        total_secs / 3600,
        total_secs % 3600 / 60,
        total_secs % 60
    )
}

/// The five strings the overlay renders each tick, plus the signal that the
/// world-boss list ran out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayText {
    pub helltide: Option<String>,
    pub legion: Option<String>,
    pub boss_name: Option<String>,
    pub boss_countdown: Option<String>,
    pub world_boss_exhausted: bool,
}

pub fn overlay_text(snapshot: &ScheduleSnapshot, now: DateTime<Utc>) -> OverlayText {
    let helltide = cycle_line(
        &snapshot.helltide,
        now,
        CycleWindow::helltide(),
        "Helltide Active",
        "Until Next Helltide",
    );
    let legion = cycle_line(
        &snapshot.legion,
        now,
        CycleWindow::legion(),
        "Legion Active",
        "Until Next Legion",
    );
    let boss = next_world_boss(&snapshot.world_boss, now);

    OverlayText {
        helltide,
        legion,
        boss_name: boss.map(|spawn| spawn.boss.clone()),
        boss_countdown: boss
            .map(|spawn| format!("Spawns in: {}", format_countdown(spawn.start - now))),
        world_boss_exhausted: boss.is_none(),
    }
}

fn cycle_line(
    starts: &[DateTime<Utc>],
    now: DateTime<Utc>,
    window: CycleWindow,
    active_label: &str,
    upcoming_label: &str,
) -> Option<String> {
    next_cycle_event(starts, now, window).map(|hit| {
        let countdown = format_countdown(remaining(hit, now, window));
        if hit.active {
            format!("{active_label}: {countdown}")
        } else {
            format!("{upcoming_label}: {countdown}")
        }
    })
}
