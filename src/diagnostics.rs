use chrono::{DateTime, Utc};

use crate::schedule::evaluator::{
    CycleWindow, format_countdown, next_cycle_event, next_world_boss, remaining,
};
use crate::schedule::ScheduleSnapshot;

/// Headless counterpart of one overlay tick: evaluate every category once and
/// print the result. Used by `--diagnostics` and the CLI tests.
pub fn run_diagnostics(snapshot: &ScheduleSnapshot, now: DateTime<Utc>) {
    println!("d4timers diagnostics");
    println!(
        "Evaluated at: {}",
        now.format("%Y-%m-%dT%H:%M:%SZ")
    );
    println!(
        "Schedule entries: {} helltide, {} legion, {} world boss",
        snapshot.helltide.len(),
        snapshot.legion.len(),
        snapshot.world_boss.len()
    );
    if snapshot.skipped_records > 0 {
        println!(
            "Skipped {} malformed record(s)",
            snapshot.skipped_records
        );
    }

    print_cycle("Helltide", &snapshot.helltide, now, CycleWindow::helltide());
    print_cycle("Legion", &snapshot.legion, now, CycleWindow::legion());

    match next_world_boss(&snapshot.world_boss, now) {
        Some(spawn) => println!(
            "World boss: {} spawns in {}",
            spawn.boss,
            format_countdown(spawn.start - now)
        ),
        None => println!("World boss: schedule exhausted, refetch required"),
    }
}

fn print_cycle(label: &str, starts: &[DateTime<Utc>], now: DateTime<Utc>, window: CycleWindow) {
    match next_cycle_event(starts, now, window) {
        Some(hit) => {
            let countdown = format_countdown(remaining(hit, now, window));
            if hit.active {
                println!("{label}: active, {countdown} remaining");
            } else {
                println!("{label}: upcoming, starts in {countdown}");
            }
        }
        None => println!("{label}: no event in window"),
    }
}
