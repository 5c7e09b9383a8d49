use std::sync::mpsc::{Receiver, TryRecvError, channel};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Utc;
use eframe::egui::{self, Color32, RichText};

use crate::fetch::{FetchError, ScheduleClient};
use crate::schedule::ScheduleSnapshot;
use crate::schedule::evaluator::{OverlayText, overlay_text};

const WINDOW_SIZE: [f32; 2] = [230.0, 170.0];
const START_POSITION: [f32; 2] = [100.0, 100.0];

const TEXT_MAIN: Color32 = Color32::WHITE;
const TEXT_LEGION: Color32 = Color32::from_rgb(227, 207, 87);
const TEXT_BOSS: Color32 = Color32::from_rgb(232, 72, 72);

pub fn run_overlay(
    client: ScheduleClient,
    snapshot: ScheduleSnapshot,
    tick: Duration,
    opacity: f32,
) -> Result<()> {
    let native_options = eframe::NativeOptions {
        vsync: false,
        viewport: egui::ViewportBuilder::default()
            .with_title("Helltide Timer")
            .with_inner_size(WINDOW_SIZE)
            .with_position(START_POSITION)
            .with_decorations(false)
            .with_transparent(true)
            .with_always_on_top()
            .with_resizable(false),
        ..Default::default()
    };

    let app = OverlayApp::new(client, snapshot, tick, opacity);
    eframe::run_native(
        "Helltide Timer",
        native_options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|err| anyhow::anyhow!("failed to launch overlay: {err}"))?;

    Ok(())
}

struct OverlayApp {
    client: ScheduleClient,
    snapshot: ScheduleSnapshot,
    text: OverlayText,
    tick: Duration,
    next_tick: Instant,
    opacity: f32,
    pending_fetch: Option<Receiver<Result<ScheduleSnapshot, FetchError>>>,
}

impl OverlayApp {
    fn new(
        client: ScheduleClient,
        snapshot: ScheduleSnapshot,
        tick: Duration,
        opacity: f32,
    ) -> Self {
        let text = overlay_text(&snapshot, Utc::now());
        Self {
            client,
            snapshot,
            text,
            tick,
            next_tick: Instant::now() + tick,
            opacity,
            pending_fetch: None,
        }
    }

    /// One evaluation pass against fresh wall-clock time. When the local
    /// world-boss list is exhausted, kick off a refetch unless one is already
    /// in flight.
    fn refresh(&mut self) {
        self.text = overlay_text(&self.snapshot, Utc::now());
        if self.text.world_boss_exhausted && self.pending_fetch.is_none() {
            self.spawn_refetch();
        }
    }

    fn spawn_refetch(&mut self) {
        let (tx, rx) = channel();
        let client = self.client.clone();
        thread::spawn(move || {
            let _ = tx.send(client.fetch());
        });
        self.pending_fetch = Some(rx);
    }

    /// Collect a finished refetch, if any. Only the world-boss list is
    /// replaced; helltide/legion state stays as-is. A failed fetch leaves the
    /// prior snapshot in place.
    fn poll_refetch(&mut self) {
        let Some(rx) = &self.pending_fetch else {
            return;
        };
        match rx.try_recv() {
            Ok(Ok(fresh)) => {
                self.snapshot.world_boss = fresh.world_boss;
                self.pending_fetch = None;
            }
            Ok(Err(err)) => {
                eprintln!("world boss refetch failed: {err}");
                self.pending_fetch = None;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.pending_fetch = None;
            }
        }
    }

    fn show_labels(&self, ui: &mut egui::Ui) {
        ui.label(styled(self.text.helltide.as_deref().unwrap_or(""), TEXT_MAIN));
        ui.label(styled(self.text.legion.as_deref().unwrap_or(""), TEXT_LEGION));
        ui.label(styled("Next World Boss:", TEXT_MAIN));
        ui.label(styled(self.text.boss_name.as_deref().unwrap_or(""), TEXT_BOSS));
        ui.label(styled(
            self.text.boss_countdown.as_deref().unwrap_or(""),
            TEXT_MAIN,
        ));
    }
}

fn styled(text: &str, color: Color32) -> RichText {
    RichText::new(text).size(15.0).strong().color(color)
}

impl eframe::App for OverlayApp {
    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        // Fully transparent; the panel frame paints the tinted background.
        [0.0, 0.0, 0.0, 0.0]
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_refetch();

        let now = Instant::now();
        if now >= self.next_tick {
            self.refresh();
            while self.next_tick <= now {
                self.next_tick += self.tick;
            }
        }

        if ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::Q)) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        let alpha = (self.opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        let background = Color32::from_black_alpha(alpha);
        egui::CentralPanel::default()
            .frame(
                egui::Frame::NONE
                    .fill(background)
                    .inner_margin(egui::Margin::same(10)),
            )
            .show(ctx, |ui| {
                self.show_labels(ui);

                let drag = ui.interact(
                    ui.max_rect(),
                    egui::Id::new("overlay_drag"),
                    egui::Sense::drag(),
                );
                if drag.drag_started() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::StartDrag);
                }
            });

        ctx.request_repaint_after(self.next_tick.saturating_duration_since(Instant::now()));
    }
}
