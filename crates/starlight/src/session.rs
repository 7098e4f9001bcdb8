//! One viewer's session: owns every piece of scene state and is the only place it
//! changes.
//!
//! The host drives the session with [`Session::tick`] once per frame and forwards
//! the single user action to [`Session::trigger`]. Timers live in a queue owned by
//! the session and advance on the same clock as the frame loop, so dropping or
//! tearing down the session cancels everything still pending.

use engine_core::{FrameClock, TimerQueue};
use procgen::StarField;
use renderer::{Camera, CameraUniform, PointCloudStreamer};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::config::SessionConfig;
use crate::flight::{CameraFlight, CameraPhase, FlightPlan};
use crate::interaction::{AnimationPhase, InteractionSequencer, PhaseStep};
use crate::ledger::{ClickedStar, StarLedger};
use crate::persistence::KeyValueStore;
use crate::planet::PlanetSpin;
use crate::surface::{RenderSurface, SceneFrame, SceneOverlay};

/// Payloads carried by the session's timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionTimer {
    StartFlight,
    RevealInteraction,
    EnterPhase(AnimationPhase),
}

/// Undrained events kept before the oldest are dropped.
pub const MAX_PENDING_EVENTS: usize = 256;

/// Notifications for the host, drained with [`Session::drain_events`].
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    CameraPhaseChanged(CameraPhase),
    /// The flight finished and the interaction control is now shown. Sent once.
    InteractionRevealed,
    AnimationPhaseChanged(AnimationPhase),
    StarPlaced(ClickedStar),
    /// Saving the ledger failed; the in-memory state is kept.
    PersistFailed(String),
}

pub struct Session<S: KeyValueStore, R: RenderSurface> {
    config: SessionConfig,
    clock: FrameClock,
    timers: TimerQueue<SessionTimer>,
    camera: Camera,
    flight: CameraFlight,
    planet: PlanetSpin,
    sequencer: InteractionSequencer,
    ledger: StarLedger,
    streamer: PointCloudStreamer,
    store: S,
    surface: R,
    interaction_visible: bool,
    events: Vec<SessionEvent>,
    torn_down: bool,
}

impl<S: KeyValueStore, R: RenderSurface> Session<S, R> {
    /// Load the ledger, generate the field for it and schedule the camera flight.
    pub fn new(config: SessionConfig, store: S, surface: R) -> Self {
        Self::with_sequencer(config, store, surface, InteractionSequencer::new())
    }

    pub fn with_sequencer(config: SessionConfig, store: S, surface: R, sequencer: InteractionSequencer) -> Self {
        let ledger = StarLedger::load(&store);

        let plan = FlightPlan {
            start: config.camera_start(),
            end: config.camera_end(),
            target: glam::Vec3::ZERO,
            duration: config.flight_duration(),
        };
        let camera = Camera::new(plan.pose_at(0.0));

        let mut streamer = PointCloudStreamer::new(config.stream_batch_size);
        streamer.replace(star_field_for(&ledger));

        let mut timers = TimerQueue::new();
        timers.schedule(config.flight_delay(), SessionTimer::StartFlight);

        log::info!(
            "Session started with {} star(s); flight in {:?}",
            ledger.generation_count(),
            config.flight_delay()
        );

        Self {
            planet: PlanetSpin::new(config.planet_rotation_rate),
            config,
            clock: FrameClock::new(),
            timers,
            camera,
            flight: CameraFlight::new(plan),
            sequencer,
            ledger,
            streamer,
            store,
            surface,
            interaction_visible: false,
            events: Vec::new(),
            torn_down: false,
        }
    }

    /// Advance one frame: fire due timers, spin the planet, sample the flight,
    /// stream the next batch of stars, and present.
    pub fn tick(&mut self, dt: Duration) {
        if self.torn_down {
            return;
        }
        self.clock.advance(dt);
        let now = self.clock.elapsed();

        while let Some(timer) = self.timers.poll(now) {
            self.dispatch(timer);
        }
        self.timers.advance_to(now);

        self.planet.update(self.clock.delta_seconds());

        if self.flight.tick(now, &mut self.camera) {
            self.emit(SessionEvent::CameraPhaseChanged(CameraPhase::Complete));
            self.timers.schedule(self.config.reveal_delay(), SessionTimer::RevealInteraction);
        }

        self.streamer.tick();
        self.present();
    }

    /// The user action. Returns true if it started the sequence; otherwise a no-op.
    pub fn trigger(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        if !self.interaction_visible {
            log::debug!("Interaction ignored: not revealed yet");
            return false;
        }
        match self.sequencer.trigger(&self.ledger) {
            Some(step) => {
                self.emit(SessionEvent::AnimationPhaseChanged(self.sequencer.phase()));
                self.schedule_phase(step);
                true
            }
            None => false,
        }
    }

    /// Cancel every pending timer and stop reacting to ticks and triggers.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        let cancelled = self.timers.cancel_all();
        self.torn_down = true;
        log::info!("Session torn down ({} timer(s) cancelled)", cancelled);
    }

    /// Take the events raised since the last call. Hosts should drain once per frame;
    /// past [`MAX_PENDING_EVENTS`] the oldest are discarded.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn camera_phase(&self) -> CameraPhase {
        self.flight.phase()
    }

    pub fn animation_phase(&self) -> AnimationPhase {
        self.sequencer.phase()
    }

    pub fn interaction_visible(&self) -> bool {
        self.interaction_visible
    }

    pub fn ledger(&self) -> &StarLedger {
        &self.ledger
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn streamer(&self) -> &PointCloudStreamer {
        &self.streamer
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn surface(&self) -> &R {
        &self.surface
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.elapsed()
    }

    fn dispatch(&mut self, timer: SessionTimer) {
        match timer {
            SessionTimer::StartFlight => {
                if self.flight.begin(self.timers.now(), &mut self.camera) {
                    self.emit(SessionEvent::CameraPhaseChanged(CameraPhase::Moving));
                }
            }
            SessionTimer::RevealInteraction => {
                if !self.interaction_visible {
                    self.interaction_visible = true;
                    log::info!("Interaction revealed");
                    self.emit(SessionEvent::InteractionRevealed);
                }
            }
            SessionTimer::EnterPhase(phase) => self.enter_phase(phase),
        }
    }

    fn emit(&mut self, event: SessionEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            let dropped = self.events.remove(0);
            log::warn!("Event queue full, dropping {:?}", dropped);
        }
        self.events.push(event);
    }

    fn enter_phase(&mut self, phase: AnimationPhase) {
        let Some(entered) = self.sequencer.enter(phase, &mut self.ledger, unix_millis()) else {
            return;
        };
        self.emit(SessionEvent::AnimationPhaseChanged(phase));

        if let Some(star) = entered.placed {
            self.persist();
            self.streamer.replace(star_field_for(&self.ledger));
            self.emit(SessionEvent::StarPlaced(star));
        }

        if let Some(step) = entered.next {
            self.schedule_phase(step);
        }
    }

    fn schedule_phase(&mut self, step: PhaseStep) {
        self.timers.schedule(step.after, SessionTimer::EnterPhase(step.phase));
    }

    fn persist(&mut self) {
        if let Err(e) = self.ledger.save(&mut self.store) {
            log::warn!("Failed to save placed star: {}", e);
            self.emit(SessionEvent::PersistFailed(e.to_string()));
        }
    }

    fn present(&mut self) {
        let stars_changed = self.streamer.take_dirty();
        let frame = SceneFrame {
            camera: self.camera.pose(),
            camera_uniform: CameraUniform::from(&self.camera),
            planet: self.planet.model(),
            stars: self.streamer.live(),
            stars_changed,
            overlay: SceneOverlay {
                camera_phase: self.flight.phase(),
                animation_phase: self.sequencer.phase(),
                glow_position: self.sequencer.glow_position(),
                interaction_visible: self.interaction_visible,
                total_clicks: self.ledger.total_clicks,
            },
        };
        self.surface.present(&frame);
    }
}

/// Field sized for the ledger, through the checked generation entry point.
fn star_field_for(ledger: &StarLedger) -> StarField {
    StarField::generate_requested(ledger.generation_count() as f64)
}

impl<S: KeyValueStore, R: RenderSurface> Drop for Session<S, R> {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
