//! Starlight - headless run of the scene session at a fixed 60 Hz step.
//!
//! Flies the camera in, places this viewer's star if they have not placed one yet,
//! plays the sequence out and exits.

use anyhow::{Context, Result};
use engine_core::frame_step_60hz;
use starlight::{AnimationPhase, LogSurface, RonFileStore, Session, SessionConfig, SessionEvent};

/// Simulated time limit (30 s of frames).
const MAX_FRAMES: u32 = 60 * 30;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Starlight (headless)");

    let config = SessionConfig::load();
    let store = RonFileStore::open(&config.save_path)
        .with_context(|| format!("opening save file {}", config.save_path))?;
    let mut session = Session::new(config, store, LogSurface::default());

    let step = frame_step_60hz();
    let mut triggered = false;
    let mut finished = false;

    for _ in 0..MAX_FRAMES {
        session.tick(step);

        for event in session.drain_events() {
            match event {
                SessionEvent::InteractionRevealed => {
                    triggered = session.trigger();
                    if !triggered {
                        log::info!(
                            "This viewer already placed a star ({} in total)",
                            session.ledger().total_clicks
                        );
                        finished = true;
                    }
                }
                SessionEvent::AnimationPhaseChanged(AnimationPhase::Idle) if triggered => {
                    finished = true;
                }
                SessionEvent::AnimationPhaseChanged(phase) => log::info!("Phase: {}", phase.label()),
                SessionEvent::StarPlaced(star) => {
                    log::info!("Star {} placed at ({:.2}%, {:.2}%)", star.id, star.x, star.y)
                }
                SessionEvent::PersistFailed(reason) => log::warn!("Star not saved: {}", reason),
                SessionEvent::CameraPhaseChanged(phase) => log::info!("Camera: {:?}", phase),
            }
        }

        if finished && session.streamer().is_filled() {
            break;
        }
    }

    log::info!(
        "Ran {:.2}s over {} frames; {} star(s) in the field",
        session.elapsed().as_secs_f32(),
        session.surface().frames(),
        session.streamer().visible_count()
    );
    session.teardown();

    Ok(())
}
