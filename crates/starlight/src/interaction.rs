//! The one-shot "place a star" interaction and its timed visual phases.
//!
//! ```text
//! Idle -> Shrinking (500ms) -> LightStreak (1000ms) -> Counting (800ms)
//!      -> StarGlow (1500ms) -> Complete (500ms) -> Idle
//! ```
//!
//! The sequencer never schedules anything itself. Each transition hands back the
//! next phase and how long to hold the current one; the session turns that into a
//! timer and calls [`InteractionSequencer::enter`] when it fires.

use glam::Vec2;
use rand::prelude::*;
use std::time::Duration;

use crate::ledger::{ClickedStar, StarLedger};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationPhase {
    Idle,
    Shrinking,
    LightStreak,
    Counting,
    StarGlow,
    Complete,
}

impl AnimationPhase {
    /// Phase that follows this one on a timer. Idle only leaves on a user action.
    pub fn next(self) -> Option<Self> {
        match self {
            AnimationPhase::Idle => None,
            AnimationPhase::Shrinking => Some(AnimationPhase::LightStreak),
            AnimationPhase::LightStreak => Some(AnimationPhase::Counting),
            AnimationPhase::Counting => Some(AnimationPhase::StarGlow),
            AnimationPhase::StarGlow => Some(AnimationPhase::Complete),
            AnimationPhase::Complete => Some(AnimationPhase::Idle),
        }
    }

    /// How long this phase lasts before [`Self::next`].
    pub fn hold(self) -> Option<Duration> {
        let ms = match self {
            AnimationPhase::Idle => return None,
            AnimationPhase::Shrinking => 500,
            AnimationPhase::LightStreak => 1000,
            AnimationPhase::Counting => 800,
            AnimationPhase::StarGlow => 1500,
            AnimationPhase::Complete => 500,
        };
        Some(Duration::from_millis(ms))
    }

    pub fn label(self) -> &'static str {
        match self {
            AnimationPhase::Idle => "idle",
            AnimationPhase::Shrinking => "shrinking",
            AnimationPhase::LightStreak => "light-streak",
            AnimationPhase::Counting => "counting",
            AnimationPhase::StarGlow => "star-glow",
            AnimationPhase::Complete => "complete",
        }
    }

    fn step(self) -> Option<PhaseStep> {
        Some(PhaseStep {
            phase: self.next()?,
            after: self.hold()?,
        })
    }
}

/// "Enter `phase` after `after`."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseStep {
    pub phase: AnimationPhase,
    pub after: Duration,
}

/// Result of entering a phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entered {
    pub next: Option<PhaseStep>,
    /// Set only when entering Counting: the star just appended to the ledger.
    pub placed: Option<ClickedStar>,
}

pub struct InteractionSequencer {
    phase: AnimationPhase,
    glow: Option<Vec2>,
    rng: StdRng,
}

impl Default for InteractionSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionSequencer {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Sequencer whose star placement is reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            phase: AnimationPhase::Idle,
            glow: None,
            rng,
        }
    }

    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    /// Screen position (percent) of the star being placed, from Counting until Complete.
    pub fn glow_position(&self) -> Option<Vec2> {
        self.glow
    }

    /// User action. Starts the sequence only from Idle and only if no star was ever
    /// placed; otherwise a no-op returning `None`.
    pub fn trigger(&mut self, ledger: &StarLedger) -> Option<PhaseStep> {
        if self.phase != AnimationPhase::Idle || ledger.has_clicked {
            log::debug!(
                "Interaction ignored (phase {}, placed before: {})",
                self.phase.label(),
                ledger.has_clicked
            );
            return None;
        }
        self.phase = AnimationPhase::Shrinking;
        log::info!("Interaction started");
        self.phase.step()
    }

    /// Timer-driven transition. `phase` must be the successor of the current phase;
    /// anything else is a stale timer and is ignored.
    ///
    /// Entering Counting appends a new star to `ledger`, stamped with `now_ms`.
    pub fn enter(&mut self, phase: AnimationPhase, ledger: &mut StarLedger, now_ms: u64) -> Option<Entered> {
        if self.phase.next() != Some(phase) {
            log::debug!(
                "Ignoring stale transition {} -> {}",
                self.phase.label(),
                phase.label()
            );
            return None;
        }
        self.phase = phase;

        let placed = match phase {
            AnimationPhase::Counting => {
                let star = ClickedStar {
                    id: ledger.next_star_id(now_ms),
                    x: self.rng.gen_range(0.0..100.0),
                    y: self.rng.gen_range(0.0..100.0),
                };
                ledger.record(star);
                self.glow = Some(Vec2::new(star.x, star.y));
                log::info!(
                    "Placed star #{} at ({:.1}%, {:.1}%)",
                    ledger.total_clicks,
                    star.x,
                    star.y
                );
                Some(star)
            }
            AnimationPhase::Complete => {
                self.glow = None;
                None
            }
            _ => None,
        };

        Some(Entered {
            next: phase.step(),
            placed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Walk the sequencer through every timed phase, returning the step delays.
    fn run_to_idle(seq: &mut InteractionSequencer, ledger: &mut StarLedger, first: PhaseStep) -> Vec<u64> {
        let mut delays = vec![first.after.as_millis() as u64];
        let mut step = Some(first);
        while let Some(s) = step {
            let entered = seq.enter(s.phase, ledger, 1_000).expect("successor phase");
            if let Some(n) = entered.next {
                delays.push(n.after.as_millis() as u64);
            }
            step = entered.next;
        }
        delays
    }

    #[test]
    fn full_sequence_places_one_star() {
        let mut seq = InteractionSequencer::with_seed(1);
        let mut ledger = StarLedger::default();
        let first = seq.trigger(&ledger).expect("starts from idle");
        assert_eq!(first.phase, AnimationPhase::LightStreak);
        assert_eq!(seq.phase(), AnimationPhase::Shrinking);

        let delays = run_to_idle(&mut seq, &mut ledger, first);
        assert_eq!(delays, vec![500, 1000, 800, 1500, 500]);
        assert_eq!(seq.phase(), AnimationPhase::Idle);
        assert_eq!(ledger.total_clicks, 1);
        assert!(ledger.has_clicked);
        let star = ledger.stars[0];
        assert!((0.0..100.0).contains(&star.x) && (0.0..100.0).contains(&star.y));
        assert_eq!(star.id, 1_000);
    }

    #[test]
    fn double_trigger_is_a_noop() {
        let mut seq = InteractionSequencer::with_seed(2);
        let ledger = StarLedger::default();
        assert!(seq.trigger(&ledger).is_some());
        assert!(seq.trigger(&ledger).is_none());
        assert_eq!(seq.phase(), AnimationPhase::Shrinking);
    }

    #[test]
    fn trigger_after_placing_is_a_noop() {
        let mut seq = InteractionSequencer::with_seed(3);
        let mut ledger = StarLedger::default();
        ledger.record(ClickedStar { id: 1, x: 5.0, y: 5.0 });
        assert!(seq.trigger(&ledger).is_none());
        assert_eq!(seq.phase(), AnimationPhase::Idle);
    }

    #[test]
    fn glow_spans_counting_to_complete() {
        let mut seq = InteractionSequencer::with_seed(4);
        let mut ledger = StarLedger::default();
        seq.trigger(&ledger);
        seq.enter(AnimationPhase::LightStreak, &mut ledger, 0);
        assert!(seq.glow_position().is_none());
        let entered = seq.enter(AnimationPhase::Counting, &mut ledger, 0).expect("counting");
        let star = entered.placed.expect("star placed on counting");
        assert_eq!(seq.glow_position(), Some(Vec2::new(star.x, star.y)));
        seq.enter(AnimationPhase::StarGlow, &mut ledger, 0);
        assert!(seq.glow_position().is_some());
        seq.enter(AnimationPhase::Complete, &mut ledger, 0);
        assert!(seq.glow_position().is_none());
    }

    #[test]
    fn stale_transitions_are_ignored() {
        let mut seq = InteractionSequencer::with_seed(5);
        let mut ledger = StarLedger::default();
        assert!(seq.enter(AnimationPhase::Shrinking, &mut ledger, 0).is_none());
        assert!(seq.enter(AnimationPhase::Counting, &mut ledger, 0).is_none());
        seq.trigger(&ledger);
        assert!(seq.enter(AnimationPhase::Counting, &mut ledger, 0).is_none());
        assert_eq!(ledger.total_clicks, 0);
        assert_eq!(seq.phase(), AnimationPhase::Shrinking);
    }
}
