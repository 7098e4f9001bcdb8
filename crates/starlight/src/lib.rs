//! Starlight scene session: camera flight, the star-placing interaction, and the
//! persistence and render-surface seams around them.

pub mod config;
pub mod flight;
pub mod interaction;
pub mod ledger;
pub mod persistence;
pub mod planet;
pub mod session;
pub mod surface;

pub use config::SessionConfig;
pub use flight::{CameraFlight, CameraPhase, FlightPlan};
pub use interaction::{AnimationPhase, InteractionSequencer, PhaseStep};
pub use ledger::{ClickedStar, StarLedger};
pub use persistence::{KeyValueStore, MemoryStore, RonFileStore, StoreError};
pub use planet::PlanetSpin;
pub use session::{Session, SessionEvent, MAX_PENDING_EVENTS};
pub use surface::{LogSurface, RenderSurface, SceneFrame, SceneOverlay};
