//! Stage simulation
//!
//! Everything that happens between two frames lives here:
//! - Level scrolling and the spawn director
//! - The `World` a session owns, including its seeded RNG
//! - The frame orchestrator that runs the outer phases
//!
//! No rendering or platform dependencies beyond the collaborator traits.

pub mod collision;
pub mod director;
pub mod level;
pub mod message;
pub mod tick;
pub mod world;

pub use collision::{Rect, in_range};
pub use director::{Director, SpawnPlan};
pub use level::Level;
pub use message::MessageBoard;
pub use tick::tick;
pub use world::{Cast, Cue, GameEvent, Motion, Overlay, Phase, Script, Slot, Target, World};
