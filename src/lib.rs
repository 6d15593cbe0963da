//! Scroll Brawler - entity simulation for a 2D side-scrolling brawler
//!
//! Core modules:
//! - `anim`: Easing curves, tweens and timelines
//! - `actor`: Player, minion, boss, hazards and effects
//! - `sim`: Level, spawn director and the frame orchestrator
//! - `game`: Host entry pair (`init` / `tick`)
//! - `renderer`, `audio`, `platform`: Collaborator interfaces
//! - `tuning`: Data-driven game balance

pub mod actor;
pub mod anim;
pub mod audio;
pub mod error;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{Error, Result};
pub use game::Game;
pub use settings::Settings;
pub use tuning::Tuning;
