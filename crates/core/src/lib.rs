//! Arabic text to Oculus viseme sequences for avatar lip-sync.

pub mod error;
pub mod language;
pub mod lipsync;
pub mod types;

pub use error::LipsyncError;
pub use lipsync::sequencer::TimingConfig;
pub use lipsync::LipsyncAr;
pub use types::{Viseme, VisemeEvent, VisemeSequence};
