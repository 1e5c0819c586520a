pub mod balance;
pub mod core;
pub mod countdown;
pub mod error;
pub mod interrupt;
pub mod items;
pub mod minigames;
pub mod repo;
pub mod session;
pub mod types;

pub use error::SessionError;
pub use session::{ChallengeBody, CombatCollaborator, MiniChallengeSession, TickControl};
pub use types::{ChallengeDuration, Difficulty, Outcome, Phase, SessionConfig};
