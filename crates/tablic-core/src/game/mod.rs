pub mod engine;
pub mod error;
pub mod log;
pub mod player;
pub mod result;
pub mod runner;
pub mod serialization;

pub use engine::{MoveOutcome, Phase, PlayerSlot, TablicState};
pub use error::{EngineError, IllegalMove, MatchError, SetupError};
pub use log::{MatchLog, MoveLog};
pub use player::{MoveEvent, Player, Retry};
pub use result::{MatchResult, PlayerResult};
pub use runner::MatchRunner;
pub use serialization::MatchSnapshot;
