//! # Habit Session
//!
//! Goal-setting chat simulator for the Consistency30 onboarding flow.
//!
//! A scripted assistant stands in for a real coaching backend: each user
//! message is answered, after a short "typing" delay, with a reply picked at
//! random from a fixed table, and every reply moves the four-step progress
//! indicator forward by one.
//!
//! ## Stages
//!
//! ```text
//! 1 Define Goal -> 2 Set Frequency -> 3 Schedule Time -> 4 Confirm Plan
//! ```
//!
//! Stage 4 is terminal for the scripted flow. `jump_to_stage` lets the
//! presentation layer move between stages freely.
//!
//! ## Example
//!
//! ```rust,no_run
//! use habit_session::{GoalSessionSimulator, SimulatorConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let sim = GoalSessionSimulator::builder()
//!         .config(SimulatorConfig::default().with_reply_delay_ms(1500))
//!         .seed(42)
//!         .build();
//!
//!     sim.select_suggestion("Read");
//!     assert!(sim.is_awaiting_reply());
//!
//!     sim.wait_for_reply().await;
//!     let snapshot = sim.snapshot();
//!     println!("step {} of 4, {} messages", snapshot.stage.number(), snapshot.transcript.len());
//!
//!     sim.shutdown();
//! }
//! ```

pub mod clock;
pub mod error;
pub mod script;
pub mod simulator;
pub mod state;
pub mod suggestions;
pub mod types;

pub use clock::{Clock, FixedClock, LocalClock};
pub use error::{Rejection, SessionError, SessionResult};
pub use script::{ReplyScript, DEFAULT_REPLIES};
pub use simulator::{GoalSessionSimulator, SimulatorBuilder, SimulatorConfig};
pub use state::SessionState;
pub use suggestions::{suggestion_message, StaticSuggestions, SuggestionSource, DEFAULT_SUGGESTIONS};
pub use types::{Message, MessageId, Sender, SessionSnapshot, Stage, StepStatus};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
