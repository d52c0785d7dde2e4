//! Tabular Q-learning
//!
//! An off-policy temporal difference learner over the full board state. The
//! agent selects moves ε-greedily from a table of `(state, action)` values
//! and applies the one-step update
//!
//! ```text
//! Q(s, a) <- Q(s, a) + α [r + γ max_a' Q(s', a') - Q(s, a)]
//! ```
//!
//! where the bootstrap term is dropped on terminal transitions.
//!
//! ## Usage Example
//!
//! ```no_run
//! use morpion::q_learning::{AgentConfig, QLearningAgent};
//!
//! let agent = QLearningAgent::new(
//!     AgentConfig::default()
//!         .with_learning_rate(0.2)
//!         .with_discount_factor(0.95)
//!         .with_exploration(1.0, 0.05, 0.99995)
//!         .with_seed(42),
//! )?;
//! agent.save("agent.msgpack")?;
//! # Ok::<(), morpion::Error>(())
//! ```

pub mod agent;
pub mod config;
pub mod q_table;
pub mod serialization;

pub use agent::{AgentStats, QLearningAgent};
pub use config::AgentConfig;
pub use q_table::QTable;
pub use serialization::AgentSnapshot;
