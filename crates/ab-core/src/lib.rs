//! `ab-core` — foundational types for the adaptive behavior scheduler.
//!
//! This crate is a dependency of every other `ab-*` crate.  It has no `ab-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `PartyId`, `DefinitionId`                  |
//! | [`time`]        | `Tick`, `TickClock`                                   |
//! | [`rng`]         | `AgentRng` (per-agent, deterministic)                 |
//! | [`config`]      | `SchedulerConfig`                                     |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::SchedulerConfig;
pub use error::{CoreError, CoreResult};
pub use ids::{AgentId, DefinitionId, PartyId};
pub use rng::AgentRng;
pub use time::{Tick, TickClock};
