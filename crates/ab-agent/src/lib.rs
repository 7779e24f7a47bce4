//! `ab-agent` — what the scheduler knows about an agent.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                        |
//! |---------------|-----------------------------------------------------------------|
//! | [`profile`]   | `CapabilityProfile`, `Medium`, `EnergyProfile`, `EnergyReading`, `LifeStage` |
//! | [`senses`]    | `CapabilityInspector`, `EnergySource`, `SurvivalOracle`, `LifeStageSource` |
//! | [`store`]     | `AgentStore` (SoA durable state), `AgentRngs`, `DurableStateStore` |
//! | [`builder`]   | `AgentStoreBuilder` (fluent construction)                       |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `serde`    | Derives `Serialize`/`Deserialize` on profile types.     |

pub mod builder;
pub mod profile;
pub mod senses;
pub mod store;


pub use builder::AgentStoreBuilder;
pub use profile::{CapabilityProfile, EnergyProfile, EnergyReading, LifeStage, Medium};
pub use senses::{CapabilityInspector, EnergySource, LifeStageSource, PeacefulWorld, SurvivalOracle};
pub use store::{AgentRngs, AgentStore, DurableStateStore};
