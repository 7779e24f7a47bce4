//! `ab-behavior` — behavior definitions and the per-instance lifecycle.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                        |
//! |-----------------|-----------------------------------------------------------------|
//! | [`resources`]   | `ControlResources` bitset (`MOVE`, `LOOK`, `TARGET`, `JUMP`)    |
//! | [`requirement`] | `CapabilityRequirement`: hard capability gate                   |
//! | [`feedback`]    | `EmotionFeedback`: emotions reported on stop                    |
//! | [`hooks`]       | `Behavior` trait, `HookView`, `SteadyBehavior`                  |
//! | [`definition`]  | `BehaviorDefinition`, `DefinitionBuilder`, `BehaviorFactory`    |
//! | [`registry`]    | `DefinitionRegistry`: core + overlay layers                     |
//! | [`arbiter`]     | `Arbiter`, `Claim`: priority and resource arbitration           |
//! | [`cooldown`]    | `CooldownStore`: durable routing + bounded fallback arena       |
//! | [`sink`]        | `MoodSink`, `MemorySink`: fire-and-forget reports               |
//! | [`context`]     | `TickContext<'a>`, `Senses<'a>`, `Sinks<'a>`                    |
//! | [`admission`]   | `Admission`, `StopReason`: why a gate refused                   |
//! | [`instance`]    | `BehaviorInstance`: the lifecycle state machine                 |
//! | [`error`]       | `RegistryError`, `RegistryResult<T>`                            |
//!
//! # Design notes
//!
//! Definitions are immutable and shared by `Arc`; the per-agent logic lives
//! behind the [`Behavior`] trait object the definition's factory produces.
//! The lifecycle never inspects which concrete behavior it is running.
//!
//! Only registry construction can fail.  Every per-tick operation is total:
//! missing collaborators are skipped, out-of-phase calls are ignored.
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                           |
//! |------------|------------------------------------------------------------------|
//! | `serde`    | Derives `Serialize`/`Deserialize` on `ControlResources` and `EmotionFeedback`. |

pub mod admission;
pub mod arbiter;
pub mod context;
pub mod cooldown;
pub mod definition;
pub mod error;
pub mod feedback;
pub mod hooks;
pub mod instance;
pub mod registry;
pub mod requirement;
pub mod resources;
pub mod sink;

#[cfg(test)]
mod tests;

pub use admission::{Admission, StopReason};
pub use arbiter::{Arbiter, Claim};
pub use context::{Senses, Sinks, TickContext};
pub use cooldown::{CooldownEntry, CooldownStore};
pub use definition::{BehaviorDefinition, BehaviorFactory, DEFAULT_INTENSITY, DefinitionBuilder};
pub use error::{RegistryError, RegistryResult};
pub use feedback::EmotionFeedback;
pub use hooks::{Behavior, HookView, SteadyBehavior};
pub use instance::{BehaviorInstance, Phase, RunOutcome};
pub use registry::DefinitionRegistry;
pub use requirement::{CapabilityPredicate, CapabilityRequirement};
pub use resources::ControlResources;
pub use sink::{MemorySink, MoodSink};
