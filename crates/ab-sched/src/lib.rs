//! `ab-sched` — reference tick driver for the adaptive behavior scheduler.
//!
//! # Three-pass step
//!
//! ```text
//! for agent in ascending AgentId:
//!   ① Stop   — check_continue on active instances; stop the ones that fail
//!              (reports, cooldown draw from the agent's rng, claim release).
//!   ② Start  — can_start / start on inactive instances, lowest priority
//!              value first; instances stopped in ① sit this tick out.
//!   ③ Tick   — tick every active instance (engagement, extension).
//! observer.on_tick_end(report); clock.advance()
//! ```
//!
//! Hosts with their own loop can skip this crate and drive
//! [`ab_behavior::BehaviorInstance`] directly; `Scheduler` is one faithful
//! way to do it.
//!
//! # Cargo features
//!
//! | Feature | Effect                                                    |
//! |---------|-----------------------------------------------------------|
//! | `serde` | Forwards to the `serde` feature of every `ab-*` crate.    |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ab_agent::{AgentStoreBuilder, PeacefulWorld};
//! use ab_behavior::{DefinitionRegistry, Senses, Sinks};
//! use ab_core::SchedulerConfig;
//! use ab_sched::{NoopObserver, SchedulerBuilder};
//!
//! let (store, rngs) = AgentStoreBuilder::new(100, 42).build();
//! let mut sched = SchedulerBuilder::new(SchedulerConfig::default(), registry, store, rngs)
//!     .build()?;
//! sched.spawn_instances(AgentId(0), ["play:fetch", "quirk:tail_chase"])?;
//! let senses = Senses::new(&world, &world, &PeacefulWorld);
//! sched.step(senses, Sinks::default(), &mut NoopObserver);
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod scheduler;


pub use builder::SchedulerBuilder;
pub use error::{SchedError, SchedResult};
pub use observer::{NoopObserver, SchedulerObserver, StepReport};
pub use scheduler::Scheduler;
