//! kennel — a pack of dogs driven by the adaptive behavior scheduler.
//!
//! Six dogs share three core behaviors (tail chase, fetch, greet).  Midway
//! through the run a `zoomies` overlay is loaded, then cleared again; the
//! ownerless stray starts detached and is adopted later, which moves its
//! pending cooldowns from the in-memory fallback to durable state.  Pip's
//! puppy stage lives in the agent store, so Pip's runs are shorter.
//!
//! Run with `RUST_LOG=debug` to see every start, stop, and cooldown commit.

mod behaviors;
mod world;

use std::collections::BTreeMap;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ab_agent::AgentStoreBuilder;
use ab_behavior::{DefinitionRegistry, RunOutcome, Senses, Sinks, StopReason};
use ab_core::{AgentId, DefinitionId, SchedulerConfig, Tick};
use ab_sched::{SchedulerBuilder, SchedulerObserver, StepReport};

use world::{Diary, Kennel, PackMood};

// ── Constants ─────────────────────────────────────────────────────────────────

const DOG_NAMES:       [&str; 6] = ["Biscuit", "Pepper", "Juniper", "Moose", "Pip", "Scout"];
const SEED:            u64       = 42;
const TOTAL_TICKS:     u64       = 1_200;
const REPORT_INTERVAL: u64       = 200;
const OVERLAY_ON:      u64       = 300;
const OVERLAY_OFF:     u64       = 700;
const ADOPTION:        u64       = 500;
/// Pip is a puppy; Scout is the stray.
const PUPPIES:         [u32; 1]  = [4];
const STRAY:           AgentId   = AgentId(5);

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Tally {
    starts:        BTreeMap<String, usize>,
    stop_reasons:  BTreeMap<&'static str, usize>,
    active_ticks:  BTreeMap<String, u64>,
}

impl SchedulerObserver for Tally {
    fn on_started(&mut self, _tick: Tick, _agent: AgentId, definition: &DefinitionId) {
        *self.starts.entry(definition.to_string()).or_default() += 1;
    }

    fn on_stopped(
        &mut self,
        _tick:      Tick,
        _agent:     AgentId,
        definition: &DefinitionId,
        reason:     StopReason,
        outcome:    &RunOutcome,
    ) {
        *self.stop_reasons.entry(reason.as_str()).or_default() += 1;
        *self.active_ticks.entry(definition.to_string()).or_default() +=
            u64::from(outcome.active_ticks);
    }

    fn on_tick_end(&mut self, report: &StepReport) {
        if report.tick.0.is_multiple_of(REPORT_INTERVAL) {
            info!(
                tick = %report.tick,
                active = report.active,
                started = report.started,
                stopped = report.stopped,
                "pack status"
            );
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    println!("=== kennel — adaptive behavior scheduler ===");
    println!("Dogs: {}  |  Ticks: {TOTAL_TICKS}  |  Seed: {SEED}", DOG_NAMES.len());
    println!();

    // 1. Definitions.
    let mut registry = DefinitionRegistry::new();
    behaviors::register_core(&mut registry)?;

    // 2. Agents: the stray has no durable state yet.
    let (mut store, rngs) = AgentStoreBuilder::new(DOG_NAMES.len(), SEED)
        .young(&PUPPIES)
        .build();
    store.detach(STRAY);

    // 3. The world.
    let mut kennel = Kennel::new(&store, &DOG_NAMES, SEED);
    let mut mood = PackMood::new(&kennel);
    let mut diary = Diary::new(kennel.dogs.len());

    // 4. Scheduler with every dog knowing the core behaviors.
    let loadout: Vec<DefinitionId> = behaviors::CORE.into_iter().map(DefinitionId::from).collect();
    let mut sched = SchedulerBuilder::new(SchedulerConfig::default(), registry, store, rngs)
        .loadouts(vec![loadout; DOG_NAMES.len()])
        .build()?;

    // 5. Run.
    let mut tally = Tally::default();
    for _ in 0..TOTAL_TICKS {
        match sched.now().0 {
            OVERLAY_ON => {
                sched.registry.register_overlay(behaviors::zoomies()?)?;
                for i in 0..sched.agent_count() {
                    sched.spawn_instances(AgentId(i as u32), [behaviors::ZOOMIES])?;
                }
                info!("zoomies overlay loaded");
            }
            OVERLAY_OFF => {
                sched.registry.clear_overlay();
                let dropped = sched.sync_registry();
                info!(dropped, "zoomies overlay cleared");
            }
            ADOPTION => {
                let moved = sched.attach_agent(STRAY);
                info!(dog = kennel.name(STRAY), moved, "stray adopted; cooldowns now durable");
            }
            _ => {}
        }

        let senses = Senses::new(&kennel, &kennel, &kennel);
        sched.step(senses, Sinks::new(&mut mood, &mut diary), &mut tally);

        let now = sched.now();
        let alerted = kennel.advance(now, |agent| !sched.arbiter().claims(agent).is_empty());
        if let Some(dog) = alerted {
            info!(dog = kennel.name(dog), tick = %now, "squirrel!");
        }
    }
    let pruned = sched.prune_cooldowns();

    // 6. Summary.
    println!();
    println!("── Runs ─────────────────────────────────────────");
    for (definition, starts) in &tally.starts {
        let ticks = tally.active_ticks.get(definition).copied().unwrap_or(0);
        println!("  {definition:<20} {starts:>4} starts  {ticks:>6} active ticks");
    }
    println!("── Stop reasons ─────────────────────────────────");
    for (reason, count) in &tally.stop_reasons {
        println!("  {reason:<20} {count:>4}");
    }
    println!("── Dogs ─────────────────────────────────────────");
    for (i, dog) in kennel.dogs.iter().enumerate() {
        let agent = AgentId(i as u32);
        let satisfaction = diary.mean(agent).map_or("-".to_owned(), |s| format!("{s:.2}"));
        println!(
            "  {:<8} mood {:.2}  load {:>7.1}  satisfaction {satisfaction}  durable cooldowns {}",
            dog.name,
            mood.mood[i],
            mood.load[i],
            sched.agents.cooldown_count(agent),
        );
    }
    println!();
    println!(
        "Contagion events: {}  |  fallback cooldowns: {}  |  pruned at end: {pruned}",
        mood.contagion,
        sched.cooldowns().snapshot().len(),
    );
    Ok(())
}
