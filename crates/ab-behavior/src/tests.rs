//! Unit tests for ab-behavior.

use std::sync::Arc;

use ab_agent::{
    AgentStore, AgentStoreBuilder, CapabilityInspector, CapabilityProfile, EnergyReading,
    EnergySource, LifeStage, LifeStageSource, SurvivalOracle,
};
use ab_bias::Category;
use ab_core::{AgentId, SchedulerConfig, Tick};

use crate::{
    Arbiter, Behavior, BehaviorDefinition, BehaviorInstance, ControlResources, CooldownStore,
    DefinitionBuilder, HookView, MemorySink, MoodSink, Senses, Sinks, SteadyBehavior,
    TickContext,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const AGENT: AgentId = AgentId(0);

struct World {
    caps:       CapabilityProfile,
    energy:     Option<EnergyReading>,
    threatened: bool,
    young:      bool,
}

impl Default for World {
    fn default() -> Self {
        Self {
            caps:       CapabilityProfile::grounded(),
            energy:     None,
            threatened: false,
            young:      false,
        }
    }
}

impl CapabilityInspector for World {
    fn analyze(&self, _agent: AgentId) -> CapabilityProfile {
        self.caps
    }
}

impl EnergySource for World {
    fn capture(&self, _agent: AgentId) -> Option<EnergyReading> {
        self.energy
    }
}

impl SurvivalOracle for World {
    fn has_aggressor(&self, _agent: AgentId) -> bool {
        self.threatened
    }

    fn has_active_target(&self, _agent: AgentId) -> bool {
        false
    }
}

impl LifeStageSource for World {
    fn life_stage(&self, _agent: AgentId) -> Option<LifeStage> {
        Some(if self.young { LifeStage::Young } else { LifeStage::Adult })
    }
}

#[derive(Default)]
struct RecordingMood {
    activities: Vec<(AgentId, f32, u32, Category)>,
    emotions:   Vec<(String, f32)>,
    spread:     Vec<(String, f32)>,
    dispatched: usize,
}

impl MoodSink for RecordingMood {
    fn record_activity(
        &mut self,
        agent:     AgentId,
        intensity: f32,
        duration:  u32,
        category:  Category,
    ) {
        self.activities.push((agent, intensity, duration, category));
    }

    fn push_emotion(&mut self, _agent: AgentId, name: &str, intensity: f32) {
        self.emotions.push((name.to_owned(), intensity));
    }

    fn dispatch(&mut self, _agent: AgentId) {
        self.dispatched += 1;
    }

    fn spread_to_party(&mut self, _agent: AgentId, name: &str, intensity: f32) {
        self.spread.push((name.to_owned(), intensity));
    }
}

#[derive(Default)]
struct RecordingMemory {
    experiences: Vec<(AgentId, f32)>,
}

impl MemorySink for RecordingMemory {
    fn record_experience(&mut self, agent: AgentId, satisfaction: f32) {
        self.experiences.push((agent, satisfaction));
    }
}

/// Owns everything a `TickContext` borrows.
struct Rig {
    config:    SchedulerConfig,
    world:     World,
    arbiter:   Arbiter,
    cooldowns: CooldownStore,
    mood:      RecordingMood,
    memory:    RecordingMemory,
    durable:   Option<AgentStore>,
}

impl Rig {
    fn new() -> Self {
        let config = SchedulerConfig::default();
        Self {
            cooldowns: CooldownStore::from_config(&config),
            config,
            world: World::default(),
            arbiter: Arbiter::new(),
            mood: RecordingMood::default(),
            memory: RecordingMemory::default(),
            durable: None,
        }
    }

    fn ctx(&mut self, tick: u64) -> TickContext<'_> {
        let senses =
            Senses::new(&self.world, &self.world, &self.world).with_life_stage(&self.world);
        let sinks = Sinks::new(&mut self.mood, &mut self.memory);
        let ctx = TickContext::new(
            Tick(tick),
            &self.config,
            senses,
            &mut self.arbiter,
            &mut self.cooldowns,
        )
        .with_sinks(sinks);
        match self.durable.as_mut() {
            Some(store) => ctx.with_durable(store),
            None => ctx,
        }
    }
}

fn steady(engagement: f32) -> impl Fn(AgentId) -> Box<dyn Behavior> + Send + Sync + 'static {
    move |_| Box::new(SteadyBehavior::new(engagement)) as Box<dyn Behavior>
}

fn def(id: &str, priority: i32, resources: ControlResources) -> Arc<BehaviorDefinition> {
    Arc::new(
        DefinitionBuilder::new(id, Category::Play, steady(0.5))
            .priority(priority)
            .resources(resources)
            .build()
            .unwrap(),
    )
}

fn start_at(rig: &mut Rig, definition: Arc<BehaviorDefinition>, tick: u64) -> BehaviorInstance {
    let mut inst = BehaviorInstance::new(definition, AGENT);
    let mut ctx = rig.ctx(tick);
    assert!(inst.can_start(&ctx));
    assert!(inst.start(&mut ctx));
    inst
}

fn run(rig: &mut Rig, inst: &mut BehaviorInstance, from: u64, ticks: u64) {
    for t in from..from + ticks {
        let ctx = rig.ctx(t);
        inst.tick(&ctx);
    }
}

fn rng() -> ab_core::AgentRng {
    ab_core::AgentRng::new(7, AGENT)
}

// ── ControlResources ──────────────────────────────────────────────────────────

#[cfg(test)]
mod resources_tests {
    use super::*;

    #[test]
    fn overlap_and_union() {
        let walk = ControlResources::MOVE | ControlResources::LOOK;
        assert!(walk.overlaps(ControlResources::LOOK));
        assert!(!walk.overlaps(ControlResources::JUMP));
        assert!(!ControlResources::NONE.overlaps(walk));
        assert!(walk.contains(ControlResources::MOVE));
        assert!(ControlResources::default().is_empty());
    }

    #[test]
    fn display_lists_names() {
        let r = ControlResources::JUMP | ControlResources::MOVE;
        assert_eq!(r.to_string(), "move|jump");
        assert_eq!(ControlResources::NONE.to_string(), "none");
    }
}

// ── CapabilityRequirement ─────────────────────────────────────────────────────

#[cfg(test)]
mod requirement_tests {
    use ab_agent::Medium;

    use super::*;
    use crate::CapabilityRequirement;

    #[test]
    fn default_accepts_everyone() {
        assert!(CapabilityRequirement::any().test(&CapabilityProfile::default()));
    }

    #[test]
    fn flags_are_required() {
        let req = CapabilityRequirement::any().flying();
        let mut profile = CapabilityProfile::grounded();
        assert!(!req.test(&profile));
        profile.can_fly = true;
        assert!(req.test(&profile));
    }

    #[test]
    fn medium_and_predicate() {
        let req = CapabilityRequirement::any()
            .in_medium(Medium::Water)
            .with_predicate(|p| p.can_swim);
        let mut profile = CapabilityProfile::grounded();
        assert!(!req.test(&profile));
        profile.preferred_medium = Medium::Water;
        assert!(!req.test(&profile));
        profile.can_swim = true;
        assert!(req.test(&profile));
    }
}

// ── DefinitionBuilder ─────────────────────────────────────────────────────────

#[cfg(test)]
mod definition_tests {
    use ab_bias::{EnergyRange, IdleStaminaBias};

    use super::*;
    use crate::{DEFAULT_INTENSITY, EmotionFeedback, RegistryError};

    #[test]
    fn defaults() {
        let d = DefinitionBuilder::new("sniff", Category::IdleQuirk, steady(0.5))
            .build()
            .unwrap();
        assert_eq!(d.energy_range, EnergyRange::FULL);
        assert_eq!(d.intensity, DEFAULT_INTENSITY);
        assert_eq!(d.cooldown_range, (0, 0));
        assert!(!d.has_cooldown());
        assert!(d.control_resources.is_empty());
        assert!(d.feedback.is_empty());
    }

    #[test]
    fn bias_spec_carries_idle_tags() {
        let d = DefinitionBuilder::new("yawn", Category::IdleQuirk, steady(0.5))
            .energy_range(0.1, 0.4)
            .idle_stamina(IdleStaminaBias::Low)
            .social_idle(true)
            .build()
            .unwrap();
        let spec = d.bias_spec();
        assert_eq!(spec.category, Category::IdleQuirk);
        assert_eq!(spec.energy_range.low(), 0.1);
        assert_eq!(spec.idle_stamina, IdleStaminaBias::Low);
        assert!(spec.social_idle);
    }

    #[test]
    fn rejects_bad_energy_range() {
        let err = DefinitionBuilder::new("bad", Category::Play, steady(0.5))
            .energy_range(0.8, 0.2)
            .build()
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidDefinition { .. }));
    }

    #[test]
    fn rejects_inverted_cooldown_and_bad_intensity() {
        let inverted = DefinitionBuilder::new("a", Category::Play, steady(0.5))
            .cooldown(20, 10)
            .build();
        assert!(inverted.is_err());
        let loud = DefinitionBuilder::new("b", Category::Play, steady(0.5))
            .intensity(1.5)
            .build();
        assert!(loud.is_err());
        let empty = DefinitionBuilder::new("", Category::Play, steady(0.5)).build();
        assert!(empty.is_err());
    }

    #[test]
    fn factory_builds_per_agent() {
        let d = DefinitionBuilder::new("play", Category::Play, steady(0.5))
            .feedback(EmotionFeedback::new().emotion("joy", 0.4))
            .build()
            .unwrap();
        let a = BehaviorInstance::new(Arc::new(d), AgentId(3));
        assert_eq!(a.agent(), AgentId(3));
        assert_eq!(a.definition().feedback.emotions.len(), 1);
    }
}

// ── DefinitionRegistry ────────────────────────────────────────────────────────

#[cfg(test)]
mod registry_tests {
    use super::*;
    use crate::{DefinitionRegistry, RegistryError};

    fn build(id: &str, priority: i32) -> BehaviorDefinition {
        DefinitionBuilder::new(id, Category::Wander, steady(0.5))
            .priority(priority)
            .build()
            .unwrap()
    }

    #[test]
    fn duplicate_core_rejected() {
        let mut reg = DefinitionRegistry::new();
        reg.register(build("wander", 1)).unwrap();
        let err = reg.register(build("wander", 2)).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateDefinition(id) if id.as_str() == "wander"));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn core_rejects_overlay_id() {
        let mut reg = DefinitionRegistry::new();
        reg.register_overlay(build("dig", 1)).unwrap();
        assert!(matches!(
            reg.register(build("dig", 1)),
            Err(RegistryError::DuplicateDefinition(_))
        ));
    }

    #[test]
    fn overlay_cannot_replace_core() {
        let mut reg = DefinitionRegistry::new();
        reg.register(build("wander", 1)).unwrap();
        let err = reg.register_overlay(build("wander", 9)).unwrap_err();
        assert!(matches!(err, RegistryError::ProtectedDefinition(_)));
        assert_eq!(reg.require("wander").unwrap().priority, 1);
    }

    #[test]
    fn overlay_replace_then_clear() {
        let mut reg = DefinitionRegistry::new();
        reg.register(build("sit", 0)).unwrap();
        reg.register_overlay(build("fetch", 5)).unwrap();
        reg.register_overlay(build("fetch", 6)).unwrap();
        reg.register_overlay(build("fetch", 7)).unwrap();
        assert_eq!(reg.overlay_len(), 1);
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.get("fetch").unwrap().priority, 7);
        assert!(reg.is_overlay("fetch"));

        assert_eq!(reg.clear_overlay(), 1);
        assert!(reg.get("fetch").is_none());
        assert!(reg.get("sit").is_some());
        assert_eq!(reg.clear_overlay(), 0);
    }

    #[test]
    fn require_unknown() {
        let reg = DefinitionRegistry::new();
        assert!(matches!(reg.require("ghost"), Err(RegistryError::UnknownDefinition(_))));
    }

    #[test]
    fn all_is_sorted_snapshot() {
        let mut reg = DefinitionRegistry::new();
        reg.register(build("c", 0)).unwrap();
        reg.register(build("a", 0)).unwrap();
        reg.register_overlay(build("b", 0)).unwrap();
        let snapshot = reg.all();
        reg.clear_overlay();
        let ids: Vec<_> = snapshot.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(reg.core_ids().len(), 2);
        assert!(reg.overlay_ids().is_empty());
    }
}

// ── Arbiter ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod arbiter_tests {
    use ab_core::DefinitionId;

    use super::*;
    use crate::Claim;

    fn claim(id: &str, priority: i32, resources: ControlResources) -> Claim {
        Claim { definition: DefinitionId::new(id), priority, resources }
    }

    #[test]
    fn lower_value_outranks() {
        let mut arb = Arbiter::new();
        arb.claim(AGENT, claim("flee", 1, ControlResources::NONE));
        let me = DefinitionId::new("nap");
        assert_eq!(arb.outranked_by(AGENT, &me, 5).map(|c| c.priority), Some(1));
        assert!(arb.outranked_by(AGENT, &me, 1).is_none());
        assert!(arb.outranked_by(AgentId(1), &me, 5).is_none());
    }

    #[test]
    fn own_claim_is_ignored() {
        let mut arb = Arbiter::new();
        arb.claim(AGENT, claim("walk", 3, ControlResources::MOVE));
        let me = DefinitionId::new("walk");
        assert!(arb.conflicting(AGENT, &me, ControlResources::MOVE).is_none());
        assert!(arb.is_active(AGENT, &me));
    }

    #[test]
    fn found_claim_outlives_the_queried_id() {
        let mut arb = Arbiter::new();
        arb.claim(AGENT, claim("chase", 2, ControlResources::MOVE | ControlResources::LOOK));
        let holder = {
            let me = DefinitionId::new("sniff");
            arb.conflicting(AGENT, &me, ControlResources::LOOK)
        };
        assert_eq!(holder.map(|c| c.definition.as_str()), Some("chase"));
        let rival = {
            let me = DefinitionId::new("sniff");
            arb.outranked_by(AGENT, &me, 4)
        };
        assert_eq!(rival.map(|c| c.priority), Some(2));
    }

    #[test]
    fn release_and_snapshot() {
        let mut arb = Arbiter::new();
        arb.claim(AGENT, claim("walk", 3, ControlResources::MOVE));
        arb.claim(AGENT, claim("look", 3, ControlResources::LOOK));
        arb.claim(AgentId(4), claim("walk", 3, ControlResources::MOVE));
        assert_eq!(arb.held(AGENT), ControlResources::MOVE | ControlResources::LOOK);
        assert_eq!(arb.active_count(), 3);

        assert!(arb.release(AGENT, &DefinitionId::new("walk")));
        assert!(!arb.release(AGENT, &DefinitionId::new("walk")));
        let snap = arb.snapshot();
        assert_eq!(snap.len(), 2);
        assert_eq!(snap[0].0, AGENT);

        assert_eq!(arb.release_agent(AgentId(4)), 1);
        assert!(arb.claims(AgentId(4)).is_empty());
    }
}

// ── CooldownStore ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod cooldown_tests {
    use ab_agent::DurableStateStore;
    use ab_core::DefinitionId;

    use super::*;

    #[test]
    fn fallback_without_durable_store() {
        let mut cd = CooldownStore::new(8);
        let id = DefinitionId::new("dig");
        let ready = cd.commit(None, AGENT, &id, Tick(100), 10);
        assert_eq!(ready, Tick(110));
        assert!(!cd.is_ready(None, AGENT, &id, Tick(109)));
        assert!(cd.is_ready(None, AGENT, &id, Tick(110)));
        assert_eq!(cd.remaining(None, AGENT, &id, Tick(104)), 6);
        assert_eq!(cd.fallback_len(AGENT), 1);
    }

    #[test]
    fn attached_agents_use_durable_store() {
        let (mut store, _rngs) = AgentStoreBuilder::new(2, 0).build();
        let mut cd = CooldownStore::new(8);
        let id = DefinitionId::new("dig");
        cd.commit(Some(&mut store), AGENT, &id, Tick(5), 20);
        assert_eq!(store.cooldown_count(AGENT), 1);
        assert_eq!(cd.fallback_agents(), 0);
        assert_eq!(cd.ready_at(Some(&store), AGENT, &id), Some(Tick(25)));
        assert_eq!(store.get_cooldown(AGENT, &id), Some(Tick(25)));
    }

    #[test]
    fn detached_agents_use_fallback() {
        let (mut store, _rngs) = AgentStoreBuilder::new(2, 0).detached().build();
        let mut cd = CooldownStore::new(8);
        let id = DefinitionId::new("dig");
        cd.commit(Some(&mut store), AGENT, &id, Tick(5), 20);
        assert_eq!(store.cooldown_count(AGENT), 0);
        assert_eq!(cd.fallback_len(AGENT), 1);
        assert_eq!(cd.ready_at(Some(&store), AGENT, &id), Some(Tick(25)));
    }

    #[test]
    fn attaching_keeps_pending_fallback_cooldowns() {
        let (mut store, _rngs) = AgentStoreBuilder::new(1, 0).detached().build();
        let mut cd = CooldownStore::new(8);
        let id = DefinitionId::new("nap");
        cd.commit(Some(&mut store), AGENT, &id, Tick(1), 100);
        store.attach(AGENT);
        assert_eq!(cd.ready_at(Some(&store), AGENT, &id), Some(Tick(101)));
        assert!(!cd.is_ready(Some(&store), AGENT, &id, Tick(4)));
        assert_eq!(cd.remaining(Some(&store), AGENT, &id, Tick(4)), 97);
    }

    #[test]
    fn migrate_moves_pending_entries_once_attached() {
        let (mut store, _rngs) = AgentStoreBuilder::new(1, 0).detached().build();
        let mut cd = CooldownStore::new(8);
        let nap = DefinitionId::new("nap");
        let dig = DefinitionId::new("dig");
        cd.commit(Some(&mut store), AGENT, &nap, Tick(1), 100);
        cd.commit(Some(&mut store), AGENT, &dig, Tick(1), 3);
        assert_eq!(cd.migrate(&mut store, AGENT, Tick(10)), 0, "still detached");
        assert_eq!(cd.fallback_len(AGENT), 2);

        store.attach(AGENT);
        assert_eq!(cd.migrate(&mut store, AGENT, Tick(10)), 1);
        assert_eq!(cd.fallback_len(AGENT), 0);
        assert_eq!(store.get_cooldown(AGENT, &nap), Some(Tick(101)));
        assert_eq!(store.get_cooldown(AGENT, &dig), None);
        assert_eq!(cd.ready_at(Some(&store), AGENT, &nap), Some(Tick(101)));
    }

    #[test]
    fn stale_entries_pruned_on_commit() {
        let mut cd = CooldownStore::new(8);
        cd.commit(None, AGENT, &DefinitionId::new("a"), Tick(0), 5);
        cd.commit(None, AGENT, &DefinitionId::new("b"), Tick(10), 5);
        assert_eq!(cd.fallback_len(AGENT), 1);
        assert_eq!(cd.prune(Tick(100)), 1);
        assert_eq!(cd.fallback_agents(), 0);
    }

    #[test]
    fn capacity_prefers_pruning_stale() {
        let mut cd = CooldownStore::new(2);
        let id = DefinitionId::new("x");
        cd.commit(None, AgentId(0), &id, Tick(0), 5);
        cd.commit(None, AgentId(1), &id, Tick(0), 500);
        cd.commit(None, AgentId(2), &id, Tick(10), 5);
        assert_eq!(cd.fallback_agents(), 2);
        assert_eq!(cd.fallback_len(AgentId(0)), 0);
        assert_eq!(cd.fallback_len(AgentId(1)), 1);
    }

    #[test]
    fn capacity_evicts_earliest_expiry() {
        let mut cd = CooldownStore::new(2);
        let id = DefinitionId::new("x");
        cd.commit(None, AgentId(0), &id, Tick(0), 50);
        cd.commit(None, AgentId(1), &id, Tick(0), 500);
        cd.commit(None, AgentId(2), &id, Tick(10), 5);
        assert_eq!(cd.fallback_agents(), 2);
        assert_eq!(cd.fallback_len(AgentId(0)), 0);
        assert_eq!(cd.fallback_len(AgentId(1)), 1);
        assert_eq!(cd.fallback_len(AgentId(2)), 1);
    }

    #[test]
    fn release_agent_and_snapshot() {
        let mut cd = CooldownStore::new(8);
        cd.commit(None, AgentId(1), &DefinitionId::new("b"), Tick(0), 5);
        cd.commit(None, AgentId(0), &DefinitionId::new("a"), Tick(0), 5);
        let snap = cd.snapshot();
        assert_eq!(snap.len(), 2);
        assert_eq!(snap[0].agent, AgentId(0));
        assert_eq!(cd.release_agent(AgentId(1)), 1);
        assert_eq!(cd.release_agent(AgentId(1)), 0);
        assert_eq!(cd.snapshot().len(), 1);
    }
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle_tests {
    use ab_agent::EnergyProfile;

    use super::*;
    use crate::{Admission, EmotionFeedback, Phase, StopReason};

    struct Picky;

    impl Behavior for Picky {
        fn can_start(&mut self, _view: &HookView<'_>) -> bool {
            false
        }

        fn engagement(&mut self, _view: &HookView<'_>) -> f32 {
            0.5
        }
    }

    struct Quitter;

    impl Behavior for Quitter {
        fn engagement(&mut self, _view: &HookView<'_>) -> f32 {
            f32::NAN
        }

        fn should_continue(&mut self, view: &HookView<'_>) -> bool {
            view.active_ticks < 3
        }
    }

    fn with_engagement(engagement: f32) -> Arc<BehaviorDefinition> {
        Arc::new(
            DefinitionBuilder::new("zoomies", Category::Play, steady(engagement))
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn start_seeds_commitment() {
        let mut rig = Rig::new();
        let inst = start_at(&mut rig, with_engagement(0.5), 0);
        assert_eq!(inst.phase(), Phase::Active);
        assert_eq!(inst.committed_duration(), 120);
        assert_eq!(inst.engagement(), 0.5);
        assert_eq!(inst.active_ticks(), 0);
        let (agent, intensity, window, category) = rig.mood.activities[0];
        assert_eq!(agent, AGENT);
        assert!((intensity - 0.15).abs() < 1e-6);
        assert_eq!(window, 10);
        assert_eq!(category, Category::Play);
        assert!(rig.arbiter.is_active(AGENT, &inst.definition().id));
    }

    #[test]
    fn young_agents_commit_less() {
        let mut rig = Rig::new();
        rig.world.young = true;
        let inst = start_at(&mut rig, with_engagement(0.5), 0);
        assert_eq!(inst.committed_duration(), 84);
    }

    #[test]
    fn stored_life_stage_applies_without_a_sense() {
        let config = SchedulerConfig::default();
        let world = World::default();
        let mut arbiter = Arbiter::new();
        let mut cooldowns = CooldownStore::from_config(&config);
        let (mut store, _rngs) = AgentStoreBuilder::new(1, 0).young(&[0]).build();
        let senses = Senses::new(&world, &world, &world);
        let mut ctx = TickContext::new(Tick(0), &config, senses, &mut arbiter, &mut cooldowns)
            .with_durable(&mut store);
        assert_eq!(ctx.life_stage(AGENT), Some(LifeStage::Young));

        let mut inst = BehaviorInstance::new(with_engagement(0.5), AGENT);
        assert!(inst.can_start(&ctx));
        assert!(inst.start(&mut ctx));
        assert_eq!(inst.committed_duration(), 84);
    }

    #[test]
    fn sensed_life_stage_wins_over_stored() {
        let mut rig = Rig::new();
        let (store, _rngs) = AgentStoreBuilder::new(1, 0).young(&[0]).build();
        rig.durable = Some(store);
        let inst = start_at(&mut rig, with_engagement(0.5), 0);
        assert_eq!(inst.committed_duration(), 120);
    }

    #[test]
    fn start_is_ignored_when_running() {
        let mut rig = Rig::new();
        let mut inst = start_at(&mut rig, with_engagement(0.5), 0);
        let mut ctx = rig.ctx(1);
        assert_eq!(inst.check_start(&ctx), Admission::Busy);
        assert!(!inst.start(&mut ctx));
    }

    #[test]
    fn engagement_extends_commitment() {
        let mut rig = Rig::new();
        let mut inst = start_at(&mut rig, with_engagement(0.8), 0);
        run(&mut rig, &mut inst, 1, 5);
        assert_eq!(inst.active_ticks(), 5);
        assert_eq!(inst.committed_duration(), 130);
    }

    #[test]
    fn extension_is_capped_and_monotonic() {
        let mut rig = Rig::new();
        let mut inst = start_at(&mut rig, with_engagement(0.9), 0);
        let mut last = inst.committed_duration();
        for t in 1..=100 {
            let ctx = rig.ctx(t);
            inst.tick(&ctx);
            assert!(inst.committed_duration() >= last);
            assert!(inst.committed_duration() <= 200);
            last = inst.committed_duration();
        }
        assert_eq!(inst.committed_duration(), 200);
    }

    #[test]
    fn neutral_engagement_does_not_extend() {
        let mut rig = Rig::new();
        let mut inst = start_at(&mut rig, with_engagement(0.7), 0);
        run(&mut rig, &mut inst, 1, 10);
        assert_eq!(inst.committed_duration(), 120);
    }

    #[test]
    fn bored_runs_end_after_commitment() {
        let mut rig = Rig::new();
        let mut inst = start_at(&mut rig, with_engagement(0.1), 0);
        run(&mut rig, &mut inst, 1, 120);
        assert!(inst.should_continue(&rig.ctx(121)));
        run(&mut rig, &mut inst, 121, 1);
        assert_eq!(inst.check_continue(&rig.ctx(122)), Some(StopReason::Bored));
    }

    #[test]
    fn hard_cap_ends_every_run() {
        let mut rig = Rig::new();
        let mut inst = start_at(&mut rig, with_engagement(0.5), 0);
        run(&mut rig, &mut inst, 1, 240);
        assert!(inst.should_continue(&rig.ctx(241)));
        run(&mut rig, &mut inst, 241, 1);
        assert_eq!(inst.check_continue(&rig.ctx(242)), Some(StopReason::HardCap));
    }

    #[test]
    fn definition_can_finish_early() {
        let mut rig = Rig::new();
        let d = Arc::new(
            DefinitionBuilder::new("sneeze", Category::IdleQuirk, |_| Box::new(Quitter))
                .build()
                .unwrap(),
        );
        let mut inst = start_at(&mut rig, d, 0);
        run(&mut rig, &mut inst, 1, 2);
        assert!(inst.should_continue(&rig.ctx(3)));
        run(&mut rig, &mut inst, 3, 1);
        assert_eq!(inst.engagement(), 0.5);
        assert_eq!(inst.check_continue(&rig.ctx(4)), Some(StopReason::Finished));
    }

    #[test]
    fn inactive_instances_do_not_continue() {
        let mut rig = Rig::new();
        let mut inst = BehaviorInstance::new(with_engagement(0.5), AGENT);
        assert_eq!(inst.check_continue(&rig.ctx(0)), Some(StopReason::Inactive));
        let mut r = rng();
        assert!(inst.stop(&mut rig.ctx(0), &mut r).is_none());
    }

    #[test]
    fn fixed_cooldown_blocks_until_ready() {
        let mut rig = Rig::new();
        let d = Arc::new(
            DefinitionBuilder::new("dig", Category::Play, steady(0.5))
                .cooldown(10, 10)
                .build()
                .unwrap(),
        );
        let mut inst = start_at(&mut rig, d, 0);
        run(&mut rig, &mut inst, 1, 100);
        let mut r = rng();
        let outcome = inst.stop(&mut rig.ctx(100), &mut r).unwrap();
        assert_eq!(outcome.ready_at, Some(Tick(110)));

        assert_eq!(
            inst.check_start(&rig.ctx(109)),
            Admission::CoolingDown { ready_at: Tick(110) }
        );
        assert!(inst.can_start(&rig.ctx(110)));
    }

    #[test]
    fn cooldown_draw_stays_in_range() {
        let mut rig = Rig::new();
        let d = Arc::new(
            DefinitionBuilder::new("dig", Category::Play, steady(0.5))
                .cooldown(5, 15)
                .build()
                .unwrap(),
        );
        let mut r = rng();
        for round in 0..20u64 {
            let now = round * 1000;
            let mut inst = start_at(&mut rig, Arc::clone(&d), now);
            let outcome = inst.stop(&mut rig.ctx(now), &mut r).unwrap();
            let ready = outcome.ready_at.unwrap();
            assert!(ready >= Tick(now + 5) && ready <= Tick(now + 15));
        }
    }

    #[test]
    fn cooldowns_follow_attachment() {
        let mut rig = Rig::new();
        let (store, _rngs) = AgentStoreBuilder::new(1, 0).build();
        rig.durable = Some(store);
        let d = Arc::new(
            DefinitionBuilder::new("dig", Category::Play, steady(0.5))
                .cooldown(10, 10)
                .build()
                .unwrap(),
        );
        let mut inst = start_at(&mut rig, d, 0);
        let mut r = rng();
        inst.stop(&mut rig.ctx(3), &mut r);
        assert_eq!(rig.durable.as_ref().unwrap().cooldown_count(AGENT), 1);
        assert_eq!(rig.cooldowns.fallback_agents(), 0);
        assert!(!inst.can_start(&rig.ctx(12)));
        assert!(inst.can_start(&rig.ctx(13)));
    }

    #[test]
    fn stop_reports_satisfaction_and_feedback() {
        let mut rig = Rig::new();
        let d = Arc::new(
            DefinitionBuilder::new("cuddle", Category::Social, steady(0.5))
                .intensity(0.8)
                .feedback(
                    EmotionFeedback::new()
                        .emotion("joy", 0.6)
                        .emotion("calm", 0.2)
                        .contagion(0.5),
                )
                .build()
                .unwrap(),
        );
        let mut inst = start_at(&mut rig, d, 0);
        run(&mut rig, &mut inst, 1, 120);
        let mut r = rng();
        let outcome = inst.stop(&mut rig.ctx(120), &mut r).unwrap();

        assert!((outcome.satisfaction - 0.7).abs() < 1e-6);
        assert_eq!(outcome.active_ticks, 120);
        assert_eq!(outcome.ready_at, None);
        assert_eq!(rig.memory.experiences.len(), 1);
        assert!((rig.memory.experiences[0].1 - 0.7).abs() < 1e-6);

        let (_, intensity, window, category) = rig.mood.activities[1];
        assert_eq!(intensity, 0.8);
        assert_eq!(window, 120);
        assert_eq!(category, Category::Social);

        assert_eq!(rig.mood.emotions, vec![("joy".to_owned(), 0.6), ("calm".to_owned(), 0.2)]);
        assert_eq!(rig.mood.spread.len(), 2);
        assert!((rig.mood.spread[0].1 - 0.3).abs() < 1e-6);
        assert_eq!(rig.mood.dispatched, 1);

        assert_eq!(inst.phase(), Phase::Inactive);
        assert_eq!(inst.active_ticks(), 0);
        assert!(rig.arbiter.claims(AGENT).is_empty());
    }

    #[test]
    fn early_stop_gets_no_bonus() {
        let mut rig = Rig::new();
        let mut inst = start_at(&mut rig, with_engagement(0.9), 0);
        run(&mut rig, &mut inst, 1, 10);
        let mut r = rng();
        let outcome = inst.stop(&mut rig.ctx(10), &mut r).unwrap();
        assert!((outcome.satisfaction - 0.9).abs() < 1e-6);
        assert_eq!(rig.mood.dispatched, 0);
    }

    #[test]
    fn satisfaction_is_capped() {
        let mut rig = Rig::new();
        let mut inst = start_at(&mut rig, with_engagement(0.9), 0);
        run(&mut rig, &mut inst, 1, 200);
        let mut r = rng();
        let outcome = inst.stop(&mut rig.ctx(200), &mut r).unwrap();
        assert_eq!(outcome.satisfaction, 1.0);
    }

    #[test]
    fn completion_pulse_is_capped() {
        let mut rig = Rig::new();
        rig.config.hard_cap_multiplier = 10;
        let mut inst = start_at(&mut rig, with_engagement(0.5), 0);
        run(&mut rig, &mut inst, 1, 450);
        let mut r = rng();
        inst.stop(&mut rig.ctx(450), &mut r);
        assert_eq!(rig.mood.activities[1].2, 400);
    }

    #[test]
    fn runs_without_collaborators() {
        let config = SchedulerConfig::default();
        let world = World::default();
        let mut arbiter = Arbiter::new();
        let mut cooldowns = CooldownStore::new(4);
        let d = Arc::new(
            DefinitionBuilder::new("dig", Category::Play, steady(0.5))
                .cooldown(3, 3)
                .feedback(EmotionFeedback::new().emotion("pride", 0.5))
                .build()
                .unwrap(),
        );
        let mut inst = BehaviorInstance::new(d, AGENT);
        let senses = Senses::new(&world, &world, &world);
        let mut ctx = TickContext::new(Tick(0), &config, senses, &mut arbiter, &mut cooldowns);
        assert!(inst.can_start(&ctx));
        assert!(inst.start(&mut ctx));
        inst.tick(&ctx);
        let mut r = rng();
        let outcome = inst.stop(&mut ctx, &mut r).unwrap();
        assert_eq!(outcome.ready_at, Some(Tick(3)));
        assert_eq!(cooldowns.fallback_len(AGENT), 1);
    }

    #[test]
    fn survival_pre_empts_everything() {
        let mut rig = Rig::new();
        let mut running = start_at(&mut rig, with_engagement(0.5), 0);
        let mut idle = BehaviorInstance::new(def("nap", 0, ControlResources::NONE), AGENT);
        rig.world.threatened = true;
        assert_eq!(idle.check_start(&rig.ctx(1)), Admission::SurvivalCritical);
        assert_eq!(running.check_continue(&rig.ctx(1)), Some(StopReason::SurvivalCritical));
    }

    #[test]
    fn incapable_agents_never_start() {
        let mut rig = Rig::new();
        let d = Arc::new(
            DefinitionBuilder::new("soar", Category::Special, steady(0.5))
                .requires(crate::CapabilityRequirement::any().flying())
                .build()
                .unwrap(),
        );
        let mut inst = BehaviorInstance::new(d, AGENT);
        rig.world.energy = Some(EnergyReading::Momentum(0.5));
        assert_eq!(inst.check_start(&rig.ctx(0)), Admission::Incapable);
        rig.world.caps.can_fly = true;
        assert!(inst.can_start(&rig.ctx(0)));
    }

    #[test]
    fn energy_gate_uses_form_specific_threshold() {
        let mut rig = Rig::new();
        let d = Arc::new(
            DefinitionBuilder::new("greet", Category::Social, steady(0.5))
                .energy_range(0.3, 0.7)
                .build()
                .unwrap(),
        );
        let mut inst = BehaviorInstance::new(d, AGENT);

        // Scalar 0.9: bias 0.1 clears the 0.05 threshold.
        rig.world.energy = Some(EnergyReading::Momentum(0.9));
        assert!(inst.can_start(&rig.ctx(0)));

        // Profile: 0.4·0.1 + 0.6·0.05 = 0.07, below the 0.12 threshold.
        let drained = EnergyProfile::new(0.9, 0.5, 0.0, 0.5);
        rig.world.energy = Some(EnergyReading::Profile(drained));
        match inst.check_start(&rig.ctx(0)) {
            Admission::LowEnergy { bias } => assert!((bias - 0.07).abs() < 1e-4),
            other => panic!("unexpected {other:?}"),
        }

        rig.world.energy = None;
        assert!(inst.can_start(&rig.ctx(0)));
    }

    #[test]
    fn definition_predicate_runs_last() {
        let mut rig = Rig::new();
        let d = Arc::new(
            DefinitionBuilder::new("picky", Category::IdleQuirk, |_| Box::new(Picky))
                .build()
                .unwrap(),
        );
        let mut inst = BehaviorInstance::new(d, AGENT);
        assert_eq!(inst.check_start(&rig.ctx(0)), Admission::Declined);
        rig.world.threatened = true;
        assert_eq!(inst.check_start(&rig.ctx(0)), Admission::SurvivalCritical);
    }
}

// ── Arbitration through the lifecycle ─────────────────────────────────────────

#[cfg(test)]
mod arbitration_tests {
    use ab_core::DefinitionId;

    use super::*;
    use crate::{Admission, Claim, StopReason};

    #[test]
    fn higher_value_cannot_start_under_lower() {
        let mut rig = Rig::new();
        let _urgent = start_at(&mut rig, def("flee", 10, ControlResources::NONE), 0);
        let mut lazy = BehaviorInstance::new(def("nap", 20, ControlResources::NONE), AGENT);
        assert_eq!(lazy.check_start(&rig.ctx(1)), Admission::Outranked { by_priority: 10 });
    }

    #[test]
    fn lower_value_start_stops_higher() {
        let mut rig = Rig::new();
        let mut lazy = start_at(&mut rig, def("nap", 20, ControlResources::NONE), 0);
        assert!(lazy.should_continue(&rig.ctx(1)));
        let _urgent = start_at(&mut rig, def("flee", 10, ControlResources::NONE), 1);
        assert_eq!(lazy.check_continue(&rig.ctx(2)), Some(StopReason::Outranked));
    }

    #[test]
    fn equal_priorities_coexist() {
        let mut rig = Rig::new();
        let mut a = start_at(&mut rig, def("sniff", 10, ControlResources::LOOK), 0);
        let mut b = start_at(&mut rig, def("wag", 10, ControlResources::NONE), 0);
        assert!(a.should_continue(&rig.ctx(1)));
        assert!(b.should_continue(&rig.ctx(1)));
    }

    #[test]
    fn overlapping_resources_are_exclusive() {
        let mut rig = Rig::new();
        let mut walk = start_at(&mut rig, def("walk", 10, ControlResources::MOVE), 0);
        let mut chase = BehaviorInstance::new(
            def("chase", 10, ControlResources::MOVE | ControlResources::LOOK),
            AGENT,
        );
        assert_eq!(
            chase.check_start(&rig.ctx(1)),
            Admission::ResourceBusy { held: ControlResources::MOVE }
        );
        assert!(walk.should_continue(&rig.ctx(1)));

        let mut r = rng();
        walk.stop(&mut rig.ctx(2), &mut r);
        let mut ctx = rig.ctx(2);
        assert!(chase.can_start(&ctx));
        assert!(chase.start(&mut ctx));
        assert!(!walk.can_start(&rig.ctx(3)));
    }

    #[test]
    fn foreign_overlap_stops_a_run() {
        let mut rig = Rig::new();
        let mut walk = start_at(&mut rig, def("walk", 10, ControlResources::MOVE), 0);
        rig.arbiter.claim(AGENT, Claim {
            definition: DefinitionId::new("leash"),
            priority:   10,
            resources:  ControlResources::MOVE,
        });
        assert_eq!(walk.check_continue(&rig.ctx(1)), Some(StopReason::ResourceBusy));
    }

    #[test]
    fn other_agents_do_not_interfere() {
        let mut rig = Rig::new();
        let _walk = start_at(&mut rig, def("walk", 1, ControlResources::MOVE), 0);
        let mut other = BehaviorInstance::new(def("walk", 5, ControlResources::MOVE), AgentId(1));
        assert!(other.can_start(&rig.ctx(1)));
    }
}
