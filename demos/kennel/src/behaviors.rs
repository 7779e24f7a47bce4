//! The kennel's behavior catalogue.
//!
//! Three core behaviors every dog knows, plus one overlay that is loaded and
//! cleared while the demo runs.

use ab_agent::EnergyReading;
use ab_behavior::{
    Behavior, BehaviorDefinition, CapabilityRequirement, ControlResources, DefinitionBuilder,
    DefinitionRegistry, EmotionFeedback, HookView, RegistryResult, SteadyBehavior,
};
use ab_bias::{Category, IdleStaminaBias};

pub const TAIL_CHASE: &str = "quirk:tail_chase";
pub const FETCH:      &str = "play:fetch";
pub const GREET:      &str = "social:greet";
pub const ZOOMIES:    &str = "special:zoomies";

pub const CORE: [&str; 3] = [TAIL_CHASE, FETCH, GREET];

// ── Tail chase ────────────────────────────────────────────────────────────────

/// Spins until dizzy.
#[derive(Default)]
struct TailChase {
    dizziness: f32,
}

impl Behavior for TailChase {
    fn on_start(&mut self, _view: &HookView<'_>) {
        self.dizziness = 0.0;
    }

    fn engagement(&mut self, _view: &HookView<'_>) -> f32 {
        1.0 - self.dizziness
    }

    fn on_tick(&mut self, _view: &HookView<'_>) {
        self.dizziness = (self.dizziness + 0.05).min(1.0);
    }
}

// ── Fetch ─────────────────────────────────────────────────────────────────────

const TICKS_PER_THROW: u32 = 6;
const MAX_THROWS:      u32 = 15;

/// Keeps going while there is stamina and the thrower hasn't given up.
#[derive(Default)]
struct Fetch {
    throws: u32,
}

impl Behavior for Fetch {
    fn on_start(&mut self, _view: &HookView<'_>) {
        self.throws = 0;
    }

    fn engagement(&mut self, view: &HookView<'_>) -> f32 {
        match view.energy() {
            Some(EnergyReading::Profile(p)) => p.stamina,
            Some(EnergyReading::Momentum(m)) => m,
            None => 0.5,
        }
    }

    fn on_tick(&mut self, view: &HookView<'_>) {
        if view.active_ticks % TICKS_PER_THROW == 0 {
            self.throws += 1;
        }
    }

    fn should_continue(&mut self, _view: &HookView<'_>) -> bool {
        self.throws < MAX_THROWS
    }
}

// ── Greet ─────────────────────────────────────────────────────────────────────

/// Says hello for as long as it committed to, and no longer.
struct Greet;

impl Behavior for Greet {
    fn engagement(&mut self, view: &HookView<'_>) -> f32 {
        match view.energy() {
            Some(EnergyReading::Profile(p)) => p.social_charge,
            _ => 0.5,
        }
    }

    fn should_continue(&mut self, view: &HookView<'_>) -> bool {
        !view.is_overdue()
    }
}

// ── Definitions ───────────────────────────────────────────────────────────────

pub fn register_core(registry: &mut DefinitionRegistry) -> RegistryResult<()> {
    let tail_chase = DefinitionBuilder::new(TAIL_CHASE, Category::IdleQuirk, |_| {
        Box::new(TailChase::default()) as Box<dyn Behavior>
    })
    .priority(10)
    .cooldown(60, 120)
    .idle_stamina(IdleStaminaBias::High)
    .resources(ControlResources::MOVE | ControlResources::LOOK)
    .intensity(0.4)
    .feedback(EmotionFeedback::new().emotion("amusement", 0.4))
    .build()?;

    let fetch = DefinitionBuilder::new(FETCH, Category::Play, |_| {
        Box::new(Fetch::default()) as Box<dyn Behavior>
    })
    .priority(5)
    .cooldown(40, 80)
    .requires(CapabilityRequirement::any().jumping())
    .energy_range(0.35, 1.0)
    .resources(ControlResources::MOVE | ControlResources::LOOK | ControlResources::JUMP)
    .intensity(0.8)
    .feedback(EmotionFeedback::new().emotion("joy", 0.6).contagion(0.5))
    .build()?;

    let greet = DefinitionBuilder::new(GREET, Category::Social, |_| {
        Box::new(Greet) as Box<dyn Behavior>
    })
    .priority(8)
    .cooldown(30, 60)
    .requires(CapabilityRequirement::any().owned())
    .social_idle(true)
    .resources(ControlResources::LOOK)
    .intensity(0.3)
    .feedback(EmotionFeedback::new().emotion("affection", 0.5).contagion(0.8))
    .build()?;

    for definition in [tail_chase, fetch, greet] {
        registry.register(definition)?;
    }
    Ok(())
}

/// Overlay behavior: a burst of running laps when momentum is high.
pub fn zoomies() -> RegistryResult<BehaviorDefinition> {
    DefinitionBuilder::new(ZOOMIES, Category::Special, |_| {
        Box::new(SteadyBehavior::new(0.9)) as Box<dyn Behavior>
    })
    .priority(2)
    .cooldown(80, 120)
    .energy_range(0.6, 1.0)
    .resources(ControlResources::MOVE | ControlResources::JUMP)
    .intensity(1.0)
    .feedback(EmotionFeedback::new().emotion("excitement", 0.8).contagion(0.3))
    .build()
}
