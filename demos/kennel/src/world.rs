//! The kennel: a toy world implementing every collaborator the scheduler
//! consumes.

use ab_agent::{
    AgentStore, CapabilityInspector, CapabilityProfile, EnergyProfile, EnergyReading,
    EnergySource, SurvivalOracle,
};
use ab_behavior::{MemorySink, MoodSink};
use ab_bias::Category;
use ab_core::{AgentId, AgentRng, PartyId, Tick};

// ── Constants ─────────────────────────────────────────────────────────────────

/// Per-tick chance that a squirrel shows up next to one dog.
const SQUIRREL_CHANCE: f64 = 0.01;
/// How long a squirrel keeps a dog on alert.
const ALERT_TICKS:     u64 = 12;

const DRAIN:   [f32; 4] = [0.006, 0.010, 0.004, 0.003];
const RECOVER: [f32; 4] = [0.008, 0.006, 0.005, 0.004];

// ── Dogs ──────────────────────────────────────────────────────────────────────

pub struct Dog {
    pub name:        &'static str,
    pub party:       PartyId,
    /// The stray reports only scalar momentum.
    pub full_energy: bool,
    pub energy:      EnergyProfile,
    alert_until:     Tick,
}

pub struct Kennel {
    pub dogs: Vec<Dog>,
    rng:      AgentRng,
    now:      Tick,
}

impl Kennel {
    /// One dog per agent in `store`; the last dog is an ownerless stray.
    /// Life stages stay in the store, where the scheduler reads them.
    pub fn new(store: &AgentStore, names: &[&'static str], seed: u64) -> Self {
        let stray = store.count.saturating_sub(1);
        let dogs = store
            .agent_ids()
            .zip(names.iter().cycle())
            .map(|(agent, &name)| {
                let i = agent.index();
                let party = if i == stray { PartyId::INVALID } else { PartyId(i as u32 / 3) };
                let base = 0.4 + 0.1 * (i % 4) as f32;
                Dog {
                    name,
                    party,
                    full_energy: i != stray,
                    energy:      EnergyProfile::new(base, base + 0.2, 0.9 - base, 0.5),
                    alert_until: Tick::ZERO,
                }
            })
            .collect();
        Self { dogs, rng: AgentRng::new(seed, AgentId::INVALID), now: Tick::ZERO }
    }

    pub fn name(&self, agent: AgentId) -> &'static str {
        self.dogs.get(agent.index()).map_or("?", |d| d.name)
    }

    /// Move the world to `now`: busy dogs tire, idle dogs recover, and now
    /// and then a squirrel puts one dog on alert.
    pub fn advance(&mut self, now: Tick, busy: impl Fn(AgentId) -> bool) -> Option<AgentId> {
        self.now = now;
        for (i, dog) in self.dogs.iter_mut().enumerate() {
            let tiring = busy(AgentId(i as u32));
            let (rates, sign) = if tiring { (DRAIN, -1.0) } else { (RECOVER, 1.0) };
            let e = dog.energy;
            dog.energy = EnergyProfile::new(
                e.momentum + sign * rates[0],
                e.stamina + sign * rates[1],
                e.social_charge + sign * rates[2],
                e.mental_focus + sign * rates[3],
            );
        }

        if self.dogs.is_empty() || !self.rng.gen_bool(SQUIRREL_CHANCE) {
            return None;
        }
        let target = self.rng.draw_inclusive(0, self.dogs.len() as u64 - 1) as usize;
        let dog = self.dogs.get_mut(target)?;
        dog.alert_until = now + ALERT_TICKS;
        Some(AgentId(target as u32))
    }
}

impl CapabilityInspector for Kennel {
    fn analyze(&self, agent: AgentId) -> CapabilityProfile {
        let has_owner = self.dogs.get(agent.index()).is_some_and(|d| d.party.is_valid());
        CapabilityProfile { has_owner, ..CapabilityProfile::grounded() }
    }
}

impl EnergySource for Kennel {
    fn capture(&self, agent: AgentId) -> Option<EnergyReading> {
        let dog = self.dogs.get(agent.index())?;
        Some(if dog.full_energy {
            EnergyReading::Profile(dog.energy)
        } else {
            EnergyReading::Momentum(dog.energy.momentum)
        })
    }
}

impl SurvivalOracle for Kennel {
    fn has_aggressor(&self, agent: AgentId) -> bool {
        self.dogs.get(agent.index()).is_some_and(|d| self.now < d.alert_until)
    }

    fn has_active_target(&self, _agent: AgentId) -> bool {
        false
    }
}

// ── Sinks ─────────────────────────────────────────────────────────────────────

/// Per-dog mood: activity load plus dispatched emotions, with party contagion.
pub struct PackMood {
    parties:       Vec<PartyId>,
    pub mood:      Vec<f32>,
    pub load:      Vec<f32>,
    pending:       Vec<Vec<(String, f32)>>,
    pub contagion: usize,
}

impl PackMood {
    pub fn new(kennel: &Kennel) -> Self {
        let n = kennel.dogs.len();
        Self {
            parties:   kennel.dogs.iter().map(|d| d.party).collect(),
            mood:      vec![0.5; n],
            load:      vec![0.0; n],
            pending:   vec![Vec::new(); n],
            contagion: 0,
        }
    }

    fn lift(&mut self, i: usize, amount: f32) {
        if let Some(m) = self.mood.get_mut(i) {
            *m = (*m + amount).clamp(0.0, 1.0);
        }
    }
}

impl MoodSink for PackMood {
    fn record_activity(
        &mut self,
        agent:          AgentId,
        intensity:      f32,
        duration_ticks: u32,
        _category:      Category,
    ) {
        if let Some(load) = self.load.get_mut(agent.index()) {
            *load += intensity * duration_ticks as f32;
        }
    }

    fn push_emotion(&mut self, agent: AgentId, name: &str, intensity: f32) {
        if let Some(queue) = self.pending.get_mut(agent.index()) {
            queue.push((name.to_owned(), intensity));
        }
    }

    fn dispatch(&mut self, agent: AgentId) {
        let i = agent.index();
        let Some(queue) = self.pending.get_mut(i) else { return };
        let total: f32 = queue.drain(..).map(|(_, v)| v).sum();
        self.lift(i, total * 0.1);
    }

    fn spread_to_party(&mut self, agent: AgentId, _name: &str, intensity: f32) {
        let Some(&party) = self.parties.get(agent.index()) else { return };
        if !party.is_valid() {
            return;
        }
        let mates: Vec<usize> = self
            .parties
            .iter()
            .enumerate()
            .filter(|&(j, p)| j != agent.index() && *p == party)
            .map(|(j, _)| j)
            .collect();
        for j in mates {
            self.lift(j, intensity * 0.05);
            self.contagion += 1;
        }
    }
}

/// Running satisfaction per dog.
pub struct Diary {
    pub runs:  Vec<u32>,
    pub total: Vec<f32>,
}

impl Diary {
    pub fn new(n: usize) -> Self {
        Self { runs: vec![0; n], total: vec![0.0; n] }
    }

    pub fn mean(&self, agent: AgentId) -> Option<f32> {
        let i = agent.index();
        let runs = *self.runs.get(i)?;
        let total = *self.total.get(i)?;
        (runs > 0).then(|| total / runs as f32)
    }
}

impl MemorySink for Diary {
    fn record_experience(&mut self, agent: AgentId, satisfaction: f32) {
        let i = agent.index();
        if let (Some(runs), Some(total)) = (self.runs.get_mut(i), self.total.get_mut(i)) {
            *runs += 1;
            *total += satisfaction;
        }
    }
}
