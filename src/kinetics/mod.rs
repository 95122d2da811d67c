//! Collision-theory particle simulation of a single `A + B <-> AB`
//! reaction.
//!
//! Particles drift in a box at a speed set by temperature. When an A and a
//! B touch, an Arrhenius draw decides whether they fuse into AB; if not
//! they bounce. Reversible templates also let AB fall apart again. The
//! simulator is independent of the chemistry sandbox and shares only the
//! bond energy model with it, through [`ReactionTemplate::from_bonds`].

pub mod error;
mod template;

pub use error::KineticsError;
pub use template::{evans_polanyi, ReactionTemplate};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::STANDARD_TEMPERATURE;
use crate::geometry::{distance, SpatialGrid};
use crate::thermo::GAS_CONSTANT;

/// Scales activation energies so reaction probabilities are observable
/// at simulation time steps.
pub const SIM_SCALE: f64 = 0.1;
/// Activation energy multiplier while a catalyst is present.
pub const CATALYST_FACTOR: f64 = 0.6;
pub const MAX_REACTION_PROBABILITY: f64 = 0.95;
/// Fraction of the speed error corrected each tick.
pub const SPEED_RELAXATION: f64 = 0.02;
/// Target speed per square root kelvin, distance units per tick.
pub const SPEED_PER_ROOT_KELVIN: f64 = 0.12;
/// Multiplier turning probability times population into a display rate.
pub const RATE_DISPLAY_SCALE: f64 = 0.01;
/// Share of product particles that attempt to decompose each tick.
pub const DECOMPOSITION_ATTEMPT_RATE: f64 = 0.05;
/// Relative window around K within which Q counts as balanced.
pub const EQUILIBRIUM_TOLERANCE: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KineticsConfig {
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
    pub width: f64,
    pub height: f64,
    /// Centers closer than this are in contact.
    pub contact_distance: f64,
    pub initial_a: usize,
    pub initial_b: usize,
    pub temperature: f64,
}

impl Default for KineticsConfig {
    fn default() -> Self {
        Self {
            seed: None,
            width: 800.0,
            height: 500.0,
            contact_distance: 12.0,
            initial_a: 30,
            initial_b: 30,
            temperature: STANDARD_TEMPERATURE,
        }
    }
}

impl KineticsConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, KineticsError> {
        Ok(toml::from_str(s)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticleKind {
    ReactantA,
    ReactantB,
    Product,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Particle {
    pub species: ParticleKind,
    pub position: [f64; 2],
    pub velocity: [f64; 2],
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub reactant_a: usize,
    pub reactant_b: usize,
    pub product: usize,
}

/// Direction a reversible reaction is expected to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Shift {
    Forward,
    Reverse,
    Equilibrium,
}

/// What happened during one [`KineticsSimulator::step`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub collisions: usize,
    pub reactions: usize,
    pub decompositions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KineticsSnapshot {
    pub tick: u64,
    pub template: String,
    pub temperature: f64,
    pub catalyst: bool,
    pub counts: Counts,
    pub forward_probability: f64,
    pub reverse_probability: f64,
    pub forward_rate: f64,
    pub reverse_rate: f64,
    pub equilibrium_constant: f64,
    /// `None` while either reactant is exhausted.
    pub reaction_quotient: Option<f64>,
    pub shift: Shift,
}

/// Arrhenius probability of crossing a barrier of `activation_energy`
/// kJ/mol at `temperature` K, capped at [`MAX_REACTION_PROBABILITY`].
pub fn arrhenius_probability(activation_energy: f64, temperature: f64) -> f64 {
    if temperature <= 0.0 {
        return 0.0;
    }
    let exponent = -activation_energy * 1000.0 * SIM_SCALE / (GAS_CONSTANT * temperature);
    exponent.exp().min(MAX_REACTION_PROBABILITY)
}

pub fn target_speed(temperature: f64) -> f64 {
    SPEED_PER_ROOT_KELVIN * temperature.max(0.0).sqrt()
}

pub struct KineticsSimulator {
    template: ReactionTemplate,
    config: KineticsConfig,
    temperature: f64,
    catalyst: bool,
    particles: Vec<Particle>,
    tick: u64,
    rng: StdRng,
}

impl KineticsSimulator {
    pub fn new(template: ReactionTemplate, config: KineticsConfig) -> Result<Self, KineticsError> {
        template.validate()?;
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !(positive(config.width) && positive(config.height)) {
            return Err(KineticsError::InvalidBounds {
                width: config.width,
                height: config.height,
            });
        }
        if !positive(config.contact_distance) {
            return Err(KineticsError::InvalidContactDistance(config.contact_distance));
        }
        check_temperature(config.temperature)?;
        let mut sim = Self {
            temperature: config.temperature,
            rng: seeded(config.seed),
            template,
            config,
            catalyst: false,
            particles: Vec::new(),
            tick: 0,
        };
        sim.populate();
        Ok(sim)
    }

    fn populate(&mut self) {
        self.add_particles(ParticleKind::ReactantA, self.config.initial_a);
        self.add_particles(ParticleKind::ReactantB, self.config.initial_b);
    }

    pub fn template(&self) -> &ReactionTemplate {
        &self.template
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn catalyst(&self) -> bool {
        self.catalyst
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn counts(&self) -> Counts {
        let mut counts = Counts::default();
        for p in &self.particles {
            match p.species {
                ParticleKind::ReactantA => counts.reactant_a += 1,
                ParticleKind::ReactantB => counts.reactant_b += 1,
                ParticleKind::Product => counts.product += 1,
            }
        }
        counts
    }

    /// Drop `n` particles of `species` at random positions, moving in
    /// random directions at the current target speed.
    pub fn add_particles(&mut self, species: ParticleKind, n: usize) {
        let speed = target_speed(self.temperature);
        for _ in 0..n {
            let position = [
                self.rng.gen_range(0.0..self.config.width),
                self.rng.gen_range(0.0..self.config.height),
            ];
            let angle = self.rng.gen_range(0.0..std::f64::consts::TAU);
            self.particles.push(Particle {
                species,
                position,
                velocity: [speed * angle.cos(), speed * angle.sin()],
            });
        }
    }

    pub fn set_temperature(&mut self, kelvin: f64) -> Result<(), KineticsError> {
        check_temperature(kelvin)?;
        self.temperature = kelvin;
        Ok(())
    }

    pub fn set_catalyst(&mut self, active: bool) {
        self.catalyst = active;
    }

    /// Restore the initial population. Temperature and catalyst stay as
    /// they are; a seeded simulator replays the same particle layout.
    pub fn reset(&mut self) {
        self.particles.clear();
        self.tick = 0;
        self.rng = seeded(self.config.seed);
        self.populate();
    }

    fn effective_barrier(&self, barrier: f64) -> f64 {
        if self.catalyst {
            barrier * CATALYST_FACTOR
        } else {
            barrier
        }
    }

    /// Chance that one A-B contact reacts.
    pub fn reaction_probability(&self) -> f64 {
        arrhenius_probability(
            self.effective_barrier(self.template.activation_energy),
            self.temperature,
        )
    }

    /// Chance that one product particle decomposes when it tries; 0 for
    /// one-way templates.
    pub fn reverse_probability(&self) -> f64 {
        if !self.template.reversible {
            return 0.0;
        }
        arrhenius_probability(
            self.effective_barrier(self.template.reverse_activation_energy()),
            self.temperature,
        )
    }

    /// `K = exp(−ΔH / RT)`, with ΔH standing in for the free energy.
    pub fn equilibrium_constant(&self) -> f64 {
        (-self.template.enthalpy * 1000.0 / (GAS_CONSTANT * self.temperature)).exp()
    }

    /// `[AB] / ([A][B])` in particle counts.
    pub fn reaction_quotient(&self) -> Option<f64> {
        let c = self.counts();
        let reactants = c.reactant_a * c.reactant_b;
        (reactants > 0).then(|| c.product as f64 / reactants as f64)
    }

    /// Forward and reverse display rates.
    pub fn rates(&self) -> (f64, f64) {
        let c = self.counts();
        let forward =
            self.reaction_probability() * (c.reactant_a * c.reactant_b) as f64 * RATE_DISPLAY_SCALE;
        let reverse = self.reverse_probability() * c.product as f64 * RATE_DISPLAY_SCALE;
        (forward, reverse)
    }

    /// Le Chatelier prediction from comparing Q with K.
    pub fn shift_direction(&self) -> Shift {
        if !self.template.reversible {
            let c = self.counts();
            return if c.reactant_a > 0 && c.reactant_b > 0 {
                Shift::Forward
            } else {
                Shift::Equilibrium
            };
        }
        let k = self.equilibrium_constant();
        match self.reaction_quotient() {
            None => Shift::Reverse,
            Some(q) if q < k * (1.0 - EQUILIBRIUM_TOLERANCE) => Shift::Forward,
            Some(q) if q > k * (1.0 + EQUILIBRIUM_TOLERANCE) => Shift::Reverse,
            Some(_) => Shift::Equilibrium,
        }
    }

    pub fn snapshot(&self) -> KineticsSnapshot {
        let (forward_rate, reverse_rate) = self.rates();
        KineticsSnapshot {
            tick: self.tick,
            template: self.template.name.clone(),
            temperature: self.temperature,
            catalyst: self.catalyst,
            counts: self.counts(),
            forward_probability: self.reaction_probability(),
            reverse_probability: self.reverse_probability(),
            forward_rate,
            reverse_rate,
            equilibrium_constant: self.equilibrium_constant(),
            reaction_quotient: self.reaction_quotient(),
            shift: self.shift_direction(),
        }
    }

    /// Advance one tick.
    pub fn step(&mut self) -> StepReport {
        self.tick += 1;
        self.relax_speeds();
        self.advance_positions();
        let mut report = StepReport::default();
        let existing = self.particles.len();
        self.collide(&mut report);
        self.decompose(existing, &mut report);
        if report.reactions + report.decompositions > 0 {
            log::trace!(
                "tick {}: {} reactions, {} decompositions",
                self.tick,
                report.reactions,
                report.decompositions
            );
        }
        report
    }

    fn relax_speeds(&mut self) {
        let target = target_speed(self.temperature);
        for p in &mut self.particles {
            let speed = p.velocity[0].hypot(p.velocity[1]);
            let new_speed = speed + (target - speed) * SPEED_RELAXATION;
            if speed > f64::EPSILON {
                let k = new_speed / speed;
                p.velocity = [p.velocity[0] * k, p.velocity[1] * k];
            } else {
                let angle = self.rng.gen_range(0.0..std::f64::consts::TAU);
                p.velocity = [new_speed * angle.cos(), new_speed * angle.sin()];
            }
        }
    }

    fn advance_positions(&mut self) {
        let bounds = [self.config.width, self.config.height];
        for p in &mut self.particles {
            for axis in 0..2 {
                let mut x = p.position[axis] + p.velocity[axis];
                if x < 0.0 {
                    x = -x;
                    p.velocity[axis] = p.velocity[axis].abs();
                } else if x > bounds[axis] {
                    x = 2.0 * bounds[axis] - x;
                    p.velocity[axis] = -p.velocity[axis].abs();
                }
                p.position[axis] = x.clamp(0.0, bounds[axis]);
            }
        }
    }

    /// Resolve A-B contacts. Each reactant takes part in at most one
    /// reaction per tick.
    fn collide(&mut self, report: &mut StepReport) {
        let contact = self.config.contact_distance;
        let probability = self.reaction_probability();
        let positions: Vec<[f64; 2]> = self.particles.iter().map(|p| p.position).collect();
        let grid = SpatialGrid::from_positions(&positions, contact.max(1.0));

        let mut consumed = vec![false; self.particles.len()];
        let mut products = Vec::new();
        for i in 0..self.particles.len() {
            if consumed[i] || self.particles[i].species != ParticleKind::ReactantA {
                continue;
            }
            for j in grid.query_radius(positions[i], &positions, contact) {
                if consumed[j] || self.particles[j].species != ParticleKind::ReactantB {
                    continue;
                }
                report.collisions += 1;
                if self.rng.gen::<f64>() < probability {
                    let (a, b) = (&self.particles[i], &self.particles[j]);
                    products.push(Particle {
                        species: ParticleKind::Product,
                        position: midpoint(a.position, b.position),
                        velocity: midpoint(a.velocity, b.velocity),
                    });
                    consumed[i] = true;
                    consumed[j] = true;
                    report.reactions += 1;
                    break;
                }
                self.bounce(i, j);
            }
        }

        if report.reactions > 0 {
            let mut keep = consumed.iter().map(|c| !c);
            self.particles.retain(|_| keep.next().unwrap_or(true));
            self.particles.extend(products);
        }
    }

    /// Elastic response for equal masses: swap the velocity components
    /// along the contact normal, if the pair is approaching.
    fn bounce(&mut self, i: usize, j: usize) {
        let (pi, pj) = (self.particles[i].position, self.particles[j].position);
        let d = distance(pi, pj);
        if d <= f64::EPSILON {
            return;
        }
        let n = [(pj[0] - pi[0]) / d, (pj[1] - pi[1]) / d];
        let (vi, vj) = (self.particles[i].velocity, self.particles[j].velocity);
        let approach = (vi[0] - vj[0]) * n[0] + (vi[1] - vj[1]) * n[1];
        if approach <= 0.0 {
            return;
        }
        self.particles[i].velocity = [vi[0] - approach * n[0], vi[1] - approach * n[1]];
        self.particles[j].velocity = [vj[0] + approach * n[0], vj[1] + approach * n[1]];
    }

    /// Let products that existed before this tick fall apart.
    fn decompose(&mut self, existing: usize, report: &mut StepReport) {
        let probability = self.reverse_probability() * DECOMPOSITION_ATTEMPT_RATE;
        if probability <= 0.0 {
            return;
        }
        let half_gap = self.config.contact_distance;
        let bounds = [self.config.width, self.config.height];
        let mut fragments = Vec::new();
        let limit = existing.min(self.particles.len());
        for p in &mut self.particles[..limit] {
            if p.species != ParticleKind::Product || self.rng.gen::<f64>() >= probability {
                continue;
            }
            let angle = self.rng.gen_range(0.0..std::f64::consts::TAU);
            let dir = [angle.cos(), angle.sin()];
            let speed = p.velocity[0].hypot(p.velocity[1]);
            let (center, drift) = (p.position, p.velocity);
            let mut split = [Particle {
                species: ParticleKind::ReactantA,
                position: center,
                velocity: drift,
            }; 2];
            for (fragment, sign) in split.iter_mut().zip([-1.0, 1.0]) {
                for axis in 0..2 {
                    fragment.position[axis] =
                        (center[axis] + sign * dir[axis] * half_gap).clamp(0.0, bounds[axis]);
                    fragment.velocity[axis] = drift[axis] + sign * dir[axis] * speed;
                }
            }
            split[1].species = ParticleKind::ReactantB;
            *p = split[0];
            fragments.push(split[1]);
            report.decompositions += 1;
        }
        self.particles.extend(fragments);
    }
}

fn check_temperature(kelvin: f64) -> Result<(), KineticsError> {
    if kelvin.is_finite() && kelvin > 0.0 {
        Ok(())
    } else {
        Err(KineticsError::InvalidTemperature(kelvin))
    }
}

fn seeded(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn midpoint(a: [f64; 2], b: [f64; 2]) -> [f64; 2] {
    [(a[0] + b[0]) / 2.0, (a[1] + b[1]) / 2.0]
}
