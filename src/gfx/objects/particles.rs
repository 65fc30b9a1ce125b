//! # Particle System
//!
//! A small CPU-simulated particle pool drawn as points. Particles spawn at
//! the emitter origin with a randomised spread of velocities, fall under
//! gravity and respawn when their lifetime expires. The system lives in the
//! scene's custom-object category and goes through the standard draw-scope
//! protocol; it is not pickable.

use cgmath::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::gfx::backend::{Color, PrimitiveMode, RenderBackend};
use crate::gfx::draw_scope::DrawScope;
use crate::gfx::drawable::Drawable;
use crate::gfx::transform::Transform;

/// Seed for the emitter's RNG; fixed so runs are reproducible.
const EMITTER_SEED: u64 = 0x2545_f491;

#[derive(Debug, Clone, Copy)]
struct Particle {
    position: Vector3<f32>,
    velocity: Vector3<f32>,
    life: f32,
}

/// A point-based particle emitter.
pub struct ParticleSystem {
    pub name: String,
    pub transform: Transform,
    pub gravity: Vector3<f32>,
    pub color: Color,
    /// Seconds a particle lives before respawning.
    pub lifetime: f32,
    particles: Vec<Particle>,
    rng: StdRng,
}

impl ParticleSystem {
    pub fn new(name: &str, count: usize) -> Self {
        let mut system = Self {
            name: name.to_string(),
            transform: Transform::new(),
            gravity: Vector3::new(0.0, -9.8, 0.0),
            color: [1.0, 0.9, 0.4, 1.0],
            lifetime: 2.0,
            particles: Vec::with_capacity(count),
            rng: StdRng::seed_from_u64(EMITTER_SEED),
        };
        for _ in 0..count {
            let particle = system.spawn();
            system.particles.push(particle);
        }
        system
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Advances the simulation by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        let gravity = self.gravity;
        for i in 0..self.particles.len() {
            let expired = {
                let p = &mut self.particles[i];
                p.velocity += gravity * dt;
                p.position += p.velocity * dt;
                p.life -= dt;
                p.life <= 0.0
            };
            if expired {
                let fresh = self.spawn();
                self.particles[i] = fresh;
            }
        }
    }

    fn spawn(&mut self) -> Particle {
        let vx = self.rng.random_range(-0.8..0.8);
        let vz = self.rng.random_range(-0.8..0.8);
        let vy = self.rng.random_range(3.0..5.0);
        let life = self.lifetime * self.rng.random_range(0.5..=1.0);
        Particle {
            position: Vector3::new(0.0, 0.0, 0.0),
            velocity: Vector3::new(vx, vy, vz),
            life,
        }
    }
}

impl Drawable for ParticleSystem {
    fn name(&self) -> &str {
        &self.name
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    fn draw(&mut self, ctx: &mut dyn RenderBackend) {
        let mut scope = DrawScope::enter(ctx, &self.transform);
        let ctx = scope.ctx();
        ctx.begin(PrimitiveMode::Points);
        for particle in &self.particles {
            let fade = (particle.life / self.lifetime).clamp(0.0, 1.0);
            ctx.color([self.color[0], self.color[1], self.color[2], fade]);
            ctx.vertex([
                particle.position.x,
                particle.position.y,
                particle.position.z,
            ]);
        }
        ctx.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::backend::{trace::Command, TraceBackend};

    #[test]
    fn draws_one_point_per_particle() {
        let mut system = ParticleSystem::new("sparks", 16);
        let mut backend = TraceBackend::new();
        system.draw(&mut backend);

        assert_eq!(backend.count(|c| matches!(c, Command::Vertex(_))), 16);
        assert_eq!(backend.modelview_depth(), 0);
    }

    #[test]
    fn particles_fall_and_respawn() {
        let mut system = ParticleSystem::new("sparks", 4);
        // Long enough that every particle expires at least once.
        for _ in 0..100 {
            system.update(0.1);
        }
        assert_eq!(system.particle_count(), 4);
        assert!(system.particles.iter().all(|p| p.life > 0.0));
    }

    #[test]
    fn seeded_emitters_are_deterministic() {
        let mut a = ParticleSystem::new("sparks", 8);
        let mut b = ParticleSystem::new("sparks", 8);
        a.update(0.016);
        b.update(0.016);

        let mut backend_a = TraceBackend::new();
        let mut backend_b = TraceBackend::new();
        a.draw(&mut backend_a);
        b.draw(&mut backend_b);

        assert_eq!(backend_a.commands(), backend_b.commands());
    }

    #[test]
    fn is_not_pickable() {
        let system = ParticleSystem::new("sparks", 4);
        let mut backend = TraceBackend::new();
        system.draw_for_picking(&mut backend);
        assert!(backend.commands().is_empty());
    }
}
