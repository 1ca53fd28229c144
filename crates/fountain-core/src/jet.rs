//! Fountain jet: a fixed pool of droplets, splash bursts and ripple events.
//!
//! Droplets are integrated with explicit Euler and retired against the basin
//! contract supplied by the renderer. Retirement checks run in a fixed
//! priority order each tick:
//!
//! 1. below the basin floor while inside the basin radius (silent)
//! 2. outside the cull radius and below the near-surface height (silent)
//! 3. crossing the water surface inside the basin radius (splash + ripple)
//! 4. age past `max_age`

use glam::{Vec2, Vec3};
use rand::prelude::*;
use smallvec::SmallVec;

use crate::config::{BasinGeometry, JetConfig};
use crate::constants::MIN_BASIN_RADIUS;
use crate::ripple::{RippleBuffer, RippleEvent};
use crate::topology::FlowTopology;
use crate::vessel::clamp01;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub age: f32,
    pub max_age: f32,
    pub alive: bool,
    /// Splash droplets retire quietly when they fall back into the water.
    pub splash: bool,
}

impl Particle {
    #[inline]
    fn retire(&mut self) {
        self.alive = false;
    }

    /// Normalised age in [0, 1]; renderers derive opacity from it.
    pub fn age_fraction(&self) -> f32 {
        if self.max_age > 0.0 {
            clamp01(self.age / self.max_age)
        } else {
            1.0
        }
    }
}

/// GPU-ready view of one pool slot.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleSnapshot {
    pub position: [f32; 3],
    pub age_fraction: f32,
    pub velocity: [f32; 3],
    /// 1 when alive, 0 otherwise.
    pub alive: u32,
}

impl From<&Particle> for ParticleSnapshot {
    fn from(p: &Particle) -> Self {
        Self {
            position: p.position.to_array(),
            age_fraction: p.age_fraction(),
            velocity: p.velocity.to_array(),
            alive: p.alive as u32,
        }
    }
}

pub struct JetSystem {
    config: JetConfig,
    particles: Vec<Particle>,
    ripples: RippleBuffer,
    rng: StdRng,
}

impl JetSystem {
    pub fn new(config: JetConfig, seed: u64) -> Self {
        let particles = vec![Particle::default(); config.pool_size.max(1)];
        let ripples = RippleBuffer::new(config.ripple_capacity);
        Self {
            config,
            particles,
            ripples,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Kill every droplet, forget ripples and rewind the RNG.
    pub fn reset(&mut self, seed: u64) {
        self.particles.fill(Particle::default());
        self.ripples.clear();
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Number of droplets a jet tick asks for at the given pressure.
    pub fn spawn_count(&self, pressure: f32, flow_intensity: f32) -> usize {
        let c = &self.config;
        let scaled = ((c.spawn_flow_bias + flow_intensity) * pressure * c.spawn_gain).floor();
        (scaled.max(0.0) as usize).max(c.min_spawn)
    }

    /// Emit one tick's worth of jet droplets from the nozzle.
    ///
    /// Nothing is emitted unless both the riser and the air line are
    /// connected and pressure exceeds the gate. Requests beyond the free
    /// pool slots are dropped. Returns the number actually spawned.
    pub fn spawn_jet(
        &mut self,
        topology: &FlowTopology,
        pressure: f32,
        flow_intensity: f32,
        geometry: &BasinGeometry,
    ) -> usize {
        let pressure = clamp01(pressure);
        let flow_intensity = clamp01(flow_intensity);
        if !topology.jet_plumbed() || pressure <= self.config.gate_pressure {
            return 0;
        }
        let requested = self.spawn_count(pressure, flow_intensity);
        let mut spawned = 0;
        for _ in 0..requested {
            let droplet = self.jet_droplet(pressure, geometry);
            if !self.insert(droplet) {
                break;
            }
            spawned += 1;
        }
        if spawned < requested {
            log::debug!(
                "[jet] pool saturated: spawned {spawned} of {requested} ({} slots)",
                self.particles.len()
            );
        }
        spawned
    }

    fn jet_droplet(&mut self, pressure: f32, geometry: &BasinGeometry) -> Particle {
        let c = &self.config;
        let speed = (c.speed_base + pressure * c.speed_pressure_gain)
            * (1.0 + self.rng.gen_range(-c.speed_jitter..=c.speed_jitter));
        let to_center = Vec2::new(
            geometry.center.x - geometry.nozzle.x,
            geometry.center.z - geometry.nozzle.z,
        ) * c.center_bias;
        let dir = Vec3::new(
            self.rng.gen_range(-c.lateral_jitter..=c.lateral_jitter) + to_center.x,
            -1.0,
            self.rng.gen_range(-c.lateral_jitter..=c.lateral_jitter) + to_center.y,
        )
        .normalize_or_zero();
        let max_age = (c.lifetime_sec
            + self
                .rng
                .gen_range(-c.lifetime_jitter_sec..=c.lifetime_jitter_sec))
        .max(0.05);
        Particle {
            position: geometry.nozzle,
            velocity: dir * speed,
            age: 0.0,
            max_age,
            alive: true,
            splash: false,
        }
    }

    fn splash_droplet(&mut self, at: Vec3) -> Particle {
        let c = &self.config;
        let [r_lo, r_hi] = c.splash_radial_speed;
        let [u_lo, u_hi] = c.splash_up_speed;
        let [l_lo, l_hi] = c.splash_lifetime_sec;
        let angle = self.rng.gen_range(0.0..=std::f32::consts::TAU);
        let radial = self.rng.gen_range(r_lo..=r_hi);
        let up = self.rng.gen_range(u_lo..=u_hi);
        Particle {
            // start just above the surface so the first step can't re-cross it
            position: at + Vec3::Y * 1e-3,
            velocity: Vec3::new(angle.cos() * radial, up, angle.sin() * radial),
            age: 0.0,
            max_age: self.rng.gen_range(l_lo..=l_hi),
            alive: true,
            splash: true,
        }
    }

    /// Place a particle in the first free slot. False when the pool is full.
    fn insert(&mut self, particle: Particle) -> bool {
        match self.particles.iter_mut().find(|p| !p.alive) {
            Some(slot) => {
                *slot = particle;
                true
            }
            None => false,
        }
    }

    /// Integrate, collide and retire droplets; spawn splashes and record
    /// ripples for surface hits; expire old ripples. Returns the number of
    /// surface impacts this tick.
    pub fn advance_particles(&mut self, dt: f32, geometry: &BasinGeometry, sim_time: f64) -> usize {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let g = self.config.gravity;
        let center = Vec2::new(geometry.center.x, geometry.center.z);
        let cull_radius = geometry.radius * geometry.cull_radius_scale;
        let near_surface = geometry.surface_y + geometry.near_surface_margin;

        let mut impacts: SmallVec<[Vec3; 16]> = SmallVec::new();
        for p in self.particles.iter_mut().filter(|p| p.alive) {
            let prev = p.position;
            p.position += p.velocity * dt;
            p.velocity.y -= g * dt;
            p.age += dt;

            let radial = (Vec2::new(p.position.x, p.position.z) - center).length();
            let inside = radial <= geometry.radius;

            if inside && p.position.y < geometry.floor_y {
                p.retire();
                continue;
            }
            if radial > cull_radius && p.position.y < near_surface {
                p.retire();
                continue;
            }
            if inside && prev.y >= geometry.surface_y && p.position.y < geometry.surface_y {
                p.retire();
                if !p.splash {
                    impacts.push(surface_crossing(prev, p.position, geometry.surface_y));
                }
                continue;
            }
            if p.age >= p.max_age {
                p.retire();
            }
        }

        for hit in &impacts {
            let burst = self
                .rng
                .gen_range(self.config.splash_min..=self.config.splash_max);
            for _ in 0..burst {
                let droplet = self.splash_droplet(*hit);
                if !self.insert(droplet) {
                    break;
                }
            }
            let offset = Vec2::new(hit.x, hit.z) - center;
            let impact_point = offset / geometry.radius.max(MIN_BASIN_RADIUS);
            if !impact_point.is_finite() {
                continue;
            }
            self.ripples.push(RippleEvent {
                impact_point,
                start_time: sim_time,
            });
        }
        self.ripples
            .prune(sim_time, self.config.ripple_max_age_sec);
        impacts.len()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn alive_count(&self) -> usize {
        self.particles.iter().filter(|p| p.alive).count()
    }

    pub fn snapshots(&self) -> Vec<ParticleSnapshot> {
        self.particles.iter().map(ParticleSnapshot::from).collect()
    }

    pub fn ripples(&self) -> &RippleBuffer {
        &self.ripples
    }
}

/// Point where the segment `prev -> cur` meets the plane `y = surface_y`.
fn surface_crossing(prev: Vec3, cur: Vec3, surface_y: f32) -> Vec3 {
    let drop = prev.y - cur.y;
    if drop <= f32::EPSILON {
        return cur;
    }
    prev.lerp(cur, (prev.y - surface_y) / drop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{PathKind, PickupMode};
    use crate::vessel::Vessel;

    fn geometry() -> BasinGeometry {
        BasinGeometry::default()
    }

    fn single(jet: &mut JetSystem, position: Vec3, velocity: Vec3, max_age: f32) {
        assert!(jet.insert(Particle {
            position,
            velocity,
            age: 0.0,
            max_age,
            alive: true,
            splash: false,
        }));
    }

    #[test]
    fn spawn_count_has_a_floor() {
        let jet = JetSystem::new(JetConfig::default(), 1);
        assert_eq!(jet.spawn_count(0.06, 0.0), 25);
        // (0.5 + 1.0) * 1.0 * 120
        assert_eq!(jet.spawn_count(1.0, 1.0), 180);
    }

    #[test]
    fn jet_needs_riser_air_line_and_pressure() {
        let g = geometry();
        let mut jet = JetSystem::new(JetConfig::default(), 1);
        let mut t = FlowTopology::canonical();
        assert_eq!(jet.spawn_jet(&t, 0.05, 1.0, &g), 0);
        assert!(jet.spawn_jet(&t, 0.3, 0.5, &g) > 0);

        jet.reset(1);
        t.disconnect_paths_for(Vessel::Top);
        t.connect(Vessel::Basin, Vessel::Top, PickupMode::BottomPickup);
        assert!(t.is_connected(PathKind::Riser));
        assert!(!t.is_connected(PathKind::AirLine));
        assert_eq!(jet.spawn_jet(&t, 1.0, 1.0, &g), 0);
        assert_eq!(jet.alive_count(), 0);
    }

    #[test]
    fn spawned_droplets_leave_the_nozzle_downward() {
        let g = geometry();
        let mut jet = JetSystem::new(JetConfig::default(), 3);
        let n = jet.spawn_jet(&FlowTopology::canonical(), 0.5, 0.5, &g);
        assert!(n >= 25);
        for p in jet.particles().iter().filter(|p| p.alive) {
            assert_eq!(p.position, g.nozzle);
            assert!(p.velocity.y < 0.0);
            let speed = p.velocity.length();
            let nominal = 1.6 + 0.5 * 4.2;
            assert!(speed >= nominal * 0.7 - 1e-4 && speed <= nominal * 1.3 + 1e-4);
        }
    }

    #[test]
    fn surface_hit_splashes_and_records_ripple() {
        let g = geometry();
        let mut jet = JetSystem::new(JetConfig::default(), 7);
        single(&mut jet, Vec3::new(0.5, 0.01, 0.0), Vec3::new(0.0, -1.0, 0.0), 5.0);
        let impacts = jet.advance_particles(0.02, &g, 1.25);
        assert_eq!(impacts, 1);
        let splashes = jet.particles().iter().filter(|p| p.alive && p.splash).count();
        assert!((6..=11).contains(&splashes), "splash count {splashes}");
        let ripple = jet.ripples().iter().next().copied().unwrap();
        assert!((ripple.impact_point - Vec2::new(0.5, 0.0)).length() < 1e-4);
        assert_eq!(ripple.start_time, 1.25);
    }

    #[test]
    fn floor_takes_priority_over_surface_hit() {
        let g = geometry();
        let mut jet = JetSystem::new(JetConfig::default(), 7);
        single(&mut jet, Vec3::new(0.0, 0.1, 0.0), Vec3::new(0.0, -10.0, 0.0), 5.0);
        assert_eq!(jet.advance_particles(0.1, &g, 0.0), 0);
        assert_eq!(jet.alive_count(), 0);
        assert!(jet.ripples().is_empty());
    }

    #[test]
    fn droplets_outside_cull_radius_retire_silently() {
        let g = geometry();
        let mut jet = JetSystem::new(JetConfig::default(), 7);
        single(&mut jet, Vec3::new(2.0, 0.04, 0.0), Vec3::ZERO, 5.0);
        assert_eq!(jet.advance_particles(0.001, &g, 0.0), 0);
        assert_eq!(jet.alive_count(), 0);
        assert!(jet.ripples().is_empty());
    }

    #[test]
    fn droplets_expire_by_age() {
        let g = geometry();
        let mut jet = JetSystem::new(JetConfig::default(), 7);
        // high above the basin, moving up: only age can retire it
        single(&mut jet, Vec3::new(0.0, 5.0, 0.0), Vec3::new(0.0, 3.0, 0.0), 0.05);
        jet.advance_particles(0.03, &g, 0.0);
        assert_eq!(jet.alive_count(), 1);
        assert!(jet.particles()[0].age_fraction() > 0.5);
        jet.advance_particles(0.03, &g, 0.0);
        assert_eq!(jet.alive_count(), 0);
    }

    #[test]
    fn snapshot_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<ParticleSnapshot>(), 32);
    }
}
