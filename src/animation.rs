//! The sphere → text → sphere cycle.
//!
//! Everything except the accumulated spin is a pure function of elapsed time.
//! [`AnimationDriver`] carries that one piece of state between frames and
//! produces a [`RenderCommand`] per tick; scheduling lives elsewhere.

use std::f32::consts::PI;

use glam::Vec3;

/// Length of one full cycle, in seconds.
pub const CYCLE: f64 = 24.0;

/// Spin added to the y angle per frame while the sphere is held.
pub const SPIN_SPEED: f32 = 0.0005;

/// Peak explosion while morphing out to the text.
pub const EXPLOSION_OUT: f32 = 40.0;

/// Peak explosion while morphing back to the sphere.
pub const EXPLOSION_IN: f32 = 30.0;

/// Per-frame lerp factor that settles rotation during the morph out.
pub const ROTATION_DAMPING: f32 = 0.02;

/// Quintic ease-in-out.
pub fn ease_in_out_quint(x: f32) -> f32 {
    if x < 0.5 {
        16.0 * x * x * x * x * x
    } else {
        1.0 - (-2.0 * x + 2.0).powi(5) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    SphereHoldA,
    MorphOut,
    TextHold,
    MorphIn,
    SphereHoldB,
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::SphereHoldA,
        Phase::MorphOut,
        Phase::TextHold,
        Phase::MorphIn,
        Phase::SphereHoldB,
    ];

    /// Half-open `[start, end)` window within the cycle.
    pub const fn window(self) -> (f32, f32) {
        match self {
            Phase::SphereHoldA => (0.0, 4.0),
            Phase::MorphOut => (4.0, 9.0),
            Phase::TextHold => (9.0, 15.0),
            Phase::MorphIn => (15.0, 20.0),
            Phase::SphereHoldB => (20.0, 24.0),
        }
    }

    /// Phase containing cycle time `t` in `[0, 24)`, with local progress in `[0, 1)`.
    pub fn at(t: f32) -> (Phase, f32) {
        let phase = if t < 4.0 {
            Phase::SphereHoldA
        } else if t < 9.0 {
            Phase::MorphOut
        } else if t < 15.0 {
            Phase::TextHold
        } else if t < 20.0 {
            Phase::MorphIn
        } else {
            Phase::SphereHoldB
        };
        let (start, end) = phase.window();
        (phase, (t - start) / (end - start))
    }
}

/// Blend and displacement for one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    pub phase: Phase,
    pub progress: f32,
    /// 0 is the sphere, 1 is the text.
    pub mix: f32,
    pub explosion: f32,
}

impl AnimationState {
    /// State at `elapsed` seconds since the clock origin.
    pub fn at(elapsed: f64) -> Self {
        let t = elapsed.rem_euclid(CYCLE) as f32;
        // Narrowing can round a time just short of the cycle end up to 24.0,
        // which is the start of the next cycle.
        let t = if t >= CYCLE as f32 { 0.0 } else { t };
        let (phase, p) = Phase::at(t);

        let (mix, explosion) = match phase {
            Phase::SphereHoldA | Phase::SphereHoldB => (0.0, 0.0),
            Phase::MorphOut => {
                let mix = if p < 0.3 {
                    0.0
                } else {
                    ease_in_out_quint((p - 0.3) / 0.7)
                };
                let explosion = if p < 0.2 {
                    p / 0.2 * EXPLOSION_OUT
                } else if p < 0.6 {
                    EXPLOSION_OUT
                } else {
                    EXPLOSION_OUT * (1.0 - (p - 0.6) / 0.4)
                };
                (mix, explosion)
            }
            Phase::TextHold => (1.0, 0.0),
            Phase::MorphIn => (1.0 - ease_in_out_quint(p), (p * PI).sin() * EXPLOSION_IN),
        };

        Self {
            phase,
            progress: p,
            mix,
            explosion,
        }
    }
}

/// Euler angles of the particle cloud transform, in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rotation {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Rotation {
    pub const ZERO: Rotation = Rotation {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Rotation for this frame given last frame's.
    pub fn advance(self, state: &AnimationState, elapsed: f64) -> Rotation {
        match state.phase {
            Phase::SphereHoldA => Rotation {
                x: ((elapsed * 0.3).sin() * 0.02) as f32,
                y: self.y + SPIN_SPEED,
                ..self
            },
            Phase::MorphOut => Rotation {
                x: lerp(self.x, 0.0, ROTATION_DAMPING),
                y: lerp(self.y, 0.0, ROTATION_DAMPING),
                ..self
            },
            Phase::TextHold => Rotation::ZERO,
            Phase::MorphIn => Rotation {
                y: self.y + SPIN_SPEED * state.progress,
                ..self
            },
            Phase::SphereHoldB => Rotation {
                y: self.y + SPIN_SPEED,
                ..self
            },
        }
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderCommand {
    pub time: f32,
    pub state: AnimationState,
    pub rotation: Rotation,
}

/// Carries the cloud's rotation across frames.
#[derive(Debug, Default)]
pub struct AnimationDriver {
    rotation: Rotation,
}

impl AnimationDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Advances one frame at `elapsed` seconds.
    pub fn tick(&mut self, elapsed: f64) -> RenderCommand {
        let state = AnimationState::at(elapsed);
        self.rotation = self.rotation.advance(&state, elapsed);
        RenderCommand {
            time: elapsed as f32,
            state,
            rotation: self.rotation,
        }
    }
}

/// Where the vertex shader puts a particle. Kept in step with `MORPH_VERTEX`.
///
/// The blended position is pushed outward along its own direction from the
/// origin by `explosion * seed`.
pub fn particle_position(sphere: Vec3, text: Vec3, seed: f32, mix: f32, explosion: f32) -> Vec3 {
    let base = sphere.lerp(text, mix);
    base + base.normalize_or_zero() * explosion * seed
}
