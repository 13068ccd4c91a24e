use glam::Vec3;
use morph_viz_wasm::animation::{
    ease_in_out_quint, particle_position, AnimationDriver, AnimationState, Phase, Rotation, CYCLE,
    EXPLOSION_OUT, SPIN_SPEED,
};

fn mix_at(t: f64) -> f32 {
    AnimationState::at(t).mix
}

#[test]
fn easing_hits_its_anchor_points_exactly() {
    assert_eq!(ease_in_out_quint(0.0), 0.0);
    assert_eq!(ease_in_out_quint(0.5), 0.5);
    assert_eq!(ease_in_out_quint(1.0), 1.0);
}

#[test]
fn easing_is_monotonic() {
    let mut prev = 0.0;
    for i in 1..=1000 {
        let v = ease_in_out_quint(i as f32 / 1000.0);
        assert!(v >= prev);
        prev = v;
    }
}

#[test]
fn phase_windows_tile_the_cycle() {
    let windows: Vec<(f32, f32)> = Phase::ALL.iter().map(|p| p.window()).collect();
    assert_eq!(windows.first().map(|w| w.0), Some(0.0));
    assert_eq!(windows.last().map(|w| w.1), Some(CYCLE as f32));
    for pair in windows.windows(2) {
        assert_eq!(pair[0].1, pair[1].0);
    }

    for step in 0..2400 {
        let t = step as f32 * 0.01;
        let containing: Vec<Phase> = Phase::ALL
            .iter()
            .copied()
            .filter(|p| {
                let (start, end) = p.window();
                t >= start && t < end
            })
            .collect();
        assert_eq!(containing.len(), 1, "t={t}");
        let (phase, progress) = Phase::at(t);
        assert_eq!(phase, containing[0]);
        assert!((0.0..1.0).contains(&progress));
    }
}

#[test]
fn mix_at_checkpoints() {
    assert_eq!(mix_at(0.0), 0.0);
    assert_eq!(mix_at(9.0), 1.0);
    assert_eq!(mix_at(12.0), 1.0);
    // t = 20 opens the second sphere hold.
    assert_eq!(mix_at(20.0), 0.0);
    assert_eq!(mix_at(CYCLE + 9.0), 1.0);
}

#[test]
fn no_jumps_at_phase_boundaries() {
    for &boundary in &[4.0f64, 9.0, 15.0, 20.0, CYCLE] {
        let before = AnimationState::at(boundary - 1e-4);
        let after = AnimationState::at(boundary);
        assert!(
            (before.mix - after.mix).abs() < 0.01,
            "mix jumps at {boundary}: {} -> {}",
            before.mix,
            after.mix
        );
        assert!(
            (before.explosion - after.explosion).abs() < 0.01,
            "explosion jumps at {boundary}: {} -> {}",
            before.explosion,
            after.explosion
        );
    }
}

#[test]
fn outputs_stay_in_range() {
    for step in 0..4800 {
        let s = AnimationState::at(step as f64 * 0.01);
        assert!((0.0..=1.0).contains(&s.mix), "{s:?}");
        assert!((0.0..=EXPLOSION_OUT).contains(&s.explosion), "{s:?}");
    }
}

#[test]
fn morph_out_profile() {
    // p = 0.1: ramping up, text not started yet
    let s = AnimationState::at(4.5);
    assert_eq!(s.phase, Phase::MorphOut);
    assert_eq!(s.mix, 0.0);
    assert!((s.explosion - 20.0).abs() < 1e-3);

    // p = 0.4: full explosion
    let s = AnimationState::at(6.0);
    assert_eq!(s.explosion, EXPLOSION_OUT);
    assert!(s.mix > 0.0 && s.mix < 0.5);

    // p = 0.8: coming back together
    let s = AnimationState::at(8.0);
    assert!((s.explosion - 20.0).abs() < 1e-3);
}

#[test]
fn morph_in_peaks_halfway() {
    let s = AnimationState::at(17.5);
    assert_eq!(s.phase, Phase::MorphIn);
    assert!((s.mix - 0.5).abs() < 1e-6);
    assert!((s.explosion - 30.0).abs() < 1e-3);
}

#[test]
fn holds_are_still() {
    for &t in &[1.0, 3.9, 10.0, 14.9, 21.0, 23.9] {
        assert_eq!(AnimationState::at(t).explosion, 0.0);
    }
}

#[test]
fn spin_accumulates_only_while_spinning() {
    let mut driver = AnimationDriver::new();
    let frame = 1.0 / 60.0;

    let mut t = 0.0;
    while t < 3.0 {
        driver.tick(t);
        t += frame;
    }
    let spun = driver.rotation();
    assert!(spun.y > 100.0 * SPIN_SPEED);
    assert!(spun.x.abs() <= 0.02);

    let held = driver.tick(12.0);
    assert_eq!(held.rotation, Rotation::ZERO);
    assert_eq!(held.state.phase, Phase::TextHold);

    // Morph back in: spin resumes scaled by progress.
    let first = driver.tick(17.5).rotation;
    assert!((first.y - SPIN_SPEED * 0.5).abs() < 1e-7);

    let sphere_b = driver.tick(21.0).rotation;
    assert!((sphere_b.y - first.y - SPIN_SPEED).abs() < 1e-7);
}

#[test]
fn sphere_hold_tilt_follows_total_elapsed_time() {
    for &elapsed in &[0.5f64, 2.0, 26.0, 50.5, 3.0 * CYCLE + 1.25] {
        let state = AnimationState::at(elapsed);
        assert_eq!(state.phase, Phase::SphereHoldA, "elapsed={elapsed}");

        let next = Rotation::ZERO.advance(&state, elapsed);
        let expected = ((elapsed * 0.3).sin() * 0.02) as f32;
        assert_eq!(next.x, expected, "elapsed={elapsed}");
        assert_eq!(next.y, SPIN_SPEED);
        assert_eq!(next.z, 0.0);
    }

    // Second cycle: the tilt is not taken from the wrapped cycle time.
    let state = AnimationState::at(26.0);
    let tilt = Rotation::ZERO.advance(&state, 26.0).x;
    let wrapped = ((2.0f64 * 0.3).sin() * 0.02) as f32;
    assert!((tilt - wrapped).abs() > 1e-3);
}

#[test]
fn morph_in_and_second_hold_keep_the_tilt() {
    let start = Rotation {
        x: 0.015,
        y: 0.3,
        z: 0.0,
    };

    let state = AnimationState::at(17.0);
    assert_eq!(state.phase, Phase::MorphIn);
    let next = start.advance(&state, 17.0);
    assert_eq!(next.x, start.x);
    assert!((next.y - (start.y + SPIN_SPEED * state.progress)).abs() < 1e-7);

    let state = AnimationState::at(21.0);
    assert_eq!(state.phase, Phase::SphereHoldB);
    let next = start.advance(&state, 21.0);
    assert_eq!(next.x, start.x);
    assert!((next.y - (start.y + SPIN_SPEED)).abs() < 1e-7);
}

#[test]
fn tick_is_a_function_of_time_for_blend_values() {
    let mut a = AnimationDriver::new();
    let mut b = AnimationDriver::new();
    a.tick(1.0);
    a.tick(2.0);
    let ca = a.tick(6.5);
    let cb = b.tick(6.5);
    assert_eq!(ca.state, cb.state);
    assert_eq!(ca.time, 6.5);
}

#[test]
fn zero_explosion_is_a_plain_blend() {
    let sphere = Vec3::new(10.0, -4.0, 3.0);
    let text = Vec3::new(-2.0, 6.0, 0.0);
    let p = particle_position(sphere, text, 0.9, 0.25, 0.0);
    assert!((p - sphere.lerp(text, 0.25)).length() < 1e-6);
}

#[test]
fn explosion_pushes_radially_outward() {
    let sphere = Vec3::new(10.0, -4.0, 3.0);
    let text = Vec3::new(-2.0, 6.0, 0.0);
    let base = sphere.lerp(text, 0.6);
    let p = particle_position(sphere, text, 0.5, 0.6, 40.0);
    let offset = p - base;

    assert!((offset.length() - 20.0).abs() < 1e-4);
    assert!(offset.normalize().dot(base.normalize()) > 0.9999);
}

#[test]
fn particle_at_origin_does_not_move() {
    let p = particle_position(Vec3::ZERO, Vec3::ZERO, 1.0, 0.5, 40.0);
    assert_eq!(p, Vec3::ZERO);
}
