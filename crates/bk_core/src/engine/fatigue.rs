//! Fatigue and injury helpers
//!
//! 체력(energy)은 1.0에서 시작해서 코트 위에서 줄고 벤치에서 회복된다.

/// Energy a player gets back at every check before the fatigue multiplier
pub const FATIGUE_REGEN: f64 = 0.016;
/// Bench recovery per minute
pub const BENCH_RECOVERY_PER_MIN: f64 = 0.094;
/// Fatigue at or below this lets the coach ignore positional balance
pub const EXHAUSTED_FATIGUE: f64 = 0.728;

/// Rating multiplier for a player with `energy` left.
///
/// `late_game_blend` pulls the value toward 1.0 in crunch time
/// (`(e + k) / (1 + k)`); stars play through it.
pub fn fatigue(energy: f64, late_game_blend: Option<f64>) -> f64 {
    let e = (energy + FATIGUE_REGEN).clamp(0.0, 1.0);
    match late_game_blend {
        Some(k) if k > 0.0 && k.is_finite() => (e + k) / (1.0 + k),
        _ => e,
    }
}

/// Per-possession injury probability.
pub fn injury_rate(base: f64, age: u32, playing_through: bool) -> f64 {
    if !base.is_finite() || base <= 0.0 {
        return 0.0;
    }
    let age = age.min(50) as i32;
    let mut rate = base * 1.03f64.powi(age - 26);
    if playing_through {
        rate *= 1.5;
    }
    rate
}

/// Energy after `secs` on the floor
pub fn drain(energy: f64, secs: f64, fatigue_factor: f64, endurance: f64) -> f64 {
    let used = secs / 60.0 * fatigue_factor * (1.0 - endurance.clamp(0.0, 1.0));
    (energy - used).max(0.0)
}

/// Energy after `secs` on the bench
pub fn recover(energy: f64, secs: f64) -> f64 {
    (energy + secs / 60.0 * BENCH_RECOVERY_PER_MIN).min(1.0)
}
