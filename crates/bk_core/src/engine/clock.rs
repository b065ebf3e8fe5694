//! # Clock management
//!
//! 경기 시간 관련 순수 함수 모음: strategic mode (clock factor), possession
//! length sampling, the alternating-possession rule, blowout detection and
//! late-game adjustments. Nothing here touches game state directly.

use super::rng::Sampler;

/// Below this many seconds nobody can get a shot off
pub const MIN_SHOT_SECS: f64 = 0.3;
/// "Last two minutes" threshold for bonus and late-game logic
pub const LAST_TWO_MINUTES_SECS: f64 = 120.0;
/// Iteration ceiling per period
pub const MAX_POSSESSIONS_PER_PERIOD: usize = 2_000;
/// Scoring plays inside this window can become clutch plays
pub const CLUTCH_WINDOW_SECS: f64 = 25.0;

/// Strategic mode for the offense on this possession
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockFactor {
    None,
    RunOutClock,
    HoldForLastShot,
    CatchUp,
    MaintainLead,
    TwoForOne,
    IntentionalFoul,
}

/// Inputs to the clock factor decision, from the offense's point of view
#[derive(Debug, Clone, Copy)]
pub struct ClockSituation {
    pub clock: f64,
    pub shot_clock: f64,
    /// Final regulation period or any overtime
    pub final_period: bool,
    /// Offense points minus defense points
    pub margin: i32,
    pub intentional_foul_max_deficit: u32,
    /// Defense has someone on the floor who can afford a foul
    pub defense_can_foul: bool,
    pub elam_active: bool,
}

pub fn clock_factor(s: &ClockSituation) -> ClockFactor {
    if s.elam_active {
        return ClockFactor::None;
    }
    let max_deficit = s.intentional_foul_max_deficit as i32;

    if s.final_period && s.margin > 0 && s.clock <= s.shot_clock {
        return ClockFactor::RunOutClock;
    }
    if s.clock <= s.shot_clock && (!s.final_period || (-3..=0).contains(&s.margin)) {
        return ClockFactor::HoldForLastShot;
    }
    if s.final_period && s.margin < 0 && s.clock <= LAST_TWO_MINUTES_SECS {
        return ClockFactor::CatchUp;
    }
    if s.final_period
        && s.margin > 0
        && s.clock <= LAST_TWO_MINUTES_SECS
        && (s.clock > 60.0 || s.margin > max_deficit)
    {
        return ClockFactor::MaintainLead;
    }
    let late_in_game = s.final_period && s.clock <= LAST_TWO_MINUTES_SECS;
    if s.clock > s.shot_clock + 6.0 && s.clock <= s.shot_clock + 20.0 && !late_in_game {
        return ClockFactor::TwoForOne;
    }
    if s.final_period && s.margin >= 1 && s.margin <= max_deficit && s.clock <= 60.0 && s.defense_can_foul {
        return ClockFactor::IntentionalFoul;
    }
    ClockFactor::None
}

/// Mean possession length in seconds
pub fn mean_possession_secs(avg_pace: f64, pace_factor: f64) -> f64 {
    48.0 * 60.0 / (2.0 * avg_pace) / pace_factor
}

/// Seconds the offense uses before the shot (or the foul, for `IntentionalFoul`)
pub fn possession_length(
    sampler: &mut impl Sampler,
    factor: ClockFactor,
    mean: f64,
    clock: f64,
    shot_clock: f64,
    elam_active: bool,
) -> f64 {
    let secs = match factor {
        ClockFactor::None => sampler.trunc_gauss(mean, 5.0, 4.0, shot_clock),
        ClockFactor::CatchUp => sampler.trunc_gauss(0.6 * mean, 3.0, 2.0, shot_clock),
        ClockFactor::MaintainLead => sampler.trunc_gauss(1.3 * mean, 3.0, 8.0, shot_clock),
        ClockFactor::TwoForOne => {
            (clock - shot_clock - 6.0 + sampler.uniform(-2.0, 2.0)).clamp(2.0, shot_clock)
        }
        ClockFactor::HoldForLastShot => (clock - sampler.uniform(0.3, 1.5)).max(0.0),
        ClockFactor::RunOutClock => clock,
        ClockFactor::IntentionalFoul => sampler.uniform(1.0, 4.0),
    };
    let limit = if elam_active { shot_clock } else { clock.min(shot_clock) };
    secs.clamp(0.0, limit.max(0.0))
}

/// Does the team that won the opening jump ball start `period`?
///
/// Odd period counts alternate. Even counts alternate within each half and
/// the second half opens like the first half closed. Overtime always starts
/// with a fresh jump (treated as `true` here; the caller jumps).
pub fn starts_with_possession(period: u32, num_periods: u32) -> bool {
    if period > num_periods {
        return true;
    }
    let odd = |x: u32| x % 2 == 1;
    if odd(num_periods) {
        return odd(period);
    }
    let half = num_periods / 2;
    if period <= half {
        return odd(period);
    }
    // Pattern of the last pre-midpoint period, continued from there.
    let pre = odd(half);
    if odd(period - half) {
        pre
    } else {
        !pre
    }
}

/// Personal fouls at which a starter gets pulled in `period`.
///
/// `None` in overtime and in the final minutes of regulation.
pub fn foul_trouble_limit(period: u32, num_periods: u32, fouls_until_foul_out: u32, late_game: bool) -> Option<u32> {
    if period > num_periods || late_game || num_periods == 0 {
        return None;
    }
    // Quarter-equivalent: halves map to 2 and 4.
    let quarter = (period * 4).div_ceil(num_periods);
    let scaled = ((quarter + 1) as f64 * fouls_until_foul_out as f64 / 6.0).round() as u32;
    Some(scaled.clamp(1, fouls_until_foul_out.saturating_sub(1).max(1)))
}

/// Garbage time: the final period with a big lead and little time
pub fn is_blowout(margin: u32, clock: f64, period_length_secs: f64) -> bool {
    const TABLE: [(u32, f64); 5] = [(30, 12.0), (25, 9.0), (20, 7.0), (15, 3.0), (10, 1.0)];
    let scale = period_length_secs / 720.0;
    TABLE
        .iter()
        .any(|&(lead, minutes)| margin >= lead && clock <= minutes * 60.0 * scale)
}

/// Trailing offense calls timeout to advance the ball in a late, winnable game
pub fn wants_advance_timeout(final_period: bool, clock: f64, margin: i32, timeouts_left: u32) -> bool {
    if !final_period || timeouts_left == 0 || !(1.0..=24.0).contains(&clock) {
        return false;
    }
    if !(-3..=0).contains(&margin) {
        return false;
    }
    let deficit = (-margin) as f64;
    deficit <= 3.0 * (clock / 8.0).ceil()
}

/// Blend factor for `fatigue()`: late in close games players push through.
pub fn late_game_blend(
    period: u32,
    num_periods: u32,
    clock: f64,
    late_game_minutes: f64,
    elam_active: bool,
) -> Option<f64> {
    if elam_active {
        return Some(late_game_minutes);
    }
    let in_window = period > num_periods || (period == num_periods && clock <= late_game_minutes * 60.0);
    if !in_window {
        return None;
    }
    Some((2.0 * late_game_minutes - clock / 60.0).max(0.0))
}
