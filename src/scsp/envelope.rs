//! Envelope generator tables and per-sample stepping (§4.3.2, §4.3.3).
//!
//! Table construction follows the reference SCSP core's `scsp_init()`:
//! an x⁴ attack curve, a linear decay/sustain/release curve, and a 64-entry
//! exponential rate-step table built from `rate >> 2` / `(rate & 3) * 0.25`,
//! with the top four rates pinned to the saturating (instant) step.

use std::sync::OnceLock;

/// Envelope level resolution: 0 = full volume, `ENV_MASK` = silence.
pub const ENV_LEN: u32 = 1024;
pub const ENV_MASK: u32 = ENV_LEN - 1;

/// Number of distinct attack/decay/release rates a slot register can select.
const RATE_COUNT: usize = 64;

fn attack_table() -> &'static [u16; ENV_LEN as usize] {
    static TABLE: OnceLock<Box<[u16; ENV_LEN as usize]>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut t = Box::new([0u16; ENV_LEN as usize]);
        let len = ENV_LEN as f64;
        for (i, slot) in t.iter_mut().enumerate() {
            let x = (ENV_MASK as f64) - i as f64;
            let attenuation = (x.powi(4) / len.powi(3)).round();
            *slot = (ENV_MASK as f64 - attenuation).clamp(0.0, ENV_MASK as f64) as u16;
        }
        t
    })
}

fn decay_table() -> &'static [u16; ENV_LEN as usize] {
    static TABLE: OnceLock<Box<[u16; ENV_LEN as usize]>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut t = Box::new([0u16; ENV_LEN as usize]);
        for (i, slot) in t.iter_mut().enumerate() {
            *slot = (ENV_MASK - i as u32) as u16;
        }
        t
    })
}

/// Per-rate phase-accumulator step, in the same fixed-point units used to
/// index into the 1024-entry attack/decay curves.
fn rate_step_table() -> &'static [u32; RATE_COUNT] {
    static TABLE: OnceLock<Box<[u32; RATE_COUNT]>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut t = Box::new([0u32; RATE_COUNT]);
        const BASE_RATE: f64 = 44100.0;
        const LB_SCALE: f64 = 1.0;
        for (rate, slot) in t.iter_mut().enumerate() {
            if rate >= 60 {
                *slot = ENV_LEN;
                continue;
            }
            let shift = (rate >> 2) as i32;
            let frac = 1.0 + ((rate & 3) as f64) * 0.25;
            let step = (2f64.powi(shift) * frac * ENV_LEN as f64 * LB_SCALE / BASE_RATE).round();
            *slot = (step as u32).max(1);
        }
        t
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EnvPhase {
    #[default]
    Release,
    Sustain,
    Decay,
    Attack,
}

/// Per-slot envelope generator state (§3.2).
#[derive(Clone, Copy, Debug, Default)]
pub struct Envelope {
    pub phase: EnvPhase,
    /// Position within the active curve, `0..ENV_LEN`.
    pub position: u32,
    pub attack_rate: u8,
    pub decay_rate: u8,
    pub sustain_rate: u8,
    pub release_rate: u8,
    pub sustain_level: u16,
}

impl Envelope {
    pub fn key_on(&mut self) {
        self.phase = EnvPhase::Attack;
        self.position = 0;
    }

    /// Release the slot (§4.3.1). A release mid-attack transposes the
    /// current attack-curve level into the decay/release curve's position
    /// space first, since the two curves are indexed independently and a
    /// bare phase swap would otherwise jump the output level.
    pub fn key_off(&mut self) {
        if self.phase == EnvPhase::Attack {
            let current_level = self.level();
            self.position = ENV_MASK.saturating_sub(current_level as u32);
        }
        self.phase = EnvPhase::Release;
    }

    fn rate_for_phase(&self) -> u8 {
        match self.phase {
            EnvPhase::Attack => self.attack_rate,
            EnvPhase::Decay => self.decay_rate,
            EnvPhase::Sustain => self.sustain_rate,
            EnvPhase::Release => self.release_rate,
        }
    }

    /// Current attenuation level, 0 (loud) .. `ENV_MASK` (silent).
    pub fn level(&self) -> u16 {
        match self.phase {
            EnvPhase::Attack => attack_table()[self.position.min(ENV_MASK) as usize],
            _ => decay_table()[self.position.min(ENV_MASK) as usize],
        }
    }

    /// Advance by one sample, transitioning phases at curve boundaries
    /// (§4.3.2 step 6: attack -> decay -> sustain -> release -> held-null).
    pub fn tick(&mut self) {
        let step = rate_step_table()[self.rate_for_phase().min(63) as usize];
        self.position = self.position.saturating_add(step);

        match self.phase {
            EnvPhase::Attack => {
                if self.position >= ENV_MASK {
                    self.phase = EnvPhase::Decay;
                    self.position = 0;
                }
            }
            EnvPhase::Decay => {
                if self.level() <= self.sustain_level {
                    self.phase = EnvPhase::Sustain;
                }
            }
            EnvPhase::Sustain => {
                if self.position >= ENV_MASK {
                    self.phase = EnvPhase::Release;
                    self.position = ENV_MASK;
                }
            }
            EnvPhase::Release => {
                self.position = self.position.min(ENV_MASK);
            }
        }
    }

    pub fn is_silent(&self) -> bool {
        matches!(self.phase, EnvPhase::Release) && u32::from(self.level()) >= ENV_MASK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attack_curve_is_monotonic_and_loudest_at_zero() {
        let table = attack_table();
        assert_eq!(table[0], 0);
        for w in table.windows(2) {
            assert!(w[1] >= w[0]);
        }
    }

    #[test]
    fn decay_curve_is_linear() {
        let table = decay_table();
        assert_eq!(table[0], ENV_MASK as u16);
        assert_eq!(table[ENV_LEN as usize - 1], 0);
    }

    #[test]
    fn key_on_resets_to_attack_phase() {
        let mut env = Envelope {
            phase: EnvPhase::Release,
            position: 500,
            ..Default::default()
        };
        env.key_on();
        assert_eq!(env.phase, EnvPhase::Attack);
        assert_eq!(env.position, 0);
    }

    #[test]
    fn attack_advances_into_decay() {
        let mut env = Envelope {
            attack_rate: 63,
            ..Default::default()
        };
        env.key_on();
        for _ in 0..4 {
            env.tick();
        }
        assert_eq!(env.phase, EnvPhase::Decay);
    }

    #[test]
    fn key_off_mid_attack_preserves_level_across_the_phase_switch() {
        let mut env = Envelope {
            attack_rate: 10,
            ..Default::default()
        };
        env.key_on();
        env.tick();
        let level_before = env.level();

        env.key_off();

        assert_eq!(env.phase, EnvPhase::Release);
        assert_eq!(env.level(), level_before);
    }
}
