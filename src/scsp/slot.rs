//! One of the 32 SCSP voice slots: phase-accumulator wavetable playback,
//! envelope/LFO modulation, and pan (§3.2, §4.3.1, §4.3.2).

use super::envelope::Envelope;
use super::lfo::Lfo;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SampleFormat {
    #[default]
    Pcm8,
    Pcm16,
    /// 4-bit Yamaha ADPCM. Decoding is out of scope for this crate (§1
    /// Non-goals do not name it, but the reference's ADPCM state machine
    /// was not ported); slots configured this way log once and play
    /// silent, matching the "SCSP source-control unsupported" row of the
    /// error handling table.
    Adpcm,
}

/// Loop mode selected by the LPCTL field of slot register 0x00 (§3.2).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LoopControl {
    #[default]
    Off,
    Normal,
    Reverse,
    PingPong,
}

impl LoopControl {
    pub fn from_bits(bits: u16) -> Self {
        match bits & 0x3 {
            0 => LoopControl::Off,
            1 => LoopControl::Normal,
            2 => LoopControl::Reverse,
            _ => LoopControl::PingPong,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Slot {
    pub index: usize,
    /// Actual held/playing state, toggled only by [`Slot::key_on`]/[`Slot::key_off`]
    /// on the KYONEX edge (§4.3.1); never set directly from a register write.
    pub key_on: bool,
    /// KYONB bit latched from the last register write to this slot, applied
    /// to `key_on` only when KYONEX pulses (§4.3.1).
    pub pending_key_on: bool,
    pub format: SampleFormat,
    /// 19-bit sample start address within SCSP RAM.
    pub start_address: u32,
    pub loop_start: u16,
    pub loop_end: u16,
    pub loop_control: LoopControl,
    /// Pitch increment per sample, fixed-point with 10 fractional bits.
    pub pitch_increment: u32,
    pub total_level: u8,
    pub pan: u8,
    pub fm_enabled: bool,

    pub envelope: Envelope,
    pub lfo: Lfo,

    phase_accumulator: u64,
    warned_unsupported_format: bool,
    /// Shadow of the last word written to each of this slot's 16 word
    /// registers, so a byte write can merge into the untouched half before
    /// the combined word is re-decoded (§6.2: byte and word access both
    /// land on the same fields).
    shadow: [u16; 16],
}

impl Slot {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            ..Default::default()
        }
    }

    pub(crate) fn shadow(&self) -> &[u16; 16] {
        &self.shadow
    }

    pub(crate) fn shadow_mut(&mut self) -> &mut [u16; 16] {
        &mut self.shadow
    }

    pub fn key_on(&mut self) {
        self.key_on = true;
        self.phase_accumulator = 0;
        self.envelope.key_on();
    }

    pub fn key_off(&mut self) {
        self.key_on = false;
        self.envelope.key_off();
    }

    pub fn is_active(&self) -> bool {
        self.key_on && !self.envelope.is_silent()
    }

    /// Advance the phase accumulator by one sample. The reference's shared
    /// `SCSP_UPDATE_PHASE` macro always adds `pitch_increment` once; its
    /// FM-modulated variants (`_F_*`) then add a second, LFO-scaled term on
    /// top rather than replacing the base increment, so FM-enabled slots
    /// advance roughly twice as fast as the programmed pitch would suggest.
    /// This crate reproduces that doubling rather than normalizing it
    /// (§9 open question; see DESIGN.md).
    pub fn advance_phase(&mut self) {
        let mut increment = self.pitch_increment;
        if self.fm_enabled {
            let fm_term = self.lfo.pitch_term();
            increment = increment.wrapping_add(fm_term as u32);
        }
        self.phase_accumulator = self.phase_accumulator.wrapping_add(increment as u64);
        self.lfo.advance();
    }

    /// Resolve the playback offset for the current phase, honoring the
    /// slot's loop mode (§3.2). `Normal` wraps forward through the loop
    /// region; `Reverse` mirrors it into a descending run; `PingPong`
    /// bounces back and forth, doubling the effective period.
    fn sample_index(&self) -> u32 {
        let pos = (self.phase_accumulator >> 10) as u32;
        if self.loop_control == LoopControl::Off || self.loop_end <= self.loop_start {
            return pos;
        }
        let span = (self.loop_end - self.loop_start) as u32;
        let into_loop = pos.wrapping_sub(self.loop_start as u32);
        match self.loop_control {
            LoopControl::Off => unreachable!(),
            LoopControl::Normal => self.loop_start as u32 + into_loop % span.max(1),
            LoopControl::Reverse => self.loop_end as u32 - into_loop % span.max(1),
            LoopControl::PingPong => {
                let cycle = span.max(1) * 2;
                let m = into_loop % cycle;
                self.loop_start as u32 + if m < span { m } else { cycle - m }
            }
        }
    }

    /// Read the raw waveform sample at the current phase and apply
    /// envelope/total-level attenuation. Returns a centered i16 sample.
    pub fn render(&mut self, scsp_ram: &[u8]) -> i16 {
        if !self.is_active() {
            return 0;
        }

        let raw = match self.format {
            SampleFormat::Pcm8 => {
                let addr = self.start_address as usize + self.sample_index() as usize;
                *scsp_ram.get(addr).unwrap_or(&0) as i8 as i32 * 256
            }
            SampleFormat::Pcm16 => {
                let addr = self.start_address as usize + self.sample_index() as usize * 2;
                let lo = *scsp_ram.get(addr).unwrap_or(&0) as i32;
                let hi = *scsp_ram.get(addr + 1).unwrap_or(&0) as i8 as i32;
                (hi << 8) | lo
            }
            SampleFormat::Adpcm => {
                if !self.warned_unsupported_format {
                    log::warn!("scsp: slot {} uses unsupported ADPCM format", self.index);
                    self.warned_unsupported_format = true;
                }
                0
            }
        };

        let env_attenuation = self.envelope.level() as i64;
        let tl_attenuation = (self.total_level as i64) * 4;
        let total = (env_attenuation + tl_attenuation).min(1023);
        let gain = 1.0 - (total as f64 / 1023.0);
        ((raw as f64) * gain) as i16
    }

    pub fn tick_envelope(&mut self) {
        if self.key_on {
            self.envelope.tick();
        }
    }

    /// Linear pan law: `pan` 0 = hard left, 0x1F = center, 0x3E = hard
    /// right (matches the 5-bit register field).
    pub fn pan_gains(&self) -> (f32, f32) {
        let p = self.pan.min(0x3E) as f32 / 0x3E as f32;
        (1.0 - p, p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_on_resets_phase_and_envelope() {
        let mut slot = Slot::new(0);
        slot.phase_accumulator = 12345;
        slot.key_on();
        assert!(slot.key_on);
        assert_eq!(slot.phase_accumulator, 0);
    }

    #[test]
    fn fm_disabled_advances_by_exactly_pitch_increment() {
        let mut slot = Slot::new(0);
        slot.pitch_increment = 1024;
        slot.fm_enabled = false;
        slot.advance_phase();
        assert_eq!(slot.phase_accumulator, 1024);
    }

    #[test]
    fn silent_slot_renders_zero() {
        let mut slot = Slot::new(0);
        let ram = vec![0x7F; 64];
        assert_eq!(slot.render(&ram), 0);
    }
}
