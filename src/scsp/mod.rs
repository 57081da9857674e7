//! C3 — SCSP 32-voice synthesizer (§4.3, §4.4).
//!
//! The slot engine, envelope/LFO tables, timers, MIDI FIFOs and DMA each
//! live in their own submodule, one file per concern, re-exported flat
//! from here.

pub mod dma;
pub mod envelope;
pub mod lfo;
pub mod midi;
pub mod registers;
pub mod slot;
mod timer;

pub use slot::Slot;
pub use timer::Timer;

use dma::DmaDescriptor;
use midi::MidiFifo;
use registers::{CommonRegisters, Width};

pub const SLOT_COUNT: usize = 32;

/// Interrupt-worthy events produced by one call to [`Scsp::update`] or
/// [`Scsp::update_timer`]; the caller (the pacer/emulator, which owns the
/// interrupt controller) turns these into actual `raise()` calls.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScspEvents {
    pub timer_a: bool,
    pub timer_b: bool,
    pub timer_c: bool,
    pub sample: bool,
    pub midi_in: bool,
    pub midi_out_empty: bool,
    pub dma_end: bool,
}

#[derive(Debug)]
pub struct Scsp {
    pub slots: Vec<Slot>,
    pub timers: [Timer; 3],
    pub midi_in: MidiFifo,
    pub midi_out: MidiFifo,
    pub common: CommonRegisters,
    pub dma: DmaDescriptor,
    pub dsp_regs: Box<[u8]>,
}

impl Scsp {
    pub fn new() -> Self {
        Self {
            slots: (0..SLOT_COUNT).map(Slot::new).collect(),
            timers: [Timer::default(); 3],
            midi_in: MidiFifo::default(),
            midi_out: MidiFifo::default(),
            common: CommonRegisters::default(),
            dma: DmaDescriptor::default(),
            dsp_regs: vec![0u8; 0x800].into_boxed_slice(),
        }
    }

    pub fn write_register(&mut self, addr: u32, width: Width, value: u16) {
        if addr < registers::SLOT_AREA_SIZE {
            let slot_index = (addr / registers::SLOT_PAGE_SIZE) as usize;
            let offset = addr % registers::SLOT_PAGE_SIZE;
            if let Some(slot) = self.slots.get_mut(slot_index) {
                let kyonex = registers::write_slot_register(slot, offset, width, value);
                if kyonex {
                    self.apply_kyonex();
                }
            }
        } else if (registers::COMMON_BASE..registers::DSP_BASE).contains(&addr) {
            registers::write_common_register(&mut self.common, addr, value);
        }
    }

    /// KYONEX latches every slot's pending KYONB bit simultaneously,
    /// mirroring real hardware's "apply all key on/offs at once" behavior
    /// rather than each slot reacting to its own write individually.
    ///
    /// Only the pending-vs-held edge fires `key_on`/`key_off`: a slot whose
    /// KYONB bit is already reflected in `key_on` is left untouched, so a
    /// repeated key-on to an already-pressed slot is a no-op (§8.2).
    fn apply_kyonex(&mut self) {
        for slot in &mut self.slots {
            if slot.pending_key_on && !slot.key_on {
                slot.key_on();
            } else if !slot.pending_key_on && slot.key_on {
                slot.key_off();
            }
        }
    }

    /// Decode every slot and common-control register word from the raw
    /// register window the bus exposes (§4.4), self-clearing `KYONEX`
    /// bits after they're consumed so the edge-triggered apply-all-at-once
    /// semantics (§4.3.1) only fire once per guest write.
    pub fn sync_from_regs(&mut self, regs: &mut [u8]) {
        let mut any_kyonex = false;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let base = index * registers::SLOT_PAGE_SIZE as usize;
            for offset in (0..registers::SLOT_PAGE_SIZE as usize).step_by(2) {
                let addr = base + offset;
                if addr + 1 >= regs.len() {
                    break;
                }
                let value = u16::from_be_bytes([regs[addr], regs[addr + 1]]);
                if registers::write_slot_register(slot, offset as u32, Width::Word, value) {
                    any_kyonex = true;
                    regs[base] &= 0x7F;
                }
            }
        }
        if any_kyonex {
            self.apply_kyonex();
        }
        for offset in (registers::COMMON_BASE as usize..registers::DSP_BASE as usize).step_by(2) {
            if offset + 1 >= regs.len() {
                break;
            }
            let value = u16::from_be_bytes([regs[offset], regs[offset + 1]]);
            registers::write_common_register(&mut self.common, offset as u32, value);
        }
    }

    pub fn midi_in_send(&mut self, byte: u8) -> bool {
        self.midi_in.push(byte)
    }

    pub fn midi_in_read(&mut self) -> Option<(u8, bool)> {
        self.midi_in.pop()
    }

    /// Render `len` stereo samples into `left`/`right`, advancing every
    /// active slot's phase and envelope by one sample each (§2 per-frame
    /// data flow, §4.3.2).
    pub fn update(&mut self, scsp_ram: &[u8], left: &mut [i16], right: &mut [i16], len: usize) {
        for i in 0..len {
            let mut l = 0i32;
            let mut r = 0i32;
            for slot in &mut self.slots {
                if !slot.key_on {
                    continue;
                }
                slot.advance_phase();
                slot.tick_envelope();
                let sample = slot.render(scsp_ram) as i32;
                let (gl, gr) = slot.pan_gains();
                l += (sample as f32 * gl) as i32;
                r += (sample as f32 * gr) as i32;
            }
            left[i] = l.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
            right[i] = r.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
        }
    }

    /// Run the pending DMA descriptor (§4.3.4) if its execute flag is set.
    pub fn run_dma(&mut self, scsp_ram: &mut [u8]) -> bool {
        dma::run(&mut self.dma, scsp_ram, &mut self.dsp_regs)
    }

    /// Advance the three sample-rate timers by `new_samples` rendered
    /// samples, per §4.3.6, returning which interrupts fired.
    pub fn update_timer(&mut self, new_samples: f64) -> ScspEvents {
        let mut events = ScspEvents {
            timer_a: self.timers[0].advance(new_samples),
            timer_b: self.timers[1].advance(new_samples),
            timer_c: self.timers[2].advance(new_samples),
            sample: new_samples > 0.0,
            ..Default::default()
        };
        if !self.midi_in.is_empty() {
            events.midi_in = true;
        }
        if self.midi_out.is_empty() {
            events.midi_out_empty = true;
        }
        events
    }
}

impl Default for Scsp {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kyonex_applies_pending_key_on_to_all_slots() {
        let mut scsp = Scsp::new();
        scsp.write_register(0x00, Width::Word, 0x4000); // slot 0: KYONB=1
        scsp.write_register(0x00, Width::Word, 0xC000); // KYONB=1, KYONEX=1
        assert!(scsp.slots[0].key_on);
        assert_eq!(scsp.slots[0].envelope.phase, envelope::EnvPhase::Attack);
    }

    #[test]
    fn repeated_key_on_to_an_already_pressed_slot_is_a_no_op() {
        let mut scsp = Scsp::new();
        scsp.write_register(0x00, Width::Word, 0x4000); // KYONB=1
        scsp.write_register(0x00, Width::Word, 0xC000); // KYONEX=1: slot 0 keys on
        let ram = vec![0u8; 16];
        let mut l = [0i16; 8];
        let mut r = [0i16; 8];
        scsp.update(&ram, &mut l, &mut r, 8); // advance envelope past position 0

        let position_before = scsp.slots[0].envelope.position;
        scsp.write_register(0x00, Width::Word, 0xC000); // KYONB=1, KYONEX=1 again: already pressed
        assert_eq!(scsp.slots[0].envelope.position, position_before);
    }

    #[test]
    fn update_produces_silence_with_no_active_slots() {
        let mut scsp = Scsp::new();
        let ram = vec![0u8; 16];
        let mut l = [0i16; 4];
        let mut r = [0i16; 4];
        scsp.update(&ram, &mut l, &mut r, 4);
        assert_eq!(l, [0, 0, 0, 0]);
        assert_eq!(r, [0, 0, 0, 0]);
    }
}
