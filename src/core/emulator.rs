//! Top-level emulator: owns both SH2 cores, the system bus, the VDP2 and
//! SCSP components, and the line pacer that drives them all, and exposes
//! the host-facing API (§6.1).
//!
//! Per §9 ("no cyclic references"), `MemoryBus` cannot hold a reference
//! back to `Scsp`/`Vdp2`, so CPU writes into their register windows land
//! in raw byte buffers on the bus; only here, where `Emulator` can see
//! every component at once, do those buffers get decoded into typed
//! state via `sync_from_regs`.

use crate::core::bus::{Bus, BusMaster};
use crate::core::config::Config;
use crate::core::error::EmulatorError;
use crate::core::interrupt::{InterruptSource, InterruptTarget};
use crate::core::memory::MemoryBus;
use crate::core::pacer::{LineEvent, Pacer};
use crate::core::savestate::SaveState;
use crate::cpu::sh2::DebugStatus;
use crate::cpu::{Cpu, CpuStateTrait, Sh2};
use crate::scsp::Scsp;
use crate::vdp2::scroll_screen::ScrollScreen;
use crate::vdp2::{RenderPart, Vdp2};

/// Cartridge ROM window size, matching `MemoryBus`'s CS0 address range.
const MAX_ROM_SIZE: usize = 0x0200_0000;

/// Result of one [`Emulator::step`] call: whether a VBlank-in boundary was
/// crossed (the host's cue to read `get_render_parts`) and the audio
/// samples rendered during this step, ready to hand to the host's sink.
pub struct StepResult<'a> {
    pub vblank_fired: bool,
    pub audio_samples: &'a [(i16, i16)],
}

#[derive(Debug)]
pub struct Emulator {
    config: Config,
    bus: MemoryBus,
    master_cpu: Sh2,
    slave_cpu: Sh2,
    scsp: Scsp,
    vdp2: Vdp2,
    pacer: Pacer,
    audio_buffer: Vec<(i16, i16)>,
    /// Fractional leftover samples-per-line, so non-integer
    /// cycles-per-sample ratios don't drift the sample rate over time.
    sample_accum: f64,
}

impl Emulator {
    pub fn init(rom: &[u8], config: Config) -> Result<Self, EmulatorError> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(EmulatorError::RomTooLarge { len: rom.len(), max: MAX_ROM_SIZE });
        }

        let mut bus = MemoryBus::new(&config);
        bus.load_rom(rom.to_vec());

        let mut master_cpu = Sh2::new(BusMaster::MasterSh2);
        let mut slave_cpu = Sh2::new(BusMaster::SlaveSh2);
        master_cpu.reset(&mut bus);
        slave_cpu.reset(&mut bus);

        let pacer = Pacer::new(&config);
        let vdp2 = Vdp2::new(config.parallel_decode);

        Ok(Self {
            config,
            bus,
            master_cpu,
            slave_cpu,
            scsp: Scsp::new(),
            vdp2,
            pacer,
            audio_buffer: Vec::new(),
            sample_accum: 0.0,
        })
    }

    /// Run both SH2 cores for approximately `cycles` master-clock cycles,
    /// in whole-scanline increments (§5): each line, both cores run their
    /// per-line budget, the SCSP/VDP2 register windows resync, SCSP DMA
    /// and timers advance, and audio renders for the samples that line's
    /// duration corresponds to. At VBlank-in the VDP2 recomputes its
    /// render-part cache for the frame the host is about to display.
    pub fn step(&mut self, cycles: u32) -> StepResult<'_> {
        self.audio_buffer.clear();
        let mut vblank_fired = false;
        let mut remaining = cycles as i64;

        while remaining > 0 {
            let event = self.pacer.step_line(&mut self.master_cpu, &mut self.slave_cpu, &mut self.bus);
            remaining -= self.pacer.cycles_per_line() as i64;

            self.scsp.sync_from_regs(&mut self.bus.scsp_regs);
            if self.scsp.run_dma(&mut self.bus.scsp_ram) {
                self.bus.raise_interrupt(InterruptTarget::BOTH, InterruptSource::ScspDmaEnd);
            }

            self.render_audio_for_line();

            if event == LineEvent::VBlankIn {
                vblank_fired = true;
                self.vdp2.populate_render_data(&self.bus.vdp2_vram, &self.bus.vdp2_regs);
            }
        }

        StepResult { vblank_fired, audio_samples: &self.audio_buffer }
    }

    fn render_audio_for_line(&mut self) {
        let samples_per_cycle = self.config.sample_rate_hz as f64 / self.config.master_clock_hz as f64;
        self.sample_accum += self.pacer.cycles_per_line() as f64 * samples_per_cycle;
        let whole = self.sample_accum.floor();
        self.sample_accum -= whole;
        let sample_count = whole as usize;
        if sample_count == 0 {
            return;
        }

        let mut left = vec![0i16; sample_count];
        let mut right = vec![0i16; sample_count];
        self.scsp.update(&self.bus.scsp_ram, &mut left, &mut right, sample_count);
        self.audio_buffer.extend(left.into_iter().zip(right));

        let events = self.scsp.update_timer(sample_count as f64);
        if events.timer_a {
            self.bus.raise_interrupt(InterruptTarget::BOTH, InterruptSource::ScspTimerA);
        }
        if events.timer_b {
            self.bus.raise_interrupt(InterruptTarget::BOTH, InterruptSource::ScspTimerB);
        }
        if events.timer_c {
            self.bus.raise_interrupt(InterruptTarget::BOTH, InterruptSource::ScspTimerC);
        }
        if events.midi_in {
            self.bus.raise_interrupt(InterruptTarget::BOTH, InterruptSource::ScspMidiIn);
        }
        if events.midi_out_empty {
            self.bus.raise_interrupt(InterruptTarget::BOTH, InterruptSource::ScspMidiOutEmpty);
        }
        if events.sample {
            self.bus.raise_interrupt(InterruptTarget::BOTH, InterruptSource::ScspSample);
        }
    }

    pub fn read_memory(&mut self, addr: u32) -> u8 {
        self.bus.read8(BusMaster::MasterSh2, addr)
    }

    pub fn write_memory(&mut self, addr: u32, val: u8) {
        self.bus.write8(BusMaster::MasterSh2, addr, val);
    }

    /// Breakpoints target the master SH2: the core running the primary
    /// game program and the one Saturn development tools attach to.
    pub fn add_breakpoint(&mut self, pc: u32) {
        self.master_cpu.add_breakpoint(pc);
    }

    pub fn set_debug_status(&mut self, status: DebugStatus) {
        self.master_cpu.set_debug_status(status);
    }

    pub fn get_render_parts(&self, layer: ScrollScreen) -> &[RenderPart] {
        self.vdp2.get_render_parts(layer)
    }

    pub fn save_state(&self) -> SaveState {
        SaveState {
            master_cpu: self.master_cpu.snapshot(),
            slave_cpu: self.slave_cpu.snapshot(),
            work_ram_low: self.bus.work_ram_low.clone(),
            work_ram_high: self.bus.work_ram_high.clone(),
            vdp2_vram: self.bus.vdp2_vram.clone(),
            vdp2_cram: self.bus.vdp2_cram.clone(),
            scsp_ram: self.bus.scsp_ram.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_rom_is_rejected() {
        let rom = vec![0u8; MAX_ROM_SIZE + 1];
        let err = Emulator::init(&rom, Config::default()).unwrap_err();
        assert!(matches!(err, EmulatorError::RomTooLarge { .. }));
    }

    #[test]
    fn step_runs_at_least_one_line_and_reports_no_vblank_mid_frame() {
        let mut emu = Emulator::init(&[0u8; 16], Config::default()).unwrap();
        let result = emu.step(100);
        assert!(!result.vblank_fired);
    }

    #[test]
    fn vblank_fires_after_a_full_frame_of_cycles() {
        let config = Config::default();
        let mut emu = Emulator::init(&[0u8; 16], config.clone()).unwrap();
        let cycles_per_frame = config.master_clock_hz / 60;
        let result = emu.step(cycles_per_frame as u32);
        assert!(result.vblank_fired);
    }
}
