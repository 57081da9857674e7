//! Line/frame pacer (§4.5, §5): keeps both SH2 cores roughly in lockstep
//! with video timing by running each core for a fixed cycle budget per
//! scanline, then raising HBlank-in/VBlank-in/VBlank-out at the
//! appropriate lines.
//!
//! This is intentionally not cycle-accurate DRAM/VDP1/VDP2 bus contention
//! modeling (out of scope, §1 Non-goals) — it exists so `Emulator::step`
//! has a well-defined unit of work and so VBlank-driven guest code (the
//! overwhelming majority of Saturn titles) sees interrupts land on the
//! expected lines.

use super::config::{Config, TvStandard};
use super::interrupt::{InterruptSource, InterruptTarget};
use super::memory::MemoryBus;
use crate::cpu::Sh2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEvent {
    /// Ordinary scanline; no interrupt raised this line.
    None,
    HBlankIn,
    VBlankIn,
    VBlankOut,
}

#[derive(Debug)]
pub struct Pacer {
    lines_per_frame: u32,
    vblank_start_line: u32,
    cycles_per_line: u64,
    current_line: u32,
}

impl Pacer {
    pub fn new(config: &Config) -> Self {
        let (lines_per_frame, vblank_start_line, fps) = match config.tv_standard {
            TvStandard::Ntsc => (262, 224, 60),
            TvStandard::Pal => (313, 256, 50),
        };
        let cycles_per_line =
            config.master_clock_hz / (lines_per_frame as u64 * fps as u64);
        Self {
            lines_per_frame,
            vblank_start_line,
            cycles_per_line,
            current_line: 0,
        }
    }

    pub fn current_line(&self) -> u32 {
        self.current_line
    }

    pub fn cycles_per_line(&self) -> u64 {
        self.cycles_per_line
    }

    /// Run both cores for one scanline's worth of cycles and report which
    /// video event occurred at the line just completed. Interrupts for
    /// that event are raised on `bus` before returning.
    pub fn step_line(&mut self, master: &mut Sh2, slave: &mut Sh2, bus: &mut MemoryBus) -> LineEvent {
        run_budget(master, bus, self.cycles_per_line);
        run_budget(slave, bus, self.cycles_per_line);

        bus.raise_interrupt(InterruptTarget::BOTH, InterruptSource::HBlankIn);

        let event = if self.current_line == self.vblank_start_line {
            bus.raise_interrupt(InterruptTarget::BOTH, InterruptSource::VBlankIn);
            LineEvent::VBlankIn
        } else if self.current_line == 0 {
            bus.raise_interrupt(InterruptTarget::BOTH, InterruptSource::VBlankOut);
            LineEvent::VBlankOut
        } else {
            LineEvent::HBlankIn
        };

        self.current_line = (self.current_line + 1) % self.lines_per_frame;
        event
    }
}

fn run_budget(cpu: &mut Sh2, bus: &mut MemoryBus, budget: u64) {
    let mut spent = 0u64;
    while spent < budget {
        if cpu.is_stopped() {
            break;
        }
        spent += cpu.step(bus) as u64;
    }
}
