//! C1 — SH2 interpreter (§4.2).
//!
//! Instruction-accurate (not pipeline-accurate, per spec Non-goals):
//! `step()` fetches one 16-bit opcode, dispatches it through a flat
//! 65536-entry function-pointer table built once at process start
//! (`dispatch::lut()`), and reports the nominal cycle count for that
//! opcode. Branch handlers with delay slots execute the slot instruction
//! inline via [`delay_slot::execute_delay_slot`] before returning.

mod alu;
mod branch;
pub mod dispatch;
mod load_store;
mod shift;
mod state;
mod system;

pub use state::{DebugStatus, InterruptLatch, StatusWord};

use std::collections::HashSet;

use crate::core::bus::{Bus, BusMaster};
use crate::core::component::{BusMasterComponent, Component};
use crate::cpu::{Cpu, CpuStateTrait};

/// Cache-through mirror address used by the reference implementation as
/// the reset vector's delay-slot sentinel. Delay-slot detection is
/// suppressed at this one address to avoid a false "illegal instruction
/// slot" immediately after power-on reset, when the slot following the
/// very first fetched instruction does not yet hold meaningful code.
pub const IGNORED_DELAY_SLOT_ADDRESS: u32 = 0x2000_0202;

/// Snapshot of SH2 register state for debugger/save-state consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sh2State {
    pub r: [u32; 16],
    pub pc: u32,
    pub pr: u32,
    pub gbr: u32,
    pub vbr: u32,
    pub mach: u32,
    pub macl: u32,
    pub sr: u32,
}

#[derive(Debug)]
pub struct Sh2 {
    pub r: [u32; 16],
    pub pc: u32,
    pub pr: u32,
    pub gbr: u32,
    pub vbr: u32,
    pub mach: u32,
    pub macl: u32,
    pub sr: StatusWord,

    pub current_opcode: u16,
    pub cycles_elapsed: u32,

    /// Shadow call stack (caller-pc, return-pc), advisory only (§3.1,
    /// §4.2.4). Never read by any correctness-affecting path.
    pub call_stack: Vec<(u32, u32)>,
    pub breakpoints: HashSet<u32>,
    pub debug_status: DebugStatus,
    pub interrupt_latch: InterruptLatch,

    /// Recorded call-stack depth when entering `WaitEndOfRoutine`, per
    /// §4.2.4.
    subroutine_wait_depth: Option<usize>,

    /// Which bus master identity this core presents (master or slave SH2).
    pub master: BusMaster,

    stopped: bool,
}

impl Default for Sh2 {
    fn default() -> Self {
        Self::new(BusMaster::MasterSh2)
    }
}

impl Sh2 {
    pub fn new(master: BusMaster) -> Self {
        Self {
            r: [0; 16],
            pc: 0,
            pr: 0,
            gbr: 0,
            vbr: 0,
            mach: 0,
            macl: 0,
            sr: StatusWord::default(),
            current_opcode: 0,
            cycles_elapsed: 0,
            call_stack: Vec::new(),
            breakpoints: HashSet::new(),
            debug_status: DebugStatus::Running,
            interrupt_latch: InterruptLatch::default(),
            subroutine_wait_depth: None,
            master,
            stopped: false,
        }
    }

    /// True once an illegal-in-delay-slot instruction has stopped
    /// emulation (§4.2.7); the pacer should not call `step()` again until
    /// a `reset()`.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn set_debug_status(&mut self, status: DebugStatus) {
        self.debug_status = status;
    }

    pub fn add_breakpoint(&mut self, pc: u32) {
        self.breakpoints.insert(pc);
    }

    /// Execute exactly one instruction (§4.2.2), including interrupt
    /// delivery and the pre-dispatch debug-state transition. Returns the
    /// number of cycles consumed; always >= 1 per §8.1 unless emulation is
    /// already stopped, in which case no work is done and 0 is returned.
    pub fn step(&mut self, bus: &mut dyn Bus) -> u32 {
        if self.stopped {
            return 0;
        }

        self.try_deliver_interrupt(bus);

        self.current_opcode = bus.read16(self.master, self.pc);

        match self.debug_status {
            DebugStatus::StepOver => {
                if dispatch::calls_subroutine(self.current_opcode) {
                    self.debug_status = DebugStatus::WaitEndOfRoutine;
                    self.subroutine_wait_depth = Some(self.call_stack.len());
                } else {
                    self.debug_status = DebugStatus::Paused;
                }
            }
            DebugStatus::StepInto => {
                self.debug_status = DebugStatus::Paused;
            }
            _ => {}
        }

        dispatch::lut()[self.current_opcode as usize](self, bus);

        if let (DebugStatus::WaitEndOfRoutine, Some(depth)) =
            (self.debug_status, self.subroutine_wait_depth)
        {
            if self.call_stack.len() <= depth {
                self.debug_status = DebugStatus::Paused;
                self.subroutine_wait_depth = None;
            }
        }

        if self.breakpoints.contains(&self.pc) {
            self.debug_status = DebugStatus::Paused;
            log::info!("sh2: breakpoint reached at pc={:#010x}", self.pc);
        }

        self.cycles_elapsed
    }

    /// Execute the instruction at `addr` as a delay slot (§4.2.3). Adds its
    /// cycle count on top of whatever the branch handler already set.
    pub(crate) fn execute_delay_slot(&mut self, bus: &mut dyn Bus, addr: u32) {
        let branch_cycles = self.cycles_elapsed;
        if addr == IGNORED_DELAY_SLOT_ADDRESS {
            return;
        }
        let slot_opcode = bus.read16(self.master, addr);
        if dispatch::illegal_in_delay_slot(slot_opcode) {
            log::error!("sh2: illegal instruction slot at pc={:#010x}", addr);
            self.stopped = true;
            return;
        }
        self.current_opcode = slot_opcode;
        dispatch::lut()[slot_opcode as usize](self, bus);
        self.cycles_elapsed += branch_cycles;
    }

    fn try_deliver_interrupt(&mut self, bus: &mut dyn Bus) {
        let Some(pending) = bus.check_interrupts(self.master) else {
            return;
        };
        if pending.level <= self.sr.imask() {
            return;
        }

        self.push(bus, self.sr.0);
        self.push(bus, self.pc);
        self.sr.set_imask(pending.level);
        self.pc = bus.read32(self.master, self.vbr.wrapping_add((pending.vector as u32) * 4));

        self.interrupt_latch.is_interrupted = true;
        self.interrupt_latch.current_source = Some(pending.vector);
        if (pending.level as usize) < 16 {
            self.interrupt_latch.per_level_interrupted[pending.level as usize] = true;
        }

        bus.acknowledge_interrupt(self.master, pending.vector);
    }

    pub(crate) fn push(&mut self, bus: &mut dyn Bus, value: u32) {
        self.r[15] = self.r[15].wrapping_sub(4);
        bus.write32(self.master, self.r[15], value);
    }

    pub(crate) fn pop(&mut self, bus: &mut dyn Bus) -> u32 {
        let value = bus.read32(self.master, self.r[15]);
        self.r[15] = self.r[15].wrapping_add(4);
        value
    }
}

impl CpuStateTrait for Sh2 {
    type Snapshot = Sh2State;

    fn snapshot(&self) -> Sh2State {
        Sh2State {
            r: self.r,
            pc: self.pc,
            pr: self.pr,
            gbr: self.gbr,
            vbr: self.vbr,
            mach: self.mach,
            macl: self.macl,
            sr: self.sr.0,
        }
    }
}

impl Component for Sh2 {
    fn tick(&mut self) -> bool {
        // Generic single-clock-domain ticking has no meaning for an
        // instruction-accurate core driven by `step()`; present for trait
        // uniformity with VDP2/SCSP only.
        true
    }
}

impl BusMasterComponent for Sh2 {
    type BusKind = dyn Bus;

    fn tick_with_bus(&mut self, bus: &mut (dyn Bus + 'static), _master: BusMaster) -> bool {
        self.step(bus) > 0
    }
}

impl Cpu for Sh2 {
    fn reset(&mut self, bus: &mut dyn Bus) {
        self.r = [0; 16];
        self.sr = StatusWord::default();
        self.sr.set_imask(0xF);
        self.mach = 0;
        self.macl = 0;
        self.gbr = 0;
        self.call_stack.clear();
        self.interrupt_latch = InterruptLatch::default();
        self.stopped = false;
        self.debug_status = DebugStatus::Running;
        self.vbr = 0;
        self.pr = 0;
        self.pc = bus.read32(self.master, 0);
        self.r[15] = bus.read32(self.master, 4);
    }

    fn is_sleeping(&self) -> bool {
        false
    }
}
