//! Generic memory bus interface shared by the SH2 cores, the SCSP's DMA
//! engine, and the VDP2/VDP1 VRAM ports.
//!
//! Unlike an 8-bit-only bus, the Saturn's SH2 address space is accessed at
//! three widths (byte/word/long); callers pick the matching method rather
//! than going through a generic associated `Data` type, since `u8`/`u16`/
//! `u32` share no numeric trait worth abstracting over here.

/// Identifies who is driving the current bus cycle (for contention and
/// interrupt-targeting purposes). The Saturn has two SH2 cores sharing one
/// system bus, plus the SCSP's own DMA engine moving bytes between SCSP RAM
/// and its register file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusMaster {
    /// Master SH2 (drives the SCU, owns VDP1/VDP2 command lists).
    MasterSh2,
    /// Slave SH2 (cooperates with the master via shared work RAM).
    SlaveSh2,
    /// SCSP-internal DMA engine moving data between SCSP RAM and registers.
    ScspDma,
}

/// One pending interrupt as seen by a CPU: a priority level (0 = never
/// delivered, 1-15 = increasing priority) and the vector number used to
/// index `vbr + vector * 4`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingInterrupt {
    pub level: u8,
    pub vector: u8,
}

/// Generic bus interface. Implemented by the Saturn `MemoryBus` and by
/// lightweight test harnesses (`tests/common`) that only need a flat RAM
/// region to exercise a single component in isolation.
pub trait Bus {
    fn read8(&mut self, master: BusMaster, addr: u32) -> u8;
    fn read16(&mut self, master: BusMaster, addr: u32) -> u16;
    fn read32(&mut self, master: BusMaster, addr: u32) -> u32;

    fn write8(&mut self, master: BusMaster, addr: u32, data: u8);
    fn write16(&mut self, master: BusMaster, addr: u32, data: u16);
    fn write32(&mut self, master: BusMaster, addr: u32, data: u32);

    /// Highest-priority pending interrupt for `master`, already masked
    /// against that CPU's current interrupt-mask level (SR.I). `None` if
    /// nothing is deliverable right now.
    fn check_interrupts(&self, master: BusMaster) -> Option<PendingInterrupt>;

    /// Acknowledge the given source as serviced (clears its pending latch
    /// in the interrupt controller). Invoked right after a CPU accepts an
    /// interrupt, per §4.2.5 — not at RTE time.
    fn acknowledge_interrupt(&mut self, master: BusMaster, vector: u8);
}
