//! Interrupt controller (§2, §4.2.5): bitmask of pending/enabled interrupt
//! sources per CPU, selecting the highest-priority pending source for
//! delivery.
//!
//! The Saturn's SCU routes a fixed set of sources (VBlank-in/out,
//! HBlank-in, timer 0/1, SCSP sound request, DSP end, DMA end ×3, SPRITE
//! draw end, system manager, PAD, level-2/1/0 DMA, and eight software
//! vectors) to the master SH2; the slave SH2 only sees NMI and a narrower
//! subset via the SCU. This crate models the superset needed by C1/C3: an
//! independent 32-source table per `BusMaster`.

use crate::core::bus::{BusMaster, PendingInterrupt};

const SOURCE_COUNT: usize = 32;

/// A single interrupt source's static properties: priority level (1-15,
/// higher wins) and the vector number delivered to the CPU.
#[derive(Clone, Copy, Debug, Default)]
struct SourceConfig {
    level: u8,
    vector: u8,
}

/// Per-CPU interrupt state: which sources are pending, which are enabled,
/// and their configured level/vector.
#[derive(Clone, Debug)]
struct CpuInterrupts {
    pending: u32,
    enabled: u32,
    sources: [SourceConfig; SOURCE_COUNT],
}

impl Default for CpuInterrupts {
    fn default() -> Self {
        Self {
            pending: 0,
            enabled: 0,
            sources: [SourceConfig::default(); SOURCE_COUNT],
        }
    }
}

/// Well-known SCU interrupt sources relevant to the CORE subsystems. Only
/// the sources that C2/C3 raise themselves are named here; SMPC/CD-ROM/
/// 68000-originated sources are configured the same way by the (external)
/// host but are otherwise opaque to this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum InterruptSource {
    VBlankIn = 0,
    VBlankOut = 1,
    HBlankIn = 2,
    Timer0 = 3,
    Timer1 = 4,
    ScspSoundRequest = 5,
    ScspDmaEnd = 6,
    ScspTimerA = 7,
    ScspTimerB = 8,
    ScspTimerC = 9,
    ScspMidiIn = 10,
    ScspMidiOutEmpty = 11,
    ScspSample = 12,
}

/// Interrupt controller shared by both SH2 cores.
#[derive(Clone, Debug, Default)]
pub struct InterruptController {
    master: CpuInterrupts,
    slave: CpuInterrupts,
}

impl InterruptController {
    pub fn new() -> Self {
        let mut ic = Self::default();
        ic.configure_defaults();
        ic
    }

    /// Install the fixed level/vector pairs for the sources C2/C3 raise
    /// directly, matching the documented SCU interrupt table. Both CPUs
    /// use the same vector numbers; only the master SH2 is wired to the
    /// SCU's hardware vector lines on real silicon; the slave is modeled
    /// identically here so C3's "both CPUs" raises (§4.3.4, §4.3.6) have
    /// somewhere to land without special-casing.
    fn configure_defaults(&mut self) {
        let table: &[(InterruptSource, u8, u8)] = &[
            (InterruptSource::VBlankIn, 15, 0x40),
            (InterruptSource::VBlankOut, 14, 0x41),
            (InterruptSource::HBlankIn, 13, 0x42),
            (InterruptSource::Timer0, 12, 0x43),
            (InterruptSource::Timer1, 11, 0x44),
            (InterruptSource::ScspSoundRequest, 8, 0x46),
            (InterruptSource::ScspDmaEnd, 3, 0x47),
            (InterruptSource::ScspTimerA, 3, 0x48),
            (InterruptSource::ScspTimerB, 3, 0x49),
            (InterruptSource::ScspTimerC, 3, 0x4A),
            (InterruptSource::ScspMidiIn, 3, 0x4B),
            (InterruptSource::ScspMidiOutEmpty, 3, 0x4C),
            (InterruptSource::ScspSample, 3, 0x4D),
        ];
        for &(source, level, vector) in table {
            for cpu in [&mut self.master, &mut self.slave] {
                cpu.sources[source as usize] = SourceConfig { level, vector };
                cpu.enabled |= 1 << source as usize;
            }
        }
    }

    fn cpu_mut(&mut self, master: BusMaster) -> &mut CpuInterrupts {
        match master {
            BusMaster::MasterSh2 => &mut self.master,
            BusMaster::SlaveSh2 => &mut self.slave,
            BusMaster::ScspDma => &mut self.master, // DMA never services interrupts.
        }
    }

    fn cpu(&self, master: BusMaster) -> &CpuInterrupts {
        match master {
            BusMaster::MasterSh2 => &self.master,
            BusMaster::SlaveSh2 => &self.slave,
            BusMaster::ScspDma => &self.master,
        }
    }

    /// Raise `source` on `target`. `target` selects master, slave, or both
    /// (most SCSP-originated sources, per §4.3.4/§4.3.6, fire on both
    /// CPUs simultaneously).
    pub fn raise(&mut self, target: InterruptTarget, source: InterruptSource) {
        if target.master {
            self.master.pending |= 1 << source as usize;
        }
        if target.slave {
            self.slave.pending |= 1 << source as usize;
        }
    }

    /// Clear the pending latch for `source` on the given CPU. Called when
    /// the CPU accepts delivery (§4.2.5).
    pub fn acknowledge(&mut self, master: BusMaster, vector: u8) {
        let cpu = self.cpu_mut(master);
        for (i, src) in cpu.sources.iter().enumerate() {
            if src.vector == vector && cpu.pending & (1 << i) != 0 {
                cpu.pending &= !(1 << i);
                break;
            }
        }
    }

    /// Highest-priority pending+enabled source for `master`, masked
    /// against `sr_mask` (the CPU's SR.I 4-bit interrupt mask level: a
    /// source is deliverable only if its level exceeds the mask).
    pub fn highest_priority(&self, master: BusMaster, sr_mask: u8) -> Option<PendingInterrupt> {
        let cpu = self.cpu(master);
        let active = cpu.pending & cpu.enabled;
        (0..SOURCE_COUNT)
            .filter(|&i| active & (1 << i) != 0)
            .map(|i| cpu.sources[i])
            .filter(|s| s.level > sr_mask)
            .max_by_key(|s| s.level)
            .map(|s| PendingInterrupt {
                level: s.level,
                vector: s.vector,
            })
    }
}

/// Which CPU(s) an interrupt source targets when raised.
#[derive(Clone, Copy, Debug)]
pub struct InterruptTarget {
    pub master: bool,
    pub slave: bool,
}

impl InterruptTarget {
    pub const BOTH: InterruptTarget = InterruptTarget { master: true, slave: true };
    pub const MASTER: InterruptTarget = InterruptTarget { master: true, slave: false };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vblank_in_is_highest_priority_by_default() {
        let mut ic = InterruptController::new();
        ic.raise(InterruptTarget::MASTER, InterruptSource::Timer0);
        ic.raise(InterruptTarget::MASTER, InterruptSource::VBlankIn);
        let hit = ic.highest_priority(BusMaster::MasterSh2, 0).unwrap();
        assert_eq!(hit.vector, 0x40);
        assert_eq!(hit.level, 15);
    }

    #[test]
    fn sr_mask_suppresses_lower_levels() {
        let mut ic = InterruptController::new();
        ic.raise(InterruptTarget::MASTER, InterruptSource::ScspTimerA);
        assert!(ic.highest_priority(BusMaster::MasterSh2, 3).is_none());
        assert!(ic.highest_priority(BusMaster::MasterSh2, 2).is_some());
    }

    #[test]
    fn acknowledge_clears_pending_latch() {
        let mut ic = InterruptController::new();
        ic.raise(InterruptTarget::MASTER, InterruptSource::VBlankIn);
        ic.acknowledge(BusMaster::MasterSh2, 0x40);
        assert!(ic.highest_priority(BusMaster::MasterSh2, 0).is_none());
    }

    #[test]
    fn scsp_sources_fire_on_both_cpus() {
        let mut ic = InterruptController::new();
        ic.raise(InterruptTarget::BOTH, InterruptSource::ScspDmaEnd);
        assert!(ic.highest_priority(BusMaster::MasterSh2, 0).is_some());
        assert!(ic.highest_priority(BusMaster::SlaveSh2, 0).is_some());
    }
}
