use saturn_core::core::bus::PendingInterrupt;
use saturn_core::core::{Bus, BusMaster};

/// Minimal bus for exercising a single component in isolation: one flat
/// 1 MiB RAM region plus separate VRAM/CRAM/SCSP-RAM regions sized small
/// enough for a test fixture, with manually injectable interrupts instead
/// of a full `InterruptController`.
pub struct SaturnTestBus {
    pub ram: Vec<u8>,
    pub vdp2_vram: Vec<u8>,
    pub vdp2_cram: Vec<u8>,
    pub scsp_ram: Vec<u8>,
    pending_interrupt: Option<PendingInterrupt>,
}

pub const RAM_BASE: u32 = 0x0000_0000;
pub const VRAM_BASE: u32 = 0x0100_0000;
pub const CRAM_BASE: u32 = 0x0200_0000;
pub const SCSP_RAM_BASE: u32 = 0x0300_0000;

impl SaturnTestBus {
    pub fn new() -> Self {
        Self {
            ram: vec![0u8; 0x10_0000],
            vdp2_vram: vec![0u8; 0x8_0000],
            vdp2_cram: vec![0u8; 0x1000],
            scsp_ram: vec![0u8; 0x8_0000],
            pending_interrupt: None,
        }
    }

    pub fn load(&mut self, addr: u32, data: &[u8]) {
        let start = addr as usize;
        self.ram[start..start + data.len()].copy_from_slice(data);
    }

    pub fn raise(&mut self, level: u8, vector: u8) {
        self.pending_interrupt = Some(PendingInterrupt { level, vector });
    }

    fn region_mut(&mut self, addr: u32) -> (&mut [u8], u32) {
        match addr {
            RAM_BASE..=0x000F_FFFF => (&mut self.ram, RAM_BASE),
            VRAM_BASE..=0x017F_FFFF => (&mut self.vdp2_vram, VRAM_BASE),
            CRAM_BASE..=0x2000_0FFF => (&mut self.vdp2_cram, CRAM_BASE),
            SCSP_RAM_BASE..=0x307F_FFFF => (&mut self.scsp_ram, SCSP_RAM_BASE),
            _ => (&mut self.ram, RAM_BASE),
        }
    }
}

impl Default for SaturnTestBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for SaturnTestBus {
    fn read8(&mut self, _master: BusMaster, addr: u32) -> u8 {
        let (region, base) = self.region_mut(addr);
        let offset = (addr - base) as usize % region.len().max(1);
        region[offset]
    }

    fn read16(&mut self, master: BusMaster, addr: u32) -> u16 {
        let hi = self.read8(master, addr) as u16;
        let lo = self.read8(master, addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    fn read32(&mut self, master: BusMaster, addr: u32) -> u32 {
        let hi = self.read16(master, addr) as u32;
        let lo = self.read16(master, addr.wrapping_add(2)) as u32;
        (hi << 16) | lo
    }

    fn write8(&mut self, _master: BusMaster, addr: u32, data: u8) {
        let (region, base) = self.region_mut(addr);
        let offset = (addr - base) as usize % region.len().max(1);
        region[offset] = data;
    }

    fn write16(&mut self, master: BusMaster, addr: u32, data: u16) {
        self.write8(master, addr, (data >> 8) as u8);
        self.write8(master, addr.wrapping_add(1), data as u8);
    }

    fn write32(&mut self, master: BusMaster, addr: u32, data: u32) {
        self.write16(master, addr, (data >> 16) as u16);
        self.write16(master, addr.wrapping_add(2), data as u16);
    }

    fn check_interrupts(&self, _master: BusMaster) -> Option<PendingInterrupt> {
        self.pending_interrupt
    }

    fn acknowledge_interrupt(&mut self, _master: BusMaster, _vector: u8) {
        self.pending_interrupt = None;
    }
}
