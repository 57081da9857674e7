//! Saturn system bus: address decoding across work RAM, VDP2 VRAM/color
//! RAM, SCSP RAM, and the register banks the VDP2/SCSP modules publish
//! (§3.3, §4.3, §4.7).
//!
//! VRAM and color RAM writes are tracked with a per-page dirty bitmap so
//! the VDP2 render path (§4.7) can skip re-decoding pattern/character data
//! that hasn't changed since the last frame, mirroring the texture-cache
//! invalidation strategy described in §4.8.

use std::collections::HashSet;

use super::bus::{Bus, BusMaster, PendingInterrupt};
use super::config::Config;
use super::interrupt::{InterruptController, InterruptSource, InterruptTarget};

/// VRAM dirty tracking granularity: one page per 2 KiB, matching the
/// VDP2's own page size for NBG/RBG plane data (§3.3).
const VRAM_PAGE_SIZE: usize = 2048;

#[derive(Debug)]
pub struct MemoryBus {
    pub work_ram_low: Box<[u8]>,
    pub work_ram_high: Box<[u8]>,
    pub cart_rom: Vec<u8>,
    pub vdp2_vram: Box<[u8]>,
    pub vdp2_cram: Box<[u8]>,
    pub scsp_ram: Box<[u8]>,
    /// Raw SCSP register window (§4.4): decoded into [`crate::scsp::Scsp`]
    /// state by periodic resync rather than per-write interception, since
    /// the bus has no reference back to the component that owns the
    /// semantics (§9 "no cyclic references").
    pub scsp_regs: Box<[u8]>,
    /// Raw VDP2 register window (§6.2), decoded the same way.
    pub vdp2_regs: Box<[u8]>,

    vram_dirty_pages: Vec<bool>,
    cram_dirty: bool,

    pub interrupts: InterruptController,

    warned_addrs: HashSet<u32>,
}

impl MemoryBus {
    pub fn new(config: &Config) -> Self {
        let vram_len = config.vram_size.bytes();
        let cram_len =
            (config.color_ram_mode.entry_count() * config.color_ram_mode.access_width_bytes()) as usize;
        let page_count = vram_len.div_ceil(VRAM_PAGE_SIZE);

        Self {
            work_ram_low: vec![0u8; 0x0010_0000].into_boxed_slice(),
            work_ram_high: vec![0u8; 0x0010_0000].into_boxed_slice(),
            cart_rom: Vec::new(),
            vdp2_vram: vec![0u8; vram_len].into_boxed_slice(),
            vdp2_cram: vec![0u8; cram_len].into_boxed_slice(),
            scsp_ram: vec![0u8; config.scsp_ram_size].into_boxed_slice(),
            scsp_regs: vec![0u8; 0x1000].into_boxed_slice(),
            vdp2_regs: vec![0u8; 0x200].into_boxed_slice(),
            vram_dirty_pages: vec![false; page_count],
            cram_dirty: false,
            interrupts: InterruptController::new(),
            warned_addrs: HashSet::new(),
        }
    }

    /// Install a cartridge/boot ROM image, truncated to the CS0 window.
    pub fn load_rom(&mut self, rom: Vec<u8>) {
        self.cart_rom = rom;
    }

    /// Pages touched since the last call to [`Self::clear_vram_dirty`].
    pub fn dirty_vram_pages(&self) -> impl Iterator<Item = usize> + '_ {
        self.vram_dirty_pages
            .iter()
            .enumerate()
            .filter(|&(_, &d)| d)
            .map(|(i, _)| i)
    }

    pub fn clear_vram_dirty(&mut self) {
        self.vram_dirty_pages.iter_mut().for_each(|d| *d = false);
    }

    pub fn cram_dirty(&self) -> bool {
        self.cram_dirty
    }

    pub fn clear_cram_dirty(&mut self) {
        self.cram_dirty = false;
    }

    fn mark_vram_dirty(&mut self, addr: usize, len: usize) {
        let first = addr / VRAM_PAGE_SIZE;
        let last = (addr + len.saturating_sub(1)) / VRAM_PAGE_SIZE;
        for page in first..=last {
            if let Some(d) = self.vram_dirty_pages.get_mut(page) {
                *d = true;
            }
        }
    }

    fn warn_once(&mut self, addr: u32, op: &str) {
        if self.warned_addrs.insert(addr) {
            log::warn!("memory: unimplemented register {op} at {addr:#010x}");
        }
    }

    /// Raise a bus-level interrupt source on the given target(s); exposed
    /// so the VDP2/SCSP modules can signal VBlank-in, timer expiry, etc.
    pub fn raise_interrupt(&mut self, target: InterruptTarget, source: InterruptSource) {
        self.interrupts.raise(target, source);
    }
}

const LOW_WRAM_BASE: u32 = 0x0020_0000;
const LOW_WRAM_MASK: u32 = 0x000F_FFFF;
const HIGH_WRAM_BASE: u32 = 0x0600_0000;
const HIGH_WRAM_MASK: u32 = 0x000F_FFFF;
const CART_ROM_BASE: u32 = 0x0200_0000;
const VDP2_VRAM_BASE: u32 = 0x0500_0000;
const VDP2_VRAM_TOP: u32 = 0x057F_FFFF;
const VDP2_CRAM_BASE: u32 = 0x05F0_0000;
const VDP2_CRAM_TOP: u32 = 0x05F7_FFFF;
const VDP2_REG_BASE: u32 = 0x05F8_0000;
const VDP2_REG_TOP: u32 = 0x05FB_FFFF;
const SCSP_RAM_BASE: u32 = 0x0580_0000;
const SCSP_REG_BASE: u32 = 0x0590_0000;
const SCSP_REG_TOP: u32 = 0x0590_0FFF;

impl Bus for MemoryBus {
    fn read8(&mut self, master: BusMaster, addr: u32) -> u8 {
        match addr {
            LOW_WRAM_BASE..=0x002F_FFFF => self.work_ram_low[(addr & LOW_WRAM_MASK) as usize],
            HIGH_WRAM_BASE..=0x060F_FFFF => self.work_ram_high[(addr & HIGH_WRAM_MASK) as usize],
            CART_ROM_BASE..=0x03FF_FFFF => {
                let offset = (addr - CART_ROM_BASE) as usize;
                self.cart_rom.get(offset).copied().unwrap_or(0)
            }
            VDP2_VRAM_BASE..=VDP2_VRAM_TOP => {
                let offset = (addr - VDP2_VRAM_BASE) as usize;
                self.vdp2_vram.get(offset).copied().unwrap_or(0)
            }
            VDP2_CRAM_BASE..=VDP2_CRAM_TOP => {
                let offset = (addr - VDP2_CRAM_BASE) as usize % self.vdp2_cram.len().max(1);
                self.vdp2_cram.get(offset).copied().unwrap_or(0)
            }
            SCSP_RAM_BASE..=0x058F_FFFF => {
                let offset = (addr - SCSP_RAM_BASE) as usize % self.scsp_ram.len().max(1);
                self.scsp_ram[offset]
            }
            SCSP_REG_BASE..=SCSP_REG_TOP => {
                let offset = (addr - SCSP_REG_BASE) as usize % self.scsp_regs.len().max(1);
                self.scsp_regs[offset]
            }
            VDP2_REG_BASE..=VDP2_REG_TOP => {
                let offset = (addr - VDP2_REG_BASE) as usize % self.vdp2_regs.len().max(1);
                self.vdp2_regs[offset]
            }
            _ => {
                self.warn_once(addr, "read");
                let _ = master;
                0
            }
        }
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

    fn write8(&mut self, master: BusMaster, addr: u32, data: u8) {
        match addr {
            LOW_WRAM_BASE..=0x002F_FFFF => {
                self.work_ram_low[(addr & LOW_WRAM_MASK) as usize] = data;
            }
            HIGH_WRAM_BASE..=0x060F_FFFF => {
                self.work_ram_high[(addr & HIGH_WRAM_MASK) as usize] = data;
            }
            VDP2_VRAM_BASE..=VDP2_VRAM_TOP => {
                let offset = (addr - VDP2_VRAM_BASE) as usize;
                if offset < self.vdp2_vram.len() {
                    self.vdp2_vram[offset] = data;
                    self.mark_vram_dirty(offset, 1);
                }
            }
            VDP2_CRAM_BASE..=VDP2_CRAM_TOP => {
                let len = self.vdp2_cram.len().max(1);
                let offset = (addr - VDP2_CRAM_BASE) as usize % len;
                self.vdp2_cram[offset] = data;
                self.cram_dirty = true;
            }
            SCSP_RAM_BASE..=0x058F_FFFF => {
                let len = self.scsp_ram.len().max(1);
                let offset = (addr - SCSP_RAM_BASE) as usize % len;
                self.scsp_ram[offset] = data;
            }
            SCSP_REG_BASE..=SCSP_REG_TOP => {
                let len = self.scsp_regs.len().max(1);
                let offset = (addr - SCSP_REG_BASE) as usize % len;
                self.scsp_regs[offset] = data;
            }
            VDP2_REG_BASE..=VDP2_REG_TOP => {
                let len = self.vdp2_regs.len().max(1);
                let offset = (addr - VDP2_REG_BASE) as usize % len;
                self.vdp2_regs[offset] = data;
            }
            _ => {
                self.warn_once(addr, "write");
                let _ = master;
            }
        }
    }

    fn write16(&mut self, master: BusMaster, addr: u32, data: u16) {
        self.write8(master, addr, (data >> 8) as u8);
        self.write8(master, addr.wrapping_add(1), data as u8);
    }

    fn write32(&mut self, master: BusMaster, addr: u32, data: u32) {
        self.write16(master, addr, (data >> 16) as u16);
        self.write16(master, addr.wrapping_add(2), data as u16);
    }

    fn check_interrupts(&self, master: BusMaster) -> Option<PendingInterrupt> {
        self.interrupts.highest_priority(master, 0)
    }

    fn acknowledge_interrupt(&mut self, master: BusMaster, vector: u8) {
        self.interrupts.acknowledge(master, vector);
    }
}
