//! `MOV` family: register moves, immediate loads, indexed/displacement
//! addressing, and the GBR/PC-relative forms (§4.2.6).

use crate::core::bus::Bus;

use super::Sh2;
use super::dispatch::{imm8, m, n};

pub fn movi(s: &mut Sh2, _bus: &mut dyn Bus) {
    let rn = n(s.current_opcode);
    s.r[rn] = imm8(s.current_opcode) as i8 as i32 as u32;
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn movwi(s: &mut Sh2, bus: &mut dyn Bus) {
    let rn = n(s.current_opcode);
    let disp = imm8(s.current_opcode) * 2;
    let addr = s.pc.wrapping_add(4).wrapping_add(disp);
    s.r[rn] = bus.read16(s.master, addr) as i16 as i32 as u32;
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn movli(s: &mut Sh2, bus: &mut dyn Bus) {
    let rn = n(s.current_opcode);
    let disp = imm8(s.current_opcode) * 4;
    let addr = (s.pc.wrapping_add(4) & !3).wrapping_add(disp);
    s.r[rn] = bus.read32(s.master, addr);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn mov_rr(s: &mut Sh2, _bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    s.r[rn] = s.r[rm];
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn movbs(s: &mut Sh2, bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    bus.write8(s.master, s.r[rn], s.r[rm] as u8);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn movws(s: &mut Sh2, bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    bus.write16(s.master, s.r[rn], s.r[rm] as u16);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn movls(s: &mut Sh2, bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    bus.write32(s.master, s.r[rn], s.r[rm]);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn movbl(s: &mut Sh2, bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    s.r[rn] = bus.read8(s.master, s.r[rm]) as i8 as i32 as u32;
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn movwl(s: &mut Sh2, bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    s.r[rn] = bus.read16(s.master, s.r[rm]) as i16 as i32 as u32;
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn movll(s: &mut Sh2, bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    s.r[rn] = bus.read32(s.master, s.r[rm]);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn movbm(s: &mut Sh2, bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    let addr = s.r[rn].wrapping_sub(1);
    bus.write8(s.master, addr, s.r[rm] as u8);
    s.r[rn] = addr;
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn movwm(s: &mut Sh2, bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    let addr = s.r[rn].wrapping_sub(2);
    bus.write16(s.master, addr, s.r[rm] as u16);
    s.r[rn] = addr;
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn movlm(s: &mut Sh2, bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    let addr = s.r[rn].wrapping_sub(4);
    bus.write32(s.master, addr, s.r[rm]);
    s.r[rn] = addr;
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn movbp(s: &mut Sh2, bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    let value = bus.read8(s.master, s.r[rm]) as i8 as i32 as u32;
    if rn != rm {
        s.r[rm] = s.r[rm].wrapping_add(1);
    }
    s.r[rn] = value;
    if rn == rm {
        s.r[rm] = s.r[rm].wrapping_add(1);
    }
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn movwp(s: &mut Sh2, bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    let value = bus.read16(s.master, s.r[rm]) as i16 as i32 as u32;
    if rn != rm {
        s.r[rm] = s.r[rm].wrapping_add(2);
    }
    s.r[rn] = value;
    if rn == rm {
        s.r[rm] = s.r[rm].wrapping_add(2);
    }
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn movlp(s: &mut Sh2, bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    let value = bus.read32(s.master, s.r[rm]);
    if rn != rm {
        s.r[rm] = s.r[rm].wrapping_add(4);
    }
    s.r[rn] = value;
    if rn == rm {
        s.r[rm] = s.r[rm].wrapping_add(4);
    }
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn movbs0(s: &mut Sh2, bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    bus.write8(s.master, s.r[rn].wrapping_add(s.r[0]), s.r[rm] as u8);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn movws0(s: &mut Sh2, bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    bus.write16(s.master, s.r[rn].wrapping_add(s.r[0]), s.r[rm] as u16);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn movls0(s: &mut Sh2, bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    bus.write32(s.master, s.r[rn].wrapping_add(s.r[0]), s.r[rm]);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn movbl0(s: &mut Sh2, bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    s.r[rn] = bus.read8(s.master, s.r[rm].wrapping_add(s.r[0])) as i8 as i32 as u32;
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn movwl0(s: &mut Sh2, bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    s.r[rn] = bus.read16(s.master, s.r[rm].wrapping_add(s.r[0])) as i16 as i32 as u32;
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn movll0(s: &mut Sh2, bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    s.r[rn] = bus.read32(s.master, s.r[rm].wrapping_add(s.r[0]));
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn movbs4(s: &mut Sh2, bus: &mut dyn Bus) {
    let rm = m(s.current_opcode);
    let disp = (s.current_opcode & 0x000F) as u32;
    bus.write8(s.master, s.r[rm].wrapping_add(disp), s.r[0] as u8);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn movws4(s: &mut Sh2, bus: &mut dyn Bus) {
    let rm = m(s.current_opcode);
    let disp = ((s.current_opcode & 0x000F) as u32) * 2;
    bus.write16(s.master, s.r[rm].wrapping_add(disp), s.r[0] as u16);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn movls4(s: &mut Sh2, bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    let disp = ((s.current_opcode & 0x000F) as u32) * 4;
    bus.write32(s.master, s.r[rn].wrapping_add(disp), s.r[rm]);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn movbl4(s: &mut Sh2, bus: &mut dyn Bus) {
    let rm = m(s.current_opcode);
    let disp = (s.current_opcode & 0x000F) as u32;
    s.r[0] = bus.read8(s.master, s.r[rm].wrapping_add(disp)) as i8 as i32 as u32;
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn movwl4(s: &mut Sh2, bus: &mut dyn Bus) {
    let rm = m(s.current_opcode);
    let disp = ((s.current_opcode & 0x000F) as u32) * 2;
    s.r[0] = bus.read16(s.master, s.r[rm].wrapping_add(disp)) as i16 as i32 as u32;
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn movll4(s: &mut Sh2, bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    let disp = ((s.current_opcode & 0x000F) as u32) * 4;
    s.r[rn] = bus.read32(s.master, s.r[rm].wrapping_add(disp));
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn movbsg(s: &mut Sh2, bus: &mut dyn Bus) {
    let disp = imm8(s.current_opcode);
    bus.write8(s.master, s.gbr.wrapping_add(disp), s.r[0] as u8);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn movwsg(s: &mut Sh2, bus: &mut dyn Bus) {
    let disp = imm8(s.current_opcode) * 2;
    bus.write16(s.master, s.gbr.wrapping_add(disp), s.r[0] as u16);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn movlsg(s: &mut Sh2, bus: &mut dyn Bus) {
    let disp = imm8(s.current_opcode) * 4;
    bus.write32(s.master, s.gbr.wrapping_add(disp), s.r[0]);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn movblg(s: &mut Sh2, bus: &mut dyn Bus) {
    let disp = imm8(s.current_opcode);
    s.r[0] = bus.read8(s.master, s.gbr.wrapping_add(disp)) as i8 as i32 as u32;
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn movwlg(s: &mut Sh2, bus: &mut dyn Bus) {
    let disp = imm8(s.current_opcode) * 2;
    s.r[0] = bus.read16(s.master, s.gbr.wrapping_add(disp)) as i16 as i32 as u32;
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn movllg(s: &mut Sh2, bus: &mut dyn Bus) {
    let disp = imm8(s.current_opcode) * 4;
    s.r[0] = bus.read32(s.master, s.gbr.wrapping_add(disp));
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

/// MOVA: compute a PC-relative word address into R0 for subsequent table
/// lookups (jump tables, literal pools).
pub fn mova(s: &mut Sh2, _bus: &mut dyn Bus) {
    let disp = imm8(s.current_opcode) * 4;
    s.r[0] = (s.pc.wrapping_add(4) & !3).wrapping_add(disp);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn movt(s: &mut Sh2, _bus: &mut dyn Bus) {
    let rn = n(s.current_opcode);
    s.r[rn] = s.sr.t() as u32;
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}
