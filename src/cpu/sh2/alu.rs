//! Arithmetic, logic, comparison and multiply-accumulate handlers (§4.2.6).

use crate::core::bus::Bus;

use super::Sh2;
use super::dispatch::{imm8, m, n};

pub fn add(s: &mut Sh2, _bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    s.r[rn] = s.r[rn].wrapping_add(s.r[rm]);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn addi(s: &mut Sh2, _bus: &mut dyn Bus) {
    let rn = n(s.current_opcode);
    let imm = imm8(s.current_opcode) as i8 as i32 as u32;
    s.r[rn] = s.r[rn].wrapping_add(imm);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn addc(s: &mut Sh2, _bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    let carry_in = s.sr.t() as u32;
    let (r1, c1) = s.r[rn].overflowing_add(s.r[rm]);
    let (r2, c2) = r1.overflowing_add(carry_in);
    s.r[rn] = r2;
    s.sr.set_t(c1 || c2);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn addv(s: &mut Sh2, _bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    let (src_n, src_m) = (s.r[rn] as i32, s.r[rm] as i32);
    let (result, overflow) = src_n.overflowing_add(src_m);
    s.r[rn] = result as u32;
    s.sr.set_t(overflow);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn sub(s: &mut Sh2, _bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    s.r[rn] = s.r[rn].wrapping_sub(s.r[rm]);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn subc(s: &mut Sh2, _bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    let borrow_in = s.sr.t() as u32;
    let (r1, b1) = s.r[rn].overflowing_sub(s.r[rm]);
    let (r2, b2) = r1.overflowing_sub(borrow_in);
    s.r[rn] = r2;
    s.sr.set_t(b1 || b2);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn subv(s: &mut Sh2, _bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    let (src_n, src_m) = (s.r[rn] as i32, s.r[rm] as i32);
    let (result, overflow) = src_n.overflowing_sub(src_m);
    s.r[rn] = result as u32;
    s.sr.set_t(overflow);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn mull(s: &mut Sh2, _bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    s.macl = s.r[rn].wrapping_mul(s.r[rm]);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 2;
}

pub fn muls(s: &mut Sh2, _bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    let result = (s.r[rn] as i16 as i32).wrapping_mul(s.r[rm] as i16 as i32);
    s.macl = result as u32;
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 2;
}

pub fn mulu(s: &mut Sh2, _bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    let result = (s.r[rn] as u16 as u32).wrapping_mul(s.r[rm] as u16 as u32);
    s.macl = result;
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 2;
}

pub fn dmuls(s: &mut Sh2, _bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    let result = (s.r[rm] as i32 as i64).wrapping_mul(s.r[rn] as i32 as i64);
    s.mach = (result >> 32) as u32;
    s.macl = result as u32;
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 2;
}

pub fn dmulu(s: &mut Sh2, _bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    let result = (s.r[rm] as u64).wrapping_mul(s.r[rn] as u64);
    s.mach = (result >> 32) as u32;
    s.macl = result as u32;
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 2;
}

/// DIV0S: initialize `Q`/`M`/`T` ahead of a `DIV1` loop.
pub fn div0s(s: &mut Sh2, _bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    s.sr.set_q(s.r[rn] & 0x8000_0000 != 0);
    s.sr.set_m(s.r[rm] & 0x8000_0000 != 0);
    s.sr.set_t(s.sr.q() != s.sr.m());
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn div0u(s: &mut Sh2, _bus: &mut dyn Bus) {
    s.sr.set_q(false);
    s.sr.set_m(false);
    s.sr.set_t(false);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

/// DIV1: one step of a 64-bit / 32-bit iterative division, called 32x by
/// guest code to perform a full division (§4.2.6).
pub fn div1(s: &mut Sh2, _bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    let old_q = s.sr.q();
    s.sr.set_q(s.r[rn] & 0x8000_0000 != 0);
    s.r[rn] = (s.r[rn] << 1) | (s.sr.t() as u32);

    let new_q;
    match (old_q, s.sr.m()) {
        (false, false) => {
            let prev = s.r[rn];
            s.r[rn] = s.r[rn].wrapping_sub(s.r[rm]);
            let borrowed = s.r[rn] > prev;
            new_q = s.sr.q() != borrowed;
        }
        (false, true) => {
            let prev = s.r[rn];
            s.r[rn] = s.r[rn].wrapping_add(s.r[rm]);
            let carried = s.r[rn] < prev;
            new_q = s.sr.q() == carried;
        }
        (true, false) => {
            let prev = s.r[rn];
            s.r[rn] = s.r[rn].wrapping_add(s.r[rm]);
            let carried = s.r[rn] < prev;
            new_q = s.sr.q() == carried;
        }
        (true, true) => {
            let prev = s.r[rn];
            s.r[rn] = s.r[rn].wrapping_sub(s.r[rm]);
            let borrowed = s.r[rn] > prev;
            new_q = s.sr.q() != borrowed;
        }
    }
    s.sr.set_q(new_q);
    s.sr.set_t(s.sr.q() == s.sr.m());
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn neg(s: &mut Sh2, _bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    s.r[rn] = 0u32.wrapping_sub(s.r[rm]);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn negc(s: &mut Sh2, _bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    let (r1, b1) = 0u32.overflowing_sub(s.r[rm]);
    let (r2, b2) = r1.overflowing_sub(s.sr.t() as u32);
    s.r[rn] = r2;
    s.sr.set_t(b1 || b2);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn exts_b(s: &mut Sh2, _bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    s.r[rn] = s.r[rm] as i8 as i32 as u32;
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn exts_w(s: &mut Sh2, _bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    s.r[rn] = s.r[rm] as i16 as i32 as u32;
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn extu_b(s: &mut Sh2, _bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    s.r[rn] = s.r[rm] & 0xFF;
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn extu_w(s: &mut Sh2, _bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    s.r[rn] = s.r[rm] & 0xFFFF;
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

macro_rules! cmp_op {
    ($name:ident, $cond:expr) => {
        pub fn $name(s: &mut Sh2, _bus: &mut dyn Bus) {
            let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
            let f: fn(u32, u32) -> bool = $cond;
            s.sr.set_t(f(s.r[rn], s.r[rm]));
            s.pc = s.pc.wrapping_add(2);
            s.cycles_elapsed = 1;
        }
    };
}

cmp_op!(cmp_eq, |a, b| a == b);
cmp_op!(cmp_hs, |a, b| a >= b);
cmp_op!(cmp_hi, |a, b| a > b);
cmp_op!(cmp_ge, |a, b| (a as i32) >= (b as i32));
cmp_op!(cmp_gt, |a, b| (a as i32) > (b as i32));

pub fn cmp_pl(s: &mut Sh2, _bus: &mut dyn Bus) {
    let rn = n(s.current_opcode);
    s.sr.set_t((s.r[rn] as i32) > 0);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn cmp_pz(s: &mut Sh2, _bus: &mut dyn Bus) {
    let rn = n(s.current_opcode);
    s.sr.set_t((s.r[rn] as i32) >= 0);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn cmp_str(s: &mut Sh2, _bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    let x = s.r[rn] ^ s.r[rm];
    let t = (x & 0xFF == 0) || (x & 0xFF00 == 0) || (x & 0xFF0000 == 0) || (x & 0xFF000000 == 0);
    s.sr.set_t(t);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn cmp_im(s: &mut Sh2, _bus: &mut dyn Bus) {
    let imm = imm8(s.current_opcode) as i8 as i32;
    s.sr.set_t((s.r[0] as i32) == imm);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn and_rr(s: &mut Sh2, _bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    s.r[rn] &= s.r[rm];
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn and_im(s: &mut Sh2, _bus: &mut dyn Bus) {
    s.r[0] &= imm8(s.current_opcode);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn and_m(s: &mut Sh2, bus: &mut dyn Bus) {
    let addr = s.gbr.wrapping_add(s.r[0]);
    let value = bus.read8(s.master, addr);
    bus.write8(s.master, addr, value & (imm8(s.current_opcode) as u8));
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 3;
}

pub fn or_rr(s: &mut Sh2, _bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    s.r[rn] |= s.r[rm];
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn or_im(s: &mut Sh2, _bus: &mut dyn Bus) {
    s.r[0] |= imm8(s.current_opcode);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn or_m(s: &mut Sh2, bus: &mut dyn Bus) {
    let addr = s.gbr.wrapping_add(s.r[0]);
    let value = bus.read8(s.master, addr);
    bus.write8(s.master, addr, value | (imm8(s.current_opcode) as u8));
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 3;
}

pub fn xor_rr(s: &mut Sh2, _bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    s.r[rn] ^= s.r[rm];
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn xor_im(s: &mut Sh2, _bus: &mut dyn Bus) {
    s.r[0] ^= imm8(s.current_opcode);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn xor_m(s: &mut Sh2, bus: &mut dyn Bus) {
    let addr = s.gbr.wrapping_add(s.r[0]);
    let value = bus.read8(s.master, addr);
    bus.write8(s.master, addr, value ^ (imm8(s.current_opcode) as u8));
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 3;
}

pub fn tst_rr(s: &mut Sh2, _bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    s.sr.set_t(s.r[rn] & s.r[rm] == 0);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn tst_im(s: &mut Sh2, _bus: &mut dyn Bus) {
    s.sr.set_t(s.r[0] & imm8(s.current_opcode) == 0);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn tst_m(s: &mut Sh2, bus: &mut dyn Bus) {
    let addr = s.gbr.wrapping_add(s.r[0]);
    let value = bus.read8(s.master, addr);
    s.sr.set_t(value as u32 & imm8(s.current_opcode) == 0);
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 3;
}

pub fn not(s: &mut Sh2, _bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    s.r[rn] = !s.r[rm];
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

/// MAC.L: signed 32x32 -> 64-bit multiply-accumulate with post-increment
/// operands, saturating to signed-32 (via the upper bit of MACH) when the
/// `S` bit is set (§4.2.6).
pub fn macl(s: &mut Sh2, bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    let src_n = bus.read32(s.master, s.r[rn]) as i32 as i64;
    s.r[rn] = s.r[rn].wrapping_add(4);
    let src_m = bus.read32(s.master, s.r[rm]) as i32 as i64;
    s.r[rm] = s.r[rm].wrapping_add(4);

    let product = src_m * src_n;
    if !s.sr.s() {
        let mac = (((s.mach as u64) << 32) | s.macl as u64) as i64;
        let mac = mac.wrapping_add(product);
        s.mach = (mac >> 32) as u32;
        s.macl = mac as u32;
    } else {
        let mut mac = s.macl as i32 as i64;
        mac = mac.wrapping_add(product);
        const S32_MAX: i64 = i32::MAX as i64;
        const S32_MIN: i64 = i32::MIN as i64;
        if mac > S32_MAX {
            s.mach |= 1;
            s.macl = i32::MAX as u32;
        } else if mac < S32_MIN {
            s.mach |= 1;
            s.macl = i32::MIN as u32;
        } else {
            s.mach &= !1;
            s.macl = mac as u32;
        }
    }
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 2;
}

/// MAC.W: signed 16x16 -> 32-bit multiply-accumulate with post-increment
/// operands; when `S` is set, saturates to signed-48 held across MACH:MACL
/// (§4.2.6).
pub fn macw(s: &mut Sh2, bus: &mut dyn Bus) {
    let (rn, rm) = (n(s.current_opcode), m(s.current_opcode));
    let src_n = bus.read32(s.master, s.r[rn]) as i32 as i64;
    s.r[rn] = s.r[rn].wrapping_add(2);
    let src_m = bus.read32(s.master, s.r[rm]) as i32 as i64;
    s.r[rm] = s.r[rm].wrapping_add(2);

    let product = src_m * src_n;
    if !s.sr.s() {
        let mac = (((s.mach as u64) << 32) | s.macl as u64) as i64;
        let mac = mac.wrapping_add(product);
        s.mach = (mac >> 32) as u32;
        s.macl = mac as u32;
    } else {
        let mut mac: i64 = if s.macl & 0x8000_0000 != 0 {
            (s.macl as i64) | !(0xFFFF_FFFFi64)
        } else {
            s.macl as i64 & 0xFFFF_FFFF
        };
        mac = mac.wrapping_add(product);
        const S31_MAX: i64 = 0x7FFF_FFFF;
        const S31_MIN: i64 = -0x8000_0000;
        if mac > S31_MAX {
            s.mach |= 1;
            s.macl = S31_MAX as u32;
        } else if mac < S31_MIN {
            s.mach |= 1;
            s.macl = 0x8000_0000;
        } else {
            s.mach &= !1;
            s.macl = mac as u32;
        }
    }
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 3;
}
