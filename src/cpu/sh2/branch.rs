//! Control-flow handlers: unconditional/conditional branches, subroutine
//! calls, `RTE`/`RTS`, and `TRAPA` (§4.2.3, §4.2.4).
//!
//! Every handler that carries a delay slot computes its target first, then
//! calls [`Sh2::execute_delay_slot`] against `pc + 2` before overwriting
//! `pc` with the target — mirroring real SH2 sequencing, where the slot
//! instruction executes before control transfers.

use crate::core::bus::Bus;

use super::Sh2;
use super::dispatch::{disp8, disp12, n};

pub fn nop(s: &mut Sh2, _bus: &mut dyn Bus) {
    s.pc = s.pc.wrapping_add(2);
    s.cycles_elapsed = 1;
}

pub fn bra(s: &mut Sh2, bus: &mut dyn Bus) {
    let target = s.pc.wrapping_add(4).wrapping_add((disp12(s.current_opcode) * 2) as u32);
    s.cycles_elapsed = 2;
    s.execute_delay_slot(bus, s.pc.wrapping_add(2));
    s.pc = target;
}

pub fn braf(s: &mut Sh2, bus: &mut dyn Bus) {
    let rn = n(s.current_opcode);
    let target = s.pc.wrapping_add(4).wrapping_add(s.r[rn]);
    s.cycles_elapsed = 2;
    s.execute_delay_slot(bus, s.pc.wrapping_add(2));
    s.pc = target;
}

pub fn bsr(s: &mut Sh2, bus: &mut dyn Bus) {
    let target = s.pc.wrapping_add(4).wrapping_add((disp12(s.current_opcode) * 2) as u32);
    let return_pc = s.pc.wrapping_add(4);
    s.pr = return_pc;
    s.call_stack.push((s.pc, return_pc));
    s.cycles_elapsed = 2;
    s.execute_delay_slot(bus, s.pc.wrapping_add(2));
    s.pc = target;
}

pub fn bsrf(s: &mut Sh2, bus: &mut dyn Bus) {
    let rn = n(s.current_opcode);
    let target = s.pc.wrapping_add(4).wrapping_add(s.r[rn]);
    let return_pc = s.pc.wrapping_add(4);
    s.pr = return_pc;
    s.call_stack.push((s.pc, return_pc));
    s.cycles_elapsed = 2;
    s.execute_delay_slot(bus, s.pc.wrapping_add(2));
    s.pc = target;
}

pub fn jmp(s: &mut Sh2, bus: &mut dyn Bus) {
    let rn = n(s.current_opcode);
    let target = s.r[rn];
    s.cycles_elapsed = 2;
    s.execute_delay_slot(bus, s.pc.wrapping_add(2));
    s.pc = target;
}

pub fn jsr(s: &mut Sh2, bus: &mut dyn Bus) {
    let rn = n(s.current_opcode);
    let target = s.r[rn];
    let return_pc = s.pc.wrapping_add(4);
    s.pr = return_pc;
    s.call_stack.push((s.pc, return_pc));
    s.cycles_elapsed = 2;
    s.execute_delay_slot(bus, s.pc.wrapping_add(2));
    s.pc = target;
}

pub fn rts(s: &mut Sh2, bus: &mut dyn Bus) {
    let target = s.pr;
    s.cycles_elapsed = 2;
    s.execute_delay_slot(bus, s.pc.wrapping_add(2));
    s.pc = target;
    s.call_stack.pop();
}

/// RTE: restore `PC`/`SR` from the stack built by interrupt delivery, then
/// run the delay slot before the restored `PC` takes effect (§4.2.3).
pub fn rte(s: &mut Sh2, bus: &mut dyn Bus) {
    let new_pc = s.pop(bus);
    let new_sr = s.pop(bus);
    s.cycles_elapsed = 4;
    s.execute_delay_slot(bus, s.pc.wrapping_add(2));
    s.sr.0 = new_sr & 0x03F3;
    s.pc = new_pc;
}

pub fn bt(s: &mut Sh2, _bus: &mut dyn Bus) {
    if s.sr.t() {
        let target = s.pc.wrapping_add(4).wrapping_add((disp8(s.current_opcode) * 2) as u32);
        s.pc = target;
        s.cycles_elapsed = 3;
    } else {
        s.pc = s.pc.wrapping_add(2);
        s.cycles_elapsed = 1;
    }
}

pub fn bf(s: &mut Sh2, _bus: &mut dyn Bus) {
    if !s.sr.t() {
        let target = s.pc.wrapping_add(4).wrapping_add((disp8(s.current_opcode) * 2) as u32);
        s.pc = target;
        s.cycles_elapsed = 3;
    } else {
        s.pc = s.pc.wrapping_add(2);
        s.cycles_elapsed = 1;
    }
}

pub fn bts(s: &mut Sh2, bus: &mut dyn Bus) {
    if s.sr.t() {
        let target = s.pc.wrapping_add(4).wrapping_add((disp8(s.current_opcode) * 2) as u32);
        s.cycles_elapsed = 2;
        s.execute_delay_slot(bus, s.pc.wrapping_add(2));
        s.pc = target;
    } else {
        s.pc = s.pc.wrapping_add(2);
        s.cycles_elapsed = 1;
    }
}

pub fn bfs(s: &mut Sh2, bus: &mut dyn Bus) {
    if !s.sr.t() {
        let target = s.pc.wrapping_add(4).wrapping_add((disp8(s.current_opcode) * 2) as u32);
        s.cycles_elapsed = 2;
        s.execute_delay_slot(bus, s.pc.wrapping_add(2));
        s.pc = target;
    } else {
        s.pc = s.pc.wrapping_add(2);
        s.cycles_elapsed = 1;
    }
}

/// TRAPA: software interrupt, vector taken from an 8-bit immediate scaled
/// by 4 into `VBR`-relative space. No delay slot.
pub fn trapa(s: &mut Sh2, bus: &mut dyn Bus) {
    let imm = (s.current_opcode & 0x00FF) as u32;
    let return_pc = s.pc.wrapping_add(2);
    s.push(bus, s.sr.0);
    s.push(bus, return_pc);
    s.pc = bus.read32(s.master, s.vbr.wrapping_add(imm * 4));
    s.cycles_elapsed = 8;
}
