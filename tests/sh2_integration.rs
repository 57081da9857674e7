mod common;

use common::SaturnTestBus;
use saturn_core::core::bus::BusMaster;
use saturn_core::core::Bus;
use saturn_core::cpu::Sh2;

fn new_cpu() -> Sh2 {
    Sh2::new(BusMaster::MasterSh2)
}

#[test]
fn addi_sign_extends_negative_immediate() {
    let mut bus = SaturnTestBus::new();
    bus.write16(BusMaster::MasterSh2, 0, 0x70FF); // ADDI #-1, R0
    let mut cpu = new_cpu();
    cpu.r[0] = 5;

    cpu.step(&mut bus);

    assert_eq!(cpu.r[0], 4);
    assert_eq!(cpu.pc, 2);
}

#[test]
fn addi_positive_immediate_does_not_sign_extend() {
    let mut bus = SaturnTestBus::new();
    bus.write16(BusMaster::MasterSh2, 0, 0x7001); // ADDI #1, R0
    let mut cpu = new_cpu();
    cpu.r[0] = 0xFFFF_FFFE;

    cpu.step(&mut bus);

    assert_eq!(cpu.r[0], 0xFFFF_FFFF);
}

#[test]
fn bsr_and_rts_round_trip_through_delay_slots() {
    let mut bus = SaturnTestBus::new();
    bus.write16(BusMaster::MasterSh2, 0x00, 0xB006); // BSR +0x10 (disp=6)
    bus.write16(BusMaster::MasterSh2, 0x02, 0x0009); // NOP (delay slot)
    bus.write16(BusMaster::MasterSh2, 0x10, 0x000B); // RTS
    bus.write16(BusMaster::MasterSh2, 0x12, 0x0009); // NOP (delay slot)

    let mut cpu = new_cpu();
    cpu.pc = 0;

    cpu.step(&mut bus); // BSR: runs delay slot, jumps to 0x10
    assert_eq!(cpu.pc, 0x10);
    assert_eq!(cpu.pr, 0x04);

    cpu.step(&mut bus); // RTS: runs delay slot, returns to PR
    assert_eq!(cpu.pc, 0x04);
    assert!(cpu.call_stack.is_empty());
}

#[test]
fn mac_l_accumulates_product_into_mach_macl() {
    let mut bus = SaturnTestBus::new();
    // MAC.L @R1+, @R2+  (n=1, m=2)
    bus.write16(BusMaster::MasterSh2, 0, 0x012F);
    let mut cpu = new_cpu();
    cpu.r[1] = 0x100;
    cpu.r[2] = 0x200;
    bus.write32(BusMaster::MasterSh2, 0x100, 3);
    bus.write32(BusMaster::MasterSh2, 0x200, 4);

    cpu.step(&mut bus);

    assert_eq!(cpu.macl, 12);
    assert_eq!(cpu.mach, 0);
    assert_eq!(cpu.r[1], 0x104);
    assert_eq!(cpu.r[2], 0x204);
}

#[test]
fn ldsl_macl_writes_to_mach_not_macl() {
    // Deliberately preserved quirk: LDS.L @Rn+, MACL actually loads MACH.
    let mut bus = SaturnTestBus::new();
    bus.write16(BusMaster::MasterSh2, 0, 0x4016); // LDS.L @R0+, MACL
    let mut cpu = new_cpu();
    cpu.r[0] = 0x100;
    bus.write32(BusMaster::MasterSh2, 0x100, 0xDEAD_BEEF);

    cpu.step(&mut bus);

    assert_eq!(cpu.mach, 0xDEAD_BEEF);
}
