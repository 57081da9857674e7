use saturn_core::scsp::envelope::EnvPhase;
use saturn_core::scsp::registers::Width;
use saturn_core::scsp::Scsp;

#[test]
fn key_on_drives_envelope_through_attack_into_decay() {
    let mut scsp = Scsp::new();
    // Slot 0: KYONB=1, PCM8 format, fastest attack rate.
    scsp.write_register(0x00, Width::Word, 0x4000); // KYONB=1
    scsp.write_register(0x0A, Width::Word, 0x1F); // attack_rate = 31
    scsp.write_register(0x00, Width::Word, 0xD000); // KYONB=1, KYONEX=1

    assert_eq!(scsp.slots[0].envelope.phase, EnvPhase::Attack);

    let ram = vec![0u8; 0x1000];
    let mut left = [0i16; 256];
    let mut right = [0i16; 256];
    scsp.update(&ram, &mut left, &mut right, 256);

    assert_eq!(scsp.slots[0].envelope.phase, EnvPhase::Decay);
}

#[test]
fn key_off_returns_slot_to_release_phase() {
    let mut scsp = Scsp::new();
    scsp.write_register(0x00, Width::Word, 0x4000); // KYONB=1
    scsp.write_register(0x00, Width::Word, 0xD000); // KYONB=1, KYONEX=1
    assert_eq!(scsp.slots[0].envelope.phase, EnvPhase::Attack);

    scsp.write_register(0x00, Width::Word, 0x8000); // KYONB=0, KYONEX=1
    assert_eq!(scsp.slots[0].envelope.phase, EnvPhase::Release);
}

#[test]
fn timer_a_fires_after_its_configured_sample_count() {
    let mut scsp = Scsp::new();
    scsp.timers[0].limit = 10;
    scsp.timers[0].increment = 1;

    let mut fired = false;
    for _ in 0..11 {
        let events = scsp.update_timer(1.0);
        fired |= events.timer_a;
    }
    assert!(fired);
}

#[test]
fn dma_moves_bytes_from_scsp_ram_to_dsp_register_file() {
    let mut scsp = Scsp::new();
    let mut ram = vec![0u8; 0x1000];
    ram[0x10] = 0xAB;
    ram[0x11] = 0xCD;
    scsp.dma.ram_address = 0x10;
    scsp.dma.dsp_address = 0x20;
    scsp.dma.len = 2;
    scsp.dma.direction_to_dsp = true;
    scsp.dma.execute = true;

    let ran = scsp.run_dma(&mut ram);

    assert!(ran);
    assert_eq!(scsp.dsp_regs[0x20], 0xAB);
    assert_eq!(scsp.dsp_regs[0x21], 0xCD);
    assert!(!scsp.dma.execute);
}

#[test]
fn midi_in_fifo_holds_up_to_four_bytes() {
    let mut scsp = Scsp::new();
    assert!(scsp.midi_in_send(1)); // empty -> non-empty transition
    assert!(!scsp.midi_in_send(2));
    assert!(!scsp.midi_in_send(3));
    assert!(!scsp.midi_in_send(4));

    let (first, has_more) = scsp.midi_in_read().unwrap();
    assert_eq!(first, 1);
    assert!(has_more);
}
