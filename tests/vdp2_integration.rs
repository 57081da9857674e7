use saturn_core::vdp2::scroll_screen::ScrollScreen;
use saturn_core::vdp2::{tilemap, Vdp2};

fn enable_screens(bgon_low_byte: u8) -> Vec<u8> {
    let mut regs = vec![0u8; 0x200];
    regs[0x000] = 0x80; // TVMD display enable
    regs[0x021] = bgon_low_byte; // BGON low byte: bit0=NBG0, bit2=NBG2
    regs
}

#[test]
fn nbg0_cell_screen_emits_a_full_grid_of_render_parts() {
    let mut vdp2 = Vdp2::new(false);
    let vram = vec![0u8; 0x2_0000];
    let regs = enable_screens(0x01);

    vdp2.populate_render_data(&vram, &regs);

    let parts = vdp2.get_render_parts(ScrollScreen::Nbg0);
    // Default PLSZ (0) selects 1x1-page planes; the fixed 2x2 arrangement
    // of named planes therefore maps to a 2x2 page grid.
    let expected = 2 * 2 * tilemap::PAGE_CELLS * tilemap::PAGE_CELLS;
    assert_eq!(parts.len(), expected as usize);
    assert!(parts.iter().all(|p| p.pixels.len() == 64));
}

#[test]
fn a_configured_two_by_two_plane_emits_one_part_per_cell_in_the_map() {
    let mut vdp2 = Vdp2::new(false);
    let vram = vec![0u8; 0x2_0000];
    let mut regs = enable_screens(0x01);
    regs[0x038] = 0x00;
    regs[0x039] = 0x03; // PLSZ: NBG0 = 2x2 pages

    vdp2.populate_render_data(&vram, &regs);

    let parts = vdp2.get_render_parts(ScrollScreen::Nbg0);
    // 2x2 arrangement of 2x2-page planes = a 4x4 page map.
    let expected = 4 * 4 * tilemap::PAGE_CELLS * tilemap::PAGE_CELLS;
    assert_eq!(parts.len(), expected as usize);
}

#[test]
fn rbg0_basic_plane_lookup_emits_render_parts() {
    let mut vdp2 = Vdp2::new(false);
    let vram = vec![0u8; 0x2_0000];
    let mut regs = vec![0u8; 0x200];
    regs[0x000] = 0x80; // TVMD display enable
    regs[0x021] = 0x10; // BGON: RBG0 enable

    vdp2.populate_render_data(&vram, &regs);

    let parts = vdp2.get_render_parts(ScrollScreen::Rbg0);
    let expected = tilemap::PAGE_CELLS * tilemap::PAGE_CELLS;
    assert_eq!(parts.len(), expected as usize);
}

#[test]
fn nbg2_is_suppressed_when_nbg0_uses_a_high_color_count() {
    let mut vdp2 = Vdp2::new(false);
    let vram = vec![0u8; 0x2_0000];
    let mut regs = enable_screens(0x05); // NBG0 + NBG2 enabled
    // CHCTLA: NBG0 color count = 2048 colors (bits 4-5 = 2).
    regs[0x028] = 0x00;
    regs[0x029] = 0x20;

    vdp2.populate_render_data(&vram, &regs);

    assert!(vdp2.get_render_parts(ScrollScreen::Nbg2).is_empty());
    assert!(!vdp2.get_render_parts(ScrollScreen::Nbg0).is_empty());
}

#[test]
fn disabling_display_clears_every_screen() {
    let mut vdp2 = Vdp2::new(false);
    let vram = vec![0u8; 0x2_0000];
    let mut regs = enable_screens(0x0F); // all four NBG screens enabled
    regs[0x000] = 0x00; // TVMD display disabled overall is not modeled per-bit;
                        // clear BGON instead to exercise the per-screen path.
    regs[0x021] = 0x00;

    vdp2.populate_render_data(&vram, &regs);

    for screen in [ScrollScreen::Nbg0, ScrollScreen::Nbg1, ScrollScreen::Nbg2, ScrollScreen::Nbg3] {
        assert!(vdp2.get_render_parts(screen).is_empty());
    }
}
