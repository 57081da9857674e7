//! C2 — VDP2 background compositor (§4.5-4.9).
//!
//! Register decode, the plane/page/character/cell address walk, and
//! color-offset resolution each live in their own submodule; this file
//! owns the per-screen render-part cache and the VBlank-time pipeline
//! that ties them together.

pub mod color_offset;
pub mod registers;
pub mod render;
pub mod scroll_screen;
pub mod tilemap;

use std::thread;

use registers::Vdp2Registers;
pub use render::RenderPart;
use scroll_screen::{ColorCount, Reduction, ScreenFormat, ScrollScreen, ScrollScreenStatus};

/// Per-screen VRAM cycle budget is modeled as "always sufficient" rather
/// than decoding the real 8-timeslot CYCA/CYCB cycle-pattern registers
/// (§4.6); a screen is suppressed only by its enable bit or the NBG2/3
/// high-color-count exclusion, never by cycle starvation. Noted as a
/// simplification rather than modeled silently.
const ASSUMED_VRAM_CYCLE_BUDGET: u8 = 8;

/// Base VRAM address where this emulator expects character pattern pixel
/// data to begin, for every NBG screen. Real software places this
/// per-screen via CHCTLA/CHCTLB's bitmap-size fields combined with bank
/// assignment; fixed here since only cell-format NBG screens are modeled.
const CHARACTER_PATTERN_BASE: u32 = 0x0001_0000;

#[derive(Debug)]
pub struct Vdp2 {
    registers: Vdp2Registers,
    render_parts: [Vec<RenderPart>; 6],
    parallel_decode: bool,
}

impl Vdp2 {
    pub fn new(parallel_decode: bool) -> Self {
        Self {
            registers: Vdp2Registers::new(),
            render_parts: Default::default(),
            parallel_decode,
        }
    }

    /// Placeholder for per-cycle VDP2 work. Real VDP2 hardware composites
    /// continuously as the beam scans; this crate instead recomputes the
    /// full frame at VBlank (§5), so advancing cycles here has no
    /// observable effect beyond keeping the pacer's bookkeeping uniform
    /// across components.
    pub fn run(&mut self, _cycles: u32) {}

    fn status_for(&self, screen: ScrollScreen) -> ScrollScreenStatus {
        let index = screen as usize;
        let (color_count, scroll) = match screen {
            ScrollScreen::Nbg0 => (self.registers.color_counts[0], self.registers.scroll[0]),
            ScrollScreen::Nbg1 => (self.registers.color_counts[1], self.registers.scroll[1]),
            ScrollScreen::Nbg2 => (self.registers.color_counts[2], self.registers.scroll[2]),
            ScrollScreen::Nbg3 => (self.registers.color_counts[3], self.registers.scroll[3]),
            ScrollScreen::Rbg0 | ScrollScreen::Rbg1 => (ColorCount::Colors16, (0, 0)),
        };
        ScrollScreenStatus {
            screen,
            display_enabled: self.registers.screen_enabled[index],
            priority: self.registers.priorities[index],
            format: ScreenFormat::Cell,
            color_count,
            reduction: Reduction::None,
            bitmap_start_address: 0,
            palette_number: 0,
            scroll_x: scroll.0,
            scroll_y: scroll.1,
            color_offset: self.registers.color_offset_for(screen),
            available_vram_cycles: ASSUMED_VRAM_CYCLE_BUDGET,
        }
    }

    /// Recompute every displayed screen's render parts from current VRAM
    /// and register state (§4.6-4.8). Called once per VBlank by the pacer.
    ///
    /// RBG0/RBG1 resolve against a single named plane rather than the
    /// real hardware's 16-plane rotation grid: rotation-parameter scaling
    /// math is out of scope (§2 Non-goals), but basic plane lookup is not.
    pub fn populate_render_data(&mut self, vram: &[u8], vdp2_regs: &[u8]) {
        self.registers.sync_from_regs(vdp2_regs);

        let nbg0_status = self.status_for(ScrollScreen::Nbg0);
        let nbg1_status = self.status_for(ScrollScreen::Nbg1);
        let nbg0_colors = nbg0_status.display_enabled.then_some(nbg0_status.color_count);
        let nbg1_colors = nbg1_status.display_enabled.then_some(nbg1_status.color_count);
        let rbg0_priority0 = self.registers.priorities[ScrollScreen::Rbg0 as usize] == 0
            && self.registers.screen_enabled[ScrollScreen::Rbg0 as usize];

        let screens: Vec<(ScrollScreen, ScrollScreenStatus)> = ScrollScreen::RENDER_ORDER
            .iter()
            .map(|&screen| (screen, self.status_for(screen)))
            .filter(|(_, status)| status.is_displayed(nbg0_colors, nbg1_colors, rbg0_priority0))
            .collect();

        let results: Vec<(ScrollScreen, Vec<RenderPart>)> = if self.parallel_decode {
            thread::scope(|scope| {
                let handles: Vec<_> = screens
                    .iter()
                    .map(|(screen, status)| {
                        let registers = &self.registers;
                        scope.spawn(move || {
                            let parts = render::populate_from_registers(
                                vram,
                                registers,
                                *screen,
                                status,
                                CHARACTER_PATTERN_BASE,
                            );
                            (*screen, parts)
                        })
                    })
                    .collect();
                handles.into_iter().map(|h| h.join().expect("vdp2 decode thread panicked")).collect()
            })
        } else {
            screens
                .iter()
                .map(|(screen, status)| {
                    let parts = render::populate_from_registers(
                        vram,
                        &self.registers,
                        *screen,
                        status,
                        CHARACTER_PATTERN_BASE,
                    );
                    (*screen, parts)
                })
                .collect()
        };

        for parts in self.render_parts.iter_mut() {
            parts.clear();
        }
        for (screen, parts) in results {
            self.render_parts[screen as usize] = parts;
        }
    }

    pub fn get_render_parts(&self, screen: ScrollScreen) -> &[RenderPart] {
        &self.render_parts[screen as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_screen_has_no_render_parts() {
        let mut vdp2 = Vdp2::new(false);
        let vram = vec![0u8; 0x1_0000];
        let regs = vec![0u8; 0x200];
        vdp2.populate_render_data(&vram, &regs);
        assert!(vdp2.get_render_parts(ScrollScreen::Nbg0).is_empty());
    }

    #[test]
    fn enabled_nbg0_produces_a_full_map_of_parts() {
        let mut vdp2 = Vdp2::new(false);
        let vram = vec![0u8; 0x2_0000];
        let mut regs = vec![0u8; 0x200];
        regs[0x000] = 0x80; // TVMD display enable
        regs[0x021] = 0x01; // BGON: NBG0 enable
        vdp2.populate_render_data(&vram, &regs);
        let parts = vdp2.get_render_parts(ScrollScreen::Nbg0);
        // Unconfigured PLSZ defaults every plane to 1x1 pages, so NBG0's
        // map is the fixed 2x2 arrangement of those planes: 2x2 pages.
        let expected = 2 * 2 * tilemap::PAGE_CELLS * tilemap::PAGE_CELLS;
        assert_eq!(parts.len(), expected as usize);
    }

    #[test]
    fn parallel_decode_matches_sequential() {
        let vram = vec![0u8; 0x2_0000];
        let mut regs = vec![0u8; 0x200];
        regs[0x000] = 0x80;
        regs[0x021] = 0x03; // NBG0 + NBG1

        let mut sequential = Vdp2::new(false);
        sequential.populate_render_data(&vram, &regs);
        let mut parallel = Vdp2::new(true);
        parallel.populate_render_data(&vram, &regs);

        assert_eq!(
            sequential.get_render_parts(ScrollScreen::Nbg0),
            parallel.get_render_parts(ScrollScreen::Nbg0)
        );
    }
}
