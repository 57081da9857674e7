//! Per-VBlank render pipeline (§4.6, §4.8): walk each displayed screen's
//! visible cells, decode pattern-name data and pixel indices, and emit
//! one [`RenderPart`] per 8x8 cell for the host to composite.

use super::color_offset::ColorOffset;
use super::registers::{PatternNameConfig, Vdp2Registers};
use super::scroll_screen::{ColorCount, ScrollScreen, ScrollScreenStatus};
use super::tilemap::{self, PlaneSize, PndSize};

/// One decoded 8x8 cell, positioned in screen space, ready for the host
/// to blit (palette lookup and color-offset addition happen host-side so
/// this stays a flat data record rather than a pre-shaded bitmap).
#[derive(Clone, Debug, PartialEq)]
pub struct RenderPart {
    pub screen_x: i32,
    pub screen_y: i32,
    pub priority: u8,
    pub palette_number: u8,
    pub color_count: ColorCount,
    pub flip_h: bool,
    pub flip_v: bool,
    pub color_offset: ColorOffset,
    /// Raw pixel color indices (or direct RGB for 16M-color bitmaps),
    /// row-major, 8x8.
    pub pixels: Box<[u8]>,
}

/// Read one 8x8 cell's worth of pixel indices out of VRAM at `color_count`
/// depth (§4.7 step 5). 16M-color cells store 3 bytes/pixel (direct RGB)
/// and are passed through as-is; everything else is a flat index.
fn read_cell_pixels(vram: &[u8], address: u32, color_count: ColorCount) -> Box<[u8]> {
    let bytes_per_pixel = match color_count {
        ColorCount::Colors16 => 1, // two 4-bit pixels per byte, unpacked below
        ColorCount::Colors256 | ColorCount::Colors2048 => 1,
        ColorCount::Colors32768 => 2,
        ColorCount::Colors16m => 4,
    };
    let total = color_count.cell_bytes() as usize;
    let start = address as usize;
    let end = (start + total).min(vram.len());
    let raw = if start < vram.len() { &vram[start..end] } else { &[] };

    match color_count {
        ColorCount::Colors16 => {
            let mut pixels = Vec::with_capacity(64);
            for &byte in raw {
                pixels.push(byte >> 4);
                pixels.push(byte & 0x0F);
            }
            pixels.resize(64, 0);
            pixels.into_boxed_slice()
        }
        _ => {
            let mut pixels = vec![0u8; 64 * bytes_per_pixel];
            let len = raw.len().min(pixels.len());
            pixels[..len].copy_from_slice(&raw[..len]);
            pixels.into_boxed_slice()
        }
    }
}

fn read_pnd_raw(vram: &[u8], address: u32, two_word: bool) -> u32 {
    let addr = address as usize;
    if two_word {
        if addr + 3 < vram.len() {
            u32::from_be_bytes([vram[addr], vram[addr + 1], vram[addr + 2], vram[addr + 3]])
        } else {
            0
        }
    } else if addr + 1 < vram.len() {
        u16::from_be_bytes([vram[addr], vram[addr + 1]]) as u32
    } else {
        0
    }
}

/// Walk every page of a screen's configured map and emit one render part
/// per cell (§4.7 steps 1-4). `quadrant_addresses` holds one page base
/// address per named-plane slot, laid out row-major over a
/// `quadrants_wide x quadrants_tall` grid — NBG screens pass the fixed
/// 2x2 arrangement of planes {A, B, C, D} (§4.7 step 1); RBG's simplified
/// basic-plane lookup passes a single 1x1 slot instead of the real
/// hardware's 16-plane 4x4 grid, deliberately leaving rotation-parameter
/// scaling unimplemented (§2 Non-goal) while still walking real
/// plane/page/PND data.
///
/// Positions are unclipped: a part's `screen_x`/`screen_y` can fall
/// outside the visible raster, and the host GPU layer is expected to
/// clip when compositing (§4.8).
fn populate_map(
    vram: &[u8],
    status: &ScrollScreenStatus,
    quadrant_addresses: &[u32],
    quadrants_wide: u32,
    quadrants_tall: u32,
    plane_size: PlaneSize,
    character_pattern_base: u32,
    pnd_config: PatternNameConfig,
    color_offset: ColorOffset,
) -> Vec<RenderPart> {
    let pages_wide = plane_size.pages_wide();
    let pages_tall = plane_size.pages_tall();
    let pnd_entry_bytes = if pnd_config.two_word { 4 } else { 2 };
    let page_byte_size = tilemap::PAGE_CELLS * tilemap::PAGE_CELLS * pnd_entry_bytes;
    let pnd_size = if pnd_config.two_word { PndSize::TwoWord } else { PndSize::OneWord };

    let map_pages_wide = quadrants_wide * pages_wide;
    let map_pages_tall = quadrants_tall * pages_tall;
    let cells_per_page = tilemap::PAGE_CELLS * tilemap::PAGE_CELLS;
    let mut parts = Vec::with_capacity((map_pages_wide * map_pages_tall * cells_per_page) as usize);

    for page_gy in 0..map_pages_tall {
        let quadrant_y = page_gy / pages_tall;
        let local_py = page_gy % pages_tall;
        for page_gx in 0..map_pages_wide {
            let quadrant_x = page_gx / pages_wide;
            let local_px = page_gx % pages_wide;
            let quadrant_index = (quadrant_y * quadrants_wide + quadrant_x) as usize;
            let plane_base = quadrant_addresses[quadrant_index];
            let page_index_within_plane = local_py * pages_wide + local_px;
            let page_base = plane_base + page_index_within_plane * page_byte_size;

            for local_cell_y in 0..tilemap::PAGE_CELLS {
                for local_cell_x in 0..tilemap::PAGE_CELLS {
                    let entry = local_cell_y * tilemap::PAGE_CELLS + local_cell_x;
                    let pnd_address = page_base + entry * pnd_entry_bytes;
                    let raw = read_pnd_raw(vram, pnd_address, pnd_config.two_word);
                    let pattern = tilemap::decode_pnd(
                        pnd_size,
                        raw,
                        pnd_config.supplement_character_bits,
                        pnd_config.supplement_palette_bits,
                        status.color_count,
                    );

                    let cell_address = tilemap::cell_address(
                        character_pattern_base,
                        pattern.character_number,
                        status.color_count,
                    );
                    let pixels = read_cell_pixels(vram, cell_address, status.color_count);

                    let global_cell_x = page_gx * tilemap::PAGE_CELLS + local_cell_x;
                    let global_cell_y = page_gy * tilemap::PAGE_CELLS + local_cell_y;
                    let screen_x = (global_cell_x * tilemap::CELL_SIZE) as i32 - status.scroll_x;
                    let screen_y = (global_cell_y * tilemap::CELL_SIZE) as i32 - status.scroll_y;

                    parts.push(RenderPart {
                        screen_x,
                        screen_y,
                        priority: status.priority,
                        palette_number: pattern.palette_number,
                        color_count: status.color_count,
                        flip_h: pattern.flip_h,
                        flip_v: pattern.flip_v,
                        color_offset,
                        pixels,
                    });
                }
            }
        }
    }
    parts
}

/// Emit render parts for one NBG screen's full configured map: four named
/// planes {A, B, C, D} arranged 2x2, each `plane_size` pages (§4.7 step 1).
///
/// `character_pattern_base` is the VRAM byte address where character
/// pixel data begins; real hardware derives it from CHCTLA/CHCTLB's
/// bitmap/cell-size fields, simplified here to a direct parameter since
/// bitmap-mode screens (§2 Non-goal) never reach this path.
pub fn populate_screen(
    vram: &[u8],
    status: &ScrollScreenStatus,
    plane_size: PlaneSize,
    plane_addresses: [u32; 4],
    character_pattern_base: u32,
    pnd_config: PatternNameConfig,
    color_offset: ColorOffset,
) -> Vec<RenderPart> {
    populate_map(
        vram,
        status,
        &plane_addresses,
        2,
        2,
        plane_size,
        character_pattern_base,
        pnd_config,
        color_offset,
    )
}

/// Emit render parts for an RBG screen's basic (non-rotated) plane lookup:
/// a single named plane rather than the real hardware's 16-plane 4x4
/// rotation-parameter grid (§2 Non-goal: rotation-parameter scaling beyond
/// basic plane lookup is out of scope, not the plane/page/PND walk itself).
pub fn populate_rbg_screen(
    vram: &[u8],
    status: &ScrollScreenStatus,
    plane_size: PlaneSize,
    plane_address: u32,
    character_pattern_base: u32,
    pnd_config: PatternNameConfig,
    color_offset: ColorOffset,
) -> Vec<RenderPart> {
    populate_map(
        vram,
        status,
        &[plane_address],
        1,
        1,
        plane_size,
        character_pattern_base,
        pnd_config,
        color_offset,
    )
}

/// Registers-driven wrapper used by [`super::Vdp2::populate_render_data`]:
/// resolves each screen's plane layout, pattern-name config, and color
/// offset from decoded register state before walking its map.
pub fn populate_from_registers(
    vram: &[u8],
    registers: &Vdp2Registers,
    screen: ScrollScreen,
    status: &ScrollScreenStatus,
    character_pattern_base: u32,
) -> Vec<RenderPart> {
    let color_offset = registers.color_offset_for(screen);
    match screen {
        ScrollScreen::Nbg0 | ScrollScreen::Nbg1 | ScrollScreen::Nbg2 | ScrollScreen::Nbg3 => {
            let index = match screen {
                ScrollScreen::Nbg0 => 0,
                ScrollScreen::Nbg1 => 1,
                ScrollScreen::Nbg2 => 2,
                _ => 3,
            };
            populate_screen(
                vram,
                status,
                registers.plane_size[index],
                registers.plane_addresses[index],
                character_pattern_base,
                registers.pattern_name_config[index],
                color_offset,
            )
        }
        ScrollScreen::Rbg0 | ScrollScreen::Rbg1 => {
            let index = if screen == ScrollScreen::Rbg0 { 0 } else { 1 };
            populate_rbg_screen(
                vram,
                status,
                registers.rbg_plane_size[index],
                registers.rbg_plane_address[index],
                character_pattern_base,
                registers.rbg_pattern_name_config[index],
                color_offset,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vdp2::scroll_screen::{Reduction, ScreenFormat};

    fn status() -> ScrollScreenStatus {
        ScrollScreenStatus {
            screen: ScrollScreen::Nbg0,
            display_enabled: true,
            priority: 3,
            format: ScreenFormat::Cell,
            color_count: ColorCount::Colors16,
            reduction: Reduction::None,
            bitmap_start_address: 0,
            palette_number: 0,
            scroll_x: 0,
            scroll_y: 0,
            color_offset: ColorOffset::default(),
            available_vram_cycles: 8,
        }
    }

    #[test]
    fn populate_screen_emits_one_part_per_cell_across_the_whole_map() {
        let vram = vec![0u8; 0x4000];
        let parts = populate_screen(
            &vram,
            &status(),
            PlaneSize::OneByOne,
            [0, 0, 0, 0],
            0x2000,
            PatternNameConfig::default(),
            ColorOffset::default(),
        );
        // 2x2 arrangement of 1x1-page planes = a 2x2 page map.
        let expected = 2 * 2 * tilemap::PAGE_CELLS * tilemap::PAGE_CELLS;
        assert_eq!(parts.len(), expected as usize);
    }

    #[test]
    fn a_two_by_two_plane_size_quadruples_the_per_plane_page_count() {
        let vram = vec![0u8; 0x4000];
        let one_by_one = populate_screen(
            &vram,
            &status(),
            PlaneSize::OneByOne,
            [0, 0, 0, 0],
            0x2000,
            PatternNameConfig::default(),
            ColorOffset::default(),
        );
        let two_by_two = populate_screen(
            &vram,
            &status(),
            PlaneSize::TwoByTwo,
            [0, 0, 0, 0],
            0x2000,
            PatternNameConfig::default(),
            ColorOffset::default(),
        );
        assert_eq!(two_by_two.len(), one_by_one.len() * 4);
    }

    #[test]
    fn four_bit_cell_unpacks_two_pixels_per_byte() {
        let mut vram = vec![0u8; 0x4000];
        vram[0x2000] = 0xAB;
        let parts = populate_screen(
            &vram,
            &status(),
            PlaneSize::OneByOne,
            [0, 0, 0, 0],
            0x2000,
            PatternNameConfig::default(),
            ColorOffset::default(),
        );
        assert_eq!(parts[0].pixels[0], 0xA);
        assert_eq!(parts[0].pixels[1], 0xB);
    }

    #[test]
    fn named_planes_address_distinct_quadrants_of_the_map() {
        let mut vram = vec![0u8; 0x1_0000];
        // Plane B (top-right quadrant) page base at 0x100; its first PND
        // entry (cell 0,0 of that page) points at character 1.
        vram[0x100] = 0x00;
        vram[0x101] = 0x01;
        let parts = populate_screen(
            &vram,
            &status(),
            PlaneSize::OneByOne,
            [0, 0x100, 0, 0],
            0x2000,
            PatternNameConfig::default(),
            ColorOffset::default(),
        );
        // Plane A's page (4096 cells) is emitted first in row-major map order,
        // so plane B's page starts right after it (page_gx=1, page_gy=0).
        let plane_b_first_cell = &parts[(tilemap::PAGE_CELLS * tilemap::PAGE_CELLS) as usize];
        assert_eq!(plane_b_first_cell.screen_x, (tilemap::PAGE_CELLS * tilemap::CELL_SIZE) as i32);
    }

    #[test]
    fn rbg_basic_plane_lookup_emits_render_parts() {
        let vram = vec![0u8; 0x4000];
        let mut registers = Vdp2Registers::new();
        registers.rbg_plane_size[0] = PlaneSize::OneByOne;
        registers.rbg_plane_address[0] = 0;
        let parts = populate_from_registers(&vram, &registers, ScrollScreen::Rbg0, &status(), 0x2000);
        let expected = tilemap::PAGE_CELLS * tilemap::PAGE_CELLS;
        assert_eq!(parts.len(), expected as usize);
    }
}
