//! Scroll screen identity and per-screen resolved status (§3.3, §4.6).

use super::color_offset::ColorOffset;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScrollScreen {
    Rbg1,
    Rbg0,
    Nbg0,
    Nbg1,
    Nbg2,
    Nbg3,
}

impl ScrollScreen {
    /// Compositing order (§4.6 step 3): RBG1 first, NBG3 last.
    pub const RENDER_ORDER: [ScrollScreen; 6] = [
        ScrollScreen::Rbg1,
        ScrollScreen::Rbg0,
        ScrollScreen::Nbg0,
        ScrollScreen::Nbg1,
        ScrollScreen::Nbg2,
        ScrollScreen::Nbg3,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScreenFormat {
    Bitmap { width: u16, height: u16 },
    Cell,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ColorCount {
    #[default]
    Colors16,
    Colors256,
    Colors2048,
    Colors32768,
    Colors16m,
}

impl ColorCount {
    /// Bytes per 8x8 cell at this color depth (§4.7 step 5).
    pub fn cell_bytes(self) -> u32 {
        match self {
            ColorCount::Colors16 => 32,
            ColorCount::Colors256 => 64,
            ColorCount::Colors2048 => 64,
            ColorCount::Colors32768 => 128,
            ColorCount::Colors16m => 256,
        }
    }

    /// Character-pattern VRAM read cycles required per §4.6's cycle-budget
    /// check: higher color counts and 1/4 reduction both raise the cost.
    pub fn required_cycles(self, quarter_reduction: bool) -> u8 {
        let base = match self {
            ColorCount::Colors16 => 1,
            ColorCount::Colors256 => 2,
            ColorCount::Colors2048 => 4,
            ColorCount::Colors32768 => 4,
            ColorCount::Colors16m => 8,
        };
        if quarter_reduction { base * 2 } else { base }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reduction {
    None,
    Half,
    Quarter,
}

#[derive(Clone, Copy, Debug)]
pub struct ScrollScreenStatus {
    pub screen: ScrollScreen,
    pub display_enabled: bool,
    pub priority: u8,
    pub format: ScreenFormat,
    pub color_count: ColorCount,
    pub reduction: Reduction,
    pub bitmap_start_address: u32,
    pub palette_number: u8,
    pub scroll_x: i32,
    pub scroll_y: i32,
    pub color_offset: ColorOffset,
    /// VRAM cycles this screen's current bank schedule makes available to
    /// it (read from the VRAM cycle-pattern registers, simplified to one
    /// scalar budget per screen rather than the full 8-timeslot table).
    pub available_vram_cycles: u8,
}

impl ScrollScreenStatus {
    /// §4.6 `isScreenDisplayed`: enable bit, VRAM cycle budget, and the
    /// NBG2/NBG3-vs-NBG0/NBG1 and RBG0-priority-0 exclusions.
    pub fn is_displayed(&self, nbg0_colors: Option<ColorCount>, nbg1_colors: Option<ColorCount>, rbg0_priority0: bool) -> bool {
        if !self.display_enabled {
            return false;
        }
        if matches!(self.screen, ScrollScreen::Nbg0 | ScrollScreen::Nbg1) && rbg0_priority0 {
            return false;
        }
        if matches!(self.screen, ScrollScreen::Nbg2 | ScrollScreen::Nbg3) {
            let blocks = |c: Option<ColorCount>| matches!(c, Some(ColorCount::Colors2048 | ColorCount::Colors32768 | ColorCount::Colors16m));
            if blocks(nbg0_colors) || blocks(nbg1_colors) {
                return false;
            }
        }
        let quarter = matches!(self.reduction, Reduction::Quarter);
        if self.color_count == ColorCount::Colors16m && !matches!(self.reduction, Reduction::None) {
            return false;
        }
        self.available_vram_cycles >= self.color_count.required_cycles(quarter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(screen: ScrollScreen) -> ScrollScreenStatus {
        ScrollScreenStatus {
            screen,
            display_enabled: true,
            priority: 1,
            format: ScreenFormat::Cell,
            color_count: ColorCount::Colors16,
            reduction: Reduction::None,
            bitmap_start_address: 0,
            palette_number: 0,
            scroll_x: 0,
            scroll_y: 0,
            color_offset: ColorOffset::default(),
            available_vram_cycles: 1,
        }
    }

    #[test]
    fn disabled_screen_is_never_displayed() {
        let mut s = status(ScrollScreen::Nbg0);
        s.display_enabled = false;
        assert!(!s.is_displayed(None, None, false));
    }

    #[test]
    fn insufficient_vram_cycles_suppresses_display() {
        let mut s = status(ScrollScreen::Nbg0);
        s.color_count = ColorCount::Colors2048;
        s.available_vram_cycles = 1;
        assert!(!s.is_displayed(None, None, false));
    }

    #[test]
    fn nbg2_suppressed_by_nbg0_high_color_count() {
        let s = status(ScrollScreen::Nbg2);
        assert!(!s.is_displayed(Some(ColorCount::Colors2048), None, false));
        assert!(s.is_displayed(Some(ColorCount::Colors16), None, false));
    }

    #[test]
    fn rbg0_priority_zero_disables_nbg_screens() {
        let s = status(ScrollScreen::Nbg0);
        assert!(!s.is_displayed(None, None, true));
    }
}
