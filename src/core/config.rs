//! Host-supplied emulator configuration.
//!
//! Loading a config file is an out-of-scope external collaborator (§1); the
//! host shell is responsible for turning whatever format it prefers into a
//! `Config` value before calling [`crate::core::emulator::init`].

/// Television broadcast standard, which determines line/frame timing (§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TvStandard {
    Ntsc,
    Pal,
}

/// Color RAM addressing mode (§3.3): controls both total palette entries
/// and per-color bit depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorRamMode {
    /// 1024 entries, 15 bits/color (5 bits per channel).
    Mode0_1024x15,
    /// 2048 entries, 15 bits/color.
    Mode1_2048x15,
    /// 1024 entries, 24 bits/color (8 bits per channel).
    Mode2_1024x24,
}

impl ColorRamMode {
    /// Color RAM access width in bytes, per §4.7 step 5: 16-bit in modes
    /// 0/1, 32-bit in mode 2, independent of the screen's own color count.
    pub fn access_width_bytes(self) -> u32 {
        match self {
            ColorRamMode::Mode0_1024x15 | ColorRamMode::Mode1_2048x15 => 2,
            ColorRamMode::Mode2_1024x24 => 4,
        }
    }

    pub fn entry_count(self) -> u32 {
        match self {
            ColorRamMode::Mode0_1024x15 | ColorRamMode::Mode2_1024x24 => 1024,
            ColorRamMode::Mode1_2048x15 => 2048,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VramSize {
    Mbit4,
    Mbit8,
}

impl VramSize {
    pub fn bytes(self) -> usize {
        match self {
            VramSize::Mbit4 => 4 * 1024 * 1024 / 8,
            VramSize::Mbit8 => 8 * 1024 * 1024 / 8,
        }
    }
}

/// Host-supplied configuration for a new [`crate::core::emulator::Emulator`].
#[derive(Debug, Clone)]
pub struct Config {
    pub tv_standard: TvStandard,
    /// SH2 master clock rate in Hz (both cores run at this rate).
    pub master_clock_hz: u64,
    /// Host audio sample rate; SCSP output is always generated at 44.1 kHz
    /// and left to the host to resample if this differs (§6.4).
    pub sample_rate_hz: u32,
    pub vram_size: VramSize,
    pub color_ram_mode: ColorRamMode,
    /// SCSP RAM size in bytes (512 KB on real hardware, §3.2).
    pub scsp_ram_size: usize,
    /// Opt into the thread-scoped parallel cell decoder at VBlank (§5).
    /// Defaults to `false`: sequential decoding, deterministic for tests.
    pub parallel_decode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tv_standard: TvStandard::Ntsc,
            master_clock_hz: 28_636_360,
            sample_rate_hz: 44_100,
            vram_size: VramSize::Mbit8,
            color_ram_mode: ColorRamMode::Mode0_1024x15,
            scsp_ram_size: 512 * 1024,
            parallel_decode: false,
        }
    }
}
