pub mod core;
pub mod cpu;
pub mod scsp;
pub mod vdp2;

pub mod prelude {
    pub use crate::core::emulator::{Emulator, StepResult};
    pub use crate::core::{Bus, BusMaster, BusMasterComponent, Component, Config, EmulatorError};
    pub use crate::cpu::Cpu;
    pub use crate::vdp2::scroll_screen::ScrollScreen;
}
