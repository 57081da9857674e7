pub mod bus;
pub mod component;
pub mod config;
pub mod emulator;
pub mod error;
pub mod interrupt;
pub mod memory;
pub mod pacer;
pub mod savestate;

pub use bus::{Bus, BusMaster, PendingInterrupt};
pub use component::{BusMasterComponent, Component};
pub use config::Config;
pub use emulator::Emulator;
pub use error::EmulatorError;
