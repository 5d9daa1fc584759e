extern crate strum;
#[macro_use]
extern crate strum_macros;

#[macro_use]
extern crate bitflags;

mod address;
mod error;
pub mod hexfile;
mod opcode;
mod profile;
mod signal;

pub use address::*;
pub use error::*;
pub use opcode::*;
pub use profile::*;
pub use signal::*;

bitflags! {
    /// Condition flags latched by the AGC build, in flag-combination bit order.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct AgcFlags: u8 {
        const POS_OVERFLOW = 0b0001;
        const NEG_OVERFLOW = 0b0010;
        const ZERO = 0b0100;
        const NEG = 0b1000;
    }
}

bitflags! {
    /// Condition flags latched by the compact build, in flag-combination bit order.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CompactFlags: u8 {
        const CARRY = 0b0001;
        const ZERO = 0b0010;
        const NEG = 0b0100;
        const OVERFLOW = 0b1000;
    }
}
