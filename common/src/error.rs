use thiserror::Error;

use crate::{AddressField, Signal};

/// Problems with the signal-to-bit assignment of a build.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignalError {
    #[error("control word width {0} is not in 1..=64")]
    InvalidWidth(u32),
    #[error("signals {first} and {second} both claim bit {bit}")]
    Collision { bit: u32, first: Signal, second: Signal },
    #[error("signal {signal} at bit {bit} does not fit a {width}-bit control word")]
    OutOfRange { signal: Signal, bit: u32, width: u32 },
    #[error("signal {0} is assigned more than once")]
    Redeclared(Signal),
    #[error("signal {0} is not wired in this build")]
    NotWired(Signal),
}

/// Problems with the address-line to field wiring of a build.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PartitionError {
    #[error("address width {0} is not in 1..=28")]
    InvalidAddressWidth(u32),
    #[error("field {0} is declared more than once")]
    FieldRedeclared(AddressField),
    #[error("field {field} uses line A{line} but the address is only {address_bits} bits wide")]
    LineOutOfRange { field: AddressField, line: u32, address_bits: u32 },
    #[error("address line A{line} is claimed by both {first} and {second}")]
    LineShared { line: u32, first: AddressField, second: AddressField },
    #[error("address line A{0} is not assigned to any field")]
    LineUnassigned(u32),
    #[error("flags field is {width} bits wide, the build latches {expected} flags")]
    FlagWidth { width: u32, expected: u32 },
    #[error("field {field} is {width} bits wide and cannot hold {values} values")]
    FieldTooNarrow { field: AddressField, width: u32, values: usize },
}

/// Anything that stops a ROM image from being generated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error(transparent)]
    Signal(#[from] SignalError),
    #[error(transparent)]
    Partition(#[from] PartitionError),
    #[error("opcode {opcode:#04x}: {source}")]
    Microprogram { opcode: u8, source: SignalError },
    #[error("opcode {opcode:#04x} needs {steps} steps, the sequencer only counts to {max}")]
    MicroprogramTooLong { opcode: u8, steps: usize, max: usize },
    #[error("{0} opcodes do not fit an 8-bit instruction register")]
    TooManyOpcodes(usize),
    #[error("split point {at:#x} is not the midpoint of a {size:#x} byte image")]
    InvalidSplit { at: usize, size: usize },
}
