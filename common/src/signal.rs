use std::collections::BTreeMap;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use crate::SignalError;

/// A single control line driven by the microcode ROM.
#[derive(Clone, Copy, Display, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Signal {
    Hlt,
    Bai,
    Mai,
    Rdi,
    Rdo,
    Iri,
    Iro,
    Ari,
    Aro,
    Bri,
    Bro,
    Sro,
    Sub,
    Ori,
    Pce,
    Pco,
    Jmp,
    Fri,
    Ext,
    Cex,
}

impl Signal {
    pub fn description(&self) -> &'static str {
        match self {
            Signal::Hlt => "halt clock",
            Signal::Bai => "bank address in",
            Signal::Mai => "memory address in",
            Signal::Rdi => "RAM data in",
            Signal::Rdo => "RAM data out",
            Signal::Iri => "instruction register in",
            Signal::Iro => "instruction register out",
            Signal::Ari => "A register in",
            Signal::Aro => "A register out",
            Signal::Bri => "B register in",
            Signal::Bro => "B register out",
            Signal::Sro => "sum register out",
            Signal::Sub => "ALU subtract",
            Signal::Ori => "output register in",
            Signal::Pce => "program counter enable",
            Signal::Pco => "program counter out",
            Signal::Jmp => "jump (program counter in)",
            Signal::Fri => "flags register in",
            Signal::Ext => "set extend flip-flop",
            Signal::Cex => "clear extend flip-flop",
        }
    }
}

/// The set of control lines asserted during one step. Bit 0 is the least
/// significant line; the all-zero word is the idle step.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ControlWord(pub u64);

impl ControlWord {
    pub const IDLE: ControlWord = ControlWord(0);

    pub fn is_idle(&self) -> bool {
        self.0 == 0
    }

    /// Byte `slice` of the word, slice 0 being the least significant.
    /// Slices past the end of the word read as zero.
    pub fn byte(&self, slice: usize) -> u8 {
        let shifted = u32::try_from(slice)
            .ok()
            .and_then(|s| s.checked_mul(8))
            .and_then(|s| self.0.checked_shr(s));
        match shifted {
            Some(v) => (v & 0xFF) as u8,
            None => 0,
        }
    }

    /// Inverse of [`ControlWord::byte`]: `bytes[i]` lands in slice `i`.
    pub fn from_bytes(bytes: &[u8]) -> ControlWord {
        let mut le = [0u8; 8];
        for (dst, src) in le.iter_mut().zip(bytes) {
            *dst = *src;
        }
        ControlWord(u64::from_le_bytes(le))
    }
}

impl fmt::Debug for ControlWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cw0x{:08x}", self.0)
    }
}

impl BitOr for ControlWord {
    type Output = ControlWord;

    fn bitor(self, rhs: ControlWord) -> ControlWord {
        ControlWord(self.0 | rhs.0)
    }
}

impl BitOrAssign for ControlWord {
    fn bitor_assign(&mut self, rhs: ControlWord) {
        self.0 |= rhs.0;
    }
}

/// Which bit of the control word each signal drives in one build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignalCatalog {
    width: u32,
    bits: BTreeMap<Signal, u32>,
}

impl SignalCatalog {
    pub const MAX_WIDTH: u32 = u64::BITS;

    pub fn new(width: u32, assignments: &[(Signal, u32)]) -> Result<SignalCatalog, SignalError> {
        if width == 0 || width > SignalCatalog::MAX_WIDTH {
            return Err(SignalError::InvalidWidth(width));
        }

        let mut bits = BTreeMap::new();
        let mut owners: BTreeMap<u32, Signal> = BTreeMap::new();

        for &(signal, bit) in assignments {
            if bit >= width {
                return Err(SignalError::OutOfRange { signal, bit, width });
            }
            if bits.insert(signal, bit).is_some() {
                return Err(SignalError::Redeclared(signal));
            }
            if let Some(first) = owners.insert(bit, signal) {
                return Err(SignalError::Collision { bit, first, second: signal });
            }
        }

        Ok(SignalCatalog { width, bits })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of ROM bytes needed to hold one control word.
    pub fn byte_count(&self) -> usize {
        ((self.width + 7) / 8) as usize
    }

    pub fn bit(&self, signal: Signal) -> Option<u32> {
        self.bits.get(&signal).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Signal, u32)> + '_ {
        self.bits.iter().map(|(s, b)| (*s, *b))
    }

    pub fn word(&self, signals: &[Signal]) -> Result<ControlWord, SignalError> {
        let mut word = ControlWord::IDLE;
        for signal in signals {
            let bit = self.bit(*signal).ok_or(SignalError::NotWired(*signal))?;
            word |= ControlWord(1u64 << bit);
        }
        Ok(word)
    }

    /// Signals asserted by `word`, lowest bit first.
    pub fn signals(&self, word: ControlWord) -> Vec<Signal> {
        let mut asserted: Vec<(u32, Signal)> = self
            .iter()
            .filter(|(_, bit)| word.0 & (1u64 << *bit) != 0)
            .map(|(signal, bit)| (bit, signal))
            .collect();
        asserted.sort();
        asserted.into_iter().map(|(_, s)| s).collect()
    }

    pub fn format(&self, word: ControlWord) -> String {
        if word.is_idle() {
            return "-".to_owned();
        }
        self.signals(word)
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join("|")
    }
}
