use std::borrow::Cow;

use common::*;
use log::{debug, info};

macro_rules! step {
    ($u:expr $(, $signal:ident)* $(,)?) => {
        $u.add_with_source(&[$(::common::Signal::$signal),*], file!(), line!())?
    };
}

macro_rules! step_at {
    ($u:expr, $step:expr $(, $signal:ident)* $(,)?) => {
        $u.assert_at($step, &[$(::common::Signal::$signal),*], file!(), line!())?
    };
}

mod agc;
mod compact;
mod expand;
mod microprogram;
mod rom;

pub use agc::Agc;
pub use compact::Compact;
pub use expand::ExpandedTable;
pub use microprogram::{Microprogram, OpcodeTable};
pub use rom::{build_rom, byte_at, RomImage, RomOutput};

/// Steps every opcode spends loading itself into the instruction register.
pub const FETCH_STEPS: usize = 2;

/// The per-opcode behaviour of one machine.
pub trait InstructionSet {
    fn config(&self) -> &BuildConfig;

    fn mnemonic(&self, opcode: u8) -> Option<String>;

    /// Appends the steps following the fetch prefix, as executed with every
    /// flag clear. Opcodes without semantics write nothing and stay fetch-only.
    fn write_opcode(&self, u: &mut Ucode, opcode: u8) -> Result<(), ConfigError>;

    /// Appends the post-fetch steps of `opcode` under flag combination
    /// `flags`. Returns `false` when the opcode does not depend on `flags`,
    /// in which case whatever was written is discarded.
    fn write_flag_variant(&self, _u: &mut Ucode, _opcode: u8, _flags: usize) -> Result<bool, ConfigError> {
        Ok(false)
    }

    /// Fixed-step signals `opcode` carries whichever flags are latched.
    /// Applied after `write_opcode` and after every accepted flag variant.
    fn write_epilogue(&self, _u: &mut Ucode, _opcode: u8) -> Result<(), ConfigError> {
        Ok(())
    }
}

pub fn instruction_set(profile: Profile) -> Box<dyn InstructionSet> {
    match profile {
        Profile::Agc => Box::new(Agc),
        Profile::Compact => Box::new(Compact),
    }
}

/// Accumulates the control words of one opcode at a time.
pub struct Ucode<'a> {
    catalog: &'a SignalCatalog,
    max_steps: usize,
    print: bool,

    opcode: u8,
    flags: usize,
    steps: Vec<ControlWord>,
}

impl<'a> Ucode<'a> {
    pub fn new(catalog: &'a SignalCatalog, max_steps: usize, print: bool) -> Ucode<'a> {
        Ucode {
            catalog,
            max_steps,
            print,
            opcode: 0,
            flags: 0,
            steps: Vec::new(),
        }
    }

    pub fn begin(&mut self, opcode: u8, flags: usize) {
        self.opcode = opcode;
        self.flags = flags;
        self.steps.clear();
    }

    fn resolve(&self, signals: &[Signal]) -> Result<ControlWord, ConfigError> {
        self.catalog
            .word(signals)
            .map_err(|source| ConfigError::Microprogram { opcode: self.opcode, source })
    }

    fn trace(&self, step: usize, word: ControlWord, file: &'static str, line: u32) {
        if self.print {
            let mut file = Cow::Borrowed(file);
            if file.contains('\\') {
                file = Cow::Owned(file.chars().map(|c| if c == '\\' {'/'} else {c}).collect());
            }
            debug!("#  flags:{:x} opcode:{:02x} step:{:x} {:?} {} source:{}:{}",
                self.flags, self.opcode, step, word, self.catalog.format(word), file, line);
        }
    }

    pub fn add_with_source(&mut self, signals: &[Signal], file: &'static str, line: u32) -> Result<(), ConfigError> {
        let word = self.resolve(signals)?;
        self.trace(self.steps.len(), word, file, line);
        self.steps.push(word);
        Ok(())
    }

    /// ORs `signals` into step `step`, idling any steps before it that have
    /// not been written yet.
    pub fn assert_at(&mut self, step: usize, signals: &[Signal], file: &'static str, line: u32) -> Result<(), ConfigError> {
        let word = self.resolve(signals)?;
        if self.steps.len() <= step {
            self.steps.resize(step + 1, ControlWord::IDLE);
        }
        self.steps[step] |= word;
        self.trace(step, self.steps[step], file, line);
        Ok(())
    }

    /// Address bus from the program counter, then the instruction register
    /// from memory while the program counter advances.
    pub fn fetch(&mut self) -> Result<(), ConfigError> {
        step!(self, Mai, Pco);
        step!(self, Rdo, Iri, Pce);
        Ok(())
    }

    pub fn finish(&mut self) -> Result<Microprogram, ConfigError> {
        let steps = self.steps.len();
        if steps > self.max_steps {
            return Err(ConfigError::MicroprogramTooLong { opcode: self.opcode, steps, max: self.max_steps });
        }
        let mut words = std::mem::take(&mut self.steps);
        words.resize(self.max_steps, ControlWord::IDLE);
        Ok(Microprogram::new(words))
    }
}

/// Result of one generator run.
pub struct UcodeBuild {
    pub catalog: SignalCatalog,
    pub partition: AddressPartition,
    pub table: ExpandedTable,
    pub rom: RomOutput,
}

/// Validates the wiring of `set`, builds its microprogram table, expands it
/// per flag combination and lays it out as ROM bytes.
pub fn ucode(set: &dyn InstructionSet, print: bool) -> Result<UcodeBuild, ConfigError> {
    let config = set.config();
    let catalog = config.catalog()?;
    let partition = config.partition()?;

    let base = OpcodeTable::build(set, &catalog, print)?;
    let table = ExpandedTable::expand(set, &base, &catalog, print)?;
    let rom = build_rom(&table, &partition, config.split)?;

    info!("{}: {} opcodes x {} steps x {} flag combinations -> {} byte image in {} chip(s), hash {:08x}",
        config.name,
        config.opcode_count,
        config.max_steps,
        table.combinations(),
        partition.size(),
        rom.chips().len(),
        rom.hash());

    Ok(UcodeBuild { catalog, partition, table, rom })
}
