use lazy_static::lazy_static;

use crate::*;

/// Everything fixed at build time for one ROM layout.
#[derive(Clone, Debug)]
pub struct BuildConfig {
    pub name: &'static str,
    pub word_width: u32,
    pub signals: Vec<(Signal, u32)>,
    pub flag_names: Vec<&'static str>,
    pub opcode_count: usize,
    pub max_steps: usize,
    pub address_bits: u32,
    pub fields: Vec<(AddressField, Vec<u32>)>,
    pub split: Option<usize>,
}

impl BuildConfig {
    pub fn flag_bits(&self) -> u32 {
        self.flag_names.len() as u32
    }

    pub fn flag_combinations(&self) -> usize {
        1 << self.flag_bits()
    }

    pub fn byte_slices(&self) -> usize {
        ((self.word_width + 7) / 8) as usize
    }

    pub fn requirements(&self) -> FieldRequirements {
        FieldRequirements {
            flag_bits: self.flag_bits(),
            opcodes: self.opcode_count,
            steps: self.max_steps,
            byte_slices: self.byte_slices(),
        }
    }

    pub fn catalog(&self) -> Result<SignalCatalog, SignalError> {
        SignalCatalog::new(self.word_width, &self.signals)
    }

    pub fn partition(&self) -> Result<AddressPartition, PartitionError> {
        AddressPartition::new(self.address_bits, &self.fields, &self.requirements())
    }

    /// Names of the flags set in `combination`, e.g. `ZERO|NEG`.
    pub fn describe_flags(&self, combination: usize) -> String {
        let set: Vec<&str> = self
            .flag_names
            .iter()
            .enumerate()
            .filter(|(i, _)| combination & (1 << i) != 0)
            .map(|(_, name)| *name)
            .collect();
        if set.is_empty() {
            "clear".to_owned()
        } else {
            set.join("|")
        }
    }
}

#[derive(Clone, Copy, Display, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Profile {
    Agc,
    Compact,
}

impl Profile {
    pub fn config(&self) -> &'static BuildConfig {
        match self {
            Profile::Agc => &AGC,
            Profile::Compact => &COMPACT,
        }
    }
}

lazy_static! {
    static ref AGC: BuildConfig = agc();
    static ref COMPACT: BuildConfig = compact();
}

fn agc() -> BuildConfig {
    BuildConfig {
        name: "agc",
        word_width: 32,
        signals: vec![
            (Signal::Hlt, 0),
            (Signal::Bai, 1),
            (Signal::Mai, 2),
            (Signal::Rdi, 3),
            (Signal::Rdo, 4),
            (Signal::Iri, 5),
            (Signal::Iro, 6),
            (Signal::Ari, 7),
            (Signal::Aro, 8),
            (Signal::Bri, 9),
            (Signal::Bro, 10),
            (Signal::Sro, 11),
            (Signal::Sub, 12),
            (Signal::Ori, 13),
            (Signal::Pce, 14),
            (Signal::Pco, 15),
            (Signal::Jmp, 16),
            (Signal::Fri, 17),
            (Signal::Ext, 18),
            (Signal::Cex, 19),
        ],
        flag_names: AgcFlags::all().iter_names().map(|(name, _)| name).collect(),
        opcode_count: 32,
        max_steps: 16,
        // The Greenliant part has A0-A7, A12, A15 and A16 on the same side,
        // so opcode and flags take those and the byte select goes across.
        // A11 and A13 are spare and extend the byte select.
        address_bits: 17,
        fields: vec![
            (AddressField::Opcode, vec![0, 1, 2, 3, 4]),
            (AddressField::Step, vec![5, 6, 7, 8]),
            (AddressField::ByteSlice, vec![9, 10, 11, 13]),
            (AddressField::Flags, vec![12, 14, 15, 16]),
        ],
        split: None,
    }
}

fn compact() -> BuildConfig {
    BuildConfig {
        name: "compact",
        word_width: 17,
        signals: vec![
            (Signal::Hlt, 0),
            (Signal::Mai, 1),
            (Signal::Rdi, 2),
            (Signal::Rdo, 3),
            (Signal::Iri, 4),
            (Signal::Iro, 5),
            (Signal::Ari, 6),
            (Signal::Aro, 7),
            (Signal::Bri, 8),
            (Signal::Bro, 9),
            (Signal::Sro, 10),
            (Signal::Sub, 11),
            (Signal::Ori, 12),
            (Signal::Pce, 13),
            (Signal::Pco, 14),
            (Signal::Jmp, 15),
            (Signal::Fri, 16),
        ],
        flag_names: CompactFlags::all().iter_names().map(|(name, _)| name).collect(),
        opcode_count: 32,
        max_steps: 16,
        address_bits: 15,
        fields: vec![
            (AddressField::Opcode, vec![0, 1, 2, 3, 4]),
            (AddressField::Step, vec![5, 6, 7, 8]),
            (AddressField::Flags, vec![9, 10, 11, 12]),
            (AddressField::ByteSlice, vec![13, 14]),
        ],
        split: Some(1 << 14),
    }
}
