use common::*;
use log::debug;

use crate::{InstructionSet, OpcodeTable, Ucode};

/// A separate [`OpcodeTable`] for every flag combination, indexed by the
/// combination value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpandedTable {
    tables: Vec<OpcodeTable>,
}

impl ExpandedTable {
    /// Copies `base` once per flag combination, then rewrites the opcodes
    /// whose later steps depend on the latched flags.
    pub fn expand(
        set: &dyn InstructionSet,
        base: &OpcodeTable,
        catalog: &SignalCatalog,
        print: bool,
    ) -> Result<ExpandedTable, ConfigError> {
        let config = set.config();
        let mut tables = vec![base.clone(); config.flag_combinations()];
        let mut u = Ucode::new(catalog, config.max_steps, print);

        for (flags, table) in tables.iter_mut().enumerate() {
            for opcode in 0..table.len() {
                let opcode_u8 = opcode as u8;
                u.begin(opcode_u8, flags);
                u.fetch()?;
                if set.write_flag_variant(&mut u, opcode_u8, flags)? {
                    set.write_epilogue(&mut u, opcode_u8)?;
                    if print {
                        debug!("# {} under [{}]", set.mnemonic(opcode_u8).unwrap_or_default(), config.describe_flags(flags));
                    }
                    table.replace(opcode, u.finish()?);
                }
            }
        }

        Ok(ExpandedTable { tables })
    }

    pub fn combinations(&self) -> usize {
        self.tables.len()
    }

    pub fn table(&self, flags: usize) -> Option<&OpcodeTable> {
        self.tables.get(flags)
    }

    pub fn word(&self, flags: usize, opcode: usize, step: usize) -> ControlWord {
        self.table(flags).map_or(ControlWord::IDLE, |t| t.word(opcode, step))
    }

    #[cfg(test)]
    pub(crate) fn table_mut(&mut self, flags: usize) -> Option<&mut OpcodeTable> {
        self.tables.get_mut(flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Agc, Compact};

    #[test]
    fn every_combination_is_materialised() {
        let set = Agc;
        let catalog = set.config().catalog().unwrap();
        let base = OpcodeTable::build(&set, &catalog, false).unwrap();
        let expanded = ExpandedTable::expand(&set, &base, &catalog, false).unwrap();
        assert_eq!(16, expanded.combinations());
        assert_eq!(&base, expanded.table(0).unwrap());
        assert!(expanded.table(16).is_none());
        assert_eq!(ControlWord::IDLE, expanded.word(16, 0, 0));
    }

    #[test]
    fn copies_do_not_alias() {
        let set = Compact;
        let catalog = set.config().catalog().unwrap();
        let base = OpcodeTable::build(&set, &catalog, false).unwrap();
        let mut expanded = ExpandedTable::expand(&set, &base, &catalog, false).unwrap();

        let before: Vec<ControlWord> = (0..16).map(|f| expanded.word(f, 1, 2)).collect();
        expanded.table_mut(5).unwrap().program_mut(1).unwrap().set_step(2, ControlWord(0x1_FFFF));

        assert_eq!(ControlWord(0x1_FFFF), expanded.word(5, 1, 2));
        for flags in (0..16).filter(|f| *f != 5) {
            assert_eq!(before[flags], expanded.word(flags, 1, 2), "flags {}", flags);
        }
        assert_eq!(before[5], base.word(1, 2));
    }

    #[test]
    fn flag_independent_opcodes_are_identical() {
        let set = Compact;
        let catalog = set.config().catalog().unwrap();
        let base = OpcodeTable::build(&set, &catalog, false).unwrap();
        let expanded = ExpandedTable::expand(&set, &base, &catalog, false).unwrap();

        let conditional = [CompactOpcode::Jc, CompactOpcode::Jz, CompactOpcode::Jn, CompactOpcode::Jo];
        for opcode in 0..base.len() {
            if conditional.iter().any(|c| *c as usize == opcode) {
                continue;
            }
            for flags in 0..expanded.combinations() {
                assert_eq!(base.program(opcode), expanded.table(flags).unwrap().program(opcode));
            }
        }
    }
}
