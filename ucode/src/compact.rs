use common::*;

use crate::{InstructionSet, Ucode};

/// The compact 8-bit machine: 17 control lines over two ROM chips and
/// carry/zero/negative/overflow flags.
pub struct Compact;

impl InstructionSet for Compact {
    fn config(&self) -> &BuildConfig {
        Profile::Compact.config()
    }

    fn mnemonic(&self, opcode: u8) -> Option<String> {
        CompactOpcode::from_u8(opcode).map(|o| o.to_string())
    }

    fn write_opcode(&self, u: &mut Ucode, opcode: u8) -> Result<(), ConfigError> {
        match CompactOpcode::from_u8(opcode) {
            Some(CompactOpcode::Lda) => {
                step!(u, Iro, Mai);
                step!(u, Rdo, Ari);
            }
            Some(CompactOpcode::Add) => {
                step!(u, Iro, Mai);
                step!(u, Rdo, Bri);
                step!(u, Sro, Ari, Fri);
            }
            Some(CompactOpcode::Sub) => {
                step!(u, Iro, Mai);
                step!(u, Rdo, Bri);
                step!(u, Sub, Sro, Ari, Fri);
            }
            Some(CompactOpcode::Sta) => {
                step!(u, Iro, Mai);
                step!(u, Aro, Rdi);
            }
            Some(CompactOpcode::Ldi) => {
                step!(u, Iro, Ari);
            }
            Some(CompactOpcode::Jmp) => {
                step!(u, Iro, Jmp);
            }
            Some(CompactOpcode::Outm) => {
                step!(u, Iro, Mai);
                step!(u, Rdo, Ori);
            }
            Some(CompactOpcode::Out) => {
                step!(u, Aro, Ori);
            }
            Some(CompactOpcode::Hlt) => {
                step!(u, Hlt);
            }
            Some(CompactOpcode::Nop)
            | Some(CompactOpcode::Jc)
            | Some(CompactOpcode::Jz)
            | Some(CompactOpcode::Jn)
            | Some(CompactOpcode::Jo)
            | None => {}
        }

        Ok(())
    }

    fn write_flag_variant(&self, u: &mut Ucode, opcode: u8, flags: usize) -> Result<bool, ConfigError> {
        let flags = CompactFlags::from_bits_truncate(flags as u8);
        let condition = match CompactOpcode::from_u8(opcode) {
            Some(CompactOpcode::Jc) => CompactFlags::CARRY,
            Some(CompactOpcode::Jz) => CompactFlags::ZERO,
            Some(CompactOpcode::Jn) => CompactFlags::NEG,
            Some(CompactOpcode::Jo) => CompactFlags::OVERFLOW,
            _ => return Ok(false),
        };

        if !flags.contains(condition) {
            return Ok(false);
        }

        step!(u, Iro, Jmp);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ucode, RomOutput};

    fn address(flags: CompactFlags, opcode: CompactOpcode, step: u32, byte_slice: u32) -> u32 {
        let p = Profile::Compact.config().partition().unwrap();
        p.compose(&MicroAddress { flags: flags.bits() as u32, opcode: opcode as u32, step, byte_slice })
    }

    #[test]
    fn two_chips() {
        let build = ucode(&Compact, false).unwrap();
        let (lo, hi) = match &build.rom {
            RomOutput::Split(lo, hi) => (lo, hi),
            RomOutput::Single(_) => panic!("compact image spans two chips"),
        };
        assert_eq!(0x4000, lo.len());
        assert_eq!(0x4000, hi.len());

        // byte select A13/A14: slices 0 and 1 on the low chip, slice 2 and ground on the high one
        let jmp = address(CompactFlags::empty(), CompactOpcode::Jmp, 2, 0) as usize;
        assert_eq!(0x20, lo.bytes()[jmp]); // IRO
        assert_eq!(0x80, lo.bytes()[jmp + 0x2000]); // JMP
        assert_eq!(0x00, hi.bytes()[jmp]);

        let add = address(CompactFlags::ZERO, CompactOpcode::Add, 4, 0) as usize;
        assert_eq!(0x40, lo.bytes()[add]); // ARI
        assert_eq!(0x04, lo.bytes()[add + 0x2000]); // SRO
        assert_eq!(0x01, hi.bytes()[add]); // FRI
        assert_eq!(0x00, hi.bytes()[add + 0x2000]);
    }

    #[test]
    fn conditional_jumps() {
        let build = ucode(&Compact, false).unwrap();
        let jump = build.catalog.word(&[Signal::Iro, Signal::Jmp]).unwrap();
        let cases = [
            (CompactOpcode::Jc, CompactFlags::CARRY),
            (CompactOpcode::Jz, CompactFlags::ZERO),
            (CompactOpcode::Jn, CompactFlags::NEG),
            (CompactOpcode::Jo, CompactFlags::OVERFLOW),
        ];

        for flags in 0..build.table.combinations() {
            let f = CompactFlags::from_bits_truncate(flags as u8);
            for (opcode, condition) in cases {
                let program = build.table.table(flags).unwrap().program(opcode as usize).unwrap();
                if f.contains(condition) {
                    assert_eq!(jump, program.step(2), "{} {:?}", opcode, f);
                    assert_eq!(3, program.semantic_len());
                } else {
                    assert_eq!(2, program.semantic_len(), "{} {:?}", opcode, f);
                }
            }
        }

        let rom = build.rom.concat();
        let taken = address(CompactFlags::CARRY | CompactFlags::NEG, CompactOpcode::Jc, 2, 1) as usize;
        let not_taken = address(CompactFlags::NEG, CompactOpcode::Jc, 2, 1) as usize;
        assert_eq!(0x80, rom[taken]);
        assert_eq!(0x00, rom[not_taken]);
    }

    #[test]
    fn subtract_sets_alu_mode() {
        let build = ucode(&Compact, false).unwrap();
        let t = build.table.table(0).unwrap();
        let add = t.program(CompactOpcode::Add as usize).unwrap();
        let sub = t.program(CompactOpcode::Sub as usize).unwrap();
        let sub_bit = build.catalog.word(&[Signal::Sub]).unwrap();
        assert_eq!(&add.steps()[..4], &sub.steps()[..4]);
        assert_eq!(add.step(4) | sub_bit, sub.step(4));
    }
}
