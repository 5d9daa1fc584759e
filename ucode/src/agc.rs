use common::*;

use crate::{InstructionSet, Ucode};

/// Step at which extended-page opcodes drop back to the base page.
pub const CLEAR_EXTEND_STEP: usize = 11;

/// The AGC-flavoured machine: 32-bit control word, extended opcode page,
/// overflow/zero/negative flags.
pub struct Agc;

impl InstructionSet for Agc {
    fn config(&self) -> &BuildConfig {
        Profile::Agc.config()
    }

    fn mnemonic(&self, opcode: u8) -> Option<String> {
        Some(AgcOpcode::listing(opcode))
    }

    fn write_opcode(&self, u: &mut Ucode, opcode: u8) -> Result<(), ConfigError> {
        match AgcOpcode::from_u8(opcode) {
            Some(AgcOpcode::Tc) => {
                step!(u, Iro, Jmp);
            }
            Some(AgcOpcode::Ca) => {
                step!(u, Iro, Mai);
                step!(u, Rdo, Ari);
            }
            Some(AgcOpcode::Ts) => {
                step!(u, Iro, Mai);
                step!(u, Aro, Rdi);
            }
            Some(AgcOpcode::Ad) => {
                step!(u, Iro, Mai);
                step!(u, Rdo, Bri);
                step!(u, Sro, Ari, Fri);
            }
            Some(AgcOpcode::Su) => {
                step!(u, Iro, Mai);
                step!(u, Rdo, Bri);
                step!(u, Sub, Sro, Ari, Fri);
            }
            Some(AgcOpcode::Aout) => {
                step!(u, Aro, Ori);
            }
            Some(AgcOpcode::Out) => {
                step!(u, Iro, Mai);
                step!(u, Rdo, Ori);
            }
            Some(AgcOpcode::Extend) => {
                step!(u, Ext);
            }
            Some(AgcOpcode::Hlt) => {
                step!(u, Hlt);
            }
            // need hardware that isn't on the board yet, BZF and BZMF included:
            // the flags register is latched but nothing reads it back
            Some(AgcOpcode::Goj) | Some(AgcOpcode::Ccs) | Some(AgcOpcode::Incr) | Some(AgcOpcode::Ads)
            | Some(AgcOpcode::Xch) | Some(AgcOpcode::Bzf) | Some(AgcOpcode::Bzmf) | Some(AgcOpcode::Cs)
            | Some(AgcOpcode::Ndx) | Some(AgcOpcode::Aug) | Some(AgcOpcode::Dim) => {}
            None => {}
        }

        Ok(())
    }

    fn write_epilogue(&self, u: &mut Ucode, opcode: u8) -> Result<(), ConfigError> {
        if AgcOpcode::is_extended(opcode) {
            step_at!(u, CLEAR_EXTEND_STEP, Cex);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ucode, RomOutput, FETCH_STEPS};

    fn image() -> Vec<u8> {
        match ucode(&Agc, false).unwrap().rom {
            RomOutput::Single(rom) => rom.into_bytes(),
            RomOutput::Split(..) => panic!("agc image is a single chip"),
        }
    }

    fn address(flags: u32, opcode: AgcOpcode, step: u32, byte_slice: u32) -> usize {
        let p = Profile::Agc.config().partition().unwrap();
        p.compose(&MicroAddress { flags, opcode: opcode as u32, step, byte_slice }) as usize
    }

    #[test]
    fn known_bytes() {
        let rom = image();
        assert_eq!(1 << 17, rom.len());

        // MAI|PCO
        assert_eq!(0x04, rom[0]);
        assert_eq!(0x80, rom[1 << 9]);
        // TC: IRO|JMP
        assert_eq!(0x40, rom[address(0, AgcOpcode::Tc, 2, 0)]);
        assert_eq!(0x00, rom[address(0, AgcOpcode::Tc, 2, 1)]);
        assert_eq!(0x01, rom[address(0, AgcOpcode::Tc, 2, 2)]);
        assert_eq!(0x00, rom[address(0, AgcOpcode::Tc, 2, 3)]);
        // SU: SUB|SRO|ARI|FRI
        assert_eq!(0x80, rom[address(0, AgcOpcode::Su, 4, 0)]);
        assert_eq!(0x18, rom[address(0, AgcOpcode::Su, 4, 1)]);
        assert_eq!(0x02, rom[address(0, AgcOpcode::Su, 4, 2)]);
        // spare byte select lines read as ground
        for byte_slice in 4..16 {
            assert_eq!(0x00, rom[address(0, AgcOpcode::Su, 4, byte_slice)]);
            assert_eq!(0x00, rom[address(0, AgcOpcode::Tc, 0, byte_slice)]);
        }
    }

    #[test]
    fn microprograms() {
        let build = ucode(&Agc, false).unwrap();
        let c = &build.catalog;
        let t = build.table.table(0).unwrap();
        let word = |s: &[Signal]| c.word(s).unwrap();

        let ca = t.program(AgcOpcode::Ca as usize).unwrap();
        assert_eq!(word(&[Signal::Iro, Signal::Mai]), ca.step(2));
        assert_eq!(word(&[Signal::Rdo, Signal::Ari]), ca.step(3));

        let ts = t.program(AgcOpcode::Ts as usize).unwrap();
        assert_eq!(word(&[Signal::Iro, Signal::Mai]), ts.step(2));
        assert_eq!(word(&[Signal::Aro, Signal::Rdi]), ts.step(3));

        let ad = t.program(AgcOpcode::Ad as usize).unwrap();
        let su = t.program(AgcOpcode::Su as usize).unwrap();
        assert_eq!(ad.step(3), su.step(3));
        assert_eq!(word(&[Signal::Sro, Signal::Ari, Signal::Fri]), ad.step(4));
        assert_eq!(ad.step(4) | word(&[Signal::Sub]), su.step(4));

        let hlt = t.program(AgcOpcode::Hlt as usize).unwrap();
        assert_eq!(word(&[Signal::Hlt]), hlt.step(2));

        let extend = t.program(AgcOpcode::Extend as usize).unwrap();
        assert_eq!(word(&[Signal::Ext]), extend.step(2));
        assert_eq!(FETCH_STEPS + 1, extend.semantic_len());
    }

    #[test]
    fn idle_padding() {
        let build = ucode(&Agc, false).unwrap();
        let expected_len = |opcode: u8| match AgcOpcode::from_u8(opcode) {
            Some(AgcOpcode::Tc) | Some(AgcOpcode::Aout) | Some(AgcOpcode::Extend) | Some(AgcOpcode::Hlt) => 3,
            Some(AgcOpcode::Ca) | Some(AgcOpcode::Ts) | Some(AgcOpcode::Out) => 4,
            Some(AgcOpcode::Ad) | Some(AgcOpcode::Su) => 5,
            _ if AgcOpcode::is_extended(opcode) => CLEAR_EXTEND_STEP + 1,
            _ => FETCH_STEPS,
        };

        let t = build.table.table(0).unwrap();
        for opcode in 0..t.len() {
            let program = t.program(opcode).unwrap();
            assert_eq!(16, program.len());
            assert_eq!(expected_len(opcode as u8), program.semantic_len(), "opcode {:02x}", opcode);
            assert!(program.steps()[program.semantic_len()..].iter().all(|w| w.is_idle()));
        }
    }

    #[test]
    fn extended_page_clears_extend() {
        let build = ucode(&Agc, false).unwrap();
        let cex = build.catalog.word(&[Signal::Cex]).unwrap();
        for flags in 0..build.table.combinations() {
            let t = build.table.table(flags).unwrap();
            for opcode in 0..t.len() {
                let program = t.program(opcode).unwrap();
                let clears = program.steps().iter().any(|w| w.0 & cex.0 != 0);
                assert_eq!(AgcOpcode::is_extended(opcode as u8), clears, "opcode {:02x}", opcode);
                if clears {
                    assert_eq!(cex, program.step(CLEAR_EXTEND_STEP));
                }
            }
        }
    }

    #[test]
    fn flags_do_not_change_the_image() {
        let build = ucode(&Agc, false).unwrap();
        let base = build.table.table(0).unwrap();
        assert_eq!(16, build.table.combinations());

        for flags in 0..build.table.combinations() {
            assert_eq!(base, build.table.table(flags).unwrap(), "flags {:?}", AgcFlags::from_bits_truncate(flags as u8));
        }

        for opcode in [AgcOpcode::Bzf, AgcOpcode::Bzmf] {
            let program = base.program(opcode as usize).unwrap();
            assert_eq!(FETCH_STEPS, program.semantic_len(), "{}", opcode);
        }

        // BZF at step 2 with ZERO latched
        let rom = image();
        assert_eq!(0x00, rom[address(AgcFlags::ZERO.bits() as u32, AgcOpcode::Bzf, 2, 0)]);
        assert_eq!(0x00, rom[0x8049]);
    }

    /// The AGC machine with a flag-dependent extended opcode.
    struct BranchingDim;

    impl InstructionSet for BranchingDim {
        fn config(&self) -> &BuildConfig {
            Agc.config()
        }

        fn mnemonic(&self, opcode: u8) -> Option<String> {
            Agc.mnemonic(opcode)
        }

        fn write_opcode(&self, u: &mut Ucode, opcode: u8) -> Result<(), ConfigError> {
            Agc.write_opcode(u, opcode)
        }

        fn write_flag_variant(&self, u: &mut Ucode, opcode: u8, flags: usize) -> Result<bool, ConfigError> {
            let zero = AgcFlags::from_bits_truncate(flags as u8).contains(AgcFlags::ZERO);
            if opcode != AgcOpcode::Dim as u8 || !zero {
                return Ok(false);
            }
            step!(u, Iro, Jmp);
            Ok(true)
        }

        fn write_epilogue(&self, u: &mut Ucode, opcode: u8) -> Result<(), ConfigError> {
            Agc.write_epilogue(u, opcode)
        }
    }

    #[test]
    fn flag_variants_keep_clear_extend() {
        let build = ucode(&BranchingDim, false).unwrap();
        let jump = build.catalog.word(&[Signal::Iro, Signal::Jmp]).unwrap();
        let cex = build.catalog.word(&[Signal::Cex]).unwrap();
        let dim = AgcOpcode::Dim as usize;

        let taken = build.table.table(AgcFlags::ZERO.bits() as usize).unwrap().program(dim).unwrap();
        assert_eq!(jump, taken.step(2));
        assert_eq!(cex, taken.step(CLEAR_EXTEND_STEP));
        assert_eq!(CLEAR_EXTEND_STEP + 1, taken.semantic_len());

        let plain = build.table.table(0).unwrap().program(dim).unwrap();
        assert_eq!(ControlWord::IDLE, plain.step(2));
        assert_eq!(cex, plain.step(CLEAR_EXTEND_STEP));
    }
}
