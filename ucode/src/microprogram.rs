use common::*;

use crate::{InstructionSet, Ucode};

/// Control words of one opcode, one per step, padded with idle words to the
/// sequencer length.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Microprogram {
    steps: Vec<ControlWord>,
}

impl Microprogram {
    pub(crate) fn new(steps: Vec<ControlWord>) -> Microprogram {
        Microprogram { steps }
    }

    pub fn steps(&self) -> &[ControlWord] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Word at `step`; idle past the end.
    pub fn step(&self, step: usize) -> ControlWord {
        self.steps.get(step).copied().unwrap_or(ControlWord::IDLE)
    }

    /// Steps up to and including the last non-idle one.
    pub fn semantic_len(&self) -> usize {
        self.steps.iter().rposition(|w| !w.is_idle()).map_or(0, |i| i + 1)
    }

    #[cfg(test)]
    pub(crate) fn set_step(&mut self, step: usize, word: ControlWord) {
        self.steps[step] = word;
    }
}

/// One microprogram per opcode value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpcodeTable {
    programs: Vec<Microprogram>,
}

impl OpcodeTable {
    /// The canonical table: every opcode as it runs with all flags clear.
    pub fn build(set: &dyn InstructionSet, catalog: &SignalCatalog, print: bool) -> Result<OpcodeTable, ConfigError> {
        let config = set.config();
        if config.opcode_count > 1 << u8::BITS {
            return Err(ConfigError::TooManyOpcodes(config.opcode_count));
        }

        let mut u = Ucode::new(catalog, config.max_steps, print);
        let mut programs = Vec::with_capacity(config.opcode_count);

        for opcode in 0..config.opcode_count {
            let opcode = opcode as u8;
            u.begin(opcode, 0);
            u.fetch()?;
            set.write_opcode(&mut u, opcode)?;
            set.write_epilogue(&mut u, opcode)?;
            programs.push(u.finish()?);
        }

        Ok(OpcodeTable { programs })
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    pub fn program(&self, opcode: usize) -> Option<&Microprogram> {
        self.programs.get(opcode)
    }

    /// Word for (`opcode`, `step`); idle for anything outside the table.
    pub fn word(&self, opcode: usize, step: usize) -> ControlWord {
        self.program(opcode).map_or(ControlWord::IDLE, |p| p.step(step))
    }

    pub(crate) fn replace(&mut self, opcode: usize, program: Microprogram) {
        self.programs[opcode] = program;
    }

    #[cfg(test)]
    pub(crate) fn program_mut(&mut self, opcode: usize) -> Option<&mut Microprogram> {
        self.programs.get_mut(opcode)
    }
}
