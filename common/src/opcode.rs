use strum::IntoEnumIterator;

/// Instruction set of the AGC-flavoured machine. Values with
/// [`AgcOpcode::EXTENDED_PAGE`] set (`1 xxxx` in the listing) are only
/// reachable after an `EXTEND`.
#[derive(Clone, Copy, Display, Debug, PartialEq, Eq)]
#[derive(EnumIter, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum AgcOpcode {
    Tc = 0x00,     // pc <- K
    Goj = 0x01,    // start
    Ccs = 0x02,    // count, compare and skip
    Incr = 0x03,   // E += 1
    Ads = 0x04,    // A, E <- A + E
    Ca = 0x05,     // A <- MEM[K]
    Ts = 0x06,     // MEM[K] <- A
    Xch = 0x07,    // A <-> E
    Ad = 0x08,     // A += MEM[K] + FLAGS
    Bzf = 0x09,    // if ZERO { pc <- K }
    Bzmf = 0x0A,   // if ZERO | NEG { pc <- K }
    Aout = 0x0B,   // OUT <- A
    Out = 0x0C,    // OUT <- MEM[K]
    Su = 0x0D,     // A -= MEM[K] + FLAGS
    Extend = 0x0E, // next opcode is on the extended page
    Hlt = 0x0F,    // stop the clock

    Cs = 0x10,  // A <- ~MEM[K]
    Ndx = 0x11, // index next instruction
    Aug = 0x12, // augment
    Dim = 0x13, // diminish
}

impl AgcOpcode {
    pub const EXTENDED_PAGE: u8 = 0x10;

    pub fn from_u8(value: u8) -> Option<AgcOpcode> {
        AgcOpcode::iter().find(|o| *o as u8 == value)
    }

    pub fn is_extended(value: u8) -> bool {
        value & AgcOpcode::EXTENDED_PAGE != 0
    }

    /// Mnemonic as written in the opcode listing, with the page bit in front.
    pub fn listing(value: u8) -> String {
        let page = if AgcOpcode::is_extended(value) { 1 } else { 0 };
        let name = AgcOpcode::from_u8(value).map(|o| o.to_string()).unwrap_or_default();
        format!("{} {:04b} {}", page, value & 0x0F, name).trim_end().to_owned()
    }
}

/// Instruction set of the compact 8-bit machine.
#[derive(Clone, Copy, Display, Debug, PartialEq, Eq)]
#[derive(EnumIter)]
#[strum(serialize_all = "UPPERCASE")]
pub enum CompactOpcode {
    Nop = 0x00,
    Lda = 0x01,  // A <- MEM[imm]
    Add = 0x02,  // A += MEM[imm] -> FLAGS
    Sub = 0x03,  // A -= MEM[imm] -> FLAGS
    Sta = 0x04,  // MEM[imm] <- A
    Ldi = 0x05,  // A <- imm
    Jmp = 0x06,  // pc <- imm
    Jc = 0x07,   // if CARRY { pc <- imm }
    Jz = 0x08,   // if ZERO { pc <- imm }
    Jn = 0x09,   // if NEG { pc <- imm }
    Jo = 0x0A,   // if OVERFLOW { pc <- imm }
    Outm = 0x0B, // OUT <- MEM[imm]
    Out = 0x0E,  // OUT <- A
    Hlt = 0x0F,
}

impl CompactOpcode {
    pub fn from_u8(value: u8) -> Option<CompactOpcode> {
        CompactOpcode::iter().find(|o| *o as u8 == value)
    }
}
