use strum::{EnumCount, IntoEnumIterator};

use crate::PartitionError;

/// Logical fields carried on the ROM address lines.
#[derive(Clone, Copy, Display, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(EnumCount, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum AddressField {
    Flags = 0,
    Opcode = 1,
    Step = 2,
    ByteSlice = 3,
}

/// One ROM address split into its logical fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MicroAddress {
    pub flags: u32,
    pub opcode: u32,
    pub step: u32,
    pub byte_slice: u32,
}

impl MicroAddress {
    pub fn get(&self, field: AddressField) -> u32 {
        match field {
            AddressField::Flags => self.flags,
            AddressField::Opcode => self.opcode,
            AddressField::Step => self.step,
            AddressField::ByteSlice => self.byte_slice,
        }
    }

    fn get_mut(&mut self, field: AddressField) -> &mut u32 {
        match field {
            AddressField::Flags => &mut self.flags,
            AddressField::Opcode => &mut self.opcode,
            AddressField::Step => &mut self.step,
            AddressField::ByteSlice => &mut self.byte_slice,
        }
    }
}

/// The value ranges a partition has to be able to address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldRequirements {
    pub flag_bits: u32,
    pub opcodes: usize,
    pub steps: usize,
    pub byte_slices: usize,
}

/// Assignment of physical address lines to logical fields.
///
/// `lines(field)[i]` is the address line carrying bit `i` of that field. The
/// assignment follows the board wiring, so a field does not need to sit on
/// contiguous lines. Every line belongs to exactly one field, which makes
/// [`AddressPartition::decompose`] and [`AddressPartition::compose`] inverse
/// bijections over the whole address space.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddressPartition {
    address_bits: u32,
    lines: [Vec<u32>; AddressField::COUNT],
}

impl AddressPartition {
    pub const MAX_ADDRESS_BITS: u32 = 28;

    pub fn new(
        address_bits: u32,
        fields: &[(AddressField, Vec<u32>)],
        requirements: &FieldRequirements,
    ) -> Result<AddressPartition, PartitionError> {
        if address_bits == 0 || address_bits > AddressPartition::MAX_ADDRESS_BITS {
            return Err(PartitionError::InvalidAddressWidth(address_bits));
        }

        let mut declared = [false; AddressField::COUNT];
        let mut owners: Vec<Option<AddressField>> = vec![None; address_bits as usize];
        let mut lines: [Vec<u32>; AddressField::COUNT] = Default::default();

        for (field, field_lines) in fields {
            if declared[*field as usize] {
                return Err(PartitionError::FieldRedeclared(*field));
            }
            declared[*field as usize] = true;

            for &line in field_lines {
                let owner = owners
                    .get_mut(line as usize)
                    .ok_or(PartitionError::LineOutOfRange { field: *field, line, address_bits })?;
                if let Some(first) = *owner {
                    return Err(PartitionError::LineShared { line, first, second: *field });
                }
                *owner = Some(*field);
            }
            lines[*field as usize] = field_lines.clone();
        }

        if let Some(line) = owners.iter().position(|o| o.is_none()) {
            return Err(PartitionError::LineUnassigned(line as u32));
        }

        let partition = AddressPartition { address_bits, lines };
        partition.check(requirements)?;
        Ok(partition)
    }

    fn check(&self, requirements: &FieldRequirements) -> Result<(), PartitionError> {
        let flags_width = self.width(AddressField::Flags);
        if flags_width != requirements.flag_bits {
            return Err(PartitionError::FlagWidth { width: flags_width, expected: requirements.flag_bits });
        }

        for (field, values) in [
            (AddressField::Opcode, requirements.opcodes),
            (AddressField::Step, requirements.steps),
            (AddressField::ByteSlice, requirements.byte_slices),
        ] {
            if self.capacity(field) < values {
                return Err(PartitionError::FieldTooNarrow { field, width: self.width(field), values });
            }
        }

        Ok(())
    }

    pub fn address_bits(&self) -> u32 {
        self.address_bits
    }

    /// Number of addresses, i.e. the ROM size in bytes.
    pub fn size(&self) -> usize {
        1 << self.address_bits
    }

    pub fn lines(&self, field: AddressField) -> &[u32] {
        &self.lines[field as usize]
    }

    pub fn width(&self, field: AddressField) -> u32 {
        self.lines(field).len() as u32
    }

    /// Number of distinct values the field can carry.
    pub fn capacity(&self, field: AddressField) -> usize {
        1 << self.width(field)
    }

    pub fn decompose(&self, address: u32) -> MicroAddress {
        let mut decoded = MicroAddress::default();
        for field in AddressField::iter() {
            let value = self
                .lines(field)
                .iter()
                .enumerate()
                .fold(0, |acc, (i, line)| acc | (((address >> line) & 1) << i));
            *decoded.get_mut(field) = value;
        }
        decoded
    }

    /// Inverse of [`AddressPartition::decompose`]. Field bits beyond a
    /// field's width are ignored.
    pub fn compose(&self, decoded: &MicroAddress) -> u32 {
        let mut address = 0;
        for field in AddressField::iter() {
            let value = decoded.get(field);
            for (i, line) in self.lines(field).iter().enumerate() {
                address |= ((value >> i) & 1) << line;
            }
        }
        address
    }

    /// One line per field, e.g. `opcode: A0 A1 A2 A3 A4`.
    pub fn describe(&self) -> Vec<String> {
        AddressField::iter()
            .map(|field| {
                let lines: Vec<String> = self.lines(field).iter().map(|l| format!("A{}", l)).collect();
                format!("{}: {}", field, lines.join(" "))
            })
            .collect()
    }
}
