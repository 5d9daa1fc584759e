use std::collections::hash_map::DefaultHasher;
use std::hash::Hasher;

use common::*;

use crate::ExpandedTable;

/// Contents of one ROM, lowest address first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RomImage {
    bytes: Vec<u8>,
}

impl RomImage {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

fn hash_bytes(bytes: &[u8]) -> u32 {
    let mut hasher = DefaultHasher::new();
    hasher.write(bytes);
    (hasher.finish() % 0x1_0000_0000) as u32
}

/// A logical image either burned whole or halved across two chips.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RomOutput {
    Single(RomImage),
    Split(RomImage, RomImage),
}

impl RomOutput {
    pub fn chips(&self) -> Vec<&RomImage> {
        match self {
            RomOutput::Single(rom) => vec![rom],
            RomOutput::Split(lo, hi) => vec![lo, hi],
        }
    }

    /// The logical image, halves rejoined in address order.
    pub fn concat(&self) -> Vec<u8> {
        self.chips().iter().flat_map(|c| c.bytes().iter().copied()).collect()
    }

    /// Hash of the logical image, independent of the split.
    pub fn hash(&self) -> u32 {
        hash_bytes(&self.concat())
    }
}

/// The ROM byte at `address`.
pub fn byte_at(table: &ExpandedTable, partition: &AddressPartition, address: u32) -> u8 {
    let m = partition.decompose(address);
    table
        .word(m.flags as usize, m.opcode as usize, m.step as usize)
        .byte(m.byte_slice as usize)
}

/// Walks the whole address space in order. With `split` the image is cut
/// in two at that address, which has to be the midpoint.
pub fn build_rom(table: &ExpandedTable, partition: &AddressPartition, split: Option<usize>) -> Result<RomOutput, ConfigError> {
    let size = partition.size();
    if let Some(at) = split {
        if at.checked_mul(2) != Some(size) {
            return Err(ConfigError::InvalidSplit { at, size });
        }
    }

    let bytes: Vec<u8> = (0..size as u32).map(|address| byte_at(table, partition, address)).collect();

    Ok(split_image(bytes, split))
}

fn split_image(mut bytes: Vec<u8>, split: Option<usize>) -> RomOutput {
    match split {
        None => RomOutput::Single(RomImage { bytes }),
        Some(at) => {
            let hi = bytes.split_off(at);
            RomOutput::Split(RomImage { bytes }, RomImage { bytes: hi })
        }
    }
}
