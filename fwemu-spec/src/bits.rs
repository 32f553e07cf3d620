//! # Bit Vectors
//!
//! Every value in the machine (instruction words, memory cells, registers,
//! stack entries, the return address) is a [`BitVector`]: a fixed-length
//! sequence of bits, most significant bit first.

use bitvec::prelude::*;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Widest value that converts to and from an integer
pub const MAX_UINT_BITS: usize = 64;

/// Fixed-length, MSB-first bit vector
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct BitVector(BitVec<u8, Msb0>);

impl BitVector {
    /// Zero-filled vector of `len` bits
    pub fn zeros(len: usize) -> Self {
        Self(BitVec::repeat(false, len))
    }

    /// Encode `value` in exactly `width` bits.
    ///
    /// Returns `None` when the value does not fit.
    pub fn from_uint(value: u64, width: usize) -> Option<Self> {
        if width < MAX_UINT_BITS && value >> width != 0 {
            return None;
        }
        Some(Self::from_uint_wrapping(value, width))
    }

    /// Encode the low `width` bits of `value`, dropping the rest.
    pub fn from_uint_wrapping(value: u64, width: usize) -> Self {
        let mut bits = BitVec::<u8, Msb0>::repeat(false, width);
        for i in 0..width.min(MAX_UINT_BITS) {
            if (value >> i) & 1 == 1 {
                bits.set(width - 1 - i, true);
            }
        }
        Self(bits)
    }

    /// Unsigned integer value (low 64 bits for wider vectors)
    pub fn to_uint(&self) -> u64 {
        self.0
            .iter()
            .by_vals()
            .fold(0u64, |acc, bit| (acc << 1) | bit as u64)
    }

    /// Copy of `len` bits starting at `offset`
    pub fn slice(&self, offset: usize, len: usize) -> Option<Self> {
        let end = offset.checked_add(len)?;
        self.0.get(offset..end).map(|bits| Self(bits.to_bitvec()))
    }

    /// New vector holding `self` followed by `other`
    pub fn concat(&self, other: &BitVector) -> Self {
        let mut bits = self.0.clone();
        bits.extend_from_bitslice(&other.0);
        Self(bits)
    }

    /// Append `other` in place
    pub fn extend(&mut self, other: &BitVector) {
        self.0.extend_from_bitslice(&other.0);
    }

    /// Zero every bit, keeping the length
    pub fn clear(&mut self) {
        self.0.fill(false);
    }

    /// Same value in `width` bits.
    ///
    /// Narrowing drops the high-order bits; widening pads with leading zeros.
    pub fn resized(&self, width: usize) -> Self {
        let len = self.len();
        if len == width {
            return self.clone();
        }
        if len > width {
            return Self(self.0[len - width..].to_bitvec());
        }
        let mut bits = BitVec::<u8, Msb0>::repeat(false, width - len);
        bits.extend_from_bitslice(&self.0);
        Self(bits)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every bit is zero
    pub fn is_zero(&self) -> bool {
        self.0.not_any()
    }
}

/// Error parsing a `0`/`1` string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid bit character {0:?}")]
pub struct ParseBitsError(pub char);

impl FromStr for BitVector {
    type Err = ParseBitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bits = BitVec::<u8, Msb0>::with_capacity(s.len());
        for c in s.chars() {
            match c {
                '0' => bits.push(false),
                '1' => bits.push(true),
                other => return Err(ParseBitsError(other)),
            }
        }
        Ok(Self(bits))
    }
}

impl fmt::Display for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.0.iter().by_vals() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl fmt::Debug for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitVector({})", self)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_uint_round_trip(width in 1usize..=64, value in any::<u64>()) {
            let value = if width == 64 { value } else { value & ((1u64 << width) - 1) };
            let v = BitVector::from_uint(value, width).unwrap();
            prop_assert_eq!(v.len(), width);
            prop_assert_eq!(v.to_uint(), value);
        }

        #[test]
        fn test_wrapping_is_modular(width in 1usize..64, value in any::<u64>()) {
            let v = BitVector::from_uint_wrapping(value, width);
            prop_assert_eq!(v.to_uint(), value % (1u64 << width));
        }

        #[test]
        fn test_string_round_trip(s in "[01]{0,40}") {
            let v: BitVector = s.parse().unwrap();
            prop_assert_eq!(v.to_string(), s);
        }

        #[test]
        fn test_split_concat(s in "[01]{1,40}", cut in 0usize..40) {
            let v: BitVector = s.parse().unwrap();
            let cut = cut.min(v.len());
            let head = v.slice(0, cut).unwrap();
            let tail = v.slice(cut, v.len() - cut).unwrap();
            prop_assert_eq!(head.concat(&tail), v);
        }
    }
}
