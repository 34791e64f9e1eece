//! Binary encoding of rational numbers
//!
//! The layout is `[i32 length][numerator bytes][i32 length][denominator
//! bytes]`, each integer in two's complement. Endianness and signedness of
//! the payload are configurable through [ByteFormat]; the length prefixes
//! follow the configured endianness.

use super::Rational;
use crate::error::ArithmeticError;
use core::convert::TryFrom;
use num_bigint::{BigInt, Sign};
use num_traits::Signed;

/// Byte order of the length prefixes and integer payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

/// Describes how the two integers of a [Rational] are laid out in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteFormat {
    pub endianness: Endianness,
    /// Whether payloads carry a two's complement sign. An unsigned format
    /// cannot encode a negative numerator and fails with
    /// [ArithmeticError::Overflow].
    pub signed: bool,
}

impl Default for ByteFormat {
    #[inline]
    fn default() -> Self {
        ByteFormat {
            endianness: Endianness::Little,
            signed: true,
        }
    }
}

impl ByteFormat {
    fn int_to_bytes(&self, v: &BigInt) -> Result<Vec<u8>, ArithmeticError> {
        if self.signed {
            Ok(match self.endianness {
                Endianness::Little => v.to_signed_bytes_le(),
                Endianness::Big => v.to_signed_bytes_be(),
            })
        } else if v.is_negative() {
            Err(ArithmeticError::Overflow)
        } else {
            Ok(match self.endianness {
                Endianness::Little => v.to_bytes_le().1,
                Endianness::Big => v.to_bytes_be().1,
            })
        }
    }

    fn int_from_bytes(&self, bytes: &[u8]) -> BigInt {
        if self.signed {
            match self.endianness {
                Endianness::Little => BigInt::from_signed_bytes_le(bytes),
                Endianness::Big => BigInt::from_signed_bytes_be(bytes),
            }
        } else {
            match self.endianness {
                Endianness::Little => BigInt::from_bytes_le(Sign::Plus, bytes),
                Endianness::Big => BigInt::from_bytes_be(Sign::Plus, bytes),
            }
        }
    }

    fn len_to_bytes(&self, len: usize) -> Result<[u8; 4], ArithmeticError> {
        let len = i32::try_from(len).map_err(|_| ArithmeticError::Overflow)?;
        Ok(match self.endianness {
            Endianness::Little => len.to_le_bytes(),
            Endianness::Big => len.to_be_bytes(),
        })
    }

    fn read_int(&self, input: &[u8]) -> Result<(BigInt, usize), ArithmeticError> {
        if input.len() < 4 {
            return Err(ArithmeticError::OutOfRange);
        }
        let mut prefix = [0u8; 4];
        prefix.copy_from_slice(&input[..4]);
        let len = match self.endianness {
            Endianness::Little => i32::from_le_bytes(prefix),
            Endianness::Big => i32::from_be_bytes(prefix),
        };
        if len < 0 {
            return Err(ArithmeticError::OutOfRange);
        }
        let len = len as usize;
        if input.len() - 4 < len {
            return Err(ArithmeticError::OutOfRange);
        }
        Ok((self.int_from_bytes(&input[4..4 + len]), 4 + len))
    }
}

impl Rational {
    /// Append the encoded value to `out` and return the number of bytes
    /// written. On failure nothing is written.
    pub fn write_bytes(&self, out: &mut Vec<u8>, format: ByteFormat) -> Result<usize, ArithmeticError> {
        // encode both integers before touching the output
        let numer = format.int_to_bytes(&self.numer)?;
        let denom = format.int_to_bytes(&self.denom)?;
        let numer_len = format.len_to_bytes(numer.len())?;
        let denom_len = format.len_to_bytes(denom.len())?;

        out.extend_from_slice(&numer_len);
        out.extend_from_slice(&numer);
        out.extend_from_slice(&denom_len);
        out.extend_from_slice(&denom);
        Ok(8 + numer.len() + denom.len())
    }

    /// Encode into a fresh buffer; see [Rational::write_bytes]
    pub fn to_bytes(&self, format: ByteFormat) -> Result<Vec<u8>, ArithmeticError> {
        let mut out = Vec::new();
        self.write_bytes(&mut out, format)?;
        Ok(out)
    }

    /// Exact inverse of [Rational::write_bytes]: decode a value from the
    /// front of `input` and return it with the number of bytes consumed.
    pub fn read_bytes(input: &[u8], format: ByteFormat) -> Result<(Rational, usize), ArithmeticError> {
        let (numer, used_n) = format.read_int(input)?;
        let (denom, used_d) = format.read_int(&input[used_n..])?;
        // no reduction: the value is reproduced exactly as written
        let value = Rational::new_unreduced(numer, denom)?;
        Ok((value, used_n + used_d))
    }

    /// Non-panicking, non-failing wrapper of [Rational::write_bytes]
    #[inline]
    pub fn try_write_bytes(&self, out: &mut Vec<u8>, format: ByteFormat) -> Option<usize> {
        self.write_bytes(out, format).ok()
    }

    /// Non-panicking, non-failing wrapper of [Rational::read_bytes]
    #[inline]
    pub fn try_read_bytes(input: &[u8], format: ByteFormat) -> Option<(Rational, usize)> {
        Self::read_bytes(input, format).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::{Pow, Zero};

    fn formats() -> [ByteFormat; 2] {
        [
            ByteFormat::default(),
            ByteFormat {
                endianness: Endianness::Big,
                signed: true,
            },
        ]
    }

    #[test]
    fn round_trip_test() {
        let huge = BigInt::from(10).pow(40u32);
        let samples = [
            Rational::zero(),
            Rational::new(1, 2).unwrap(),
            Rational::new(-355, 113).unwrap(),
            Rational::new(i64::MAX, 255).unwrap(),
            Rational::new(huge.clone() + 1, huge).unwrap(),
        ];

        for format in formats().iter() {
            for value in samples.iter() {
                let mut buf = Vec::new();
                let written = value.write_bytes(&mut buf, *format).unwrap();
                assert_eq!(written, buf.len());

                let (back, used) = Rational::read_bytes(&buf, *format).unwrap();
                assert_eq!(&back, value);
                assert_eq!(used, written);
            }
        }
    }

    #[test]
    fn unsigned_format_test() {
        let format = ByteFormat {
            endianness: Endianness::Little,
            signed: false,
        };

        let value = Rational::new(200, 3).unwrap();
        let buf = value.to_bytes(format).unwrap();
        let (back, _) = Rational::read_bytes(&buf, format).unwrap();
        assert_eq!(back, value);

        // 200 needs the high bit, so the unsigned payload is a single byte
        // while the signed one takes two
        let signed_buf = value.to_bytes(ByteFormat::default()).unwrap();
        assert!(buf.len() < signed_buf.len());

        // a negative numerator is not representable unsigned
        let negative = Rational::new(-1, 2).unwrap();
        let mut out = Vec::new();
        assert_eq!(
            negative.write_bytes(&mut out, format),
            Err(ArithmeticError::Overflow)
        );
        assert!(out.is_empty()); // nothing written on failure
        assert_eq!(negative.try_write_bytes(&mut out, format), None);
    }

    #[test]
    fn truncated_input_test() {
        let buf = Rational::new(22, 7).unwrap().to_bytes(ByteFormat::default()).unwrap();
        for cut in 0..buf.len() {
            assert_eq!(
                Rational::read_bytes(&buf[..cut], ByteFormat::default()),
                Err(ArithmeticError::OutOfRange)
            );
        }
        assert_eq!(Rational::try_read_bytes(&buf[..3], ByteFormat::default()), None);
    }

    #[test]
    fn zero_denominator_rejected_test() {
        // [len 1][0] twice: encodes 0/0
        let buf = [1u8, 0, 0, 0, 0, 1, 0, 0, 0, 0];
        assert_eq!(
            Rational::read_bytes(&buf, ByteFormat::default()),
            Err(ArithmeticError::DivideByZero)
        );
    }
}
