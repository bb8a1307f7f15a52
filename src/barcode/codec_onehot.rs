/*
  One-hot encoding, 4 bits per base

  A  1000
  G  0100
  C  0010
  T  0001

  Two different bases always differ in exactly two bits, so
  popcount(a XOR b) is twice the hamming distance
*/

use super::BarcodeError;

/// Largest barcode that fits in an EncodedBarcode
pub const MAX_BARCODE_LEN: usize = 32;

/// One-hot encoded barcode, 4 bits per base with the first base in the highest group
pub type EncodedBarcode = u128;

///////////////////////////////
/// Lookup table for N where N is any of ACGT. Everything else maps to 0
const NT1_LOOKUP: [u8; 256] = {
    let mut table = [0u8; 256];
    table[b'A' as usize] = 0b1000;
    table[b'G' as usize] = 0b0100;
    table[b'C' as usize] = 0b0010;
    table[b'T' as usize] = 0b0001;
    table
};

///////////////////////////////
///
/// Hot-encode ACGT as 4-bits per base
///
/// N, lowercase or any other symbol is an error. Encoded as 0 it would sit half a
/// mismatch away from every base
///
#[derive(Clone, Copy)]
pub struct HotEncodeACGT {}
impl HotEncodeACGT {
    ///////////////////////////////
    /// Encode a barcode of up to 32bp
    #[inline(always)]
    pub fn encode(seq: &[u8]) -> Result<EncodedBarcode, BarcodeError> {
        if seq.len() > MAX_BARCODE_LEN {
            return Err(BarcodeError::TooLong {
                len: seq.len(),
                max: MAX_BARCODE_LEN,
            });
        }

        let mut ret: EncodedBarcode = 0;
        for (pos, &base) in seq.iter().enumerate() {
            let bits = NT1_LOOKUP[base as usize];
            if bits == 0 {
                return Err(BarcodeError::InvalidSymbol {
                    symbol: base as char,
                    pos,
                });
            }
            ret = (ret << 4) | EncodedBarcode::from(bits);
        }
        Ok(ret)
    }

    ///////////////////////////////
    /// Hamming distance between two barcodes of equal length
    #[inline(always)]
    pub fn hamming_distance(a: EncodedBarcode, b: EncodedBarcode) -> u32 {
        (a ^ b).count_ones() / 2
    }
}
