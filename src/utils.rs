//! # Some useful functions for exercising the codec
//!
//! The [`random_bits`] function returns a given number of random bits; the [`bpsk_awgn_channel`]
//! and [`bpsk_slicer`] functions model transmission over a BPSK-AWGN channel with hard decisions
//! at its output; the [`inject_errors`] function flips a given number of bits at random
//! positions; the [`error_count`] function returns the number of errors in a sequence with
//! respect to a reference sequence; and the [`bits_from_str`] and [`string_from_bits`] functions
//! convert between bit sequences and their textual representation.
//!
//! # Examples
//!
//! The code below illustrates the usage of the functions in this module.
//! ```
//! use viterbi::{utils, ViterbiCodec};
//!
//! let codec = ViterbiCodec::new(7, &[91, 117, 121])?;
//! let message = utils::random_bits(40);
//! let code_bits = codec.encode(&message);
//! let received = utils::bpsk_slicer(&utils::bpsk_awgn_channel(&code_bits, 10.0));
//! let message_hat = codec.decode(&received);
//! let err_count = utils::error_count(&message_hat, &message);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use rand::Rng;
use rand_distr::StandardNormal;

use crate::{Bit, Error};

/// Returns given number of random bits.
///
/// # Parameters
///
/// - `num_bits`: Number of random bits to be generated.
///
/// # Returns
///
/// - `bits`: Random bits.
#[must_use]
pub fn random_bits(num_bits: usize) -> Vec<Bit> {
    let mut rng = rand::rng();
    (0 .. num_bits)
        .map(|_| {
            if rng.random_bool(0.5) {
                Bit::One
            } else {
                Bit::Zero
            }
        })
        .collect()
}

/// Returns LLR values at BPSK-AWGN channel output corresponding to given input bits.
///
/// # Parameters
///
/// - `bits`: Bits to be transmitted over the BPSK-AWGN channel.
///
/// - `es_over_n0_db`: Ratio (dB) of symbol energy to noise power spectral density at the
///   BPSK-AWGN channel output (if the BPSK symbols are `+1.0` and `-1.0`, then the noise
///   variance is `0.5 / 10f64.powf(0.1 * es_over_n0_db)`).
///
/// # Returns
///
/// - `bits_llr`: Log-likelihood-ratio (LLR) values at the BPSK-AWGN channel output corresponding
///   to the transmitted bits, with positive values indicating that `Zero` is more likely. Feed
///   these through [`bpsk_slicer`] to obtain the hard decisions the decoder consumes.
#[must_use]
pub fn bpsk_awgn_channel(bits: &[Bit], es_over_n0_db: f64) -> Vec<f64> {
    let mut rng = rand::rng();
    let es_over_n0 = 10f64.powf(0.1 * es_over_n0_db);
    let noise_var = 0.5 / es_over_n0;
    bits.iter()
        .map(|b| match b {
            Bit::Zero => 1f64,
            Bit::One => -1f64,
        })
        .map(|x| 4.0 * es_over_n0 * (x + noise_var.sqrt() * rng.sample::<f64, _>(StandardNormal)))
        .collect()
}

/// Returns BPSK slicer output.
///
/// # Parameters
///
/// - `syms`: Symbols to be sliced. Nonnegative values are mapped to `Zero`, and negative values
///   to `One`.
///
/// # Returns
///
/// - `bits_hat`: Bits obtained by slicing the given symbols.
#[must_use]
pub fn bpsk_slicer(syms: &[f64]) -> Vec<Bit> {
    syms.iter()
        .map(|&x| if x >= 0.0 { Bit::Zero } else { Bit::One })
        .collect()
}

/// Returns copy of given bits with a given number of bit errors at distinct random positions.
///
/// # Parameters
///
/// - `bits`: Bits to be corrupted.
///
/// - `num_errors`: Number of bits to flip.
///
/// # Returns
///
/// - `corrupted_bits`: Copy of the given bits with exactly `num_errors` of them flipped.
///
/// # Errors
///
/// Returns an error if `num_errors` exceeds `bits.len()`.
///
/// # Examples
///
/// ```
/// use viterbi::utils;
///
/// let bits = utils::random_bits(40);
/// let corrupted_bits = utils::inject_errors(&bits, 4)?;
/// assert_eq!(utils::error_count(&corrupted_bits, &bits), 4);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn inject_errors(bits: &[Bit], num_errors: usize) -> Result<Vec<Bit>, Error> {
    if num_errors > bits.len() {
        return Err(Error::InvalidInput(format!(
            "Cannot flip {} bits in a sequence of {} bits",
            num_errors,
            bits.len()
        )));
    }
    let mut corrupted_bits = bits.to_vec();
    for index in rand::seq::index::sample(&mut rand::rng(), bits.len(), num_errors) {
        corrupted_bits[index] = match corrupted_bits[index] {
            Bit::Zero => Bit::One,
            Bit::One => Bit::Zero,
        };
    }
    Ok(corrupted_bits)
}

/// Returns number of errors in a sequence with respect to a reference sequence.
///
/// # Parameters
///
/// - `seq`: Sequence in which errors must be counted.
///
/// - `ref_seq`: Reference sequence to which the given sequence is compared.
///
/// # Returns
///
/// - `err_count`: Number of positions in which the two sequences differ. If they are of
///   different lengths, then the longer sequence is effectively truncated to the length of the
///   shorter one.
pub fn error_count<T: PartialEq>(seq: &[T], ref_seq: &[T]) -> usize {
    ref_seq
        .iter()
        .zip(seq.iter())
        .filter(|&(x, y)| x != y)
        .count()
}

/// Returns bits corresponding to given string of `'0'` and `'1'` characters.
///
/// # Parameters
///
/// - `s`: String to be converted.
///
/// # Returns
///
/// - `bits`: Bits corresponding to the characters of the string, in order.
///
/// # Errors
///
/// Returns an error if the string contains a character other than `'0'` or `'1'`.
///
/// # Examples
///
/// ```
/// use viterbi::{utils, Bit};
/// use Bit::{One, Zero};
///
/// assert_eq!(utils::bits_from_str("0110")?, [Zero, One, One, Zero]);
/// assert!(utils::bits_from_str("01x0").is_err());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn bits_from_str(s: &str) -> Result<Vec<Bit>, Error> {
    s.chars()
        .map(|c| match c {
            '0' => Ok(Bit::Zero),
            '1' => Ok(Bit::One),
            _ => Err(Error::InvalidInput(format!(
                "Expected string of '0' and '1' characters, found {c:?}"
            ))),
        })
        .collect()
}

/// Returns string of `'0'` and `'1'` characters corresponding to given bits.
///
/// # Parameters
///
/// - `bits`: Bits to be converted.
///
/// # Returns
///
/// - `s`: String representation of the bits, in order.
#[must_use]
pub fn string_from_bits(bits: &[Bit]) -> String {
    bits.iter()
        .map(|bit| match bit {
            Bit::Zero => '0',
            Bit::One => '1',
        })
        .collect()
}
