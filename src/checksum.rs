//! Modulo-11 check digit
//!
//! Each body digit is weighted by a cyclic factor starting at 2 on the
//! rightmost digit: 2, 3, 4, 5, 6, 7, 2, 3, ... The weighted sum is reduced
//! modulo 11 and `11 - remainder` indexes into [`RUT_CHECK_DIGITS`].

use crate::rut::RutError;

/// Weights applied from the rightmost digit, repeating
pub const RUT_FACTORS: [u32; 6] = [2, 3, 4, 5, 6, 7];

/// Lookup table indexed by `11 - sum % 11`.
///
/// Index 0 is unreachable (the remainder never reaches 11) but is kept so
/// the table lines up with the index range 0..=11.
pub const RUT_CHECK_DIGITS: [char; 12] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'K', '0',
];

/// Check digit for a body of already-parsed digits (each 0..=9)
pub fn check_digit_from_digits(digits: &[u8]) -> char {
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &digit)| u32::from(digit) * RUT_FACTORS[i % RUT_FACTORS.len()])
        .sum();

    RUT_CHECK_DIGITS[11 - (sum % 11) as usize]
}

/// Compute the check digit for a body of decimal digit characters
pub fn compute_check_digit(body: &str) -> Result<char, RutError> {
    let digits = body
        .chars()
        .enumerate()
        .map(|(position, character)| {
            character
                .to_digit(10)
                .map(|d| d as u8)
                .ok_or(RutError::InvalidDigit {
                    character,
                    position,
                })
        })
        .collect::<Result<Vec<u8>, RutError>>()?;

    Ok(check_digit_from_digits(&digits))
}
