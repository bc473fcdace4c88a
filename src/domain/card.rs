use std::fmt;

use rand::Rng;

// 15 random digits plus the Luhn check digit -> 16-digit card numbers.
const CARD_NUMBER_DIGITS: usize = 15;
const AUTHORIZATION_CODE_DIGITS: usize = 6;

/// Opaque account identifier: a generated, Luhn-valid card number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountId(String);

impl AccountId {
    pub(crate) fn generate() -> Self {
        Self(random_card_number(CARD_NUMBER_DIGITS, None))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generates `length` digits, optionally starting with the issuer `bin`,
/// and appends the Luhn check digit.
pub fn random_card_number(length: usize, bin: Option<u32>) -> String {
    let mut rng = rand::thread_rng();
    let mut digits: Vec<u8> = Vec::with_capacity(length + 1);
    if let Some(bin) = bin {
        digits.extend(bin.to_string().bytes().map(|b| b - b'0'));
    }
    while digits.len() < length {
        digits.push(rng.gen_range(0u8..10));
    }

    // The parity offset lines digit positions up with the check digit at
    // position zero from the right.
    let parity = length % 2;
    let checksum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, &d)| {
            let mut n = u32::from(d);
            if (i + parity) % 2 != 0 {
                n *= 2;
                if n > 9 {
                    n -= 9;
                }
            }
            n
        })
        .sum();
    digits.push(((10 - checksum % 10) % 10) as u8);
    digits.iter().map(|&d| char::from(b'0' + d)).collect()
}

/// Luhn checksum validation.
pub fn luhn_valid(number: &str) -> bool {
    let mut sum = 0u32;
    let mut count = 0usize;
    for (i, c) in number.chars().rev().enumerate() {
        let Some(d) = c.to_digit(10) else {
            return false;
        };
        let mut n = d;
        if i % 2 == 1 {
            n *= 2;
            if n > 9 {
                n -= 9;
            }
        }
        sum += n;
        count += 1;
    }
    count > 1 && sum % 10 == 0
}

pub(crate) fn random_authorization_code() -> String {
    let mut rng = rand::thread_rng();
    (0..AUTHORIZATION_CODE_DIGITS)
        .map(|_| char::from(b'0' + rng.gen_range(0u8..10)))
        .collect()
}
