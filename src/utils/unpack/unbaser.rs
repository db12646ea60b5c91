use std::{collections::HashMap, fmt, sync::OnceLock};

const ALPHABET_62: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

pub const MIN_RADIX: u32 = 2;
pub const MAX_RADIX: u32 = 95;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnbaseError {
    UnsupportedRadix(u32),
    Empty,
    InvalidDigit { ch: char, radix: u32 },
    Overflow,
}

impl fmt::Display for UnbaseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UnbaseError::UnsupportedRadix(radix) => {
                write!(f, "unsupported radix {radix}, expected {MIN_RADIX}..={MAX_RADIX}")
            }
            UnbaseError::Empty => write!(f, "empty token"),
            UnbaseError::InvalidDigit { ch, radix } => {
                write!(f, "character {ch:?} is not a base {radix} digit")
            }
            UnbaseError::Overflow => write!(f, "token value overflows"),
        }
    }
}

impl std::error::Error for UnbaseError {}

/// Converts packer tokens written in base `radix` back to symbol table indices.
///
/// Digit alphabets follow the packer encoder:
/// - up to base 36: `0-9a-z`, case-insensitive
/// - up to base 62: `0-9A-Za-z`
/// - up to base 95: printable ASCII, digit is the character code minus 32
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unbaser {
    radix: u32,
}

impl Unbaser {
    pub fn new(radix: u32) -> Result<Self, UnbaseError> {
        if !(MIN_RADIX..=MAX_RADIX).contains(&radix) {
            return Err(UnbaseError::UnsupportedRadix(radix));
        }

        Ok(Self { radix })
    }

    pub fn radix(&self) -> u32 {
        self.radix
    }

    pub fn unbase(&self, token: &str) -> Result<usize, UnbaseError> {
        if token.is_empty() {
            return Err(UnbaseError::Empty);
        }

        token.chars().try_fold(0usize, |acc, ch| {
            let digit = self.digit(ch)?;
            acc.checked_mul(self.radix as usize)
                .and_then(|acc| acc.checked_add(digit as usize))
                .ok_or(UnbaseError::Overflow)
        })
    }

    fn digit(&self, ch: char) -> Result<u32, UnbaseError> {
        let radix = self.radix;
        let digit = match radix {
            0..=36 => ch.to_digit(radix),
            37..=62 => alphabet_62_dict().get(&ch).copied(),
            _ if ch.is_ascii() && !ch.is_ascii_control() => Some(ch as u32 - 32),
            _ => None,
        };

        digit
            .filter(|&d| d < radix)
            .ok_or(UnbaseError::InvalidDigit { ch, radix })
    }
}

fn alphabet_62_dict() -> &'static HashMap<char, u32> {
    static ALPHABET_62_DICT: OnceLock<HashMap<char, u32>> = OnceLock::new();
    ALPHABET_62_DICT.get_or_init(|| {
        HashMap::from_iter(
            ALPHABET_62
                .chars()
                .enumerate()
                .map(|(idx, ch)| (ch, idx as u32)),
        )
    })
}
