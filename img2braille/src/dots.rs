//! Dot-pattern encoding of 2x4 pixel blocks.
//!
//! Dots are numbered following the 8-dot Braille cell:
//! ```text
//! 1 4
//! 2 5
//! 3 6
//! 7 8
//! ```
//! A [`DotKey`] stores label `n` in bit `n - 1`, which is also how Unicode lays
//! out the Braille Patterns block, so `U+2800 + mask` is the standard glyph.
use std::fmt;

use crate::{blocks::Block, error::Error, mapping::Mapping};

/// Key used for a block without any dot.
pub const BLANK_KEY: &str = "BLANK";

/// Braille base character (U+2800, empty braille pattern).
pub const BRAILLE_BASE: char = '\u{2800}';

/// Pixel position `(row, col)` inside a block for dot labels 1 through 8.
pub const DOT_POSITIONS: [(usize, usize); 8] = [
    (0, 0),
    (1, 0),
    (2, 0),
    (0, 1),
    (1, 1),
    (2, 1),
    (3, 0),
    (3, 1),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DotKey(u8);

impl DotKey {
    pub const EMPTY: DotKey = DotKey(0);
    pub const FULL: DotKey = DotKey(u8::MAX);

    /// Builds a key from dot labels, ignoring anything outside `1..=8`.
    pub fn from_labels(labels: impl IntoIterator<Item = u8>) -> Self {
        labels
            .into_iter()
            .filter(|label| (1..=8).contains(label))
            .fold(Self::EMPTY, |key, label| Self(key.0 | 1 << (label - 1)))
    }

    /// Thresholds a block: a dot is present when its pixel is strictly below `blank_value`.
    pub fn from_block(block: &Block, blank_value: u8) -> Self {
        let mut mask = 0u8;
        for (bit, &(row, col)) in DOT_POSITIONS.iter().enumerate() {
            if block.get(row, col) < blank_value {
                mask |= 1 << bit;
            }
        }
        Self(mask)
    }

    pub fn is_blank(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, label: u8) -> bool {
        (1..=8).contains(&label) && self.0 & (1 << (label - 1)) != 0
    }

    /// Present labels in ascending order.
    pub fn labels(self) -> impl Iterator<Item = u8> {
        (1..=8u8).filter(move |&label| self.contains(label))
    }

    /// The standard Unicode Braille glyph for this pattern.
    pub fn braille(self) -> char {
        char::from_u32(BRAILLE_BASE as u32 + self.0 as u32).unwrap_or(BRAILLE_BASE)
    }

    /// Every possible key, blank first.
    pub fn all() -> impl Iterator<Item = DotKey> {
        (0..=u8::MAX).map(DotKey)
    }
}

/// Canonical mapping key: present labels ascending ("1358"), or `BLANK`.
impl fmt::Display for DotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_blank() {
            return f.write_str(BLANK_KEY);
        }
        for label in self.labels() {
            write!(f, "{label}")?;
        }
        Ok(())
    }
}

/// Encodes one block into its glyph.
pub fn encode_block<'m>(
    block: &Block,
    mapping: &'m Mapping,
    blank_value: u8,
) -> Result<&'m str, Error> {
    mapping.glyph(DotKey::from_block(block, blank_value))
}
