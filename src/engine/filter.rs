use std::ops::RangeInclusive;

/// Inclusive code-point range a candidate must stay within to survive a cull.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharFilter {
    pub allowed: RangeInclusive<u32>,
}

impl CharFilter {
    pub const ASCII: CharFilter = CharFilter::new(0x00..=0x7F);
    pub const PRINTABLE_ASCII: CharFilter = CharFilter::new(0x20..=0x7E);

    pub const fn new(allowed: RangeInclusive<u32>) -> Self {
        Self { allowed }
    }

    /// Both bounds must hold. Joining them with OR would admit every char.
    pub fn is_allowed(&self, ch: char) -> bool {
        self.allowed.contains(&(ch as u32))
    }

    pub fn admits(&self, text: &str) -> bool {
        text.chars().all(|ch| self.is_allowed(ch))
    }
}
