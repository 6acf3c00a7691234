/// One variant per JDK feature release in the supported range, per
/// `SPEC_FULL.md` §4.4. Ordered so `StrategyRegistry` can walk "earlier
/// levels, highest to lowest" with a plain decrementing scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum LanguageLevel {
    Java8,
    Java9,
    Java10,
    Java11,
    Java12,
    Java13,
    Java14,
    Java15,
    Java16,
    Java17,
    Java18,
    Java19,
    Java20,
    Java21,
    Java22,
    Java23,
    Java24,
    Java25,
}

impl LanguageLevel {
    pub const ALL: [LanguageLevel; 18] = [
        LanguageLevel::Java8,
        LanguageLevel::Java9,
        LanguageLevel::Java10,
        LanguageLevel::Java11,
        LanguageLevel::Java12,
        LanguageLevel::Java13,
        LanguageLevel::Java14,
        LanguageLevel::Java15,
        LanguageLevel::Java16,
        LanguageLevel::Java17,
        LanguageLevel::Java18,
        LanguageLevel::Java19,
        LanguageLevel::Java20,
        LanguageLevel::Java21,
        LanguageLevel::Java22,
        LanguageLevel::Java23,
        LanguageLevel::Java24,
        LanguageLevel::Java25,
    ];

    /// Levels strictly below `self`, from nearest to farthest, for the
    /// registry's level-fallback walk.
    pub fn earlier_levels(self) -> impl Iterator<Item = LanguageLevel> {
        Self::ALL
            .into_iter()
            .filter(move |&level| level < self)
            .rev()
    }
}

impl Default for LanguageLevel {
    /// The most recent level this crate models.
    fn default() -> Self {
        LanguageLevel::Java25
    }
}
