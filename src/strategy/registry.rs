use std::collections::HashMap;
use std::rc::Rc;

use super::{LanguageLevel, ParseStrategy, Phase};
use crate::context::ParseContext;

/// Maps each language level to an ordered list of strategies, sorted by
/// descending priority on insertion (ties broken by insertion order). Lookup
/// walks the target level first, then earlier levels from nearest to
/// farthest.
#[derive(Default)]
pub struct StrategyRegistry {
    by_level: HashMap<LanguageLevel, Vec<Rc<dyn ParseStrategy>>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-loaded with every version-gated construct this crate
    /// ships (`crate::strategy::constructs`). The `Parser` driver uses this
    /// by default; `new()` stays available for callers that want the CORE's
    /// version-agnostic fallback behavior only.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        super::constructs::register_defaults(&mut registry);
        registry
    }

    /// Registers `strategy` for every level in `levels`. A single `Rc`
    /// instance is shared across every bucket it's registered in, since a
    /// strategy implementing several consecutive levels (e.g. a sealed-class
    /// parser valid from Java 17 onward) is one behavior, not several.
    pub fn register(&mut self, levels: &[LanguageLevel], strategy: Rc<dyn ParseStrategy>) {
        for &level in levels {
            let bucket = self.by_level.entry(level).or_default();
            bucket.push(Rc::clone(&strategy));
            bucket.sort_by_key(|s| std::cmp::Reverse(s.priority()));
        }
    }

    /// Step 1: scan the target level's list in priority order. Step 2: if
    /// none match, walk earlier levels, highest to lowest. Step 3: if still
    /// none, the caller falls back to a default construct parser for the
    /// current phase.
    pub fn find_strategy(
        &self,
        level: LanguageLevel,
        phase: Phase,
        ctx: &ParseContext,
    ) -> Option<Rc<dyn ParseStrategy>> {
        if let Some(bucket) = self.by_level.get(&level) {
            if let Some(found) = bucket.iter().find(|s| s.can_handle(level, phase, ctx)) {
                return Some(Rc::clone(found));
            }
        }
        for earlier in level.earlier_levels() {
            if let Some(bucket) = self.by_level.get(&earlier) {
                if let Some(found) = bucket.iter().find(|s| s.can_handle(level, phase, ctx)) {
                    return Some(Rc::clone(found));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;
    use crate::tree::{NodeId, NONE};

    struct Always(i32, &'static str);
    impl ParseStrategy for Always {
        fn can_handle(&self, _level: LanguageLevel, _phase: Phase, _ctx: &ParseContext) -> bool {
            true
        }
        fn parse_construct(&self, _ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
            Ok(NONE)
        }
        fn priority(&self) -> i32 {
            self.0
        }
        fn description(&self) -> &'static str {
            self.1
        }
    }

    struct Never;
    impl ParseStrategy for Never {
        fn can_handle(&self, _level: LanguageLevel, _phase: Phase, _ctx: &ParseContext) -> bool {
            false
        }
        fn parse_construct(&self, _ctx: &mut ParseContext) -> Result<NodeId, ParseError> {
            Ok(NONE)
        }
        fn priority(&self) -> i32 {
            100
        }
        fn description(&self) -> &'static str {
            "never"
        }
    }

    fn ctx() -> ParseContext<'static> {
        use crate::tree::NodeStorage;
        ParseContext::new("", vec![], NodeStorage::create(4).unwrap(), 1000)
    }

    #[test]
    fn higher_priority_wins_within_a_level() {
        let mut r = StrategyRegistry::new();
        r.register(&[LanguageLevel::Java17], Rc::new(Never));
        r.register(&[LanguageLevel::Java17], Rc::new(Always(5, "low")));
        r.register(&[LanguageLevel::Java17], Rc::new(Always(50, "high")));
        let found = r
            .find_strategy(LanguageLevel::Java17, Phase::TopLevel, &ctx())
            .unwrap();
        assert_eq!(found.description(), "high");
    }

    #[test]
    fn falls_back_to_earlier_levels() {
        let mut r = StrategyRegistry::new();
        r.register(&[LanguageLevel::Java8], Rc::new(Always(1, "legacy")));
        let found = r
            .find_strategy(LanguageLevel::Java21, Phase::TopLevel, &ctx())
            .unwrap();
        assert_eq!(found.description(), "legacy");
    }

    #[test]
    fn no_match_returns_none() {
        let r = StrategyRegistry::new();
        assert!(r
            .find_strategy(LanguageLevel::Java21, Phase::TopLevel, &ctx())
            .is_none());
    }

    #[test]
    fn shared_strategy_registers_across_levels() {
        let mut r = StrategyRegistry::new();
        let shared: Rc<dyn ParseStrategy> = Rc::new(Always(1, "sealed"));
        r.register(
            &[LanguageLevel::Java17, LanguageLevel::Java21],
            Rc::clone(&shared),
        );
        assert!(r
            .find_strategy(LanguageLevel::Java17, Phase::TopLevel, &ctx())
            .is_some());
        assert!(r
            .find_strategy(LanguageLevel::Java21, Phase::TopLevel, &ctx())
            .is_some());
    }
}
