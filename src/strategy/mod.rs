//! `ParseStrategy` and its dispatch table.

pub(crate) mod constructs;
mod level;
mod registry;

pub use level::LanguageLevel;
pub use registry::StrategyRegistry;

use crate::context::ParseContext;
use crate::error::ParseError;
use crate::tree::NodeId;

/// The grammatical context a strategy is asked to parse in. The same leading
/// token (e.g. `{`) parses differently depending on phase: a bare block in
/// `METHOD_BODY`, a class body in `TOP_LEVEL`, a flexible constructor body in
/// `CONSTRUCTOR_BODY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    TopLevel,
    ClassBody,
    MethodBody,
    ConstructorBody,
    Expression,
    /// Only legal inside `module-info.java`.
    ModuleBody,
    /// Only legal for an annotation type element's default-value clause.
    AnnotationMember,
}

/// A parser for one Java construct, selected dynamically by language level
/// and phase.
pub trait ParseStrategy {
    /// Constant-time predicate on the current token (and small look-ahead)
    /// plus the target level and phase.
    fn can_handle(&self, level: LanguageLevel, phase: Phase, ctx: &ParseContext) -> bool;

    /// Consumes tokens, allocates nodes, and returns the root node id for
    /// the construct it parsed.
    fn parse_construct(&self, ctx: &mut ParseContext) -> Result<NodeId, ParseError>;

    /// Higher sorts first within a level's strategy list.
    fn priority(&self) -> i32;

    /// Diagnostic label; not shown to end users, only in error context.
    fn description(&self) -> &'static str;
}
