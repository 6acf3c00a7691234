//! `ParseContext`: the token cursor and reentrancy control shared by every
//! `ParseStrategy`.

use std::rc::Rc;

use crate::error::ParseError;
use crate::limit::LimitTracker;
use crate::metrics::SessionMetrics;
use crate::token::{Token, TokenKind};
use crate::tree::{NodeId, NodeStorage, NONE};

/// A strategy that knows how to parse one statement, registered via
/// [`ParseContext::set_statement_parser`] so strategies whose body contains
/// arbitrary statements (blocks, loop bodies, lambda bodies) can recurse back
/// into statement-level dispatch without depending on the registry directly.
pub type StatementParser<'src> =
    Box<dyn FnMut(&mut ParseContext<'src>) -> Result<NodeId, ParseError> + 'src>;

/// The parsing cursor: a filtered (trivia-free) token sequence, a single
/// pending-token slot for split-token injection, the arena every strategy
/// allocates into, and the recursion/parent-stack discipline that keeps
/// deeply nested constructs bounded.
pub struct ParseContext<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    index: usize,
    pending: Option<Token>,
    storage: NodeStorage,
    recursion: LimitTracker,
    parent_stack: Vec<NodeId>,
    statement_parser: Option<StatementParser<'src>>,
    eof: Token,
    /// End offset of the last token consumed by `advance`/`expect`, i.e. the
    /// offset just past whatever the cursor has already read. Construct
    /// parsers use this to fix up a node's `length` once its last child has
    /// been consumed, since the arena only learns a node's extent after the
    /// fact.
    prev_end: u32,
    metrics: Rc<SessionMetrics>,
}

impl<'src> ParseContext<'src> {
    /// `tokens` must already have trivia filtered out; `storage` is the
    /// arena this session allocates nodes into.
    pub fn new(
        source: &'src str,
        tokens: Vec<Token>,
        storage: NodeStorage,
        recursion_limit: usize,
    ) -> Self {
        Self::with_metrics(
            source,
            tokens,
            storage,
            recursion_limit,
            Rc::new(SessionMetrics::new()),
        )
    }

    /// Like [`Self::new`], but shares `metrics` with the caller (the
    /// `Parser` driver, so it can read the same counters back out of
    /// `ParseOutcome` after the session ends).
    pub fn with_metrics(
        source: &'src str,
        tokens: Vec<Token>,
        storage: NodeStorage,
        recursion_limit: usize,
        metrics: Rc<SessionMetrics>,
    ) -> Self {
        let eof_offset = tokens.last().map(Token::end).unwrap_or(0);
        Self {
            source,
            tokens,
            index: 0,
            pending: None,
            storage,
            recursion: LimitTracker::new(recursion_limit),
            parent_stack: Vec::new(),
            statement_parser: None,
            eof: Token::eof(eof_offset),
            prev_end: 0,
            metrics,
        }
    }

    pub fn metrics(&self) -> &SessionMetrics {
        &self.metrics
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    pub fn storage(&self) -> &NodeStorage {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut NodeStorage {
        &mut self.storage
    }

    /// Consumes the context, handing back its arena — used once parsing
    /// finishes to assemble the outcome.
    pub fn into_storage(self) -> NodeStorage {
        self.storage
    }

    fn token_at(&self, i: usize) -> &Token {
        self.tokens.get(i).unwrap_or(&self.eof)
    }

    /// Pending token if present, else the token at the current index, else
    /// EOF past the end.
    pub fn current(&self) -> &Token {
        match &self.pending {
            Some(t) => t,
            None => self.token_at(self.index),
        }
    }

    /// Token at `index + offset`, or EOF if out of range. Ignores the
    /// pending slot.
    pub fn peek(&self, offset: usize) -> &Token {
        self.token_at(self.index + offset)
    }

    /// If pending is set, clears it (consumed) and returns the new current
    /// token; otherwise advances the index (saturating so EOF is stable) and
    /// returns the new current token.
    pub fn advance(&mut self) -> &Token {
        self.prev_end = self.current().end();
        if self.pending.take().is_some() {
            return self.current();
        }
        if self.index < self.tokens.len() {
            self.index += 1;
        }
        self.current()
    }

    /// End offset of the token most recently consumed by `advance`/`expect`.
    /// Used to fix up a just-finished node's `length`.
    pub fn previous_end(&self) -> u32 {
        self.prev_end
    }

    pub fn current_is(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    /// Fails with [`ParseError::UnexpectedToken`] unless `current().kind ==
    /// kind`; otherwise advances past it and returns the matched token.
    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        let current = self.current().clone();
        if current.kind != kind {
            return Err(ParseError::UnexpectedToken {
                offset: current.start,
                expected: token_kind_name(kind),
                actual: token_kind_name(current.kind),
            });
        }
        self.advance();
        Ok(current)
    }

    /// Sets the pending slot: the next `current()` returns `t`, the next
    /// `advance()` consumes it. Used to split `>>` into two `>` tokens
    /// inside nested generic-argument contexts.
    pub fn inject_token(&mut self, t: Token) {
        self.pending = Some(t);
    }

    /// A resumable snapshot of cursor position, for bounded look-ahead.
    pub fn save_position(&self) -> usize {
        self.index
    }

    /// Restores a saved position and clears the pending slot.
    pub fn set_position(&mut self, i: usize) {
        self.index = i;
        self.pending = None;
    }

    /// Increments recursion depth; fails with [`ParseError::RecursionLimit`]
    /// once depth exceeds the configured limit.
    pub fn enter_recursion(&mut self) -> Result<(), ParseError> {
        self.recursion.consume();
        if self.recursion.limited() {
            return Err(ParseError::RecursionLimit {
                offset: self.current().start,
            });
        }
        Ok(())
    }

    pub fn exit_recursion(&mut self) {
        self.recursion.release();
    }

    pub fn recursion_depth(&self) -> usize {
        self.recursion.depth()
    }

    pub fn push_parent(&mut self, id: NodeId) {
        self.parent_stack.push(id);
    }

    /// Panics on underflow: popping with no pushed parent is a fatal
    /// internal error, not a recoverable `ParseError`.
    pub fn pop_parent(&mut self) -> NodeId {
        self.parent_stack
            .pop()
            .expect("pop_parent called with empty parent stack")
    }

    pub fn current_parent(&self) -> NodeId {
        *self.parent_stack.last().unwrap_or(&NONE)
    }

    pub fn set_statement_parser(&mut self, delegate: StatementParser<'src>) {
        self.statement_parser = Some(delegate);
    }

    /// Delegates to the registered statement parser. Calling this with none
    /// registered is a fatal internal error.
    pub fn parse_statement(&mut self) -> Result<NodeId, ParseError> {
        let mut delegate = self
            .statement_parser
            .take()
            .expect("parse_statement called with no statement parser registered");
        let result = delegate(self);
        self.statement_parser = Some(delegate);
        result
    }
}

/// Stable diagnostic name for a `TokenKind`, used in `ParseError::UnexpectedToken`.
fn token_kind_name(kind: TokenKind) -> &'static str {
    use TokenKind::*;
    match kind {
        Whitespace => "WHITESPACE",
        LineComment => "LINE_COMMENT",
        BlockComment => "BLOCK_COMMENT",
        JavadocComment => "JAVADOC_COMMENT",
        IntegerLiteral => "INTEGER_LITERAL",
        LongLiteral => "LONG_LITERAL",
        FloatLiteral => "FLOAT_LITERAL",
        DoubleLiteral => "DOUBLE_LITERAL",
        BooleanLiteral => "BOOLEAN_LITERAL",
        CharLiteral => "CHAR_LITERAL",
        StringLiteral => "STRING_LITERAL",
        TextBlockLiteral => "TEXT_BLOCK_LITERAL",
        NullLiteral => "NULL_LITERAL",
        Identifier => "IDENTIFIER",
        Abstract => "ABSTRACT",
        Assert => "ASSERT",
        Boolean => "BOOLEAN",
        Break => "BREAK",
        Byte => "BYTE",
        Case => "CASE",
        Catch => "CATCH",
        Char => "CHAR",
        Class => "CLASS",
        Const => "CONST",
        Continue => "CONTINUE",
        Default => "DEFAULT",
        Do => "DO",
        Double => "DOUBLE",
        Else => "ELSE",
        Enum => "ENUM",
        Extends => "EXTENDS",
        Final => "FINAL",
        Finally => "FINALLY",
        Float => "FLOAT",
        For => "FOR",
        Goto => "GOTO",
        If => "IF",
        Implements => "IMPLEMENTS",
        Import => "IMPORT",
        Instanceof => "INSTANCEOF",
        Int => "INT",
        Interface => "INTERFACE",
        Long => "LONG",
        Native => "NATIVE",
        New => "NEW",
        Package => "PACKAGE",
        Private => "PRIVATE",
        Protected => "PROTECTED",
        Public => "PUBLIC",
        Return => "RETURN",
        Short => "SHORT",
        Static => "STATIC",
        Strictfp => "STRICTFP",
        Super => "SUPER",
        Switch => "SWITCH",
        Synchronized => "SYNCHRONIZED",
        This => "THIS",
        Throw => "THROW",
        Throws => "THROWS",
        Transient => "TRANSIENT",
        Try => "TRY",
        Void => "VOID",
        Volatile => "VOLATILE",
        While => "WHILE",
        Var => "VAR",
        Yield => "YIELD",
        Record => "RECORD",
        Sealed => "SEALED",
        NonSealed => "NON_SEALED",
        Permits => "PERMITS",
        When => "WHEN",
        Module => "MODULE",
        Requires => "REQUIRES",
        Exports => "EXPORTS",
        Opens => "OPENS",
        To => "TO",
        Uses => "USES",
        Provides => "PROVIDES",
        With => "WITH",
        Transitive => "TRANSITIVE",
        Open => "OPEN",
        LParen => "LPAREN",
        RParen => "RPAREN",
        LBrace => "LBRACE",
        RBrace => "RBRACE",
        LBracket => "LBRACKET",
        RBracket => "RBRACKET",
        Semicolon => "SEMICOLON",
        Comma => "COMMA",
        Dot => "DOT",
        Ellipsis => "ELLIPSIS",
        At => "AT",
        DoubleColon => "DOUBLE_COLON",
        Colon => "COLON",
        Question => "QUESTION",
        Tilde => "TILDE",
        Assign => "ASSIGN",
        Gt => "GT",
        Lt => "LT",
        Not => "NOT",
        Eq => "EQ",
        Ne => "NE",
        Le => "LE",
        Ge => "GE",
        LogicalAnd => "LOGICAL_AND",
        LogicalOr => "LOGICAL_OR",
        Increment => "INCREMENT",
        Decrement => "DECREMENT",
        Plus => "PLUS",
        Minus => "MINUS",
        Mult => "MULT",
        Div => "DIV",
        BitAnd => "BIT_AND",
        BitOr => "BIT_OR",
        Caret => "CARET",
        Mod => "MOD",
        LShift => "LSHIFT",
        RShift => "RSHIFT",
        URShift => "URSHIFT",
        PlusAssign => "PLUS_ASSIGN",
        MinusAssign => "MINUS_ASSIGN",
        MultAssign => "MULT_ASSIGN",
        DivAssign => "DIV_ASSIGN",
        AndAssign => "AND_ASSIGN",
        OrAssign => "OR_ASSIGN",
        XorAssign => "XOR_ASSIGN",
        ModAssign => "MOD_ASSIGN",
        LShiftAssign => "LSHIFT_ASSIGN",
        RShiftAssign => "RSHIFT_ASSIGN",
        URShiftAssign => "URSHIFT_ASSIGN",
        Arrow => "ARROW",
        Eof => "EOF",
        Error => "ERROR",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Token;

    fn ctx(tokens: Vec<Token>) -> ParseContext<'static> {
        ParseContext::new("", tokens, NodeStorage::create(16).unwrap(), 1000)
    }

    fn tok(kind: TokenKind, start: u32) -> Token {
        Token::new(kind, start, 1, None)
    }

    #[test]
    fn advance_saturates_at_eof() {
        let mut c = ctx(vec![tok(TokenKind::Identifier, 0)]);
        assert_eq!(c.current().kind, TokenKind::Identifier);
        c.advance();
        assert_eq!(c.current().kind, TokenKind::Eof);
        c.advance();
        assert_eq!(c.current().kind, TokenKind::Eof);
    }

    #[test]
    fn inject_token_takes_priority_over_index() {
        let mut c = ctx(vec![tok(TokenKind::Identifier, 0)]);
        c.inject_token(tok(TokenKind::Gt, 99));
        assert_eq!(c.current().kind, TokenKind::Gt);
        c.advance();
        assert_eq!(c.current().kind, TokenKind::Identifier);
    }

    #[test]
    fn expect_mismatch_reports_offset() {
        let mut c = ctx(vec![tok(TokenKind::Identifier, 5)]);
        let err = c.expect(TokenKind::Semicolon).unwrap_err();
        assert_eq!(err.offset(), 5);
    }

    #[test]
    fn recursion_limit_trips_past_configured_depth() {
        let mut c = ParseContext::new("", vec![], NodeStorage::create(4).unwrap(), 2);
        c.enter_recursion().unwrap();
        c.enter_recursion().unwrap();
        assert!(c.enter_recursion().is_err());
    }

    #[test]
    fn parent_stack_round_trips() {
        let mut c = ctx(vec![]);
        assert_eq!(c.current_parent(), NONE);
        c.push_parent(3);
        assert_eq!(c.current_parent(), 3);
        assert_eq!(c.pop_parent(), 3);
        assert_eq!(c.current_parent(), NONE);
    }

    #[test]
    #[should_panic(expected = "empty parent stack")]
    fn pop_parent_underflow_panics() {
        let mut c = ctx(vec![]);
        c.pop_parent();
    }

    #[test]
    #[should_panic(expected = "no statement parser registered")]
    fn parse_statement_without_delegate_panics() {
        let mut c = ctx(vec![]);
        let _ = c.parse_statement();
    }
}
