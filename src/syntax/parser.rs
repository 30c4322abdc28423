//! Recovering recursive-descent parser for SCSS
//!
//! `parse` never fails. Input it does not understand ends up in `Error` nodes
//! and parsing resumes at the next statement, so symbol extraction always sees
//! whatever structure could be recovered.

use super::lexer::{Token, TokenKind, tokenize};
use super::tree::{NodeId, NodeKind, SyntaxTree};

/// Parse `source` into an arena tree rooted at a `Stylesheet` node.
pub fn parse(source: &str) -> SyntaxTree {
    let tokens = tokenize(source)
        .into_iter()
        .filter(|token| !token.kind.is_trivia())
        .collect();

    let mut parser = Parser {
        source,
        tokens,
        pos: 0,
        prev_end: 0,
        tree: SyntaxTree::new(source.to_string()),
    };

    let root = parser.tree.alloc(NodeKind::Stylesheet, 0, None);
    while !parser.at_eof() {
        parser.statement_with_recovery(root);
    }
    parser.tree.set_end(root, source.len());
    parser.tree
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    prev_end: usize,
    tree: SyntaxTree,
}

impl<'a> Parser<'a> {
    // =========================================================================
    // Token cursor
    // =========================================================================

    fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn nth(&self, n: usize) -> Option<Token> {
        self.tokens.get(self.pos + n).copied()
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    fn nth_kind(&self, n: usize) -> Option<TokenKind> {
        self.nth(n).map(|t| t.kind)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    fn bump(&mut self) {
        if let Some(token) = self.peek() {
            self.prev_end = token.end;
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn peek_text(&self) -> &'a str {
        self.peek().map(|t| t.text(self.source)).unwrap_or("")
    }

    /// True when the token `n` ahead starts exactly where the previous one ends.
    fn adjacent(&self, n: usize) -> bool {
        match (self.nth(n.saturating_sub(1)), self.nth(n)) {
            (Some(a), Some(b)) => a.end == b.start,
            _ => false,
        }
    }

    // =========================================================================
    // Node building
    // =========================================================================

    fn start(&mut self, kind: NodeKind, parent: NodeId) -> NodeId {
        let offset = self.peek().map(|t| t.start).unwrap_or(self.source.len());
        self.tree.alloc(kind, offset, Some(parent))
    }

    fn finish(&mut self, id: NodeId) {
        self.tree.set_end(id, self.prev_end);
    }

    /// Wrap the current token in a node of `kind`.
    fn token_node(&mut self, kind: NodeKind, parent: NodeId) -> NodeId {
        let node = self.start(kind, parent);
        self.bump();
        self.finish(node);
        node
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn statement_with_recovery(&mut self, parent: NodeId) {
        let before = self.pos;
        self.statement(parent);
        if self.pos == before {
            self.token_node(NodeKind::Error, parent);
        }
    }

    fn statement(&mut self, parent: NodeId) {
        let Some(token) = self.peek() else {
            return;
        };

        match token.kind {
            TokenKind::Semicolon => self.bump(),
            TokenKind::Variable if self.nth_kind(1) == Some(TokenKind::Colon) => {
                self.variable_declaration(parent)
            }
            TokenKind::AtKeyword => {
                let keyword = token.text(self.source).to_ascii_lowercase();
                match keyword.as_str() {
                    "@mixin" => self.callable_declaration(parent, NodeKind::MixinDeclaration),
                    "@function" => {
                        self.callable_declaration(parent, NodeKind::FunctionDeclaration)
                    }
                    "@include" => self.mixin_reference(parent),
                    "@import" => self.link_statement(parent, NodeKind::Import),
                    "@use" => self.link_statement(parent, NodeKind::Use),
                    "@forward" => self.link_statement(parent, NodeKind::Forward),
                    "@return" => self.return_statement(parent),
                    _ => self.at_rule(parent),
                }
            }
            TokenKind::RBrace => {
                self.token_node(NodeKind::Error, parent);
            }
            _ => self.declaration_or_ruleset(parent),
        }
    }

    fn variable_declaration(&mut self, parent: NodeId) {
        let node = self.start(NodeKind::VariableDeclaration, parent);
        self.token_node(NodeKind::VariableName, node);
        self.bump(); // ':'
        self.value(node, &[TokenKind::Semicolon]);
        self.eat(TokenKind::Semicolon);
        self.finish(node);
    }

    /// `@mixin name(params) { ... }` and `@function name(params) { ... }`
    fn callable_declaration(&mut self, parent: NodeId, kind: NodeKind) {
        let node = self.start(kind, parent);
        self.bump();
        if self.at(TokenKind::Ident) {
            self.token_node(NodeKind::Identifier, node);
        }
        if self.at(TokenKind::LParen) {
            self.parameter_list(node);
        }
        if self.at(TokenKind::LBrace) {
            self.block(node);
        } else {
            self.eat(TokenKind::Semicolon);
        }
        self.finish(node);
    }

    fn parameter_list(&mut self, parent: NodeId) {
        let list = self.start(NodeKind::ParameterList, parent);
        self.bump(); // '('
        loop {
            match self.peek_kind() {
                None => break,
                Some(TokenKind::RParen) => {
                    self.bump();
                    break;
                }
                Some(TokenKind::Comma) => self.bump(),
                Some(TokenKind::LBrace | TokenKind::RBrace | TokenKind::Semicolon) => break,
                Some(TokenKind::Variable) => {
                    let param = self.start(NodeKind::Parameter, list);
                    self.token_node(NodeKind::VariableName, param);
                    self.eat(TokenKind::Ellipsis);
                    if self.eat(TokenKind::Colon) {
                        self.value(param, &[TokenKind::Comma, TokenKind::RParen]);
                    }
                    self.finish(param);
                }
                Some(_) => {
                    self.token_node(NodeKind::Error, list);
                }
            }
        }
        self.finish(list);
    }

    /// `@include ns.name(args) using ($slot) { ... }`
    fn mixin_reference(&mut self, parent: NodeId) {
        let node = self.start(NodeKind::MixinReference, parent);
        self.bump();
        self.skip_namespace();
        if self.at(TokenKind::Ident) {
            self.token_node(NodeKind::Identifier, node);
        }
        if self.at(TokenKind::LParen) {
            self.arguments(node);
        }
        if self.at(TokenKind::Ident) && self.peek_text().eq_ignore_ascii_case("using") {
            self.bump();
            if self.at(TokenKind::LParen) {
                self.parameter_list(node);
            }
        }
        if self.at(TokenKind::LBrace) {
            self.block(node);
        } else {
            self.eat(TokenKind::Semicolon);
        }
        self.finish(node);
    }

    /// `@import 'a', 'b';`, `@use 'x' as y with (...)`, `@forward 'z' show a;`
    fn link_statement(&mut self, parent: NodeId, kind: NodeKind) {
        let node = self.start(kind, parent);
        self.bump();
        loop {
            match self.peek_kind() {
                None
                | Some(TokenKind::Semicolon | TokenKind::LBrace | TokenKind::RBrace) => break,
                Some(TokenKind::String) => {
                    self.token_node(NodeKind::StringLiteral, node);
                }
                Some(TokenKind::Ident) if self.nth_kind(1) == Some(TokenKind::LParen) => {
                    self.function_call(node);
                }
                Some(TokenKind::LParen) => {
                    let config = self.start(NodeKind::Value, node);
                    self.parenthesized(config);
                    self.finish(config);
                }
                Some(_) => self.bump(),
            }
        }
        self.eat(TokenKind::Semicolon);
        self.finish(node);
    }

    fn return_statement(&mut self, parent: NodeId) {
        let node = self.start(NodeKind::Return, parent);
        self.bump();
        self.value(node, &[TokenKind::Semicolon]);
        self.eat(TokenKind::Semicolon);
        self.finish(node);
    }

    /// Any other at-rule: `@if`, `@each`, `@media`, `@extend`, `@content`, ...
    fn at_rule(&mut self, parent: NodeId) {
        let node = self.start(NodeKind::AtRule, parent);
        self.bump();
        if !matches!(
            self.peek_kind(),
            None | Some(TokenKind::Semicolon | TokenKind::LBrace | TokenKind::RBrace)
        ) {
            self.value(node, &[TokenKind::Semicolon, TokenKind::LBrace]);
        }
        if self.at(TokenKind::LBrace) {
            self.block(node);
        } else {
            self.eat(TokenKind::Semicolon);
        }
        self.finish(node);
    }

    fn block(&mut self, parent: NodeId) {
        let block = self.start(NodeKind::Block, parent);
        self.bump(); // '{'
        while !self.at_eof() && !self.at(TokenKind::RBrace) {
            self.statement_with_recovery(block);
        }
        self.eat(TokenKind::RBrace);
        self.finish(block);
    }

    /// Decide between `prop: value;` and `selector { ... }` by scanning ahead
    /// for the first top-level `{`, `;` or `}`.
    fn declaration_or_ruleset(&mut self, parent: NodeId) {
        if self.ruleset_ahead() {
            self.ruleset(parent);
        } else {
            self.declaration(parent);
        }
    }

    fn ruleset_ahead(&self) -> bool {
        let mut parens = 0usize;
        let mut interpolations = 0usize;
        for token in &self.tokens[self.pos..] {
            match token.kind {
                TokenKind::LParen => parens += 1,
                TokenKind::RParen => parens = parens.saturating_sub(1),
                TokenKind::InterpolationStart => interpolations += 1,
                TokenKind::RBrace if interpolations > 0 => interpolations -= 1,
                TokenKind::RBrace => return false,
                TokenKind::LBrace if parens == 0 && interpolations == 0 => return true,
                TokenKind::Semicolon if parens == 0 && interpolations == 0 => return false,
                _ => {}
            }
        }
        false
    }

    fn ruleset(&mut self, parent: NodeId) {
        let node = self.start(NodeKind::Ruleset, parent);
        let selector = self.start(NodeKind::Selector, node);
        while !self.at_eof() && !self.at(TokenKind::LBrace) {
            if self.at(TokenKind::InterpolationStart) {
                self.interpolation(selector);
            } else {
                self.bump();
            }
        }
        self.finish(selector);
        if self.at(TokenKind::LBrace) {
            self.block(node);
        }
        self.finish(node);
    }

    fn declaration(&mut self, parent: NodeId) {
        let node = self.start(NodeKind::Declaration, parent);
        let property = self.start(NodeKind::Property, node);
        while let Some(kind) = self.peek_kind() {
            match kind {
                TokenKind::Colon | TokenKind::Semicolon | TokenKind::RBrace => break,
                TokenKind::InterpolationStart => {
                    self.interpolation(property);
                }
                _ => self.bump(),
            }
        }
        self.finish(property);

        if self.eat(TokenKind::Colon) {
            self.value(node, &[TokenKind::Semicolon]);
        } else {
            self.tree.set_kind(node, NodeKind::Error);
        }
        self.eat(TokenKind::Semicolon);
        self.finish(node);
    }

    // =========================================================================
    // Values
    // =========================================================================

    fn value(&mut self, parent: NodeId, stop: &[TokenKind]) -> NodeId {
        let node = self.start(NodeKind::Value, parent);
        self.terms(node, stop);
        self.finish(node);
        node
    }

    /// Parse expression terms into `parent` until a stop token, an unbalanced
    /// `}` or a `{` is reached.
    fn terms(&mut self, parent: NodeId, stop: &[TokenKind]) {
        while let Some(token) = self.peek() {
            if stop.contains(&token.kind) {
                break;
            }
            match token.kind {
                TokenKind::RBrace | TokenKind::LBrace => break,
                TokenKind::Variable => {
                    self.token_node(NodeKind::VariableName, parent);
                }
                TokenKind::Ident => {
                    if self.namespaced_call_ahead() {
                        self.skip_namespace();
                        self.function_call(parent);
                    } else if self.nth_kind(1) == Some(TokenKind::LParen) && self.adjacent(1) {
                        self.function_call(parent);
                    } else {
                        self.token_node(NodeKind::Identifier, parent);
                    }
                }
                TokenKind::String => {
                    self.token_node(NodeKind::StringLiteral, parent);
                }
                TokenKind::InterpolationStart => {
                    self.interpolation(parent);
                }
                TokenKind::LParen => self.parenthesized(parent),
                _ => self.bump(),
            }
        }
    }

    fn parenthesized(&mut self, parent: NodeId) {
        self.bump(); // '('
        self.terms(parent, &[TokenKind::RParen, TokenKind::Semicolon]);
        self.eat(TokenKind::RParen);
    }

    fn interpolation(&mut self, parent: NodeId) {
        let node = self.start(NodeKind::Interpolation, parent);
        self.bump(); // '#{'
        self.terms(node, &[]);
        self.eat(TokenKind::RBrace);
        self.finish(node);
    }

    /// `ns.name(` where all four tokens touch.
    fn namespaced_call_ahead(&self) -> bool {
        self.nth_kind(1) == Some(TokenKind::Dot)
            && self.nth_kind(2) == Some(TokenKind::Ident)
            && self.nth_kind(3) == Some(TokenKind::LParen)
            && self.adjacent(1)
            && self.adjacent(2)
            && self.adjacent(3)
    }

    /// Consume a `ns.` module prefix if one precedes the current name.
    fn skip_namespace(&mut self) {
        if self.at(TokenKind::Ident)
            && self.nth_kind(1) == Some(TokenKind::Dot)
            && self.nth_kind(2) == Some(TokenKind::Ident)
            && self.adjacent(1)
            && self.adjacent(2)
        {
            self.bump();
            self.bump();
        }
    }

    fn function_call(&mut self, parent: NodeId) {
        let node = self.start(NodeKind::FunctionCall, parent);
        let is_url = self.peek_text().eq_ignore_ascii_case("url");
        self.token_node(NodeKind::Identifier, node);

        if is_url && self.nth_kind(1) != Some(TokenKind::String) {
            self.raw_url_arguments(node);
        } else if self.at(TokenKind::LParen) {
            self.arguments(node);
        }
        self.finish(node);
    }

    /// Unquoted `url(...)` content is raw text. A `//` inside it was lexed as
    /// a comment, so the remainder of the input is lexed again after `)`.
    fn raw_url_arguments(&mut self, parent: NodeId) {
        let Some(open) = self.peek() else {
            return;
        };
        let args = self.start(NodeKind::Arguments, parent);
        let resume = self.source[open.end..]
            .find([')', '\n'])
            .map(|i| open.end + i + 1)
            .unwrap_or(self.source.len());

        self.tokens.truncate(self.pos);
        self.tokens.extend(
            tokenize(&self.source[resume..])
                .into_iter()
                .filter(|token| !token.kind.is_trivia())
                .map(|token| Token {
                    kind: token.kind,
                    start: token.start + resume,
                    end: token.end + resume,
                }),
        );
        self.prev_end = resume;
        self.finish(args);
    }

    fn arguments(&mut self, parent: NodeId) {
        let args = self.start(NodeKind::Arguments, parent);
        self.bump(); // '('
        loop {
            let before = self.pos;
            match self.peek_kind() {
                None => break,
                Some(TokenKind::RParen) => {
                    self.bump();
                    break;
                }
                Some(TokenKind::Comma) => self.bump(),
                Some(TokenKind::Semicolon | TokenKind::LBrace | TokenKind::RBrace) => break,
                Some(TokenKind::Variable) if self.nth_kind(1) == Some(TokenKind::Colon) => {
                    let keyword = self.start(NodeKind::KeywordArgument, args);
                    self.token_node(NodeKind::VariableName, keyword);
                    self.bump(); // ':'
                    self.value(
                        keyword,
                        &[TokenKind::Comma, TokenKind::RParen, TokenKind::Semicolon],
                    );
                    self.finish(keyword);
                }
                Some(_) => {
                    self.value(
                        args,
                        &[TokenKind::Comma, TokenKind::RParen, TokenKind::Semicolon],
                    );
                }
            }
            if self.pos == before {
                self.token_node(NodeKind::Error, args);
            }
        }
        self.finish(args);
    }
}
