//! Recursive-descent parser for the tinymark dialect.
//!
//! The parser walks the token sequence with a cursor, dispatching on the
//! current token's kind. Marker constructs (emphasis, links, headers) look
//! ahead for their closing runs; anything that fails validation degrades
//! to literal text, so parsing is total. Closing-run lookups go through a
//! [`TokenIndex`] built once per parse, keeping the search logarithmic in
//! the token count.

use std::ops::Range;

use crate::ast::{HeaderLevel, Node};
use crate::token::{Token, TokenKind};

/// Parses a token sequence into a [`Node::Root`] tree.
///
/// Total over any token sequence: malformed markup becomes literal
/// [`Node::Text`] content instead of an error.
pub fn parse(tokens: &[Token<'_>]) -> Node {
    let index = TokenIndex::build(tokens);
    let children = Parser {
        tokens,
        index: &index,
        start: 0,
        pos: 0,
        end: tokens.len(),
        context: Context::None,
    }
    .run();
    Node::Root { children }
}

/// Enclosing emphasis threaded into recursive sub-parses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Context {
    /// No enclosing emphasis.
    #[default]
    None,
    /// Inside single-marker emphasis; nested emphasis stays literal.
    Italic,
}

/// Precomputed lookups shared by every recursive sub-parse.
///
/// Closing-run searches binary-search the run-start lists; the span
/// predicates read prefix counts. Run starts are recorded only for runs
/// of the exact length a closer search ever wants, so a stored start is
/// already known not to touch more tokens of the same kind.
struct TokenIndex {
    /// Starts of maximal one-underscore runs.
    underscore_singles: Vec<usize>,
    /// Starts of maximal two-underscore runs.
    underscore_doubles: Vec<usize>,
    /// Starts of lone right brackets.
    bracket_closers: Vec<usize>,
    /// Starts of lone right parens.
    paren_closers: Vec<usize>,
    /// Prefix counts of Underscore tokens.
    underscore_counts: Vec<usize>,
    /// Prefix counts of Space and Escape tokens.
    break_counts: Vec<usize>,
    /// Prefix counts of Number tokens.
    number_counts: Vec<usize>,
}

impl TokenIndex {
    fn build(tokens: &[Token<'_>]) -> TokenIndex {
        let mut index = TokenIndex {
            underscore_singles: Vec::new(),
            underscore_doubles: Vec::new(),
            bracket_closers: Vec::new(),
            paren_closers: Vec::new(),
            underscore_counts: Vec::with_capacity(tokens.len() + 1),
            break_counts: Vec::with_capacity(tokens.len() + 1),
            number_counts: Vec::with_capacity(tokens.len() + 1),
        };

        let mut pos = 0;
        while pos < tokens.len() {
            let kind = tokens[pos].kind;
            let mut end = pos + 1;
            while end < tokens.len() && tokens[end].kind == kind {
                end += 1;
            }
            match (kind, end - pos) {
                (TokenKind::Underscore, 1) => index.underscore_singles.push(pos),
                (TokenKind::Underscore, 2) => index.underscore_doubles.push(pos),
                (TokenKind::RightBracket, 1) => index.bracket_closers.push(pos),
                (TokenKind::RightParen, 1) => index.paren_closers.push(pos),
                _ => {}
            }
            pos = end;
        }

        let (mut underscores, mut breaks, mut numbers) = (0, 0, 0);
        index.underscore_counts.push(0);
        index.break_counts.push(0);
        index.number_counts.push(0);
        for token in tokens {
            match token.kind {
                TokenKind::Underscore => underscores += 1,
                TokenKind::Space | TokenKind::Escape => breaks += 1,
                TokenKind::Number => numbers += 1,
                _ => {}
            }
            index.underscore_counts.push(underscores);
            index.break_counts.push(breaks);
            index.number_counts.push(numbers);
        }

        index
    }

    /// Stored run starts for closing runs of exactly `length` tokens.
    fn runs(&self, kind: TokenKind, length: usize) -> &[usize] {
        match (kind, length) {
            (TokenKind::Underscore, 1) => &self.underscore_singles,
            (TokenKind::Underscore, 2) => &self.underscore_doubles,
            (TokenKind::RightBracket, 1) => &self.bracket_closers,
            (TokenKind::RightParen, 1) => &self.paren_closers,
            _ => &[],
        }
    }

    fn underscores_in(&self, span: Range<usize>) -> usize {
        self.underscore_counts[span.end] - self.underscore_counts[span.start]
    }

    fn contains_break(&self, span: Range<usize>) -> bool {
        self.break_counts[span.end] > self.break_counts[span.start]
    }

    fn contains_number(&self, span: Range<usize>) -> bool {
        self.number_counts[span.end] > self.number_counts[span.start]
    }
}

/// Cursor state for one parse range.
///
/// Recursive constructs spawn a child parser over a strict sub-range of
/// the same token slice, sharing the index; ranges produced by the
/// dispatch loop never split a marker run, so index positions stay valid
/// in every sub-range.
struct Parser<'a> {
    tokens: &'a [Token<'a>],
    index: &'a TokenIndex,
    /// Lower bound of the range; headers may only open here or after a
    /// line break.
    start: usize,
    pos: usize,
    end: usize,
    context: Context,
}

impl<'a> Parser<'a> {
    fn run(mut self) -> Vec<Node> {
        let mut nodes = Vec::new();
        while self.pos < self.end {
            let token = self.tokens[self.pos];
            match token.kind {
                TokenKind::Grid => self.parse_grid(&mut nodes),
                TokenKind::Escape => {
                    nodes.push(Node::NewLine);
                    self.pos += 1;
                }
                TokenKind::Slash => self.parse_slash(&mut nodes),
                TokenKind::Underscore => self.parse_underscore(&mut nodes),
                TokenKind::LeftBracket => self.parse_left_bracket(&mut nodes),
                _ => {
                    nodes.push(Node::text(token.text));
                    self.pos += 1;
                }
            }
        }
        nodes
    }

    /// A grid run opens a header only at the range start or right after a
    /// line break, with at least one following space and at most six
    /// markers. Anything else leaves the run as literal text.
    fn parse_grid(&mut self, nodes: &mut Vec<Node>) {
        let run_start = self.pos;
        let level = self.run_length_at(run_start);
        let after_run = run_start + level;

        let at_line_start =
            run_start == self.start || self.tokens[run_start - 1].kind == TokenKind::Escape;
        let gap = self.space_run_length_at(after_run);
        let header_level = if at_line_start && gap > 0 {
            u8::try_from(level).ok().and_then(HeaderLevel::new)
        } else {
            None
        };
        let Some(level) = header_level else {
            self.push_literal_tokens(nodes, run_start, level);
            self.pos = after_run;
            return;
        };

        // Header content runs to the next line break and stays raw: one
        // literal text node per token, markers included.
        let content_start = after_run + gap;
        let content_end = content_start
            + self.tokens[content_start..self.end]
                .iter()
                .take_while(|token| token.kind != TokenKind::Escape)
                .count();
        let children = self.tokens[content_start..content_end]
            .iter()
            .map(|token| Node::text(token.text))
            .collect();
        nodes.push(Node::Header { level, children });
        self.pos = content_end;
    }

    /// Backslash drops itself and emits the next token verbatim; a
    /// trailing backslash stays literal.
    fn parse_slash(&mut self, nodes: &mut Vec<Node>) {
        if self.pos + 1 < self.end {
            nodes.push(Node::text(self.tokens[self.pos + 1].text));
            self.pos += 2;
        } else {
            nodes.push(Node::text(self.tokens[self.pos].text));
            self.pos += 1;
        }
    }

    fn parse_underscore(&mut self, nodes: &mut Vec<Node>) {
        let open_start = self.pos;
        let n = self.run_length_at(open_start);
        let after_open = open_start + n;

        // Markers immediately followed by whitespace never open emphasis.
        let trailing_spaces = self.space_run_length_at(after_open);
        if trailing_spaces > 0 {
            self.push_literal_tokens(nodes, open_start, n + trailing_spaces);
            self.pos = after_open + trailing_spaces;
            return;
        }
        if n != 1 && n != 2 {
            self.push_literal_tokens(nodes, open_start, n);
            self.pos = after_open;
            return;
        }
        let Some(close_start) = self.find_closer(TokenKind::Underscore, n, after_open) else {
            self.push_literal_tokens(nodes, open_start, n);
            self.pos = after_open;
            return;
        };
        let close_end = close_start + n;
        let gap_spaces = self.space_run_ending_at(close_start, after_open);
        let inner_end = close_start - gap_spaces;

        let rejected = gap_spaces > 0
            || self.context == Context::Italic
            || self.splits_words(open_start, after_open..close_start, close_end)
            || self.binds_digits(open_start, after_open..close_start, close_end)
            || self.has_unpaired_inner_markers(after_open..close_start);

        if rejected {
            log::debug!("emphasis candidate at token {open_start} stays literal");
            self.push_literal_tokens(nodes, open_start, n);
            let inner = self.subparse(after_open, inner_end, self.context);
            nodes.extend(inner);
            self.push_literal_tokens(nodes, inner_end, gap_spaces + n);
            self.pos = close_end;
            return;
        }

        let child_context = if n == 1 { Context::Italic } else { self.context };
        let children = self.subparse(after_open, close_start, child_context);
        let node = if n == 1 {
            Node::Italic { children }
        } else {
            Node::Bold { children }
        };
        nodes.push(node);
        self.pos = close_end;
    }

    fn parse_left_bracket(&mut self, nodes: &mut Vec<Node>) {
        if let Some((node, next_pos)) = self.try_link() {
            nodes.push(node);
            self.pos = next_pos;
        } else {
            nodes.push(Node::text(self.tokens[self.pos].text));
            self.pos += 1;
        }
    }

    /// Attempts `[label](target)` at the cursor. Returns the built node
    /// and the position past the closing paren, or `None` when the syntax
    /// is incomplete and the bracket must stay literal.
    fn try_link(&self) -> Option<(Node, usize)> {
        let open = self.pos;
        let label_close = self.find_closer(TokenKind::RightBracket, 1, open + 1)?;
        let target_open = label_close + 1;
        if self.kind_at(target_open) != Some(TokenKind::LeftParen) {
            return None;
        }
        if target_open + 1 >= self.end {
            return None;
        }
        let target_close = self.find_closer(TokenKind::RightParen, 1, target_open + 1)?;

        let label = self.subparse(open + 1, label_close, self.context);
        let target = self.subparse(target_open + 1, target_close, self.context);
        Some((Node::Link { label, target }, target_close + 1))
    }

    /// Nearest eligible closing run of exactly `length` tokens of `kind`
    /// at or after `from`. A candidate preceded by a backslash rejects
    /// the whole search rather than skipping ahead.
    fn find_closer(&self, kind: TokenKind, length: usize, from: usize) -> Option<usize> {
        let starts = self.index.runs(kind, length);
        let candidate = starts.partition_point(|&start| start < from);
        let start = *starts.get(candidate)?;
        if start + length > self.end {
            return None;
        }
        if start > 0 && self.tokens[start - 1].kind == TokenKind::Slash {
            return None;
        }
        Some(start)
    }

    /// Emphasis spanning whitespace may not be flanked by a word on the
    /// outside of either marker.
    fn splits_words(&self, open_start: usize, span: Range<usize>, close_end: usize) -> bool {
        self.index.contains_break(span)
            && (self.kind_before(open_start) == Some(TokenKind::Word)
                || self.kind_at(close_end) == Some(TokenKind::Word))
    }

    /// Digits inside the span defeat emphasis whenever a word or number
    /// sits directly outside either marker.
    fn binds_digits(&self, open_start: usize, span: Range<usize>, close_end: usize) -> bool {
        self.index.contains_number(span)
            && (matches!(
                self.kind_before(open_start),
                Some(TokenKind::Word | TokenKind::Number)
            ) || matches!(
                self.kind_at(close_end),
                Some(TokenKind::Word | TokenKind::Number)
            ))
    }

    /// An odd number of markers strictly between open and close means an
    /// unpaired marker, which invalidates the whole match.
    fn has_unpaired_inner_markers(&self, span: Range<usize>) -> bool {
        self.index.underscores_in(span) % 2 == 1
    }

    fn subparse(&self, lo: usize, hi: usize, context: Context) -> Vec<Node> {
        Parser {
            tokens: self.tokens,
            index: self.index,
            start: lo,
            pos: lo,
            end: hi,
            context,
        }
        .run()
    }

    fn run_length_at(&self, pos: usize) -> usize {
        let kind = self.tokens[pos].kind;
        self.tokens[pos..self.end]
            .iter()
            .take_while(|token| token.kind == kind)
            .count()
    }

    fn space_run_length_at(&self, pos: usize) -> usize {
        self.tokens[pos..self.end]
            .iter()
            .take_while(|token| token.kind == TokenKind::Space)
            .count()
    }

    /// Length of the space run ending just before `pos`, never reaching
    /// below `floor`.
    fn space_run_ending_at(&self, pos: usize, floor: usize) -> usize {
        let mut count = 0;
        while pos - count > floor && self.tokens[pos - count - 1].kind == TokenKind::Space {
            count += 1;
        }
        count
    }

    fn kind_before(&self, pos: usize) -> Option<TokenKind> {
        (pos > self.start).then(|| self.tokens[pos - 1].kind)
    }

    fn kind_at(&self, pos: usize) -> Option<TokenKind> {
        (pos < self.end).then(|| self.tokens[pos].kind)
    }

    fn push_literal_tokens(&self, nodes: &mut Vec<Node>, start: usize, count: usize) {
        for token in &self.tokens[start..start + count] {
            nodes.push(Node::text(token.text));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse_str(input: &str) -> Node {
        parse(&tokenize(input))
    }

    fn root(children: Vec<Node>) -> Node {
        Node::Root { children }
    }

    fn text(payload: &str) -> Node {
        Node::text(payload)
    }

    #[test]
    fn plain_text_tokens_become_literal_nodes() {
        assert_eq!(
            parse_str("ab 12"),
            root(vec![text("ab"), text(" "), text("12")])
        );
    }

    #[test]
    fn empty_input_parses_to_empty_root() {
        assert_eq!(parse_str(""), root(vec![]));
    }

    #[test]
    fn single_underscores_wrap_italic() {
        assert_eq!(
            parse_str("_ab_"),
            root(vec![Node::Italic {
                children: vec![text("ab")]
            }])
        );
    }

    #[test]
    fn double_underscores_wrap_bold() {
        assert_eq!(
            parse_str("__a b__"),
            root(vec![Node::Bold {
                children: vec![text("a"), text(" "), text("b")]
            }])
        );
    }

    #[test]
    fn nearest_closer_wins() {
        assert_eq!(
            parse_str("_a_b_"),
            root(vec![
                Node::Italic {
                    children: vec![text("a")]
                },
                text("b"),
                text("_"),
            ])
        );
    }

    #[test]
    fn italic_nests_inside_bold() {
        assert_eq!(
            parse_str("__a _b_ c__"),
            root(vec![Node::Bold {
                children: vec![
                    text("a"),
                    text(" "),
                    Node::Italic {
                        children: vec![text("b")]
                    },
                    text(" "),
                    text("c"),
                ]
            }])
        );
    }

    #[test]
    fn emphasis_inside_italic_stays_literal() {
        assert_eq!(
            parse_str("_a __b__ c_"),
            root(vec![Node::Italic {
                children: vec![
                    text("a"),
                    text(" "),
                    text("_"),
                    text("_"),
                    text("b"),
                    text("_"),
                    text("_"),
                    text(" "),
                    text("c"),
                ]
            }])
        );
    }

    #[test]
    fn unmatched_openers_stay_literal() {
        assert_eq!(
            parse_str("____"),
            root(vec![text("_"), text("_"), text("_"), text("_")])
        );
        assert_eq!(parse_str("_a"), root(vec![text("_"), text("a")]));
        // a longer run touching the candidate disqualifies it
        assert_eq!(
            parse_str("_a__"),
            root(vec![text("_"), text("a"), text("_"), text("_")])
        );
    }

    #[test]
    fn marker_before_whitespace_never_opens() {
        assert_eq!(
            parse_str("_ a_"),
            root(vec![text("_"), text(" "), text("a"), text("_")])
        );
    }

    #[test]
    fn space_before_closer_degrades_to_literal() {
        assert_eq!(
            parse_str("_a _"),
            root(vec![text("_"), text("a"), text(" "), text("_")])
        );
    }

    #[test]
    fn emphasis_splitting_words_stays_literal() {
        assert_eq!(
            parse_str("раз_ных сл_овах"),
            root(vec![
                text("раз"),
                text("_"),
                text("ных"),
                text(" "),
                text("сл"),
                text("_"),
                text("овах"),
            ])
        );
    }

    #[test]
    fn digits_beside_markers_stay_literal() {
        assert_eq!(
            parse_str("root1_2_3"),
            root(vec![
                text("root"),
                text("1"),
                text("_"),
                text("2"),
                text("_"),
                text("3"),
            ])
        );
        assert_eq!(
            parse_str("root1__2__3"),
            root(vec![
                text("root"),
                text("1"),
                text("_"),
                text("_"),
                text("2"),
                text("_"),
                text("_"),
                text("3"),
            ])
        );
    }

    #[test]
    fn odd_inner_markers_invalidate_the_match() {
        assert_eq!(
            parse_str("__a_b__"),
            root(vec![
                text("_"),
                text("_"),
                text("a"),
                text("_"),
                text("b"),
                text("_"),
                text("_"),
            ])
        );
    }

    #[test]
    fn escaped_closer_rejects_the_match() {
        assert_eq!(
            parse_str("_a\\_"),
            root(vec![text("_"), text("a"), text("_")])
        );
    }

    #[test]
    fn slash_escapes_the_next_token() {
        assert_eq!(
            parse_str("\\_a_"),
            root(vec![text("_"), text("a"), text("_")])
        );
        assert_eq!(parse_str("a\\"), root(vec![text("a"), text("\\")]));
    }

    #[test]
    fn headers_collect_raw_content_to_line_end() {
        assert_eq!(
            parse_str("# H1\n## H2"),
            root(vec![
                Node::Header {
                    level: HeaderLevel::new(1).unwrap(),
                    children: vec![text("H"), text("1")]
                },
                Node::NewLine,
                Node::Header {
                    level: HeaderLevel::new(2).unwrap(),
                    children: vec![text("H"), text("2")]
                },
            ])
        );
        // markers inside a header are not parsed
        assert_eq!(
            parse_str("# _a_"),
            root(vec![Node::Header {
                level: HeaderLevel::new(1).unwrap(),
                children: vec![text("_"), text("a"), text("_")]
            }])
        );
    }

    #[test]
    fn header_requires_line_start_and_space() {
        assert_eq!(
            parse_str("a # b"),
            root(vec![
                text("a"),
                text(" "),
                text("#"),
                text(" "),
                text("b"),
            ])
        );
        assert_eq!(
            parse_str("  # b"),
            root(vec![
                text(" "),
                text(" "),
                text("#"),
                text(" "),
                text("b"),
            ])
        );
        assert_eq!(parse_str("#b"), root(vec![text("#"), text("b")]));
    }

    #[test]
    fn header_level_is_capped_at_six() {
        assert_eq!(
            parse_str("###### h"),
            root(vec![Node::Header {
                level: HeaderLevel::new(6).unwrap(),
                children: vec![text("h")]
            }])
        );
        let seven = parse_str("####### h");
        assert_eq!(
            seven,
            root(vec![
                text("#"),
                text("#"),
                text("#"),
                text("#"),
                text("#"),
                text("#"),
                text("#"),
                text(" "),
                text("h"),
            ])
        );
    }

    #[test]
    fn header_swallows_every_gap_space() {
        assert_eq!(
            parse_str("#  H1"),
            root(vec![Node::Header {
                level: HeaderLevel::new(1).unwrap(),
                children: vec![text("H"), text("1")]
            }])
        );
    }

    #[test]
    fn links_build_label_and_target_subtrees() {
        assert_eq!(
            parse_str("[text](example.com)"),
            root(vec![Node::Link {
                label: vec![text("text")],
                target: vec![text("example"), text("."), text("com")],
            }])
        );
    }

    #[test]
    fn link_interior_parses_recursively() {
        assert_eq!(
            parse_str("[_a_](x)"),
            root(vec![Node::Link {
                label: vec![Node::Italic {
                    children: vec![text("a")]
                }],
                target: vec![text("x")],
            }])
        );
        assert_eq!(
            parse_str("__[b](c)__"),
            root(vec![Node::Bold {
                children: vec![Node::Link {
                    label: vec![text("b")],
                    target: vec![text("c")],
                }]
            }])
        );
    }

    #[test]
    fn malformed_links_degrade_to_literal() {
        // unterminated target
        assert_eq!(
            parse_str("[a](b"),
            root(vec![
                text("["),
                text("a"),
                text("]"),
                text("("),
                text("b"),
            ])
        );
        // no target at all
        assert_eq!(
            parse_str("[a]b"),
            root(vec![text("["), text("a"), text("]"), text("b")])
        );
        // escaped label closer
        assert_eq!(
            parse_str("\\[a](b)"),
            root(vec![
                text("["),
                text("a"),
                text("]"),
                text("("),
                text("b"),
                text(")"),
            ])
        );
    }

    #[test]
    fn asterisks_and_tabs_stay_literal() {
        assert_eq!(
            parse_str("*a*\tb"),
            root(vec![
                text("*"),
                text("a"),
                text("*"),
                text("\t"),
                text("b"),
            ])
        );
    }
}
