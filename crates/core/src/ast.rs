//! Syntax tree model produced by the parser.
//!
//! Nodes are created once during parsing and never mutated; the renderer
//! walks them read-only and the tree is dropped afterwards.

/// Header depth, restricted to levels 1 through 6.
///
/// The only constructor validates the range, so a held value is always in
/// bounds. Marker runs longer than six degrade to literal text before the
/// parser ever requests a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HeaderLevel(u8);

impl HeaderLevel {
    /// Creates a level, rejecting values outside `1..=6`.
    pub const fn new(level: u8) -> Option<HeaderLevel> {
        if matches!(level, 1..=6) {
            Some(HeaderLevel(level))
        } else {
            None
        }
    }

    /// Returns the numeric level.
    pub const fn get(self) -> u8 {
        self.0
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for HeaderLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let level = u8::deserialize(deserializer)?;
        HeaderLevel::new(level).ok_or_else(|| {
            serde::de::Error::custom(format!("header level {level} outside 1..=6"))
        })
    }
}

/// A parsed document fragment.
///
/// Children are stored in document order. Malformed markup never reaches
/// this type; the parser resolves it to [`Node::Text`] beforehand.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Node {
    /// Document root; always the outermost node, never nested.
    Root {
        /// Top-level content in document order.
        children: Vec<Node>,
    },
    /// Literal text emitted verbatim by the renderer.
    Text {
        /// The literal payload.
        text: String,
    },
    /// Hard line break.
    NewLine,
    /// Single-marker emphasis span.
    Italic {
        /// Emphasized content.
        children: Vec<Node>,
    },
    /// Double-marker emphasis span.
    Bold {
        /// Emphasized content.
        children: Vec<Node>,
    },
    /// Header with its literal inline content.
    Header {
        /// Header depth.
        level: HeaderLevel,
        /// Inline content, one literal text node per source token.
        children: Vec<Node>,
    },
    /// Well-formed link. Malformed link syntax degrades to text and never
    /// constructs this variant.
    Link {
        /// Displayed label subtree.
        label: Vec<Node>,
        /// Destination subtree.
        target: Vec<Node>,
    },
}

impl Node {
    /// Creates a literal text node.
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text { text: text.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_level_enforces_bounds_at_construction() {
        assert!(HeaderLevel::new(0).is_none());
        assert!(HeaderLevel::new(7).is_none());
        for level in 1..=6 {
            let constructed = HeaderLevel::new(level).unwrap();
            assert_eq!(constructed.get(), level);
        }
    }

    #[test]
    fn text_helper_owns_its_payload() {
        let node = Node::text("literal");
        assert_eq!(
            node,
            Node::Text {
                text: "literal".to_string()
            }
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serialization_round_trips_and_validates_levels() {
        let tree = Node::Root {
            children: vec![
                Node::Header {
                    level: HeaderLevel::new(2).unwrap(),
                    children: vec![Node::text("hi")],
                },
                Node::NewLine,
                Node::Bold {
                    children: vec![Node::text("loud")],
                },
            ],
        };
        let json = serde_json::to_string(&tree).unwrap();
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);

        let invalid = serde_json::from_str::<HeaderLevel>("9");
        assert!(invalid.is_err());
    }
}
