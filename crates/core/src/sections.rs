//! Section partitioning: one scan over the semantic token stream, producing
//! an immutable map from section keyword to the `(start, end)` index range
//! of its tokens. The keyword token itself belongs to no range.

use std::collections::BTreeMap;
use std::ops::Range;

use crate::classify::Token;
use crate::error::LpError;
use crate::lexer::Spanned;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SectionKeyword {
    Minimize,
    Maximize,
    Constraints,
    Bounds,
    General,
    Binary,
    SemiContinuous,
    Sos,
    End,
}

impl SectionKeyword {
    pub fn name(self) -> &'static str {
        match self {
            SectionKeyword::Minimize => "minimize",
            SectionKeyword::Maximize => "maximize",
            SectionKeyword::Constraints => "constraints",
            SectionKeyword::Bounds => "bounds",
            SectionKeyword::General => "general",
            SectionKeyword::Binary => "binary",
            SectionKeyword::SemiContinuous => "semi-continuous",
            SectionKeyword::Sos => "sos",
            SectionKeyword::End => "end",
        }
    }
}

pub type SectionMap = BTreeMap<SectionKeyword, Range<usize>>;

/// Partition the token stream into per-section ranges.
///
/// A section keyword immediately followed by another keyword (or by the end
/// of the stream) is an empty section and is dropped without being recorded.
/// Recording the same keyword twice is fatal. Tokens before the first
/// keyword belong to no section and are ignored, matching the format's
/// established behavior.
pub fn split_sections(tokens: &[Spanned<Token>], filename: &str) -> Result<SectionMap, LpError> {
    let mut map = SectionMap::new();
    let mut open: Option<(SectionKeyword, usize)> = None;

    for (i, t) in tokens.iter().enumerate() {
        let kw = match t.token {
            Token::Section(kw) => kw,
            _ => continue,
        };
        if let Some((prev, start)) = open.take() {
            map.insert(prev, start..i);
        }
        if map.contains_key(&kw) {
            return Err(LpError::DuplicateSection {
                file: filename.to_owned(),
                line: t.line,
                section: kw.name(),
            });
        }
        let next_is_section = matches!(
            tokens.get(i + 1),
            None | Some(Spanned {
                token: Token::Section(_),
                ..
            })
        );
        if !next_is_section {
            open = Some((kw, i + 1));
        }
    }
    if let Some((prev, start)) = open {
        map.insert(prev, start..tokens.len());
    }

    Ok(map)
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
