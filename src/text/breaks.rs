//! 边界服务
//!
//! 所有实现都把文本两端当作边界；偏移量必须落在 `char` 边界上，否则不是边界。

use serde::{Deserialize, Serialize};
use unicode_segmentation::{GraphemeCursor, UnicodeSegmentation};

pub trait BreakService {
    fn is_boundary(&self, text: &str, offset: usize) -> bool;

    /// `offset` 之后的第一个边界；已在末尾时返回 `text.len()`
    fn following(&self, text: &str, offset: usize) -> usize;

    /// `offset` 之前的最后一个边界；已在开头时返回 0
    fn preceding(&self, text: &str, offset: usize) -> usize;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakKind {
    #[default]
    Grapheme,
    Character,
    Word,
}

impl BreakKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "grapheme" => Some(BreakKind::Grapheme),
            "character" | "char" => Some(BreakKind::Character),
            "word" => Some(BreakKind::Word),
            _ => None,
        }
    }

    pub fn service(self) -> Box<dyn BreakService> {
        match self {
            BreakKind::Grapheme => Box::new(GraphemeBreaks),
            BreakKind::Character => Box::new(CharacterBreaks),
            BreakKind::Word => Box::new(WordBreaks),
        }
    }
}

/// 扩展字素簇边界
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphemeBreaks;

impl BreakService for GraphemeBreaks {
    fn is_boundary(&self, text: &str, offset: usize) -> bool {
        if offset == 0 || offset >= text.len() {
            return offset <= text.len();
        }
        if !text.is_char_boundary(offset) {
            return false;
        }
        let mut cursor = GraphemeCursor::new(offset, text.len(), true);
        cursor.is_boundary(text, 0).unwrap_or(true)
    }

    fn following(&self, text: &str, offset: usize) -> usize {
        if offset >= text.len() {
            return text.len();
        }
        let mut cursor = GraphemeCursor::new(offset, text.len(), true);
        match cursor.next_boundary(text, 0) {
            Ok(Some(next)) => next,
            _ => text.len(),
        }
    }

    fn preceding(&self, text: &str, offset: usize) -> usize {
        if offset == 0 {
            return 0;
        }
        let mut cursor = GraphemeCursor::new(offset.min(text.len()), text.len(), true);
        match cursor.prev_boundary(text, 0) {
            Ok(Some(prev)) => prev,
            _ => 0,
        }
    }
}

/// 每个 `char` 边界都是边界
#[derive(Debug, Clone, Copy, Default)]
pub struct CharacterBreaks;

impl BreakService for CharacterBreaks {
    fn is_boundary(&self, text: &str, offset: usize) -> bool {
        offset <= text.len() && text.is_char_boundary(offset)
    }

    fn following(&self, text: &str, offset: usize) -> usize {
        match text.get(offset..).and_then(|rest| rest.chars().next()) {
            Some(ch) => offset + ch.len_utf8(),
            None => text.len(),
        }
    }

    fn preceding(&self, text: &str, offset: usize) -> usize {
        match text.get(..offset).and_then(|head| head.chars().next_back()) {
            Some(ch) => offset - ch.len_utf8(),
            None => 0,
        }
    }
}

/// UAX #29 单词边界，按行计算
#[derive(Debug, Clone, Copy, Default)]
pub struct WordBreaks;

impl WordBreaks {
    /// 包含 `offset` 的行，`\n` 算在行内
    fn line_around(text: &str, offset: usize) -> (usize, usize) {
        let start = text[..offset].rfind('\n').map_or(0, |ix| ix + 1);
        let end = text[offset..]
            .find('\n')
            .map_or(text.len(), |ix| offset + ix + 1);
        (start, end)
    }
}

impl BreakService for WordBreaks {
    fn is_boundary(&self, text: &str, offset: usize) -> bool {
        if offset == 0 || offset == text.len() {
            return true;
        }
        if offset > text.len() || !text.is_char_boundary(offset) {
            return false;
        }
        let (start, end) = Self::line_around(text, offset);
        if offset == start {
            return true;
        }
        text[start..end]
            .split_word_bound_indices()
            .any(|(ix, _)| start + ix == offset)
    }

    fn following(&self, text: &str, offset: usize) -> usize {
        if offset >= text.len() {
            return text.len();
        }
        let (start, end) = Self::line_around(text, offset);
        text[start..end]
            .split_word_bound_indices()
            .map(|(ix, word)| start + ix + word.len())
            .find(|&bound| bound > offset)
            .unwrap_or(end)
    }

    fn preceding(&self, text: &str, offset: usize) -> usize {
        let probe = CharacterBreaks.preceding(text, offset);
        if probe == offset {
            return 0;
        }
        let (start, end) = Self::line_around(text, probe);
        text[start..end]
            .split_word_bound_indices()
            .map(|(ix, _)| start + ix)
            .filter(|&bound| bound < offset)
            .last()
            .unwrap_or(start)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/breaks.rs"]
mod tests;
