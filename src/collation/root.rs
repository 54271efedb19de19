//! 参考排序引擎
//!
//! 不是完整的 DUCET，只保证搜索需要的性质：
//! - 大小写只在 tertiary 上不同，重音只在 secondary 上不同
//! - 预组合字符按规范分解展开成多个 CE
//! - 标点 / 空白是 variable 元素，可以被 shifted
//! - 0xD000 以上的非字母字符产生两个元素（implicit + continuation）
//! - `Tailoring` 提供缩约（contraction）和展开（expansion）

use rustc_hash::{FxHashMap, FxHashSet};
use unicode_normalization::char::{canonical_combining_class, decompose_canonical, is_combining_mark};

use super::element::{CollationElement, Strength};
use super::Collator;

pub const VARIABLE_TOP: u32 = 0x1000_0000;

const COMMON_SECONDARY: u8 = 0x05;
const COMMON_TERTIARY: u8 = 0x05;
const UPPER_TERTIARY: u8 = 0x85;

const VARIABLE_BASE: u16 = 0x0100;
const VARIABLE_RANGE: u32 = 0x0F00;
const DIGIT_BASE: u16 = 0x1000;
const TAILORED_BASE: u16 = 0x1100;
const TAILORED_LAST: u16 = 0x1FFF;
const LETTER_BASE: u32 = 0x2000;
const IMPLICIT_BASE: u32 = 0xF000;
const IMPLICIT_START: u32 = 0xD000;

#[derive(Debug, Clone, Default)]
pub struct Tailoring {
    contractions: FxHashMap<String, Vec<CollationElement>>,
    contraction_starts: FxHashSet<char>,
    contraction_inner: FxHashSet<char>,
    max_contraction_chars: usize,
    expansions: FxHashMap<char, Vec<CollationElement>>,
    expansion_lengths: FxHashMap<CollationElement, usize>,
    next_primary: u16,
}

impl Tailoring {
    pub fn new() -> Self {
        Self {
            next_primary: TAILORED_BASE,
            ..Self::default()
        }
    }

    /// 把 `seq` 排成一个整体，分配一个新的 primary（排在数字之后、字母之前）
    pub fn contraction(self, seq: &str) -> Self {
        let primary = self.next_primary.max(TAILORED_BASE);
        let mut tailoring = self.contraction_with(
            seq,
            vec![CollationElement::new(primary, COMMON_SECONDARY, COMMON_TERTIARY)],
        );
        tailoring.next_primary = primary.saturating_add(1).min(TAILORED_LAST);
        tailoring
    }

    pub fn contraction_with(mut self, seq: &str, ces: Vec<CollationElement>) -> Self {
        let mut chars = seq.chars();
        let Some(first) = chars.next() else {
            return self;
        };
        let count = 1 + chars.clone().count();
        if count < 2 {
            self.expansions.insert(first, ces.clone());
            self.record_expansion(&ces);
            return self;
        }
        self.contraction_starts.insert(first);
        self.contraction_inner.extend(chars);
        self.max_contraction_chars = self.max_contraction_chars.max(count);
        self.record_expansion(&ces);
        self.contractions.insert(seq.to_string(), ces);
        self
    }

    /// `ch` 按 `as_text` 的根权重排序，例如 `æ` → `ae`
    pub fn expansion(mut self, ch: char, as_text: &str) -> Self {
        let mut ces = Vec::new();
        for c in as_text.chars() {
            root_weights(c, &mut ces);
        }
        ces.retain(|ce| !ce.is_ignorable());
        self.record_expansion(&ces);
        self.expansions.insert(ch, ces);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.contractions.is_empty() && self.expansions.is_empty()
    }

    fn record_expansion(&mut self, ces: &[CollationElement]) {
        if ces.len() < 2 {
            return;
        }
        if let Some(last) = ces.last() {
            let entry = self.expansion_lengths.entry(*last).or_insert(0);
            *entry = (*entry).max(ces.len());
        }
    }

    fn longest_contraction(&self, text: &str, offset: usize) -> Option<(usize, &[CollationElement])> {
        let first = text[offset..].chars().next()?;
        if !self.contraction_starts.contains(&first) {
            return None;
        }
        let mut ends = Vec::with_capacity(self.max_contraction_chars);
        for (ix, ch) in text[offset..].char_indices().take(self.max_contraction_chars) {
            ends.push(offset + ix + ch.len_utf8());
        }
        for count in (2..=ends.len()).rev() {
            let end = ends[count - 1];
            if let Some(ces) = self.contractions.get(&text[offset..end]) {
                return Some((end, ces.as_slice()));
            }
        }
        None
    }
}

#[derive(Debug, Clone)]
pub struct RootCollator {
    strength: Strength,
    alternate_shifted: bool,
    tailoring: Tailoring,
}

impl Default for RootCollator {
    fn default() -> Self {
        Self::new()
    }
}

impl RootCollator {
    pub fn new() -> Self {
        Self {
            strength: Strength::Tertiary,
            alternate_shifted: false,
            tailoring: Tailoring::new(),
        }
    }

    pub fn with_strength(mut self, strength: Strength) -> Self {
        self.strength = strength;
        self
    }

    pub fn with_alternate_shifted(mut self, shifted: bool) -> Self {
        self.alternate_shifted = shifted;
        self
    }

    pub fn with_tailoring(mut self, tailoring: Tailoring) -> Self {
        self.tailoring = tailoring;
        self
    }

    pub fn tailoring(&self) -> &Tailoring {
        &self.tailoring
    }
}

impl Collator for RootCollator {
    fn strength(&self) -> Strength {
        self.strength
    }

    fn is_alternate_shifted(&self) -> bool {
        self.alternate_shifted
    }

    fn variable_top(&self) -> u32 {
        VARIABLE_TOP
    }

    fn is_unsafe(&self, ch: char) -> bool {
        canonical_combining_class(ch) != 0
            || is_combining_mark(ch)
            || self.tailoring.contraction_inner.contains(&ch)
    }

    fn collate_unit(&self, text: &str, offset: usize, out: &mut Vec<CollationElement>) -> usize {
        let Some(ch) = text[offset..].chars().next() else {
            return offset;
        };

        if let Some((end, ces)) = self.tailoring.longest_contraction(text, offset) {
            out.extend_from_slice(ces);
            return end;
        }

        match self.tailoring.expansions.get(&ch) {
            Some(ces) => out.extend_from_slice(ces),
            None => root_weights(ch, out),
        }
        offset + ch.len_utf8()
    }

    fn max_expansion(&self, ce: CollationElement) -> usize {
        let root = if ce.primary() == 0 && ce.secondary() != 0 {
            3
        } else if ce.is_continuation() {
            2
        } else {
            1
        };
        let tailored = self.tailoring.expansion_lengths.get(&ce).copied().unwrap_or(1);
        root.max(tailored)
    }
}

/// 根排序下 `ch` 的 CE（预组合字符按规范分解展开）
pub fn root_weights(ch: char, out: &mut Vec<CollationElement>) {
    decompose_canonical(ch, |c| simple_weights(c, out));
}

fn simple_weights(ch: char, out: &mut Vec<CollationElement>) {
    let cp = ch as u32;

    if is_ignorable_char(ch) {
        out.push(CollationElement::IGNORABLE);
        return;
    }

    if is_combining_mark(ch) || canonical_combining_class(ch) != 0 {
        let secondary = if (0x0300..=0x036F).contains(&cp) {
            0x10 + (cp - 0x0300)
        } else {
            0x80 + cp % 0x7F
        };
        out.push(CollationElement::new(0, secondary as u8, COMMON_TERTIARY));
        return;
    }

    if ch.is_ascii_digit() {
        let primary = DIGIT_BASE + (cp - '0' as u32) as u16;
        out.push(CollationElement::new(primary, COMMON_SECONDARY, COMMON_TERTIARY));
        return;
    }

    if ch.is_alphanumeric() && cp < IMPLICIT_START {
        let lower = ch.to_lowercase().next().unwrap_or(ch) as u32;
        // 少数字符小写后码位反而更大，截断保持在字母区
        let primary = (LETTER_BASE + lower.min(IMPLICIT_START - 1)) as u16;
        let tertiary = if ch.is_uppercase() {
            UPPER_TERTIARY
        } else {
            COMMON_TERTIARY
        };
        out.push(CollationElement::new(primary, COMMON_SECONDARY, tertiary));
        return;
    }

    if !ch.is_alphanumeric() && cp < 0x3000 {
        let primary = VARIABLE_BASE + (cp % VARIABLE_RANGE) as u16;
        out.push(CollationElement::new(primary, COMMON_SECONDARY, COMMON_TERTIARY));
        return;
    }

    let lead = (IMPLICIT_BASE + (cp >> 12)) as u16;
    let trail = ((cp & 0x0FFF) + 1) as u16;
    out.push(CollationElement::new(lead, COMMON_SECONDARY, COMMON_TERTIARY));
    out.push(CollationElement::continuation(trail, COMMON_SECONDARY, COMMON_TERTIARY));
}

fn is_ignorable_char(ch: char) -> bool {
    match ch {
        '\t' | '\n' | '\r' => false,
        '\u{00AD}' | '\u{034F}' | '\u{FEFF}' => true,
        '\u{200B}'..='\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2060}'..='\u{2064}' => true,
        _ => ch.is_control(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/collation/root.rs"]
mod tests;
