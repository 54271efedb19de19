//! Pattern 预处理
//!
//! - `ces`: 按强度 / alternate 过滤后的非可忽略 CE，用于移位表
//! - `pces`: 处理后 CE，用于匹配
//! - `shift` / `back_shift`: 257 桶的 Boyer-Moore 坏字符表
//! - `canonical_pces`: NFD 形式的 PCE，供重音重排比较
//! - 前缀 / 后缀重音标记（主强度下恒为 false）

use crate::collation::element::PRIMARY_ORDER_MASK;
use crate::collation::processed::processed_elements;
use crate::collation::{CollationElement, Collator, Elements, ProcessedElement, Strength};
use crate::text::Normalization;

pub const SHIFT_TABLE_SIZE: usize = 257;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternModel {
    text: String,
    ces: Vec<CollationElement>,
    pces: Vec<ProcessedElement>,
    canonical_pces: Vec<ProcessedElement>,
    expansion_surplus: usize,
    default_shift_size: usize,
    shift: Vec<usize>,
    back_shift: Vec<usize>,
    has_prefix_accents: bool,
    has_suffix_accents: bool,
}

impl PatternModel {
    pub fn build<C, N>(text: &str, collator: &C, normalizer: &N) -> Self
    where
        C: Collator + ?Sized,
        N: Normalization + ?Sized,
    {
        let strength = collator.strength();
        let mut ces = Vec::with_capacity(text.len());
        let mut expansion_surplus = 0usize;
        for el in Elements::new(collator, text) {
            let ce = filter_ce(
                el.ce,
                strength,
                collator.is_alternate_shifted(),
                collator.variable_top(),
            );
            if !ce.is_ignorable() {
                ces.push(ce);
            }
            expansion_surplus += collator.max_expansion(el.ce).saturating_sub(1);
        }

        let pces: Vec<ProcessedElement> = processed_elements(collator, text)
            .into_iter()
            .map(|cei| cei.pce)
            .collect();

        // 重音重排时和规范顺序的候选串比较
        let nfd = normalizer.decompose_nfd(text);
        let canonical_pces = if nfd == text {
            pces.clone()
        } else {
            processed_elements(collator, &nfd)
                .into_iter()
                .map(|cei| cei.pce)
                .collect()
        };

        let (has_prefix_accents, has_suffix_accents) = if strength == Strength::Primary {
            (false, false)
        } else {
            let lead = text.chars().next().map_or(0, |ch| normalizer.fcd(ch).lead);
            let trail = text.chars().next_back().map_or(0, |ch| normalizer.fcd(ch).trail);
            (lead != 0, trail != 0)
        };

        let mut model = Self {
            text: text.to_string(),
            ces,
            pces,
            canonical_pces,
            expansion_surplus,
            default_shift_size: 0,
            shift: Vec::new(),
            back_shift: Vec::new(),
            has_prefix_accents,
            has_suffix_accents,
        };

        if !model.ces.is_empty() {
            let ce_len = model.ces.len();
            model.default_shift_size = if ce_len > expansion_surplus {
                ce_len - expansion_surplus
            } else {
                1
            };
            model.build_shift_tables();
        }

        tracing::debug!(
            ce_len = model.ces.len(),
            pce_len = model.pces.len(),
            default_shift = model.default_shift_size,
            prefix_accents = model.has_prefix_accents,
            suffix_accents = model.has_suffix_accents,
            "pattern model built"
        );
        model
    }

    fn build_shift_tables(&mut self) {
        let default = self.default_shift_size;
        let last = self.ces.len() - 1;

        self.shift = vec![default; SHIFT_TABLE_SIZE];
        for (count, ce) in self.ces[..last].iter().enumerate() {
            // 从该位置到末尾还剩的 CE 数
            let remaining = default as isize - count as isize - 1;
            self.shift[hash(*ce)] = if remaining > 1 { remaining as usize } else { 1 };
        }
        self.shift[hash(self.ces[last])] = 1;
        self.shift[hash(CollationElement::IGNORABLE)] = 1;

        self.back_shift = vec![default; SHIFT_TABLE_SIZE];
        for count in (1..=last).rev() {
            self.back_shift[hash(self.ces[count])] = if count > self.expansion_surplus {
                count - self.expansion_surplus
            } else {
                1
            };
        }
        self.back_shift[hash(self.ces[0])] = 1;
        self.back_shift[hash(CollationElement::IGNORABLE)] = 1;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn ces(&self) -> &[CollationElement] {
        &self.ces
    }

    pub fn ce_len(&self) -> usize {
        self.ces.len()
    }

    pub fn pces(&self) -> &[ProcessedElement] {
        &self.pces
    }

    /// NFD 形式 pattern 的 PCE
    pub fn canonical_pces(&self) -> &[ProcessedElement] {
        &self.canonical_pces
    }

    pub fn pce_len(&self) -> usize {
        self.pces.len()
    }

    /// 排序后什么都不剩的 pattern，在每个边界上零长度匹配
    pub fn is_empty(&self) -> bool {
        self.ces.is_empty() || self.pces.is_empty()
    }

    pub fn expansion_surplus(&self) -> usize {
        self.expansion_surplus
    }

    pub fn default_shift_size(&self) -> usize {
        self.default_shift_size
    }

    pub fn has_prefix_accents(&self) -> bool {
        self.has_prefix_accents
    }

    pub fn has_suffix_accents(&self) -> bool {
        self.has_suffix_accents
    }

    /// 空 pattern 没有表，长度为 0
    pub fn shift_table(&self) -> &[usize] {
        &self.shift
    }

    pub fn back_shift_table(&self) -> &[usize] {
        &self.back_shift
    }

    pub fn shift(&self, ce: CollationElement) -> usize {
        self.shift
            .get(hash(ce))
            .copied()
            .unwrap_or(self.default_shift_size)
    }

    pub fn back_shift(&self, ce: CollationElement) -> usize {
        self.back_shift
            .get(hash(ce))
            .copied()
            .unwrap_or(self.default_shift_size)
    }
}

/// 移位表桶号
pub fn hash(ce: CollationElement) -> usize {
    ce.primary() as usize % SHIFT_TABLE_SIZE
}

/// 按强度掩码并处理 alternate shifted；variable 元素在 quaternary 以下直接丢弃
pub fn filter_ce(
    ce: CollationElement,
    strength: Strength,
    shifted: bool,
    variable_top: u32,
) -> CollationElement {
    let ce = ce.masked(strength.mask());
    if shifted {
        if variable_top > ce.raw() {
            if strength >= Strength::Quaternary {
                return ce.masked(PRIMARY_ORDER_MASK);
            }
            return CollationElement::IGNORABLE;
        }
    } else if strength >= Strength::Quaternary && ce.is_ignorable() {
        return CollationElement::from_raw(0xFFFF);
    }
    ce
}

#[cfg(test)]
#[path = "../../tests/unit/search/pattern.rs"]
mod tests;
