//! 规范化服务
//!
//! 搜索核心只需要三样东西：组合类、FCD（分解首尾字符的组合类）和 NFD。

use unicode_normalization::char::{canonical_combining_class, decompose_canonical};
use unicode_normalization::UnicodeNormalization;

/// 规范分解后首字符 / 尾字符的组合类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Fcd {
    pub lead: u8,
    pub trail: u8,
}

impl Fcd {
    pub fn is_base(self) -> bool {
        self.lead == 0 && self.trail == 0
    }
}

pub trait Normalization {
    fn combining_class(&self, ch: char) -> u8;

    fn fcd(&self, ch: char) -> Fcd;

    fn decompose_nfd(&self, text: &str) -> String;

    /// NFD 追加到 `out`，复用调用方的缓冲区
    fn append_nfd(&self, text: &str, out: &mut String) {
        out.push_str(&self.decompose_nfd(text));
    }

    fn is_nfd(&self, text: &str) -> bool {
        self.decompose_nfd(text) == text
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeNormalizer;

impl Normalization for UnicodeNormalizer {
    fn combining_class(&self, ch: char) -> u8 {
        canonical_combining_class(ch)
    }

    fn fcd(&self, ch: char) -> Fcd {
        let mut first = None;
        let mut last = ch;
        decompose_canonical(ch, |c| {
            if first.is_none() {
                first = Some(c);
            }
            last = c;
        });
        Fcd {
            lead: canonical_combining_class(first.unwrap_or(ch)),
            trail: canonical_combining_class(last),
        }
    }

    fn decompose_nfd(&self, text: &str) -> String {
        text.nfd().collect()
    }

    fn append_nfd(&self, text: &str, out: &mut String) {
        out.extend(text.nfd());
    }

    fn is_nfd(&self, text: &str) -> bool {
        unicode_normalization::is_nfd(text)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/normalizer.rs"]
mod tests;
