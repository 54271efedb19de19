//! 排序元素编码
//!
//! - `CollationElement`: 32 位原始权重，primary 16 | secondary 8 | tertiary 8
//! - `ProcessedElement`: 64 位处理后权重，primary 16 | secondary 16 | tertiary 16 | quaternary 16
//! - `PositionedElement` / `Cei`: 权重 + 产生它的源文本区间 `[low, high)`
//!
//! 所有移位和掩码只出现在这个文件里。

use serde::{Deserialize, Serialize};

pub const PRIMARY_ORDER_MASK: u32 = 0xFFFF_0000;
pub const SECONDARY_ORDER_MASK: u32 = 0x0000_FF00;
pub const TERTIARY_ORDER_MASK: u32 = 0x0000_00FF;

/// tertiary 字节高两位同时置位表示 continuation 元素
const CONTINUATION_MARKER: u32 = 0xC0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Primary,
    Secondary,
    Tertiary,
    Quaternary,
    Identical,
}

impl Default for Strength {
    fn default() -> Self {
        Strength::Tertiary
    }
}

impl Strength {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "primary" | "1" => Some(Strength::Primary),
            "secondary" | "2" => Some(Strength::Secondary),
            "tertiary" | "3" => Some(Strength::Tertiary),
            "quaternary" | "4" => Some(Strength::Quaternary),
            "identical" | "i" => Some(Strength::Identical),
            _ => None,
        }
    }

    /// 该强度下参与比较的 CE 位
    pub fn mask(self) -> u32 {
        match self {
            Strength::Primary => PRIMARY_ORDER_MASK,
            Strength::Secondary => PRIMARY_ORDER_MASK | SECONDARY_ORDER_MASK,
            _ => PRIMARY_ORDER_MASK | SECONDARY_ORDER_MASK | TERTIARY_ORDER_MASK,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CollationElement(u32);

impl CollationElement {
    pub const IGNORABLE: Self = Self(0);
    pub const NULLORDER: Self = Self(u32::MAX);

    pub const fn new(primary: u16, secondary: u8, tertiary: u8) -> Self {
        Self(((primary as u32) << 16) | ((secondary as u32) << 8) | tertiary as u32)
    }

    /// 多元素权重的后续元素（tertiary 带 continuation 标记）
    pub const fn continuation(primary: u16, secondary: u8, tertiary: u8) -> Self {
        Self(Self::new(primary, secondary, tertiary).0 | CONTINUATION_MARKER)
    }

    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn primary(self) -> u16 {
        (self.0 >> 16) as u16
    }

    pub const fn secondary(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn tertiary(self) -> u8 {
        self.0 as u8
    }

    pub fn is_ignorable(self) -> bool {
        self == Self::IGNORABLE
    }

    pub fn is_null(self) -> bool {
        self == Self::NULLORDER
    }

    pub fn is_continuation(self) -> bool {
        !self.is_null() && (self.0 & CONTINUATION_MARKER) == CONTINUATION_MARKER
    }

    pub fn masked(self, mask: u32) -> Self {
        Self(self.0 & mask)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ProcessedElement(u64);

impl ProcessedElement {
    pub const IGNORABLE: Self = Self(0);
    pub const PROCESSED_NULLORDER: Self = Self(u64::MAX);

    pub const fn from_levels(primary: u16, secondary: u16, tertiary: u16, quaternary: u16) -> Self {
        Self(
            ((primary as u64) << 48)
                | ((secondary as u64) << 32)
                | ((tertiary as u64) << 16)
                | quaternary as u64,
        )
    }

    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }

    pub const fn primary_weight(self) -> u16 {
        (self.0 >> 48) as u16
    }

    pub const fn secondary_weight(self) -> u16 {
        (self.0 >> 32) as u16
    }

    pub const fn tertiary_weight(self) -> u16 {
        (self.0 >> 16) as u16
    }

    pub const fn quaternary_weight(self) -> u16 {
        self.0 as u16
    }

    pub fn is_ignorable(self) -> bool {
        self == Self::IGNORABLE
    }

    pub fn is_null(self) -> bool {
        self == Self::PROCESSED_NULLORDER
    }
}

/// 原始 CE 及其来源区间
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionedElement {
    pub ce: CollationElement,
    pub low: usize,
    pub high: usize,
}

/// 处理后的 CE 及其来源区间。
///
/// `low == high` 表示该元素属于前一个字符的展开，
/// 或者是位于文本端点的终止元素。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cei {
    pub pce: ProcessedElement,
    pub low: usize,
    pub high: usize,
}

impl Cei {
    pub fn terminator(at: usize) -> Self {
        Self {
            pce: ProcessedElement::PROCESSED_NULLORDER,
            low: at,
            high: at,
        }
    }

    pub fn is_terminator(&self) -> bool {
        self.pce.is_null()
    }

    /// 展开的非首元素（不含终止元素）
    pub fn is_expansion_tail(&self) -> bool {
        self.low == self.high && !self.is_terminator()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/collation/element.rs"]
mod tests;
