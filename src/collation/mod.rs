//! 排序服务
//!
//! - element: CE / PCE 编码与强度
//! - root: 参考排序引擎（RootCollator + Tailoring）
//! - processed: 带源区间的处理后 CE 迭代器（正向 / 反向）
//!
//! 搜索核心只通过 `Collator` trait 使用排序服务。

pub mod element;
pub mod processed;
pub mod root;

pub use element::{Cei, CollationElement, PositionedElement, ProcessedElement, Strength};
pub use processed::ProcessedElements;
pub use root::{root_weights, RootCollator, Tailoring};

use std::sync::Arc;

pub trait Collator {
    fn strength(&self) -> Strength;

    fn is_alternate_shifted(&self) -> bool {
        false
    }

    /// CE 空间里的 variable top；shifted 模式下 primary 低于它的元素被移到 quaternary
    fn variable_top(&self) -> u32 {
        0
    }

    /// `ch` 可能是缩约的非首字符或附着在前一个字符上，反向迭代不能从它开始
    fn is_unsafe(&self, ch: char) -> bool;

    /// 对 `offset` 处的一个排序单元（字符或缩约）排序，CE 追加到 `out`，返回单元结束位置。
    /// 不会越过 `text.len()`。
    fn collate_unit(&self, text: &str, offset: usize, out: &mut Vec<CollationElement>) -> usize;

    /// 以 `ce` 结尾的展开最多产生多少个元素
    fn max_expansion(&self, _ce: CollationElement) -> usize {
        1
    }

    /// 拆出 (primary, secondary, tertiary) 三级权重
    fn decompose(&self, ce: CollationElement) -> (u16, u8, u8) {
        (ce.primary(), ce.secondary(), ce.tertiary())
    }

    fn elements<'t>(&'t self, text: &'t str) -> Elements<'t, Self>
    where
        Self: Sized,
    {
        Elements::new(self, text)
    }
}

impl<T: Collator + ?Sized> Collator for &T {
    fn strength(&self) -> Strength {
        (**self).strength()
    }

    fn is_alternate_shifted(&self) -> bool {
        (**self).is_alternate_shifted()
    }

    fn variable_top(&self) -> u32 {
        (**self).variable_top()
    }

    fn is_unsafe(&self, ch: char) -> bool {
        (**self).is_unsafe(ch)
    }

    fn collate_unit(&self, text: &str, offset: usize, out: &mut Vec<CollationElement>) -> usize {
        (**self).collate_unit(text, offset, out)
    }

    fn max_expansion(&self, ce: CollationElement) -> usize {
        (**self).max_expansion(ce)
    }

    fn decompose(&self, ce: CollationElement) -> (u16, u8, u8) {
        (**self).decompose(ce)
    }
}

impl<T: Collator + ?Sized> Collator for Arc<T> {
    fn strength(&self) -> Strength {
        (**self).strength()
    }

    fn is_alternate_shifted(&self) -> bool {
        (**self).is_alternate_shifted()
    }

    fn variable_top(&self) -> u32 {
        (**self).variable_top()
    }

    fn is_unsafe(&self, ch: char) -> bool {
        (**self).is_unsafe(ch)
    }

    fn collate_unit(&self, text: &str, offset: usize, out: &mut Vec<CollationElement>) -> usize {
        (**self).collate_unit(text, offset, out)
    }

    fn max_expansion(&self, ce: CollationElement) -> usize {
        (**self).max_expansion(ce)
    }

    fn decompose(&self, ce: CollationElement) -> (u16, u8, u8) {
        (**self).decompose(ce)
    }
}

/// 原始 CE 流。展开的首元素覆盖整个单元，其余元素 `low == high == 单元结束`。
pub struct Elements<'t, C: Collator + ?Sized> {
    collator: &'t C,
    text: &'t str,
    offset: usize,
    unit: Vec<CollationElement>,
    next_in_unit: usize,
    unit_start: usize,
}

impl<'t, C: Collator + ?Sized> Elements<'t, C> {
    pub fn new(collator: &'t C, text: &'t str) -> Self {
        Self {
            collator,
            text,
            offset: 0,
            unit: Vec::new(),
            next_in_unit: 0,
            unit_start: 0,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl<C: Collator + ?Sized> Iterator for Elements<'_, C> {
    type Item = PositionedElement;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next_in_unit >= self.unit.len() {
            if self.offset >= self.text.len() {
                return None;
            }
            self.unit.clear();
            self.next_in_unit = 0;
            self.unit_start = self.offset;
            let end = self.collator.collate_unit(self.text, self.offset, &mut self.unit);
            assert!(end > self.offset, "collation unit must advance");
            self.offset = end;
        }

        let ix = self.next_in_unit;
        self.next_in_unit += 1;
        let low = if ix == 0 { self.unit_start } else { self.offset };
        Some(PositionedElement {
            ce: self.unit[ix],
            low,
            high: self.offset,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/collation/collator.rs"]
mod tests;
