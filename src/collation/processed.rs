//! 处理后 CE 迭代器
//!
//! 把原始 CE 按强度 / alternate 设置折叠成 64 位 PCE，并跳过可忽略元素。
//! 反向迭代时先退到一个 safe 位置，再正向排序这一段，最后倒序吐出，
//! 因此正反两个方向看到的区间完全一致。

use super::element::{Cei, CollationElement, PositionedElement, ProcessedElement, Strength};
use super::Collator;

pub struct ProcessedElements<'a, C: Collator + ?Sized> {
    collator: &'a C,
    text: &'a str,
    offset: usize,
    strength: Strength,
    to_shift: bool,
    variable_top: u32,
    is_shifted: bool,
    unit: Vec<CollationElement>,
    forward: Vec<PositionedElement>,
    forward_next: usize,
    backward: Vec<Cei>,
}

impl<'a, C: Collator + ?Sized> ProcessedElements<'a, C> {
    pub fn new(collator: &'a C, text: &'a str) -> Self {
        Self::new_at(collator, text, 0)
    }

    pub fn new_at(collator: &'a C, text: &'a str, offset: usize) -> Self {
        debug_assert!(text.is_char_boundary(offset));
        Self {
            collator,
            text,
            offset,
            strength: collator.strength(),
            to_shift: collator.is_alternate_shifted(),
            variable_top: collator.variable_top(),
            is_shifted: false,
            unit: Vec::with_capacity(4),
            forward: Vec::with_capacity(4),
            forward_next: 0,
            backward: Vec::new(),
        }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    /// 下一次正向迭代开始处；反向迭代时是尚未吐出部分的结尾
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn set_offset(&mut self, offset: usize) {
        debug_assert!(self.text.is_char_boundary(offset));
        self.offset = offset;
        self.is_shifted = false;
        self.forward.clear();
        self.forward_next = 0;
        self.backward.clear();
    }

    pub fn next_processed(&mut self) -> Cei {
        loop {
            let Some(el) = self.next_raw() else {
                return Cei::terminator(self.text.len());
            };
            if el.ce.is_ignorable() {
                continue;
            }
            let pce = self.process(el.ce);
            if !pce.is_ignorable() {
                return Cei {
                    pce,
                    low: el.low,
                    high: el.high,
                };
            }
        }
    }

    pub fn previous_processed(&mut self) -> Cei {
        loop {
            if let Some(cei) = self.backward.pop() {
                return cei;
            }
            if self.offset == 0 {
                return Cei::terminator(0);
            }
            self.fill_backward();
        }
    }

    /// 把 CE 按当前设置折叠成 PCE。shifted 状态会延续到紧随其后的 primary 可忽略元素。
    /// 完全可忽略的 CE 在调用前已被跳过。
    pub fn process(&mut self, ce: CollationElement) -> ProcessedElement {
        let mut primary = ce.primary();
        let mut secondary = match self.strength {
            Strength::Primary => 0,
            _ => ce.secondary() as u16,
        };
        let mut tertiary = match self.strength {
            Strength::Primary | Strength::Secondary => 0,
            _ => ce.tertiary() as u16,
        };
        let mut quaternary = 0u16;

        if (self.to_shift && self.variable_top > ce.raw() && primary != 0)
            || (self.is_shifted && primary == 0)
        {
            if primary == 0 {
                return ProcessedElement::IGNORABLE;
            }
            if self.strength >= Strength::Quaternary {
                quaternary = primary;
            }
            primary = 0;
            secondary = 0;
            tertiary = 0;
            self.is_shifted = true;
        } else {
            if self.strength >= Strength::Quaternary {
                quaternary = 0xFFFF;
            }
            self.is_shifted = false;
        }

        ProcessedElement::from_levels(primary, secondary, tertiary, quaternary)
    }

    fn next_raw(&mut self) -> Option<PositionedElement> {
        while self.forward_next >= self.forward.len() {
            if self.offset >= self.text.len() {
                return None;
            }
            let start = self.offset;
            let end = self.collate_unit_into_forward(self.text, start);
            self.offset = end;
        }
        let el = self.forward[self.forward_next];
        self.forward_next += 1;
        Some(el)
    }

    fn collate_unit_into_forward(&mut self, text: &str, start: usize) -> usize {
        self.unit.clear();
        self.forward.clear();
        self.forward_next = 0;
        let end = self.collator.collate_unit(text, start, &mut self.unit);
        assert!(end > start, "collation unit at {} did not advance", start);
        for (ix, ce) in self.unit.iter().enumerate() {
            let low = if ix == 0 { start } else { end };
            self.forward.push(PositionedElement { ce: *ce, low, high: end });
        }
        end
    }

    fn fill_backward(&mut self) {
        let end = self.offset;
        let start = self.safe_offset_before(end);
        let text = self.text;
        let window = &text[..end];

        let mut segment = Vec::new();
        let mut pos = start;
        while pos < end {
            self.unit.clear();
            let unit_end = self.collator.collate_unit(window, pos, &mut self.unit);
            assert!(unit_end > pos, "collation unit at {} did not advance", pos);
            for (ix, ce) in self.unit.iter().enumerate() {
                let low = if ix == 0 { pos } else { unit_end };
                segment.push(PositionedElement {
                    ce: *ce,
                    low,
                    high: unit_end,
                });
            }
            pos = unit_end;
        }

        self.is_shifted = false;
        for el in segment {
            if el.ce.is_ignorable() {
                continue;
            }
            let pce = self.process(el.ce);
            if !pce.is_ignorable() {
                self.backward.push(Cei {
                    pce,
                    low: el.low,
                    high: el.high,
                });
            }
        }
        // 栈顶是文本里最靠后的元素
        self.offset = start;
    }

    fn safe_offset_before(&self, end: usize) -> usize {
        let mut start = end;
        for (ix, ch) in self.text[..end].char_indices().rev() {
            start = ix;
            if !self.collator.is_unsafe(ch) {
                break;
            }
        }
        start
    }
}

/// 文本的全部 PCE（不含终止元素）
pub fn processed_elements<C: Collator + ?Sized>(collator: &C, text: &str) -> Vec<Cei> {
    let mut iter = ProcessedElements::new(collator, text);
    let mut out = Vec::new();
    loop {
        let cei = iter.next_processed();
        if cei.is_terminator() {
            break;
        }
        out.push(cei);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/collation/processed.rs"]
mod tests;
