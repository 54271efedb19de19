//! 目标文本的 CE 环形缓冲
//!
//! 按索引懒加载处理后 CE；已经取过的索引总是返回同一个条目。
//! 窗口超过容量时从最早的条目开始淘汰，读取已淘汰的条目是调用方的逻辑错误。
//! 调用方用 `pin` 标出仍在使用的最低索引，窗口需要时越过容量增长，不淘汰它之后的条目。

use std::collections::VecDeque;

use crate::collation::{Cei, Collator, ProcessedElements};

use super::matcher::ElementComparison;
use super::pattern::PatternModel;

pub const CEBUFFER_EXTRA: usize = 32;
const MAX_TARGET_IGNORABLES_PER_PAT_JAMO_L: usize = 8;
const MAX_TARGET_IGNORABLES_PER_PAT_OTHER: usize = 3;

/// 缓冲容量：pattern 的 PCE 数加固定余量；通配比较会跳过目标里的可忽略元素，需要更多历史
pub fn capacity_for(pattern: &PatternModel, comparison: ElementComparison) -> usize {
    let mut capacity = pattern.pce_len() + CEBUFFER_EXTRA;
    if comparison != ElementComparison::Standard {
        for ch in pattern.text().chars() {
            capacity += if might_be_jamo_l(ch) {
                MAX_TARGET_IGNORABLES_PER_PAT_JAMO_L
            } else {
                MAX_TARGET_IGNORABLES_PER_PAT_OTHER
            };
        }
    }
    capacity
}

fn might_be_jamo_l(ch: char) -> bool {
    matches!(ch, '\u{1100}'..='\u{115E}' | '\u{3131}'..='\u{314E}' | '\u{3165}'..='\u{3186}')
}

pub struct CeBuffer<'a, C: Collator + ?Sized> {
    source: ProcessedElements<'a, C>,
    entries: VecDeque<Cei>,
    first_ix: usize,
    capacity: usize,
    pinned: Option<usize>,
}

impl<'a, C: Collator + ?Sized> CeBuffer<'a, C> {
    pub fn new(source: ProcessedElements<'a, C>, capacity: usize) -> Self {
        Self::with_storage(source, capacity, VecDeque::new())
    }

    /// 复用调用方保存的存储，避免每次搜索重新分配
    pub fn with_storage(
        source: ProcessedElements<'a, C>,
        capacity: usize,
        mut storage: VecDeque<Cei>,
    ) -> Self {
        let capacity = capacity.max(2);
        storage.clear();
        storage.reserve(capacity);
        Self {
            source,
            entries: storage,
            first_ix: 0,
            capacity,
            pinned: None,
        }
    }

    /// 索引 `>= index` 的条目保留到下一次 `pin`
    pub fn pin(&mut self, index: usize) {
        debug_assert!(index >= self.first_ix, "pinning evicted CE buffer index {}", index);
        self.pinned = Some(index);
    }

    pub fn into_storage(self) -> VecDeque<Cei> {
        self.entries
    }

    pub fn first_index(&self) -> usize {
        self.first_ix
    }

    pub fn limit_index(&self) -> usize {
        self.first_ix + self.entries.len()
    }

    /// 从起点正向数第 `index` 个元素
    pub fn get(&mut self, index: usize) -> Cei {
        self.fill(index, true)
    }

    /// 从起点反向数第 `index` 个元素
    pub fn get_previous(&mut self, index: usize) -> Cei {
        self.fill(index, false)
    }

    fn fill(&mut self, index: usize, forward: bool) -> Cei {
        assert!(
            index >= self.first_ix,
            "CE buffer index {} already evicted (oldest kept is {})",
            index,
            self.first_ix
        );
        while self.limit_index() <= index {
            let cei = if forward {
                self.source.next_processed()
            } else {
                self.source.previous_processed()
            };
            let evictable = self.pinned.map_or(true, |pin| self.first_ix < pin);
            if self.entries.len() >= self.capacity && evictable {
                self.entries.pop_front();
                self.first_ix += 1;
            }
            self.entries.push_back(cei);
        }
        self.entries[index - self.first_ix]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/search/buffer.rs"]
mod tests;
