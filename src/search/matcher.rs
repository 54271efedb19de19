//! 线性 CE 匹配
//!
//! 正向 `search` 在目标的 CE 空间里逐个起点尝试，CE 序列相等后再把匹配区间
//! 映射回文本并检查边界：
//! - 起点必须是断点，且不能落在展开的中间
//! - 终点推进到下一个断点后不能越过匹配后面那个 CE
//! - 强度为 identical 时再比较 NFD
//!
//! 反向 `search_backwards` 是镜像。规范等价模式下，因重音簇导致的失败交给 `accent` 重排重试。

use std::borrow::Cow;

use crate::collation::{Cei, Collator, ProcessedElement, ProcessedElements, Strength};
use crate::text::{BreakService, GraphemeBreaks, Normalization};

use super::accent::{self, AccentScratch};
use super::buffer::{capacity_for, CeBuffer};
use super::pattern::PatternModel;

const LEVEL2_BASE: u16 = 0x0005;
const LEVEL3_BASE: u16 = 0x0005;

/// CE 比较方式。会话始终使用 `Standard`，通配比较只通过 `SearchContext` 直接使用。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ElementComparison {
    #[default]
    Standard,
    /// pattern 里的基础权重（secondary / tertiary 为 common）匹配目标里的任意权重
    PatternBaseWeightIsWildcard,
    /// 两边的基础权重都当作通配
    AnyBaseWeightIsWildcard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CeMatch {
    Match,
    NoMatch,
    /// 目标元素是多出来的可忽略元素，同一个 pattern 元素和下一个目标元素重比
    SkipTarget,
    /// pattern 元素可以跳过，同一个目标元素和下一个 pattern 元素重比
    SkipPattern,
}

pub fn compare_ce64s(
    target: ProcessedElement,
    pattern: ProcessedElement,
    comparison: ElementComparison,
) -> CeMatch {
    if target == pattern {
        return CeMatch::Match;
    }
    if comparison == ElementComparison::Standard {
        return CeMatch::NoMatch;
    }
    let any_wildcard = comparison == ElementComparison::AnyBaseWeightIsWildcard;

    let target_p = target.primary_weight();
    let pattern_p = pattern.primary_weight();
    if target_p != pattern_p {
        if target_p == 0 {
            return CeMatch::SkipTarget;
        }
        if pattern_p == 0 && any_wildcard {
            return CeMatch::SkipPattern;
        }
        return CeMatch::NoMatch;
    }

    let target_s = target.secondary_weight();
    let pattern_s = pattern.secondary_weight();
    if target_s != pattern_s {
        if target_s == 0 {
            return CeMatch::SkipTarget;
        }
        if pattern_s == 0 && any_wildcard {
            return CeMatch::SkipPattern;
        }
        return if pattern_s == LEVEL2_BASE || (any_wildcard && target_s == LEVEL2_BASE) {
            CeMatch::Match
        } else {
            CeMatch::NoMatch
        };
    }

    let target_t = target.tertiary_weight();
    let pattern_t = pattern.tertiary_weight();
    if target_t != pattern_t {
        return if pattern_t == LEVEL3_BASE || (any_wildcard && target_t == LEVEL3_BASE) {
            CeMatch::Match
        } else {
            CeMatch::NoMatch
        };
    }

    CeMatch::Match
}

/// 文本里的匹配区间 `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

impl MatchSpan {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// 一次搜索调用借用的只读状态
pub struct SearchContext<'a, C: Collator + ?Sized> {
    pub collator: &'a C,
    pub normalizer: &'a dyn Normalization,
    /// 用户断点服务；为空时用内部的字素断点
    pub breaks: Option<&'a dyn BreakService>,
    pub text: &'a str,
    pub pattern: &'a PatternModel,
    pub canonical: bool,
    pub comparison: ElementComparison,
}

impl<C: Collator + ?Sized> SearchContext<'_, C> {
    pub fn is_break_boundary(&self, offset: usize) -> bool {
        match self.breaks {
            Some(breaks) => breaks.is_boundary(self.text, offset),
            None => GraphemeBreaks.is_boundary(self.text, offset),
        }
    }

    pub fn next_boundary_after(&self, offset: usize) -> usize {
        match self.breaks {
            Some(breaks) => breaks.following(self.text, offset),
            None => GraphemeBreaks.following(self.text, offset),
        }
    }

    pub fn check_identical(&self, start: usize, end: usize) -> bool {
        if self.collator.strength() != Strength::Identical {
            return true;
        }
        let matched = self.nfd(&self.text[start..end]);
        let pattern = self.nfd(self.pattern.text());
        matched == pattern
    }

    fn nfd<'s>(&self, s: &'s str) -> Cow<'s, str> {
        if self.normalizer.is_nfd(s) {
            Cow::Borrowed(s)
        } else {
            Cow::Owned(self.normalizer.decompose_nfd(s))
        }
    }

    /// 失败元素对应的字符位置；展开的后续元素算作前一个字符
    fn failure_char(&self, cei: Cei) -> Option<usize> {
        if cei.is_terminator() {
            return None;
        }
        if cei.low < cei.high {
            return Some(cei.low);
        }
        self.text[..cei.low]
            .char_indices()
            .next_back()
            .map(|(ix, _)| ix)
    }
}

/// 会话持有、跨调用复用的缓冲区
#[derive(Debug, Default)]
pub struct Scratch {
    pub ceb: std::collections::VecDeque<Cei>,
    pub accents: AccentScratch,
}

/// 从 `start` 开始正向找第一个匹配
pub fn search<C: Collator + ?Sized>(
    ctx: &SearchContext<'_, C>,
    start: usize,
    scratch: &mut Scratch,
) -> Option<MatchSpan> {
    let pattern = ctx.pattern;
    assert!(!pattern.is_empty(), "search called with an empty pattern");
    assert!(start <= ctx.text.len(), "search start {} out of range", start);

    let pces = pattern.pces();
    let pce_len = pces.len() as isize;
    let source = ProcessedElements::new_at(ctx.collator, ctx.text, start);
    let storage = std::mem::take(&mut scratch.ceb);
    let mut ceb = CeBuffer::with_storage(source, capacity_for(pattern, ctx.comparison), storage);

    let mut result = None;
    let mut target_ix = 0usize;
    loop {
        // 匹配后面的可忽略元素可能很多，窗口不能淘汰当前起点
        ceb.pin(target_ix);
        let first = ceb.get(target_ix);
        let mut found = true;
        let mut offset: isize = 0;
        let mut pat_ix: isize = 0;
        let mut target_cei = first;
        let mut pat_ce = pces[0];

        while pat_ix < pce_len {
            pat_ce = pces[pat_ix as usize];
            target_cei = ceb.get((target_ix as isize + pat_ix + offset) as usize);
            match compare_ce64s(target_cei.pce, pat_ce, ctx.comparison) {
                CeMatch::Match => pat_ix += 1,
                CeMatch::NoMatch => {
                    found = false;
                    break;
                }
                CeMatch::SkipTarget => offset += 1,
                CeMatch::SkipPattern => {
                    offset -= 1;
                    pat_ix += 1;
                }
            }
        }
        offset += pce_len;

        if !found {
            if ctx.canonical
                && !first.is_expansion_tail()
                && (pat_ix > 0 || pattern.has_prefix_accents())
            {
                if let Some(failure) = ctx.failure_char(target_cei) {
                    let rescued = accent::resolve_forward(
                        ctx,
                        first.low,
                        failure,
                        start,
                        &mut scratch.accents,
                    );
                    if rescued.is_some() {
                        result = rescued;
                        break;
                    }
                }
            }
            if target_cei.is_terminator() {
                break;
            }
            target_ix += 1;
            continue;
        }

        let match_end_ix = (target_ix as isize + offset) as usize;
        let last = ceb.get(match_end_ix - 1);
        let m_start = first.low;
        let min_limit = last.low;

        let mut next_ix = match_end_ix;
        let mut next = ceb.get(next_ix);
        let mut max_limit = next.low;
        if ctx.comparison == ElementComparison::Standard {
            if next.is_expansion_tail() {
                found = false;
            }
        } else {
            loop {
                next = ceb.get(next_ix);
                max_limit = next.low;
                if next.is_terminator() {
                    break;
                }
                if next.pce.primary_weight() == 0 {
                    let cmp = compare_ce64s(next.pce, pat_ce, ctx.comparison);
                    if matches!(cmp, CeMatch::NoMatch | CeMatch::SkipPattern) {
                        found = false;
                        break;
                    }
                } else if next.low == next.high {
                    found = false;
                    break;
                } else {
                    break;
                }
                next_ix += 1;
            }
        }

        let mut start_ok = true;
        if !ctx.is_break_boundary(m_start) {
            start_ok = false;
        }
        // 首元素是展开的后续部分，说明第一个字符只匹配了一半
        if m_start == first.high {
            start_ok = false;
        }
        found &= start_ok;

        let mut m_limit = max_limit;
        if min_limit < max_limit {
            if min_limit == last.high && ctx.is_break_boundary(min_limit) {
                m_limit = min_limit;
            } else {
                let nba = ctx.next_boundary_after(min_limit);
                if nba >= last.high {
                    m_limit = nba;
                }
            }
        }
        if m_limit > max_limit {
            found = false;
        }
        if !ctx.is_break_boundary(m_limit) {
            found = false;
        }
        if found && !ctx.check_identical(m_start, m_limit) {
            found = false;
        }

        if found {
            tracing::trace!(start = m_start, end = m_limit, "forward match");
            result = Some(MatchSpan {
                start: m_start,
                end: m_limit,
            });
            break;
        }
        tracing::trace!(start = m_start, end = m_limit, "forward candidate rejected");

        if ctx.canonical {
            let failed_at = if start_ok { last } else { first };
            if let Some(failure) = ctx.failure_char(failed_at) {
                let rescued =
                    accent::resolve_forward(ctx, m_start, failure, start, &mut scratch.accents);
                if rescued.is_some() {
                    result = rescued;
                    break;
                }
            }
        }
        target_ix += 1;
    }

    scratch.ceb = ceb.into_storage();
    result
}

/// 找结束位置不超过 `start` 的最后一个匹配
pub fn search_backwards<C: Collator + ?Sized>(
    ctx: &SearchContext<'_, C>,
    start: usize,
    scratch: &mut Scratch,
) -> Option<MatchSpan> {
    let pattern = ctx.pattern;
    assert!(!pattern.is_empty(), "search_backwards called with an empty pattern");
    assert!(start <= ctx.text.len(), "search start {} out of range", start);

    let pces = pattern.pces();
    let pce_len = pces.len();
    let capacity = capacity_for(pattern, ctx.comparison);
    let storage = std::mem::take(&mut scratch.ceb);

    // 先载入起点所在字素之后的 CE，保证能看到匹配后面的那个元素
    let mut target_ix = 0usize;
    let mut ceb = if start < ctx.text.len() {
        let next = GraphemeBreaks.following(ctx.text, start);
        let source = ProcessedElements::new_at(ctx.collator, ctx.text, next);
        let mut ceb = CeBuffer::with_storage(source, capacity, storage);
        ceb.pin(0);
        loop {
            let cei = ceb.get_previous(target_ix);
            // 结束于起点的展开尾元素也属于起点之前
            if cei.low < start || cei.high <= start || cei.is_terminator() {
                break;
            }
            target_ix += 1;
        }
        ceb
    } else {
        let source = ProcessedElements::new_at(ctx.collator, ctx.text, start);
        CeBuffer::with_storage(source, capacity, storage)
    };

    let mut result = None;
    loop {
        ceb.pin(target_ix.saturating_sub(1));
        let last = ceb.get_previous(target_ix);
        let mut found = true;
        let mut offset: isize = 0;
        let mut pat_ix = pce_len as isize - 1;
        let mut target_cei = last;

        while pat_ix >= 0 {
            let pat_ce = pces[pat_ix as usize];
            let ix = target_ix as isize + (pce_len as isize - 1 - pat_ix) + offset;
            target_cei = ceb.get_previous(ix as usize);
            match compare_ce64s(target_cei.pce, pat_ce, ctx.comparison) {
                CeMatch::Match => pat_ix -= 1,
                CeMatch::NoMatch => {
                    found = false;
                    break;
                }
                CeMatch::SkipTarget => offset += 1,
                CeMatch::SkipPattern => {
                    offset -= 1;
                    pat_ix -= 1;
                }
            }
        }

        if !found {
            if ctx.canonical
                && !last.is_terminator()
                && (pat_ix < pce_len as isize - 1 || pattern.has_suffix_accents())
            {
                if let Some(failure) = ctx.failure_char(target_cei) {
                    let rescued = accent::resolve_backward(
                        ctx,
                        last.high,
                        failure,
                        start,
                        &mut scratch.accents,
                    );
                    if rescued.is_some() {
                        result = rescued;
                        break;
                    }
                }
            }
            if target_cei.is_terminator() {
                break;
            }
            target_ix += 1;
            continue;
        }

        let first_ix = target_ix as isize + pce_len as isize - 1 + offset;
        let first = ceb.get_previous(first_ix as usize);
        let m_start = first.low;

        let mut start_ok = true;
        if !ctx.is_break_boundary(m_start) {
            start_ok = false;
        }
        if m_start == first.high {
            start_ok = false;
        }
        found &= start_ok;

        let min_limit = last.low;
        let m_limit;
        if target_ix > 0 {
            let next = ceb.get_previous(target_ix - 1);
            if next.is_expansion_tail() {
                found = false;
            }
            let max_limit = next.low;
            let mut limit = max_limit;
            if min_limit < max_limit {
                let nba = ctx.next_boundary_after(min_limit);
                if nba >= last.high {
                    limit = nba;
                }
            }
            if limit > max_limit {
                found = false;
            }
            if !ctx.is_break_boundary(limit) {
                found = false;
            }
            m_limit = limit;
        } else {
            // 起点之后没有非可忽略 CE；跨过起点的组合序列被截断
            let nba = ctx.next_boundary_after(min_limit);
            m_limit = if nba > 0 && start > nba { nba } else { start };
        }

        if found && !ctx.check_identical(m_start, m_limit) {
            found = false;
        }

        if found {
            tracing::trace!(start = m_start, end = m_limit, "backward match");
            result = Some(MatchSpan {
                start: m_start,
                end: m_limit,
            });
            break;
        }
        tracing::trace!(start = m_start, end = m_limit, "backward candidate rejected");

        if ctx.canonical {
            let failed_at = if start_ok { last } else { first };
            if let Some(failure) = ctx.failure_char(failed_at) {
                let rescued =
                    accent::resolve_backward(ctx, last.high, failure, start, &mut scratch.accents);
                if rescued.is_some() {
                    result = rescued;
                    break;
                }
            }
        }
        target_ix += 1;
    }

    scratch.ceb = ceb.into_storage();
    result
}

#[cfg(test)]
#[path = "../../tests/unit/search/matcher.rs"]
mod tests;
