//! 规范等价重音重排
//!
//! 普通 CE 比较因为边界上的一串组合符失败时调用：
//! 1. 找到失败位置所在的重音簇（最多带一个预组合的基字符）
//! 2. 簇做 NFD，按组合类切成若干组；不同组之间可以自由交换
//! 3. 从"全部组"开始，依次尝试各个组子集拼成的候选串
//! 4. 候选串匹配时报告整个簇的区间
//!
//! 正向要求 pattern 是候选序列的前缀（锚定在匹配起点），反向要求是后缀（锚定在匹配终点）。
//! 正向起点上的簇没有基字符时，pattern 可以从簇内任意元素开始，和反向忽略簇内前导元素对应。
//! 第一次全组尝试若在簇外的另一个重音簇失败，再把两个簇组合起来重试一次。

use std::ops::Range;

use crate::collation::{Cei, Collator, ProcessedElements};
use crate::text::Normalization;

use super::matcher::{MatchSpan, SearchContext};

/// 参与重排的组合类分组总数上限
pub const MAX_ACCENT_GROUPS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccentCluster {
    pub start: usize,
    pub end: usize,
}

/// 候选串到原文的映射段
#[derive(Debug, Clone)]
struct Segment {
    candidate: Range<usize>,
    text: Range<usize>,
    rearranged: bool,
}

/// 映射回原文区间的候选元素
#[derive(Debug, Clone, Copy)]
struct Located {
    cei: Cei,
    rearranged: bool,
}

#[derive(Debug, Clone)]
struct Layout {
    cluster: AccentCluster,
    nfd: Range<usize>,
    base_end: usize,
    groups: Range<usize>,
}

impl Layout {
    fn has_base(&self) -> bool {
        self.base_end > self.nfd.start
    }

    /// 组子集，从全集往下；有基字符时最后也试只保留基字符
    fn masks(&self) -> std::iter::Rev<std::ops::RangeInclusive<u32>> {
        let top = (1u32 << self.groups.len()) - 1;
        let bottom = if self.has_base() { 0 } else { 1 };
        (bottom..=top).rev()
    }
}

/// 会话持有的重排缓冲区
#[derive(Debug, Default)]
pub struct AccentScratch {
    nfd: String,
    groups: Vec<Range<usize>>,
    candidate: String,
    segments: Vec<Segment>,
    elements: Vec<Located>,
}

impl AccentScratch {
    fn clear(&mut self) {
        self.nfd.clear();
        self.groups.clear();
        self.candidate.clear();
        self.segments.clear();
        self.elements.clear();
    }
}

enum Outcome {
    Resolved(MatchSpan),
    /// 全组候选在簇外的这个位置失败
    Escalate(usize),
    Exhausted,
}

/// `offset` 处字符所在的重音簇。向前吸收组合符和一个带尾随重音的预组合字符，向后吸收组合符。
pub fn cluster_at(
    text: &str,
    offset: usize,
    normalizer: &dyn Normalization,
) -> Option<AccentCluster> {
    let ch = text.get(offset..)?.chars().next()?;
    let fcd = normalizer.fcd(ch);
    if fcd.is_base() {
        return None;
    }

    let mut start = offset;
    if fcd.lead != 0 {
        for (ix, prev) in text[..offset].char_indices().rev() {
            let prev_fcd = normalizer.fcd(prev);
            if prev_fcd.lead != 0 {
                start = ix;
                continue;
            }
            if prev_fcd.trail != 0 {
                start = ix;
            }
            break;
        }
    }

    let mut end = offset + ch.len_utf8();
    for next in text[end..].chars() {
        if normalizer.fcd(next).lead == 0 {
            break;
        }
        end += next.len_utf8();
    }

    Some(AccentCluster { start, end })
}

/// NFD 后按组合类切分；组合类相同的相邻重音互相阻塞，归为一组
fn layout(
    text: &str,
    cluster: AccentCluster,
    normalizer: &dyn Normalization,
    scratch: &mut AccentScratch,
) -> Option<Layout> {
    let nfd_start = scratch.nfd.len();
    normalizer.append_nfd(&text[cluster.start..cluster.end], &mut scratch.nfd);
    let nfd_end = scratch.nfd.len();

    let groups_start = scratch.groups.len();
    let mut class = 0u8;
    let mut base_end = nfd_start;
    for (ix, ch) in scratch.nfd[nfd_start..nfd_end].char_indices() {
        let at = nfd_start + ix;
        let cc = normalizer.combining_class(ch);
        if cc != class {
            class = cc;
            if scratch.groups.len() > groups_start {
                if let Some(last) = scratch.groups.last_mut() {
                    last.end = at;
                }
            }
            scratch.groups.push(at..nfd_end);
        }
        if scratch.groups.len() == groups_start {
            base_end = at + ch.len_utf8();
        }
    }

    if scratch.groups.len() > MAX_ACCENT_GROUPS {
        tracing::debug!(
            groups = scratch.groups.len(),
            "accent cluster too large to rearrange"
        );
        return None;
    }

    Some(Layout {
        cluster,
        nfd: nfd_start..nfd_end,
        base_end,
        groups: groups_start..scratch.groups.len(),
    })
}

/// 候选串：`[from, to)` 里的簇换成选中的组，其余原样保留
fn build_candidate(
    text: &str,
    from: usize,
    to: usize,
    layouts: &[Layout],
    masks: &[u32],
    scratch: &mut AccentScratch,
) {
    scratch.candidate.clear();
    scratch.segments.clear();

    let mut pos = from;
    for (layout, &mask) in layouts.iter().zip(masks) {
        let cluster = layout.cluster;
        if cluster.start > pos {
            push_verbatim(text, pos..cluster.start, scratch);
        }
        let start = scratch.candidate.len();
        scratch
            .candidate
            .push_str(&scratch.nfd[layout.nfd.start..layout.base_end]);
        for (bit, group) in scratch.groups[layout.groups.clone()].iter().enumerate() {
            if mask & (1 << bit) != 0 {
                scratch.candidate.push_str(&scratch.nfd[group.clone()]);
            }
        }
        scratch.segments.push(Segment {
            candidate: start..scratch.candidate.len(),
            text: cluster.start..cluster.end,
            rearranged: true,
        });
        pos = pos.max(cluster.end);
    }
    if to > pos {
        push_verbatim(text, pos..to, scratch);
    }
}

fn push_verbatim(text: &str, range: Range<usize>, scratch: &mut AccentScratch) {
    let start = scratch.candidate.len();
    scratch.candidate.push_str(&text[range.clone()]);
    scratch.segments.push(Segment {
        candidate: start..scratch.candidate.len(),
        text: range,
        rearranged: false,
    });
}

fn locate(segments: &[Segment], cei: Cei) -> Located {
    // 元素归属于包含其结束位置的段
    let segment = segments
        .iter()
        .find(|s| s.candidate.start < cei.high && cei.high <= s.candidate.end);
    match segment {
        Some(s) if s.rearranged => Located {
            cei: Cei {
                pce: cei.pce,
                low: s.text.start,
                high: s.text.end,
            },
            rearranged: true,
        },
        Some(s) => {
            let high = s.text.start + (cei.high - s.candidate.start);
            let low = s.text.start + cei.low.saturating_sub(s.candidate.start);
            Located {
                cei: Cei {
                    pce: cei.pce,
                    low: low.min(high),
                    high,
                },
                rearranged: false,
            }
        }
        None => {
            debug_assert!(false, "candidate element {:?} outside every segment", cei);
            Located {
                cei,
                rearranged: false,
            }
        }
    }
}

fn collect_candidate<C: Collator + ?Sized>(collator: &C, scratch: &mut AccentScratch) {
    scratch.elements.clear();
    let mut iter = ProcessedElements::new(collator, &scratch.candidate);
    loop {
        let cei = iter.next_processed();
        if cei.is_terminator() {
            break;
        }
        scratch.elements.push(locate(&scratch.segments, cei));
    }
}

fn arrangements(layouts: &[Layout]) -> Vec<[u32; 2]> {
    let second: Vec<u32> = match layouts.get(1) {
        Some(layout) => layout.masks().collect(),
        None => vec![0],
    };
    let mut out = Vec::new();
    for first in layouts[0].masks() {
        for &mask in &second {
            out.push([first, mask]);
        }
    }
    out
}

fn accept<C: Collator + ?Sized>(
    ctx: &SearchContext<'_, C>,
    span: MatchSpan,
    from: usize,
    limit: usize,
) -> bool {
    span.start < span.end
        && span.start >= from
        && span.end <= limit
        && ctx.is_break_boundary(span.start)
        && ctx.is_break_boundary(span.end)
        && ctx.check_identical(span.start, span.end)
}

fn mismatch_offset(text: &str, located: Option<&Located>) -> Option<usize> {
    let located = located?;
    if located.rearranged || located.cei.is_terminator() {
        return None;
    }
    if located.cei.low < located.cei.high {
        return Some(located.cei.low);
    }
    text[..located.cei.low]
        .char_indices()
        .next_back()
        .map(|(ix, _)| ix)
}

fn try_forward<C: Collator + ?Sized>(
    ctx: &SearchContext<'_, C>,
    anchor: usize,
    from: usize,
    layouts: &[Layout],
    scratch: &mut AccentScratch,
) -> Outcome {
    let pces = ctx.pattern.canonical_pces();
    let n = pces.len();
    let to = layouts.iter().map(|l| l.cluster.end).max().unwrap_or(anchor);
    // 起点上的纯重音簇整体并入匹配，pattern 可以从簇内任意元素开始
    let floating = !layouts[0].has_base() && layouts[0].cluster.start == anchor;
    let mut escalate = None;

    for (attempt, masks) in arrangements(layouts).into_iter().enumerate() {
        build_candidate(ctx.text, anchor, to, layouts, &masks[..layouts.len()], scratch);
        collect_candidate(ctx.collator, scratch);
        tracing::trace!(masks = ?&masks[..layouts.len()], candidate = %scratch.candidate, "forward accent arrangement");

        let max_skip = if floating {
            let first = layouts[0].cluster.start;
            scratch
                .elements
                .iter()
                .take_while(|el| el.rearranged && el.cei.low == first)
                .count()
                .saturating_sub(1)
        } else {
            0
        };

        let mut tail = ProcessedElements::new_at(ctx.collator, ctx.text, to);
        while scratch.elements.len() <= n + max_skip {
            let cei = tail.next_processed();
            scratch.elements.push(Located {
                cei,
                rearranged: false,
            });
            if cei.is_terminator() {
                break;
            }
        }

        for skip in 0..=max_skip {
            let mismatch = (0..n).find(|&k| {
                scratch
                    .elements
                    .get(skip + k)
                    .map_or(true, |el| el.cei.is_terminator() || el.cei.pce != pces[k])
            });
            if let Some(k) = mismatch {
                if attempt == 0 && skip == 0 {
                    escalate = mismatch_offset(ctx.text, scratch.elements.get(k))
                        .filter(|&at| at >= to);
                }
                continue;
            }

            let last = scratch.elements[skip + n - 1];
            if let Some(next) = scratch.elements.get(skip + n) {
                if !next.rearranged && next.cei.is_expansion_tail() {
                    continue;
                }
            }
            let span = MatchSpan {
                start: anchor,
                end: last.cei.high,
            };
            if accept(ctx, span, from, ctx.text.len()) {
                return Outcome::Resolved(span);
            }
        }
    }

    match escalate {
        Some(at) if layouts.len() == 1 => Outcome::Escalate(at),
        _ => Outcome::Exhausted,
    }
}

fn try_backward<C: Collator + ?Sized>(
    ctx: &SearchContext<'_, C>,
    anchor: usize,
    limit: usize,
    layouts: &[Layout],
    scratch: &mut AccentScratch,
) -> Outcome {
    let pces = ctx.pattern.canonical_pces();
    let n = pces.len();
    let from = layouts[0].cluster.start;
    let mut escalate = None;

    for (attempt, masks) in arrangements(layouts).into_iter().enumerate() {
        build_candidate(ctx.text, from, anchor, layouts, &masks[..layouts.len()], scratch);
        collect_candidate(ctx.collator, scratch);
        tracing::trace!(masks = ?&masks[..layouts.len()], candidate = %scratch.candidate, "backward accent arrangement");

        // 倒序：候选串从尾到头，然后是簇前面的原文
        scratch.elements.reverse();
        let mut head = ProcessedElements::new_at(ctx.collator, ctx.text, from);
        while scratch.elements.len() <= n {
            let cei = head.previous_processed();
            scratch.elements.push(Located {
                cei,
                rearranged: false,
            });
            if cei.is_terminator() {
                break;
            }
        }

        let mismatch = (0..n).find(|&k| {
            scratch
                .elements
                .get(k)
                .map_or(true, |el| el.cei.is_terminator() || el.cei.pce != pces[n - 1 - k])
        });
        if let Some(k) = mismatch {
            if attempt == 0 {
                escalate = mismatch_offset(ctx.text, scratch.elements.get(k))
                    .filter(|&at| at < from);
            }
            continue;
        }

        let first = scratch.elements[n - 1];
        if !first.rearranged && first.cei.is_expansion_tail() {
            continue;
        }
        let span = MatchSpan {
            start: first.cei.low,
            end: anchor,
        };
        if accept(ctx, span, 0, limit) {
            return Outcome::Resolved(span);
        }
    }

    match escalate {
        Some(at) if layouts.len() == 1 => Outcome::Escalate(at),
        _ => Outcome::Exhausted,
    }
}

/// 正向重排。`start` 是 CE 匹配的起点，`failure` 是失败字符的位置，结果不早于 `from`。
pub fn resolve_forward<C: Collator + ?Sized>(
    ctx: &SearchContext<'_, C>,
    start: usize,
    failure: usize,
    from: usize,
    scratch: &mut AccentScratch,
) -> Option<MatchSpan> {
    if ctx.pattern.canonical_pces().is_empty() {
        return None;
    }
    let cluster = cluster_at(ctx.text, failure, ctx.normalizer)?;
    scratch.clear();
    let first = layout(ctx.text, cluster, ctx.normalizer, scratch)?;

    // 起点之前的簇只有纯重音时才能并入匹配
    let anchor = if cluster.start < start {
        if first.has_base() {
            return None;
        }
        cluster.start
    } else {
        start
    };
    if anchor < from {
        return None;
    }

    let mut layouts = vec![first];
    let outcome = match try_forward(ctx, anchor, from, &layouts, scratch) {
        Outcome::Escalate(at) => {
            let next = cluster_at(ctx.text, at, ctx.normalizer)?;
            if next.start < cluster.end {
                return None;
            }
            layouts.push(layout(ctx.text, next, ctx.normalizer, scratch)?);
            try_forward(ctx, anchor, from, &layouts, scratch)
        }
        outcome => outcome,
    };

    match outcome {
        Outcome::Resolved(span) => {
            tracing::debug!(
                start = span.start,
                end = span.end,
                clusters = layouts.len(),
                "canonical accent rearrangement matched forward"
            );
            Some(span)
        }
        _ => None,
    }
}

/// 反向重排。`end` 是 CE 匹配的终点，结果不晚于 `limit`。
pub fn resolve_backward<C: Collator + ?Sized>(
    ctx: &SearchContext<'_, C>,
    end: usize,
    failure: usize,
    limit: usize,
    scratch: &mut AccentScratch,
) -> Option<MatchSpan> {
    if ctx.pattern.canonical_pces().is_empty() {
        return None;
    }
    let cluster = cluster_at(ctx.text, failure, ctx.normalizer)?;
    scratch.clear();
    let last = layout(ctx.text, cluster, ctx.normalizer, scratch)?;

    // 跨过终点的簇整体并入，但不能越过搜索起点
    let anchor = end.max(cluster.end);
    if anchor > limit {
        return None;
    }

    let mut layouts = vec![last];
    let outcome = match try_backward(ctx, anchor, limit, &layouts, scratch) {
        Outcome::Escalate(at) => {
            let previous = cluster_at(ctx.text, at, ctx.normalizer)?;
            if previous.end > cluster.start {
                return None;
            }
            layouts.insert(0, layout(ctx.text, previous, ctx.normalizer, scratch)?);
            try_backward(ctx, anchor, limit, &layouts, scratch)
        }
        outcome => outcome,
    };

    match outcome {
        Outcome::Resolved(span) => {
            tracing::debug!(
                start = span.start,
                end = span.end,
                clusters = layouts.len(),
                "canonical accent rearrangement matched backward"
            );
            Some(span)
        }
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/search/accent.rs"]
mod tests;
