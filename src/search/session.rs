//! 搜索会话
//!
//! `StringSearch` 持有 pattern 模型、目标文本和迭代状态，对外提供 next / previous 等迭代操作。
//! 位置都是 UTF-8 字节偏移，且总在 `char` 边界上。

use std::ops::Range;

use crate::collation::{Collator, RootCollator};
use crate::error::{Result, SearchError};
use crate::text::{BreakService, GraphemeBreaks, Normalization, UnicodeNormalizer};

use super::matcher::{self, ElementComparison, MatchSpan, Scratch, SearchContext};
use super::pattern::PatternModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    Found { index: usize, length: usize },
    NoMatch,
}

impl MatchResult {
    pub fn is_found(&self) -> bool {
        matches!(self, MatchResult::Found { .. })
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            MatchResult::Found { index, .. } => Some(*index),
            MatchResult::NoMatch => None,
        }
    }

    pub fn length(&self) -> usize {
        match self {
            MatchResult::Found { length, .. } => *length,
            MatchResult::NoMatch => 0,
        }
    }

    pub fn range(&self) -> Option<Range<usize>> {
        match self {
            MatchResult::Found { index, length } => Some(*index..*index + *length),
            MatchResult::NoMatch => None,
        }
    }
}

pub struct StringSearch<C: Collator = RootCollator> {
    pattern: PatternModel,
    target: String,
    collator: C,
    breaks: Option<Box<dyn BreakService>>,
    normalizer: Box<dyn Normalization>,
    canonical: bool,
    overlapping: bool,
    comparison: ElementComparison,

    offset: usize,
    matched_index: Option<usize>,
    matched_length: usize,
    forward: bool,
    reset: bool,
    scratch: Scratch,
}

impl<C: Collator> StringSearch<C> {
    pub fn new(pattern: &str, target: impl Into<String>, collator: C) -> Result<Self> {
        Self::build(pattern, target.into(), collator, None)
    }

    pub fn with_break_service(
        pattern: &str,
        target: impl Into<String>,
        collator: C,
        breaks: Box<dyn BreakService>,
    ) -> Result<Self> {
        Self::build(pattern, target.into(), collator, Some(breaks))
    }

    fn build(
        pattern: &str,
        target: String,
        collator: C,
        breaks: Option<Box<dyn BreakService>>,
    ) -> Result<Self> {
        if pattern.is_empty() {
            return Err(SearchError::InvalidArgument(
                "pattern must not be empty".to_string(),
            ));
        }
        if target.is_empty() {
            return Err(SearchError::InvalidArgument(
                "target must not be empty".to_string(),
            ));
        }
        let normalizer: Box<dyn Normalization> = Box::new(UnicodeNormalizer);
        let model = PatternModel::build(pattern, &collator, normalizer.as_ref());
        Ok(Self {
            pattern: model,
            target,
            collator,
            breaks,
            normalizer,
            canonical: false,
            overlapping: false,
            comparison: ElementComparison::Standard,
            offset: 0,
            matched_index: None,
            matched_length: 0,
            forward: true,
            reset: true,
            scratch: Scratch::default(),
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.text()
    }

    pub fn pattern_model(&self) -> &PatternModel {
        &self.pattern
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn collator(&self) -> &C {
        &self.collator
    }

    pub fn is_canonical(&self) -> bool {
        self.canonical
    }

    pub fn is_overlapping(&self) -> bool {
        self.overlapping
    }

    /// 重建 pattern 模型，迭代位置不变
    pub fn set_pattern(&mut self, pattern: &str) -> Result<()> {
        if pattern.is_empty() {
            return Err(SearchError::InvalidArgument(
                "pattern must not be empty".to_string(),
            ));
        }
        self.rebuild_pattern(pattern.to_string());
        Ok(())
    }

    /// 换目标文本，从头开始迭代
    pub fn set_target(&mut self, target: impl Into<String>) -> Result<()> {
        let target = target.into();
        if target.is_empty() {
            return Err(SearchError::InvalidArgument(
                "target must not be empty".to_string(),
            ));
        }
        self.target = target;
        self.offset = 0;
        self.matched_index = None;
        self.matched_length = 0;
        self.forward = true;
        self.reset = true;
        Ok(())
    }

    pub fn set_collator(&mut self, collator: C) {
        self.collator = collator;
        let text = self.pattern.text().to_string();
        self.rebuild_pattern(text);
    }

    pub fn set_canonical(&mut self, enabled: bool) {
        self.canonical = enabled;
    }

    pub fn set_overlapping(&mut self, enabled: bool) {
        self.overlapping = enabled;
    }

    /// `None` 时使用内部的字素断点
    pub fn set_break_service(&mut self, breaks: Option<Box<dyn BreakService>>) {
        self.breaks = breaks;
    }

    pub fn set_normalizer(&mut self, normalizer: Box<dyn Normalization>) {
        self.normalizer = normalizer;
        let text = self.pattern.text().to_string();
        self.rebuild_pattern(text);
    }

    fn rebuild_pattern(&mut self, text: String) {
        self.pattern = PatternModel::build(&text, &self.collator, self.normalizer.as_ref());
    }

    /// 下一次搜索的起点；向前跑出末尾后是文本长度，向后跑出开头后是 0
    pub fn index(&self) -> usize {
        self.offset
    }

    pub fn set_index(&mut self, position: usize) -> Result<()> {
        if position > self.target.len() {
            return Err(SearchError::IndexOutOfRange {
                index: position,
                len: self.target.len(),
            });
        }
        if !self.target.is_char_boundary(position) {
            return Err(SearchError::NotCharBoundary(position));
        }
        self.offset = position;
        self.matched_index = None;
        self.matched_length = 0;
        self.reset = false;
        Ok(())
    }

    pub fn matched_index(&self) -> Option<usize> {
        self.matched_index
    }

    pub fn matched_length(&self) -> usize {
        self.matched_length
    }

    pub fn matched_text(&self) -> Option<&str> {
        let start = self.matched_index?;
        self.target.get(start..start + self.matched_length)
    }

    /// 回到开头、正向迭代，关闭重叠和规范等价
    pub fn reset(&mut self) {
        self.offset = 0;
        self.matched_index = None;
        self.matched_length = 0;
        self.overlapping = false;
        self.canonical = false;
        self.comparison = ElementComparison::Standard;
        self.forward = true;
        self.reset = true;
    }

    pub fn first(&mut self) -> MatchResult {
        self.forward = true;
        self.jump_to(0);
        self.handle_next(0)
    }

    pub fn last(&mut self) -> MatchResult {
        self.forward = false;
        let end = self.target.len();
        self.jump_to(end);
        self.handle_previous(end)
    }

    pub fn following(&mut self, position: usize) -> Result<MatchResult> {
        self.forward = true;
        self.set_index(position)?;
        Ok(self.handle_next(position))
    }

    pub fn preceding(&mut self, position: usize) -> Result<MatchResult> {
        self.forward = false;
        self.set_index(position)?;
        Ok(self.handle_previous(position))
    }

    pub fn next(&mut self) -> MatchResult {
        let mut index = self.offset;
        let matched = self.matched_index;
        let length = self.matched_length;
        self.reset = false;

        if self.forward {
            let end = self.target.len();
            let exhausted = index == end
                || matched == Some(end)
                || matched.is_some_and(|m| m + length >= end);
            if exhausted {
                self.set_match_not_found();
                return MatchResult::NoMatch;
            }
        } else {
            // 换方向时先把当前匹配再报告一次
            self.forward = true;
            if let Some(m) = matched {
                return MatchResult::Found {
                    index: m,
                    length,
                };
            }
        }

        if length > 0 {
            index = if self.overlapping {
                self.next_char_boundary(index)
            } else {
                index + length
            };
        }
        self.handle_next(index)
    }

    pub fn previous(&mut self) -> MatchResult {
        let index = if self.reset {
            let end = self.target.len();
            self.forward = false;
            self.reset = false;
            self.jump_to(end);
            end
        } else {
            self.offset
        };

        let matched = self.matched_index;
        if self.forward {
            self.forward = false;
            if let Some(m) = matched {
                return MatchResult::Found {
                    index: m,
                    length: self.matched_length,
                };
            }
        } else if index == 0 || matched == Some(0) {
            self.set_match_not_found();
            return MatchResult::NoMatch;
        }

        self.handle_previous(matched.unwrap_or(index))
    }

    /// 剩余的正向匹配
    pub fn matches(&mut self) -> Matches<'_, C> {
        Matches { search: self }
    }

    /// 从头收集所有匹配
    pub fn find_all(&mut self) -> Vec<Range<usize>> {
        let mut out = Vec::new();
        let mut result = self.first();
        while let Some(range) = result.range() {
            out.push(range);
            result = self.next();
        }
        out
    }

    fn jump_to(&mut self, position: usize) {
        self.offset = position;
        self.matched_index = None;
        self.matched_length = 0;
        self.reset = false;
    }

    fn set_match_not_found(&mut self) {
        self.matched_index = None;
        self.matched_length = 0;
        self.offset = if self.forward { self.target.len() } else { 0 };
    }

    fn set_match(&mut self, span: MatchSpan) -> MatchResult {
        self.matched_index = Some(span.start);
        self.matched_length = span.len();
        self.offset = span.start;
        MatchResult::Found {
            index: span.start,
            length: span.len(),
        }
    }

    fn next_char_boundary(&self, position: usize) -> usize {
        match self.target[position..].chars().next() {
            Some(ch) => position + ch.len_utf8(),
            None => position,
        }
    }

    fn previous_char_boundary(&self, position: usize) -> usize {
        match self.target[..position].chars().next_back() {
            Some(ch) => position - ch.len_utf8(),
            None => 0,
        }
    }

    fn following_boundary(&self, position: usize) -> usize {
        match self.breaks.as_deref() {
            Some(breaks) => breaks.following(&self.target, position),
            None => GraphemeBreaks.following(&self.target, position),
        }
    }

    fn preceding_boundary(&self, position: usize) -> usize {
        match self.breaks.as_deref() {
            Some(breaks) => breaks.preceding(&self.target, position),
            None => GraphemeBreaks.preceding(&self.target, position),
        }
    }

    fn handle_next(&mut self, position: usize) -> MatchResult {
        if self.pattern.is_empty() {
            // 空 pattern 在当前位置以及之后的每个断点上零长度匹配，末尾除外
            let index = match self.matched_index {
                None => position,
                Some(m) => self.following_boundary(m),
            };
            if index >= self.target.len() {
                self.set_match_not_found();
                return MatchResult::NoMatch;
            }
            return self.set_match(MatchSpan {
                start: index,
                end: index,
            });
        }

        self.offset = position;
        let found = {
            let ctx = SearchContext {
                collator: &self.collator,
                normalizer: self.normalizer.as_ref(),
                breaks: self.breaks.as_deref(),
                text: &self.target,
                pattern: &self.pattern,
                canonical: self.canonical,
                comparison: self.comparison,
            };
            matcher::search(&ctx, position, &mut self.scratch)
        };
        match found {
            Some(span) => self.set_match(span),
            None => {
                self.set_match_not_found();
                MatchResult::NoMatch
            }
        }
    }

    fn handle_previous(&mut self, position: usize) -> MatchResult {
        if self.pattern.is_empty() {
            let current = self.matched_index.unwrap_or(position);
            if current == 0 {
                self.set_match_not_found();
                return MatchResult::NoMatch;
            }
            let index = self.preceding_boundary(current);
            return self.set_match(MatchSpan {
                start: index,
                end: index,
            });
        }

        // 重叠模式从当前匹配末尾的前一个字符开始；没有当前匹配时找结束不晚于 `position` 的匹配
        let start = match self.matched_index {
            Some(m) if self.overlapping => self.previous_char_boundary(m + self.matched_length),
            _ => position,
        };

        self.offset = start;
        let found = {
            let ctx = SearchContext {
                collator: &self.collator,
                normalizer: self.normalizer.as_ref(),
                breaks: self.breaks.as_deref(),
                text: &self.target,
                pattern: &self.pattern,
                canonical: self.canonical,
                comparison: self.comparison,
            };
            matcher::search_backwards(&ctx, start, &mut self.scratch)
        };
        match found {
            Some(span) => self.set_match(span),
            None => {
                self.set_match_not_found();
                MatchResult::NoMatch
            }
        }
    }
}

pub struct Matches<'s, C: Collator> {
    search: &'s mut StringSearch<C>,
}

impl<C: Collator> Iterator for Matches<'_, C> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        self.search.next().range()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/search/session.rs"]
mod tests;
