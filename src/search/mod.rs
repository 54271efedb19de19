//! 基于排序的字符串搜索
//!
//! - pattern: pattern 预处理（CE / PCE / 移位表）
//! - buffer: 目标 CE 环形缓冲
//! - matcher: 正向 / 反向线性 CE 匹配
//! - accent: 规范等价下的重音重排
//! - session: 迭代会话 `StringSearch`

pub mod accent;
pub mod buffer;
pub mod matcher;
pub mod pattern;
pub mod session;

pub use matcher::{ElementComparison, MatchSpan, SearchContext};
pub use pattern::PatternModel;
pub use session::{MatchResult, Matches, StringSearch};
