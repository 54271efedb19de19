//! 文本服务
//!
//! - normalizer: 规范分解、组合类、FCD
//! - breaks: 字素 / 字符 / 单词边界

pub mod breaks;
pub mod normalizer;

pub use breaks::{BreakKind, BreakService, CharacterBreaks, GraphemeBreaks, WordBreaks};
pub use normalizer::{Fcd, Normalization, UnicodeNormalizer};
