//! zsearch - 基于排序规则的字符串搜索库
//!
//! 模块结构：
//! - collation: 排序服务（CE / PCE、Collator trait、参考排序引擎）
//! - text: 规范化与断点服务
//! - search: 搜索核心（pattern 模型、CE 缓冲、匹配器、重音重排、搜索会话）
//! - settings: JSON 搜索设置
//! - logging: tracing 初始化
//! - error: 错误类型

pub mod collation;
pub mod error;
pub mod logging;
pub mod search;
pub mod settings;
pub mod text;

pub use collation::{Collator, RootCollator, Strength, Tailoring};
pub use error::{Result, SearchError};
pub use search::{MatchResult, StringSearch};
pub use settings::SearchSettings;
