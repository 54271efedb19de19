//! 错误类型
//!
//! 只有 API 边界上的非法输入才会以错误返回；
//! 匹配失败不是错误（返回 `None` / `MatchResult::NoMatch`）。

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// 空 pattern、空 target 等非法参数
    InvalidArgument(String),
    /// 位置超出 target 的 `[0, len]` 范围
    IndexOutOfRange { index: usize, len: usize },
    /// 位置落在一个 UTF-8 字符中间
    NotCharBoundary(usize),
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            SearchError::IndexOutOfRange { index, len } => {
                write!(f, "Index {} out of range 0..={}", index, len)
            }
            SearchError::NotCharBoundary(index) => {
                write!(f, "Index {} is not on a character boundary", index)
            }
        }
    }
}

impl std::error::Error for SearchError {}
