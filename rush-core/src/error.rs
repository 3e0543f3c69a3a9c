//! 事件总线统一错误定义
//!
//! `post` 本身从不返回错误；错误只来自订阅者扫描（`subscribe_object`）。
//!
use thiserror::Error;

/// 统一错误类型
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BusError {
    // --- 订阅者扫描 ---
    #[error("subscriber scan failed: subscriber={subscriber}, member={member}, reason={reason}")]
    Scan {
        subscriber: &'static str,
        member: &'static str,
        reason: String,
    },
    #[error("uninitialized listener member: subscriber={subscriber}, member={member}")]
    UninitializedListener {
        subscriber: &'static str,
        member: &'static str,
    },
}

impl BusError {
    /// 构造扫描失败错误，供手写 `Subscriber` 实现使用
    pub fn scan(subscriber: &'static str, member: &'static str, reason: impl Into<String>) -> Self {
        BusError::Scan {
            subscriber,
            member,
            reason: reason.into(),
        }
    }

    /// 出错的订阅者类型名
    pub fn subscriber(&self) -> &'static str {
        match self {
            BusError::Scan { subscriber, .. } | BusError::UninitializedListener { subscriber, .. } => {
                subscriber
            }
        }
    }
}

/// 统一 Result 类型别名
pub type BusResult<T> = Result<T, BusError>;
