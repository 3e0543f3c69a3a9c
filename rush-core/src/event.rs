//! 事件类型模型
//!
//! - `Event`：可被投递的事件标记能力，可声明祖先层级；
//! - `StoppableEvent`：携带单向的“停止”标志，影响同层后续监听器的调用；
//! - `CancellableEvent`：携带单向的“取消”标志，仅供监听器读写，分发过程不读取。
//!
//! 通常使用 `rush_macros::event` 宏生成实现，也可手写。
//!
use crate::hierarchy::Hierarchy;
use std::any::Any;

/// 可投递的事件
///
/// 默认没有祖先层级；子类型在 `hierarchy` 中通过 `Hierarchy::extends` 声明父类型，
/// 投递子类型时父类型的监听器同样会收到（以父类型视图）。
pub trait Event: Any {
    /// 声明直接父类型（可多个，按声明顺序）
    fn hierarchy(_h: &mut Hierarchy<'_, Self>)
    where
        Self: Sized,
    {
    }

    /// 停止能力（若事件可停止）
    fn as_stoppable(&self) -> Option<&dyn StoppableEvent> {
        None
    }

    /// 可变的停止能力，须与 `as_stoppable` 一致
    fn as_stoppable_mut(&mut self) -> Option<&mut dyn StoppableEvent> {
        None
    }

    /// 取消能力（若事件可取消）
    fn as_cancellable(&self) -> Option<&dyn CancellableEvent> {
        None
    }

    /// 可变的取消能力，须与 `as_cancellable` 一致
    fn as_cancellable_mut(&mut self) -> Option<&mut dyn CancellableEvent> {
        None
    }
}

/// 可停止事件：一旦 `stop`，在该实例生命周期内不会恢复
pub trait StoppableEvent: Event {
    fn is_stopped(&self) -> bool;

    fn stop(&mut self);
}

/// 可取消事件：一旦 `cancel`，在该实例生命周期内不会恢复；与停止相互独立
pub trait CancellableEvent: Event {
    fn is_cancelled(&self) -> bool;

    fn cancel(&mut self);
}

/// 单向标志：只能由未设置变为已设置
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OneWayFlag(bool);

impl OneWayFlag {
    pub const fn new() -> Self {
        Self(false)
    }

    pub const fn is_set(&self) -> bool {
        self.0
    }

    pub fn set(&mut self) {
        self.0 = true;
    }
}

/// `StoppableEvent` 的数据载体
pub type StopFlag = OneWayFlag;

/// `CancellableEvent` 的数据载体
pub type CancelFlag = OneWayFlag;
