//! 事件子系统（eventing）
//!
//! 提供同步发布/订阅的协议与两种并发变体：
//! - `EventBus` / `ReflectionEventBus`：统一的订阅、取消订阅与投递接口；
//! - `FastEventBus`：无锁、`!Sync`，适用于单线程或外部串行化场景；
//! - `ConcurrentEventBus`：分片加锁 + 快照分发，可在线程间共享。
//!
//! 两者共用同一套分发算法（`dispatch`）与注册表语义。
//!
pub mod bus;
pub mod bus_concurrent;
pub mod bus_fast;
mod dispatch;

pub use bus::{EventBus, ReflectionEventBus};
pub use bus_concurrent::ConcurrentEventBus;
pub use bus_fast::FastEventBus;
