//! 事件总线（EventBus）协议
//!
//! 同步发布/订阅：`post` 在调用线程上直接调用所有匹配的监听器并返回原事件。
//! 该 trait 带有泛型方法，通常以具体实现类型（`FastEventBus` / `ConcurrentEventBus`）使用。
//!
use crate::error::BusResult;
use crate::event::Event;
use crate::listener::Listener;
use crate::subscriber::Subscriber;
use std::any::TypeId;
use std::sync::Arc;

/// 事件总线：注册监听器并分发事件
pub trait EventBus {
    /// 注册监听器；重复注册同一监听器会产生重复调用
    fn subscribe(&self, listener: Listener);

    /// 依次注册，不保证批量原子性
    fn subscribe_all<I>(&self, listeners: I)
    where
        I: IntoIterator<Item = Listener>,
    {
        for listener in listeners {
            self.subscribe(listener);
        }
    }

    /// 移除监听器（每次最多移除一个身份相同的条目）；未注册时为空操作
    fn unsubscribe(&self, listener: &Listener);

    /// 依次移除，不保证批量原子性
    fn unsubscribe_all<'a, I>(&self, listeners: I)
    where
        I: IntoIterator<Item = &'a Listener>,
    {
        for listener in listeners {
            self.unsubscribe(listener);
        }
    }

    /// 原地分发事件，返回被调用的监听器数量
    fn dispatch<E: Event>(&self, event: &mut E) -> usize;

    /// 分发事件并返回同一实例，便于调用方检查分发后的标志
    fn post<E: Event>(&self, mut event: E) -> E {
        self.dispatch(&mut event);
        event
    }

    /// 精确类型当前注册的监听器（按调用顺序）
    fn listeners_for(&self, event_type: TypeId) -> Vec<Listener>;
}

/// 支持按订阅者对象整体注册的事件总线
pub trait ReflectionEventBus: EventBus {
    /// 首次订阅时扫描并缓存订阅者的监听器，之后直接复用缓存
    ///
    /// 身份是 `Arc` 的分配，同一分配的任意克隆视为同一订阅者。
    /// 扫描失败时返回错误，不写入缓存也不注册任何监听器。
    fn subscribe_object<S: Subscriber>(&self, subscriber: &Arc<S>) -> BusResult<()>;

    /// 按缓存移除订阅者的监听器；从未订阅过的对象为空操作
    fn unsubscribe_object<S: Subscriber>(&self, subscriber: &Arc<S>);
}
