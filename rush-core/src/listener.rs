//! 监听器（Listener）
//!
//! 绑定（目标事件类型, 优先级, 回调）的不可变对象。克隆共享同一身份：
//! 注册表按身份（而非值）比较，重复订阅同一监听器会产生重复调用。
//!
use crate::event::{CancellableEvent, Event, StoppableEvent};
use crate::hierarchy::{Capability, Erased, View};
use std::any::{TypeId, type_name};
use std::fmt;
use std::sync::Arc;

enum Handler {
    Declared(Box<dyn Fn(&mut Erased) + Send + Sync>),
    Any(Box<dyn Fn(&mut dyn Event) + Send + Sync>),
    Stoppable(Box<dyn Fn(&mut dyn StoppableEvent) + Send + Sync>),
    Cancellable(Box<dyn Fn(&mut dyn CancellableEvent) + Send + Sync>),
}

struct Inner {
    event_type: TypeId,
    event_name: &'static str,
    priority: i32,
    handler: Handler,
}

/// 类型化的事件回调
#[derive(Clone)]
pub struct Listener {
    inner: Arc<Inner>,
}

impl Listener {
    /// 默认优先级
    pub const DEFAULT_PRIORITY: i32 = 0;

    /// 以默认优先级创建监听器
    pub fn new<E, F>(handler: F) -> Self
    where
        E: Event,
        F: Fn(&mut E) + Send + Sync + 'static,
    {
        Self::with_priority(Self::DEFAULT_PRIORITY, handler)
    }

    /// 指定优先级创建监听器（数值越大越先调用）
    pub fn with_priority<E, F>(priority: i32, handler: F) -> Self
    where
        E: Event,
        F: Fn(&mut E) + Send + Sync + 'static,
    {
        let handler = Handler::Declared(Box::new(move |event: &mut Erased| {
            // 注册表按 TypeId 分桶，类型不符只可能来自错误的投影
            if let Some(event) = event.downcast_mut::<E>() {
                handler(event);
            }
        }));

        Self {
            inner: Arc::new(Inner {
                event_type: TypeId::of::<E>(),
                event_name: type_name::<E>(),
                priority,
                handler,
            }),
        }
    }

    /// 接收所有事件的监听器，在声明的类型层之后调用
    pub fn any_event<F>(priority: i32, handler: F) -> Self
    where
        F: Fn(&mut dyn Event) + Send + Sync + 'static,
    {
        Self::for_capability(Capability::Any, priority, Handler::Any(Box::new(handler)))
    }

    /// 接收所有可停止事件的监听器
    pub fn any_stoppable<F>(priority: i32, handler: F) -> Self
    where
        F: Fn(&mut dyn StoppableEvent) + Send + Sync + 'static,
    {
        Self::for_capability(
            Capability::Stoppable,
            priority,
            Handler::Stoppable(Box::new(handler)),
        )
    }

    /// 接收所有可取消事件的监听器
    pub fn any_cancellable<F>(priority: i32, handler: F) -> Self
    where
        F: Fn(&mut dyn CancellableEvent) + Send + Sync + 'static,
    {
        Self::for_capability(
            Capability::Cancellable,
            priority,
            Handler::Cancellable(Box::new(handler)),
        )
    }

    fn for_capability(capability: Capability, priority: i32, handler: Handler) -> Self {
        Self {
            inner: Arc::new(Inner {
                event_type: capability.type_id(),
                event_name: capability.type_name(),
                priority,
                handler,
            }),
        }
    }

    pub fn event_type(&self) -> TypeId {
        self.inner.event_type
    }

    pub fn event_name(&self) -> &'static str {
        self.inner.event_name
    }

    pub fn priority(&self) -> i32 {
        self.inner.priority
    }

    /// 身份比较：是否为同一个监听器（或其克隆）
    pub fn same_as(&self, other: &Listener) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// 视图种类与监听器目标不符时不调用
    pub(crate) fn invoke(&self, view: View<'_>) {
        match (&self.inner.handler, view) {
            (Handler::Declared(handler), View::Declared(event)) => handler(event),
            (Handler::Any(handler), View::Any(event)) => handler(event),
            (Handler::Stoppable(handler), View::Stoppable(event)) => handler(event),
            (Handler::Cancellable(handler), View::Cancellable(event)) => handler(event),
            _ => {}
        }
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("event", &self.inner.event_name)
            .field("priority", &self.inner.priority)
            .field("id", &Arc::as_ptr(&self.inner))
            .finish()
    }
}
