//! 非同步事件总线（FastEventBus）
//!
//! 不加锁，基于 `RefCell` 的内部可变性，比 `ConcurrentEventBus` 更快。
//! 类型本身是 `!Sync`，编译器保证只能在单线程（或外部串行化）场景下使用。
//! 分发时只在取快照的瞬间借用注册表，监听器内部可以重入订阅、取消订阅与投递。
//!
use super::bus::{EventBus, ReflectionEventBus};
use super::dispatch;
use crate::config::BusConfig;
use crate::error::BusResult;
use crate::event::Event;
use crate::hierarchy::TypeChain;
use crate::listener::Listener;
use crate::registry::ListenerRegistry;
use crate::subscriber::{CachedSubscriber, Subscriber, SubscriberKey, scan};
use std::any::{TypeId, type_name};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

/// 单线程事件总线
pub struct FastEventBus {
    config: BusConfig,
    registry: RefCell<ListenerRegistry>,
    cache: RefCell<HashMap<SubscriberKey, CachedSubscriber>>,
    chains: RefCell<HashMap<TypeId, Rc<TypeChain>>>,
}

impl Default for FastEventBus {
    fn default() -> Self {
        Self::with_config(BusConfig::default())
    }
}

impl FastEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BusConfig) -> Self {
        let capacity = config.initial_capacity;
        Self {
            config,
            registry: RefCell::new(ListenerRegistry::with_capacity(capacity)),
            cache: RefCell::new(HashMap::new()),
            chains: RefCell::new(HashMap::with_capacity(capacity)),
        }
    }

    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    fn chain_of<E: Event>(&self) -> Rc<TypeChain> {
        let key = TypeId::of::<E>();
        if let Some(chain) = self.chains.borrow().get(&key) {
            return chain.clone();
        }

        let chain = Rc::new(TypeChain::of::<E>());
        self.chains
            .borrow_mut()
            .entry(key)
            .or_insert(chain)
            .clone()
    }
}

impl EventBus for FastEventBus {
    fn subscribe(&self, listener: Listener) {
        tracing::debug!(
            bus = %self.config.name,
            event = listener.event_name(),
            priority = listener.priority(),
            "listener subscribed"
        );
        self.registry.borrow_mut().insert(listener);
    }

    fn unsubscribe(&self, listener: &Listener) {
        let removed = self.registry.borrow_mut().remove(listener);
        tracing::debug!(
            bus = %self.config.name,
            event = listener.event_name(),
            removed,
            "listener unsubscribed"
        );
    }

    fn dispatch<E: Event>(&self, event: &mut E) -> usize {
        let chain = self.chain_of::<E>();
        let invoked = dispatch::run(&chain, event, |event_type| {
            self.registry.borrow().listeners_for(event_type)
        });
        dispatch::log_post::<E>(&self.config, &chain, invoked);
        invoked
    }

    fn listeners_for(&self, event_type: TypeId) -> Vec<Listener> {
        self.registry
            .borrow()
            .listeners_for(event_type)
            .map(|list| list.to_vec())
            .unwrap_or_default()
    }
}

impl ReflectionEventBus for FastEventBus {
    fn subscribe_object<S: Subscriber>(&self, subscriber: &Arc<S>) -> BusResult<()> {
        let key = SubscriberKey::of(subscriber);
        let cached = self.cache.borrow().get(&key).map(CachedSubscriber::listeners);

        let listeners = match cached {
            Some(listeners) => listeners,
            None => {
                let scanned = scan(subscriber, &self.config.name)?;
                let mut cache = self.cache.borrow_mut();
                cache.retain(|_, entry| entry.is_live());
                cache.entry(key).or_insert(scanned).listeners()
            }
        };

        tracing::debug!(
            bus = %self.config.name,
            subscriber = type_name::<S>(),
            listeners = listeners.len(),
            "subscriber subscribed"
        );
        for listener in listeners.iter() {
            self.subscribe(listener.clone());
        }
        Ok(())
    }

    fn unsubscribe_object<S: Subscriber>(&self, subscriber: &Arc<S>) {
        let key = SubscriberKey::of(subscriber);
        // 未缓存说明从未订阅过，无需处理
        let Some(listeners) = self.cache.borrow().get(&key).map(CachedSubscriber::listeners) else {
            return;
        };

        tracing::debug!(
            bus = %self.config.name,
            subscriber = type_name::<S>(),
            listeners = listeners.len(),
            "subscriber unsubscribed"
        );
        for listener in listeners.iter() {
            self.unsubscribe(listener);
        }
    }
}
