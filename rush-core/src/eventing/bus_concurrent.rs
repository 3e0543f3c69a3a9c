//! 线程安全事件总线（ConcurrentEventBus）
//!
//! - 注册表、订阅者缓存与类型链缓存均为分片加锁的 `DashMap`；
//! - 每次修改在分片锁内对该类型的序列做写时复制，修改之间可线性化；
//! - 分发时只在锁内克隆该层序列的 `Arc` 快照，锁不跨越监听器调用：
//!   监听器可重入总线而不会自锁，并发的取消订阅不会让正在进行的分发看到半更新的序列。
//!
use super::bus::{EventBus, ReflectionEventBus};
use super::dispatch;
use crate::config::BusConfig;
use crate::error::BusResult;
use crate::event::Event;
use crate::hierarchy::TypeChain;
use crate::listener::Listener;
use crate::registry::{Snapshot, insert_into, remove_from};
use crate::subscriber::{CachedSubscriber, Subscriber, SubscriberKey, scan};
use dashmap::DashMap;
use std::any::{TypeId, type_name};
use std::sync::Arc;

/// 可在线程间共享的事件总线
pub struct ConcurrentEventBus {
    config: BusConfig,
    registry: DashMap<TypeId, Snapshot>,
    cache: DashMap<SubscriberKey, CachedSubscriber>,
    chains: DashMap<TypeId, Arc<TypeChain>>,
}

impl Default for ConcurrentEventBus {
    fn default() -> Self {
        Self::with_config(BusConfig::default())
    }
}

impl ConcurrentEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BusConfig) -> Self {
        let capacity = config.initial_capacity;
        Self {
            config,
            registry: DashMap::with_capacity(capacity),
            cache: DashMap::new(),
            chains: DashMap::with_capacity(capacity),
        }
    }

    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    fn chain_of<E: Event>(&self) -> Arc<TypeChain> {
        let key = TypeId::of::<E>();
        if let Some(chain) = self.chains.get(&key) {
            return chain.value().clone();
        }

        // 在锁外构建，竞争时以先写入者为准
        let chain = Arc::new(TypeChain::of::<E>());
        self.chains.entry(key).or_insert(chain).value().clone()
    }

    fn snapshot(&self, event_type: TypeId) -> Option<Snapshot> {
        self.registry
            .get(&event_type)
            .map(|list| list.value().clone())
    }
}

impl EventBus for ConcurrentEventBus {
    fn subscribe(&self, listener: Listener) {
        tracing::debug!(
            bus = %self.config.name,
            event = listener.event_name(),
            priority = listener.priority(),
            "listener subscribed"
        );
        let mut slot = self.registry.entry(listener.event_type()).or_default();
        insert_into(slot.value_mut(), listener);
    }

    fn unsubscribe(&self, listener: &Listener) {
        let event_type = listener.event_type();
        let removed = match self.registry.get_mut(&event_type) {
            Some(mut slot) => remove_from(slot.value_mut(), listener),
            None => false,
        };
        if removed {
            self.registry.remove_if(&event_type, |_, list| list.is_empty());
        }

        tracing::debug!(
            bus = %self.config.name,
            event = listener.event_name(),
            removed,
            "listener unsubscribed"
        );
    }

    fn dispatch<E: Event>(&self, event: &mut E) -> usize {
        let chain = self.chain_of::<E>();
        let invoked = dispatch::run(&chain, event, |event_type| self.snapshot(event_type));
        dispatch::log_post::<E>(&self.config, &chain, invoked);
        invoked
    }

    fn listeners_for(&self, event_type: TypeId) -> Vec<Listener> {
        self.snapshot(event_type)
            .map(|list| list.to_vec())
            .unwrap_or_default()
    }
}

impl ReflectionEventBus for ConcurrentEventBus {
    fn subscribe_object<S: Subscriber>(&self, subscriber: &Arc<S>) -> BusResult<()> {
        let key = SubscriberKey::of(subscriber);
        let cached = self.cache.get(&key).map(|entry| entry.listeners());

        let listeners = match cached {
            Some(listeners) => listeners,
            None => {
                // 扫描会调用用户代码，不能持锁进行
                let scanned = scan(subscriber, &self.config.name)?;
                self.cache.retain(|_, entry| entry.is_live());
                self.cache.entry(key).or_insert(scanned).listeners()
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
        let Some(listeners) = self.cache.get(&key).map(|entry| entry.listeners()) else {
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
