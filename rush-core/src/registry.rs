//! 监听器注册表
//!
//! 事件类型 → 按（优先级降序, 插入顺序升序）排列的监听器序列。
//! 每个序列以 `Arc` 共享：分发时克隆 `Arc` 得到快照，修改时写时复制，
//! 因此正在进行的分发永远看不到修改到一半的序列。
//!
use crate::listener::Listener;
use std::any::TypeId;
use std::collections::HashMap;
use std::ops::Deref;
use std::sync::Arc;

/// 单个事件类型下的有序监听器序列
#[derive(Clone, Debug, Default)]
pub struct ListenerList {
    listeners: Vec<Listener>,
}

impl ListenerList {
    /// 按优先级插入：排在所有优先级不低于它的监听器之后（同优先级保持插入顺序）
    pub fn insert(&mut self, listener: Listener) {
        let priority = listener.priority();
        let at = self
            .listeners
            .partition_point(|l| l.priority() >= priority);
        self.listeners.insert(at, listener);
    }

    /// 删除第一个身份相同的监听器，返回是否删除
    pub fn remove(&mut self, listener: &Listener) -> bool {
        match self.listeners.iter().position(|l| l.same_as(listener)) {
            Some(at) => {
                self.listeners.remove(at);
                true
            }
            None => false,
        }
    }
}

impl Deref for ListenerList {
    type Target = [Listener];

    fn deref(&self) -> &Self::Target {
        &self.listeners
    }
}

/// 分发使用的只读快照
pub type Snapshot = Arc<ListenerList>;

/// 写时复制插入（供不同并发变体复用）
pub(crate) fn insert_into(slot: &mut Snapshot, listener: Listener) {
    Arc::make_mut(slot).insert(listener);
}

/// 写时复制删除；未找到时不触发复制
pub(crate) fn remove_from(slot: &mut Snapshot, listener: &Listener) -> bool {
    if !slot.iter().any(|l| l.same_as(listener)) {
        return false;
    }
    Arc::make_mut(slot).remove(listener)
}

/// 非同步注册表
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    lists: HashMap<TypeId, Snapshot>,
}

impl ListenerRegistry {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lists: HashMap::with_capacity(capacity),
        }
    }

    pub fn insert(&mut self, listener: Listener) {
        let slot = self.lists.entry(listener.event_type()).or_default();
        insert_into(slot, listener);
    }

    /// 删除监听器；不存在时为空操作
    pub fn remove(&mut self, listener: &Listener) -> bool {
        let event_type = listener.event_type();
        let Some(slot) = self.lists.get_mut(&event_type) else {
            return false;
        };

        let removed = remove_from(slot, listener);
        if slot.is_empty() {
            self.lists.remove(&event_type);
        }
        removed
    }

    /// 精确类型的监听器快照
    pub fn listeners_for(&self, event_type: TypeId) -> Option<Snapshot> {
        self.lists.get(&event_type).cloned()
    }

    /// 已注册监听器总数（含重复订阅）
    pub fn len(&self) -> usize {
        self.lists.values().map(|l| l.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;

    struct Tick;
    impl Event for Tick {}

    struct Tock;
    impl Event for Tock {}

    fn priorities(list: &ListenerList) -> Vec<i32> {
        list.iter().map(Listener::priority).collect()
    }

    #[test]
    fn insert_orders_by_priority_desc() {
        let mut reg = ListenerRegistry::default();
        for p in [5, 10, -1, 7] {
            reg.insert(Listener::with_priority(p, |_: &mut Tick| {}));
        }
        let list = reg.listeners_for(TypeId::of::<Tick>()).unwrap();
        assert_eq!(priorities(&list), vec![10, 7, 5, -1]);
    }

    #[test]
    fn equal_priority_keeps_insertion_order() {
        let mut reg = ListenerRegistry::default();
        let first = Listener::new(|_: &mut Tick| {});
        let second = Listener::new(|_: &mut Tick| {});
        let high = Listener::with_priority(1, |_: &mut Tick| {});
        reg.insert(first.clone());
        reg.insert(second.clone());
        reg.insert(high.clone());

        let list = reg.listeners_for(TypeId::of::<Tick>()).unwrap();
        assert!(list[0].same_as(&high));
        assert!(list[1].same_as(&first));
        assert!(list[2].same_as(&second));
    }

    #[test]
    fn lists_are_keyed_by_exact_type() {
        let mut reg = ListenerRegistry::default();
        reg.insert(Listener::new(|_: &mut Tick| {}));
        assert!(reg.listeners_for(TypeId::of::<Tock>()).is_none());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn remove_deletes_one_identity_match() {
        let mut reg = ListenerRegistry::default();
        let l = Listener::new(|_: &mut Tick| {});
        reg.insert(l.clone());
        reg.insert(l.clone());
        assert_eq!(reg.len(), 2);

        assert!(reg.remove(&l));
        assert_eq!(reg.len(), 1);
        assert!(reg.remove(&l));
        assert!(reg.is_empty());
        assert!(!reg.remove(&l));
    }

    #[test]
    fn remove_unknown_is_noop() {
        let mut reg = ListenerRegistry::default();
        reg.insert(Listener::new(|_: &mut Tick| {}));
        let stranger = Listener::new(|_: &mut Tick| {});
        assert!(!reg.remove(&stranger));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn snapshot_survives_later_mutation() {
        let mut reg = ListenerRegistry::default();
        let l = Listener::new(|_: &mut Tick| {});
        reg.insert(l.clone());

        let snapshot = reg.listeners_for(TypeId::of::<Tick>()).unwrap();
        reg.remove(&l);
        reg.insert(Listener::new(|_: &mut Tick| {}));
        reg.insert(Listener::new(|_: &mut Tick| {}));

        assert_eq!(snapshot.len(), 1);
        assert!(snapshot[0].same_as(&l));
        assert_eq!(reg.len(), 2);
    }
}
