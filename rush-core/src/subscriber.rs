//! 订阅者（Subscriber）与扫描缓存
//!
//! 订阅者是声明了若干监听器成员的任意对象。`Subscriber::listeners` 按声明顺序
//! 枚举这些成员（通常由 `rush_macros::subscriber` 生成），总线只扫描一次，
//! 以对象身份为键缓存结果，后续的取消订阅与重复订阅都复用缓存。
//!
//! 订阅者以 `Arc` 交给总线，身份即其分配：对象不会移动，缓存持有 `Weak`
//! 使分配在条目存在期间不被释放，地址不会被新对象复用。
//!
use crate::error::{BusError, BusResult};
use crate::listener::Listener;
use std::any::{Any, TypeId, type_name};
use std::sync::{Arc, Weak};

/// 监听器成员枚举能力
///
/// 要求确定且完整：同一对象多次调用返回相同顺序，不得静默遗漏可访问的监听器。
pub trait Subscriber: Send + Sync + 'static {
    fn listeners(&self) -> BusResult<Vec<Listener>>;
}

/// 可以贡献监听器的成员类型
pub trait ListenerSource {
    /// 将成员中的监听器按顺序追加到 `out`
    ///
    /// `subscriber`/`member` 仅用于错误信息。
    fn collect_listeners(
        &self,
        subscriber: &'static str,
        member: &'static str,
        out: &mut Vec<Listener>,
    ) -> BusResult<()>;
}

impl ListenerSource for Listener {
    fn collect_listeners(
        &self,
        _subscriber: &'static str,
        _member: &'static str,
        out: &mut Vec<Listener>,
    ) -> BusResult<()> {
        out.push(self.clone());
        Ok(())
    }
}

impl ListenerSource for Option<Listener> {
    fn collect_listeners(
        &self,
        subscriber: &'static str,
        member: &'static str,
        out: &mut Vec<Listener>,
    ) -> BusResult<()> {
        match self {
            Some(listener) => {
                out.push(listener.clone());
                Ok(())
            }
            None => Err(BusError::UninitializedListener { subscriber, member }),
        }
    }
}

impl ListenerSource for Vec<Listener> {
    fn collect_listeners(
        &self,
        _subscriber: &'static str,
        _member: &'static str,
        out: &mut Vec<Listener>,
    ) -> BusResult<()> {
        out.extend(self.iter().cloned());
        Ok(())
    }
}

/// 订阅者身份：具体类型 + `Arc` 分配地址
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct SubscriberKey {
    type_id: TypeId,
    addr: usize,
}

impl SubscriberKey {
    pub(crate) fn of<S: Subscriber>(subscriber: &Arc<S>) -> Self {
        Self {
            type_id: TypeId::of::<S>(),
            addr: Arc::as_ptr(subscriber) as *const () as usize,
        }
    }
}

/// 缓存中的扫描结果
pub(crate) type Scanned = Arc<[Listener]>;

/// 缓存条目：扫描结果 + 订阅者的弱引用
#[derive(Clone, Debug)]
pub(crate) struct CachedSubscriber {
    owner: Weak<dyn Any + Send + Sync>,
    listeners: Scanned,
}

impl CachedSubscriber {
    pub(crate) fn listeners(&self) -> Scanned {
        self.listeners.clone()
    }

    /// 订阅者已释放的条目不可能再被查到，可以清理
    pub(crate) fn is_live(&self) -> bool {
        self.owner.strong_count() > 0
    }
}

/// 执行一次扫描；失败时不产生任何部分结果
pub(crate) fn scan<S: Subscriber>(subscriber: &Arc<S>, bus: &str) -> BusResult<CachedSubscriber> {
    match subscriber.listeners() {
        Ok(listeners) => {
            tracing::debug!(
                bus,
                subscriber = type_name::<S>(),
                listeners = listeners.len(),
                "subscriber scanned"
            );
            let owner: Weak<dyn Any + Send + Sync> = Arc::<S>::downgrade(subscriber);
            Ok(CachedSubscriber {
                owner,
                listeners: listeners.into(),
            })
        }
        Err(err) => {
            tracing::warn!(bus, subscriber = type_name::<S>(), error = %err, "subscriber scan failed");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;

    struct Hello;
    impl Event for Hello {}

    struct Greeter {
        on_hello: Listener,
        late: Option<Listener>,
        extra: Vec<Listener>,
    }

    impl Subscriber for Greeter {
        fn listeners(&self) -> BusResult<Vec<Listener>> {
            let name = type_name::<Self>();
            let mut out = Vec::new();
            self.on_hello.collect_listeners(name, "on_hello", &mut out)?;
            self.late.collect_listeners(name, "late", &mut out)?;
            self.extra.collect_listeners(name, "extra", &mut out)?;
            Ok(out)
        }
    }

    fn greeter(late: Option<Listener>) -> Arc<Greeter> {
        Arc::new(Greeter {
            on_hello: Listener::new(|_: &mut Hello| {}),
            late,
            extra: vec![
                Listener::new(|_: &mut Hello| {}),
                Listener::new(|_: &mut Hello| {}),
            ],
        })
    }

    #[test]
    fn scan_keeps_declaration_order() {
        let g = greeter(Some(Listener::new(|_: &mut Hello| {})));
        let scanned = scan(&g, "test").unwrap().listeners();
        assert_eq!(scanned.len(), 4);
        assert!(scanned[0].same_as(&g.on_hello));
        assert!(scanned[1].same_as(g.late.as_ref().unwrap()));
        assert!(scanned[2].same_as(&g.extra[0]));
        assert!(scanned[3].same_as(&g.extra[1]));
    }

    #[test]
    fn uninitialized_member_fails_scan() {
        let g = greeter(None);
        match scan(&g, "test") {
            Err(BusError::UninitializedListener { member, subscriber }) => {
                assert_eq!(member, "late");
                assert!(subscriber.ends_with("Greeter"));
            }
            other => panic!("unexpected scan result: {other:?}"),
        }
    }

    #[test]
    fn key_distinguishes_objects() {
        let a = greeter(None);
        let b = greeter(None);
        assert_eq!(SubscriberKey::of(&a), SubscriberKey::of(&a.clone()));
        assert_ne!(SubscriberKey::of(&a), SubscriberKey::of(&b));
    }

    #[test]
    fn cached_entry_pins_the_allocation() {
        let g = greeter(Some(Listener::new(|_: &mut Hello| {})));
        let key = SubscriberKey::of(&g);
        let cached = scan(&g, "test").unwrap();
        assert!(cached.is_live());

        drop(g);
        assert!(!cached.is_live());

        // 弱引用仍在，新对象不会落在同一地址上
        let next = greeter(None);
        assert_ne!(SubscriberKey::of(&next), key);
    }
}
