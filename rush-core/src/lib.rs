//! rush 事件总线基础库（rush-core）
//!
//! 进程内、同步的发布/订阅分发器：
//! - 事件模型（`event`）：`Event` 及可停止/可取消两种控制能力；
//! - 类型层级（`hierarchy`）：以组合声明祖先，投递子类型时父类型监听器同样收到；
//! - 监听器（`listener`）与注册表（`registry`）：按优先级排序、按身份增删；
//! - 订阅者（`subscriber`）：一次扫描、按 `Arc` 身份缓存监听器成员；
//! - 事件系统（`eventing`）：`FastEventBus` 与 `ConcurrentEventBus` 两种并发变体。
//!
//! 典型用法：
//! 1. 用 `rush_macros::event` 声明事件（可停止、可取消、父类型）；
//! 2. 用 `Listener::new` / `Listener::with_priority` 创建监听器（`Listener::any_event`
//!    等监听所有事件或某种能力），或用
//!    `rush_macros::subscriber` 把一组监听器字段声明为订阅者；
//! 3. 选择总线变体，`subscribe` 后 `post`，根据返回的事件检查停止/取消标志。
//!
//! ```
//! use rush_core::{Event, EventBus, FastEventBus, Listener};
//!
//! struct Greeting(String);
//! impl Event for Greeting {}
//!
//! let bus = FastEventBus::new();
//! bus.subscribe(Listener::new(|g: &mut Greeting| g.0.push_str(", world")));
//!
//! let Greeting(text) = bus.post(Greeting("hello".into()));
//! assert_eq!(text, "hello, world");
//! ```
//!
pub mod config;
pub mod error;
pub mod event;
pub mod eventing;
pub mod hierarchy;
pub mod listener;
pub mod registry;
pub mod subscriber;

pub use config::BusConfig;
pub use error::{BusError, BusResult};
pub use event::{CancelFlag, CancellableEvent, Event, OneWayFlag, StopFlag, StoppableEvent};
pub use eventing::{ConcurrentEventBus, EventBus, FastEventBus, ReflectionEventBus};
pub use hierarchy::{Hierarchy, Level, TypeChain};
pub use listener::Listener;
pub use registry::{ListenerList, ListenerRegistry};
pub use subscriber::{ListenerSource, Subscriber};

// 允许在本 crate 内部通过 ::rush_core 进行自引用，
// 以便过程宏在本 crate 的单元测试中也能解析到 ::rush_core 路径。
extern crate self as rush_core;
