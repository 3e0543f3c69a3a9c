//! rush 过程宏（rush-macros）
//!
//! - `#[event]`：为结构体实现 `rush_core::Event`，可声明父类型与停止/取消能力；
//! - `#[subscriber]`：为结构体实现 `rush_core::Subscriber`，编译期枚举监听器字段。
//!
use proc_macro::TokenStream;

mod derive_utils;
mod event;
mod field_utils;
mod subscriber;

/// 事件宏
///
/// ```ignore
/// #[event(stoppable, cancellable)]
/// struct ChatMessage {
///     text: String,
/// }
///
/// #[event(stoppable = base)]
/// struct PrivateMessage {
///     #[parent]
///     base: ChatMessage,
///     to: String,
/// }
/// ```
///
/// 支持参数：
/// - `stoppable` / `stoppable = field`
/// - `cancellable` / `cancellable = field`
/// - `debug = true|false`（默认 `true`）
#[proc_macro_attribute]
pub fn event(attr: TokenStream, item: TokenStream) -> TokenStream {
    event::expand(attr, item)
}

/// 订阅者宏
///
/// ```ignore
/// #[subscriber]
/// struct ChatLogger {
///     on_message: Listener,
///     #[listener]
///     extra: Vec<Listener>,
///     #[listener(skip)]
///     detached: Listener,
/// }
/// ```
#[proc_macro_attribute]
pub fn subscriber(attr: TokenStream, item: TokenStream) -> TokenStream {
    subscriber::expand(attr, item)
}
