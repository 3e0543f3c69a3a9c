use rush_core::{CancelFlag, CancellableEvent, Event, StopFlag, StoppableEvent};
use rush_macros::event;

// 缺失的 stopped/cancelled 字段由宏补齐
#[event(stoppable, cancellable)]
#[derive(Default)]
struct Request {
    path: String,
}

// 已声明的标志字段直接复用
#[event(stoppable, debug = false)]
struct Manual {
    stopped: StopFlag,
}

fn main() {
    let mut r = Request::default();
    assert!(!r.is_stopped());
    r.stop();
    r.cancel();
    assert!(r.as_stoppable().unwrap().is_stopped());
    assert!(r.as_cancellable().unwrap().is_cancelled());
    let _: &CancelFlag = &r.cancelled;
    let _ = r.path;

    let m = Manual { stopped: StopFlag::new() };
    assert!(!m.is_stopped());
}
