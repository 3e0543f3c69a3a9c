use rush_core::{Event, EventBus, FastEventBus, Listener};
use rush_macros::event;

#[event]
struct Tick {
    n: u32,
}

fn main() {
    // Debug 默认开启
    let _ = format!("{:?}", Tick { n: 0 });

    let bus = FastEventBus::new();
    bus.subscribe(Listener::new(|t: &mut Tick| t.n += 1));
    let Tick { n } = bus.post(Tick { n: 1 });
    assert_eq!(n, 2);

    let t = Tick { n: 0 };
    assert!(t.as_stoppable().is_none());
    assert!(t.as_cancellable().is_none());
}
