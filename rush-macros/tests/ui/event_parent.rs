use rush_core::{Event, EventBus, FastEventBus, Listener, StoppableEvent, TypeChain};
use rush_macros::event;
use std::sync::{Arc, Mutex};

#[event(stoppable)]
#[derive(Default)]
struct Base {
    seen: Vec<&'static str>,
}

#[event(stoppable = base)]
#[derive(Default)]
struct Derived {
    #[parent]
    base: Base,
    extra: u8,
}

fn main() {
    assert_eq!(TypeChain::of::<Derived>().declared().len(), 2);

    let order = Arc::new(Mutex::new(Vec::new()));
    let bus = FastEventBus::new();
    {
        let order = order.clone();
        bus.subscribe(Listener::new(move |b: &mut Base| {
            order.lock().unwrap().push("base");
            b.seen.push("base");
        }));
    }
    {
        let order = order.clone();
        bus.subscribe(Listener::new(move |d: &mut Derived| {
            order.lock().unwrap().push("derived");
            d.extra += 1;
        }));
    }

    let d = bus.post(Derived::default());
    assert_eq!(*order.lock().unwrap(), vec!["derived", "base"]);
    assert_eq!(d.base.seen, vec!["base"]);
    assert_eq!(d.extra, 1);

    let mut d = Derived::default();
    d.stop();
    assert!(d.base.is_stopped());
    assert!(d.as_stoppable().unwrap().is_stopped());
}
