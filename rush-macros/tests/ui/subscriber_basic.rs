use rush_core::{
    BusError, EventBus, FastEventBus, Listener, ReflectionEventBus, Subscriber,
};
use rush_macros::{event, subscriber};
use std::sync::Arc;

#[event]
#[derive(Default)]
struct Ping {
    hits: u32,
}

#[subscriber]
struct Pinger {
    first: Listener,
    #[listener]
    many: Vec<Listener>,
    #[listener]
    maybe: Option<Listener>,
    #[listener(skip)]
    detached: Listener,
    label: &'static str,
}

#[subscriber]
struct Pair(Listener, u32);

#[subscriber]
struct Nothing;

fn bump() -> Listener {
    Listener::new(|p: &mut Ping| p.hits += 1)
}

fn main() {
    let pinger = Arc::new(Pinger {
        first: bump(),
        many: vec![bump(), bump()],
        maybe: Some(bump()),
        detached: bump(),
        label: "pinger",
    });
    let listeners = pinger.listeners().unwrap();
    assert_eq!(listeners.len(), 4);
    assert!(listeners[0].same_as(&pinger.first));
    assert!(!listeners.iter().any(|l| l.same_as(&pinger.detached)));
    let _ = pinger.label;

    let bus = FastEventBus::new();
    bus.subscribe_object(&pinger).unwrap();
    assert_eq!(bus.post(Ping::default()).hits, 4);

    let pair = Pair(bump(), 7);
    assert_eq!(pair.listeners().unwrap().len(), 1);
    let _ = pair.1;
    assert!(Nothing.listeners().unwrap().is_empty());

    let broken = Arc::new(Pinger {
        first: bump(),
        many: Vec::new(),
        maybe: None,
        detached: bump(),
        label: "broken",
    });
    match bus.subscribe_object(&broken) {
        Err(BusError::UninitializedListener { member, .. }) => assert_eq!(member, "maybe"),
        other => panic!("unexpected: {other:?}"),
    }
}
