use rush_core::{
    BusConfig, BusError, CancellableEvent, ConcurrentEventBus, EventBus, FastEventBus, Listener,
    ReflectionEventBus, StoppableEvent,
};
use rush_macros::{event, subscriber};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error(transparent)]
    Bus(#[from] BusError),
    #[error("invalid log directive: {0}")]
    Directive(#[from] tracing_subscriber::filter::ParseError),
}

#[event(cancellable)]
#[derive(Clone, Default)]
struct Message {
    author: String,
    body: String,
}

#[event(stoppable, cancellable = message)]
#[derive(Default)]
struct ChatMessage {
    #[parent]
    message: Message,
    channel: String,
}

impl ChatMessage {
    fn new(channel: &str, author: &str, body: &str) -> Self {
        Self {
            message: Message {
                author: author.to_string(),
                body: body.to_string(),
                ..Default::default()
            },
            channel: channel.to_string(),
            ..Default::default()
        }
    }
}

#[subscriber]
struct Moderator {
    word_filter: Listener,
    shout_guard: Listener,
    #[listener]
    extra_rules: Vec<Listener>,
}

impl Moderator {
    fn new(banned: &[&'static str]) -> Self {
        let banned = banned.to_vec();
        Self {
            word_filter: Listener::with_priority(100, move |m: &mut ChatMessage| {
                if banned.iter().any(|w| m.message.body.contains(w)) {
                    tracing::info!(channel = %m.channel, author = %m.message.author, "message rejected");
                    m.cancel();
                    m.stop();
                }
            }),
            shout_guard: Listener::with_priority(50, |m: &mut ChatMessage| {
                let body = &m.message.body;
                if body.len() > 3 && body.chars().all(|c| !c.is_lowercase()) {
                    m.message.body = body.to_lowercase();
                }
            }),
            extra_rules: vec![Listener::new(|m: &mut ChatMessage| {
                if m.channel.is_empty() {
                    m.channel = "general".to_string();
                }
            })],
        }
    }
}

type Archive = Arc<Mutex<Vec<String>>>;

fn archiver(archive: &Archive) -> Listener {
    let archive = archive.clone();
    Listener::with_priority(-100, move |m: &mut Message| {
        if !m.is_cancelled() {
            if let Ok(mut lines) = archive.lock() {
                lines.push(format!("{}: {}", m.author, m.body));
            }
        }
    })
}

fn single_threaded(moderator: &Arc<Moderator>) -> Result<(), DemoError> {
    let bus = FastEventBus::with_config(
        BusConfig::builder()
            .name("chat")
            .log_dead_events(true)
            .build(),
    );
    let archive = Archive::default();

    bus.subscribe_object(moderator)?;
    bus.subscribe(archiver(&archive));

    for (channel, author, body) in [
        ("", "ada", "hello there"),
        ("rust", "linus", "LOUD NOISES"),
        ("rust", "mallory", "buy spam now"),
    ] {
        let msg = bus.post(ChatMessage::new(channel, author, body));
        tracing::info!(
            channel = %msg.channel,
            body = %msg.message.body,
            stopped = msg.is_stopped(),
            cancelled = msg.is_cancelled(),
            "chat message delivered"
        );
    }

    // 直接投递父类型：只有 Message 层的监听器参与
    bus.post(Message {
        author: "system".into(),
        body: "maintenance at noon".into(),
        ..Default::default()
    });

    bus.unsubscribe_object(moderator);
    let unmoderated = bus.post(ChatMessage::new("rust", "mallory", "buy spam now"));
    tracing::info!(
        cancelled = unmoderated.is_cancelled(),
        "after moderator left"
    );

    if let Ok(lines) = archive.lock() {
        for line in lines.iter() {
            tracing::info!(%line, "archived");
        }
    }
    Ok(())
}

fn multi_threaded(moderator: &Arc<Moderator>) -> Result<(), DemoError> {
    const WORKERS: usize = 4;
    const PER_WORKER: usize = 25;

    let bus = ConcurrentEventBus::with_config(BusConfig::builder().name("chat-mt").build());
    let delivered = Arc::new(AtomicUsize::new(0));
    {
        let delivered = delivered.clone();
        bus.subscribe(Listener::new(move |_: &mut Message| {
            delivered.fetch_add(1, Ordering::Relaxed);
        }));
    }
    bus.subscribe_object(moderator)?;

    thread::scope(|s| {
        for worker in 0..WORKERS {
            let bus = &bus;
            s.spawn(move || {
                for n in 0..PER_WORKER {
                    let body = if n % 5 == 0 { "spam" } else { "hi" };
                    bus.post(ChatMessage::new("load", &format!("worker-{worker}"), body));
                }
            });
        }
    });

    tracing::info!(
        posted = WORKERS * PER_WORKER,
        delivered = delivered.load(Ordering::Relaxed),
        "concurrent run finished"
    );
    Ok(())
}

fn main() -> Result<(), DemoError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("demo=info".parse()?))
        .init();

    let moderator = Arc::new(Moderator::new(&["spam"]));
    single_threaded(&moderator)?;
    multi_threaded(&moderator)?;
    Ok(())
}
