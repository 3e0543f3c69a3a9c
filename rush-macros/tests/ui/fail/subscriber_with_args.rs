use rush_macros::subscriber;

#[subscriber(strict)]
struct Logger {
    on_tick: rush_core::Listener,
}

fn main() {}
