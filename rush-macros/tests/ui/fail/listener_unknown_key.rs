use rush_macros::subscriber;

#[subscriber]
struct Logger {
    #[listener(always)]
    on_tick: rush_core::Listener,
}

fn main() {}
