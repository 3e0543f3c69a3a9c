use rush_macros::event;

#[event(stoppable, stoppable)]
struct Tick {
    n: u32,
}

fn main() {}
