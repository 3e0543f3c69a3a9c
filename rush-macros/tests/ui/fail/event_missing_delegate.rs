use rush_macros::event;

#[event(stoppable = base)]
struct Tick {
    n: u32,
}

fn main() {}
