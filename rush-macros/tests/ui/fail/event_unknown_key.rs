use rush_macros::event;

#[event(pausable)]
struct Tick {
    n: u32,
}

fn main() {}
