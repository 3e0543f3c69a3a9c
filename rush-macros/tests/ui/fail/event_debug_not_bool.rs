use rush_macros::event;

#[event(debug = "yes")]
struct Tick {
    n: u32,
}

fn main() {}
