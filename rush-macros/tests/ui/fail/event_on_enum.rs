use rush_macros::event;

#[event]
enum Signal {
    Up,
    Down,
}

fn main() {}
