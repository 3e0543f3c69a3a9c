use rush_macros::event;

#[event]
struct Child {
    #[parent(first)]
    base: rush_core::StopFlag,
}

fn main() {}
