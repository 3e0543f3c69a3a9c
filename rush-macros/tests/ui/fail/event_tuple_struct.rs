use rush_macros::event;

#[event]
struct Reading(u32);

fn main() {}
