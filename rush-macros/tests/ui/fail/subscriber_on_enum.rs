use rush_macros::subscriber;

#[subscriber]
enum Handlers {
    One,
}

fn main() {}
