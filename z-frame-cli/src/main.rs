//! Headless driver of the Z-frame simulator.
mod cli;

fn main() {
    cli::Entry::main();
}
