use colored::Colorize;
use race_memory_tour::{Tour, TourSettings};
use std::io;
use std::process;

fn main() {
    println!("{}\n", "=== Race Memory Tour ===".bold());

    let mut out = io::stdout();
    if let Err(err) = Tour::new(TourSettings::default()).run(&mut out) {
        eprintln!("{} {}", "error:".red().bold(), err);
        process::exit(1);
    }
}
