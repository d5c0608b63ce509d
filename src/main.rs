use std::env;
use std::process;

use rand::thread_rng;

use rsakit::cli::Driver;

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut driver = Driver::new();
    driver.parse_args(&args[1..]);

    if let Err(err) = driver.evaluate(&mut thread_rng()) {
        eprintln!("{}", err);
        process::exit(err.exit_code());
    }
}
