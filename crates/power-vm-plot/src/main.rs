use std::io::Write;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use env_logger::Builder;

use power_vm_plot::render_report;

const USAGE: &str = "Usage: power-vm-plot <csv_file>";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
/// Plots power and VM count measurements from a CSV file into <csv_file stem>_all_metrics.png
struct Args {
    /// Path to CSV file with timestamp, watts, num_vm, memory_usage, cpu_usage, volts, amps and kwh columns
    csv_file: Option<PathBuf>,
}

fn init_logger() {
    Builder::from_default_env()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();
}

fn main() {
    init_logger();
    let args = Args::parse();

    let Some(input) = args.csv_file else {
        println!("{}", USAGE);
        process::exit(1);
    };
    if let Err(err) = render_report(&input) {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}
