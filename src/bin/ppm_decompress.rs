//! Decompresses a stream produced by `ppm-compress`. Usage:
//! `ppm-decompress <input> <output>`.

use std::env;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::process;

use arcode::{frontend, Result};

fn run(input_path: &str, output_path: &str) -> Result<()> {
    let input = BufReader::new(File::open(input_path)?);
    let output = BufWriter::new(File::create(output_path)?);
    frontend::ppm_decompress(frontend::DEFAULT_PPM_ORDER, input, output)
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <input> <output>", args.first().map(String::as_str).unwrap_or("ppm-decompress"));
        process::exit(1);
    }
    if let Err(e) = run(&args[1], &args[2]) {
        eprintln!("ppm-decompress: {e}");
        process::exit(1);
    }
}
