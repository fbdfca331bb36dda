use clap::Parser;
use std::process;
use tgxrd_ingest::cli::{self, Args};

fn main() {
    let args = Args::parse();

    match cli::run(args) {
        Ok(stats) if stats.folders_failed > 0 => process::exit(1),
        Ok(_) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
