//! Statement Digest CLI
//!
//! Summarizes a CSV batch of account movements and notifies the account
//! holder.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- movements.csv > summary.csv
//! cargo run -- --strategy sequential movements.csv > summary.csv
//! cargo run -- --pool-size 8 --recipient ops@example.com --outbox ./outbox movements.csv
//! cargo run -- --database digest.db movements.csv
//! ```
//!
//! The summary (`id,date,amount,category`) goes to stdout; logs go to stderr
//! and are filtered with `RUST_LOG`.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (file not found, malformed row, delivery failure, etc.)

use statement_digest::{cli, logging};
use std::process;

fn main() {
    logging::init_logging();

    let args = cli::parse_args();

    let mut output = std::io::stdout();
    if let Err(e) = cli::run(&args, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
