//! Artlink relay server binary.
//! Run with: cargo run --bin artlink-server

use std::process::ExitCode;

use artlink_relay::start_artlink_relay;

fn main() -> ExitCode {
    start_artlink_relay::run()
}
