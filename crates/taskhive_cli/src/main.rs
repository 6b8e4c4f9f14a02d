//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `taskhive_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use std::process::ExitCode;

fn main() -> ExitCode {
    println!("taskhive_core version={}", taskhive_core::core_version());

    match taskhive_core::db::open_db_in_memory() {
        Ok(_conn) => {
            println!(
                "taskhive_core schema_version={}",
                taskhive_core::db::migrations::latest_version()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("taskhive_core db_open failed: {err}");
            ExitCode::FAILURE
        }
    }
}
