//! CLI command handlers for `CityAid`.
//!
//! Each command is implemented in its own submodule. Handlers print their
//! results and return errors to `main`, which reports them and exits non-zero.

pub mod challenges;
pub mod config;
pub mod contributions;
pub mod profile;
pub mod report;

use std::io::{self, Write};

/// Result type shared by command handlers
pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Ask a yes/no question on stdin; anything but y/yes is a no
pub fn confirm(prompt: &str) -> bool {
    print!("{prompt} (y/n): ");
    io::stdout().flush().ok();

    let mut response = String::new();
    io::stdin().read_line(&mut response).ok();
    let response = response.trim();
    response.eq_ignore_ascii_case("y") || response.eq_ignore_ascii_case("yes")
}
