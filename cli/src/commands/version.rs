//! Version command

use std::process::ExitCode;

use crate::app::AppContext;

/// Run the version command.
pub fn run(app: &AppContext) -> ExitCode {
    let version = env!("CARGO_PKG_VERSION");

    if app.is_json() {
        println!(r#"{{"version":"{version}"}}"#);
    } else {
        println!("launcher {version}");
    }
    ExitCode::SUCCESS
}
