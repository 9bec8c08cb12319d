use docker_launcher::{init_tracing, LaunchError, LaunchRequest, LauncherConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    init_tracing();

    let err = launch(LaunchRequest::from_env());

    eprintln!("{err}");
    if let LaunchError::Violation(v) = &err {
        if v.is_invalid_arguments() {
            eprintln!("Invalid Docker Arguments");
        }
    }
    ExitCode::from(1)
}

/// Validate and exec. Only returns on failure.
fn launch(request: LaunchRequest) -> LaunchError {
    let prepared = match LauncherConfig::deployment().and_then(|config| config.prepare(request)) {
        Ok(prepared) => prepared,
        Err(violation) => return violation.into(),
    };

    prepared.exec().into()
}
