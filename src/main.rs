//! Host-side helper: `cargo run` builds the wasm bundle into `static/pkg` and
//! serves `static/` on http://127.0.0.1:8000.

#[cfg(not(target_arch = "wasm32"))]
use std::process::{Command, ExitCode, Stdio};

#[cfg(not(target_arch = "wasm32"))]
const PORT: &str = "8000";

// The page itself is the wasm entry point.
#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("building wasm package");
    match Command::new("wasm-pack")
        .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
        .status()
    {
        Ok(status) if status.success() => {}
        Ok(status) => {
            log::error!("wasm-pack exited with {status}");
            return ExitCode::FAILURE;
        }
        Err(err) => {
            log::warn!("wasm-pack unavailable ({err}); serving whatever is in static/pkg");
        }
    }

    log::info!("serving static/ at http://127.0.0.1:{PORT}");
    let server = Command::new("python3")
        .args(["-m", "http.server", PORT, "--directory", "static"])
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .status();

    match server {
        Ok(status) if status.success() => ExitCode::SUCCESS,
        Ok(status) => {
            log::error!("http server exited with {status}");
            ExitCode::FAILURE
        }
        Err(err) => {
            log::error!("could not start http server: {err}");
            ExitCode::FAILURE
        }
    }
}
