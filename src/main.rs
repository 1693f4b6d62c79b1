//! Host-side helper: `cargo run` builds the WASM bundle into `static/pkg` and
//! serves `static/` on a local port (`RIPPLE_PORT`, default 8000).

use std::process::{Command, ExitCode, Stdio};
use std::{env, thread, time::Duration};

fn main() -> ExitCode {
    ripple_canvas::init_logging();

    // Build wasm bundle
    log::info!("building WASM pkg …");
    match Command::new("wasm-pack")
        .args([
            "build",
            "--release",
            "--target",
            "web",
            "--out-dir",
            "static/pkg",
        ])
        .status()
    {
        Ok(st) if st.success() => {}
        Ok(_) => {
            log::error!("wasm-pack finished with errors. Ensure wasm-pack is installed (https://rustwasm.github.io/wasm-pack/).");
            return ExitCode::FAILURE;
        }
        Err(_) => {
            log::warn!("wasm-pack not found in PATH. Skipping wasm build; the site may serve stale artifacts.");
        }
    }

    let port = env::var("RIPPLE_PORT").unwrap_or_else(|_| "8000".to_owned());
    log::info!("serving static/ at http://127.0.0.1:{port} …");
    let mut server = match Command::new("python3")
        .args(["-m", "http.server", &port, "--directory", "static"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(child) => child,
        Err(err) => {
            log::error!("failed to start http server: {err}");
            return ExitCode::FAILURE;
        }
    };

    // Keep process alive while the server runs
    loop {
        match server.try_wait() {
            Ok(Some(status)) => {
                log::warn!("http server exited with {status}");
                return ExitCode::FAILURE;
            }
            Ok(None) => thread::sleep(Duration::from_secs(1)),
            Err(err) => {
                log::error!("lost track of http server: {err}");
                return ExitCode::FAILURE;
            }
        }
    }
}
