//! Host-side helper: `cargo run` builds the WASM bundle into `static/pkg`
//! and serves `static/` locally.

use std::process::{Command, Stdio};
use std::{thread, time::Duration};

fn main() {
    println!("Building WASM pkg …");
    let status = Command::new("wasm-pack")
        .args([
            "build",
            "--release",
            "--target",
            "web",
            "--out-dir",
            "static/pkg",
        ])
        .status();
    match status {
        Ok(st) if st.success() => {}
        Ok(_) => {
            eprintln!("wasm-pack finished with errors");
            std::process::exit(1);
        }
        Err(_) => {
            eprintln!("wasm-pack not found in PATH (https://rustwasm.github.io/wasm-pack/)");
            std::process::exit(1);
        }
    }

    println!("Launching local server at http://127.0.0.1:8000 …");
    let _server = Command::new("python3")
        .args(["-m", "http.server", "8000", "--directory", "static"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to start http server");

    loop {
        thread::sleep(Duration::from_secs(60));
    }
}
