//! Host-side helper: `cargo run` builds the WASM bundle into `dist/pkg`,
//! applies the analytics-beacon rewrite to the served HTML, then starts a
//! local HTTP server for `dist/`.

use std::process::{Command, Stdio};
use std::{env, fs, path::Path, thread, time::Duration};

const BEACON_PLACEHOLDER: &str = "YOUR_BEACON_TOKEN_HERE";

fn main() {
    // Only meaningful on non-wasm targets.
    if env::var("TARGET").unwrap_or_default() == "wasm32-unknown-unknown" {
        return;
    }

    // 1. Compile the wasm bundle next to the staged static assets.
    println!("Building WASM pkg …");
    match Command::new("wasm-pack")
        .args(["build", "--release", "--target", "web", "--out-dir", "dist/pkg"])
        .status()
    {
        Ok(st) if st.success() => {}
        Ok(_) => {
            eprintln!("wasm-pack finished with errors. Ensure wasm-pack is installed (https://rustwasm.github.io/wasm-pack/).");
            std::process::exit(1);
        }
        Err(_) => {
            eprintln!("wasm-pack not found in PATH. Skipping wasm build; the site may serve stale artifacts.");
        }
    }

    // 2. Inject the analytics beacon token into the served HTML, if one
    //    is configured.
    inject_beacon_token();

    // 3. Serve `dist/` on 8000; the file server answers 404 for anything
    //    missing from the bundle.
    println!("Launching local server at http://127.0.0.1:8000 …");
    let _server = Command::new("python3")
        .args(["-m", "http.server", "8000", "--directory", "dist"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to start http server");

    // Keep process alive
    loop {
        thread::sleep(Duration::from_secs(60));
    }
}

/// Rewrite the `data-beacon` placeholder in `dist/index.html` from
/// `ANALYTICS_BEACON_TOKEN`. Unset or left at the placeholder, the HTML is
/// served untouched.
fn inject_beacon_token() {
    let token = match env::var("ANALYTICS_BEACON_TOKEN") {
        Ok(token) if !token.is_empty() && token != BEACON_PLACEHOLDER => token,
        _ => {
            println!("No analytics token configured; serving HTML untouched.");
            return;
        }
    };

    let index = Path::new("dist/index.html");
    match fs::read_to_string(index) {
        Ok(html) if html.contains(BEACON_PLACEHOLDER) => {
            let rewritten = html.replace(BEACON_PLACEHOLDER, &token);
            match fs::write(index, rewritten) {
                Ok(()) => println!("Analytics beacon token injected."),
                Err(err) => eprintln!("Failed to write {}: {err}", index.display()),
            }
        }
        Ok(_) => println!("No beacon placeholder in index.html; nothing to inject."),
        Err(err) => eprintln!("Failed to read {}: {err}", index.display()),
    }
}
