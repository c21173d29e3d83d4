// Stages static assets into `dist/`; the wasm-pack bundle lands in
// `dist/pkg` when the helper binary runs.
use std::{fs, path::Path};

use fs_extra::dir::{copy, CopyOptions};

fn main() {
    println!("cargo:rerun-if-changed=static");

    let out_dir = Path::new("dist");
    if out_dir.exists() {
        fs::remove_dir_all(out_dir).ok();
    }
    fs::create_dir_all(out_dir).ok();

    let static_dir = Path::new("static");
    if static_dir.exists() {
        let mut options = CopyOptions::new();
        options.overwrite = true;
        options.content_only = true;
        if let Err(err) = copy(static_dir, out_dir, &options) {
            println!("cargo:warning=failed to stage static assets: {err}");
        }
    }
}
