use std::env;
use std::fs;
use std::path::PathBuf;
use std::process;

// Trunk post-build hook: rewrite absolute bundle paths so the viewer can be
// served from any sub-directory of the hosting page.
fn main() {
    let Ok(staging_dir) = env::var("TRUNK_STAGING_DIR") else {
        eprintln!("TRUNK_STAGING_DIR is not set, run this through Trunk");
        process::exit(1);
    };

    // Output name configured in Trunk.toml
    let staged_html_path = PathBuf::from(staging_dir).join("index.html");

    let html = match fs::read_to_string(&staged_html_path) {
        Ok(html) => html,
        Err(e) => {
            eprintln!("Failed to read {}: {e}", staged_html_path.display());
            process::exit(1);
        }
    };

    let html = html
        .replace("/car-viewer-engine.js", "./car-viewer-engine.js")
        .replace("/car-viewer-engine_bg.wasm", "./car-viewer-engine_bg.wasm");

    if let Err(e) = fs::write(&staged_html_path, html) {
        eprintln!("Failed to write {}: {e}", staged_html_path.display());
        process::exit(1);
    }
}
