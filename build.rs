const BRIDGE_COMMANDS: &[&str] = &[
    "show_open_dialog",
    "show_save_dialog",
    "read_file",
    "copy_file",
    "save_json_file",
    "load_json_file",
    "write_file",
];

fn main() {
    // `generate_context!` requires `frontendDist` to exist. Write a placeholder
    // when the frontend has not been built so the host compiles on its own.
    let manifest_dir = std::path::PathBuf::from(
        std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into()),
    );
    let index_html = manifest_dir.join("dist").join("index.html");
    if !index_html.exists() {
        if let Some(dist_dir) = index_html.parent() {
            let _ = std::fs::create_dir_all(dist_dir);
        }
        let placeholder = r#"<!doctype html>
<meta charset="utf-8" />
<title>Dieor Inventory App</title>
<body>Frontend assets are not bundled in this build.</body>
"#;
        if let Err(err) = std::fs::write(&index_html, placeholder) {
            println!(
                "cargo:warning=failed to write placeholder index.html ({}): {err}",
                index_html.display()
            );
        }
    }

    // Only the bridge commands get generated permissions; capabilities/ grants
    // exactly these to the main window.
    let attributes = tauri_build::Attributes::new()
        .app_manifest(tauri_build::AppManifest::new().commands(BRIDGE_COMMANDS));
    tauri_build::try_build(attributes).expect("failed to run tauri-build");
}
