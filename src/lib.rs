pub mod channel;
pub mod commands;
pub mod config;
pub mod host;
pub mod logging;
pub mod router;

use std::sync::Arc;

use tauri::{AppHandle, Listener, Runtime, WebviewUrl, WebviewWindowBuilder};

use config::{AppConfig, WindowConfig};
use host::dialog::TauriDialogs;
use host::{Host, RunMode};
use router::Route;

/// Label of the single application window.
pub const MAIN_WINDOW: &str = "main";

/// Create the main window on the router's landing page.
fn create_main_window<R: Runtime>(
    app: &AppHandle<R>,
    config: &WindowConfig,
    devtools: bool,
) -> tauri::Result<()> {
    let landing = Route::default();

    let window = WebviewWindowBuilder::new(
        app,
        MAIN_WINDOW,
        WebviewUrl::App(landing.entry_url().into()),
    )
    .title(&config.title)
    .inner_size(config.width, config.height)
    .build()?;

    if devtools {
        window.open_devtools();
    }

    tracing::info!(
        label = MAIN_WINDOW,
        route = %landing.path(),
        width = config.width,
        height = config.height,
        "window created"
    );
    Ok(())
}

/// Exit cleanly when the parent process asks us to (development only).
fn spawn_shutdown_listener<R: Runtime>(app: AppHandle<R>) {
    tauri::async_runtime::spawn(async move {
        match wait_for_termination().await {
            Ok(()) => {
                tracing::info!("termination signal received, exiting");
                app.exit(0);
            }
            Err(e) => tracing::warn!(error = %e, "could not listen for termination signal"),
        }
    });
}

#[cfg(unix)]
async fn wait_for_termination() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    sigterm.recv().await;
    Ok(())
}

#[cfg(not(unix))]
async fn wait_for_termination() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}

/// Run the Tauri application.
pub fn run() {
    let config = AppConfig::load();
    let data_dirs = config.data_dirs();

    match logging::init(&data_dirs.log_dir(), &config.log_filter) {
        Ok(log_path) => tracing::info!(log_file = %log_path.display(), "logging initialised"),
        Err(e) => {
            logging::init_stderr(&config.log_filter);
            tracing::warn!(error = %e, "file logging unavailable, logging to stderr");
        }
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        mode = ?config.mode,
        data_dir = %data_dirs.root().display(),
        pid = std::process::id(),
        "=== Dieor Inventory starting ==="
    );

    let (bridge, requests) = channel::channel(config.channel_capacity);
    let window_config = config.window.clone();
    let devtools = config.devtools();
    let mode = config.mode;

    let app = tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .manage(bridge)
        .setup(move |app| {
            // The data root is fixed here and handed to the host; nothing
            // else computes it.
            let dialogs = Arc::new(TauriDialogs::new(app.handle().clone()));
            let host = Arc::new(Host::new(data_dirs, dialogs));
            tauri::async_runtime::spawn(host.serve(requests));

            app.listen(router::ROUTE_CHANGED_EVENT, |event| {
                router::on_route_changed(event.payload());
            });
            create_main_window(app.handle(), &window_config, devtools)?;

            if mode == RunMode::Development {
                spawn_shutdown_listener(app.handle().clone());
            }
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::bridge::show_open_dialog,
            commands::bridge::show_save_dialog,
            commands::bridge::read_file,
            commands::bridge::copy_file,
            commands::bridge::save_json_file,
            commands::bridge::load_json_file,
            commands::bridge::write_file,
        ])
        .build(tauri::generate_context!())
        .expect("error while building tauri application");

    app.run(move |handle, event| on_run_event(handle, event, &config));
}

/// Window lifecycle: quit when the last window closes, except on macOS where
/// the app stays resident and a dock click brings the window back.
#[cfg_attr(not(target_os = "macos"), allow(unused_variables))]
fn on_run_event<R: Runtime>(handle: &AppHandle<R>, event: tauri::RunEvent, config: &AppConfig) {
    match event {
        // `code` is None when the last window closed rather than an explicit exit.
        tauri::RunEvent::ExitRequested { code: None, api, .. } if cfg!(target_os = "macos") => {
            tracing::info!("all windows closed, staying resident");
            api.prevent_exit();
        }
        #[cfg(target_os = "macos")]
        tauri::RunEvent::Reopen {
            has_visible_windows: false,
            ..
        } => {
            use tauri::Manager;

            if handle.get_webview_window(MAIN_WINDOW).is_none() {
                if let Err(e) = create_main_window(handle, &config.window, config.devtools()) {
                    tracing::error!(error = %e, "failed to recreate window");
                }
            }
        }
        tauri::RunEvent::Exit => tracing::info!("application exiting"),
        _ => {}
    }
}
