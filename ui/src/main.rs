#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use shoebox_business::{BusinessConfig, CachedSession, SESSION_CACHE_KEY};
use shoebox_ui::state::State;

mod alloc {
    #[global_allocator]
    static MALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;
}

fn main() -> eframe::Result {
    // Log to stderr (if you run with `RUST_LOG=debug`).
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter_module("egui_winit::clipboard", log::LevelFilter::Off)
        .init();

    let config = BusinessConfig::from_env().unwrap_or_else(|err| {
        log::error!("Config: {err}; falling back to defaults");
        BusinessConfig::default()
    });
    log::info!("Config: using API at {}", config.api_base_url);

    // Outlives the window; every collaborator call runs here.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("shoebox-io")
        .build()
        .map_err(|err| eframe::Error::AppCreation(Box::new(err)))?;
    let handle = runtime.handle().clone();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 768.0])
            .with_min_inner_size([360.0, 480.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Shoebox",
        native_options,
        Box::new(move |cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);

            let cache: Option<CachedSession> = cc
                .storage
                .and_then(|storage| eframe::get_value(storage, SESSION_CACHE_KEY))
                .flatten();
            if let Some(cached) = &cache {
                log::info!("Session: restoring cached user {}", cached.user.username);
            }

            let state = State::new(config, handle, cache)?;
            Ok(Box::new(shoebox_ui::ShoeboxApp::new(state)))
        }),
    )
}
