use spinwheel::{ui::setup_eframe_options, utils::init_logging, WheelApp};

fn main() -> eframe::Result {
    if let Err(e) = init_logging() {
        env_logger::init();
        log::warn!("File logging unavailable, using env_logger: {}", e);
    }

    #[cfg(feature = "puffin")]
    start_puffin_server();

    eframe::run_native(
        "spinwheel",
        setup_eframe_options(),
        Box::new(|cc| Ok(Box::new(WheelApp::new(cc)))),
    )
}

#[cfg(feature = "puffin")]
fn start_puffin_server() {
    puffin::set_scopes_on(true);
    match puffin_http::Server::new("127.0.0.1:8585") {
        Ok(puffin_server) => {
            log::info!("Run:  cargo install puffin_viewer && puffin_viewer --url 127.0.0.1:8585");
            // keep the server alive for the lifetime of the process
            std::mem::forget(puffin_server);
        }
        Err(err) => {
            log::error!("Failed to start puffin server: {}", err);
        }
    }
}
