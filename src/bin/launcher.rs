//! Jarvis Launcher - GUI Application
//!
//! Run with: cargo run --bin jarvis-launcher

use iced::application;
use jarvis::gui::JarvisApp;
use jarvis::Config;

fn main() -> iced::Result {
    let level = Config::load()
        .map(|c| c.log_level)
        .unwrap_or_else(|_| "info".to_string());
    jarvis::init_logging(false, &level);

    application("Jarvis Assistant", JarvisApp::update, JarvisApp::view)
        .theme(JarvisApp::theme)
        .subscription(JarvisApp::subscription)
        .window_size((680.0, 600.0))
        .run_with(JarvisApp::new)
}
