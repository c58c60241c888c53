//! Main application entry point.

use formdesk_app::{AppConfig, AppError, DesignerApp};

type CreateResult = Result<Box<dyn eframe::App>, Box<dyn std::error::Error + Send + Sync>>;

fn main() -> Result<(), AppError> {
    env_logger::init();
    log::info!("Starting Formdesk");

    let config = AppConfig::from_env();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(config.title.clone())
            .with_inner_size([config.width, config.height])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "formdesk",
        options,
        Box::new(move |cc| create_app(cc, config)),
    )?;
    Ok(())
}

fn create_app(cc: &eframe::CreationContext<'_>, config: AppConfig) -> CreateResult {
    let app = DesignerApp::new(cc, config).map_err(|e| e.to_string())?;
    Ok(Box::new(app))
}
