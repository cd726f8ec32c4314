mod app;
mod bucket;
mod launch;
mod navigate;
mod renderer;
mod thumbnail;
mod zoom;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli_args = std::env::args().skip(1).collect::<Vec<_>>();
    let (initial_folder, initial_status) = match launch::parse_initial_folder_from_args(&cli_args)
    {
        Ok(folder) => (folder, None),
        Err(err) => {
            log::error!("{err}");
            (None, Some(format!("Launch args error: {err}")))
        }
    };

    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title(app::APP_TITLE)
            .with_inner_size([1200.0, 800.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        app::APP_TITLE,
        native_options,
        Box::new(move |_cc| {
            Ok(Box::new(app::ImageGridApp::new(
                initial_folder.clone(),
                initial_status.clone(),
            )))
        }),
    )
}
