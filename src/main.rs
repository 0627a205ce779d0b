#![windows_subsystem = "windows"]

#[cfg(windows)]
fn main() -> anyhow::Result<()> {
    use desktop_volume_mixer::app::MixerApp;
    use desktop_volume_mixer::audio::wasapi::ComGuard;
    use desktop_volume_mixer::config::MixerConfig;
    use desktop_volume_mixer::logging;
    use eframe::egui;

    logging::init();

    // Held for the lifetime of the UI thread.
    let _com = ComGuard::new()?;

    let config = MixerConfig::default();
    let viewport = egui::ViewportBuilder::default()
        .with_title(config.widget_title.clone())
        .with_inner_size(config.widget_size)
        .with_resizable(false)
        .with_maximize_button(false)
        .with_minimize_button(false);

    let native_options = eframe::NativeOptions {
        viewport,
        renderer: eframe::Renderer::Glow,
        ..Default::default()
    };

    let app_name = config.widget_title.clone();
    eframe::run_native(
        &app_name,
        native_options,
        Box::new(move |cc| Ok(Box::new(MixerApp::new(cc, config)?))),
    )
    .map_err(|err| anyhow::anyhow!("failed starting mixer window: {err}"))?;

    Ok(())
}

#[cfg(not(windows))]
fn main() -> anyhow::Result<()> {
    anyhow::bail!("desktop-volume-mixer needs the Windows audio session and window APIs")
}
