//! Dust Scrub entry point
//!
//! Native demo: sweeps the brush across the mask row by row through the same
//! input path a windowed host would use, then reports how the run ended.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec2;

    use dust_scrub::audio::ScrubAudio;
    use dust_scrub::platform::{InputCollector, OrthoCamera, Viewport};
    use dust_scrub::renderer::{Texel, region_texels, texel_bytes};
    use dust_scrub::sim::{GamePhase, ScrubSession};
    use dust_scrub::{ConfigError, SessionConfig};

    const FRAME_DT: f64 = 1.0 / 60.0;
    /// World units per frame (3 units/s at 60 Hz)
    const STEP: f32 = 0.05;

    pub fn run(config: &SessionConfig) -> Result<GamePhase, ConfigError> {
        let mut session = ScrubSession::from_config(config)?;
        let camera = OrthoCamera::new(Viewport::new(800.0, 600.0));
        let mut input = InputCollector::new();
        let mut audio = ScrubAudio::new(config.audio, config.seed);
        let dust = Texel::from_rgba(config.dust_color);

        let mut time = 0.0f64;
        let mut uploaded_bytes = 0usize;

        // Bigger brush for the sweep
        input.scroll(1.0);
        session.tick(&input.take());
        log::info!(
            "Brush radius {:.2} units ({:.1}px cursor)",
            session.brush().radius(),
            camera.world_to_screen_length(session.brush().radius())
        );

        let center = session.transform().center;
        let half = session.transform().world_size * 0.5;
        let spacing = session.brush().radius() * 1.6;
        let mut y = center.y + half.y - spacing * 0.5;
        let mut left_to_right = true;

        'rows: while y > center.y - half.y {
            let (x0, x1) = if left_to_right {
                (center.x - half.x, center.x + half.x)
            } else {
                (center.x + half.x, center.x - half.x)
            };
            let n = ((x1 - x0).abs() / STEP).ceil().max(1.0) as u32;

            for i in 0..=n {
                let world = Vec2::new(x0 + (x1 - x0) * i as f32 / n as f32, y);
                let screen = camera.world_to_screen(world);
                if i == 0 {
                    input.pointer_down(&camera, screen, time);
                } else {
                    input.pointer_move(&camera, screen, time);
                }
                if i == n {
                    input.pointer_up();
                }

                let report = session.tick(&input.take());
                if let Some(cue) = audio.update(report.scrubbing, time) {
                    log::debug!("Audio cue {:?}", cue);
                }
                if let Some(rect) = session.take_dirty() {
                    uploaded_bytes += texel_bytes(&region_texels(session.mask(), rect, dust)).len();
                }
                time += FRAME_DT;

                if let Some(event) = report.event {
                    log::info!("Terminal event {:?} at t={:.2}s", event, time);
                    break 'rows;
                }
            }

            log::info!("Row y={:.2}: {:.1}% cleared", y, session.progress() * 100.0);
            y -= spacing;
            left_to_right = !left_to_right;
        }

        if let Some(cue) = audio.stop() {
            log::debug!("Audio cue {:?}", cue);
        }
        log::info!("Uploaded {} texel bytes over {:.2}s", uploaded_bytes, time);
        let mask = session.mask();
        log::info!(
            "Picture center revealed: {}",
            mask.is_cleared(mask.width() / 2, mask.height() / 2)
        );

        Ok(session.phase())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use dust_scrub::SessionConfig;
    use dust_scrub::sim::GamePhase;

    env_logger::init();
    log::info!("Dust Scrub (native demo) starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => match SessionConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load config {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => SessionConfig::default(),
    };

    match demo::run(&config) {
        Ok(GamePhase::Won) => println!("Cleared! The picture is revealed."),
        Ok(GamePhase::Lost(reason)) => println!("Lost: {}", reason.message()),
        Ok(GamePhase::Playing) => println!("Sweep finished without reaching the win threshold"),
        Err(e) => {
            log::error!("Session setup failed: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No native entry point on the web; hosts drive `ScrubSession` directly
}
