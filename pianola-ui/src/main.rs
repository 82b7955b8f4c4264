mod app;
mod layout;
mod panes;
mod ui;

use std::fs::File;
use std::time::{Duration, Instant};

use pianola_core::config::{parse_sink_kind, Config};
use pianola_core::controller::ReleaseMode;
use pianola_core::sink::{self, LogSink, NoteSink};

use app::App;
use ui::{Color, InputSource, RatatuiBackend};

fn init_logging(verbose: bool) {
    use simplelog::{LevelFilter, WriteLogger};

    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    let log_path = dirs::config_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("pianola")
        .join("pianola.log");

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = File::create(&log_path).unwrap_or_else(|_| {
        File::create("/tmp/pianola.log").expect("Cannot create log file")
    });

    WriteLogger::init(log_level, simplelog::Config::default(), log_file)
        .expect("Failed to initialize logger");

    log::info!("pianola starting (log level: {:?})", log_level);
}

fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

/// Config file plus command-line overrides.
fn load_config(args: &[String]) -> Config {
    let mut config = Config::load();
    if let Some(kind) = flag_value(args, "--sink") {
        match parse_sink_kind(kind) {
            Some(kind) => config.set_sink_kind(kind),
            None => log::warn!("unknown sink '{}', keeping '{:?}'", kind, config.sink_kind()),
        }
    }
    if let Some(addr) = flag_value(args, "--osc") {
        config.set_osc_addr(addr);
    }
    if let Some(port) = flag_value(args, "--midi-port") {
        config.set_midi_port(port);
    }
    config
}

fn open_output(config: &Config) -> Box<dyn NoteSink> {
    match sink::open_sink(config) {
        Ok(sink) => {
            log::info!("note output: {}", sink.name());
            sink
        }
        Err(e) => {
            log::warn!("could not open {:?} output ({}), logging notes instead", config.sink_kind(), e);
            Box::new(LogSink)
        }
    }
}

fn main() -> std::io::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    init_logging(verbose);

    let config = load_config(&args);
    let output = open_output(&config);
    let mut app = match App::from_config(&config, output) {
        Ok(app) => app,
        Err(e) => {
            log::error!("keyboard layout is invalid: {}", e);
            eprintln!("pianola: {}", e);
            std::process::exit(1);
        }
    };

    let mut backend = RatatuiBackend::new()?;
    backend.start()?;
    if backend.keyboard_enhancement_enabled() {
        app.set_release_mode(ReleaseMode::Reported);
    } else {
        log::info!(
            "terminal does not report key releases; releasing after {:?}",
            config.release_timeout()
        );
    }

    let result = run(&mut backend, &mut app);

    app.shutdown();
    backend.stop()?;
    result
}

fn run(backend: &mut RatatuiBackend, app: &mut App) -> std::io::Result<()> {
    let mut last_render_time = Instant::now() - Duration::from_millis(16);

    loop {
        if let Some(event) = backend.poll_event(Duration::from_millis(2)) {
            app.handle_event(event);
            if app.should_quit() {
                break;
            }
        }

        app.tick(Instant::now());

        // Render at ~60fps
        let now_render = Instant::now();
        if now_render.duration_since(last_render_time).as_millis() >= 16 {
            last_render_time = now_render;

            let mut frame = backend.begin_frame(Color::SLATE_900)?;
            let area = frame.area();
            app.set_area(area);
            let mut rbuf = ui::RenderBuf::new(frame.buffer_mut());
            app.render(area, &mut rbuf);
            backend.end_frame(frame)?;
        }
    }

    log::info!("pianola exiting");
    Ok(())
}
