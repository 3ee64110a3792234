use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use stepbox::audio;
use stepbox::clock::seconds_per_pulse;
use stepbox::loader::WavLibrary;
use stepbox::middle::Middle;
use stepbox::midi::{MidiSink, MidirSink, NullSink};
use stepbox::pipeline::persistence;
use stepbox::pipeline::project::Settings;
use stepbox::sequencer::Sequencer;
use stepbox::tui;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    // stepbox [config.json] [preset.json]
    let mut args = std::env::args().skip(1);
    let config_path = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("config.json"));
    let preset_path = args.next().map(PathBuf::from);

    let settings = persistence::load_settings(&config_path)?;
    init_logging(&settings)?;

    let sequencer = match &preset_path {
        Some(path) => persistence::load_preset(path)?.to_sequencer(),
        None => Sequencer::default(),
    };

    let library = Arc::new(WavLibrary::new(&settings.sample_dir));
    let referenced = sequencer.referenced_samples();
    let loaded = library.preload(&referenced);
    log::info!("preloaded {loaded}/{} samples from {}", referenced.len(), library.root().display());

    let midi: Box<dyn MidiSink> = match MidirSink::open(&settings.device) {
        Ok(sink) => {
            log::info!("MIDI clock out: {}", sink.port_name());
            Box::new(sink)
        }
        Err(e) => {
            log::warn!("{e:#}; running without MIDI clock");
            Box::new(NullSink)
        }
    };

    let audio = audio::start_audio(library).context("could not open audio output")?;
    let mut middle = Middle::new(settings.bpm, midi, sequencer, audio.mixer().clone(), Instant::now());

    terminal::enable_raw_mode()?;
    let _guard = RawModeGuard; // auto drops when out of scope

    let backend = CrosstermBackend::new(std::io::stdout());
    let mut term = Terminal::new(backend)?;
    term.clear()?;
    term.hide_cursor()?;

    // half a pulse: coarse enough not to spin, fine enough that a step is
    // never late by more than a fraction of its length
    let poll = Duration::from_secs_f64(seconds_per_pulse(settings.bpm) / 2.0);

    while middle.is_online() {
        let ds = middle.display_state();
        term.draw(|frame| tui::view::render(frame, frame.area(), &ds))?;

        if let Some(key) = tui::input::poll_key(poll)? {
            middle.handle_key(key, Instant::now());
        }
        middle.tick(Instant::now());
    }

    term.show_cursor()?;
    term.clear()?;
    drop(term);
    drop(audio);
    log::info!("shut down");
    Ok(())
}

fn init_logging(settings: &Settings) -> anyhow::Result<()> {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    // stderr would scribble over the ui
    let path = &settings.log_file;
    let file = std::fs::File::create(path)
        .with_context(|| format!("could not create log file {}", path.display()))?;
    builder.target(env_logger::Target::Pipe(Box::new(file)));
    builder.init();
    Ok(())
}

struct RawModeGuard;
impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}
