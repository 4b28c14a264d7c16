use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{Clear, ClearType},
};
use log::{LevelFilter, info};
use std::env;
use std::io::{self, Write, stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

mod config;
mod show;
mod surface;
mod terminal;

use config::{Command, Config};
use show::{Physics, Show, pacing::FramePacer};
use surface::{Surface, braille::BrailleCanvas};
use terminal::TerminalGuard;

fn is_quit(code: KeyCode, modifiers: KeyModifiers) -> bool {
    code == KeyCode::Char('q')
        || code == KeyCode::Esc
        || (code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL))
}

// EINTR from a signal landing mid-poll just means no input this frame
fn poll_input() -> io::Result<Option<Event>> {
    match event::poll(Duration::ZERO) {
        Ok(true) => event::read().map(Some),
        Ok(false) => Ok(None),
        Err(err) if err.kind() == io::ErrorKind::Interrupted => Ok(None),
        Err(err) => Err(err),
    }
}

fn run_show<S: Surface>(config: &Config, seed: u64, shutdown: &AtomicBool) -> io::Result<()> {
    let (r, g, b) = config.bg_color;
    let background = S::rgb_color(r, g, b);

    let (cols, rows) = terminal::cell_size();
    let (width, height) = terminal::canvas_size(cols, rows);
    info!("terminal {}x{} cells, canvas {}x{} pixels", cols, rows, width, height);

    let mut surface = S::new(width, height, background);
    let mut show = Show::<S>::new(width, height, background, Physics::default(), seed);

    // Frames carry no '\n', so stdout's line buffering never splits them
    let mut screen = TerminalGuard::acquire(stdout().lock())?;
    let mut frame = Vec::with_capacity(1024 * 64);

    let mut pacer = FramePacer::new(config.fps);
    info!("frame budget {:?}", pacer.budget());

    loop {
        if shutdown.load(Ordering::Relaxed) {
            info!("interrupted by signal");
            break;
        }

        if let Some(event) = poll_input()? {
            match event {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if is_quit(key.code, key.modifiers) {
                        info!("quit requested");
                        break;
                    }
                }
                Event::Resize(cols, rows) => {
                    let (width, height) = terminal::canvas_size(cols, rows);
                    info!("resized to {}x{} cells", cols, rows);
                    surface = S::new(width, height, background);
                    show.resize(width, height);
                    let out = screen.writer();
                    execute!(out, Clear(ClearType::All))?;
                }
                _ => {}
            }
        }

        let dt = pacer.wait();

        show.update(dt);
        show.render(&mut surface);

        // Cursor home, then the whole frame in one write
        frame.clear();
        frame.extend_from_slice(b"\x1b[H");
        frame.extend_from_slice(surface.render()?);
        let out = screen.writer();
        out.write_all(&frame)?;
        out.flush()?;
    }

    info!(
        "{} fireworks launched over {:.1}s, {} particles still in the air",
        show.spawned(),
        show.elapsed(),
        show.particle_count()
    );
    Ok(())
}

fn main() -> io::Result<()> {
    let config = match config::parse_args(env::args().skip(1)) {
        Ok(Command::Run(config)) => config,
        Ok(Command::Help) => {
            config::print_usage();
            return Ok(());
        }
        Err(message) => {
            eprintln!("{}", message);
            eprintln!();
            config::print_usage();
            std::process::exit(1);
        }
    };

    if let Some(path) = &config.log_file {
        let level = if config.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };
        simple_logging::log_to_file(path, level)?;
    }

    let seed = config.seed.unwrap_or_else(|| fastrand::u64(..));
    info!("starting fireworks, seed {}", seed);

    let shutdown = terminal::install_shutdown_flag()?;
    run_show::<BrailleCanvas>(&config, seed, &shutdown)?;

    println!("Fireworks simulation ended.");
    Ok(())
}
