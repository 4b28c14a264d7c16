use std::path::PathBuf;

pub const DEFAULT_FPS: u32 = 60;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub seed: Option<u64>,
    pub fps: u32,
    pub bg_color: (u8, u8, u8),
    pub log_file: Option<PathBuf>,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            fps: DEFAULT_FPS,
            bg_color: (0, 0, 0),
            log_file: None,
            verbose: false,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Command {
    Run(Config),
    Help,
}

pub fn print_usage() {
    eprintln!("braille-fireworks - 3D fireworks rendered with braille glyphs");
    eprintln!();
    eprintln!("Usage: braille-fireworks [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --seed N           Seed the random source for a reproducible show");
    eprintln!("  --fps N            Target frame rate (default {})", DEFAULT_FPS);
    eprintln!("  --bg-color RRGGBB  Set background color as hex (e.g., --bg-color 1a1b26)");
    eprintln!("  --log FILE         Write a log to FILE");
    eprintln!("  --verbose          Log launches and bursts too");
    eprintln!();
    eprintln!("Press 'q', ESC, or Ctrl+C to exit");
}

pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}

// Parses everything after the program name.
pub fn parse_args<I>(args: I) -> Result<Command, String>
where
    I: IntoIterator<Item = String>,
{
    let mut config = Config::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                let value = args.next().ok_or("--seed requires a number")?;
                let seed = value
                    .parse()
                    .map_err(|_| format!("Invalid seed: {}", value))?;
                config.seed = Some(seed);
            }
            "--fps" => {
                let value = args.next().ok_or("--fps requires a number")?;
                config.fps = match value.parse() {
                    Ok(fps) if fps > 0 => fps,
                    _ => return Err(format!("Invalid frame rate: {}", value)),
                };
            }
            "--bg-color" => {
                let value = args.next().ok_or("--bg-color requires a hex color value")?;
                config.bg_color = parse_hex_color(&value).ok_or_else(|| {
                    format!(
                        "Invalid hex color: {}\nExpected format: RRGGBB (e.g., 1a1b26)",
                        value
                    )
                })?;
            }
            "--log" => {
                let value = args.next().ok_or("--log requires a file path")?;
                config.log_file = Some(PathBuf::from(value));
            }
            "--verbose" | "-v" => config.verbose = true,
            "help" | "--help" | "-h" => return Ok(Command::Help),
            other => return Err(format!("Unknown option: {}", other)),
        }
    }

    Ok(Command::Run(config))
}
