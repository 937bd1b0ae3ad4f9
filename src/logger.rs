use crate::config::BookingConfig;
use chrono::Local;
use fern::Dispatch;
use fern::colors::{Color, ColoredLevelConfig};

/// Installs the global logger: colored lines on stderr, plus plain lines in
/// the configured log file. Call once at the top of `main`.
pub fn init(config: &BookingConfig) {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::BrightBlack);

    let console = Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .chain(std::io::stderr());

    let mut dispatch = Dispatch::new().level(config.log_level).chain(console);

    if let Some(path) = &config.log_file {
        match fern::log_file(path) {
            Ok(file) => {
                dispatch = dispatch.chain(
                    Dispatch::new()
                        .format(|out, message, record| {
                            out.finish(format_args!(
                                "[{} {} {}] {}",
                                Local::now().format("%Y-%m-%d %H:%M:%S"),
                                record.level(),
                                record.target(),
                                message
                            ))
                        })
                        .chain(file),
                );
            }
            Err(err) => eprintln!("Failed to open log file '{}': {err}", path.display()),
        }
    }

    if let Err(err) = dispatch.apply() {
        eprintln!("Failed to apply logger configuration: {err}");
    }
}
