use std::fs::File;
use std::sync::Mutex;

use chrono::Local;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// `2024-05-01 10:32:07,412` style timestamps.
pub struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> core::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S,%3f"))
    }
}

pub fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("debug"))
}

/// Routes events to the log file, truncating it first. If the file can't be
/// created the program runs without a log.
pub fn init(config: &Config) {
    let file = match File::create(&config.log_file) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Unable to create log file {}: {}", config.log_file.display(), e);
            return;
        }
    };

    let installed = tracing_subscriber::fmt()
        .with_timer(LocalTime)
        .with_target(false)
        .with_ansi(false)
        .with_env_filter(filter(&config.log_level))
        .with_writer(Mutex::new(file))
        .try_init();

    if let Err(e) = installed {
        eprintln!("Logging disabled: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_shape() {
        let mut out = String::new();
        LocalTime.format_time(&mut Writer::new(&mut out)).unwrap();
        assert_eq!(out.len(), 23);
        assert_eq!(&out[10..11], " ");
        assert_eq!(&out[19..20], ",");
    }
}
