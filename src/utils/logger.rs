use std::fs::{File, OpenOptions};

use simplelog::*;

use crate::{
    config::LogConfig,
    error::{BotError, BotResult},
};

// Earlier runs stay in the file; a restart only adds to it.
fn open_log_file(config: &LogConfig) -> BotResult<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)
        .map_err(|e| BotError::LoggerError(format!("Failed to open {}: {}", config.file.display(), e)))
}

fn build_logger(config: &LogConfig, file: File) -> Box<CombinedLogger> {
    CombinedLogger::new(vec![
        TermLogger::new(config.level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto),
        WriteLogger::new(config.level, Config::default(), file),
    ])
}

/// Logs to the console and to the append-only log file at the configured level.
pub fn init(config: &LogConfig) -> BotResult<()> {
    let file = open_log_file(config)?;
    let logger = build_logger(config, file);

    log::set_max_level(logger.level());
    log::set_boxed_logger(logger).map_err(|e| BotError::LoggerError(format!("Failed to initialize logger: {}", e)))?;

    info!("Logging to console and {}", config.file.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{io::Write, path::PathBuf};

    use log::{Log, Record};

    use super::*;

    fn temp_log(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("yogabot-{}-{}.log", name, std::process::id()))
    }

    #[test]
    fn test_log_file_is_appended() {
        let path = temp_log("append");
        std::fs::write(&path, "previous run\n").unwrap();
        let config = LogConfig {
            file: path.clone(),
            level: LevelFilter::Info,
        };

        let mut file = open_log_file(&config).unwrap();
        writeln!(file, "next run").unwrap();
        drop(file);

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "previous run\nnext run\n");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_records_reach_the_file_after_earlier_content() {
        let path = temp_log("records");
        std::fs::write(&path, "previous run\n").unwrap();
        let config = LogConfig {
            file: path.clone(),
            level: LevelFilter::Info,
        };

        let logger = build_logger(&config, open_log_file(&config).unwrap());
        logger.log(
            &Record::builder()
                .level(Level::Info)
                .target("yogabot")
                .args(format_args!("Catalog ready with 9 triggers"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(Level::Debug)
                .target("yogabot")
                .args(format_args!("Routing text trigger"))
                .build(),
        );
        logger.flush();

        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(written.starts_with("previous run\n"));
        assert!(written.contains("Catalog ready with 9 triggers"));
        assert!(!written.contains("Routing text trigger"));
    }

    #[test]
    fn test_unwritable_log_file() {
        let config = LogConfig {
            file: PathBuf::from("/nonexistent-dir/yogabot/bot.log"),
            level: LevelFilter::Info,
        };

        assert!(matches!(open_log_file(&config), Err(BotError::LoggerError(_))));
    }
}
