use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use log::{Level, LevelFilter, Record};
use env_logger::{Builder, Env, fmt::{Color, Formatter}};
use std::io::Write;
use once_cell::sync::OnceCell;

static INSTANCE: OnceCell<Logger> = OnceCell::new();

/// Environment variable used to override the log filters, e.g. `LDPRUNE_LOG=pruner=trace`
pub const LOG_ENV_VAR: &str = "LDPRUNE_LOG";

const PROGRESS_TEMPLATE: &str = "{msg:<24} [{elapsed_precise}] {bar:40.cyan/blue} {pos:>8}/{len:8} ({eta})";

#[derive(Debug)]
pub struct Logger {
    multi_pg: MultiProgress,
}

impl Logger {
    /// Initialize the global logger. Subsequent calls are no-ops.
    ///
    /// # Panics
    /// - if another global logger was already set by a third party.
    pub fn init(verbosity: u8) {
        INSTANCE.get_or_init(|| Self::build(verbosity));
    }

    fn build(verbosity: u8) -> Self {
        let level  = Self::u8_to_loglevel(verbosity);
        let logger = Builder::new()
            .filter_level(level)
            .format(Self::format_record)
            .parse_env(Env::default().filter(LOG_ENV_VAR))
            .build();

        // Log records are printed above any active progress bar.
        let multi_pg = MultiProgress::new();
        LogWrapper::new(multi_pg.clone(), logger)
            .try_init()
            .expect("A global logger was already set");
        log::set_max_level(level);
        Self{multi_pg}
    }

    /// `[<timestamp> <LEVEL> <target>] <message>`. Errors also carry their source location.
    fn format_record(buf: &mut Formatter, record: &Record) -> std::io::Result<()> {
        let level = record.level();
        let mut level_style = buf.style();
        level_style.set_color(Self::level_color(level)).set_bold(true);

        let mut msg_style = buf.style();
        let origin = match level {
            Level::Error => {
                msg_style.set_intense(true);
                format!("(@ {}:{}) ", record.file().unwrap_or("unknown"), record.line().unwrap_or(0))
            },
            _ => String::new(),
        };

        writeln!(buf, "[{} {: <5} {}] {origin}{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S"),
            level_style.value(level),
            record.target(),
            msg_style.value(record.args())
        )
    }

    fn level_color(level: Level) -> Color {
        match level {
            Level::Error => Color::Red,
            Level::Warn  => Color::Yellow,
            Level::Info  => Color::Green,
            Level::Debug => Color::Blue,
            Level::Trace => Color::Cyan,
        }
    }

    /// 0: errors only. Each increment unlocks the next level, up to `trace`.
    fn u8_to_loglevel(verbosity: u8) -> LevelFilter {
        [LevelFilter::Error, LevelFilter::Warn, LevelFilter::Info, LevelFilter::Debug]
            .get(usize::from(verbosity))
            .copied()
            .unwrap_or(LevelFilter::Trace)
    }

    pub fn set_level(verbosity: u8) {
        log::set_max_level(Self::u8_to_loglevel(verbosity));
    }

    /// Shared `MultiProgress` of the global logger, if it was initialized.
    pub fn multi() -> Option<&'static MultiProgress> {
        INSTANCE.get().map(|logger| &logger.multi_pg)
    }

    /// Build a progress bar of length `len`.
    ///
    /// The bar is registered to the logger's `MultiProgress` when it exists, and hidden
    /// otherwise (e.g. when running as a library or within tests).
    pub fn progress_bar(len: u64, msg: impl Into<String>) -> ProgressBar {
        let style = ProgressStyle::with_template(PROGRESS_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        let bar = ProgressBar::new(len).with_style(style).with_message(msg.into());
        match Self::multi() {
            Some(multi) if log::max_level() >= LevelFilter::Info => multi.add(bar),
            _ => {
                bar.set_draw_target(ProgressDrawTarget::hidden());
                bar
            }
        }
    }
}
