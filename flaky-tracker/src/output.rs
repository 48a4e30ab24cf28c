// Copyright (c) The flaky-tracker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use clap::{
    Args, ValueEnum,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use flaky_analyzer::write_str::WriteStr;
use owo_colors::{OwoColorize, Style};
use std::{
    fmt,
    io::{self, BufWriter, StdoutLock, Write},
    sync::Once,
};
use tracing::{
    Event, Level, Subscriber,
    field::{Field, Visit},
    level_filters::LevelFilter,
};
use tracing_subscriber::{
    Layer,
    filter::Targets,
    fmt::{FmtContext, FormatEvent, FormatFields, format},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

/// Environment variable used to configure log levels, in `tracing_subscriber` target syntax.
pub(crate) const LOG_ENV: &str = "FLAKY_TRACKER_LOG";

/// Events logged to this target are printed without an `error:`/`warning:` prefix.
pub(crate) const NO_HEADING_TARGET: &str = "flaky_tracker::no_heading";

/// Help output styles, matching the colors used for reports.
pub(crate) const fn clap_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Blue.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Blue.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Magenta.on_default().effects(Effects::BOLD))
        .placeholder(AnsiColor::Magenta.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default().effects(Effects::BOLD))
        .invalid(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
}

#[derive(Copy, Clone, Debug, Args)]
#[must_use]
pub(crate) struct OutputOpts {
    /// Verbose output (also enables debug logging)
    #[arg(long, short, global = true, env = "FLAKY_TRACKER_VERBOSE")]
    pub(crate) verbose: bool,

    /// Produce color output: auto, always, never
    #[arg(
        long,
        value_enum,
        default_value_t,
        hide_possible_values = true,
        global = true,
        value_name = "WHEN",
        env = "FLAKY_TRACKER_COLOR"
    )]
    pub(crate) color: Color,
}

impl OutputOpts {
    /// Installs the global logger and returns the resulting context.
    pub(crate) fn init(self) -> OutputContext {
        let context = OutputContext {
            verbose: self.verbose,
            color: self.color,
        };
        install_logger(
            context.verbose,
            context.color.should_colorize(supports_color::Stream::Stderr),
        );
        context
    }
}

/// Output settings shared by every command.
#[derive(Copy, Clone, Debug)]
#[must_use]
pub struct OutputContext {
    pub(crate) verbose: bool,
    pub(crate) color: Color,
}

impl OutputContext {
    /// Returns general stderr styles for the current output context.
    pub fn stderr_styles(&self) -> StderrStyles {
        if self.color.should_colorize(supports_color::Stream::Stderr) {
            StderrStyles::colorized()
        } else {
            StderrStyles::default()
        }
    }

    /// Returns true if reports written to stdout should be colorized.
    pub(crate) fn colorize_stdout(&self) -> bool {
        self.color.should_colorize(supports_color::Stream::Stdout)
    }
}

/// When to produce colored output.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
#[must_use]
pub enum Color {
    /// Color if the stream is a terminal that supports it.
    #[default]
    Auto,
    /// Always color.
    Always,
    /// Never color.
    Never,
}

impl Color {
    pub(crate) fn should_colorize(self, stream: supports_color::Stream) -> bool {
        match self {
            Self::Auto => supports_color::on_cached(stream).is_some(),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

static INSTALL_LOGGER: Once = Once::new();

fn install_logger(verbose: bool, colorize: bool) {
    INSTALL_LOGGER.call_once(|| {
        let default_level = if verbose {
            LevelFilter::DEBUG
        } else {
            LevelFilter::INFO
        };
        let env_value = std::env::var(LOG_ENV).unwrap_or_default();
        let (targets, parse_error) = log_targets(&env_value, default_level);

        let formatter = HeadingFormatter {
            styles: if colorize {
                LogStyles::colorized()
            } else {
                LogStyles::default()
            },
        };
        let layer = tracing_subscriber::fmt::layer()
            .event_format(formatter)
            .with_writer(io::stderr)
            .with_filter(targets);
        tracing_subscriber::registry().with(layer).init();

        if let Some(error) = parse_error {
            tracing::warn!("ignoring invalid {LOG_ENV} value `{env_value}`: {error}");
        }
    });
}

/// Parses a log filter, falling back to `default_level` if it is empty or invalid.
fn log_targets(value: &str, default_level: LevelFilter) -> (Targets, Option<String>) {
    let fallback = || Targets::new().with_default(default_level);
    if value.is_empty() {
        return (fallback(), None);
    }
    match value.parse::<Targets>() {
        Ok(targets) => (targets, None),
        Err(error) => (fallback(), Some(error.to_string())),
    }
}

/// Formats events as `heading: message`, with no timestamps or span context.
struct HeadingFormatter {
    styles: LogStyles,
}

impl<S, N> FormatEvent<S, N> for HeadingFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        if metadata.target() != NO_HEADING_TARGET {
            let (heading, style) = self.styles.heading(*metadata.level());
            write!(writer, "{}: ", heading.style(style))?;
        }

        let mut visitor = MessageVisitor {
            writer: &mut writer,
            result: Ok(()),
        };
        event.record(&mut visitor);
        visitor.result?;

        writeln!(writer)
    }
}

/// Writes the `message` field of an event, ignoring all others.
struct MessageVisitor<'a, 'writer> {
    writer: &'a mut format::Writer<'writer>,
    result: fmt::Result,
}

impl Visit for MessageVisitor<'_, '_> {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if self.result.is_ok() && field.name() == "message" {
            self.result = write!(self.writer, "{value:?}");
        }
    }
}

#[derive(Debug, Default)]
struct LogStyles {
    error: Style,
    warning: Style,
    info: Style,
    debug: Style,
}

impl LogStyles {
    fn colorized() -> Self {
        Self {
            error: Style::new().red().bold(),
            warning: Style::new().yellow().bold(),
            info: Style::new().bold(),
            debug: Style::new().dimmed(),
        }
    }

    fn heading(&self, level: Level) -> (&'static str, Style) {
        match level {
            Level::ERROR => ("error", self.error),
            Level::WARN => ("warning", self.warning),
            Level::INFO => ("info", self.info),
            Level::DEBUG => ("debug", self.debug),
            Level::TRACE => ("trace", self.debug),
        }
    }
}

/// Styles for diagnostics printed to stderr.
#[derive(Debug, Default)]
pub struct StderrStyles {
    pub(crate) bold: Style,
}

impl StderrStyles {
    fn colorized() -> Self {
        Self {
            bold: Style::new().bold(),
        }
    }
}

/// Where command output is written. Tests capture it instead of printing it.
#[derive(Default)]
pub enum OutputWriter {
    /// Write to standard output.
    #[default]
    Normal,
    /// Capture output.
    #[cfg(test)]
    Test {
        /// Everything written to standard output.
        stdout: String,
    },
}

impl OutputWriter {
    pub(crate) fn stdout_writer(&mut self) -> StdoutWriter<'_> {
        match self {
            Self::Normal => StdoutWriter::Normal(BufWriter::new(io::stdout().lock())),
            #[cfg(test)]
            Self::Test { stdout } => StdoutWriter::Test(stdout),
        }
    }
}

pub(crate) enum StdoutWriter<'a> {
    Normal(BufWriter<StdoutLock<'a>>),
    #[cfg(test)]
    Test(&'a mut String),
}

impl WriteStr for StdoutWriter<'_> {
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        match self {
            Self::Normal(buf) => buf.write_all(s.as_bytes()),
            #[cfg(test)]
            Self::Test(buf) => {
                buf.push_str(s);
                Ok(())
            }
        }
    }

    fn write_str_flush(&mut self) -> io::Result<()> {
        match self {
            Self::Normal(buf) => buf.flush(),
            #[cfg(test)]
            Self::Test(_) => Ok(()),
        }
    }
}
