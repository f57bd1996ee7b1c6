//! Pretty rendering for local development
//!
//! Layout: `[dt] <icon> <level> <file> - <message>` on the header line,
//! followed by the remaining context and event as indented JSON.

use super::error::Result;
use super::level::Level;
use super::options::PrettyOptions;
use super::record::LogRecord;
use colored::{ColoredString, Colorize};
use serde_json::{Map, Value};

/// Context keys already shown on the header line
const CONTEXT_IGNORE_KEYS: [&str; 3] = ["runtime", "source", "system"];

/// Event keys too noisy for the pretty body
const EVENT_IGNORE_KEYS: [&str; 1] = ["http_request"];

fn level_style(level: Level, text: &str) -> ColoredString {
    match level {
        Level::Emergency | Level::Alert => text.red().underline(),
        Level::Critical | Level::Error => text.red(),
        Level::Warn => text.yellow(),
        Level::Notice => text.cyan(),
        Level::Info => text.blue(),
        Level::Debug => text.green(),
    }
}

fn paint(text: &str, options: &PrettyOptions, style: impl FnOnce(&str) -> ColoredString) -> String {
    if options.no_color {
        text.to_string()
    } else {
        style(text).to_string()
    }
}

/// Render a record for humans. The record is not modified.
pub fn write_pretty(record: &LogRecord, options: &PrettyOptions) -> Result<String> {
    let level = record.level();

    let date = if options.no_timestamp {
        String::new()
    } else {
        paint(&format!("[{}] ", record.dt()), options, |s| s.white())
    };

    let file = if options.no_filename {
        String::new()
    } else {
        let name = record.file_name().unwrap_or_default();
        format!(" {}", paint(name, options, |s| s.green().underline()))
    };

    let header = paint(&format!("{} {}", level.icon(), level), options, |s| {
        level_style(level, s)
    });
    let message = paint(&record.message, options, |s| level_style(level, s));

    let body = if options.only_message {
        String::new()
    } else {
        render_body(record)?
    };

    Ok(format!("{}{}{} - {}\n{}", date, header, file, message, body))
}

fn render_body(record: &LogRecord) -> Result<String> {
    let mut logs = Map::new();

    let context = filtered(&record.context, &CONTEXT_IGNORE_KEYS);
    if !context.is_empty() {
        logs.insert("context".to_string(), Value::Object(context));
    }

    let event = filtered(&record.event, &EVENT_IGNORE_KEYS);
    if !event.is_empty() {
        logs.insert("event".to_string(), Value::Object(event));
    }

    if logs.is_empty() {
        return Ok(String::new());
    }

    let mut rendered = serde_json::to_string_pretty(&Value::Object(logs))?;
    rendered.push('\n');
    Ok(rendered)
}

fn filtered(source: &Map<String, Value>, ignore: &[&str]) -> Map<String, Value> {
    source
        .iter()
        .filter(|(key, _)| !ignore.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
