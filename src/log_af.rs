//! Diagnostic logging of pending values
//!
//! [`Logger::log`] settles its items, renders them on one line and emits the
//! result through the [`log`] facade at `info` level, optionally prefixed with
//! the call site and followed by how long settling took. Nothing in the
//! collection methods depends on this module.

use crate::error::{Error, Result};
use crate::value::Value;
use futures::future::try_join_all;
use parking_lot::RwLock;
use std::fmt::{self, Write as _};
use std::future::Future;
use std::panic::Location;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

const ARROW: &str = "========================>";

/// Call-site details available to a custom label.
#[derive(Debug, Clone, Copy)]
pub struct LabelContext<'a> {
    /// Directory of the calling file, with a trailing separator
    pub path: &'a str,
    /// File name of the caller
    pub file: &'a str,
    /// Innermost directory name with a trailing `/`, empty at the root
    pub parent: &'a str,
    /// Line of the call
    pub line: u32,
    /// Column of the call
    pub col: u32,
    /// The arrow used by [`LabelFormat::Arrow`]
    pub arrow: &'static str,
}

type CustomLabel = Arc<dyn Fn(&LabelContext<'_>) -> String + Send + Sync>;

/// How the call-site label is rendered.
#[derive(Clone, Default)]
pub enum LabelFormat {
    /// `@file.rs:line:col:` on its own line
    #[default]
    File,
    /// `@dir/sub/file.rs:line:col:` on its own line
    Path,
    /// `@sub/file.rs:line:col:` on its own line
    Parent,
    /// An arrow in front of the items
    Arrow,
    /// Caller-supplied rendering
    Custom(CustomLabel),
}

impl LabelFormat {
    /// A custom format computed from the call site.
    pub fn custom<F>(format: F) -> Self
    where
        F: Fn(&LabelContext<'_>) -> String + Send + Sync + 'static,
    {
        LabelFormat::Custom(Arc::new(format))
    }

    fn render(&self, location: &Location<'_>) -> String {
        let full = location.file();
        let split = full.rfind(['/', '\\']).map_or(0, |at| at + 1);
        let (path, file) = full.split_at(split);
        let dir = path.trim_end_matches(['/', '\\']);
        let parent_dir = dir.rsplit(['/', '\\']).next().unwrap_or_default();
        let parent = if parent_dir.is_empty() {
            String::new()
        } else {
            format!("{parent_dir}/")
        };
        let (line, col) = (location.line(), location.column());

        match self {
            LabelFormat::File => format!("@{file}:{line}:{col}:\n"),
            LabelFormat::Path => format!("@{full}:{line}:{col}:\n"),
            LabelFormat::Parent => format!("@{parent}{file}:{line}:{col}:\n"),
            LabelFormat::Arrow => ARROW.to_string(),
            LabelFormat::Custom(format) => format(&LabelContext {
                path,
                file,
                parent: &parent,
                line,
                col,
                arrow: ARROW,
            }),
        }
    }
}

impl fmt::Debug for LabelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LabelFormat::File => "File",
            LabelFormat::Path => "Path",
            LabelFormat::Parent => "Parent",
            LabelFormat::Arrow => "Arrow",
            LabelFormat::Custom(_) => "Custom(..)",
        })
    }
}

/// Parses `file`, `path`, `parent`, `arrow`, or `custom=<text>` for a fixed label.
impl FromStr for LabelFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "file" => Ok(LabelFormat::File),
            "path" => Ok(LabelFormat::Path),
            "parent" => Ok(LabelFormat::Parent),
            "arrow" => Ok(LabelFormat::Arrow),
            _ => match s.strip_prefix("custom=") {
                Some(text) => {
                    let text = text.to_string();
                    Ok(LabelFormat::custom(move |_| text.clone()))
                }
                None => Err(Error::InvalidLabelFormat(s.to_string())),
            },
        }
    }
}

/// Logger settings.
#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Prefix each line with the call site
    pub label: bool,
    /// Append how long the items took to settle
    pub duration: bool,
    /// How the call site is rendered
    pub label_format: LabelFormat,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            label: true,
            duration: true,
            label_format: LabelFormat::File,
        }
    }
}

/// A partial update of [`LogOptions`]; `None` leaves a setting unchanged.
#[derive(Debug, Clone, Default)]
pub struct LogOptionsUpdate {
    /// New `label` setting
    pub label: Option<bool>,
    /// New `duration` setting
    pub duration: Option<bool>,
    /// New label format
    pub label_format: Option<LabelFormat>,
}

/// Settles and logs values.
#[derive(Debug, Default)]
pub struct Logger {
    options: RwLock<LogOptions>,
}

impl Logger {
    /// Creates a logger with `options`.
    pub fn new(options: LogOptions) -> Self {
        Self {
            options: RwLock::new(options),
        }
    }

    /// Current settings.
    pub fn options(&self) -> LogOptions {
        self.options.read().clone()
    }

    /// Applies the settings present in `update`.
    pub fn set_options(&self, update: LogOptionsUpdate) {
        let mut options = self.options.write();
        if let Some(label) = update.label {
            options.label = label;
        }
        if let Some(duration) = update.duration {
            options.duration = duration;
        }
        if let Some(label_format) = update.label_format {
            options.label_format = label_format;
        }
    }

    /// Sets the label format by name, keeping the current one if `name` is not recognised.
    pub fn set_label_format_name(&self, name: &str) -> Result<()> {
        match name.parse::<LabelFormat>() {
            Ok(format) => {
                self.options.write().label_format = format;
                Ok(())
            }
            Err(err) => {
                log::warn!(target: "async_af::log_af", "{err}");
                Err(err)
            }
        }
    }

    /// Restores the default settings.
    pub fn reset(&self) {
        *self.options.write() = LogOptions::default();
    }

    /// Settles `items` concurrently and logs them on one line.
    ///
    /// The label reflects the caller's location. Resolves to the logged text;
    /// a rejected item rejects the whole call and nothing is logged.
    #[track_caller]
    pub fn log<I>(&self, items: I) -> impl Future<Output = Result<String>> + Send + 'static
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let location = Location::caller();
        let options = self.options();
        let label = options
            .label
            .then(|| options.label_format.render(location));
        let items: Vec<Value> = items.into_iter().map(Into::into).collect();
        let start = Instant::now();

        async move {
            let settled = try_join_all(items.into_iter().map(Value::resolve)).await?;
            let mut line = String::new();
            if let Some(label) = label {
                line.push_str(&label);
                if !label.is_empty() && !label.ends_with('\n') {
                    line.push(' ');
                }
            }
            let rendered: Vec<String> = settled.iter().map(|item| inspect(item, false)).collect();
            line.push_str(&rendered.join(" "));
            if options.duration {
                let _ = write!(line, "\nin {:.3} secs", start.elapsed().as_secs_f64());
            }
            log::info!(target: "async_af::log_af", "{line}");
            Ok::<_, Error>(line)
        }
    }
}

/// Console-style rendering: top-level strings are bare, nested ones quoted.
fn inspect(value: &Value, nested: bool) -> String {
    match value {
        Value::String(s) if nested => format!("'{s}'"),
        Value::Array(array) => {
            if array.is_empty() {
                return "[]".to_string();
            }
            let mut parts = Vec::new();
            let mut holes = 0;
            for slot in array.iter() {
                match slot {
                    None => holes += 1,
                    Some(item) => {
                        if holes > 0 {
                            parts.push(empty_items(holes));
                            holes = 0;
                        }
                        parts.push(inspect(item, true));
                    }
                }
            }
            if holes > 0 {
                parts.push(empty_items(holes));
            }
            format!("[ {} ]", parts.join(", "))
        }
        Value::Object(object) => {
            if object.is_empty() {
                return "{}".to_string();
            }
            let parts: Vec<String> = object
                .iter()
                .map(|(key, item)| format!("{key}: {}", inspect(item, true)))
                .collect();
            format!("{{ {} }}", parts.join(", "))
        }
        Value::Promise(_) => "Promise { <pending> }".to_string(),
        other => other.to_string(),
    }
}

fn empty_items(count: usize) -> String {
    if count == 1 {
        "<1 empty item>".to_string()
    } else {
        format!("<{count} empty items>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Array;

    #[test]
    fn arrays_render_with_hole_runs() {
        let array = Value::Array(Array::from_slots(vec![
            Some(Value::from(1)),
            None,
            None,
            Some(Value::from("x")),
            None,
        ]));
        assert_eq!(inspect(&array, false), "[ 1, <2 empty items>, 'x', <1 empty item> ]");
    }

    #[test]
    fn top_level_strings_are_bare() {
        assert_eq!(inspect(&Value::from("hi"), false), "hi");
        assert_eq!(inspect(&Value::Array(Array::new()), false), "[]");
    }

    #[test]
    fn label_names_parse() {
        assert!(matches!("parent".parse::<LabelFormat>(), Ok(LabelFormat::Parent)));
        assert!(matches!("custom=>>".parse::<LabelFormat>(), Ok(LabelFormat::Custom(_))));
        let err = "fancy".parse::<LabelFormat>().err().map(|e| e.to_string());
        assert!(err.is_some_and(|msg| msg.ends_with("but was 'fancy'")));
    }

    #[test]
    fn label_parts_come_from_location() {
        let location = Location::caller();
        let context = LabelFormat::custom(|cx| format!("{}|{}|{}", cx.path, cx.file, cx.parent))
            .render(location);
        assert_eq!(context, "src/|log_af.rs|src/");
    }
}
