use super::{array_like, settle, Method, Shape};
use crate::error::{Error, Result};
use crate::r#async::Policy;
use crate::value::{Array, Value};
use futures::future::try_join_all;
use regex::Regex;

/// Separator for [`split`]: a literal string or a regular expression.
#[derive(Debug, Clone)]
pub enum Separator {
    /// Split on every occurrence of this exact text
    Literal(String),
    /// Split on every match; capture groups are spliced into the output
    Pattern(Regex),
}

impl Separator {
    /// Compiles `pattern` into a [`Separator::Pattern`].
    pub fn pattern(pattern: &str) -> Result<Self> {
        Ok(Separator::Pattern(Regex::new(pattern)?))
    }
}

impl From<&str> for Separator {
    fn from(text: &str) -> Self {
        Separator::Literal(text.to_string())
    }
}

impl From<String> for Separator {
    fn from(text: String) -> Self {
        Separator::Literal(text)
    }
}

impl From<Regex> for Separator {
    fn from(pattern: Regex) -> Self {
        Separator::Pattern(pattern)
    }
}

/// `joinAF`: string forms of the settled elements joined by `separator` (default `","`).
pub async fn join(receiver: Value, policy: Policy, separator: Option<String>) -> Result<Value> {
    let array = array_like(Method::Join, &receiver)?;
    let settled = settle(array, policy).await?;
    Ok(Value::from(settled.join(separator.as_deref().unwrap_or(","))))
}

async fn settle_all(values: Vec<Value>, policy: Policy) -> Result<Vec<Value>> {
    match policy {
        Policy::Concurrent => try_join_all(values.into_iter().map(Value::resolve)).await,
        Policy::Sequential => {
            let mut settled = Vec::with_capacity(values.len());
            for value in values {
                settled.push(value.resolve().await?);
            }
            Ok(settled)
        }
    }
}

/// `concatAF`: appends settled arguments to a settled array or a string.
///
/// On arrays, array arguments are spread one level (holes kept, elements
/// settled) and anything else is appended as a single element. On strings,
/// each argument's string form is appended.
pub async fn concat(receiver: Value, policy: Policy, args: Vec<Value>) -> Result<Value> {
    match receiver {
        Value::String(text) => {
            let mut out = text.to_string();
            for arg in settle_all(args, policy).await? {
                out.push_str(&arg.to_string());
            }
            Ok(Value::from(out))
        }
        Value::Array(array) => {
            let mut slots = settle(array, policy).await?.into_slots();
            for arg in settle_all(args, policy).await? {
                match arg {
                    Value::Array(spread) => slots.extend(settle(spread, policy).await?.into_slots()),
                    other => slots.push(Some(other)),
                }
            }
            Ok(Value::Array(Array::from_slots(slots)))
        }
        other => Err(Error::invalid_receiver(Method::Concat, &other, Shape::ArrayOrString)),
    }
}

/// `splitAF`: splits a string into an array of substrings.
///
/// Without a separator the result is the whole string; an empty literal
/// splits into characters. `limit` is truncated to an unsigned 32-bit count,
/// so negative limits impose no cap and `0` yields an empty array.
pub async fn split(receiver: Value, separator: Option<Separator>, limit: Option<i64>) -> Result<Value> {
    match &receiver {
        Value::String(text) => Ok(split_text(text, separator.as_ref(), limit)
            .into_iter()
            .collect()),
        other => Err(Error::NotAString(other.to_string())),
    }
}

fn split_text(input: &str, separator: Option<&Separator>, limit: Option<i64>) -> Vec<Value> {
    let limit = limit.map_or(u32::MAX, |limit| limit as u32) as usize;
    if limit == 0 {
        return Vec::new();
    }
    match separator {
        None => vec![Value::from(input)],
        Some(Separator::Literal(sep)) if sep.is_empty() => input
            .chars()
            .take(limit)
            .map(|c| Value::from(c.to_string()))
            .collect(),
        Some(Separator::Literal(sep)) => input.split(sep.as_str()).take(limit).map(Value::from).collect(),
        Some(Separator::Pattern(pattern)) => split_pattern(input, pattern, limit),
    }
}

fn split_pattern(input: &str, pattern: &Regex, limit: usize) -> Vec<Value> {
    let mut out = Vec::new();
    let size = input.len();
    if size == 0 {
        if !pattern.is_match(input) {
            out.push(Value::from(input));
        }
        return out;
    }

    let mut p = 0;
    let mut q = 0;
    while q < size {
        let Some(captures) = pattern.captures_at(input, q) else {
            break;
        };
        let Some(whole) = captures.get(0) else {
            break;
        };
        if whole.start() >= size {
            break;
        }
        if whole.end() == p {
            // empty match where the previous piece ended; step over one char
            q = whole.start() + input[whole.start()..].chars().next().map_or(1, char::len_utf8);
            continue;
        }

        out.push(Value::from(&input[p..whole.start()]));
        if out.len() == limit {
            return out;
        }
        for group in captures.iter().skip(1) {
            out.push(group.map_or(Value::Undefined, |m| Value::from(m.as_str())));
            if out.len() == limit {
                return out;
            }
        }
        p = whole.end();
        q = p;
    }

    out.push(Value::from(&input[p..]));
    out
}
