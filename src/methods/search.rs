use super::{settle, Method, Shape};
use crate::error::{Error, Result};
use crate::r#async::{resolve_all_settling, Policy};
use crate::value::{Array, Value};

enum Receiver {
    Text(Vec<char>),
    Elements(Array),
}

fn searchable(method: Method, receiver: &Value) -> Result<Receiver> {
    match receiver {
        Value::String(s) => Ok(Receiver::Text(s.chars().collect())),
        other => other
            .as_array_like()?
            .map(Receiver::Elements)
            .ok_or_else(|| Error::invalid_receiver(method, other, Shape::Searchable)),
    }
}

/// Start index for forward searches: negative counts from the end, clamped to zero.
fn forward_start(from: Option<i64>, len: usize) -> usize {
    match from {
        None => 0,
        Some(from) if from >= 0 => from as usize,
        Some(from) => (len as i64 + from).max(0) as usize,
    }
}

/// Native string positions clamp into `0..=len` and never count from the end.
fn clamp_position(position: i64, len: usize) -> usize {
    position.clamp(0, len as i64) as usize
}

fn position(found: Option<usize>) -> Value {
    Value::Number(found.map_or(-1.0, |index| index as f64))
}

fn text_matches_at(haystack: &[char], needle: &[char], at: usize) -> bool {
    haystack.get(at..at + needle.len()) == Some(needle)
}

fn text_index_of(haystack: &[char], needle: &str, from: usize) -> Option<usize> {
    let needle: Vec<char> = needle.chars().collect();
    let last = haystack.len().checked_sub(needle.len())?;
    (from..=last).find(|&at| text_matches_at(haystack, &needle, at))
}

fn text_last_index_of(haystack: &[char], needle: &str, from: usize) -> Option<usize> {
    let needle: Vec<char> = needle.chars().collect();
    let last = haystack.len().checked_sub(needle.len())?;
    (0..=from.min(last))
        .rev()
        .find(|&at| text_matches_at(haystack, &needle, at))
}

/// Scans `elements` from `start`, settling lazily under the sequential policy.
async fn scan_forward<P>(elements: Array, start: usize, policy: Policy, mut matches: P) -> Result<Option<usize>>
where
    P: FnMut(Option<&Value>) -> bool,
{
    match policy {
        Policy::Concurrent => {
            let settled = resolve_all_settling(elements).await?;
            Ok((start..settled.len()).find(|&index| matches(settled.get(index))))
        }
        Policy::Sequential => {
            for index in start..elements.len() {
                let element = match elements.get(index) {
                    Some(value) => Some(value.clone().resolve().await?),
                    None => None,
                };
                if matches(element.as_ref()) {
                    return Ok(Some(index));
                }
            }
            Ok(None)
        }
    }
}

/// `indexOfAF`: first index strictly equal to `search`, else `-1`.
///
/// Holes never match. On strings this is a substring search by character
/// position, and `from` is clamped rather than counted from the end.
pub async fn index_of(
    receiver: Value,
    policy: Policy,
    search: Value,
    from: Option<i64>,
) -> Result<Value> {
    match searchable(Method::IndexOf, &receiver)? {
        Receiver::Text(text) => {
            let from = clamp_position(from.unwrap_or(0), text.len());
            Ok(position(text_index_of(&text, &search.to_string(), from)))
        }
        Receiver::Elements(elements) => {
            let start = forward_start(from, elements.len());
            let found = scan_forward(elements, start, policy, |element| {
                element.is_some_and(|value| value.strict_equals(&search))
            })
            .await?;
            Ok(position(found))
        }
    }
}

/// `includesAF`: whether any element is the same value as `search`.
///
/// Uses SameValueZero, so `NaN` finds `NaN` and holes match `undefined`.
pub async fn includes(
    receiver: Value,
    policy: Policy,
    search: Value,
    from: Option<i64>,
) -> Result<Value> {
    match searchable(Method::Includes, &receiver)? {
        Receiver::Text(text) => {
            let from = clamp_position(from.unwrap_or(0), text.len());
            Ok(Value::Bool(text_index_of(&text, &search.to_string(), from).is_some()))
        }
        Receiver::Elements(elements) => {
            let start = forward_start(from, elements.len());
            let found = scan_forward(elements, start, policy, |element| {
                element
                    .unwrap_or(&Value::Undefined)
                    .same_value_zero(&search)
            })
            .await?;
            Ok(Value::Bool(found.is_some()))
        }
    }
}

/// `lastIndexOfAF`: last index at or before `from` strictly equal to `search`, else `-1`.
///
/// All elements settle first (in series under the sequential policy), then
/// the scan runs backwards. `from` defaults to the last index.
pub async fn last_index_of(
    receiver: Value,
    policy: Policy,
    search: Value,
    from: Option<i64>,
) -> Result<Value> {
    match searchable(Method::LastIndexOf, &receiver)? {
        Receiver::Text(text) => {
            let from = from.map_or(text.len(), |from| clamp_position(from, text.len()));
            Ok(position(text_last_index_of(&text, &search.to_string(), from)))
        }
        Receiver::Elements(elements) => {
            let len = elements.len() as i64;
            let start = match from {
                None => len - 1,
                Some(from) if from >= 0 => from.min(len - 1),
                Some(from) => len + from,
            };
            if start < 0 {
                return Ok(position(None));
            }
            let settled = settle(elements, policy).await?;
            let found = (0..=start as usize)
                .rev()
                .find(|&index| settled.get(index).is_some_and(|value| value.strict_equals(&search)));
            Ok(position(found))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn forward_start_counts_negative_from_end() {
        assert_eq!(forward_start(None, 5), 0);
        assert_eq!(forward_start(Some(2), 5), 2);
        assert_eq!(forward_start(Some(-2), 5), 3);
        assert_eq!(forward_start(Some(-9), 5), 0);
    }

    #[test]
    fn text_search_is_by_character() {
        let text: Vec<char> = "héllo héllo".chars().collect();
        assert_eq!(text_index_of(&text, "llo", 0), Some(2));
        assert_eq!(text_index_of(&text, "llo", 3), Some(8));
        assert_eq!(text_last_index_of(&text, "llo", text.len()), Some(8));
        assert_eq!(text_index_of(&text, "", 4), Some(4));
        assert_eq!(text_index_of(&text, "xyz", 0), None);
    }

    #[test]
    fn holes_only_match_through_includes() {
        let sparse = Value::Array(Array::from_slots(vec![Some(Value::from(1)), None]));
        let index = block_on(index_of(sparse.clone(), Policy::Concurrent, Value::Undefined, None));
        let found = block_on(includes(sparse, Policy::Concurrent, Value::Undefined, None));
        assert_eq!(index.ok(), Some(Value::from(-1)));
        assert_eq!(found.ok(), Some(Value::Bool(true)));
    }

    #[test]
    fn last_index_of_respects_from() {
        let values = Value::from(vec![1, 2, 1, 2]);
        let at = |from| block_on(last_index_of(values.clone(), Policy::Concurrent, Value::from(1), from)).ok();
        assert_eq!(at(None), Some(Value::from(2)));
        assert_eq!(at(Some(1)), Some(Value::from(0)));
        assert_eq!(at(Some(-3)), Some(Value::from(0)));
        assert_eq!(at(Some(-5)), Some(Value::from(-1)));
    }
}
