//! Resolution of sequences of pending values
//!
//! Two policies drive every method: [`Policy::Concurrent`] settles all
//! elements together and fails fast, [`Policy::Sequential`] settles one
//! element after another in index order. Holes survive both.

use crate::error::{Error, Result};
use crate::value::{Array, Callback, Function, Value};
use futures::future::try_join_all;
use std::ops::ControlFlow;

/// How the elements of a sequence are brought to settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Policy {
    /// Initiate everything at once and await all together
    #[default]
    Concurrent,
    /// Await each element, and each callback outcome, before starting the next
    Sequential,
}

/// Whether holes are handed to callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Holes {
    /// Holes are never visited
    Skip,
    /// Holes are visited as `undefined`
    Visit,
}

/// One callback invocation after its outcome has settled.
#[derive(Debug)]
pub(crate) struct Visit {
    pub(crate) index: usize,
    pub(crate) element: Value,
    pub(crate) outcome: Value,
}

/// Settles every present element concurrently, keeping holes in place.
///
/// Rejects with the first rejection to occur, without waiting for the rest.
pub async fn resolve_all_settling(sequence: Array) -> Result<Array> {
    if sequence.present().all(|(_, value)| !value.is_pending()) {
        return Ok(sequence);
    }

    let pending = sequence.present().map(|(index, value)| {
        let value = value.clone();
        async move { value.resolve().await.map(|settled| (index, settled)) }
    });
    let settled = try_join_all(pending).await?;

    let mut slots = vec![None; sequence.len()];
    for (index, value) in settled {
        slots[index] = Some(value);
    }
    Ok(Array::from_slots(slots))
}

/// Settles present elements one at a time in index order, keeping holes in place.
///
/// Element `i + 1` is not awaited until element `i` has settled.
pub async fn resolve_in_series(sequence: Array) -> Result<Array> {
    let mut working = sequence;
    for index in 0..working.len() {
        let Some(value) = working.get(index).cloned() else {
            continue;
        };
        if value.is_pending() {
            let settled = value.resolve().await?;
            working.set(index, settled);
        }
    }
    Ok(working)
}

/// Settles `sequence` under `policy`, optionally mapping each element through `callback`.
///
/// Without a callback this is [`resolve_all_settling`] or [`resolve_in_series`].
/// With one, each present element is replaced by the settled outcome of
/// `callback(element, index, array)`; holes stay holes.
pub async fn resolve_with_policy(
    sequence: Array,
    policy: Policy,
    callback: Option<&Callback>,
) -> Result<Array> {
    let Some(callback) = callback else {
        return match policy {
            Policy::Concurrent => resolve_all_settling(sequence).await,
            Policy::Sequential => resolve_in_series(sequence).await,
        };
    };

    let function = callback.function()?;
    let mut slots = vec![None; sequence.len()];
    visit(sequence, policy, Holes::Skip, function, callback.this(), |visit| {
        slots[visit.index] = Some(visit.outcome);
        ControlFlow::Continue(())
    })
    .await?;
    Ok(Array::from_slots(slots))
}

/// Drives `callback(element, index, array)` over `sequence` and feeds settled outcomes to `step`.
///
/// Concurrent: all elements settle, every callback is invoked, then outcomes
/// settle together and reach `step` in index order. Breaking from `step` only
/// stops consumption. Sequential: element, callback and outcome settle in
/// turn, and breaking from `step` stops before the next element is touched.
/// The array passed to the callback reflects what has settled so far.
pub(crate) async fn visit<S>(
    sequence: Array,
    policy: Policy,
    holes: Holes,
    callback: &Function,
    this: &Value,
    mut step: S,
) -> Result<()>
where
    S: FnMut(Visit) -> ControlFlow<()> + Send,
{
    match policy {
        Policy::Concurrent => {
            let settled = resolve_all_settling(sequence).await?;
            let array = Value::Array(settled.clone());
            let mut pending = Vec::with_capacity(settled.len());
            for (index, slot) in settled.iter().enumerate() {
                let element = match (slot, holes) {
                    (Some(value), _) => value.clone(),
                    (None, Holes::Visit) => Value::Undefined,
                    (None, Holes::Skip) => continue,
                };
                let outcome = callback.call(
                    this.clone(),
                    vec![element.clone(), Value::from(index), array.clone()],
                )?;
                pending.push(async move {
                    let outcome = outcome.resolve().await?;
                    Ok::<_, Error>(Visit {
                        index,
                        element,
                        outcome,
                    })
                });
            }
            for visit in try_join_all(pending).await? {
                if step(visit).is_break() {
                    break;
                }
            }
        }
        Policy::Sequential => {
            let mut working = sequence;
            for index in 0..working.len() {
                let element = match (working.get(index).cloned(), holes) {
                    (Some(value), _) => {
                        let settled = value.resolve().await?;
                        working.set(index, settled.clone());
                        settled
                    }
                    (None, Holes::Visit) => Value::Undefined,
                    (None, Holes::Skip) => continue,
                };
                let outcome = callback
                    .call(
                        this.clone(),
                        vec![
                            element.clone(),
                            Value::from(index),
                            Value::Array(working.clone()),
                        ],
                    )?
                    .resolve()
                    .await?;
                let visit = Visit {
                    index,
                    element,
                    outcome,
                };
                if step(visit).is_break() {
                    break;
                }
            }
        }
    }
    Ok(())
}
