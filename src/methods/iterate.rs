use super::{array_like, array_like_with_callback, Method};
use crate::error::{Error, Result};
use crate::r#async::{resolve_all_settling, resolve_with_policy, visit, Holes, Policy};
use crate::value::{Array, Callback, Value};
use std::ops::ControlFlow;

/// `mapAF`: settled outcomes of `callback(element, index, array)`, holes kept.
pub async fn map(receiver: Value, policy: Policy, callback: Callback) -> Result<Value> {
    let (array, _) = array_like_with_callback(Method::Map, &receiver, &callback)?;
    let mapped = resolve_with_policy(array, policy, Some(&callback)).await?;
    Ok(Value::Array(mapped))
}

/// `forEachAF`: runs the callback for its effects and settles to `undefined`.
pub async fn for_each(receiver: Value, policy: Policy, callback: Callback) -> Result<Value> {
    let (array, function) = array_like_with_callback(Method::ForEach, &receiver, &callback)?;
    visit(array, policy, Holes::Skip, function, callback.this(), |_| {
        ControlFlow::Continue(())
    })
    .await?;
    Ok(Value::Undefined)
}

/// `filterAF`: settled elements whose callback outcome is truthy, without holes.
pub async fn filter(receiver: Value, policy: Policy, callback: Callback) -> Result<Value> {
    let (array, function) = array_like_with_callback(Method::Filter, &receiver, &callback)?;
    let mut kept = Vec::new();
    visit(array, policy, Holes::Skip, function, callback.this(), |visit| {
        if visit.outcome.is_truthy() {
            kept.push(Some(visit.element));
        }
        ControlFlow::Continue(())
    })
    .await?;
    Ok(Value::Array(Array::from_slots(kept)))
}

/// `everyAF`: true when every present element passes; `true` when there are none.
///
/// Under the sequential policy no element after the first failure is touched.
pub async fn every(receiver: Value, policy: Policy, callback: Callback) -> Result<Value> {
    let (array, function) = array_like_with_callback(Method::Every, &receiver, &callback)?;
    let mut passed = true;
    visit(array, policy, Holes::Skip, function, callback.this(), |visit| {
        if visit.outcome.is_truthy() {
            ControlFlow::Continue(())
        } else {
            passed = false;
            ControlFlow::Break(())
        }
    })
    .await?;
    Ok(Value::Bool(passed))
}

/// `someAF`: true when any present element passes; `false` when there are none.
pub async fn some(receiver: Value, policy: Policy, callback: Callback) -> Result<Value> {
    let (array, function) = array_like_with_callback(Method::Some, &receiver, &callback)?;
    let mut found = false;
    visit(array, policy, Holes::Skip, function, callback.this(), |visit| {
        if visit.outcome.is_truthy() {
            found = true;
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })
    .await?;
    Ok(Value::Bool(found))
}

/// `findAF`: the first settled element that passes, else `undefined`.
///
/// Holes are visited as `undefined`.
pub async fn find(receiver: Value, policy: Policy, callback: Callback) -> Result<Value> {
    let (array, function) = array_like_with_callback(Method::Find, &receiver, &callback)?;
    let mut found = Value::Undefined;
    visit(array, policy, Holes::Visit, function, callback.this(), |visit| {
        if visit.outcome.is_truthy() {
            found = visit.element;
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })
    .await?;
    Ok(found)
}

/// `findIndexAF`: index of the first element that passes, else `-1`.
pub async fn find_index(receiver: Value, policy: Policy, callback: Callback) -> Result<Value> {
    let (array, function) = array_like_with_callback(Method::FindIndex, &receiver, &callback)?;
    let mut found = -1.0;
    visit(array, policy, Holes::Visit, function, callback.this(), |visit| {
        if visit.outcome.is_truthy() {
            found = visit.index as f64;
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })
    .await?;
    Ok(Value::Number(found))
}

/// `reduceAF`: folds settled elements left to right through `callback(acc, element, index, array)`.
///
/// Without `initial` the first present element seeds the accumulator; if
/// there is none the reduction fails with [`Error::EmptyReduce`]. Each
/// callback outcome settles before it becomes the next accumulator.
pub async fn reduce(
    receiver: Value,
    policy: Policy,
    callback: Callback,
    initial: Option<Value>,
) -> Result<Value> {
    let array = array_like(Method::Reduce, &receiver)?;
    let function = callback.function()?;

    let mut working = match policy {
        Policy::Concurrent => resolve_all_settling(array).await?,
        Policy::Sequential => array,
    };
    let mut acc = match initial {
        Some(value) => Some(value.resolve().await?),
        None => None,
    };
    for index in 0..working.len() {
        let Some(element) = working.get(index).cloned() else {
            continue;
        };
        let element = if element.is_pending() {
            let settled = element.resolve().await?;
            working.set(index, settled.clone());
            settled
        } else {
            element
        };
        acc = Some(match acc.take() {
            None => element,
            Some(acc) => {
                let args = vec![acc, element, Value::from(index), Value::Array(working.clone())];
                function.call(callback.this().clone(), args)?.resolve().await?
            }
        });
    }
    acc.ok_or(Error::EmptyReduce)
}
