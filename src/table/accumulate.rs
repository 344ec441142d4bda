//! Column accumulators.
//!
//! An accumulator folds the values of one column into a state and resolves
//! that state into a display value. States are opaque to the engine: the
//! registry stores them type-erased and only the accumulator that produced a
//! state ever looks inside it.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

use crate::model::FieldValue;

/// A fold over the values of one column.
pub trait Accumulator {
    type State: Clone + 'static;

    /// Fold `value` into `state`. `None` is the empty state.
    fn next(&self, value: &FieldValue, state: Option<Self::State>) -> Self::State;

    /// Turn a state into the value shown in a summary cell.
    fn resolve(&self, state: Option<&Self::State>) -> FieldValue;
}

trait StateBox {
    fn clone_box(&self) -> Box<dyn StateBox>;
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Clone + 'static> StateBox for T {
    fn clone_box(&self) -> Box<dyn StateBox> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Accumulator state with its type erased.
pub struct State(Box<dyn StateBox>);

impl Clone for State {
    fn clone(&self) -> Self {
        State(self.0.clone_box())
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("State(..)")
    }
}

/// Object-safe face of [`Accumulator`], as stored in the table registry.
pub(crate) trait DynAccumulator {
    fn next(&self, value: &FieldValue, state: Option<State>) -> State;
    fn resolve(&self, state: Option<&State>) -> FieldValue;
}

pub(crate) struct Erased<A>(pub(crate) A);

impl<A: Accumulator> DynAccumulator for Erased<A> {
    fn next(&self, value: &FieldValue, state: Option<State>) -> State {
        // A state of a foreign type cannot come from this accumulator; fold
        // from empty rather than fail.
        let typed = state
            .and_then(|s| s.0.into_any().downcast::<A::State>().ok())
            .map(|b| *b);
        State(Box::new(self.0.next(value, typed)))
    }

    fn resolve(&self, state: Option<&State>) -> FieldValue {
        let typed = state.and_then(|s| s.0.as_any().downcast_ref::<A::State>());
        self.0.resolve(typed)
    }
}

/// An accumulator built from two closures.
pub struct FnAccumulator<S, N, R> {
    next: N,
    resolve: R,
    _state: PhantomData<fn() -> S>,
}

impl<S, N, R> FnAccumulator<S, N, R>
where
    S: Clone + 'static,
    N: Fn(&FieldValue, Option<S>) -> S,
    R: Fn(Option<&S>) -> FieldValue,
{
    pub fn new(next: N, resolve: R) -> Self {
        Self {
            next,
            resolve,
            _state: PhantomData,
        }
    }
}

impl<S, N, R> Accumulator for FnAccumulator<S, N, R>
where
    S: Clone + 'static,
    N: Fn(&FieldValue, Option<S>) -> S,
    R: Fn(Option<&S>) -> FieldValue,
{
    type State = S;

    fn next(&self, value: &FieldValue, state: Option<S>) -> S {
        (self.next)(value, state)
    }

    fn resolve(&self, state: Option<&S>) -> FieldValue {
        (self.resolve)(state)
    }
}

/// Sum of the numeric values. Other values are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sum;

impl Accumulator for Sum {
    type State = f64;

    fn next(&self, value: &FieldValue, state: Option<f64>) -> f64 {
        state.unwrap_or(0.0) + value.as_f64().unwrap_or(0.0)
    }

    fn resolve(&self, state: Option<&f64>) -> FieldValue {
        state.map_or(FieldValue::Null, |s| FieldValue::Number(*s))
    }
}

/// Number of non-empty values.
#[derive(Debug, Clone, Copy, Default)]
pub struct Count;

impl Accumulator for Count {
    type State = usize;

    fn next(&self, value: &FieldValue, state: Option<usize>) -> usize {
        state.unwrap_or(0) + usize::from(!value.is_null())
    }

    fn resolve(&self, state: Option<&usize>) -> FieldValue {
        FieldValue::Number(state.copied().unwrap_or(0) as f64)
    }
}

/// Mean of the numeric values.
#[derive(Debug, Clone, Copy, Default)]
pub struct Average;

impl Accumulator for Average {
    type State = (f64, usize);

    fn next(&self, value: &FieldValue, state: Option<(f64, usize)>) -> (f64, usize) {
        let (sum, count) = state.unwrap_or((0.0, 0));
        match value.as_f64() {
            Some(n) => (sum + n, count + 1),
            None => (sum, count),
        }
    }

    fn resolve(&self, state: Option<&(f64, usize)>) -> FieldValue {
        match state {
            Some((sum, count)) if *count > 0 => FieldValue::Number(sum / *count as f64),
            _ => FieldValue::Null,
        }
    }
}

/// Smallest numeric value.
#[derive(Debug, Clone, Copy, Default)]
pub struct Min;

impl Accumulator for Min {
    type State = Option<f64>;

    fn next(&self, value: &FieldValue, state: Option<Option<f64>>) -> Option<f64> {
        let current = state.flatten();
        match (current, value.as_f64()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn resolve(&self, state: Option<&Option<f64>>) -> FieldValue {
        state.copied().flatten().map_or(FieldValue::Null, FieldValue::Number)
    }
}

/// Largest numeric value.
#[derive(Debug, Clone, Copy, Default)]
pub struct Max;

impl Accumulator for Max {
    type State = Option<f64>;

    fn next(&self, value: &FieldValue, state: Option<Option<f64>>) -> Option<f64> {
        let current = state.flatten();
        match (current, value.as_f64()) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        }
    }

    fn resolve(&self, state: Option<&Option<f64>>) -> FieldValue {
        state.copied().flatten().map_or(FieldValue::Null, FieldValue::Number)
    }
}
