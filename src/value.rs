//! Animatable value cells
//!
//! `AnimatedValue` is a cloneable shared cell that animations write into and
//! UI code observes through subscriptions. `InterpolatedValue` is a read-only
//! view deriving its output from a source cell through a piecewise-linear
//! mapping.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, Weak};

use smallvec::SmallVec;

use crate::error::{AnimationError, Result};

/// Trait for values that can be linearly interpolated
pub trait Interpolate: Clone {
    /// Linearly interpolate between self and other by factor t (0.0 to 1.0)
    fn lerp(&self, other: &Self, t: f32) -> Self;

    /// Check if two values are approximately equal (for settling detection)
    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool;

    /// Lift a raw input into this type, if the type can represent it
    /// directly. Used by `Extrapolation::Identity`; types that cannot
    /// (non-numeric outputs) return `None` and fall back to clamping.
    fn identity(input: f32) -> Option<Self> {
        let _ = input;
        None
    }
}

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self - other).abs() < epsilon
    }

    fn identity(input: f32) -> Option<Self> {
        Some(input)
    }
}

/// Wrapper giving any equatable value step-function interpolation: `lerp`
/// holds the lower bound until t reaches 1. This is the fallback for outputs
/// with no meaningful blend, like strings or enum states.
#[derive(Clone, Debug, PartialEq)]
pub struct Discrete<T: Clone + PartialEq>(pub T);

impl<T: Clone + PartialEq> Interpolate for Discrete<T> {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        if t >= 1.0 {
            other.clone()
        } else {
            self.clone()
        }
    }

    fn approx_eq(&self, other: &Self, _epsilon: f32) -> bool {
        self == other
    }
}

type Listener = Box<dyn FnMut(f32) + Send>;

struct ValueInner {
    value: f32,
    listeners: Vec<(u64, Listener)>,
    next_id: u64,
    /// Fan-out nesting depth; listeners call `set` reentrantly
    fanout_depth: u32,
    /// Ids unsubscribed while their listener was out on loan to a fan-out
    pending_removals: SmallVec<[u64; 2]>,
}

/// A shared f32 cell animations drive and subscribers observe
///
/// Cloning yields another handle to the same cell. `set` is the sole
/// mutation point: it stores the value and notifies subscribers in
/// subscription order. Listeners subscribed during a notification do not
/// fire for that notification, and unsubscribing from inside a callback
/// is safe.
#[derive(Clone)]
pub struct AnimatedValue {
    inner: Arc<Mutex<ValueInner>>,
}

impl AnimatedValue {
    pub fn new(initial: f32) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ValueInner {
                value: initial,
                listeners: Vec::new(),
                next_id: 0,
                fanout_depth: 0,
                pending_removals: SmallVec::new(),
            })),
        }
    }

    pub fn get(&self) -> f32 {
        self.inner.lock().unwrap().value
    }

    /// Store a new value and notify every subscriber with it
    pub fn set(&self, value: f32) {
        let mut snapshot: SmallVec<[(u64, Listener); 4]> = {
            let mut inner = self.inner.lock().unwrap();
            inner.value = value;
            inner.fanout_depth += 1;
            inner.listeners.drain(..).collect()
        };

        // Lock is released while callbacks run so they may call get/set/
        // subscribe/unsubscribe on this same cell without deadlocking.
        for (id, listener) in snapshot.iter_mut() {
            let outcome = catch_unwind(AssertUnwindSafe(|| listener(value)));
            if outcome.is_err() {
                tracing::error!(listener = *id, "animated value listener panicked");
            }
        }

        let mut inner = self.inner.lock().unwrap();
        inner.fanout_depth -= 1;
        // Consume only the removals aimed at this snapshot's listeners;
        // an outer fan-out may still have its own out on loan.
        let pending = std::mem::take(&mut inner.pending_removals);
        let (removed, outer): (SmallVec<[u64; 2]>, SmallVec<[u64; 2]>) = pending
            .into_iter()
            .partition(|id| snapshot.iter().any(|(sid, _)| sid == id));
        inner.pending_removals = outer;
        // Listeners subscribed mid-fan-out landed in the drained list; keep
        // them after the originals so ordering stays subscription order.
        let added = std::mem::take(&mut inner.listeners);
        inner.listeners = snapshot
            .into_iter()
            .filter(|(id, _)| !removed.contains(id))
            .chain(added)
            .collect();
    }

    /// Register a listener called with every value written via `set`
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(f32) + Send + 'static,
    {
        let id = {
            let mut inner = self.inner.lock().unwrap();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.push((id, Box::new(listener)));
            id
        };
        Subscription {
            inner: Arc::downgrade(&self.inner),
            id,
        }
    }

    /// Derive a read-only view mapping this cell through a piecewise-linear
    /// interpolation over the given breakpoints.
    ///
    /// Requires at least two breakpoints, equal range lengths, and a
    /// monotonically non-decreasing input range.
    pub fn interpolate<T: Interpolate>(
        &self,
        input_range: Vec<f32>,
        output_range: Vec<T>,
        extrapolate: Extrapolation,
    ) -> Result<InterpolatedValue<T>> {
        if input_range.len() != output_range.len() {
            return Err(AnimationError::RangeLengthMismatch {
                input: input_range.len(),
                output: output_range.len(),
            });
        }
        if input_range.len() < 2 {
            return Err(AnimationError::RangeTooShort(input_range.len()));
        }
        for i in 1..input_range.len() {
            if input_range[i] < input_range[i - 1] {
                return Err(AnimationError::NonMonotonicRange(i));
            }
        }
        Ok(InterpolatedValue {
            source: self.clone(),
            input_range,
            output_range,
            extrapolate,
        })
    }

    fn unsubscribe_id(inner: &Mutex<ValueInner>, id: u64) {
        let mut inner = inner.lock().unwrap();
        let before = inner.listeners.len();
        inner.listeners.retain(|(lid, _)| *lid != id);
        if inner.listeners.len() == before && inner.fanout_depth > 0 {
            // The listener is out on loan; drop it when fan-out returns
            inner.pending_removals.push(id);
        }
    }
}

impl std::fmt::Debug for AnimatedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimatedValue")
            .field("value", &self.get())
            .finish()
    }
}

/// Handle returned by `AnimatedValue::subscribe`
///
/// Dropping the handle does not unsubscribe; call `unsubscribe` explicitly.
/// Unsubscribing twice, or after the cell is gone, is a no-op.
pub struct Subscription {
    inner: Weak<Mutex<ValueInner>>,
    id: u64,
}

impl Subscription {
    pub fn unsubscribe(&self) {
        if let Some(inner) = self.inner.upgrade() {
            AnimatedValue::unsubscribe_id(&inner, self.id);
        }
    }
}

/// How an `InterpolatedValue` behaves outside its input range
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Extrapolation {
    /// Hold the nearest output breakpoint
    #[default]
    Clamp,
    /// Continue the slope of the edge segment
    Extend,
    /// Pass the raw input through unchanged; falls back to clamping for
    /// output types that cannot represent the input
    Identity,
}

/// A read-only value derived from an `AnimatedValue` through piecewise-linear
/// mapping over non-uniform breakpoints. There is deliberately no setter:
/// derived values change only when their source does.
pub struct InterpolatedValue<T: Interpolate> {
    source: AnimatedValue,
    input_range: Vec<f32>,
    output_range: Vec<T>,
    extrapolate: Extrapolation,
}

impl<T: Interpolate> InterpolatedValue<T> {
    /// Current derived value, computed from the source cell
    pub fn get(&self) -> T {
        self.map(self.source.get())
    }

    fn map(&self, x: f32) -> T {
        let input = &self.input_range;
        let output = &self.output_range;
        let last = input.len() - 1;

        if x < input[0] || x > input[last] {
            match self.extrapolate {
                Extrapolation::Identity => {
                    if let Some(value) = T::identity(x) {
                        return value;
                    }
                    // Fall through to clamping
                }
                Extrapolation::Extend => {
                    let (i, j) = if x < input[0] { (0, 1) } else { (last - 1, last) };
                    let span = input[j] - input[i];
                    if span > f32::EPSILON {
                        let t = (x - input[i]) / span;
                        return output[i].lerp(&output[j], t);
                    }
                    // Degenerate edge segment; clamp instead
                }
                Extrapolation::Clamp => {}
            }
            return if x < input[0] {
                output[0].clone()
            } else {
                output[last].clone()
            };
        }

        // Find the bracketing segment; ties resolve to the earlier segment
        let mut i = 0;
        while i < last - 1 && x > input[i + 1] {
            i += 1;
        }
        let span = input[i + 1] - input[i];
        let t = if span > f32::EPSILON {
            (x - input[i]) / span
        } else {
            0.0
        };
        output[i].lerp(&output[i + 1], t)
    }
}
