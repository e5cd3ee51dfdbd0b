//! Reactive store: observable atoms and the producer/action layer.
//!
//! An [Atom] owns exactly one value and notifies subscribers synchronously,
//! in registration order, after every `set` (no structural deduplication).
//! Producers are pure `args -> transform` functions; [producer_to_action]
//! lifts one into a callable bound to a specific atom, which keeps a single
//! mutation path into shared state. Engines receive an injected `Atom`
//! handle rather than importing a global.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::types::EngineError;

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Handle returned by [Atom::subscribe]; pass to [Atom::unsubscribe].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

struct AtomInner<T> {
  value: Mutex<T>,
  listeners: Mutex<Vec<(u64, Listener<T>)>>,
  next_listener_id: AtomicU64,
}

/// A single observable mutable value cell.
///
/// Cloning the atom clones the handle, not the value: all clones share the
/// same cell, so an atom can be handed to engines, supervisors and views.
pub struct Atom<T> {
  inner: Arc<AtomInner<T>>,
}

impl<T> Clone for Atom<T> {
  fn clone(&self) -> Self {
    Self {
      inner: Arc::clone(&self.inner),
    }
  }
}

impl<T: Clone> Atom<T> {
  pub fn new(initial: T) -> Self {
    Self {
      inner: Arc::new(AtomInner {
        value: Mutex::new(initial),
        listeners: Mutex::new(Vec::new()),
        next_listener_id: AtomicU64::new(0),
      }),
    }
  }

  /// Clone of the current value.
  pub fn get(&self) -> T {
    self.inner.value.lock().expect("atom value lock").clone()
  }

  /// Replaces the value and notifies every subscriber with the new value,
  /// synchronously and in registration order. Notification happens even if
  /// the new value equals the old one.
  pub fn set(&self, value: T) {
    {
      let mut current = self.inner.value.lock().expect("atom value lock");
      *current = value.clone();
    }
    self.notify(&value);
  }

  /// Applies `transform` to the current value as one atomic read-modify-write:
  /// the value lock is held from read to commit, so a change committed by a
  /// concurrent action can never be erased by a transform computed against a
  /// stale value. A failing transform leaves the value untouched and nobody
  /// is notified. The transform runs under the lock and must not call back
  /// into the atom.
  pub fn update(
    &self,
    transform: impl FnOnce(&T) -> Result<T, EngineError>,
  ) -> Result<(), EngineError> {
    let next = {
      let mut current = self.inner.value.lock().expect("atom value lock");
      let next = transform(&current)?;
      *current = next.clone();
      next
    };
    self.notify(&next);
    Ok(())
  }

  fn notify(&self, value: &T) {
    // Listener list is snapshotted so listeners may subscribe/unsubscribe
    // re-entrantly without deadlocking.
    let listeners: Vec<Listener<T>> = {
      let guard = self.inner.listeners.lock().expect("atom listeners lock");
      guard.iter().map(|(_, l)| Arc::clone(l)).collect()
    };
    for listener in listeners {
      listener(value);
    }
  }

  pub fn subscribe(&self, listener: impl Fn(&T) + Send + Sync + 'static) -> SubscriptionId {
    let id = self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed);
    self
      .inner
      .listeners
      .lock()
      .expect("atom listeners lock")
      .push((id, Arc::new(listener)));
    SubscriptionId(id)
  }

  pub fn unsubscribe(&self, id: SubscriptionId) {
    self
      .inner
      .listeners
      .lock()
      .expect("atom listeners lock")
      .retain(|(lid, _)| *lid != id.0);
  }
}

/// The inner function of a producer: consumes the previous state by
/// reference and returns the next state. Producers never mutate their input;
/// partial updates are expressed by cloning the previous state and patching
/// the clone.
pub type Transform<S> = Box<dyn FnOnce(&S) -> Result<S, EngineError> + Send>;

/// Binds a producer to one atom.
///
/// The returned action applies the transform through [Atom::update]: the
/// read-modify-write is atomic, so concurrent actions serialize and commit
/// with one notification pass each. A failing transform leaves the atom
/// untouched and the error propagates to the caller. There is no batching
/// across actions: atomic multi-field updates must be a single producer.
pub fn producer_to_action<S, Args, P>(
  producer: P,
  atom: Atom<S>,
) -> impl Fn(Args) -> Result<(), EngineError>
where
  S: Clone,
  P: Fn(Args) -> Transform<S>,
{
  move |args| atom.update(producer(args))
}
