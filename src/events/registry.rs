use std::{
    borrow::Cow,
    cell::RefCell,
    panic::{catch_unwind, AssertUnwindSafe},
    rc::Rc,
};

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::input::{key_source::KeyPhase, KeyCode};

use super::{EventKind, EventPayload};

pub type ListenerResult = anyhow::Result<()>;

type Callback = Rc<RefCell<dyn FnMut(&EventPayload<'_>) -> ListenerResult>>;

/// Handle returned by [`ListenerRegistry::on`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ListenerError {
    #[error("listener failed: {0}")]
    Failed(String),

    #[error("listener panicked: {0}")]
    Panicked(String),

    #[error("listener was re-entered while still running")]
    Reentered,
}

/// A listener that did not complete, as reported by [`ListenerRegistry::dispatch`].
#[derive(Clone, Debug, Error)]
#[error("`{kind}` listener `{context}` ({subscription:?}): {error}")]
pub struct ListenerFailure {
    pub kind: EventKind,
    pub context: Cow<'static, str>,
    pub subscription: SubscriptionId,
    #[source]
    pub error: ListenerError,
}

#[derive(Clone)]
struct Listener {
    id: SubscriptionId,
    context: Cow<'static, str>,
    priority: i32,
    key: Option<KeyCode>,
    callback: Callback,
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    by_kind: FxHashMap<EventKind, Vec<Listener>>,
}

/// Listeners keyed by [`EventKind`].
///
/// Higher priorities run first; equal priorities run in subscription order. Listeners may
/// subscribe and unsubscribe from inside a callback: a dispatch works on a snapshot taken when it
/// starts, skipping listeners removed since and not calling listeners added since.
#[derive(Default)]
pub struct ListenerRegistry {
    inner: RefCell<Listeners>,
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn on<F>(
        &self,
        kind: EventKind,
        context: impl Into<Cow<'static, str>>,
        callback: F,
    ) -> SubscriptionId
    where
        F: FnMut(&EventPayload<'_>) -> ListenerResult + 'static,
    {
        self.insert(kind, context.into(), 0, None, Rc::new(RefCell::new(callback)))
    }

    pub fn on_with_priority<F>(
        &self,
        kind: EventKind,
        context: impl Into<Cow<'static, str>>,
        priority: i32,
        callback: F,
    ) -> SubscriptionId
    where
        F: FnMut(&EventPayload<'_>) -> ListenerResult + 'static,
    {
        self.insert(kind, context.into(), priority, None, Rc::new(RefCell::new(callback)))
    }

    /// Subscribes to one key in one phase.
    pub fn on_key<F>(
        &self,
        phase: KeyPhase,
        key: KeyCode,
        context: impl Into<Cow<'static, str>>,
        priority: i32,
        callback: F,
    ) -> SubscriptionId
    where
        F: FnMut(&EventPayload<'_>) -> ListenerResult + 'static,
    {
        self.insert(
            EventKind::key(phase),
            context.into(),
            priority,
            Some(key),
            Rc::new(RefCell::new(callback)),
        )
    }

    /// Subscribes by event name. Returns `None` if the name is unknown.
    pub fn on_named<F>(
        &self,
        name: &str,
        context: impl Into<Cow<'static, str>>,
        priority: i32,
        callback: F,
    ) -> Option<SubscriptionId>
    where
        F: FnMut(&EventPayload<'_>) -> ListenerResult + 'static,
    {
        let Some(kind) = EventKind::from_name(name) else {
            log::debug!("ignoring subscription to unknown event `{name}`");
            return None;
        };

        Some(self.on_with_priority(kind, context, priority, callback))
    }

    fn insert(
        &self,
        kind: EventKind,
        context: Cow<'static, str>,
        priority: i32,
        key: Option<KeyCode>,
        callback: Callback,
    ) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();

        inner.next_id += 1;
        let id = SubscriptionId(inner.next_id);

        log::trace!("subscribing `{context}` to `{kind}` ({id:?}, priority {priority})");

        let listeners = inner.by_kind.entry(kind).or_default();
        let idx = listeners
            .iter()
            .position(|listener| listener.priority < priority)
            .unwrap_or(listeners.len());

        listeners.insert(
            idx,
            Listener {
                id,
                context,
                priority,
                key,
                callback,
            },
        );

        id
    }

    /// Returns `false` if the subscription was already gone.
    pub fn off(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();

        for listeners in inner.by_kind.values_mut() {
            if let Some(idx) = listeners.iter().position(|listener| listener.id == id) {
                listeners.remove(idx);
                return true;
            }
        }

        false
    }

    fn is_subscribed(&self, kind: EventKind, id: SubscriptionId) -> bool {
        self.inner
            .borrow()
            .by_kind
            .get(&kind)
            .map_or(false, |listeners| listeners.iter().any(|listener| listener.id == id))
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.inner.borrow().by_kind.get(&kind).map_or(0, Vec::len)
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().by_kind.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().by_kind.clear();
    }

    /// Calls every listener for `kind`, in order. A listener that fails, panics or is re-entered
    /// does not stop the others; its failure is returned instead.
    #[must_use]
    pub fn dispatch(&self, kind: EventKind, payload: &EventPayload<'_>) -> Vec<ListenerFailure> {
        let snapshot: Vec<Listener> = match self.inner.borrow().by_kind.get(&kind) {
            Some(listeners) if !listeners.is_empty() => listeners.clone(),
            _ => return vec![],
        };

        let key = payload.as_key().map(|event| event.key);

        let mut failures = vec![];
        for listener in snapshot {
            if listener.key.is_some() && listener.key != key {
                continue;
            }

            // unsubscribed by an earlier listener of this dispatch
            if !self.is_subscribed(kind, listener.id) {
                continue;
            }

            let error = match listener.callback.try_borrow_mut() {
                Ok(mut callback) => {
                    match catch_unwind(AssertUnwindSafe(|| (&mut *callback)(payload))) {
                        Ok(Ok(())) => continue,
                        Ok(Err(err)) => ListenerError::Failed(format!("{err:#}")),
                        Err(panic) => ListenerError::Panicked(panic_message(&*panic)),
                    }
                }
                Err(_) => ListenerError::Reentered,
            };

            failures.push(ListenerFailure {
                kind,
                context: listener.context,
                subscription: listener.id,
                error,
            });
        }

        failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        events::FrameInfo,
        input::key_source::KeyEvent,
    };

    fn frame() -> FrameInfo {
        FrameInfo::default()
    }

    fn recorder() -> Rc<RefCell<Vec<&'static str>>> {
        Default::default()
    }

    #[test]
    fn higher_priority_runs_first() {
        let registry = ListenerRegistry::new();
        let calls = recorder();

        for (name, priority) in [("low", -1), ("first", 0), ("high", 5), ("second", 0)] {
            let calls = calls.clone();
            registry.on_with_priority(EventKind::Draw, name, priority, move |_| {
                calls.borrow_mut().push(name);
                Ok(())
            });
        }

        let failures = registry.dispatch(EventKind::Draw, &EventPayload::Frame(&frame()));
        assert!(failures.is_empty());
        assert_eq!(*calls.borrow(), vec!["high", "first", "second", "low"]);
    }

    #[test]
    fn off_unsubscribes() {
        let registry = ListenerRegistry::new();
        let calls = recorder();

        let id = {
            let calls = calls.clone();
            registry.on(EventKind::Draw, "a", move |_| {
                calls.borrow_mut().push("a");
                Ok(())
            })
        };

        assert!(registry.off(id));
        assert!(!registry.off(id));
        assert!(registry.is_empty());

        let _ = registry.dispatch(EventKind::Draw, &EventPayload::Frame(&frame()));
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn mutation_during_dispatch_uses_snapshot() {
        let registry = Rc::new(ListenerRegistry::new());
        let calls = recorder();
        let victim = Rc::new(RefCell::new(None));

        {
            let registry2 = registry.clone();
            let calls = calls.clone();
            let victim = victim.clone();
            registry.on(EventKind::Draw, "mutator", move |_| {
                calls.borrow_mut().push("mutator");
                if let Some(id) = victim.borrow_mut().take() {
                    registry2.off(id);
                }

                let calls = calls.clone();
                registry2.on(EventKind::Draw, "late", move |_| {
                    calls.borrow_mut().push("late");
                    Ok(())
                });
                Ok(())
            });
        }
        {
            let calls = calls.clone();
            let id = registry.on(EventKind::Draw, "victim", move |_| {
                calls.borrow_mut().push("victim");
                Ok(())
            });
            *victim.borrow_mut() = Some(id);
        }

        let failures = registry.dispatch(EventKind::Draw, &EventPayload::Frame(&frame()));
        assert!(failures.is_empty());
        assert_eq!(*calls.borrow(), vec!["mutator"]);
        assert_eq!(registry.listener_count(EventKind::Draw), 2);
    }

    #[test]
    fn failures_are_isolated() {
        let registry = ListenerRegistry::new();
        let calls = recorder();

        registry.on(EventKind::Draw, "errors", |_| Err(anyhow::anyhow!("no mesh")));
        registry.on(EventKind::Draw, "panics", |_| panic!("boom"));
        {
            let calls = calls.clone();
            registry.on(EventKind::Draw, "fine", move |_| {
                calls.borrow_mut().push("fine");
                Ok(())
            });
        }

        let failures = registry.dispatch(EventKind::Draw, &EventPayload::Frame(&frame()));

        assert_eq!(*calls.borrow(), vec!["fine"]);
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].context, "errors");
        assert_eq!(failures[0].error, ListenerError::Failed("no mesh".into()));
        assert_eq!(failures[1].error, ListenerError::Panicked("boom".into()));
    }

    #[test]
    fn reentrant_dispatch_is_reported() {
        let registry = Rc::new(ListenerRegistry::new());
        let inner_failures = Rc::new(RefCell::new(vec![]));

        {
            let registry2 = registry.clone();
            let inner_failures = inner_failures.clone();
            registry.on(EventKind::Draw, "recursive", move |payload| {
                let failures = registry2.dispatch(EventKind::Draw, payload);
                inner_failures.borrow_mut().extend(failures);
                Ok(())
            });
        }

        let failures = registry.dispatch(EventKind::Draw, &EventPayload::Frame(&frame()));
        assert!(failures.is_empty());

        let inner_failures = inner_failures.borrow();
        assert_eq!(inner_failures.len(), 1);
        assert_eq!(inner_failures[0].error, ListenerError::Reentered);
    }

    #[test]
    fn key_listeners_filter_by_key() {
        let registry = ListenerRegistry::new();
        let calls = recorder();

        {
            let calls = calls.clone();
            registry.on_key(KeyPhase::Down, KeyCode::Space, "jump", 0, move |_| {
                calls.borrow_mut().push("jump");
                Ok(())
            });
        }
        {
            let calls = calls.clone();
            registry.on(EventKind::KeyDown, "any", move |_| {
                calls.borrow_mut().push("any");
                Ok(())
            });
        }

        let enter = KeyEvent {
            key: KeyCode::Return,
            phase: KeyPhase::Down,
        };
        let _ = registry.dispatch(EventKind::KeyDown, &EventPayload::Key(&enter));
        assert_eq!(*calls.borrow(), vec!["any"]);

        let space = KeyEvent {
            key: KeyCode::Space,
            phase: KeyPhase::Down,
        };
        let _ = registry.dispatch(EventKind::KeyDown, &EventPayload::Key(&space));
        assert_eq!(*calls.borrow(), vec!["any", "jump", "any"]);
    }

    #[test]
    fn unknown_names_are_rejected() {
        let registry = ListenerRegistry::new();

        assert!(registry.on_named("mousestop", "ui", 0, |_| Ok(())).is_some());
        assert!(registry.on_named("mouseexplode", "ui", 0, |_| Ok(())).is_none());
        assert_eq!(registry.listener_count(EventKind::MouseStop), 1);
    }
}
