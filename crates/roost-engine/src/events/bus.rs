//! Named, namespaced listener registry with weighted dispatch.
//!
//! An event spec is one or more space-separated names, each optionally
//! suffixed with `.namespace`: `"click.menu touchstart.menu"`. Namespaces only
//! select registrations for `unlisten`; `trigger` always fires a bare name.
//!
//! Dispatch order: each trigger stable-sorts the bucket by ascending weight,
//! then walks it from the end. Higher weights fire first; among equal weights
//! the most recently registered fires first.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::signal::{Event, Signal};
use crate::api::types::OwnerId;

/// Listener callback. Receives the bus (so it can listen, unlisten or
/// trigger re-entrantly), the owner it was registered for, and the argument.
pub type Callback<E> = Rc<dyn Fn(&EventBus<E>, OwnerId, &E)>;

/// Per-event gate deciding whether an owner's listener fires for a trigger.
pub type Behavior<E> = Rc<dyn Fn(OwnerId, &E) -> bool>;

struct Registration<E> {
    id: u64,
    owner: OwnerId,
    callback: Callback<E>,
    namespace: String,
    weight: i32,
    once: bool,
}

impl<E> Clone for Registration<E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            owner: self.owner,
            callback: Rc::clone(&self.callback),
            namespace: self.namespace.clone(),
            weight: self.weight,
            once: self.once,
        }
    }
}

/// Public view of a registration, in stored bucket order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerInfo {
    pub owner: OwnerId,
    pub namespace: String,
    pub weight: i32,
    pub once: bool,
}

/// Split an event spec into `(name, namespace)` pairs.
///
/// Pieces are separated by single spaces and split at the first `.`; either
/// half may be empty.
pub fn parse_spec(spec: &str) -> impl Iterator<Item = (&str, &str)> {
    spec.split(' ').map(|piece| match piece.find('.') {
        Some(i) => (&piece[..i], &piece[i + 1..]),
        None => (piece, ""),
    })
}

pub struct EventBus<E = Signal> {
    next_id: Cell<u64>,
    listeners: RefCell<HashMap<String, Vec<Registration<E>>>>,
    behaviors: RefCell<HashMap<String, Behavior<E>>>,
}

impl<E: Event> EventBus<E> {
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(0),
            listeners: RefCell::new(HashMap::new()),
            behaviors: RefCell::new(HashMap::new()),
        }
    }

    /// Listen for events with weight 0. Returns `owner` for chaining.
    pub fn listen<F>(&self, owner: OwnerId, spec: &str, callback: F) -> OwnerId
    where
        F: Fn(&EventBus<E>, OwnerId, &E) + 'static,
    {
        self.register(owner, spec, Rc::new(callback), 0, false)
    }

    pub fn listen_weighted<F>(&self, owner: OwnerId, spec: &str, weight: i32, callback: F) -> OwnerId
    where
        F: Fn(&EventBus<E>, OwnerId, &E) + 'static,
    {
        self.register(owner, spec, Rc::new(callback), weight, false)
    }

    /// Like `listen`, but the registration is removed after it first fires.
    pub fn once<F>(&self, owner: OwnerId, spec: &str, callback: F) -> OwnerId
    where
        F: Fn(&EventBus<E>, OwnerId, &E) + 'static,
    {
        self.register(owner, spec, Rc::new(callback), 0, true)
    }

    pub fn once_weighted<F>(&self, owner: OwnerId, spec: &str, weight: i32, callback: F) -> OwnerId
    where
        F: Fn(&EventBus<E>, OwnerId, &E) + 'static,
    {
        self.register(owner, spec, Rc::new(callback), weight, true)
    }

    fn register(
        &self,
        owner: OwnerId,
        spec: &str,
        callback: Callback<E>,
        weight: i32,
        once: bool,
    ) -> OwnerId {
        let mut listeners = self.listeners.borrow_mut();
        for (name, namespace) in parse_spec(spec) {
            log::debug!("listen {:?} on `{}` ns `{}` w{}", owner, name, namespace, weight);
            let id = self.next_id.get();
            self.next_id.set(id + 1);
            listeners.entry(name.to_string()).or_default().push(Registration {
                id,
                owner,
                callback: Rc::clone(&callback),
                namespace: namespace.to_string(),
                weight,
                once,
            });
        }
        owner
    }

    /// Stop listening.
    ///
    /// With a namespace, removes only `owner`'s registrations under that exact
    /// namespace; without one, all of `owner`'s registrations for the event.
    /// `".ns"` addresses the bucket literally named `""`, not every bucket
    /// carrying namespace `ns`. Unknown registrations are ignored.
    pub fn unlisten(&self, owner: OwnerId, spec: &str) -> OwnerId {
        for (name, namespace) in parse_spec(spec) {
            self.remove(owner, name, namespace);
        }
        owner
    }

    fn remove(&self, owner: OwnerId, name: &str, namespace: &str) {
        let mut listeners = self.listeners.borrow_mut();
        let Some(bucket) = listeners.get_mut(name) else {
            return;
        };
        // Reverse scan so removals do not shift unvisited entries.
        for i in (0..bucket.len()).rev() {
            let reg = &bucket[i];
            if reg.owner == owner && (namespace.is_empty() || reg.namespace == namespace) {
                bucket.remove(i);
            }
        }
        if bucket.is_empty() {
            listeners.remove(name);
        }
    }

    /// Fire `name` with `event`.
    ///
    /// Each visited registration is first checked against the behavior for
    /// `name`, if one is set. A `once` registration is unlistened (owner plus
    /// its namespace) right after it fires. After every fired listener,
    /// dispatch ends early if `event` reports propagation stopped.
    ///
    /// The bucket is walked live, by index, so registrations removed by a
    /// callback are not visited; an index past the shrunken end is skipped,
    /// as is a registration that shifted down after it already fired.
    pub fn trigger(&self, name: &str, event: &E) {
        let len = {
            let mut listeners = self.listeners.borrow_mut();
            let Some(bucket) = listeners.get_mut(name) else {
                return;
            };
            bucket.sort_by_key(|reg| reg.weight);
            bucket.len()
        };

        let mut visited = Vec::with_capacity(len);
        for i in (0..len).rev() {
            let reg = {
                let listeners = self.listeners.borrow();
                match listeners.get(name).and_then(|bucket| bucket.get(i)) {
                    Some(reg) if !visited.contains(&reg.id) => reg.clone(),
                    _ => continue,
                }
            };
            visited.push(reg.id);
            let behavior = self.behaviors.borrow().get(name).cloned();
            if let Some(allow) = behavior {
                if !allow(reg.owner, event) {
                    continue;
                }
            }
            (reg.callback)(self, reg.owner, event);
            if reg.once {
                self.remove(reg.owner, name, &reg.namespace);
            }
            if event.is_propagation_stopped() {
                break;
            }
        }
    }

    /// Gate every listener of `name` with `behavior`, replacing any previous one.
    pub fn set_behavior<F>(&self, name: &str, behavior: F)
    where
        F: Fn(OwnerId, &E) -> bool + 'static,
    {
        self.behaviors
            .borrow_mut()
            .insert(name.to_string(), Rc::new(behavior));
    }

    /// Share one behavior across several event names.
    pub fn set_shared_behavior(&self, name: &str, behavior: Behavior<E>) {
        self.behaviors.borrow_mut().insert(name.to_string(), behavior);
    }

    pub fn remove_behavior(&self, name: &str) -> bool {
        self.behaviors.borrow_mut().remove(name).is_some()
    }

    pub fn has_behavior(&self, name: &str) -> bool {
        self.behaviors.borrow().contains_key(name)
    }

    pub fn has_bucket(&self, name: &str) -> bool {
        self.listeners.borrow().contains_key(name)
    }

    pub fn listener_count(&self, name: &str) -> usize {
        self.listeners.borrow().get(name).map_or(0, Vec::len)
    }

    /// Registrations for `name` in stored order.
    pub fn bucket_snapshot(&self, name: &str) -> Vec<ListenerInfo> {
        self.listeners
            .borrow()
            .get(name)
            .map(|bucket| {
                bucket
                    .iter()
                    .map(|reg| ListenerInfo {
                        owner: reg.owner,
                        namespace: reg.namespace.clone(),
                        weight: reg.weight,
                        once: reg.once,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl<E: Event> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners = self.listeners.borrow();
        let mut names: Vec<&String> = listeners.keys().collect();
        names.sort();
        f.debug_struct("EventBus")
            .field("events", &names)
            .field("behaviors", &self.behaviors.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: OwnerId = OwnerId(1);
    const B: OwnerId = OwnerId(2);

    type Log = Rc<RefCell<Vec<&'static str>>>;

    fn recorder(log: &Log, tag: &'static str) -> impl Fn(&EventBus<Signal>, OwnerId, &Signal) + 'static {
        let log = Rc::clone(log);
        move |_, _, _| log.borrow_mut().push(tag)
    }

    #[test]
    fn parse_spec_splits_names_and_namespaces() {
        let parsed: Vec<_> = parse_spec("click.menu keyup .custom a.b.c").collect();
        assert_eq!(
            parsed,
            vec![("click", "menu"), ("keyup", ""), ("", "custom"), ("a", "b.c")]
        );
    }

    #[test]
    fn higher_weight_fires_first() {
        let bus = EventBus::new();
        let log = Log::default();
        bus.listen_weighted(A, "x", 1, recorder(&log, "low"));
        bus.listen_weighted(A, "x", 5, recorder(&log, "high"));
        bus.trigger("x", &Signal::new());
        assert_eq!(*log.borrow(), vec!["high", "low"]);
    }

    #[test]
    fn equal_weights_fire_latest_first() {
        let bus = EventBus::new();
        let log = Log::default();
        bus.listen(A, "x", recorder(&log, "first"));
        bus.listen(B, "x", recorder(&log, "second"));
        bus.trigger("x", &Signal::new());
        assert_eq!(*log.borrow(), vec!["second", "first"]);
    }

    #[test]
    fn trigger_without_listeners_is_noop() {
        let bus: EventBus = EventBus::new();
        bus.trigger("nothing", &Signal::new());
        assert!(!bus.has_bucket("nothing"));
    }

    #[test]
    fn listen_returns_owner_and_splits_names() {
        let bus = EventBus::new();
        let log = Log::default();
        let owner = bus.listen(A, "mousedown touchstart", recorder(&log, "press"));
        assert_eq!(owner, A);
        bus.trigger("mousedown", &Signal::new());
        bus.trigger("touchstart", &Signal::new());
        assert_eq!(*log.borrow(), vec!["press", "press"]);
    }

    #[test]
    fn once_fires_a_single_time() {
        let bus = EventBus::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        bus.once(A, "jump.ns", move |_, _, _| h.set(h.get() + 1));
        bus.trigger("jump", &Signal::new());
        bus.trigger("jump", &Signal::new());
        assert_eq!(hits.get(), 1);
        assert!(!bus.has_bucket("jump"));
        // Nothing left to remove.
        bus.unlisten(A, "jump.ns");
        assert_eq!(bus.listener_count("jump"), 0);
    }

    #[test]
    fn unlisten_with_namespace_is_selective() {
        let bus = EventBus::new();
        let log = Log::default();
        bus.listen(A, "click.a", recorder(&log, "f"));
        bus.listen(A, "click.b", recorder(&log, "g"));
        bus.listen(B, "click.a", recorder(&log, "other-owner"));
        bus.unlisten(A, "click.a");
        bus.trigger("click", &Signal::new());
        assert_eq!(*log.borrow(), vec!["other-owner", "g"]);
    }

    #[test]
    fn unlisten_without_namespace_removes_all_of_owner() {
        let bus = EventBus::new();
        let log = Log::default();
        bus.listen(A, "click.a", recorder(&log, "a"));
        bus.listen(A, "click", recorder(&log, "plain"));
        bus.listen(B, "click.b", recorder(&log, "b"));
        bus.unlisten(A, "click");
        bus.trigger("click", &Signal::new());
        assert_eq!(*log.borrow(), vec!["b"]);
    }

    #[test]
    fn empty_bucket_is_dropped() {
        let bus: EventBus = EventBus::new();
        bus.listen(A, "tick", |_, _, _| {});
        assert!(bus.has_bucket("tick"));
        bus.unlisten(A, "tick");
        assert!(!bus.has_bucket("tick"));
    }

    #[test]
    fn listen_then_unlisten_restores_bucket() {
        let bus: EventBus = EventBus::new();
        bus.listen_weighted(A, "hit.x", 2, |_, _, _| {});
        bus.listen(B, "hit", |_, _, _| {});
        let before = bus.bucket_snapshot("hit");
        bus.listen_weighted(A, "hit.temp", 9, |_, _, _| {});
        bus.unlisten(A, "hit.temp");
        assert_eq!(bus.bucket_snapshot("hit"), before);
    }

    #[test]
    fn namespace_only_unlisten_targets_empty_name() {
        // ".custom" addresses the bucket named "", not every event tagged
        // with namespace "custom".
        let bus = EventBus::new();
        let log = Log::default();
        bus.listen(A, "click.custom", recorder(&log, "click"));
        bus.listen(A, ".custom", recorder(&log, "empty"));
        bus.unlisten(A, ".custom");
        assert!(!bus.has_bucket(""));
        bus.trigger("click", &Signal::new());
        assert_eq!(*log.borrow(), vec!["click"]);
    }

    #[test]
    fn behavior_gates_without_removing() {
        let bus = EventBus::new();
        let log = Log::default();
        let open = Rc::new(Cell::new(false));
        let gate = Rc::clone(&open);
        bus.set_behavior("click", move |_, _| gate.get());
        bus.listen(A, "click", recorder(&log, "clicked"));

        bus.trigger("click", &Signal::new());
        assert!(log.borrow().is_empty());
        assert_eq!(bus.listener_count("click"), 1);

        open.set(true);
        bus.trigger("click", &Signal::new());
        assert_eq!(*log.borrow(), vec!["clicked"]);
    }

    #[test]
    fn behavior_receives_owner() {
        let bus = EventBus::new();
        let log = Log::default();
        bus.set_behavior("click", |owner, _| owner == B);
        bus.listen(A, "click", recorder(&log, "a"));
        bus.listen(B, "click", recorder(&log, "b"));
        bus.trigger("click", &Signal::new());
        assert_eq!(*log.borrow(), vec!["b"]);
        assert!(bus.remove_behavior("click"));
        assert!(!bus.has_behavior("click"));
    }

    #[test]
    fn stop_propagation_halts_dispatch() {
        let bus = EventBus::new();
        let log = Log::default();
        bus.listen_weighted(A, "click", 0, recorder(&log, "below"));
        let l = Rc::clone(&log);
        bus.listen_weighted(B, "click", 10, move |_, _, e: &Signal| {
            l.borrow_mut().push("top");
            e.stop_propagation();
        });
        bus.trigger("click", &Signal::new());
        assert_eq!(*log.borrow(), vec!["top"]);
    }

    #[test]
    fn callback_can_unlisten_lower_listener() {
        let bus = EventBus::new();
        let log = Log::default();
        bus.listen_weighted(A, "step", 0, recorder(&log, "low"));
        let l = Rc::clone(&log);
        bus.listen_weighted(B, "step", 5, move |bus, _, _| {
            l.borrow_mut().push("high");
            bus.unlisten(A, "step");
        });
        bus.trigger("step", &Signal::new());
        // "high" shifted into the freed slot but is not fired twice.
        assert_eq!(*log.borrow(), vec!["high"]);
    }

    #[test]
    fn removal_below_does_not_skip_remaining() {
        let bus = EventBus::new();
        let log = Log::default();
        bus.listen_weighted(A, "step", 0, recorder(&log, "a"));
        bus.listen_weighted(B, "step", 1, recorder(&log, "b"));
        let l = Rc::clone(&log);
        bus.listen_weighted(OwnerId(3), "step", 2, move |bus, _, _| {
            l.borrow_mut().push("c");
            bus.unlisten(A, "step");
        });
        bus.trigger("step", &Signal::new());
        assert_eq!(*log.borrow(), vec!["c", "b"]);
    }

    #[test]
    fn nested_trigger_completes_before_outer_continues() {
        let bus = EventBus::new();
        let log = Log::default();
        bus.listen(A, "inner", recorder(&log, "inner"));
        bus.listen_weighted(A, "outer", 0, recorder(&log, "outer-low"));
        let l = Rc::clone(&log);
        bus.listen_weighted(B, "outer", 1, move |bus, _, _| {
            l.borrow_mut().push("outer-high");
            bus.trigger("inner", &Signal::new());
        });
        bus.trigger("outer", &Signal::new());
        assert_eq!(*log.borrow(), vec!["outer-high", "inner", "outer-low"]);
    }

    #[test]
    fn once_with_empty_namespace_drops_owner_registrations() {
        // The removal after a once-fire uses the registration's namespace;
        // an empty one matches everything the owner has on that event.
        let bus = EventBus::new();
        let log = Log::default();
        bus.listen_weighted(A, "land.keep", 0, recorder(&log, "keep"));
        bus.once_weighted(A, "land", 5, recorder(&log, "once"));
        bus.trigger("land", &Signal::new());
        assert_eq!(*log.borrow(), vec!["once"]);
        assert!(!bus.has_bucket("land"));
    }

    #[test]
    fn works_with_unit_events() {
        let bus: EventBus<()> = EventBus::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        bus.listen(A, "start", move |_, _, _| h.set(h.get() + 1));
        bus.trigger("start", &());
        assert_eq!(hits.get(), 1);
    }
}
