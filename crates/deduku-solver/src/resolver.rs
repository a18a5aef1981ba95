//! The fixed-point driver over the technique catalog.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use deduku_core::Field;
use derive_more::IsVariant;
use log::debug;

use crate::{
    SolverError,
    technique::{self, BoxedTechnique, TechniqueSet},
};

/// A cooperative cancellation flag shared with a hosting thread.
///
/// The core is single-threaded; the token exists so that a host (a UI
/// wrapper running the resolver off its event loop) can ask a running
/// solve to stop. The resolver checks it between techniques, and long
/// technique scans check it between houses or candidate values. On stop
/// the field is left in whatever consistent partial state it reached.
#[derive(Debug, Clone, Default)]
pub struct StopToken {
    flag: Arc<AtomicBool>,
}

impl StopToken {
    /// Creates a token with the stop flag cleared.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks the running solve to stop at its next check point.
    pub fn request_stop(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once a stop has been requested.
    #[must_use]
    pub fn is_stop_requested(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Clears the flag so the resolver can be run again.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::Relaxed);
    }
}

/// The terminal condition of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IsVariant)]
pub enum Resolution {
    /// Every cell resolved and the grid is valid.
    Solved,
    /// The grid is valid but the enabled catalog has no more deductions.
    Stuck,
    /// A contradiction was reached: the puzzle has no solution.
    Invalid,
}

/// A notification sent to the resolver's observer.
///
/// Observers exist for visualizers and timers only; solving behaves
/// identically with or without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverEvent {
    /// A full pass over the catalog is starting.
    NewIteration,
    /// The named technique is about to run.
    TechniqueStarted {
        /// Technique name.
        name: &'static str,
    },
    /// The named technique ran and changed the field.
    TechniqueApplied {
        /// Technique name.
        name: &'static str,
    },
    /// The named technique ran without changing anything.
    TechniqueDone {
        /// Technique name.
        name: &'static str,
    },
    /// The solve finished.
    Finished {
        /// Terminal condition of the field.
        resolution: Resolution,
        /// Wall-clock duration of the solve.
        elapsed: Duration,
    },
}

/// The observer callback slot.
pub type EventSink = Box<dyn FnMut(ResolverEvent)>;

/// A catalog entry: a technique plus its enable flag.
#[derive(Debug)]
pub struct RegisteredTechnique {
    technique: BoxedTechnique,
    enabled: bool,
}

impl RegisteredTechnique {
    /// Returns the technique's name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.technique.name()
    }

    /// Returns `true` if the resolver will run this technique.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enables or disables the technique.
    ///
    /// Disabling a technique that cannot be disabled (naked single) is
    /// a no-op.
    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled && !self.technique.can_be_disabled() {
            return;
        }
        self.enabled = enabled;
    }

    /// Returns the technique itself.
    #[must_use]
    pub fn technique(&self) -> &dyn crate::Technique {
        self.technique.as_ref()
    }
}

/// Drives an ordered list of techniques over a [`Field`] until nothing
/// changes.
///
/// The loop is the heart of human-style solving: run the techniques in
/// order, and the moment one of them changes the field, start over from
/// the top. A full pass with no change means the enabled catalog is
/// exhausted.
///
/// # Examples
///
/// ```
/// use deduku_core::Field;
/// use deduku_solver::{Resolution, Resolver, TechniqueSet};
///
/// let field = Field::from_plain_line(
///     "53..7....6..195....98....6.8...6...34..8.3..17...2...6.6....28....419..5....8..79",
/// )
/// .expect("valid puzzle text");
///
/// let mut resolver = Resolver::new(field);
/// resolver.register_catalog(TechniqueSet::all());
/// assert_eq!(resolver.resolve(), Resolution::Solved);
/// println!("took {:?}", resolver.resolve_time());
/// ```
pub struct Resolver {
    field: Field,
    techniques: Vec<RegisteredTechnique>,
    stop: StopToken,
    elapsed: Duration,
    observer: Option<EventSink>,
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("field", &self.field)
            .field("techniques", &self.techniques)
            .field("elapsed", &self.elapsed)
            .finish_non_exhaustive()
    }
}

impl Resolver {
    /// Creates a resolver over `field` with an empty catalog.
    #[must_use]
    pub fn new(field: Field) -> Self {
        Self {
            field,
            techniques: Vec::new(),
            stop: StopToken::new(),
            elapsed: Duration::ZERO,
            observer: None,
        }
    }

    /// Creates a resolver with the full catalog enabled.
    #[must_use]
    pub fn with_default_techniques(field: Field) -> Self {
        let mut resolver = Self::new(field);
        resolver.register_catalog(TechniqueSet::all());
        resolver
    }

    /// Appends a technique to the catalog, enabled.
    pub fn register(&mut self, technique: BoxedTechnique) {
        self.techniques.push(RegisteredTechnique {
            technique,
            enabled: true,
        });
    }

    /// Registers the default catalog in order, enabling exactly the
    /// techniques in `set` (naked single stays enabled regardless).
    pub fn register_catalog(&mut self, set: TechniqueSet) {
        for (flag, technique) in TechniqueSet::ORDERED
            .into_iter()
            .zip(technique::all_techniques())
        {
            let mut registered = RegisteredTechnique {
                technique,
                enabled: true,
            };
            registered.set_enabled(set.contains(flag));
            self.techniques.push(registered);
        }
    }

    /// Returns the field being solved.
    #[must_use]
    pub const fn field(&self) -> &Field {
        &self.field
    }

    /// Returns the field for direct manipulation between runs.
    pub const fn field_mut(&mut self) -> &mut Field {
        &mut self.field
    }

    /// Consumes the resolver, returning the field.
    #[must_use]
    pub fn into_field(self) -> Field {
        self.field
    }

    /// Returns the catalog in registration order.
    #[must_use]
    pub fn techniques(&self) -> &[RegisteredTechnique] {
        &self.techniques
    }

    /// Looks a technique up by its human-readable name,
    /// case-insensitively.
    #[must_use]
    pub fn technique(&self, name: &str) -> Option<&RegisteredTechnique> {
        self.techniques
            .iter()
            .find(|registered| registered.name().eq_ignore_ascii_case(name))
    }

    /// Mutable variant of [`technique`](Resolver::technique), for
    /// flipping enable flags.
    pub fn technique_mut(&mut self, name: &str) -> Option<&mut RegisteredTechnique> {
        self.techniques
            .iter_mut()
            .find(|registered| registered.name().eq_ignore_ascii_case(name))
    }

    /// Returns a token a hosting thread can use to stop the solve.
    #[must_use]
    pub fn stop_token(&self) -> StopToken {
        self.stop.clone()
    }

    /// Returns the wall-clock duration of the last
    /// [`resolve`](Resolver::resolve) run.
    #[must_use]
    pub const fn resolve_time(&self) -> Duration {
        self.elapsed
    }

    /// Installs the observer callback.
    pub fn set_observer(&mut self, observer: EventSink) {
        self.observer = Some(observer);
    }

    fn notify(&mut self, event: ResolverEvent) {
        if let Some(observer) = &mut self.observer {
            observer(event);
        }
    }

    /// Runs the fixed-point loop: apply techniques in order, restart
    /// from the top after every change, finish when a full pass changes
    /// nothing, a stop is requested, or a deduction fails.
    ///
    /// # Errors
    ///
    /// Returns the [`SolverError`] of the failing deduction; the field
    /// keeps the state that exposed it.
    pub fn process(&mut self) -> Result<(), SolverError> {
        loop {
            self.notify(ResolverEvent::NewIteration);
            let mut changed = false;
            for i in 0..self.techniques.len() {
                if self.stop.is_stop_requested() {
                    return Ok(());
                }
                if !self.techniques[i].enabled {
                    continue;
                }
                let name = self.techniques[i].name();
                self.notify(ResolverEvent::TechniqueStarted { name });
                let step = self.techniques[i].technique.apply(&mut self.field, &self.stop);
                match step {
                    Err(error) => {
                        self.notify(ResolverEvent::TechniqueDone { name });
                        return Err(error);
                    }
                    Ok(true) => {
                        self.notify(ResolverEvent::TechniqueApplied { name });
                        changed = true;
                        break;
                    }
                    Ok(false) => self.notify(ResolverEvent::TechniqueDone { name }),
                }
            }
            if !changed {
                return Ok(());
            }
        }
    }

    /// Runs [`process`](Resolver::process) with timing and maps the
    /// outcome to a terminal [`Resolution`].
    ///
    /// A contradiction is absorbed here — it is the normal way an
    /// unsolvable puzzle announces itself — and reported as
    /// [`Resolution::Invalid`].
    pub fn resolve(&mut self) -> Resolution {
        let start = Instant::now();
        let outcome = self.process();
        self.elapsed = start.elapsed();

        let resolution = match outcome {
            Err(error) => {
                debug!("solving failed: {error}");
                Resolution::Invalid
            }
            Ok(()) => {
                if self.field.is_resolved() {
                    Resolution::Solved
                } else if !self.field.is_valid() {
                    Resolution::Invalid
                } else {
                    Resolution::Stuck
                }
            }
        };
        debug!(
            "resolver finished: {resolution:?} after {:?}",
            self.elapsed
        );
        self.notify(ResolverEvent::Finished {
            resolution,
            elapsed: self.elapsed,
        });
        resolution
    }
}

#[cfg(test)]
mod tests {
    use deduku_core::Coord;

    use super::*;

    fn wiki_field() -> Field {
        Field::from_plain_line(
            "53..7....6..195....98....6.8...6...34..8.3..17...2...6.6....28....419..5....8..79",
        )
        .unwrap()
    }

    #[test]
    fn test_technique_lookup_is_case_insensitive() {
        let resolver = Resolver::with_default_techniques(Field::with_size(9));
        assert!(resolver.technique("naked single").is_some());
        assert!(resolver.technique("NAKED SINGLE").is_some());
        assert!(resolver.technique("X-Wing").is_some());
        assert!(resolver.technique("no such technique").is_none());
    }

    #[test]
    fn test_disabling_naked_single_is_noop() {
        let mut resolver = Resolver::with_default_techniques(Field::with_size(9));
        let naked = resolver.technique_mut("naked single").unwrap();
        naked.set_enabled(false);
        assert!(naked.is_enabled());

        let hidden = resolver.technique_mut("hidden single").unwrap();
        hidden.set_enabled(false);
        assert!(!hidden.is_enabled());
        hidden.set_enabled(true);
        assert!(hidden.is_enabled());
    }

    #[test]
    fn test_register_catalog_respects_selection() {
        let mut resolver = Resolver::new(Field::with_size(9));
        resolver.register_catalog(TechniqueSet::NAKED_SINGLE | TechniqueSet::HIDDEN_SINGLE);
        assert!(resolver.technique("naked single").unwrap().is_enabled());
        assert!(resolver.technique("hidden single").unwrap().is_enabled());
        assert!(!resolver.technique("x-wing").unwrap().is_enabled());
        // Never disabled, even when left out of the selection.
        let mut resolver = Resolver::new(Field::with_size(9));
        resolver.register_catalog(TechniqueSet::HIDDEN_SINGLE);
        assert!(resolver.technique("naked single").unwrap().is_enabled());
    }

    #[test]
    fn test_empty_field_is_stuck_without_changes() {
        let mut resolver = Resolver::with_default_techniques(Field::with_size(9));
        assert_eq!(resolver.resolve(), Resolution::Stuck);
        assert!(resolver.field().has_unresolved());
        assert!(resolver.field().is_valid());
    }

    #[test]
    fn test_observer_sees_lifecycle() {
        use std::{cell::RefCell, rc::Rc};

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);

        let mut resolver = Resolver::with_default_techniques(wiki_field());
        resolver.set_observer(Box::new(move |event| sink.borrow_mut().push(event)));
        let resolution = resolver.resolve();
        assert_eq!(resolution, Resolution::Solved);

        let events = events.borrow();
        assert_eq!(events.first(), Some(&ResolverEvent::NewIteration));
        assert!(matches!(
            events.last(),
            Some(ResolverEvent::Finished {
                resolution: Resolution::Solved,
                ..
            })
        ));
        assert!(
            events
                .iter()
                .any(|e| matches!(e, ResolverEvent::TechniqueApplied { name: "Naked Single" }))
        );
    }

    #[test]
    fn test_stop_requested_before_run_leaves_field_untouched() {
        let mut resolver = Resolver::with_default_techniques(wiki_field());
        let before = resolver.field().to_line();
        resolver.stop_token().request_stop();
        let resolution = resolver.resolve();
        assert_eq!(resolution, Resolution::Stuck);
        assert_eq!(resolver.field().to_line(), before);
        assert!(resolver.field().is_valid());

        // Clearing the token lets the solve run to completion.
        resolver.stop_token().reset();
        assert_eq!(resolver.resolve(), Resolution::Solved);
    }

    #[test]
    fn test_resolve_reports_elapsed_time() {
        let mut resolver = Resolver::with_default_techniques(wiki_field());
        resolver.resolve();
        // Zero is fine on a fast machine; the point is the field is set.
        let _ = resolver.resolve_time();
        assert_eq!(
            resolver.field().cell(Coord::new(1, 3, 9)).value(),
            Some(4)
        );
    }
}
