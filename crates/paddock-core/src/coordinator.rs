//! Load coordination with generation-numbered cycles
//!
//! Every batch of loads belongs to a cycle identified by a [`Generation`].
//! Loaders settle their request with [`LoadCoordinator::resolve`] or
//! [`LoadCoordinator::reject`] in any order and at any frame boundary. Once
//! every request registered in the cycle has settled, a single
//! [`CoordinatorEvent::Ready`] is queued. Starting a new cycle drops the
//! outstanding requests of the previous one, and completions that still
//! arrive for them are reported as [`Resolution::Stale`].

use std::collections::VecDeque;

use crate::asset::{AssetKind, AssetRequest, AssetStatus};
use crate::error::{CoordinatorError, LoadFailure};

/// Monotonically increasing load cycle id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Generation(pub u64);

impl Generation {
    pub fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

/// Handle a loader uses to report completion of one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetTicket {
    pub generation: Generation,
    pub id: u32,
}

/// Whether a completion was applied to the current cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Accepted,
    /// The ticket belongs to a superseded cycle; its result was dropped
    Stale,
}

/// Settled request with its payload or failure
#[derive(Debug)]
pub struct Settled<P> {
    pub request: AssetRequest,
    pub outcome: Result<P, LoadFailure>,
}

/// Everything a cycle produced, handed out once when the cycle completes
#[derive(Debug)]
pub struct CycleReport<P> {
    pub generation: Generation,
    pub settled: Vec<Settled<P>>,
}

impl<P> CycleReport<P> {
    /// Remove and return the first outcome of the given kind
    pub fn take(&mut self, kind: AssetKind) -> Option<Settled<P>> {
        let index = self.settled.iter().position(|s| s.request.kind == kind)?;
        Some(self.settled.remove(index))
    }

    pub fn failures(&self) -> usize {
        self.settled.iter().filter(|s| s.outcome.is_err()).count()
    }
}

#[derive(Debug)]
pub enum CoordinatorEvent<P> {
    /// Queued immediately when a request is rejected; never blocks the cycle
    AssetFailed {
        ticket: AssetTicket,
        failure: LoadFailure,
    },
    /// Queued exactly once per cycle, after every request settled
    Ready(CycleReport<P>),
}

#[derive(Debug)]
struct Entry<P> {
    request: AssetRequest,
    payload: Option<P>,
    failure: Option<LoadFailure>,
}

#[derive(Debug)]
pub struct LoadCoordinator<P> {
    generation: Generation,
    next_id: u32,
    entries: Vec<Entry<P>>,
    ready_fired: bool,
    events: VecDeque<CoordinatorEvent<P>>,
}

impl<P> Default for LoadCoordinator<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> LoadCoordinator<P> {
    pub fn new() -> Self {
        Self {
            generation: Generation::default(),
            next_id: 0,
            entries: Vec::new(),
            ready_fired: false,
            events: VecDeque::new(),
        }
    }

    /// Generation of the current (most recent) cycle
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Start a new cycle, abandoning whatever the previous one still waits on
    pub fn begin_cycle(&mut self) -> Generation {
        let abandoned = self.pending();
        self.generation = self.generation.next();
        self.next_id = 0;
        self.entries.clear();
        self.ready_fired = false;
        if abandoned > 0 {
            tracing::debug!(
                generation = self.generation.0,
                abandoned,
                "Superseded load cycle with outstanding requests"
            );
        }
        self.generation
    }

    /// Enqueue a pending request in the current cycle.
    ///
    /// Registering after the cycle has already fired `Ready` opens a new
    /// cycle first.
    pub fn register(&mut self, kind: AssetKind, locator: impl Into<String>) -> AssetRequest {
        if self.ready_fired || self.generation == Generation::default() {
            self.begin_cycle();
        }
        let ticket = AssetTicket {
            generation: self.generation,
            id: self.next_id,
        };
        self.next_id += 1;
        let request = AssetRequest {
            ticket,
            kind,
            locator: locator.into(),
            status: AssetStatus::Pending,
        };
        tracing::debug!(
            generation = ticket.generation.0,
            id = ticket.id,
            %kind,
            locator = %request.locator,
            "Registered load request"
        );
        self.entries.push(Entry {
            request: request.clone(),
            payload: None,
            failure: None,
        });
        request
    }

    /// Fire `Ready` for a cycle that registered nothing
    pub fn close_if_empty(&mut self) {
        if self.entries.is_empty() {
            self.check_ready();
        }
    }

    pub fn resolve(&mut self, ticket: AssetTicket, payload: P) -> Result<Resolution, CoordinatorError> {
        let Some(entry) = self.entry_for(ticket)? else {
            return Ok(Resolution::Stale);
        };
        entry.request.status = AssetStatus::Loaded;
        entry.payload = Some(payload);
        self.check_ready();
        Ok(Resolution::Accepted)
    }

    pub fn reject(
        &mut self,
        ticket: AssetTicket,
        reason: impl Into<String>,
    ) -> Result<Resolution, CoordinatorError> {
        let Some(entry) = self.entry_for(ticket)? else {
            return Ok(Resolution::Stale);
        };
        entry.request.status = AssetStatus::Failed;
        let failure = LoadFailure {
            kind: entry.request.kind,
            locator: entry.request.locator.clone(),
            reason: reason.into(),
        };
        entry.failure = Some(failure.clone());
        self.events
            .push_back(CoordinatorEvent::AssetFailed { ticket, failure });
        self.check_ready();
        Ok(Resolution::Accepted)
    }

    pub fn poll_event(&mut self) -> Option<CoordinatorEvent<P>> {
        self.events.pop_front()
    }

    /// Requests of the current cycle that have not settled yet
    pub fn pending(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| !e.request.is_settled())
            .count()
    }

    pub fn requests(&self) -> impl Iterator<Item = &AssetRequest> {
        self.entries.iter().map(|e| &e.request)
    }

    /// Whether the current cycle has already fired `Ready`
    pub fn is_ready(&self) -> bool {
        self.ready_fired
    }

    /// Look up the pending entry for a ticket; `Ok(None)` means stale
    fn entry_for(&mut self, ticket: AssetTicket) -> Result<Option<&mut Entry<P>>, CoordinatorError> {
        if ticket.generation != self.generation {
            tracing::debug!(
                ticket_generation = ticket.generation.0,
                current = self.generation.0,
                "Dropping completion from superseded cycle"
            );
            return Ok(None);
        }
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.request.ticket == ticket)
            .ok_or(CoordinatorError::UnknownTicket(ticket))?;
        if entry.request.is_settled() {
            return Err(CoordinatorError::AlreadySettled(ticket));
        }
        Ok(Some(entry))
    }

    fn check_ready(&mut self) {
        if self.ready_fired || self.pending() > 0 {
            return;
        }
        self.ready_fired = true;

        let settled: Vec<Settled<P>> = self
            .entries
            .iter_mut()
            .filter_map(|entry| {
                let outcome = match entry.request.status {
                    AssetStatus::Loaded => Ok(entry.payload.take()?),
                    AssetStatus::Failed => Err(entry.failure.clone()?),
                    AssetStatus::Pending => return None,
                };
                Some(Settled {
                    request: entry.request.clone(),
                    outcome,
                })
            })
            .collect();

        tracing::info!(
            generation = self.generation.0,
            requests = settled.len(),
            failures = settled.iter().filter(|s| s.outcome.is_err()).count(),
            "Load cycle complete"
        );
        self.events.push_back(CoordinatorEvent::Ready(CycleReport {
            generation: self.generation,
            settled,
        }));
    }
}
