//! The normalization core: wrap foreign errors, create fresh ones, and
//! publish every result to the observer list.
//!
//! A [`Normalizer`] is the one piece of shared state in the crate: a list of
//! subscriber callbacks notified synchronously, exactly once, after each
//! successful normalization. The list sits behind an `RwLock` so concurrent
//! request handlers can dispatch notifications (read lock) while
//! subscribe/unsubscribe (write lock) stays safe. Everything else is a pure
//! transformation of in-memory values: no I/O, no timers, no suspension
//! points.
//!
//! Two entry-point families exist for every fallible operation, following
//! the same split as a `const`/`checked` constructor pair: the plain name
//! panics on a usage [`Violation`] with the offending value in the message,
//! and the `try_` twin returns it as `Err`.

use crate::payload::Payload;
use crate::{BoxError, RestError, Violation};
use http::StatusCode;
use serde_json::Value;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Handle returned by [`Normalizer::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

type ObserverFn = Box<dyn Fn(&RestError) + Send + Sync>;

struct Observer {
    id: SubscriberId,
    callback: ObserverFn,
}

/// Normalizes error values and notifies observers of every error produced.
///
/// One instance is typically shared process-wide (it is `Send + Sync`); all
/// named status-code constructors live on it so each produced error flows
/// through the same observer list.
pub struct Normalizer {
    observers: RwLock<Vec<Observer>>,
    next_id: AtomicU64,
}

impl Normalizer {
    /// Create a normalizer with an empty observer list.
    pub fn new() -> Self {
        Self {
            observers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    // ========================================================================
    // Observer list
    // ========================================================================

    /// Register a handler for every error this normalizer produces.
    ///
    /// Handlers run synchronously, in registration order, once per
    /// normalization, and receive the fully formed error (challenge headers
    /// and flags already attached).
    pub fn subscribe<F>(&self, handler: F) -> SubscriberId
    where
        F: Fn(&RestError) + Send + Sync + 'static,
    {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut observers = self.observers.write().unwrap_or_else(|e| e.into_inner());
        observers.push(Observer {
            id,
            callback: Box::new(handler),
        });
        id
    }

    /// Remove a previously registered handler.
    ///
    /// Returns false when the id was already gone.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let mut observers = self.observers.write().unwrap_or_else(|e| e.into_inner());
        let before = observers.len();
        observers.retain(|o| o.id != id);
        observers.len() != before
    }

    pub(crate) fn notify(&self, err: &RestError) {
        let observers = self.observers.read().unwrap_or_else(|e| e.into_inner());
        tracing::trace!(
            status = err.status_code().as_u16(),
            observers = observers.len(),
            "error normalized"
        );
        for observer in observers.iter() {
            (observer.callback)(err);
        }
    }

    // ========================================================================
    // create
    // ========================================================================

    /// Build a fresh error with the given status code.
    ///
    /// Always constructs a new value (never reuses an existing error), sets
    /// `data`, and notifies observers.
    ///
    /// # Panics
    ///
    /// Panics if `status_code` is below 400 or not a representable HTTP
    /// status. Use [`try_create`](Self::try_create) to get the violation as
    /// an `Err` instead.
    pub fn create(&self, status_code: u16, message: Option<&str>, data: Option<Value>) -> RestError {
        match self.try_create(status_code, message, data) {
            Ok(err) => err,
            Err(violation) => panic!("{violation}"),
        }
    }

    /// Checked twin of [`create`](Self::create).
    ///
    /// # Errors
    ///
    /// Returns [`Violation::StatusCodeOutOfRange`] for a status code below
    /// 400 or outside the representable range.
    pub fn try_create(
        &self,
        status_code: u16,
        message: Option<&str>,
        data: Option<Value>,
    ) -> Result<RestError, Violation> {
        let status = check_status(status_code)?;
        let err = assemble_fresh(status, message, data);
        self.notify(&err);
        Ok(err)
    }

    // ========================================================================
    // wrap
    // ========================================================================

    /// Normalize any error-like value with the default status of 500.
    ///
    /// Idempotent: a value that is already a [`RestError`] comes back
    /// unchanged (no re-stamping), though observers are still notified.
    pub fn wrap<E>(&self, err: E) -> RestError
    where
        E: Into<BoxError>,
    {
        // 500 is always in range.
        match self.try_wrap_with(err, 500, None) {
            Ok(err) => err,
            Err(violation) => panic!("{violation}"),
        }
    }

    /// Normalize any error-like value with an explicit status code and an
    /// optional message prefix.
    ///
    /// A supplied message is prefixed onto the cause's own message with
    /// `": "` as the separator; the payload keeps the cause's message (the
    /// prefix is internal detail).
    ///
    /// # Panics
    ///
    /// Panics if `status_code` is below 400 or not a representable HTTP
    /// status. Use [`try_wrap_with`](Self::try_wrap_with) instead to handle
    /// the violation.
    pub fn wrap_with<E>(&self, err: E, status_code: u16, message: Option<&str>) -> RestError
    where
        E: Into<BoxError>,
    {
        match self.try_wrap_with(err, status_code, message) {
            Ok(err) => err,
            Err(violation) => panic!("{violation}"),
        }
    }

    /// Checked twin of [`wrap_with`](Self::wrap_with).
    ///
    /// # Errors
    ///
    /// Returns [`Violation::StatusCodeOutOfRange`] for a status code below
    /// 400 or outside the representable range. The idempotent path never
    /// fails: an already-normalized error is returned before the status is
    /// consulted, matching the no-re-stamping rule.
    pub fn try_wrap_with<E>(
        &self,
        err: E,
        status_code: u16,
        message: Option<&str>,
    ) -> Result<RestError, Violation>
    where
        E: Into<BoxError>,
    {
        let err = self.wrap_inner(err.into(), status_code, message)?;
        self.notify(&err);
        Ok(err)
    }

    /// Wrap without notifying; callers that keep stamping (challenge headers,
    /// flags) notify once the error is fully formed.
    pub(crate) fn wrap_inner(
        &self,
        err: BoxError,
        status_code: u16,
        message: Option<&str>,
    ) -> Result<RestError, Violation> {
        let err = match err.downcast::<RestError>() {
            // Already normalized: hand it back untouched.
            Ok(already) => return Ok(*already),
            Err(err) => err,
        };

        let status = check_status(status_code)?;

        let cause_message = err.to_string();
        let current = (!cause_message.is_empty()).then_some(cause_message.as_str());

        // Payload is computed before the prefix is applied: the prefix is
        // caller-side context, not part of the cause's own story.
        let payload = Payload::format(status, current);

        let message = match (message.filter(|m| !m.is_empty()), current) {
            (Some(prefix), Some(cause)) => format!("{prefix}: {cause}"),
            (Some(prefix), None) => prefix.to_owned(),
            (None, Some(cause)) => cause.to_owned(),
            (None, None) => payload.error().to_owned(),
        };

        Ok(RestError::assemble(status, message, None, payload, Some(err)))
    }

    /// Create without notifying, for the same staged-construction callers.
    pub(crate) fn create_inner(
        &self,
        status_code: u16,
        message: Option<&str>,
        data: Option<Value>,
    ) -> Result<RestError, Violation> {
        let status = check_status(status_code)?;
        Ok(assemble_fresh(status, message, data))
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

fn assemble_fresh(status: StatusCode, message: Option<&str>, data: Option<Value>) -> RestError {
    let message = message.filter(|m| !m.is_empty());
    let payload = Payload::format(status, message);
    // No message means the reason phrase stands in for it, but the payload
    // keeps its message absent (computed above, before the fallback).
    let message = match message {
        Some(m) => m.to_owned(),
        None => payload.error().to_owned(),
    };
    RestError::assemble(status, message, data, payload, None)
}

fn check_status(code: u16) -> Result<StatusCode, Violation> {
    if code < 400 {
        return Err(Violation::StatusCodeOutOfRange { value: code });
    }
    StatusCode::from_u16(code).map_err(|_| Violation::StatusCodeOutOfRange { value: code })
}
