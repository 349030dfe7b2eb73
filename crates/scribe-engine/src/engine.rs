//! Correlation of extracted log events into bindings and action records.
//!
//! Two independent single-value slots carry state between events:
//!
//! - the pending locator, set by every `LocatorDiscovered` (the newest one
//!   wins) and consumed by the next `ElementBound`;
//! - the armed type target, set by `InteractionValueTarget` and read by
//!   `InteractionText`. Whether reading it also clears it is decided by
//!   [`TypeTargetPolicy`].
//!
//! Events must be fed in log order. Locator-then-element and
//! value-then-text are only meaningful as adjacent pairs.

use crate::config::{CorrelationConfig, TypeTargetPolicy};
use crate::error::ScribeError;
use crate::naming::{NamingOracle, choose_name};
use crate::registry::{BindResult, Binding, ElementRegistry};
use crate::writer::ArtifactSink;
use scribe_common::{ActionRecord, ExtractedEvent};
use std::sync::Arc;
use tracing::{debug, info};

/// Why an event produced nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// Element reference arrived with no locator waiting for it.
    NoPendingLocator,
    /// The element id was bound earlier; the first binding stands.
    AlreadyBound,
    /// Interaction with an element that was never bound.
    UnknownElement,
    /// Text arrived with no armed type target.
    NoTypeTarget,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    LocatorPending,
    Bound(Binding),
    Armed,
    Recorded(ActionRecord),
    Dropped(DropReason),
}

pub struct CorrelationEngine<S: ArtifactSink> {
    registry: ElementRegistry,
    oracle: Arc<dyn NamingOracle>,
    sink: S,
    pending_locator: Option<String>,
    type_target: Option<String>,
    type_target_policy: TypeTargetPolicy,
}

impl<S: ArtifactSink> CorrelationEngine<S> {
    pub fn new(config: &CorrelationConfig, oracle: Arc<dyn NamingOracle>, sink: S) -> Self {
        Self {
            registry: ElementRegistry::new(config.collision_policy),
            oracle,
            sink,
            pending_locator: None,
            type_target: None,
            type_target_policy: config.type_target_policy,
        }
    }

    pub fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn pending_locator(&self) -> Option<&str> {
        self.pending_locator.as_deref()
    }

    pub fn type_target(&self) -> Option<&str> {
        self.type_target.as_deref()
    }

    /// Apply one event. Errors are persistence failures and are fatal.
    pub async fn process(&mut self, event: ExtractedEvent) -> Result<Outcome, ScribeError> {
        match event {
            ExtractedEvent::LocatorDiscovered(locator) => {
                debug!("Found XPath in logs: {}", locator);
                self.pending_locator = Some(locator);
                Ok(Outcome::LocatorPending)
            }
            ExtractedEvent::ElementBound(id) => self.bind(id).await,
            ExtractedEvent::InteractionClick(id) => {
                debug!("Found click for id {}...", short_id(&id));
                match self.registry.lookup_name(&id).map(str::to_string) {
                    Some(name) => self.record(ActionRecord::tap(name)).await,
                    None => Ok(Outcome::Dropped(DropReason::UnknownElement)),
                }
            }
            ExtractedEvent::InteractionValueTarget(id) => {
                debug!("Armed type target {}...", short_id(&id));
                self.type_target = Some(id);
                Ok(Outcome::Armed)
            }
            ExtractedEvent::InteractionText(text) => self.type_text(text).await,
        }
    }

    async fn bind(&mut self, id: String) -> Result<Outcome, ScribeError> {
        let Some(locator) = self.pending_locator.take() else {
            debug!("Element {} has no pending locator", short_id(&id));
            return Ok(Outcome::Dropped(DropReason::NoPendingLocator));
        };

        if self.registry.contains_id(&id) {
            debug!("Element {} is already bound", short_id(&id));
            return Ok(Outcome::Dropped(DropReason::AlreadyBound));
        }

        let choice = choose_name(self.oracle.as_ref(), &locator, self.registry.len()).await;
        match self.registry.bind(&id, &choice.name, &locator) {
            BindResult::Bound(binding) => {
                self.sink.write_registry(self.registry.snapshot()).await?;
                info!(
                    "Saved locator {} ({:?}) for element {}",
                    binding.name,
                    choice.source,
                    short_id(&id)
                );
                Ok(Outcome::Bound(binding))
            }
            BindResult::AlreadyBound { .. } => Ok(Outcome::Dropped(DropReason::AlreadyBound)),
        }
    }

    async fn type_text(&mut self, text: String) -> Result<Outcome, ScribeError> {
        let target = match self.type_target_policy {
            TypeTargetPolicy::OneShot => self.type_target.take(),
            TypeTargetPolicy::Sticky => self.type_target.clone(),
        };
        let Some(id) = target else {
            return Ok(Outcome::Dropped(DropReason::NoTypeTarget));
        };
        match self.registry.lookup_name(&id).map(str::to_string) {
            Some(name) => self.record(ActionRecord::type_text(text, name)).await,
            None => Ok(Outcome::Dropped(DropReason::UnknownElement)),
        }
    }

    async fn record(&mut self, record: ActionRecord) -> Result<Outcome, ScribeError> {
        self.sink.append_action(&record).await?;
        Ok(Outcome::Recorded(record))
    }

    /// Flush the sink before the engine is dropped.
    pub async fn shutdown(&mut self) -> Result<(), ScribeError> {
        self.sink.flush().await
    }
}

fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}
