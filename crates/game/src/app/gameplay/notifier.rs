use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Payload type routed by a [`Notifier`]; handlers subscribe per kind.
pub(crate) trait Event {
    type Kind: Copy + Eq + Hash + fmt::Debug;

    fn kind(&self) -> Self::Kind;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct HandlerId(u64);

type Handler<E, C, Er> = Box<dyn FnMut(&mut C, &E) -> Result<(), Er>>;

/// Publish/subscribe dispatch over an explicit context `C`.
///
/// Handlers run in registration order. The first handler error stops the emit and is returned
/// to the caller.
pub(crate) struct Notifier<E: Event, C, Er> {
    handlers: HashMap<E::Kind, Vec<(HandlerId, Handler<E, C, Er>)>>,
    next_id: u64,
}

impl<E: Event, C, Er> Default for Notifier<E, C, Er> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
            next_id: 0,
        }
    }
}

impl<E: Event, C, Er> fmt::Debug for Notifier<E, C, Er> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<&E::Kind, usize> = self
            .handlers
            .iter()
            .map(|(kind, handlers)| (kind, handlers.len()))
            .collect();
        f.debug_struct("Notifier")
            .field("handlers", &counts)
            .finish()
    }
}

impl<E: Event, C, Er> Notifier<E, C, Er> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn on(
        &mut self,
        kind: E::Kind,
        handler: impl FnMut(&mut C, &E) -> Result<(), Er> + 'static,
    ) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.handlers
            .entry(kind)
            .or_default()
            .push((id, Box::new(handler)));
        id
    }

    /// Returns false when `id` was not subscribed to `kind`.
    pub(crate) fn off(&mut self, kind: E::Kind, id: HandlerId) -> bool {
        let Some(handlers) = self.handlers.get_mut(&kind) else {
            return false;
        };
        let before = handlers.len();
        handlers.retain(|(handler_id, _)| *handler_id != id);
        let removed = handlers.len() != before;
        if handlers.is_empty() {
            self.handlers.remove(&kind);
        }
        removed
    }

    pub(crate) fn emit(&mut self, ctx: &mut C, event: &E) -> Result<(), Er> {
        let Some(handlers) = self.handlers.get_mut(&event.kind()) else {
            return Ok(());
        };
        for (_, handler) in handlers.iter_mut() {
            handler(ctx, event)?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn handler_count(&self, kind: E::Kind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }
}
