//! Document provider capability and caller-owned sessions
//!
//! The provider stands for the host application that can open decks. It is
//! shared; a [`DeckSession`] borrows it, owns exactly one open deck, and on
//! close or drop releases only that deck. Nothing here ever shuts the host
//! down.

use std::path::Path;

use crate::{Deck, Result};

/// A host capable of opening decks
pub trait DocumentProvider {
    type Deck: Deck;

    /// Open the document at `path`
    fn open(&self, path: &Path) -> Result<Self::Deck>;

    /// Release one open document. Other documents stay open.
    fn close(&self, deck: &mut Self::Deck) -> Result<()>;
}

/// One open document, released when the session ends
pub struct DeckSession<'p, P: DocumentProvider> {
    provider: &'p P,
    deck: P::Deck,
    closed: bool,
}

impl<'p, P: DocumentProvider> DeckSession<'p, P> {
    /// Open a document through `provider`
    pub fn open(provider: &'p P, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let deck = provider.open(path)?;
        tracing::debug!("Opened session for {}", path.display());
        Ok(Self {
            provider,
            deck,
            closed: false,
        })
    }

    pub fn deck(&self) -> &P::Deck {
        &self.deck
    }

    pub fn deck_mut(&mut self) -> &mut P::Deck {
        &mut self.deck
    }

    /// Close the session, surfacing any release error
    pub fn close(mut self) -> Result<()> {
        self.closed = true;
        tracing::debug!("Closing session for {}", self.deck.name());
        self.provider.close(&mut self.deck)
    }
}

impl<P: DocumentProvider> Drop for DeckSession<'_, P> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.provider.close(&mut self.deck) {
            tracing::warn!("Failed to release {}: {}", self.deck.name(), e);
        }
    }
}
