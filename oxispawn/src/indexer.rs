use crate::{GenomeKey, ReproductionError};

use serde::{Deserialize, Serialize};

/// Issues strictly increasing genome keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indexer {
    next: GenomeKey,
}

impl Indexer {
    /// Creates an indexer whose first issued key is `first`.
    ///
    /// # Examples
    /// ```
    /// use oxispawn::Indexer;
    ///
    /// let mut indexer = Indexer::new(1);
    /// assert_eq!(indexer.next_key(), Ok(1));
    /// assert_eq!(indexer.next_key(), Ok(2));
    /// ```
    pub fn new(first: GenomeKey) -> Indexer {
        Indexer { next: first }
    }

    /// Issues the next key.
    ///
    /// # Errors
    /// Returns [`KeySpaceExhausted`] once the last
    /// representable key has been issued.
    ///
    /// [`KeySpaceExhausted`]: ReproductionError::KeySpaceExhausted
    pub fn next_key(&mut self) -> Result<GenomeKey, ReproductionError> {
        let key = self.next;
        self.next = key
            .checked_add(1)
            .ok_or(ReproductionError::KeySpaceExhausted(key))?;
        Ok(key)
    }

    /// Returns the key that will be issued next,
    /// without consuming it.
    pub fn peek(&self) -> GenomeKey {
        self.next
    }
}
