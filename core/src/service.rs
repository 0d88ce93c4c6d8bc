use std::sync::Arc;

use crate::result::{SubmitResult, ValidationErrors};
use crate::store::{InMemoryRaffleStore, RaffleMap, RaffleStore};
use crate::validator;

/// Gates every write to the store behind validation.
#[derive(Clone)]
pub struct RaffleService {
    store: Arc<dyn RaffleStore>,
}

impl Default for RaffleService {
    fn default() -> Self {
        Self::new(Arc::new(InMemoryRaffleStore::new()))
    }
}

impl RaffleService {
    pub fn new(store: Arc<dyn RaffleStore>) -> Self {
        Self { store }
    }

    /// Codes stored for `address`. Absence is a normal outcome, not an error.
    pub fn raffle_by_address(&self, address: &str) -> Option<Vec<String>> {
        self.store.get(address)
    }

    pub fn all_raffles(&self) -> RaffleMap {
        self.store.get_all()
    }

    pub fn raffle_count(&self) -> usize {
        self.store.len()
    }

    /// Validate a submission and store it only if nothing was wrong with it.
    ///
    /// All-or-nothing: a list with one bad code stores none of its codes. An
    /// approved submission replaces anything previously stored for the address.
    /// Validation and the write are not isolated from each other, so racing
    /// submissions to one address resolve as last write wins.
    pub fn submit(&self, address: Option<&str>, codes: Option<&[Option<String>]>) -> SubmitResult {
        let errors = validator::validate_raffle(address, codes, ValidationErrors::new());

        if errors.is_empty() {
            // Validation reports a missing address, a missing list and every
            // missing code, so an empty error map means all of them are present.
            let accepted = codes.and_then(|list| list.iter().cloned().collect::<Option<Vec<_>>>());
            debug_assert!(
                address.is_some() && accepted.is_some(),
                "approved raffle with a missing address or code"
            );
            if let (Some(address), Some(codes)) = (address, accepted) {
                tracing::info!(address, codes = codes.len(), "raffle approved");
                self.store.put(address.to_owned(), codes);
            }
        } else {
            tracing::debug!(
                address = address.unwrap_or(validator::NULL_KEY),
                errors = errors.len(),
                "raffle rejected"
            );
        }

        SubmitResult::from(errors)
    }
}
