use prometheus::Registry;
use raffle_core::RaffleService;
use std::time::Instant;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub raffles: RaffleService,
    pub started_at: Instant,
    pub registry: Registry,
}

impl AppState {
    pub fn new(raffles: RaffleService, registry: Registry) -> Self {
        Self {
            raffles,
            started_at: Instant::now(),
            registry,
        }
    }
}
