use crate::domain::invoice::InvoiceId;
use crate::domain::ports::CounterStoreBox;
use crate::error::Result;

/// Allocates sequential invoice identifiers from a persisted counter.
///
/// The counter is strictly increasing except when explicitly reset to 1.
pub struct InvoiceSequencer {
    counter: CounterStoreBox,
}

impl InvoiceSequencer {
    pub fn new(counter: CounterStoreBox) -> Self {
        Self { counter }
    }

    /// Formats the id the next allocation would return, without mutating
    /// the counter.
    pub async fn peek_next(&self) -> Result<InvoiceId> {
        Ok(InvoiceId::from_counter(self.counter.load().await?))
    }

    /// Returns the id for the current counter value and persists counter+1.
    pub async fn allocate_next(&self) -> Result<InvoiceId> {
        let current = self.counter.load().await?;
        self.counter.save(current + 1).await?;
        Ok(InvoiceId::from_counter(current))
    }

    /// Sets the counter back to 1.
    pub async fn reset(&self) -> Result<()> {
        self.counter.save(1).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::in_memory::InMemoryCounterStore;

    fn sequencer() -> InvoiceSequencer {
        InvoiceSequencer::new(Box::new(InMemoryCounterStore::new()))
    }

    #[tokio::test]
    async fn test_first_allocation_starts_at_one() {
        let seq = sequencer();
        assert_eq!(seq.allocate_next().await.unwrap().as_str(), "ACT-025-R-001");
    }

    #[tokio::test]
    async fn test_allocations_are_distinct_and_ascending() {
        let seq = sequencer();
        let ids: Vec<String> = {
            let mut out = Vec::new();
            for _ in 0..5 {
                out.push(seq.allocate_next().await.unwrap().as_str().to_string());
            }
            out
        };
        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted, ids);
        assert_eq!(ids.last().unwrap(), "ACT-025-R-005");
    }

    #[tokio::test]
    async fn test_peek_does_not_advance() {
        let seq = sequencer();
        assert_eq!(seq.peek_next().await.unwrap().as_str(), "ACT-025-R-001");
        assert_eq!(seq.peek_next().await.unwrap().as_str(), "ACT-025-R-001");
        assert_eq!(seq.allocate_next().await.unwrap().as_str(), "ACT-025-R-001");
        assert_eq!(seq.peek_next().await.unwrap().as_str(), "ACT-025-R-002");
    }

    #[tokio::test]
    async fn test_reset_restarts_at_one() {
        let seq = sequencer();
        for _ in 0..7 {
            seq.allocate_next().await.unwrap();
        }
        seq.reset().await.unwrap();
        assert_eq!(seq.allocate_next().await.unwrap().as_str(), "ACT-025-R-001");
    }
}
