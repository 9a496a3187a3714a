use async_trait::async_trait;
use tokio::sync::RwLock;

/// The owning user's account, from the engine's point of view: a single
/// credit operation, applied exactly once per game finalization.
#[async_trait]
pub trait BalanceLedger: Send + Sync {
    async fn credit(&self, owner_id: &str, amount: i64) -> anyhow::Result<()>;
}

/// In-memory ledger that records every credit event, so tests can assert
/// both the resulting balance and how many times a game paid out.
#[derive(Default)]
pub struct InMemoryBalanceLedger {
    credits: RwLock<Vec<(String, i64)>>,
}

impl InMemoryBalanceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn balance_of(&self, owner_id: &str) -> i64 {
        self.credits
            .read()
            .await
            .iter()
            .filter(|(owner, _)| owner == owner_id)
            .map(|(_, amount)| amount)
            .sum()
    }

    pub async fn credit_count(&self, owner_id: &str) -> usize {
        self.credits
            .read()
            .await
            .iter()
            .filter(|(owner, _)| owner == owner_id)
            .count()
    }
}

#[async_trait]
impl BalanceLedger for InMemoryBalanceLedger {
    async fn credit(&self, owner_id: &str, amount: i64) -> anyhow::Result<()> {
        self.credits
            .write()
            .await
            .push((owner_id.to_string(), amount));
        tracing::debug!("Credited {} to {}", amount, owner_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn credits_accumulate_per_owner() {
        let ledger = InMemoryBalanceLedger::new();
        ledger.credit("p1", 200).await.unwrap();
        ledger.credit("p1", 1_000).await.unwrap();
        ledger.credit("p2", 32_000).await.unwrap();

        assert_eq!(ledger.balance_of("p1").await, 1_200);
        assert_eq!(ledger.credit_count("p1").await, 2);
        assert_eq!(ledger.balance_of("p2").await, 32_000);
        assert_eq!(ledger.balance_of("p3").await, 0);
    }
}
