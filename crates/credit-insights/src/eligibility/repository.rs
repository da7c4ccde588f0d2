use super::offers::{CustomerId, Offer};

/// Storage abstraction for offers persisted by the remote database.
pub trait OfferStore: Send + Sync {
    fn offers_for(&self, customer_id: &CustomerId) -> Result<Vec<Offer>, RepositoryError>;
    fn upsert(&self, offer: Offer) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("offer not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
