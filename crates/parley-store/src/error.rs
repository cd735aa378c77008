use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("record serialization error: {0}")]
    Serialization(#[from] bson::ser::Error),

    #[error("record deserialization error: {0}")]
    Deserialization(#[from] bson::de::Error),
}
