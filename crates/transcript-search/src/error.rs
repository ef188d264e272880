use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error(transparent)]
    Store(#[from] transcript_store::StoreError),
}
