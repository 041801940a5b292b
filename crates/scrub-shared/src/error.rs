use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Encoding error: {0}")]
    Encoding(#[from] bincode::Error),
}
