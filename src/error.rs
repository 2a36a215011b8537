#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Consumption was attempted past the end of the input buffer.
    ///
    /// The decoder handles this internally to finish a pass; callers only see
    /// it when driving a [`Cursor`](crate::Cursor) directly.
    #[error("end of buffer at offset {offset}")]
    EndOfBuffer { offset: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
