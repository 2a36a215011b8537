//! Decoding readout dumps from disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use crossbeam::channel::bounded;
use tracing::debug;

use crate::{decode, DecodeResult, Result};

/// Read and decode a whole readout dump.
///
/// # Errors
/// [`Error::Io`](crate::Error::Io) reading the file. Decoding itself cannot
/// fail; malformed content shows up in the result instead.
pub fn decode_file<P>(path: P) -> Result<DecodeResult>
where
    P: AsRef<Path>,
{
    let buf = fs::read(path.as_ref())?;
    debug!(path = %path.as_ref().display(), bytes = buf.len(), "decoding file");
    Ok(decode(&buf))
}

/// Decode multiple readout dumps, reading and decoding in a background
/// thread while the caller consumes results.
///
/// Buffers are decoded independently, one at a time, in the order given;
/// results carry the originating path. A read failure is reported for its
/// file and does not stop the remaining files.
pub fn decode_files<I, P>(paths: I) -> impl Iterator<Item = (PathBuf, Result<DecodeResult>)>
where
    I: IntoIterator<Item = P> + Send + 'static,
    P: AsRef<Path>,
{
    let (tx, rx) = bounded(1);

    // The handle is dropped deliberately; the thread ends when the paths are
    // exhausted or the receiver is dropped.
    let _ = thread::Builder::new()
        .name("moss_file_decoder".into())
        .spawn(move || {
            for path in paths {
                let path = path.as_ref().to_path_buf();
                let zult = decode_file(&path);
                if tx.send((path, zult)).is_err() {
                    // Receiver dropped, nothing left to do.
                    break;
                }
            }
        });

    rx.into_iter()
}
