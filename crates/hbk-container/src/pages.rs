use hbk_zip::{decompress, ZipEntries, METHOD_DEFLATE, METHOD_STORED};
use help_types::Page;

/// `PK\x03\x04`, as raw bytes rather than the little-endian integer form —
/// this is compared directly against the start of the entity buffer.
const ZIP_SIGNATURE: [u8; 4] = [0x50, 0x4b, 0x03, 0x04];

/// How many yielded pages pass before `next()` cooperatively yields back
/// to the async runtime, so the dispatcher can service an RPC call.
const YIELD_EVERY: u64 = 100;

/// Mirrors the teacher's `StreamingDecoder` state machine shape: a
/// one-time verification step, then steady-state advancing, then done.
enum State {
    Verifying,
    Streaming,
    Done,
}

/// Lazily yields `Page`s out of a file-storage ZIP entity.
///
/// `next()` is hand-written rather than `impl futures::Stream`, matching
/// the teacher's `StreamingDecoder::next` shape — the only consumer is a
/// single `while let Some(page) = pages.next().await` loop.
pub struct PageStream {
    zip_bytes: Vec<u8>,
    offset: usize,
    yielded: u64,
    state: State,
}

impl PageStream {
    pub(crate) fn new(zip_bytes: Vec<u8>) -> Self {
        Self {
            zip_bytes,
            offset: 0,
            yielded: 0,
            state: State::Verifying,
        }
    }

    /// A stream that yields nothing — used when the file-storage entity
    /// couldn't be located or read at all.
    pub(crate) fn empty() -> Self {
        Self {
            zip_bytes: Vec::new(),
            offset: 0,
            yielded: 0,
            state: State::Done,
        }
    }

    pub async fn next(&mut self) -> Option<Page> {
        loop {
            match self.state {
                State::Done => return None,
                State::Verifying => {
                    self.state = State::Streaming;
                    if !self.zip_bytes.starts_with(&ZIP_SIGNATURE) {
                        eprintln!("[1c-help] file-storage entity is not a ZIP archive");
                        self.state = State::Done;
                        return None;
                    }
                }
                State::Streaming => {
                    let mut entries = ZipEntries::new(&self.zip_bytes[self.offset..]);
                    let Some(entry) = entries.next() else {
                        self.state = State::Done;
                        return None;
                    };
                    self.offset += entries.pos();

                    if !entry.name.to_lowercase().ends_with(".html") {
                        continue;
                    }
                    if !matches!(entry.compression_method, METHOD_STORED | METHOD_DEFLATE) {
                        continue;
                    }

                    let name = entry.name.clone();
                    let Ok(bytes) = decompress(&entry) else {
                        eprintln!("[1c-help] failed to decompress {name}, skipping");
                        continue;
                    };
                    let html = String::from_utf8_lossy(&bytes).into_owned();

                    self.yielded += 1;
                    if self.yielded % YIELD_EVERY == 0 {
                        tokio::task::yield_now().await;
                    }

                    return Some(Page::new(name, html));
                }
            }
        }
    }
}
