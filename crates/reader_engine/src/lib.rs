//! Reader engine: feed fetching, decoding, caching and the store runtime.
mod codec;
mod fetch;
mod loader;
mod parse;
mod persist;
mod reader;
mod storage;
mod store;
mod text;
mod types;

pub use codec::{decode_feeds, encode_feeds};
pub use fetch::{DocumentFetcher, FetchSettings, ReqwestFetcher};
pub use loader::FeedLoader;
pub use parse::{FeedDecoder, FeedRsDecoder, ParseError};
pub use persist::{
    ensure_output_dir, AtomicFileWriter, FilePersistence, MemoryPersistence, PersistError,
    Persistence,
};
pub use reader::RssReader;
pub use storage::FeedStorage;
pub use store::{FeedStore, SIDE_EFFECT_CAPACITY};
pub use text::{decode_text, DecodedText, TextDecodeError};
pub use types::{FailureKind, FetchError};
