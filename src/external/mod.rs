pub mod payload;

pub use payload::{load_payload, CryptoPrice, NavRecord, OhlcvRow, RawSeries};
