//! Transport layer: the outer JSON-lines framing of a shell endpoint.
//!
//! A response body arrives as raw chunks that are not aligned to lines or
//! characters. [`RecordStream`] reassembles them into one
//! [`TransportRecord`] per complete line, pulling the next chunk only once
//! the previous one has been consumed.

mod decoder;
mod http;
mod record;

pub use decoder::{LineDecoder, RecordStream};
pub use http::HttpTransport;
pub use record::TransportRecord;

use bytes::Bytes;
use futures_util::future::BoxFuture;
use futures_util::stream::BoxStream;

use crate::session::ExecutionContext;
use crate::Result;

/// Raw chunked response body.
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

/// Something that can deliver a request to the shell endpoint.
///
/// The execution context travels as query parameters and `body` is the
/// JSON array `[action, ...parameters]`. Implementations resolve to the
/// response body once the endpoint has accepted the request; a
/// non-success status is an error.
///
/// Transports are shared with background tasks, hence `'static`.
pub trait Transport: Send + Sync + 'static {
    fn post<'a>(
        &'a self,
        context: &'a ExecutionContext,
        body: String,
    ) -> BoxFuture<'a, Result<ByteStream>>;
}
