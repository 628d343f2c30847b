//! Stream aliases shared by rule selection and predicate resolution.
//!
//! Solutions are produced lazily: a stream does no work until it is polled,
//! and dropping it cancels whatever search remained.

use std::pin::Pin;

pub use async_stream::try_stream;
pub use futures_core::TryStream;
pub use futures_util::{TryStreamExt, stream_select};

use crate::{Knowns, PredicatorError, RuleMatch};

/// `Send` on native targets and no bound at all on `wasm32`, so the same
/// streams can be driven by a multi-threaded runtime or a browser event loop.
#[cfg(not(target_arch = "wasm32"))]
pub trait ConditionalSend: Send {}

#[cfg(not(target_arch = "wasm32"))]
impl<S> ConditionalSend for S where S: Send {}

/// `Send + Sync` on native targets and no bound at all on `wasm32`.
#[cfg(not(target_arch = "wasm32"))]
pub trait ConditionalSync: Send + Sync {}

#[cfg(not(target_arch = "wasm32"))]
impl<S> ConditionalSync for S where S: Send + Sync {}

#[cfg(target_arch = "wasm32")]
pub trait ConditionalSend {}

#[cfg(target_arch = "wasm32")]
impl<S> ConditionalSend for S {}

#[cfg(target_arch = "wasm32")]
pub trait ConditionalSync {}

#[cfg(target_arch = "wasm32")]
impl<S> ConditionalSync for S {}

pub trait SendStream<T>:
    TryStream<Ok = T, Error = PredicatorError, Item = Result<T, PredicatorError>> + ConditionalSend
{
}
impl<S, T> SendStream<T> for S where
    S: TryStream<Ok = T, Error = PredicatorError, Item = Result<T, PredicatorError>>
        + 'static
        + ConditionalSend
{
}

/// Environments produced by resolving a predicate, one per resolution path.
pub type Solutions = Pin<Box<dyn SendStream<Knowns>>>;

/// Rules whose condition matched a pattern, in selection order.
pub type Matches = Pin<Box<dyn SendStream<RuleMatch>>>;

pub fn solutions<S>(stream: S) -> Solutions
where
    S: SendStream<Knowns> + 'static,
{
    Box::pin(stream)
}

pub fn matches<S>(stream: S) -> Matches
where
    S: SendStream<RuleMatch> + 'static,
{
    Box::pin(stream)
}

/// A stream with no solutions.
pub fn no_solutions() -> Solutions {
    solutions(futures_util::stream::empty::<Result<Knowns, PredicatorError>>())
}

/// A stream with exactly the given environment.
pub fn one_solution(knowns: Knowns) -> Solutions {
    solutions(futures_util::stream::once(async move {
        Ok::<_, PredicatorError>(knowns)
    }))
}

/// A stream that fails immediately.
pub fn failed(error: PredicatorError) -> Solutions {
    solutions(futures_util::stream::once(async move {
        Err::<Knowns, _>(error)
    }))
}
