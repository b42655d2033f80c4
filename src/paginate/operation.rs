//! Remote operation handle invoked once per paginator step.

// self
use crate::{_prelude::*, obs::OpSpan};

/// Boxed future returned by [`Operation::call`].
pub type OperationFuture<'a, O, E> = Pin<Box<dyn Future<Output = Result<O, E>> + 'a + Send>>;

/// A single "list" style remote call: one input in, one page out.
///
/// The paginator treats implementations as black boxes. Signing, credential resolution,
/// transport, and retries all happen inside `call`; whatever error it yields reaches the
/// consumer unchanged.
///
/// Any `Fn(I, OperationContext) -> impl Future<Output = Result<O, E>>` closure implements this
/// trait, so most callers never write an impl by hand.
pub trait Operation<I>
where
	Self: Send + Sync,
{
	/// Page type produced by the call.
	type Output;
	/// Failure type produced by the call.
	type Error;

	/// Issues the call for `input`.
	fn call(
		&self,
		input: I,
		ctx: OperationContext,
	) -> OperationFuture<'_, Self::Output, Self::Error>;
}
impl<I, F, Fut, O, E> Operation<I> for F
where
	F: Send + Sync + Fn(I, OperationContext) -> Fut,
	Fut: 'static + Send + Future<Output = Result<O, E>>,
{
	type Error = E;
	type Output = O;

	fn call(&self, input: I, ctx: OperationContext) -> OperationFuture<'_, O, E> {
		Box::pin(self(input, ctx))
	}
}

/// Per-call context handed to the operation alongside its input.
#[derive(Clone, Debug)]
pub struct OperationContext {
	/// Zero-based index of the page being requested.
	pub page: usize,
	/// Span the paginator opened for this step; operations may log inside it.
	pub span: OpSpan,
	/// Optional execution-context hint (event loop, worker pool, region affinity).
	pub locality: Option<Arc<str>>,
}
impl OperationContext {
	pub(crate) fn new(page: usize, span: OpSpan, locality: Option<Arc<str>>) -> Self {
		Self { page, span, locality }
	}

	/// Returns the locality hint, if the paginator was given one.
	pub fn locality(&self) -> Option<&str> {
		self.locality.as_deref()
	}
}
