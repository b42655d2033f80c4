//! Single-owner iterator state for one pagination run.

// crates.io
use futures::stream::{self, Stream};
// self
use crate::{
	_prelude::*,
	obs::{self, OpKind, OpOutcome, OpSpan},
	paginate::{
		Operation, OperationContext, PaginatedInput, PaginatedOutput,
		policy::{self, LoopGuard, Step, StopReason},
	},
};

/// One pagination run created by [`Paginator::pages`](crate::paginate::Paginator::pages).
///
/// The iterator owns its cursor. Once it has stopped (last page delivered or a failure
/// returned) every further [`Pages::next`] call resolves to `Ok(None)` without touching the
/// operation.
pub struct Pages<I, Op>
where
	I: PaginatedInput,
{
	operation: Arc<Op>,
	next_input: Option<I>,
	loop_guard: LoopGuard,
	locality: Option<Arc<str>>,
	visited: Vec<I::Token>,
	fetched: usize,
	stop_reason: Option<StopReason>,
}
impl<I, Op> Pages<I, Op>
where
	I: PaginatedInput,
	Op: Operation<I>,
	Op::Output: PaginatedOutput<Token = I::Token>,
{
	pub(crate) fn new(
		input: I,
		operation: Arc<Op>,
		loop_guard: LoopGuard,
		locality: Option<Arc<str>>,
	) -> Self {
		Self {
			operation,
			next_input: Some(input),
			loop_guard,
			locality,
			visited: Vec::new(),
			fetched: 0,
			stop_reason: None,
		}
	}

	/// Fetches the next page, or `Ok(None)` once the run has ended.
	///
	/// Cancel safe: dropping the returned future before it resolves leaves the cursor
	/// untouched, and the following call requests the same page again.
	pub async fn next(&mut self) -> Result<Option<Op::Output>, Op::Error> {
		let Some(input) = self.next_input.clone() else {
			return Ok(None);
		};
		let page = self.fetched;
		let span = OpSpan::new(OpKind::Paginate, "next_page");
		let ctx = OperationContext::new(page, span.clone(), self.locality.clone());

		obs::record_op_outcome(OpKind::Paginate, OpOutcome::Attempt);

		let result = span.instrument(self.operation.call(input.clone(), ctx)).await;

		obs::record_op_outcome(OpKind::Paginate, OpOutcome::of(&result));

		let output = match result {
			Ok(output) => output,
			Err(err) => {
				self.finish(page, StopReason::Failed);

				return Err(err);
			},
		};

		self.fetched += 1;

		match policy::next_step(self.loop_guard, &input, &output, &self.visited) {
			Step::Continue(token) => {
				obs::trace_page(page, None);

				if let (LoopGuard::VisitedTokens, Some(sent)) =
					(self.loop_guard, input.pagination_token())
				{
					self.visited.push(sent.clone());
				}

				self.next_input = Some(input.with_pagination_token(token));
			},
			Step::Stop(reason) => self.finish(page, reason),
		}

		Ok(Some(output))
	}

	/// Number of pages delivered so far.
	pub fn pages_fetched(&self) -> usize {
		self.fetched
	}

	/// Returns `true` once no further call will be issued.
	pub fn is_terminated(&self) -> bool {
		self.next_input.is_none()
	}

	/// Reason the run ended, if it has.
	pub fn stop_reason(&self) -> Option<StopReason> {
		self.stop_reason
	}

	/// Input the next call will use, if the run is still live.
	pub fn pending_input(&self) -> Option<&I> {
		self.next_input.as_ref()
	}

	/// Adapts the run into a [`Stream`] of pages.
	///
	/// A failure is yielded as an `Err` item, after which the stream ends.
	pub fn into_stream(self) -> impl Stream<Item = Result<Op::Output, Op::Error>> {
		stream::unfold(self, |mut pages| async move {
			match pages.next().await {
				Ok(Some(page)) => Some((Ok(page), pages)),
				Ok(None) => None,
				Err(err) => Some((Err(err), pages)),
			}
		})
	}

	fn finish(&mut self, page: usize, reason: StopReason) {
		self.next_input = None;
		self.stop_reason = Some(reason);

		obs::trace_page(page, Some(reason));
		obs::record_stop(reason);
	}
}
impl<I, Op> Debug for Pages<I, Op>
where
	I: PaginatedInput + Debug,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Pages")
			.field("next_input", &self.next_input)
			.field("loop_guard", &self.loop_guard)
			.field("fetched", &self.fetched)
			.field("stop_reason", &self.stop_reason)
			.finish()
	}
}
