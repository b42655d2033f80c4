//! Lazy, cursor-driven pagination over a single remote "list" operation.
//!
//! A [`Paginator`] is an immutable definition: the initial input, the operation handle, and
//! the loop-guard policy. Each call to [`Paginator::pages`] starts an independent [`Pages`]
//! iterator from the original input, issuing exactly one operation call per produced page
//! and never reading ahead. After every page the continuation token decides what happens next:
//!
//! | Page shape | Result |
//! |---|---|
//! | no token | last page |
//! | token equals the token just sent (loop guard on) | last page |
//! | `more_results() == Some(false)` | last page |
//! | fresh token, flag absent or `true` | next call uses the new token |
//!
//! The final page is always delivered before the run ends, and a failed call ends the run
//! after its error has been returned once.

pub mod operation;
pub mod pages;
pub mod policy;

pub use operation::*;
pub use pages::*;
pub use policy::{LoopGuard, StopReason};

// self
use crate::_prelude::*;

/// Request type of a paginated operation.
///
/// Implementations expose the continuation token currently carried by the request and a way
/// to derive the next request. Every field other than the token must be preserved.
pub trait PaginatedInput
where
	Self: Clone,
{
	/// Opaque cursor type; only equality is ever inspected.
	type Token: Clone + PartialEq;

	/// Token carried by this request; `None` on the first call.
	fn pagination_token(&self) -> Option<&Self::Token>;

	/// Returns a copy of this request with `token` substituted.
	fn with_pagination_token(&self, token: Self::Token) -> Self;
}

/// Response type of a paginated operation.
pub trait PaginatedOutput {
	/// Cursor type; must match the input's token type.
	type Token;

	/// Token for the following page; `None` when the server reports no further pages.
	fn next_token(&self) -> Option<&Self::Token>;

	/// Explicit "more results" flag (`IsTruncated`, `HasMoreResults`, ...), when the
	/// operation has one. `Some(false)` ends the run even if a token is present.
	fn more_results(&self) -> Option<bool> {
		None
	}
}

/// Immutable pagination definition; cheap to clone and share across tasks.
pub struct Paginator<I, Op>
where
	I: PaginatedInput,
{
	input: I,
	operation: Arc<Op>,
	loop_guard: LoopGuard,
	locality: Option<Arc<str>>,
}
impl<I, Op> Paginator<I, Op>
where
	I: PaginatedInput,
	Op: Operation<I>,
	Op::Output: PaginatedOutput<Token = I::Token>,
{
	/// Creates a definition starting at `input` with the default [`LoopGuard::EchoedToken`].
	pub fn new(input: I, operation: Op) -> Self {
		Self::from_shared(input, Arc::new(operation))
	}

	/// Same as [`Paginator::new`] for an operation handle that is already shared.
	pub fn from_shared(input: I, operation: Arc<Op>) -> Self {
		Self { input, operation, loop_guard: LoopGuard::default(), locality: None }
	}

	/// Overrides the loop-detection policy.
	pub fn with_loop_guard(mut self, loop_guard: LoopGuard) -> Self {
		self.loop_guard = loop_guard;

		self
	}

	/// Attaches an execution-context hint forwarded to every call.
	pub fn with_locality(mut self, locality: impl Into<Arc<str>>) -> Self {
		self.locality = Some(locality.into());

		self
	}

	/// Returns the input the first call of every run uses.
	pub fn input(&self) -> &I {
		&self.input
	}

	/// Returns the configured loop-detection policy.
	pub fn loop_guard(&self) -> LoopGuard {
		self.loop_guard
	}

	/// Starts a new run from the original input.
	pub fn pages(&self) -> Pages<I, Op> {
		Pages::new(
			self.input.clone(),
			self.operation.clone(),
			self.loop_guard,
			self.locality.clone(),
		)
	}

	/// Folds every page into an accumulator, in cursor order.
	///
	/// Stops at the first failure, whether it comes from the operation or from `combine`.
	pub async fn reduce<Acc, F, Fut>(
		&self,
		initial: Acc,
		mut combine: F,
	) -> Result<Acc, Op::Error>
	where
		F: FnMut(Acc, Op::Output) -> Fut,
		Fut: Future<Output = Result<Acc, Op::Error>>,
	{
		let mut acc = initial;
		let mut pages = self.pages();

		while let Some(page) = pages.next().await? {
			acc = combine(acc, page).await?;
		}

		Ok(acc)
	}

	/// In-place variant of [`Paginator::reduce`]; `update` mutates the accumulator per page
	/// and may await between pages.
	pub async fn reduce_into<Acc, F>(&self, initial: Acc, mut update: F) -> Result<Acc, Op::Error>
	where
		F: AsyncFnMut(&mut Acc, Op::Output) -> Result<(), Op::Error>,
	{
		let mut acc = initial;
		let mut pages = self.pages();

		while let Some(page) = pages.next().await? {
			update(&mut acc, page).await?;
		}

		Ok(acc)
	}
}
impl<I, Op> Clone for Paginator<I, Op>
where
	I: PaginatedInput,
{
	fn clone(&self) -> Self {
		Self {
			input: self.input.clone(),
			operation: self.operation.clone(),
			loop_guard: self.loop_guard,
			locality: self.locality.clone(),
		}
	}
}
impl<I, Op> Debug for Paginator<I, Op>
where
	I: PaginatedInput + Debug,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Paginator")
			.field("input", &self.input)
			.field("loop_guard", &self.loop_guard)
			.field("locality", &self.locality)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// self
	use super::*;
	use crate::_preludet::*;

	fn two_page_operation() -> ScriptedOperation {
		ScriptedOperation::default()
			.on(None, ListOutput::page(&[1, 2], Some("A")))
			.on(Some("A"), ListOutput::page(&[3], None))
	}

	#[tokio::test]
	async fn reduce_matches_manual_folding() {
		let paginator = Paginator::new(ListInput::new("logs/"), two_page_operation());
		let reduced = paginator
			.reduce(Vec::<u32>::new(), |mut acc, page| async move {
				acc.extend(page.items);

				Ok(acc)
			})
			.await
			.expect("Two-page reduce should succeed.");
		let mut manual = Vec::new();
		let mut pages = paginator.pages();

		while let Some(page) = pages.next().await.expect("Manual iteration should succeed.") {
			manual.extend(page.items);
		}

		assert_eq!(reduced, vec![1, 2, 3]);
		assert_eq!(reduced, manual);
	}

	#[tokio::test]
	async fn reduce_into_preserves_order() {
		let paginator = Paginator::new(ListInput::new("logs/"), two_page_operation());
		let items = paginator
			.reduce_into(Vec::<u32>::new(), async |acc: &mut Vec<u32>, page: ListOutput| {
				acc.extend(page.items);

				Ok(())
			})
			.await
			.expect("Two-page reduce_into should succeed.");

		assert_eq!(items, vec![1, 2, 3]);
	}

	#[tokio::test]
	async fn reduce_into_update_may_await() {
		let paginator = Paginator::new(ListInput::new("logs/"), two_page_operation());
		let items = paginator
			.reduce_into(Vec::<u32>::new(), async |acc: &mut Vec<u32>, page: ListOutput| {
				for item in page.items {
					tokio::task::yield_now().await;
					acc.push(item * 10);
				}

				Ok(())
			})
			.await
			.expect("Awaiting updates should succeed.");

		assert_eq!(items, vec![10, 20, 30]);
	}

	#[tokio::test]
	async fn update_failure_short_circuits() {
		let operation = Arc::new(two_page_operation());
		let paginator = Paginator::from_shared(ListInput::new("logs/"), operation.clone());
		let err = paginator
			.reduce_into(0_usize, async |_: &mut usize, _: ListOutput| {
				Err(ScriptedFailure::Injected { message: "update rejected".into() })
			})
			.await
			.expect_err("A failing update should abort the fold.");

		assert_eq!(err, ScriptedFailure::Injected { message: "update rejected".into() });
		assert_eq!(operation.calls(), 1);
	}

	#[tokio::test]
	async fn combine_failure_short_circuits() {
		let operation = Arc::new(two_page_operation());
		let paginator = Paginator::from_shared(ListInput::new("logs/"), operation.clone());
		let err = paginator
			.reduce(0_usize, |_, _| async {
				Err(ScriptedFailure::Injected { message: "combine rejected".into() })
			})
			.await
			.expect_err("A failing combine should abort the fold.");

		assert_eq!(err, ScriptedFailure::Injected { message: "combine rejected".into() });
		assert_eq!(operation.calls(), 1);
		assert_eq!(operation.seen(), vec![ListInput::new("logs/")]);
	}

	#[tokio::test]
	async fn closures_act_as_operations() {
		let calls = Arc::new(AtomicUsize::new(0));
		let counter = calls.clone();
		let operation = move |input: ListInput, ctx: OperationContext| {
			counter.fetch_add(1, Ordering::SeqCst);

			async move {
				let page = match input.token.as_deref() {
					None => ListOutput::page(&[10], Some("next")),
					Some(_) => ListOutput::page(&[ctx.page as u32], None),
				};

				Ok::<_, ScriptedFailure>(page)
			}
		};
		let paginator =
			Paginator::new(ListInput::new("logs/"), operation).with_locality("worker-1");
		let total = paginator
			.reduce(0_u32, |acc, page| async move { Ok(acc + page.items.iter().sum::<u32>()) })
			.await
			.expect("Closure-backed pagination should succeed.");

		assert_eq!(total, 11);
		assert_eq!(calls.load(Ordering::SeqCst), 2);
	}

	#[test]
	fn definitions_are_shareable() {
		fn assert_send_sync<T: Send + Sync>() {}

		assert_send_sync::<Paginator<ListInput, ScriptedOperation>>();
	}
}
