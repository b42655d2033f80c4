//! Termination rules applied after every page.

// self
use crate::{
	_prelude::*,
	paginate::{PaginatedInput, PaginatedOutput},
};

/// How the paginator detects a cursor that fails to advance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopGuard {
	/// Trust the server; only an absent token or a `false` flag ends the run.
	Disabled,
	/// Stop when the returned token equals the token that was just sent.
	#[default]
	EchoedToken,
	/// Stop when the returned token equals any token already sent during this run.
	///
	/// Catches longer cycles (`A → B → A`) at the cost of remembering every token.
	VisitedTokens,
}

/// Why a pagination run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StopReason {
	/// The last page carried no continuation token.
	TokenAbsent,
	/// The continuation token did not advance.
	TokenRepeated,
	/// The page reported that no further results exist.
	NoMoreResults,
	/// The operation failed.
	Failed,
}
impl StopReason {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StopReason::TokenAbsent => "token_absent",
			StopReason::TokenRepeated => "token_repeated",
			StopReason::NoMoreResults => "no_more_results",
			StopReason::Failed => "failed",
		}
	}
}
impl Display for StopReason {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Decision taken after inspecting one page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Step<T> {
	Continue(T),
	Stop(StopReason),
}

/// Applies the termination table to `output`, given the `input` that produced it.
///
/// `visited` holds the tokens sent earlier in the run and is only consulted by
/// [`LoopGuard::VisitedTokens`].
pub(crate) fn next_step<I, O>(
	guard: LoopGuard,
	input: &I,
	output: &O,
	visited: &[I::Token],
) -> Step<I::Token>
where
	I: PaginatedInput,
	O: PaginatedOutput<Token = I::Token>,
{
	let Some(token) = output.next_token() else {
		return Step::Stop(StopReason::TokenAbsent);
	};
	let repeated = match guard {
		LoopGuard::Disabled => false,
		LoopGuard::EchoedToken => input.pagination_token() == Some(token),
		LoopGuard::VisitedTokens =>
			input.pagination_token() == Some(token) || visited.contains(token),
	};

	if repeated {
		return Step::Stop(StopReason::TokenRepeated);
	}
	if output.more_results() == Some(false) {
		return Step::Stop(StopReason::NoMoreResults);
	}

	Step::Continue(token.clone())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::*;

	fn input(token: Option<&str>) -> ListInput {
		ListInput { prefix: "logs/".into(), token: token.map(Into::into) }
	}

	#[test]
	fn absent_token_stops() {
		let output = ListOutput::page(&[1], None);
		let step = next_step(LoopGuard::EchoedToken, &input(None), &output, &[]);

		assert_eq!(step, Step::Stop(StopReason::TokenAbsent));
	}

	#[test]
	fn echoed_token_stops_only_when_guarded() {
		let output = ListOutput::page(&[1], Some("X"));

		assert_eq!(
			next_step(LoopGuard::EchoedToken, &input(Some("X")), &output, &[]),
			Step::Stop(StopReason::TokenRepeated)
		);
		assert_eq!(
			next_step(LoopGuard::Disabled, &input(Some("X")), &output, &[]),
			Step::Continue("X".to_string())
		);
	}

	#[test]
	fn false_flag_overrides_fresh_token() {
		let output = ListOutput::page(&[1], Some("B")).truncated(false);

		assert_eq!(
			next_step(LoopGuard::EchoedToken, &input(Some("A")), &output, &[]),
			Step::Stop(StopReason::NoMoreResults)
		);
	}

	#[test]
	fn true_or_absent_flag_continues() {
		let flagged = ListOutput::page(&[1], Some("B")).truncated(true);
		let unflagged = ListOutput::page(&[1], Some("B"));

		assert_eq!(
			next_step(LoopGuard::EchoedToken, &input(Some("A")), &flagged, &[]),
			Step::Continue("B".to_string())
		);
		assert_eq!(
			next_step(LoopGuard::EchoedToken, &input(Some("A")), &unflagged, &[]),
			Step::Continue("B".to_string())
		);
	}

	#[test]
	fn visited_guard_catches_longer_cycles() {
		let output = ListOutput::page(&[1], Some("A"));
		let visited = ["A".to_string()];

		assert_eq!(
			next_step(LoopGuard::EchoedToken, &input(Some("B")), &output, &visited),
			Step::Continue("A".to_string())
		);
		assert_eq!(
			next_step(LoopGuard::VisitedTokens, &input(Some("B")), &output, &visited),
			Step::Stop(StopReason::TokenRepeated)
		);
	}
}
