/// Load state of the graph asset for one page session.
///
/// `P` is whatever the caller waits on while the asset is in flight (a
/// promise in the browser). There is no way back to `Unloaded`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum LoadState<P> {
	/// Not requested yet.
	#[default]
	Unloaded,
	/// Injected, waiting for the load event.
	Loading(P),
	/// Available; renders may proceed immediately.
	Ready,
}

/// What a caller has to do after [`AssetLoader::request`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadStep<P> {
	/// This call injected the asset; wait on the handle.
	Started(P),
	/// Someone else injected it; wait on the same handle.
	Pending(P),
	/// Go straight to fetch and render.
	Ready,
}

/// Once-per-session loader: `Unloaded → Loading → Ready`.
#[derive(Clone, Debug, Default)]
pub struct AssetLoader<P> {
	state: LoadState<P>,
}

impl<P: Clone> AssetLoader<P> {
	/// Fresh loader in the `Unloaded` state.
	pub fn new() -> Self {
		Self { state: LoadState::Unloaded }
	}

	/// Current state.
	pub fn state(&self) -> &LoadState<P> {
		&self.state
	}

	/// Whether the asset is usable.
	pub fn is_ready(&self) -> bool {
		matches!(self.state, LoadState::Ready)
	}

	/// Asks for the asset. `inject` runs only on the very first request of
	/// the session and returns the handle every later caller waits on.
	pub fn request(&mut self, inject: impl FnOnce() -> P) -> LoadStep<P> {
		match &self.state {
			LoadState::Ready => LoadStep::Ready,
			LoadState::Loading(pending) => LoadStep::Pending(pending.clone()),
			LoadState::Unloaded => {
				let pending = inject();
				self.state = LoadState::Loading(pending.clone());
				LoadStep::Started(pending)
			}
		}
	}

	/// Marks an asset that was already on the page as ready without loading it.
	pub fn adopt_existing(&mut self) {
		if matches!(self.state, LoadState::Unloaded) {
			self.state = LoadState::Ready;
		}
	}

	/// Load event fired. Returns `true` on the `Loading → Ready` transition.
	pub fn finish(&mut self) -> bool {
		if matches!(self.state, LoadState::Loading(_)) {
			self.state = LoadState::Ready;
			true
		} else {
			false
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn injects_once_across_many_swaps() {
		let mut loader = AssetLoader::new();
		let mut injected = 0;
		let mut finished = 0;

		for swap in 0..10 {
			let step = loader.request(|| {
				injected += 1;
				"promise"
			});
			match (swap, step) {
				(0, LoadStep::Started(p)) => assert_eq!(p, "promise"),
				(1 | 2, LoadStep::Pending(p)) => assert_eq!(p, "promise"),
				(n, LoadStep::Ready) if n > 2 => {}
				(n, other) => panic!("unexpected step {other:?} on swap {n}"),
			}
			if swap == 2 && loader.finish() {
				finished += 1;
			}
		}

		assert_eq!(injected, 1);
		assert_eq!(finished, 1);
		assert!(loader.is_ready());
	}

	#[test]
	fn finish_is_a_no_op_outside_loading() {
		let mut loader: AssetLoader<u8> = AssetLoader::new();
		assert!(!loader.finish());
		assert_eq!(loader.state(), &LoadState::Unloaded);
		loader.request(|| 1);
		assert!(loader.finish());
		assert!(!loader.finish());
		assert_eq!(loader.state(), &LoadState::Ready);
	}

	#[test]
	fn existing_asset_skips_injection() {
		let mut loader: AssetLoader<u8> = AssetLoader::new();
		loader.adopt_existing();
		assert_eq!(loader.request(|| unreachable!()), LoadStep::Ready);
	}
}
