use crate::pattern::Pattern;

/// Side-effecting dispatch expression.
///
/// Arms are tried strictly in declaration order. The first arm whose guard succeeds
/// runs and accepts the match; every later arm is skipped. A `None` value is never
/// offered to an arm.
pub struct Match<V> {
    value: Option<V>,
    accepted: bool,
}

impl<V> Match<V> {
    pub fn new(value: Option<V>) -> Self {
        Self { value, accepted: false }
    }

    pub fn on(value: V) -> Self {
        Self::new(Some(value))
    }

    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    /// Runs `action` if `P` matches and no earlier arm accepted.
    pub fn case<P: Pattern<V>>(mut self, action: impl FnOnce(P::View)) -> Self {
        if let Some(view) = self.candidate::<P>() {
            self.accepted = true;
            action(view);
        }
        self
    }

    /// Guards the next arm with `predicate`, evaluated only when `P` matches.
    pub fn when<P: Pattern<V>>(self, predicate: impl FnOnce(&P::View) -> bool) -> Guarded<V, P> {
        let view = self.candidate::<P>().filter(|view| predicate(view));
        Guarded { inner: self, view }
    }

    /// Terminal arm, taken when nothing matched (including a `None` value).
    pub fn otherwise(self, action: impl FnOnce()) {
        if !self.accepted {
            action();
        }
    }

    /// Turns the expression into one that produces an `R`.
    pub fn yielding<R>(self) -> Yield<V, R> {
        Yield { value: self.value, accepted: self.accepted, result: None }
    }

    fn candidate<P: Pattern<V>>(&self) -> Option<P::View> {
        if self.accepted {
            return None;
        }
        self.value.as_ref().and_then(P::project)
    }
}

/// A predicate-guarded arm waiting for its action.
#[must_use = "`when` must be followed by `then`"]
pub struct Guarded<V, P: Pattern<V>> {
    inner: Match<V>,
    view: Option<P::View>,
}

impl<V, P: Pattern<V>> Guarded<V, P> {
    pub fn then(self, action: impl FnOnce(P::View)) -> Match<V> {
        let Guarded { mut inner, view } = self;
        if let Some(view) = view {
            inner.accepted = true;
            action(view);
        }
        inner
    }
}

/// Value-producing dispatch expression.
#[must_use = "a yielding match must be finished with `or_default`, `or_else` or `result`"]
pub struct Yield<V, R> {
    value: Option<V>,
    accepted: bool,
    result: Option<R>,
}

impl<V, R> Yield<V, R> {
    pub fn new(value: Option<V>) -> Self {
        Self { value, accepted: false, result: None }
    }

    pub fn on(value: V) -> Self {
        Self::new(Some(value))
    }

    /// Arm producing its result from the projected view.
    pub fn case<P: Pattern<V>>(mut self, f: impl FnOnce(P::View) -> R) -> Self {
        if let Some(view) = self.candidate::<P>() {
            self.accept(f(view));
        }
        self
    }

    /// Arm producing a constant.
    pub fn case_value<P: Pattern<V>>(mut self, result: R) -> Self {
        if self.candidate::<P>().is_some() {
            self.accept(result);
        }
        self
    }

    /// Arm producing its result from a zero-argument factory.
    pub fn case_with<P: Pattern<V>>(mut self, factory: impl FnOnce() -> R) -> Self {
        if self.candidate::<P>().is_some() {
            self.accept(factory());
        }
        self
    }

    pub fn when<P: Pattern<V>>(self, predicate: impl FnOnce(&P::View) -> bool) -> GuardedYield<V, R, P> {
        let view = self.candidate::<P>().filter(|view| predicate(view));
        GuardedYield { inner: self, view }
    }

    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    /// The produced value, if any arm matched.
    pub fn result(self) -> Option<R> {
        self.result
    }

    pub fn or_default(self, default: R) -> R {
        self.result.unwrap_or(default)
    }

    /// The default factory runs only when nothing matched.
    pub fn or_else(self, default: impl FnOnce() -> R) -> R {
        self.result.unwrap_or_else(default)
    }

    fn accept(&mut self, result: R) {
        self.accepted = true;
        self.result = Some(result);
    }

    fn candidate<P: Pattern<V>>(&self) -> Option<P::View> {
        if self.accepted {
            return None;
        }
        self.value.as_ref().and_then(P::project)
    }
}

#[must_use = "`when` must be followed by `then`"]
pub struct GuardedYield<V, R, P: Pattern<V>> {
    inner: Yield<V, R>,
    view: Option<P::View>,
}

impl<V, R, P: Pattern<V>> GuardedYield<V, R, P> {
    pub fn then(self, f: impl FnOnce(P::View) -> R) -> Yield<V, R> {
        let GuardedYield { mut inner, view } = self;
        if let Some(view) = view {
            inner.accept(f(view));
        }
        inner
    }

    pub fn then_value(self, result: R) -> Yield<V, R> {
        self.then(|_| result)
    }
}
