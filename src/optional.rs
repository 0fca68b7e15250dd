//! Extension methods for [`Option`].
//!
//! [`OptionExt`] adds the handful of combinators that `Option` lacks in the
//! standard library: side-effecting consumers, a negated filter, a lazy
//! alternative, and conversion into a [`Stream`](crate::stream::Stream).
//!
//! # Examples
//!
//! ```rust
//! use fpkit::optional::OptionExt;
//!
//! let mut seen = Vec::new();
//! Some(3).if_present(|value| seen.push(value));
//! None::<i32>.if_present(|value| seen.push(value));
//! assert_eq!(seen, vec![3]);
//!
//! let port = None.or_optional(|| Some(8080));
//! assert_eq!(port, Some(8080));
//! ```

/// Additional combinators for [`Option`].
pub trait OptionExt<T>: Sized {
    /// Calls `action` with the contained value, if any.
    fn if_present<F>(self, action: F)
    where
        F: FnOnce(T);

    /// Calls `action` with the contained value, or `otherwise` when empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpkit::optional::OptionExt;
    ///
    /// let log = std::cell::RefCell::new(String::new());
    /// None::<&str>.if_present_or_else(
    ///     |name| log.borrow_mut().push_str(name),
    ///     || log.borrow_mut().push_str("anonymous"),
    /// );
    /// let log = log.into_inner();
    /// assert_eq!(log, "anonymous");
    /// ```
    fn if_present_or_else<F, G>(self, action: F, otherwise: G)
    where
        F: FnOnce(T),
        G: FnOnce();

    /// Returns `true` if the option is `None`.
    fn is_absent(&self) -> bool;

    /// Keeps the value only if `predicate` returns `false` for it.
    ///
    /// # Arguments
    ///
    /// * `predicate` - The condition that discards the value
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpkit::optional::OptionExt;
    ///
    /// assert_eq!(Some("").filter_not(|text| text.is_empty()), None);
    /// assert_eq!(Some("x").filter_not(|text| text.is_empty()), Some("x"));
    /// ```
    #[must_use]
    fn filter_not<P>(self, predicate: P) -> Self
    where
        P: FnOnce(&T) -> bool;

    /// Returns `self` if it holds a value, otherwise the option produced by
    /// `alternative`. `alternative` is not called when `self` is `Some`.
    #[must_use]
    fn or_optional<F>(self, alternative: F) -> Self
    where
        F: FnOnce() -> Self;

    /// Combines two present values with `function`.
    ///
    /// # Returns
    ///
    /// `Some(function(a, b))` when both options hold a value, otherwise `None`.
    fn zip_with<U, R, F>(self, other: Option<U>, function: F) -> Option<R>
    where
        F: FnOnce(T, U) -> R;

    /// Converts the option into a stream of zero or one element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpkit::optional::OptionExt;
    ///
    /// assert_eq!(Some(7).into_stream().collect_blocking(), vec![7]);
    /// assert!(None::<i32>.into_stream().collect_blocking().is_empty());
    /// ```
    #[cfg(feature = "stream")]
    fn into_stream(self) -> crate::stream::Stream<T>
    where
        T: Send + 'static;
}

impl<T> OptionExt<T> for Option<T> {
    #[inline]
    fn if_present<F>(self, action: F)
    where
        F: FnOnce(T),
    {
        if let Some(value) = self {
            action(value);
        }
    }

    fn if_present_or_else<F, G>(self, action: F, otherwise: G)
    where
        F: FnOnce(T),
        G: FnOnce(),
    {
        match self {
            Some(value) => action(value),
            None => otherwise(),
        }
    }

    #[inline]
    fn is_absent(&self) -> bool {
        self.is_none()
    }

    #[inline]
    fn filter_not<P>(self, predicate: P) -> Self
    where
        P: FnOnce(&T) -> bool,
    {
        self.filter(|value| !predicate(value))
    }

    #[inline]
    fn or_optional<F>(self, alternative: F) -> Self
    where
        F: FnOnce() -> Self,
    {
        self.or_else(alternative)
    }

    #[inline]
    fn zip_with<U, R, F>(self, other: Option<U>, function: F) -> Option<R>
    where
        F: FnOnce(T, U) -> R,
    {
        self.zip(other).map(|(left, right)| function(left, right))
    }

    #[cfg(feature = "stream")]
    fn into_stream(self) -> crate::stream::Stream<T>
    where
        T: Send + 'static,
    {
        crate::stream::Stream::of(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some(1), 1)]
    #[case(None, 0)]
    fn if_present_runs_only_for_some(#[case] option: Option<i32>, #[case] expected_calls: usize) {
        let mut calls = 0;
        option.if_present(|_| calls += 1);
        assert_eq!(calls, expected_calls);
    }

    #[rstest]
    #[case(Some(2), "value 2")]
    #[case(None, "empty")]
    fn if_present_or_else_picks_one_branch(#[case] option: Option<i32>, #[case] expected: &str) {
        let output = std::cell::RefCell::new(String::new());
        option.if_present_or_else(
            |value| *output.borrow_mut() = format!("value {value}"),
            || *output.borrow_mut() = "empty".to_string(),
        );
        let output = output.into_inner();
        assert_eq!(output, expected);
    }

    #[rstest]
    fn is_absent_negates_is_some() {
        assert!(None::<()>.is_absent());
        assert!(!Some(()).is_absent());
    }

    #[rstest]
    #[case(Some(4), Some(4))]
    #[case(Some(3), None)]
    #[case(None, None)]
    fn filter_not_discards_matches(#[case] option: Option<i32>, #[case] expected: Option<i32>) {
        assert_eq!(option.filter_not(|value| value % 2 == 1), expected);
    }

    #[rstest]
    fn or_optional_is_lazy() {
        let mut called = false;
        let result = Some(1).or_optional(|| {
            called = true;
            Some(2)
        });
        assert_eq!(result, Some(1));
        assert!(!called);
    }

    #[rstest]
    #[case(Some(2), Some(3), Some(6))]
    #[case(Some(2), None, None)]
    #[case(None, Some(3), None)]
    fn zip_with_requires_both(
        #[case] left: Option<i32>,
        #[case] right: Option<i32>,
        #[case] expected: Option<i32>,
    ) {
        assert_eq!(left.zip_with(right, |a, b| a * b), expected);
    }
}
