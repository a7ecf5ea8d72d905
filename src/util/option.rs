pub(crate) trait OptionExtension<T> {
    /// Unwraps an [`Option`] that the list invariants guarantee to be [`Some`].
    ///
    /// A [`None`] here means that linkage was corrupted somewhere else, which isn't something a
    /// caller can recover from, so this panics in every build rather than returning an error.
    ///
    /// # Panics
    /// Panics if the value is [`None`], naming the link that was expected.
    fn consistent(self, link: &str) -> T;
}

impl<T> OptionExtension<T> for Option<T> {
    #[track_caller]
    fn consistent(self, link: &str) -> T {
        match self {
            Some(val) => val,
            None => panic!("Linked list corrupted: expected {link} to be present!"),
        }
    }
}
