/// Kotlin-style scope function, handy at the end of iterator chains.
pub trait LetAlso: Sized {
    fn let_owned<R>(self, f: impl FnOnce(Self) -> R) -> R {
        f(self)
    }
}

impl<T> LetAlso for T {}
