//! Slice copying helpers.

/// Makes a shallow copy of `src` whose capacity matches its length.
///
/// `to_vec` makes no such promise.
#[inline]
pub fn clone_exact<T: Clone>(src: &[T]) -> Vec<T> {
    Box::<[T]>::from(src).into_vec()
}

/// Like [`clone_exact`], but keeps an absent slice absent.
///
/// An empty slice stays present and turns into an empty vector.
#[inline]
pub fn clone_slice<T: Clone>(src: Option<&[T]>) -> Option<Vec<T>> {
    src.map(clone_exact)
}
