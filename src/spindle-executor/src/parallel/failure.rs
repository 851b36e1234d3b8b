use std::{error::Error, fmt, slice};

use super::Conduit;

/// The errors collected from a set of tasks by [`wait`].
#[derive(Debug)]
pub enum TaskFailure<E> {
    /// Exactly one task failed. Its error is kept as is.
    Single(E),
    /// Several tasks failed, in the order their errors arrived.
    Multiple(Vec<E>),
}

impl<E> TaskFailure<E> {
    /// Gets all collected errors in arrival order.
    pub fn errors(&self) -> &[E] {
        match self {
            Self::Single(e) => slice::from_ref(e),
            Self::Multiple(errors) => errors,
        }
    }

    /// Gets the number of failed tasks.
    #[inline]
    pub fn len(&self) -> usize {
        self.errors().len()
    }

    /// Consumes the failure and returns all collected errors.
    pub fn into_errors(self) -> Vec<E> {
        match self {
            Self::Single(e) => vec![e],
            Self::Multiple(errors) => errors,
        }
    }
}

impl<E: fmt::Display> fmt::Display for TaskFailure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Forward the formatter so flags like `{:#}` reach every error.
        for (i, e) in self.errors().iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            fmt::Display::fmt(e, f)?;
        }

        Ok(())
    }
}

impl<E: Error + 'static> Error for TaskFailure<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Single(e) => e.source(),
            Self::Multiple(..) => None,
        }
    }
}

/// Blocks until every task behind `conduit` has returned and collects
/// their errors.
///
/// Returns `Ok(())` when no task failed.
pub fn wait<E>(conduit: Conduit<E>) -> Result<(), TaskFailure<E>> {
    let mut errors: Vec<E> = conduit.collect();
    if errors.len() > 1 {
        return Err(TaskFailure::Multiple(errors));
    }

    match errors.pop() {
        Some(e) => Err(TaskFailure::Single(e)),
        None => Ok(()),
    }
}
