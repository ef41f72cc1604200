//! Whole-structure consistency checks for the point tree and the mesh.
//!
//! [`DebugInvariants::validate_invariants`] is always available; the
//! panicking [`DebugInvariants::debug_assert_invariants`] and the
//! [`debug_invariants!`](crate::debug_invariants) macro only fire in debug
//! builds or with the `check-invariants` / `strict-invariants` features.

use crate::mesh_error::SurfMeshError;

pub trait DebugInvariants {
    /// Name used in invariant panic messages.
    const KIND: &'static str;

    /// Walk the structure and report the first broken invariant.
    fn validate_invariants(&self) -> Result<(), SurfMeshError>;

    /// Panic on the first broken invariant when checks are enabled.
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "{} invalid", Self::KIND);
    }
}

/// [`SurfMeshError::InvariantViolation`] carrying `message`.
pub(crate) fn violation(message: impl Into<String>) -> SurfMeshError {
    SurfMeshError::InvariantViolation(message.into())
}

/// Run a fallible check and panic with the formatted context on error when
/// invariant checking is enabled.
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)+) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!("[invariants] {}: {}", format_args!($($ctx)+), e);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Checked(bool);

    impl DebugInvariants for Checked {
        const KIND: &'static str = "Checked";

        fn validate_invariants(&self) -> Result<(), SurfMeshError> {
            if self.0 { Ok(()) } else { Err(violation("flag cleared")) }
        }
    }

    #[test]
    fn passing_check_is_silent() {
        Checked(true).debug_assert_invariants();
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "[invariants] Checked invalid: invariant violation: flag cleared")]
    fn failing_check_panics_with_context() {
        Checked(false).debug_assert_invariants();
    }
}
