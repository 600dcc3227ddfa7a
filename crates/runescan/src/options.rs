use crate::Scalar;

/// Configuration for [`crate::sanitize`] and friends.
///
/// The fallback policy is passed explicitly to each call instead of living in
/// a process-wide default.
///
/// # Examples
///
/// ```rust
/// use std::borrow::Cow;
///
/// use runescan::{SanitizeOptions, Scalar, sanitize};
///
/// let options = SanitizeOptions {
///     replacement: Scalar::from('?'),
///     ..Default::default()
/// };
/// assert_eq!(&*sanitize(b"a\xFFb", &options), b"a?b");
///
/// let borrow = SanitizeOptions {
///     borrow_if_well_formed: true,
///     ..Default::default()
/// };
/// assert!(matches!(sanitize(b"fine", &borrow), Cow::Borrowed(_)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SanitizeOptions {
    /// Scalar written in place of each invalid run.
    ///
    /// # Default
    ///
    /// [`Scalar::REPLACEMENT`] (U+FFFD, encoded as `EF BF BD`).
    pub replacement: Scalar,

    /// Whether well-formed input is returned borrowed instead of copied.
    ///
    /// When `false`, [`crate::sanitize`] always returns an owned buffer, even
    /// if nothing needed replacing.
    ///
    /// # Default
    ///
    /// `false`
    pub borrow_if_well_formed: bool,
}

impl Default for SanitizeOptions {
    fn default() -> Self {
        Self {
            replacement: Scalar::REPLACEMENT,
            borrow_if_well_formed: false,
        }
    }
}
