//! Answer checking for typed and multiple-choice answers.

use unicase::UniCase;

/// Compare a submitted answer to the stored one.
///
/// Leading and trailing whitespace is ignored and letters are compared under
/// Unicode case folding, independent of locale. No partial credit.
pub fn is_correct(submitted: &str, expected: &str) -> bool {
    UniCase::new(submitted.trim()) == UniCase::new(expected.trim())
}
