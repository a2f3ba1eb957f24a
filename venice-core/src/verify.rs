//! Human-verification checks
//!
//! All checks run locally, before any network call. The expected values
//! are fixed app constants.

/// Word the sign-up form asks the user to type
pub const SIGNUP_CHALLENGE: &str = "VENICE";

/// Answer to the sign-in arithmetic check (2 + 3)
pub const SIGNIN_MATH_ANSWER: i64 = 5;

/// Word the review form asks the user to type
pub const REVIEW_CHALLENGE: &str = "LOCAL";

/// Sign-up gate: checkbox ticked and the challenge phrase typed
/// exactly (whitespace and case are forgiven).
pub fn signup_check_passes(human_checked: bool, challenge: &str) -> bool {
    human_checked && challenge.trim().to_uppercase() == SIGNUP_CHALLENGE
}

/// Sign-in gate: the arithmetic answer must match
pub fn signin_check_passes(answer: i64) -> bool {
    answer == SIGNIN_MATH_ANSWER
}

/// Review gate: the verification word must match
pub fn review_check_passes(word: &str) -> bool {
    word.trim().to_uppercase() == REVIEW_CHALLENGE
}
