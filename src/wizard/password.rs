//! Password strength rules for the password-creation step. The evaluation is
//! a pure projection of the current input and is recomputed on every change.

use std::fmt;

/// Minimum password length accepted by the portal.
pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rule {
    Length,
    Uppercase,
    Lowercase,
    Digit,
    Special,
}

impl Rule {
    pub const ALL: [Rule; 5] = [
        Rule::Length,
        Rule::Uppercase,
        Rule::Lowercase,
        Rule::Digit,
        Rule::Special,
    ];

    #[must_use]
    pub fn hint(self) -> &'static str {
        match self {
            Rule::Length => "At least 8 characters",
            Rule::Uppercase => "One uppercase letter",
            Rule::Lowercase => "One lowercase letter",
            Rule::Digit => "One number",
            Rule::Special => "One special character",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Strength {
    Neutral,
    Weak,
    Medium,
    Strong,
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Strength::Neutral => "",
            Strength::Weak => "weak",
            Strength::Medium => "medium",
            Strength::Strong => "strong",
        };
        f.write_str(label)
    }
}

/// Outcome of the five strength predicates for one password value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub length: bool,
    pub uppercase: bool,
    pub lowercase: bool,
    pub digit: bool,
    pub special: bool,
}

impl PasswordPolicy {
    #[must_use]
    pub fn evaluate(password: &str) -> Self {
        Self {
            // Measured in UTF-16 code units, as browser form validation does.
            length: password.encode_utf16().count() >= MIN_PASSWORD_LENGTH,
            uppercase: password.chars().any(|c| c.is_ascii_uppercase()),
            lowercase: password.chars().any(|c| c.is_ascii_lowercase()),
            digit: password.chars().any(|c| c.is_ascii_digit()),
            special: password.chars().any(|c| !c.is_ascii_alphanumeric()),
        }
    }

    #[must_use]
    pub fn passes(&self, rule: Rule) -> bool {
        match rule {
            Rule::Length => self.length,
            Rule::Uppercase => self.uppercase,
            Rule::Lowercase => self.lowercase,
            Rule::Digit => self.digit,
            Rule::Special => self.special,
        }
    }

    /// Number of satisfied rules, 0 through 5.
    #[must_use]
    pub fn score(&self) -> u8 {
        Rule::ALL
            .iter()
            .map(|rule| u8::from(self.passes(*rule)))
            .sum()
    }

    #[must_use]
    pub fn strength(&self) -> Strength {
        match self.score() {
            0 => Strength::Neutral,
            1 | 2 => Strength::Weak,
            3 => Strength::Medium,
            _ => Strength::Strong,
        }
    }

    #[must_use]
    pub fn all_satisfied(&self) -> bool {
        self.score() == 5
    }

    /// Rules still failing, in display order.
    #[must_use]
    pub fn missing(&self) -> Vec<Rule> {
        Rule::ALL
            .into_iter()
            .filter(|rule| !self.passes(*rule))
            .collect()
    }
}

/// Whether the password form may be submitted: every rule holds and the
/// confirmation matches exactly.
#[must_use]
pub fn can_submit(password: &str, confirmation: &str) -> bool {
    PasswordPolicy::evaluate(password).all_satisfied()
        && !confirmation.is_empty()
        && confirmation == password
}
