//! Grade bands for result entry.

use chrono::Datelike;
use std::fmt;

pub const DEFAULT_A_START: f64 = 80.0;
pub const DEFAULT_B_START: f64 = 70.0;
pub const DEFAULT_C_START: f64 = 60.0;
pub const DEFAULT_D_START: f64 = 50.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Grade {
    A,
    B,
    C,
    D,
    E,
}

impl Grade {
    #[must_use]
    pub fn status(self) -> Status {
        match self {
            Grade::A => Status::Excellent,
            Grade::B => Status::Good,
            Grade::C => Status::Satisfactory,
            Grade::D => Status::Pass,
            Grade::E => Status::Fail,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::E => "E",
        };
        f.write_str(letter)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Excellent,
    Good,
    Satisfactory,
    Pass,
    Fail,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Status::Excellent => "Excellent",
            Status::Good => "Good",
            Status::Satisfactory => "Satisfactory",
            Status::Pass => "Pass",
            Status::Fail => "Fail",
        };
        f.write_str(label)
    }
}

/// Lower bounds (inclusive) of the A to D bands. Anything below D is E.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradeBands {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
}

impl Default for GradeBands {
    fn default() -> Self {
        Self {
            a: DEFAULT_A_START,
            b: DEFAULT_B_START,
            c: DEFAULT_C_START,
            d: DEFAULT_D_START,
        }
    }
}

/// A zero, missing or non-finite threshold means "use the default".
fn or_default(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(value) if value.is_finite() && value != 0.0 => value,
        _ => default,
    }
}

impl GradeBands {
    #[must_use]
    pub fn new(a: Option<f64>, b: Option<f64>, c: Option<f64>, d: Option<f64>) -> Self {
        Self {
            a: or_default(a, DEFAULT_A_START),
            b: or_default(b, DEFAULT_B_START),
            c: or_default(c, DEFAULT_C_START),
            d: or_default(d, DEFAULT_D_START),
        }
    }

    #[must_use]
    pub fn thresholds(&self) -> [f64; 4] {
        [self.a, self.b, self.c, self.d]
    }

    #[must_use]
    pub fn grade(&self, marks: f64) -> Grade {
        if marks >= self.a {
            Grade::A
        } else if marks >= self.b {
            Grade::B
        } else if marks >= self.c {
            Grade::C
        } else if marks >= self.d {
            Grade::D
        } else {
            Grade::E
        }
    }

    /// Grade and status for a raw marks field. Blank or non-numeric input has
    /// no preview.
    #[must_use]
    pub fn preview(&self, marks: &str) -> Option<(Grade, Status)> {
        let marks: f64 = marks.trim().parse().ok()?;
        if !marks.is_finite() {
            return None;
        }
        let grade = self.grade(marks);
        Some((grade, grade.status()))
    }
}

#[must_use]
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Selectable exam years: five back, one ahead.
#[must_use]
pub fn year_options(current: i32) -> Vec<i32> {
    ((current - 5)..=(current + 1)).collect()
}
