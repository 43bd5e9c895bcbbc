//! Class labels

use serde::{Deserialize, Serialize};
use std::fmt;

/// Leaf health class
///
/// The numeric encoding (1 = healthy, 0 = unhealthy) is part of the data
/// model and is what the classifier is trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Label {
    Unhealthy = 0,
    Healthy = 1,
}

impl Label {
    /// Both labels in encoding order, as used for reports and matrices.
    pub const ALL: [Label; 2] = [Label::Unhealthy, Label::Healthy];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Label::Unhealthy),
            1 => Some(Label::Healthy),
            _ => None,
        }
    }

    /// Target value for the binary classifier (healthy is positive).
    pub fn is_positive(self) -> bool {
        self == Label::Healthy
    }

    pub fn from_positive(positive: bool) -> Self {
        if positive {
            Label::Healthy
        } else {
            Label::Unhealthy
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Label::Unhealthy => "unhealthy",
            Label::Healthy => "healthy",
        }
    }

    /// Position in [`Label::ALL`].
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding() {
        assert_eq!(Label::Healthy.code(), 1);
        assert_eq!(Label::Unhealthy.code(), 0);
        assert_eq!(Label::from_code(1), Some(Label::Healthy));
        assert_eq!(Label::from_code(2), None);
        assert!(Label::Healthy.is_positive());
        assert_eq!(Label::from_positive(false), Label::Unhealthy);
    }
}
