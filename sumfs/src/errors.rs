// SPDX-License-Identifier: MIT

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryError {
    /// The dump carried no usable group summary row; the store cannot be
    /// sized without one.
    MissingGroup,
    Invalid(&'static str),
}

impl SummaryError {
    pub fn msg(&self) -> &'static str {
        match self {
            SummaryError::MissingGroup => "No group summary row in dump",
            SummaryError::Invalid(msg) => msg,
        }
    }
}

impl fmt::Display for SummaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.msg())
    }
}

impl std::error::Error for SummaryError {}

pub type SummaryResult<T = ()> = Result<T, SummaryError>;
