use std::fmt;

/// Review status of a homework submission as reported by the review API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    pub fn from_wire(status: &str) -> Option<Self> {
        match status {
            "approved" => Some(Self::Approved),
            "reviewing" => Some(Self::Reviewing),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Reviewing => "reviewing",
            Self::Rejected => "rejected",
        }
    }

    pub fn verdict(self) -> &'static str {
        match self {
            Self::Approved => "Review complete: the reviewer liked everything. Hooray!",
            Self::Reviewing => "The work has been taken for review by the reviewer.",
            Self::Rejected => "Review complete: the reviewer has comments.",
        }
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
