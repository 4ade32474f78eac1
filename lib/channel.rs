use std::fmt;

/**
    A release channel.

    Draft releases belong to the [`Channel::Develop`] channel,
    published releases belong to the [`Channel::Main`] channel.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    Develop,
    Main,
}

impl Channel {
    #[must_use]
    pub const fn from_draft(is_draft: bool) -> Self {
        if is_draft { Self::Develop } else { Self::Main }
    }

    #[must_use]
    pub const fn is_draft(self) -> bool {
        matches!(self, Self::Develop)
    }

    /**
        The name of the subdirectory that artifacts for this channel are stored in.
    */
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Develop => "develop",
            Self::Main => "main",
        }
    }

    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::Develop, Self::Main]
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.dir_name().fmt(f)
    }
}
