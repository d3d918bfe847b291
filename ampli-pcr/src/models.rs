use std::fmt::{self, Display};
use std::sync::Arc;

/// Which strand a primer binds on, in plus-strand coordinates.
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy, PartialOrd, Ord)]
pub enum Strand {
    Forward,
    Reverse,
}

impl Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strand::Forward => write!(f, "+"),
            Strand::Reverse => write!(f, "-"),
        }
    }
}

///
/// One exact primer binding site on a template.
///
/// For a forward site `position` is the index just past the primer's 3' end.
/// For a reverse site it is the index of the first base of the reverse
/// complement match. `reverse.position - forward.position` is therefore the
/// product length.
///
/// `primer` is the text that was searched for: the primer itself on the
/// forward strand, its reverse complement on the reverse strand.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, PartialOrd, Ord)]
pub struct PrimingSite {
    pub position: usize,
    pub primer: Arc<str>,
    pub strand: Strand,
}

impl PrimingSite {
    pub fn new(primer: Arc<str>, position: usize, strand: Strand) -> Self {
        PrimingSite {
            position,
            primer,
            strand,
        }
    }
}

/// Product length limit. Zero on input means "unlimited".
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct MaxProductLength(usize);

impl MaxProductLength {
    pub const UNLIMITED: MaxProductLength = MaxProductLength(usize::MAX);

    pub fn from_raw(raw: usize) -> Self {
        match raw {
            0 => Self::UNLIMITED,
            n => MaxProductLength(n),
        }
    }

    pub fn get(&self) -> usize {
        self.0
    }

    pub fn is_unlimited(&self) -> bool {
        self.0 == usize::MAX
    }

    pub fn allows(&self, length: usize) -> bool {
        length <= self.0
    }
}

impl Default for MaxProductLength {
    fn default() -> Self {
        Self::UNLIMITED
    }
}

impl From<usize> for MaxProductLength {
    fn from(value: usize) -> Self {
        Self::from_raw(value)
    }
}

impl Display for MaxProductLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.is_unlimited() {
            true => write!(f, "unlimited"),
            false => write!(f, "{} bp", self.0),
        }
    }
}
