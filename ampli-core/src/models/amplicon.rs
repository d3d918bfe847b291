use std::fmt::{self, Display};

///
/// Amplicon struct, one predicted PCR product in bed-like coordinates
///
/// `start` is the first base after the forward primer and `end` is the first
/// base of the reverse primer's binding site, so `end - start` is the product
/// length. `name` is `<forward primer>+<reverse primer>`, both 5'->3'.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, PartialOrd, Ord)]
pub struct Amplicon {
    pub chrom: String,
    pub start: usize,
    pub end: usize,
    pub name: String,
}

impl Amplicon {
    pub fn new(
        chrom: impl Into<String>,
        start: usize,
        end: usize,
        forward_primer: &str,
        reverse_primer: &str,
    ) -> Self {
        Amplicon {
            chrom: chrom.into(),
            start,
            end,
            name: format!("{}+{}", forward_primer, reverse_primer),
        }
    }

    ///
    /// Get length of the product
    ///
    pub fn width(&self) -> usize {
        self.end - self.start
    }

    ///
    /// Get the bed line for this amplicon
    ///
    pub fn as_string(&self) -> String {
        format!("{}\t{}\t{}\t{}", self.chrom, self.start, self.end, self.name)
    }

    /// The forward and reverse primers this product was named after.
    pub fn primers(&self) -> Option<(&str, &str)> {
        self.name.split_once('+')
    }
}

impl Display for Amplicon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}
