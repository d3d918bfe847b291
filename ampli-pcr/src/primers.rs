use std::fmt::{self, Display};
use std::io::{self, BufRead, Read};
use std::sync::Arc;

use fxhash::FxHashSet as HashSet;
use log::warn;
use seq_io::fasta::Reader;

use crate::errors::PcrError;
use crate::models::Strand;

///
/// Return the reverse complement of a nucleotide sequence.
///
/// `A/T` and `C/G` are swapped (case is kept) and `N` maps to itself. Any
/// other byte is kept as-is, so applying this twice always gives back the
/// input.
///
pub fn reverse_complement(seq: &str) -> String {
    seq.chars().rev().map(complement).collect()
}

fn complement(base: char) -> char {
    match base {
        'A' => 'T',
        'T' => 'A',
        'C' => 'G',
        'G' => 'C',
        'a' => 't',
        't' => 'a',
        'c' => 'g',
        'g' => 'c',
        other => other,
    }
}

/// Which strand(s) a primer is allowed to bind.
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy, Default)]
pub enum PrimerRole {
    /// Binds either strand
    #[default]
    Any,
    /// Binds the plus strand only
    Forward,
    /// Binds the minus strand only
    Reverse,
}

impl PrimerRole {
    pub fn strands(&self) -> &'static [Strand] {
        match self {
            PrimerRole::Any => &[Strand::Forward, Strand::Reverse],
            PrimerRole::Forward => &[Strand::Forward],
            PrimerRole::Reverse => &[Strand::Reverse],
        }
    }
}

#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct Primer {
    pub sequence: String,
    pub role: PrimerRole,
}

impl Primer {
    pub fn new(sequence: impl Into<String>, role: PrimerRole) -> Self {
        Primer {
            sequence: sequence.into(),
            role,
        }
    }

    pub fn any(sequence: impl Into<String>) -> Self {
        Self::new(sequence, PrimerRole::Any)
    }

    pub fn forward(sequence: impl Into<String>) -> Self {
        Self::new(sequence, PrimerRole::Forward)
    }

    pub fn reverse(sequence: impl Into<String>) -> Self {
        Self::new(sequence, PrimerRole::Reverse)
    }
}

impl Display for Primer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sequence)
    }
}

///
/// The text one scanner searches for, and on which strand.
///
#[derive(Debug, Clone)]
pub struct ScanTarget {
    pub query: Arc<str>,
    pub strand: Strand,
}

///
/// Validated, de-duplicated set of primers. Never empty.
///
#[derive(Debug, Clone)]
pub struct PrimerSet {
    primers: Vec<Primer>,
}

impl PrimerSet {
    ///
    /// Build a primer set.
    ///
    /// # Errors
    /// - `PcrError::NoPrimers` if `primers` is empty
    /// - `PcrError::EmptyPrimer` if any primer sequence is empty
    pub fn new(primers: Vec<Primer>) -> Result<Self, PcrError> {
        if primers.is_empty() {
            return Err(PcrError::NoPrimers);
        }

        let mut seen: HashSet<(String, PrimerRole)> = HashSet::default();
        let mut unique = Vec::with_capacity(primers.len());

        for (idx, primer) in primers.into_iter().enumerate() {
            if primer.sequence.is_empty() {
                return Err(PcrError::EmptyPrimer(idx + 1));
            }
            if !seen.insert((primer.sequence.clone(), primer.role)) {
                warn!("Ignoring duplicate primer {} ({:?})", primer, primer.role);
                continue;
            }
            unique.push(primer);
        }

        Ok(PrimerSet { primers: unique })
    }

    /// Build a set where every primer may bind either strand.
    pub fn from_sequences<I, S>(sequences: I) -> Result<Self, PcrError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(sequences.into_iter().map(Primer::any).collect())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Primer> {
        self.primers.iter()
    }

    pub fn len(&self) -> usize {
        self.primers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primers.is_empty()
    }

    ///
    /// Uppercase every primer, the counterpart of
    /// `TemplateStore::to_uppercase` for case-insensitive runs.
    ///
    pub fn to_uppercase(&self) -> PrimerSet {
        let primers = self
            .primers
            .iter()
            .map(|p| Primer::new(p.sequence.to_ascii_uppercase(), p.role))
            .collect();
        // uppercasing can turn distinct primers into duplicates
        PrimerSet::new(primers).unwrap_or_else(|_| self.clone())
    }

    ///
    /// One scan target per (primer, allowed strand). Reverse-strand targets
    /// search for the primer's reverse complement.
    ///
    pub fn scan_targets(&self) -> Vec<ScanTarget> {
        self.primers
            .iter()
            .flat_map(|primer| {
                primer.role.strands().iter().map(move |&strand| ScanTarget {
                    query: match strand {
                        Strand::Forward => Arc::from(primer.sequence.as_str()),
                        Strand::Reverse => Arc::from(reverse_complement(&primer.sequence)),
                    },
                    strand,
                })
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a PrimerSet {
    type Item = &'a Primer;
    type IntoIter = std::slice::Iter<'a, Primer>;

    fn into_iter(self) -> Self::IntoIter {
        self.primers.iter()
    }
}

///
/// Read primer sequences from a text file.
///
/// Either one primer per line, or FASTA records (one primer per record).
/// Blank lines and lines starting with `#` are skipped; in a FASTA file only
/// before the first record.
///
pub fn read_primers<R: BufRead>(mut reader: R) -> io::Result<Vec<String>> {
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;

    let mut offset = 0;
    for line in contents.split_inclusive('\n') {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            offset += line.len();
            continue;
        }
        if trimmed.starts_with('>') {
            return read_fasta_primers(contents[offset..].trim_start().as_bytes());
        }
        break;
    }

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect())
}

fn read_fasta_primers(fasta: &[u8]) -> io::Result<Vec<String>> {
    let mut fasta_reader = Reader::new(fasta);
    let mut primers = Vec::new();

    while let Some(record) = fasta_reader.next() {
        let record =
            record.map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;

        let mut sequence = String::new();
        for seq_line in record.seq_lines() {
            let seq_line = std::str::from_utf8(seq_line)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            sequence.push_str(seq_line.trim());
        }

        if !sequence.is_empty() {
            primers.push(sequence);
        }
    }

    Ok(primers)
}
