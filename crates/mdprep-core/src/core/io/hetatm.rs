use super::pdb::{self, RecordKind};
use super::traits::RecordFilter;
use phf::{Set, phf_set};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use thiserror::Error;

static WATER_RESIDUES: Set<&'static str> = phf_set! {
    "HOH", "WAT", "DOD", "H2O", "TIP", "TIP3", "SOL",
};

static ION_RESIDUES: Set<&'static str> = phf_set! {
    "NA", "CL", "K", "MG", "CA", "ZN", "MN", "FE", "FE2", "CU", "CO", "NI",
    "CD", "BR", "IOD", "SO4", "PO4", "NO3", "NH4",
};

static ADDITIVE_RESIDUES: Set<&'static str> = phf_set! {
    "EDO", "EGO", "GOL", "PEG", "PGE", "PG4", "1PE", "P6G", "ACT", "ACY",
    "DMS", "MPD", "TRS", "EPE", "MES", "FMT", "BME", "IPA",
};

/// A named group of residue names that are commonly stripped together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResiduePreset {
    Water,
    Ions,
    Additives,
}

impl ResiduePreset {
    pub fn residues(self) -> &'static Set<&'static str> {
        match self {
            ResiduePreset::Water => &WATER_RESIDUES,
            ResiduePreset::Ions => &ION_RESIDUES,
            ResiduePreset::Additives => &ADDITIVE_RESIDUES,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown residue preset '{0}'. Expected 'water', 'ions' or 'additives'.")]
pub struct UnknownPresetError(pub String);

impl FromStr for ResiduePreset {
    type Err = UnknownPresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "water" => Ok(ResiduePreset::Water),
            "ions" => Ok(ResiduePreset::Ions),
            "additives" => Ok(ResiduePreset::Additives),
            _ => Err(UnknownPresetError(s.to_string())),
        }
    }
}

/// Residue names to strip from a structure, normalized to upper case.
///
/// Names are trimmed before normalization; names that are empty afterwards
/// are dropped, since a blank residue field never identifies a residue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    names: BTreeSet<String>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str) -> bool {
        let normalized = name.trim().to_uppercase();
        if normalized.is_empty() {
            return false;
        }
        self.names.insert(normalized)
    }

    pub fn extend_with_preset(&mut self, preset: ResiduePreset) {
        for name in preset.residues().iter() {
            self.insert(name);
        }
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, name: &str) -> bool {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return false;
        }
        self.names.contains(&trimmed.to_uppercase())
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for name in iter {
            set.insert(name.as_ref());
        }
        set
    }
}

impl<S: AsRef<str>> Extend<S> for ExclusionSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for name in iter {
            self.insert(name.as_ref());
        }
    }
}

impl fmt::Display for ExclusionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.names.is_empty() {
            return write!(f, "(none)");
        }
        let joined: Vec<&str> = self.iter().collect();
        write!(f, "{}", joined.join(", "))
    }
}

/// Outcome of one filter pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterReport {
    pub excluded: ExclusionSet,
    pub lines_read: usize,
    pub lines_written: usize,
    pub removed_by_residue: BTreeMap<String, usize>,
}

impl FilterReport {
    fn new(excluded: ExclusionSet) -> Self {
        Self {
            excluded,
            ..Default::default()
        }
    }

    pub fn lines_removed(&self) -> usize {
        self.lines_read - self.lines_written
    }

    fn record_removal(&mut self, residue: String) {
        *self.removed_by_residue.entry(residue).or_default() += 1;
    }
}

impl fmt::Display for FilterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Removed residues: {} ({} of {} lines dropped",
            self.excluded,
            self.lines_removed(),
            self.lines_read
        )?;
        if !self.removed_by_residue.is_empty() {
            let counts: Vec<String> = self
                .removed_by_residue
                .iter()
                .map(|(name, count)| format!("{name}: {count}"))
                .collect();
            write!(f, "; {}", counts.join(", "))?;
        }
        write!(f, ")")
    }
}

/// Drops `HETATM` records whose residue name is in an exclusion set.
///
/// Every other line, including its terminator, is copied byte for byte.
#[derive(Debug, Clone, Default)]
pub struct HetatmFilter {
    excluded: ExclusionSet,
}

impl HetatmFilter {
    pub fn new(excluded: ExclusionSet) -> Self {
        Self { excluded }
    }

    pub fn excluded(&self) -> &ExclusionSet {
        &self.excluded
    }

    /// Returns the normalized residue name when `line` must be dropped.
    pub fn excluded_residue(&self, line: &[u8]) -> Option<String> {
        if self.excluded.is_empty() || RecordKind::of(line) != RecordKind::Hetatm {
            return None;
        }
        let name = pdb::residue_name(line)?.to_uppercase();
        self.excluded.names.contains(&name).then_some(name)
    }

    pub fn keeps(&self, line: &[u8]) -> bool {
        self.excluded_residue(line).is_none()
    }
}

impl RecordFilter for HetatmFilter {
    type Report = FilterReport;

    fn filter_from(
        &self,
        reader: &mut impl BufRead,
        writer: &mut impl Write,
    ) -> io::Result<FilterReport> {
        let mut report = FilterReport::new(self.excluded.clone());
        let mut line = Vec::with_capacity(128);

        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            report.lines_read += 1;

            match self.excluded_residue(&line) {
                Some(residue) => report.record_removal(residue),
                None => {
                    writer.write_all(&line)?;
                    report.lines_written += 1;
                }
            }
        }

        writer.flush()?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = "\
ATOM      1  N   ALA A   1
HETATM    2  O   FAD A   2
HETATM    3  O   SO4 A   3
HETATM    4  O   HOH A   4
";

    fn run(filter: &HetatmFilter, input: &[u8]) -> (Vec<u8>, FilterReport) {
        let mut output = Vec::new();
        let report = filter
            .filter_from(&mut &input[..], &mut output)
            .expect("in-memory filtering cannot fail");
        (output, report)
    }

    fn filter_of(names: &[&str]) -> HetatmFilter {
        HetatmFilter::new(names.iter().collect())
    }

    fn is_subsequence(needle: &[&[u8]], haystack: &[&[u8]]) -> bool {
        let mut it = haystack.iter();
        needle.iter().all(|n| it.any(|h| h == n))
    }

    #[test]
    fn removes_excluded_hetero_groups_from_scenario() {
        let (output, report) = run(&filter_of(&["FAD", "SO4"]), SCENARIO.as_bytes());

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "ATOM      1  N   ALA A   1\nHETATM    4  O   HOH A   4\n"
        );
        assert_eq!(report.lines_read, 4);
        assert_eq!(report.lines_written, 2);
        assert_eq!(report.lines_removed(), 2);
        assert_eq!(report.removed_by_residue.get("FAD"), Some(&1));
        assert_eq!(report.removed_by_residue.get("SO4"), Some(&1));
    }

    #[test]
    fn output_is_a_subsequence_of_input() {
        let input = format!("HEADER    TEST\n{SCENARIO}HETATM    5  C   EGO B   5\nEND\n");
        let (output, _) = run(&filter_of(&["SO4", "EGO", "HOH"]), input.as_bytes());

        let input_lines: Vec<&[u8]> = input.as_bytes().split_inclusive(|b| *b == b'\n').collect();
        let output_lines: Vec<&[u8]> = output.split_inclusive(|b| *b == b'\n').collect();
        assert!(is_subsequence(&output_lines, &input_lines));
        assert_eq!(output_lines.len(), 4);
    }

    #[test]
    fn filtering_twice_is_idempotent() {
        let filter = filter_of(&["FAD", "SO4"]);
        let (once, _) = run(&filter, SCENARIO.as_bytes());
        let (twice, report) = run(&filter, &once);

        assert_eq!(once, twice);
        assert_eq!(report.lines_removed(), 0);
    }

    #[test]
    fn residue_comparison_is_case_insensitive() {
        let input = "\
HETATM    2  O   fad A   2
HETATM    3  O   Fad A   3
HETATM    4  O   FAD A   4
HETATM    5  O   HOH A   5
";
        let (upper, _) = run(&filter_of(&["FAD"]), input.as_bytes());
        let (lower, report) = run(&filter_of(&["fad"]), input.as_bytes());

        assert_eq!(upper, b"HETATM    5  O   HOH A   5\n");
        assert_eq!(upper, lower);
        assert_eq!(report.removed_by_residue.get("FAD"), Some(&3));
    }

    #[test]
    fn atom_records_are_never_removed() {
        let input = "ATOM      1  O   FAD A   1\n";
        let (output, report) = run(&filter_of(&["FAD"]), input.as_bytes());

        assert_eq!(output, input.as_bytes());
        assert_eq!(report.lines_removed(), 0);
    }

    #[test]
    fn empty_exclusion_set_is_a_pass_through() {
        let (output, report) = run(&HetatmFilter::default(), SCENARIO.as_bytes());

        assert_eq!(output, SCENARIO.as_bytes());
        assert_eq!(report.lines_written, 4);
        assert_eq!(report.to_string(), "Removed residues: (none) (0 of 4 lines dropped)");
    }

    #[test]
    fn short_hetatm_lines_pass_through() {
        let input = "HETATM\nHETATM    2  O   FA\nHETATM    3  O   FAD\n";
        let (output, report) = run(&filter_of(&["FAD", "FA"]), input.as_bytes());

        assert_eq!(output, b"HETATM\nHETATM    2  O   FA\n");
        assert_eq!(report.lines_removed(), 1);
    }

    #[test]
    fn terminators_are_preserved_byte_for_byte() {
        let input = b"ATOM      1  N   ALA A   1\r\nHETATM    2  O   FAD A   2\r\nHETATM    4  O   HOH A   4";
        let (output, _) = run(&filter_of(&["FAD"]), input);

        assert_eq!(
            output,
            b"ATOM      1  N   ALA A   1\r\nHETATM    4  O   HOH A   4"
        );
    }

    #[test]
    fn non_utf8_lines_pass_through_untouched() {
        let mut input = b"REMARK \xFF\xFE\n".to_vec();
        input.extend_from_slice(b"HETATM    2  O   FAD A   2\n");
        let (output, _) = run(&filter_of(&["FAD"]), &input);

        assert_eq!(output, b"REMARK \xFF\xFE\n");
    }

    #[test]
    fn exclusion_set_normalizes_names() {
        let set: ExclusionSet = [" so4 ", "Fad", "", "   "].into_iter().collect();

        assert_eq!(set.len(), 2);
        assert!(set.contains("SO4"));
        assert!(set.contains("fad"));
        assert!(!set.contains(""));
        assert_eq!(set.to_string(), "FAD, SO4");
    }

    #[test]
    fn presets_expand_into_the_exclusion_set() {
        let mut set = ExclusionSet::new();
        set.extend_with_preset(ResiduePreset::Water);
        set.extend_with_preset("additives".parse().unwrap());

        assert!(set.contains("HOH"));
        assert!(set.contains("ego"));
        assert!(!set.contains("FAD"));
        assert!("solvent".parse::<ResiduePreset>().is_err());
    }

    #[test]
    fn report_summarizes_removed_residues() {
        let (_, report) = run(&filter_of(&["FAD", "SO4"]), SCENARIO.as_bytes());

        assert_eq!(
            report.to_string(),
            "Removed residues: FAD, SO4 (2 of 4 lines dropped; FAD: 1, SO4: 1)"
        );
    }
}
