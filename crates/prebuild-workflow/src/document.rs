//! The workflow document as an ordered line buffer.
//!
//! Fragments are appended in phase order and each one remembers which
//! lines it occupies, so a finished document can be sliced back into its
//! per-platform sections.

use std::fmt;
use std::ops::Range;

/// The part of the workflow a fragment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Trigger, job header, environment pins and setup steps.
    Preamble,
    /// One vcpkg build step.
    Build,
    /// Header of the packaging step.
    Package,
    /// One packaging script invocation inside the packaging step.
    PackageInvocation,
    /// One release-asset upload step.
    Upload,
}

/// A contiguous run of lines appended in one go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub phase: Phase,
    /// Triplet the fragment was generated for, if it is per-platform.
    pub triplet: Option<String>,
    /// Line indices within the document.
    pub lines: Range<usize>,
}

/// An ordered sequence of workflow text lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowDocument {
    lines: Vec<String>,
    sections: Vec<Section>,
}

impl WorkflowDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment and record the lines it covers.
    pub fn push_fragment(&mut self, phase: Phase, triplet: Option<&str>, lines: Vec<String>) {
        let start = self.lines.len();
        self.lines.extend(lines);
        self.sections.push(Section {
            phase,
            triplet: triplet.map(str::to_string),
            lines: start..self.lines.len(),
        });
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Sections of one phase, in document order.
    pub fn sections_of(&self, phase: Phase) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(move |s| s.phase == phase)
    }

    /// Number of fragments appended for a phase.
    pub fn count(&self, phase: Phase) -> usize {
        self.sections_of(phase).count()
    }

    /// Triplets of a phase's fragments, in document order.
    pub fn triplets(&self, phase: Phase) -> Vec<&str> {
        self.sections_of(phase)
            .filter_map(|s| s.triplet.as_deref())
            .collect()
    }

    /// Text of one section, newline-terminated.
    pub fn section_text(&self, section: &Section) -> String {
        let mut text = String::new();
        for line in &self.lines[section.lines.clone()] {
            text.push_str(line);
            text.push('\n');
        }
        text
    }

    /// Everything after the preamble.
    pub fn body_text(&self) -> String {
        let start = self
            .sections
            .iter()
            .find(|s| s.phase != Phase::Preamble)
            .map_or(self.lines.len(), |s| s.lines.start);
        let mut text = String::new();
        for line in &self.lines[start..] {
            text.push_str(line);
            text.push('\n');
        }
        text
    }

    /// Serialize the whole document, newline-terminated.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for WorkflowDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
