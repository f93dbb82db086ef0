//! Validation report types.
//!
//! Reports are plain data: they print for humans via `Display` and serialize
//! with serde for tooling.

use serde::Serialize;
use std::fmt;

use crate::model::ElementKind;

/// The result of validating a document.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self { issues: Vec::new() }
    }

    pub fn add(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    /// Returns true if there are no errors.
    pub fn is_ok(&self) -> bool {
        self.error_count() == 0
    }

    /// Returns true if there are no issues at all.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Returns true if there are neither errors nor warnings.
    pub fn is_ok_strict(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issues carrying `code`, in the order they were found.
    pub fn with_code(&self, code: IssueCode) -> impl Iterator<Item = &ValidationIssue> + '_ {
        self.issues.iter().filter(move |i| i.code == code)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return writeln!(f, "Validation passed: no issues found");
        }

        writeln!(
            f,
            "Validation completed with {} error(s) and {} warning(s):",
            self.error_count(),
            self.warning_count()
        )?;
        writeln!(f)?;

        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }

        Ok(())
    }
}

/// A single validation issue.
#[derive(Clone, Debug, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,

    /// Stable code for filtering and programmatic handling.
    pub code: IssueCode,

    pub message: String,

    /// The element the issue was found on.
    pub context: IssueContext,
}

impl ValidationIssue {
    pub fn new(
        severity: Severity,
        code: IssueCode,
        message: impl Into<String>,
        context: IssueContext,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            context,
        }
    }

    pub fn error(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self::new(Severity::Error, code, message, context)
    }

    pub fn warning(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self::new(Severity::Warning, code, message, context)
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN ",
        };
        write!(
            f,
            "[{}] {:?} in {}: {}",
            severity, self.code, self.context, self.message
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Severity {
    /// Suspicious but representable metadata.
    Warning,
    /// Metadata a renderer cannot interpret.
    Error,
}

/// A stable code identifying the type of validation issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum IssueCode {
    // Naming
    /// An element has an empty name.
    EmptyName,

    // Timing
    /// A programme's end lies before its start.
    ProgrammeEndBeforeStart,
    /// Consecutive block formats leave a gap between them.
    BlockTimingGap,
    /// Consecutive block formats overlap.
    BlockTimingOverlap,

    // Structure
    /// A content references no objects.
    ContentWithoutObjects,
    /// An object references neither pack formats nor objects.
    ObjectWithoutPackFormats,
    /// A pack format references no channel formats.
    PackFormatWithoutChannels,
    /// A channel format has no block formats.
    ChannelFormatWithoutBlocks,
    /// A stream format references neither a channel format nor a pack format.
    StreamWithoutChannelOrPack,
    /// A stream format references no track formats.
    StreamWithoutTrackFormats,
    /// A track UID references no track format.
    TrackUidWithoutTrackFormat,

    // References
    /// A reference points at an element that is not part of the document.
    DanglingReference,
}

/// The element an issue was found on.
#[derive(Clone, Debug, Serialize)]
pub enum IssueContext {
    Document,
    Element { kind: ElementKind, id: String },
    BlockFormat { id: String },
}

impl IssueContext {
    pub(crate) fn element(kind: ElementKind, id: impl fmt::Display) -> Self {
        IssueContext::Element {
            kind,
            id: id.to_string(),
        }
    }
}

impl fmt::Display for IssueContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueContext::Document => write!(f, "document"),
            IssueContext::Element { kind, id } => write!(f, "{} {}", kind, id),
            IssueContext::BlockFormat { id } => write!(f, "audioBlockFormat {}", id),
        }
    }
}
