//! Structural validation of ADM documents.
//!
//! Validation never fails and never mutates. It walks the attached elements
//! and reports:
//! - empty names
//! - timing problems (programme bounds, gaps and overlaps between blocks)
//! - incomplete structure (elements missing the references a renderer needs)
//! - dangling references

mod report;

pub use report::{IssueCode, IssueContext, Severity, ValidationIssue, ValidationReport};

use crate::document::{for_kind, Document, Element};
use crate::model::{
    AudioBlockFormat, AudioChannelFormat, AudioContent, AudioObject, AudioPackFormat,
    AudioProgramme, AudioStreamFormat, AudioTrackFormat, AudioTrackUid, BlockPayload, Duration,
    ElementKind, End, HasParameter, MatrixCoefficient, Name, Parameters, Rtime, Start,
};

/// Options for validation behavior.
#[derive(Clone, Debug, Default)]
pub struct ValidateOptions {
    /// If true, warnings fail validation too.
    pub strict: bool,
}

impl ValidateOptions {
    /// Whether `report` passes under these options.
    pub fn passes(&self, report: &ValidationReport) -> bool {
        if self.strict {
            report.is_ok_strict()
        } else {
            report.is_ok()
        }
    }
}

/// Validates a document and returns a report of all issues found.
pub fn validate_document(doc: &Document, opts: &ValidateOptions) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_names::<AudioProgramme>(doc, &mut report);
    validate_names::<AudioContent>(doc, &mut report);
    validate_names::<AudioObject>(doc, &mut report);
    validate_names::<AudioPackFormat>(doc, &mut report);
    validate_names::<AudioChannelFormat>(doc, &mut report);
    validate_names::<AudioStreamFormat>(doc, &mut report);
    validate_names::<AudioTrackFormat>(doc, &mut report);

    validate_programmes(doc, &mut report);
    validate_content_tree(doc, &mut report);
    validate_channel_formats(doc, &mut report);
    validate_streams_and_tracks(doc, &mut report);

    for kind in ElementKind::ALL {
        for_kind!(kind, T => validate_references::<T>(doc, &mut report));
    }

    tracing::debug!(
        errors = report.error_count(),
        warnings = report.warning_count(),
        strict = opts.strict,
        "Validated document"
    );
    report
}

fn attached<T: Element>(doc: &Document) -> impl Iterator<Item = &T> + '_ {
    doc.elements::<T>().filter_map(move |handle| doc.get(handle))
}

fn context<T: Element>(element: &T) -> IssueContext {
    IssueContext::element(T::KIND, element.id())
}

fn validate_names<T>(doc: &Document, report: &mut ValidationReport)
where
    T: Element + Parameters + HasParameter<Name>,
{
    for element in attached::<T>(doc) {
        let empty = element
            .get::<Name>()
            .map(|name| name.as_str().trim().is_empty())
            .unwrap_or(true);
        if empty {
            report.add(ValidationIssue::warning(
                IssueCode::EmptyName,
                "Empty name",
                context(element),
            ));
        }
    }
}

fn validate_programmes(doc: &Document, report: &mut ValidationReport) {
    for programme in attached::<AudioProgramme>(doc) {
        let (Ok(Start(start)), Ok(End(end))) = (programme.get::<Start>(), programme.get::<End>())
        else {
            continue;
        };
        if end < start {
            report.add(ValidationIssue::error(
                IssueCode::ProgrammeEndBeforeStart,
                format!("End {} lies before start {}", end, start),
                context(programme),
            ));
        }
    }
}

fn validate_content_tree(doc: &Document, report: &mut ValidationReport) {
    for content in attached::<AudioContent>(doc) {
        if content.objects.is_empty() {
            report.add(ValidationIssue::warning(
                IssueCode::ContentWithoutObjects,
                "Content references no objects",
                context(content),
            ));
        }
    }

    for object in attached::<AudioObject>(doc) {
        if object.pack_formats.is_empty() && object.objects.is_empty() {
            report.add(ValidationIssue::warning(
                IssueCode::ObjectWithoutPackFormats,
                "Object references neither pack formats nor objects",
                context(object),
            ));
        }
    }

    for pack in attached::<AudioPackFormat>(doc) {
        if pack.channel_formats.is_empty() {
            report.add(ValidationIssue::warning(
                IssueCode::PackFormatWithoutChannels,
                "Pack format references no channel formats",
                context(pack),
            ));
        }
    }
}

fn validate_channel_formats(doc: &Document, report: &mut ValidationReport) {
    for channel in attached::<AudioChannelFormat>(doc) {
        let blocks = channel.block_formats();
        if blocks.is_empty() {
            report.add(ValidationIssue::error(
                IssueCode::ChannelFormatWithoutBlocks,
                "Channel format has no block formats",
                context(channel),
            ));
            continue;
        }

        for pair in blocks.windows(2) {
            validate_block_pair(&pair[0], &pair[1], report);
        }

        for block in blocks {
            let BlockPayload::Matrix(matrix) = block.payload() else {
                continue;
            };
            let coefficients = matrix
                .get::<Vec<MatrixCoefficient>>()
                .unwrap_or_default();
            for coefficient in coefficients {
                if doc.lookup(&coefficient.input).is_none() {
                    report.add(ValidationIssue::error(
                        IssueCode::DanglingReference,
                        format!(
                            "Matrix coefficient input {} is not in the document",
                            coefficient.input
                        ),
                        IssueContext::BlockFormat {
                            id: block.id().to_string(),
                        },
                    ));
                }
            }
        }
    }
}

fn validate_block_pair(
    previous: &AudioBlockFormat,
    next: &AudioBlockFormat,
    report: &mut ValidationReport,
) {
    let (Ok(Rtime(rtime)), Ok(Duration(duration)), Ok(Rtime(next_rtime))) = (
        previous.get::<Rtime>(),
        previous.get::<Duration>(),
        next.get::<Rtime>(),
    ) else {
        return;
    };
    let Some(end) = rtime.checked_add(duration) else {
        return;
    };
    let context = IssueContext::BlockFormat {
        id: next.id().to_string(),
    };
    if end < next_rtime {
        report.add(ValidationIssue::warning(
            IssueCode::BlockTimingGap,
            format!("Gap between {} and {}", end, next_rtime),
            context,
        ));
    } else if end > next_rtime {
        report.add(ValidationIssue::warning(
            IssueCode::BlockTimingOverlap,
            format!("Starts at {} before the previous block ends at {}", next_rtime, end),
            context,
        ));
    }
}

fn validate_streams_and_tracks(doc: &Document, report: &mut ValidationReport) {
    for stream in attached::<AudioStreamFormat>(doc) {
        if stream.channel_format.is_none() && stream.pack_format.is_none() {
            report.add(ValidationIssue::error(
                IssueCode::StreamWithoutChannelOrPack,
                "Stream format references neither a channel format nor a pack format",
                context(stream),
            ));
        }
        if stream.track_formats.is_empty() {
            report.add(ValidationIssue::warning(
                IssueCode::StreamWithoutTrackFormats,
                "Stream format references no track formats",
                context(stream),
            ));
        }
    }

    for uid in attached::<AudioTrackUid>(doc) {
        if uid.track_format.is_none() {
            report.add(ValidationIssue::warning(
                IssueCode::TrackUidWithoutTrackFormat,
                "Track UID references no track format",
                context(uid),
            ));
        }
    }
}

fn validate_references<T: Element>(doc: &Document, report: &mut ValidationReport) {
    for element in attached::<T>(doc) {
        for target in element.outgoing() {
            let present = for_kind!(target.kind, U => U::store(doc).is_attached(target.key));
            if !present {
                report.add(ValidationIssue::error(
                    IssueCode::DanglingReference,
                    format!("Reference to a {} that is not in the document", target.kind),
                    context(element),
                ));
            }
        }
    }
}
