//! Block format timing.
//!
//! [`update_block_durations`] lays the block formats of every channel format
//! out over the lifetime of whatever uses that channel. The lifetime comes
//! from the audio objects that reach the channel (through pack formats, track
//! UIDs and stream formats), falling back to enclosing objects, then to
//! programmes, then to the file duration.
//!
//! The pass first plans the timing of every channel format and only then
//! writes it, so an [`AdmError::AmbiguousDuration`] leaves the document
//! untouched.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::document::{Document, Element, ElementKey};
use crate::error::AdmError;
use crate::model::{
    AudioBlockFormat, AudioChannelFormat, AudioContent, AudioObject, AudioPackFormat,
    AudioProgramme, AudioStreamFormat, AudioTrackFormat, AudioTrackUid, Duration, End,
    Parameters, Rtime, Start, Time,
};

/// Options for [`update_block_durations`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Total length of the file, used when nothing else bounds a channel.
    pub file_duration: Option<Time>,
}

/// A half-open span `[start, end)` on the file timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct Interval {
    start: Time,
    end: Time,
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

fn push_distinct(intervals: &mut Vec<Interval>, interval: Interval) {
    if !intervals.contains(&interval) {
        intervals.push(interval);
    }
}

/// Assigns `rtime` and `duration` to the block formats of every channel
/// format so that each block list tiles the channel's governing interval.
///
/// Returns the number of channel formats whose blocks were written. Channels
/// with no governing interval (and no file duration to fall back to) are left
/// untouched.
///
/// # Errors
///
/// [`AdmError::AmbiguousDuration`] if the objects reaching one channel format
/// disagree on its interval. Nothing is written in that case.
pub fn update_block_durations(doc: &mut Document, options: &ResolveOptions) -> Result<usize, AdmError> {
    let plan = plan_block_timing(doc, options)?;
    let updated = plan.len();
    for (key, timings) in plan {
        let Some(channel) = doc.channel_format_mut(key) else {
            continue;
        };
        for (block, (rtime, duration)) in channel.blocks_mut().iter_mut().zip(timings) {
            block.set(Rtime(rtime));
            block.set(Duration(duration));
        }
    }
    tracing::debug!(updated, "Updated block format timing");
    Ok(updated)
}

fn plan_block_timing(
    doc: &Document,
    options: &ResolveOptions,
) -> Result<Vec<(ElementKey, Vec<(Time, Time)>)>, AdmError> {
    let resolver = Resolver::new(doc, options.file_duration);
    let objects = AudioObject::store(doc);
    let channels = AudioChannelFormat::store(doc);

    let mut claims: HashMap<ElementKey, Vec<ElementKey>> = HashMap::new();
    for &object in objects.order() {
        for channel in resolver.object_channels(object) {
            claims.entry(channel).or_default().push(object);
        }
    }

    let mut plan = Vec::new();
    for &key in channels.order() {
        let Some(channel) = channels.element(key) else {
            continue;
        };
        if channel.block_formats().is_empty() {
            continue;
        }

        let mut intervals = Vec::new();
        for &object in claims.get(&key).into_iter().flatten() {
            for interval in resolver.object_intervals(object, &mut HashSet::new())? {
                push_distinct(&mut intervals, interval);
            }
        }

        let interval = match intervals.as_slice() {
            [] => match options.file_duration {
                Some(file) => Interval {
                    start: Time::ZERO,
                    end: file,
                },
                None => {
                    tracing::trace!(channel_format = %channel.id(), "No governing interval, blocks left as they are");
                    continue;
                }
            },
            [single] => *single,
            _ => {
                return Err(AdmError::AmbiguousDuration {
                    channel_format: channel.id().to_string(),
                    intervals: intervals.iter().map(ToString::to_string).collect(),
                })
            }
        };
        tracing::debug!(
            channel_format = %channel.id(),
            %interval,
            blocks = channel.block_formats().len(),
            "Resolved channel format interval"
        );
        plan.push((key, distribute(channel.block_formats(), interval)));
    }
    Ok(plan)
}

const MAX_WEIGHT_TOTAL: u128 = (u64::MAX >> 1) as u128;

/// Splits `interval` over `blocks`, keeping their order and relative lengths.
///
/// Block durations are the weights when every block has a positive one;
/// otherwise the blocks share the interval equally. The last block always
/// ends exactly at `interval.end`.
fn distribute(blocks: &[AudioBlockFormat], interval: Interval) -> Vec<(Time, Time)> {
    let durations: Option<Vec<u128>> = blocks
        .iter()
        .map(|block| match block.get::<Duration>() {
            Ok(Duration(d)) if d > Time::ZERO => Some(d.as_nanos() as u128),
            _ => None,
        })
        .collect();
    let mut weights = durations.unwrap_or_else(|| vec![1; blocks.len()]);
    let mut total: u128 = weights.iter().sum();
    // `span * total` must fit in u128.
    while total > MAX_WEIGHT_TOTAL {
        for weight in &mut weights {
            *weight = (*weight >> 1).max(1);
        }
        total = weights.iter().sum();
    }

    let origin = interval.start.as_nanos();
    let span = interval.end.saturating_sub(interval.start).as_nanos() as u128;
    let mut cumulative = 0u128;
    let mut block_start = origin;
    let mut timings = Vec::with_capacity(weights.len());
    for weight in weights {
        cumulative += weight;
        let block_end = origin + (span * cumulative / total) as u64;
        timings.push((
            Time::from_nanos(block_start),
            Time::from_nanos(block_end - block_start),
        ));
        block_start = block_end;
    }
    timings
}

/// Read-only view of the graph with the reverse indexes the resolver needs.
struct Resolver<'a> {
    doc: &'a Document,
    file_duration: Option<Time>,
    parents: HashMap<ElementKey, Vec<ElementKey>>,
    programmes: HashMap<ElementKey, Vec<ElementKey>>,
}

impl<'a> Resolver<'a> {
    fn new(doc: &'a Document, file_duration: Option<Time>) -> Self {
        let objects = AudioObject::store(doc);
        let mut parents: HashMap<ElementKey, Vec<ElementKey>> = HashMap::new();
        for &key in objects.order() {
            if let Some(object) = objects.element(key) {
                for &child in &object.objects {
                    parents.entry(child).or_default().push(key);
                }
            }
        }

        let contents = AudioContent::store(doc);
        let programme_store = AudioProgramme::store(doc);
        let mut programmes: HashMap<ElementKey, Vec<ElementKey>> = HashMap::new();
        for &key in programme_store.order() {
            let Some(programme) = programme_store.element(key) else {
                continue;
            };
            for content in programme.contents.iter().filter_map(|&c| contents.element(c)) {
                for &object in &content.objects {
                    let entry = programmes.entry(object).or_default();
                    if !entry.contains(&key) {
                        entry.push(key);
                    }
                }
            }
        }

        Self {
            doc,
            file_duration,
            parents,
            programmes,
        }
    }

    /// Channel formats reachable from an object without passing through
    /// another object.
    fn object_channels(&self, key: ElementKey) -> HashSet<ElementKey> {
        let mut channels = HashSet::new();
        let Some(object) = AudioObject::store(self.doc).element(key) else {
            return channels;
        };

        let mut packs: Vec<ElementKey> = object.pack_formats.clone();
        let uids = AudioTrackUid::store(self.doc);
        let tracks = AudioTrackFormat::store(self.doc);
        let streams = AudioStreamFormat::store(self.doc);
        for uid in object.track_uids.iter().filter_map(|&k| uids.element(k)) {
            channels.extend(uid.channel_format);
            packs.extend(uid.pack_format);
            let stream = uid
                .track_format
                .and_then(|k| tracks.element(k))
                .and_then(|track| track.stream_format)
                .and_then(|k| streams.element(k));
            if let Some(stream) = stream {
                channels.extend(stream.channel_format);
                packs.extend(stream.pack_format);
            }
        }

        let pack_store = AudioPackFormat::store(self.doc);
        let mut visited = HashSet::new();
        while let Some(pack_key) = packs.pop() {
            if !visited.insert(pack_key) {
                continue;
            }
            if let Some(pack) = pack_store.element(pack_key) {
                channels.extend(pack.channel_formats.iter().copied());
                packs.extend(pack.pack_formats.iter().copied());
            }
        }
        channels
    }

    /// The intervals an object claims, by priority: its own timing, its
    /// parents' intervals, the programmes it belongs to, the whole file.
    fn object_intervals(
        &self,
        key: ElementKey,
        visiting: &mut HashSet<ElementKey>,
    ) -> Result<Vec<Interval>, AdmError> {
        let Some(object) = AudioObject::store(self.doc).element(key) else {
            return Ok(Vec::new());
        };
        if !visiting.insert(key) {
            return Ok(Vec::new());
        }

        let mut intervals = Vec::new();
        if let Ok(Duration(duration)) = object.get::<Duration>() {
            let Start(start) = object.get::<Start>()?;
            let end = start
                .checked_add(duration)
                .ok_or_else(|| AdmError::invalid("duration", format!("{} overflows the timeline", object.id())))?;
            intervals.push(Interval { start, end });
        }

        if intervals.is_empty() {
            for &parent in self.parents.get(&key).into_iter().flatten() {
                for interval in self.object_intervals(parent, visiting)? {
                    push_distinct(&mut intervals, interval);
                }
            }
        }

        if intervals.is_empty() {
            for &programme in self.programmes.get(&key).into_iter().flatten() {
                if let Some(interval) = self.programme_interval(programme)? {
                    push_distinct(&mut intervals, interval);
                }
            }
        }

        if intervals.is_empty() {
            if let Some(file) = self.file_duration {
                intervals.push(Interval {
                    start: Time::ZERO,
                    end: file,
                });
            }
        }

        visiting.remove(&key);
        tracing::trace!(object = %object.id(), intervals = intervals.len(), "Resolved object intervals");
        Ok(intervals)
    }

    fn programme_interval(&self, key: ElementKey) -> Result<Option<Interval>, AdmError> {
        let Some(programme) = AudioProgramme::store(self.doc).element(key) else {
            return Ok(None);
        };
        let Start(start) = programme.get::<Start>()?;
        let end = match programme.get::<End>() {
            Ok(End(end)) => end,
            Err(_) => match self.file_duration {
                Some(file) => file,
                None => return Ok(None),
            },
        };
        if end < start {
            return Err(AdmError::invalid(
                "end",
                format!("{} ends at {end}, before its start {start}", programme.id()),
            ));
        }
        Ok(Some(Interval { start, end }))
    }
}
