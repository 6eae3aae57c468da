//! Release walking.
//!
//! A release is a zip of one xz-compressed JSON metadata document and any
//! number of link dumps in the `shortcode|target` grammar. Each dump is
//! streamed through a checksum validator, a decompressor and the dump
//! reader, so memory use does not grow with the size of a member.

use std::fs::{self, File};
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};

use urlhoard_beacon::{DumpReader, Grammar, LinkRecord, MetaField, ReaderOptions, Warning};
use urlhoard_verify::ValidatingReader;

use crate::member::{self, ArchiveMember, MemberKind};
use crate::{
    BoxError, Diagnostic, Diagnostics, Error, Location, MemberReport, ReleaseMetadata,
    ReleaseReport, Result, WalkOptions,
};

/// Everything a handler knows about where a record came from.
#[derive(Clone, Copy, Debug)]
pub struct LinkContext<'a> {
    pub meta: &'a ReleaseMetadata,
    /// Header fields of the dump, if it had any.
    pub header: &'a [MetaField],
    /// Shortcode width declared by the dump's file name.
    pub shortcode_len: Option<usize>,
    pub location: &'a Location,
    /// 1-based line of the record within the decompressed dump.
    pub line: u64,
}

impl LinkContext<'_> {
    pub fn container(&self) -> &Path {
        &self.location.container
    }

    pub fn member(&self) -> &str {
        &self.location.member
    }
}

/// Walk every dump of the release at `path`.
pub fn walk_release<F>(
    path: &Path,
    options: &WalkOptions,
    diagnostics: &mut dyn Diagnostics,
    handler: F,
) -> Result<ReleaseReport>
where
    F: FnMut(&LinkRecord, &LinkContext<'_>) -> std::result::Result<(), BoxError>,
{
    let file = File::open(path).map_err(|source| Error::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    walk_release_reader(BufReader::new(file), path, options, diagnostics, handler)
}

/// Walk a release read from `reader`; `container` names it in reports.
///
/// Structural problems with the container and handler errors are returned.
/// A member that cannot be read to the end is recorded in its
/// [`MemberReport`] and the walk moves on to the next one.
pub fn walk_release_reader<R, F>(
    reader: R,
    container: &Path,
    options: &WalkOptions,
    diagnostics: &mut dyn Diagnostics,
    mut handler: F,
) -> Result<ReleaseReport>
where
    R: Read + Seek,
    F: FnMut(&LinkRecord, &LinkContext<'_>) -> std::result::Result<(), BoxError>,
{
    let corrupted = |source| Error::Corrupted {
        container: container.to_path_buf(),
        source,
    };
    let mut archive = zip::ZipArchive::new(reader).map_err(corrupted)?;
    let members = list_members(&mut archive).map_err(corrupted)?;
    let classified = member::classify(&members, container)?;

    tracing::debug!(
        container = %container.display(),
        metadata = %classified.metadata.name,
        dumps = classified.dumps.len(),
        "classified release"
    );
    for other in &classified.skipped {
        tracing::debug!(container = %container.display(), member = %other.name, "skipping member");
    }

    let meta = read_metadata(&mut archive, container, classified.metadata)?;
    let mut report = ReleaseReport {
        container: container.to_path_buf(),
        meta,
        members: Vec::with_capacity(classified.dumps.len()),
        skipped: classified.skipped.iter().map(|m| m.name.clone()).collect(),
    };

    for dump in classified.dumps {
        let at = Location::new(container, &dump.name);
        let member_report = walk_dump(
            &mut archive,
            dump,
            &at,
            &report.meta,
            options,
            diagnostics,
            &mut handler,
        )?;
        if let Some(error) = &member_report.failure {
            diagnostics.report(Diagnostic::MemberFailed { error });
        }
        tracing::info!(
            container = %container.display(),
            member = %dump.name,
            links = member_report.links,
            record_errors = member_report.record_errors,
            "walked dump"
        );
        if let Some(on_member) = &options.on_member {
            on_member(&member_report);
        }
        report.members.push(member_report);
    }
    Ok(report)
}

/// Walk every `*.zip` in every subdirectory of `root`, in name order.
///
/// Stops at the first error returned by [`walk_release`].
pub fn walk_releases<F>(
    root: &Path,
    options: &WalkOptions,
    diagnostics: &mut dyn Diagnostics,
    mut handler: F,
) -> Result<Vec<ReleaseReport>>
where
    F: FnMut(&LinkRecord, &LinkContext<'_>) -> std::result::Result<(), BoxError>,
{
    let mut reports = Vec::new();
    for dir in sorted_entries(root, |path| path.is_dir())? {
        let zips = sorted_entries(&dir, |path| {
            path.is_file() && path.extension().is_some_and(|ext| ext == "zip")
        })?;
        for container in zips {
            reports.push(walk_release(&container, options, diagnostics, &mut handler)?);
        }
    }
    Ok(reports)
}

fn sorted_entries(dir: &Path, keep: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    let read_failed = |source| Error::ReadFailed {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_failed)? {
        let path = entry.map_err(read_failed)?.path();
        if keep(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn list_members<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
) -> zip::result::ZipResult<Vec<ArchiveMember>> {
    let mut members = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let file = archive.by_index_raw(index)?;
        if file.is_dir() {
            continue;
        }
        members.push(ArchiveMember {
            index,
            name: file.name().to_string(),
            size: file.size(),
            compressed_size: file.compressed_size(),
            crc32: file.crc32(),
            stored: file.compression() == zip::CompressionMethod::Stored,
            kind: MemberKind::classify(file.name()),
        });
    }
    Ok(members)
}

fn read_metadata<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
    container: &Path,
    member: &ArchiveMember,
) -> Result<ReleaseMetadata> {
    let at = Location::new(container, &member.name);
    let file = archive
        .by_index(member.index)
        .map_err(|source| Error::OpenMember {
            at: at.clone(),
            source,
        })?;
    let decoder = xz2::read::XzDecoder::new_multi_decoder(file);
    ReleaseMetadata::from_reader(decoder).map_err(|source| {
        if source.is_io() {
            Error::ReadMember {
                at,
                source: source.into(),
            }
        } else {
            Error::StrictDecode { at, source }
        }
    })
}

/// Walk one dump. Only handler errors are returned; anything that stops
/// the member early ends up in the report's `failure`.
fn walk_dump<R, F>(
    archive: &mut zip::ZipArchive<R>,
    member: &ArchiveMember,
    at: &Location,
    meta: &ReleaseMetadata,
    options: &WalkOptions,
    diagnostics: &mut dyn Diagnostics,
    handler: &mut F,
) -> Result<MemberReport>
where
    R: Read + Seek,
    F: FnMut(&LinkRecord, &LinkContext<'_>) -> std::result::Result<(), BoxError>,
{
    let mut report = MemberReport::new(member);
    let MemberKind::Dump {
        compression,
        shortcode_len,
    } = member.kind
    else {
        return Ok(report);
    };

    // Stored members are read raw, so the zip CRC-32 is checked by the
    // validator alone; the zip crate checks the others while inflating.
    let opened = if member.stored {
        archive.by_index_raw(member.index)
    } else {
        archive.by_index(member.index)
    };
    let file = match opened {
        Ok(file) => file,
        Err(source) => {
            report.failure = Some(Error::OpenMember {
                at: at.clone(),
                source,
            });
            return Ok(report);
        }
    };
    let crc32 = member.stored.then_some(member.crc32);
    let validated = ValidatingReader::new(file, options.digests_for(&member.name, crc32));
    let Some(decoder) = compression.decoder(validated) else {
        report.failure = Some(Error::UnsupportedFormat {
            at: at.clone(),
            compression,
        });
        return Ok(report);
    };

    let reader_options = ReaderOptions::default().require_separator(options.require_separator);
    let mut reader = DumpReader::new(decoder, Grammar::Fixed { width: shortcode_len })
        .with_options(reader_options)
        .with_sink(Vec::<Warning>::new());

    match reader.header() {
        Ok(fields) => report.header = fields.to_vec(),
        Err(urlhoard_beacon::Error::Io(err)) => {
            report.failure = Some(Error::from_stream(at.clone(), err));
            return Ok(report);
        }
        Err(source) => {
            report.failure = Some(Error::Dump {
                at: at.clone(),
                source,
            });
            return Ok(report);
        }
    }

    loop {
        let result = reader.read();
        for warning in reader.sink_mut().drain(..) {
            report.warnings += 1;
            diagnostics.report(Diagnostic::Warning {
                at,
                warning: &warning,
            });
        }
        match result {
            Ok(Some(link)) => {
                let context = LinkContext {
                    meta,
                    header: &report.header,
                    shortcode_len,
                    location: at,
                    line: reader.line_number(),
                };
                handler(&link, &context).map_err(|source| Error::Handler {
                    at: at.clone(),
                    source,
                })?;
                report.links += 1;
            }
            Ok(None) => break,
            Err(urlhoard_beacon::Error::Io(err)) => {
                report.failure = Some(Error::from_stream(at.clone(), err));
                return Ok(report);
            }
            Err(error) => {
                report.record_errors += 1;
                diagnostics.report(Diagnostic::RecordError {
                    at,
                    line: reader.line_number(),
                    error: &error,
                });
            }
        }
    }

    // Reach the end of the raw member so its digests are checked even when
    // the decoder stopped short of it.
    let validated = reader.into_inner().into_inner().into_inner();
    match validated.finish() {
        Ok(bytes) => report.bytes = bytes,
        Err(err) => report.failure = Some(Error::from_verify(at.clone(), err)),
    }
    Ok(report)
}
