use std::path::Path;

use crate::{Compression, Error, Result};

pub const METADATA_SUFFIX: &str = ".meta.json.xz";

/// What a release member holds, judged by its name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberKind {
    Metadata,
    /// A link dump. `shortcode_len` is the decimal width in the file name,
    /// e.g. `6.txt.xz`.
    Dump {
        compression: Compression,
        shortcode_len: Option<usize>,
    },
    Other,
}

impl MemberKind {
    pub fn classify(name: &str) -> Self {
        if name.ends_with(METADATA_SUFFIX) {
            return Self::Metadata;
        }
        let base = name.rsplit('/').next().unwrap_or(name);
        let Some((stem, extension)) = base.rsplit_once('.') else {
            return Self::Other;
        };
        let (Some(compression), Some(stem)) = (
            Compression::from_extension(extension),
            stem.strip_suffix(".txt"),
        ) else {
            return Self::Other;
        };
        Self::Dump {
            compression,
            shortcode_len: stem.parse().ok(),
        }
    }
}

/// A member as listed in the zip central directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveMember {
    pub index: usize,
    pub name: String,
    pub size: u64,
    pub compressed_size: u64,
    /// CRC-32 of the uncompressed member, as recorded by the zip writer.
    pub crc32: u32,
    /// Whether the zip holds the member without its own compression.
    pub stored: bool,
    pub kind: MemberKind,
}

/// The single metadata member of a release and its dumps, in listing order.
#[derive(Debug)]
pub struct Classified<'a> {
    pub metadata: &'a ArchiveMember,
    pub dumps: Vec<&'a ArchiveMember>,
    pub skipped: Vec<&'a ArchiveMember>,
}

/// Split a release listing into its metadata document and dumps.
///
/// Older releases put the metadata first and newer ones usually last, so
/// those two slots are looked at before anything else.
pub fn classify<'a>(members: &'a [ArchiveMember], container: &Path) -> Result<Classified<'a>> {
    let (Some(first), Some(last)) = (members.first(), members.last()) else {
        return Err(Error::EmptyArchive {
            container: container.to_path_buf(),
        });
    };
    let metadata = [first, last]
        .into_iter()
        .chain(members)
        .find(|m| m.kind == MemberKind::Metadata)
        .ok_or_else(|| Error::MissingMetadata {
            container: container.to_path_buf(),
        })?;

    let mut dumps = Vec::new();
    let mut skipped = Vec::new();
    for member in members {
        match member.kind {
            MemberKind::Metadata if member.index == metadata.index => {}
            MemberKind::Metadata => {
                return Err(Error::AmbiguousMetadata {
                    container: container.to_path_buf(),
                    first: metadata.name.clone(),
                    second: member.name.clone(),
                });
            }
            MemberKind::Dump { .. } => dumps.push(member),
            MemberKind::Other => skipped.push(member),
        }
    }
    Ok(Classified {
        metadata,
        dumps,
        skipped,
    })
}
