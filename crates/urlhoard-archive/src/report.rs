use std::path::PathBuf;

use urlhoard_beacon::MetaField;

use crate::{ArchiveMember, Error, MemberKind, ReleaseMetadata};

/// Outcome of walking one release container.
#[derive(Debug)]
pub struct ReleaseReport {
    pub container: PathBuf,
    pub meta: ReleaseMetadata,
    pub members: Vec<MemberReport>,
    /// Members that are neither metadata nor dumps.
    pub skipped: Vec<String>,
}

/// Outcome of walking one dump member.
#[derive(Debug)]
pub struct MemberReport {
    pub name: String,
    pub shortcode_len: Option<usize>,
    pub header: Vec<MetaField>,
    /// Records handed to the handler.
    pub links: u64,
    pub record_errors: u64,
    pub warnings: u64,
    /// Bytes of the member as stored, before decompression.
    pub bytes: u64,
    /// Why the member was abandoned, if it was.
    pub failure: Option<Error>,
}

impl ReleaseReport {
    pub fn links(&self) -> u64 {
        self.members.iter().map(|m| m.links).sum()
    }

    pub fn record_errors(&self) -> u64 {
        self.members.iter().map(|m| m.record_errors).sum()
    }

    pub fn warnings(&self) -> u64 {
        self.members.iter().map(|m| m.warnings).sum()
    }

    pub fn failed_members(&self) -> impl Iterator<Item = &MemberReport> + '_ {
        self.members.iter().filter(|m| !m.is_ok())
    }

    pub fn member(&self, name: &str) -> Option<&MemberReport> {
        self.members.iter().find(|m| m.name == name)
    }
}

impl MemberReport {
    pub(crate) fn new(member: &ArchiveMember) -> Self {
        let shortcode_len = match member.kind {
            MemberKind::Dump { shortcode_len, .. } => shortcode_len,
            _ => None,
        };
        Self {
            name: member.name.clone(),
            shortcode_len,
            header: Vec::new(),
            links: 0,
            record_errors: 0,
            warnings: 0,
            bytes: 0,
            failure: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.failure.is_none()
    }
}
