use std::collections::HashMap;
use std::sync::Arc;

use urlhoard_verify::DigestSet;

use crate::MemberReport;

#[derive(Clone)]
pub struct WalkOptions {
    /// Treat a dump line without a bar as a record error instead of a warning.
    pub require_separator: bool,
    /// Check each member against the CRC-32 in the zip central directory.
    pub verify_crc32: bool,
    /// Extra digests of the raw member bytes, keyed by member name.
    pub member_digests: HashMap<String, DigestSet>,
    pub on_member: Option<Arc<dyn Fn(&MemberReport) + Send + Sync>>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            require_separator: false,
            verify_crc32: true,
            member_digests: HashMap::new(),
            on_member: None,
        }
    }
}

impl WalkOptions {
    pub fn require_separator(mut self, require: bool) -> Self {
        self.require_separator = require;
        self
    }

    pub fn verify_crc32(mut self, verify: bool) -> Self {
        self.verify_crc32 = verify;
        self
    }

    pub fn member_digest(mut self, member: impl Into<String>, digests: DigestSet) -> Self {
        self.member_digests.insert(member.into(), digests);
        self
    }

    /// Called once per dump member after it has been walked.
    pub fn on_member(mut self, callback: Arc<dyn Fn(&MemberReport) + Send + Sync>) -> Self {
        self.on_member = Some(callback);
        self
    }

    /// Digests expected of a member's raw bytes.
    ///
    /// The zip CRC-32 covers the uncompressed member; caller-supplied digests
    /// win where both name the same algorithm.
    pub(crate) fn digests_for(&self, name: &str, crc32: Option<u32>) -> DigestSet {
        let mut digests = DigestSet::new();
        if let (true, Some(crc32)) = (self.verify_crc32, crc32) {
            digests = digests.with_crc32(crc32);
        }
        if let Some(extra) = self.member_digests.get(name) {
            digests.merge(extra);
        }
        digests
    }
}
