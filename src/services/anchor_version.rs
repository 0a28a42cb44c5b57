//! Anchor hardware version table
//!
//! Region-lookup width varies per hardware revision: newer anchors report to
//! more candidate areas per scan. Unknown revisions fall back to the default.

use dashmap::DashMap;

/// Default candidate-area count per anchor
pub const DEFAULT_REGION_NUM: i32 = 5;

#[derive(Debug, Clone, Copy)]
pub struct AnchorVersionSpec {
    pub region_num: i32,
}

/// 基站版本规格表
#[derive(Debug, Default)]
pub struct AnchorVersionTable {
    specs: DashMap<String, AnchorVersionSpec>,
}

impl AnchorVersionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, version_code: impl Into<String>, spec: AnchorVersionSpec) {
        self.specs.insert(version_code.into(), spec);
    }

    pub fn spec_for(&self, version_code: &str) -> Option<AnchorVersionSpec> {
        self.specs.get(version_code).map(|s| *s)
    }

    /// Candidate-area count for a revision, defaulting when the revision is
    /// absent or unregistered
    pub fn region_num_for(&self, version_code: Option<&str>) -> i32 {
        version_code
            .and_then(|code| self.spec_for(code))
            .map(|spec| spec.region_num)
            .unwrap_or(DEFAULT_REGION_NUM)
    }
}
