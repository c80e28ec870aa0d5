//! Tier → `.seg` field schema
//!
//! Each record renders as up to three lines. Known tiers live in a fixed
//! line and position, some under a different field name; everything else
//! goes to a trailing overflow line. Adding a tier means adding a row to
//! [`TIER_TABLE`].

/// Output line a known tier is written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bucket {
    /// Speaker, bounding box, speech
    Identity,
    /// Gesture, bounding circle, head, body, arms & hands
    Gesture,
}

impl Bucket {
    /// Buckets in line order
    pub const ALL: [Bucket; 2] = [Bucket::Identity, Bucket::Gesture];
}

/// One schema row: source tier name, rendered field name, target line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierField {
    /// Tier name as produced by the annotation template
    pub tier: &'static str,
    /// Field name written to the log
    pub field: &'static str,
    /// Line the field belongs to
    pub bucket: Bucket,
}

const fn row(tier: &'static str, field: &'static str, bucket: Bucket) -> TierField {
    TierField { tier, field, bucket }
}

/// Known tiers, in output order within each bucket
pub const TIER_TABLE: &[TierField] = &[
    row("Speaker", "Speaker", Bucket::Identity),
    row("Rectangle", "BoundingBox", Bucket::Identity),
    row("Speech", "Speech", Bucket::Identity),
    row("Gesture", "Gesture", Bucket::Gesture),
    row("Circle", "BoundingCircle", Bucket::Gesture),
    row("Head", "Head", Bucket::Gesture),
    row("Body", "Body", Bucket::Gesture),
    row("Arms & hands", "Arms & Hands", Bucket::Gesture),
];

/// Schema row for a tier, if it is a known one
#[must_use]
pub fn lookup(tier: &str) -> Option<&'static TierField> {
    TIER_TABLE.iter().find(|row| row.tier == tier)
}

/// Rows of one bucket, in output order
pub fn bucket_fields(bucket: Bucket) -> impl Iterator<Item = &'static TierField> {
    TIER_TABLE.iter().filter(move |row| row.bucket == bucket)
}
