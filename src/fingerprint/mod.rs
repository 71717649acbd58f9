mod digest;
mod djb2;
mod generator;
mod source;
mod strategies;

pub use digest::{ContentDigest, Sha256Digest};
pub use djb2::djb2_hex;
pub use generator::{
    Capabilities, Fingerprint, FingerprintError, FingerprintGenerator, FingerprintMethod,
};
pub use source::{DiskFile, FileSource, MemoryFile};
pub use strategies::{
    ContentFingerprint, FingerprintStrategy, MetadataFingerprint, SampledFingerprint,
    SAMPLE_SIZE,
};
