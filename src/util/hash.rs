//! Hashing utilities for plan fingerprints.

use sha2::{Digest, Sha256};

/// A hasher for building fingerprints from multiple components.
#[derive(Default)]
pub struct Fingerprint {
    hasher: Sha256,
}

impl Fingerprint {
    pub fn new() -> Self {
        Fingerprint {
            hasher: Sha256::new(),
        }
    }

    /// Add a string component. Components are NUL-separated so that
    /// `["ab", "c"]` and `["a", "bc"]` differ.
    pub fn update_str(&mut self, s: &str) -> &mut Self {
        self.hasher.update(s.as_bytes());
        self.hasher.update(b"\0");
        self
    }

    pub fn update_strs<'a>(&mut self, items: impl IntoIterator<Item = &'a str>) -> &mut Self {
        for s in items {
            self.update_str(s);
        }
        self
    }

    pub fn update_opt(&mut self, opt: Option<&str>) -> &mut Self {
        match opt {
            Some(s) => {
                self.hasher.update(b"\x01");
                self.update_str(s)
            }
            None => {
                self.hasher.update(b"\x00");
                self
            }
        }
    }

    /// Mark the end of a variable-length section.
    pub fn section(&mut self, name: &str) -> &mut Self {
        self.hasher.update(b"\x1e");
        self.update_str(name)
    }

    pub fn finish(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}
