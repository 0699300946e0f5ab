use sha2::{Digest, Sha256};

/// Provenance metadata embedded as a header comment in generated models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvenanceInfo {
    /// SHA-256 hash of the source model file.
    pub model_sha256: String,
    /// Generator name and version.
    pub generator: String,
}

impl ProvenanceInfo {
    pub fn for_source(source: &[u8]) -> Self {
        Self {
            model_sha256: sha256_hex_bytes(source),
            generator: concat!("qgrady ", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// `// @qgrady-provenance key=value` lines followed by a blank line.
    pub fn header(&self) -> String {
        let mut header = String::new();
        header.push_str(&format!(
            "// @qgrady-provenance model_sha256={}\n",
            self.model_sha256
        ));
        header.push_str(&format!(
            "// @qgrady-provenance generator={}\n",
            self.generator
        ));
        header.push('\n');
        header
    }
}

pub fn sha256_hex_bytes(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_of_empty_input() {
        assert_eq!(
            sha256_hex_bytes(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn header_lines() {
        let info = ProvenanceInfo {
            model_sha256: "abc".into(),
            generator: "qgrady 0.0.0".into(),
        };
        assert_eq!(
            info.header(),
            "// @qgrady-provenance model_sha256=abc\n// @qgrady-provenance generator=qgrady 0.0.0\n\n"
        );
    }
}
