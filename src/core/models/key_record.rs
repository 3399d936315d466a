/// One validated SSH public key line: `<key-type> <base64-blob> [comment]`,
/// already stripped to the accepted character set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyRecord {
    pub line: String,
}

/// The accepted outcome of validating one keyserver response.
///
/// Holds the records in response order. Serialization is the exact byte
/// sequence the writer appends: each record as its key line followed by a
/// blank separator and a trailing blank line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedKeys {
    records: Vec<PublicKeyRecord>,
}

impl ValidatedKeys {
    pub fn new(records: Vec<PublicKeyRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[PublicKeyRecord] {
        &self.records
    }

    /// The byte sequence to append to the destination.
    pub fn to_appendable_text(&self) -> String {
        let mut text = String::new();
        for record in &self.records {
            text.push_str(&record.line);
            text.push_str("\n\n\n");
        }
        text
    }
}
