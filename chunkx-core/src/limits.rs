/// Decode-side bounds on a chunk header.
///
/// A corrupt length prefix inside the record can never allocate more than
/// `max_record_bytes`. Writers check against the defaults so anything they
/// produce stays readable by a default reader.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeaderLimits {
    pub max_record_bytes: u64,
    pub max_key_len: usize,
}

impl Default for HeaderLimits {
    fn default() -> Self {
        Self { max_record_bytes: 64 * 1024, max_key_len: 4096 }
    }
}
