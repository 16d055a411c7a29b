//! Append-only transcript accumulation

/// One accepted unit of transcript text
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptSegment {
    pub text: String,
    pub sequence: u64,
}

/// Append-only holder of accepted transcript segments for a session.
///
/// Owned exclusively by the consume loop; sequence numbers strictly follow
/// capture order.
#[derive(Debug, Default)]
pub struct Accumulator {
    segments: Vec<TranscriptSegment>,
    next_sequence: u64,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append accepted text under the next sequence number
    pub fn append(&mut self, text: String) -> u64 {
        self.next_sequence += 1;
        let sequence = self.next_sequence;
        self.segments.push(TranscriptSegment { text, sequence });
        sequence
    }

    /// All accepted texts, space-joined in sequence order
    pub fn snapshot(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn segments(&self) -> &[TranscriptSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_assigns_increasing_sequence() {
        let mut acc = Accumulator::new();

        assert_eq!(acc.append("one".to_string()), 1);
        assert_eq!(acc.append("two".to_string()), 2);
        assert_eq!(acc.append("three".to_string()), 3);

        let sequences: Vec<u64> = acc.segments().iter().map(|s| s.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3]);
    }

    #[test]
    fn test_snapshot_joins_in_order() {
        let mut acc = Accumulator::new();
        acc.append("the".to_string());
        acc.append("quick".to_string());
        acc.append("fox".to_string());

        assert_eq!(acc.snapshot(), "the quick fox");
    }

    #[test]
    fn test_empty_snapshot() {
        let acc = Accumulator::new();
        assert!(acc.is_empty());
        assert_eq!(acc.snapshot(), "");
    }
}
