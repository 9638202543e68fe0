/// Run-scoped id counter. Owned by the caller and handed into each stage
/// that mints ids, so a fresh assessment always starts from 1.
#[derive(Debug)]
pub struct IdSequence {
    prefix: &'static str,
    next: u64,
}

impl IdSequence {
    pub fn new(prefix: &'static str) -> Self {
        Self { prefix, next: 1 }
    }

    pub fn next_id(&mut self) -> String {
        let id = format!("{}_{}", self.prefix, self.next);
        self.next += 1;
        id
    }

    /// How many ids have been handed out so far.
    pub fn issued(&self) -> u64 {
        self.next - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_starts_at_one() {
        let mut ids = IdSequence::new("ent");
        assert_eq!(ids.next_id(), "ent_1");
        assert_eq!(ids.next_id(), "ent_2");
        assert_eq!(ids.issued(), 2);
    }

    #[test]
    fn test_separate_sequences_are_independent() {
        let mut a = IdSequence::new("hyp");
        let mut b = IdSequence::new("sug");
        a.next_id();
        assert_eq!(b.next_id(), "sug_1");
    }
}
