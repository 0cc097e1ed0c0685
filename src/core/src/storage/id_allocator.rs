//! Identity allocation for record collections.
//!
//! Ids are derived from the current contents of a collection rather than a
//! persisted counter: the next id is one above the highest id present, or 1
//! for an empty collection. A freed id below the maximum is never handed
//! out again while a higher id exists.

/// A record with an integer identity within its collection.
pub trait Identified {
    fn id(&self) -> i64;
}

/// `1 + max(id)`, or 1 when `records` is empty.
pub fn next_id<T: Identified>(records: &[T]) -> i64 {
    next_id_by(records, Identified::id)
}

/// Same rule as [`next_id`], keyed by an arbitrary integer field.
pub fn next_id_by<T, F>(records: &[T], key: F) -> i64
where
    F: Fn(&T) -> i64,
{
    records.iter().map(key).max().unwrap_or(0) + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row(i64);

    impl Identified for Row {
        fn id(&self) -> i64 {
            self.0
        }
    }

    #[test]
    fn test_empty_collection_starts_at_one() {
        let rows: Vec<Row> = Vec::new();
        assert_eq!(next_id(&rows), 1);
    }

    #[test]
    fn test_next_after_max() {
        let rows = vec![Row(3), Row(7), Row(5)];
        assert_eq!(next_id(&rows), 8);
    }

    #[test]
    fn test_freed_lower_id_not_reused() {
        let mut rows = vec![Row(1), Row(2), Row(3)];
        rows.retain(|r| r.0 != 2);
        assert_eq!(next_id(&rows), 4);

        // deleting the max lowers the next id to the new max + 1
        rows.retain(|r| r.0 != 3);
        assert_eq!(next_id(&rows), 2);
    }

    #[test]
    fn test_next_id_by_field() {
        let pairs = vec![(10, "a"), (4, "b")];
        assert_eq!(next_id_by(&pairs, |p| p.0), 11);
    }
}
