use std::collections::HashSet;

use uuid::Uuid;

/// Who a send request targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    /// Ids given by the caller, used as-is
    Explicit(Vec<Uuid>),
    /// Owners of reports matching the criteria
    Derived,
}

impl Audience {
    pub fn from_request(user_ids: &[Uuid]) -> Self {
        if user_ids.is_empty() {
            Audience::Derived
        } else {
            Audience::Explicit(user_ids.to_vec())
        }
    }
}

/// Drop repeated ids, keeping the first occurrence of each
pub fn dedupe_first_seen(ids: impl IntoIterator<Item = Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedupe_keeps_first_seen_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();

        assert_eq!(dedupe_first_seen(vec![b, a, b, c, a]), vec![b, a, c]);
    }

    #[test]
    fn test_dedupe_empty() {
        assert!(dedupe_first_seen(Vec::new()).is_empty());
    }

    #[test]
    fn test_explicit_ids_are_kept_verbatim() {
        let a = Uuid::new_v4();
        assert_eq!(
            Audience::from_request(&[a, a]),
            Audience::Explicit(vec![a, a])
        );
        assert_eq!(Audience::from_request(&[]), Audience::Derived);
    }
}
