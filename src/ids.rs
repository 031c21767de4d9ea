/// Source of fresh identifiers for tasks and rewards.
///
/// Any `Fn() -> String` closure works, which is how tests supply a
/// deterministic sequence.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

impl<F> IdGenerator for F
where
    F: Fn() -> String + Send + Sync,
{
    fn next_id(&self) -> String {
        self()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn random_ids_do_not_repeat() {
        let ids: HashSet<String> = (0..64).map(|_| RandomIds.next_id()).collect();
        assert_eq!(ids.len(), 64);
    }

    #[test]
    fn closures_are_generators() {
        let counter = AtomicUsize::new(0);
        let ids = move || format!("id-{}", counter.fetch_add(1, Ordering::Relaxed));
        assert_eq!(ids.next_id(), "id-0");
        assert_eq!(ids.next_id(), "id-1");
    }
}
