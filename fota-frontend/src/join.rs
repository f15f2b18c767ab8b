//! Fan-in over independent requests.
//!
//! Both branches always run to completion and each keeps its own result, so
//! a failure on one side never hides the data of the other.

use futures::future::{join, join_all};
use std::future::Future;

/// Outcome of two concurrent branches.
#[derive(Debug)]
pub struct Gathered<A, B, E> {
    pub left: Result<A, E>,
    pub right: Result<B, E>,
}

impl<A, B, E> Gathered<A, B, E> {
    pub fn any_failed(&self) -> bool {
        self.left.is_err() || self.right.is_err()
    }

    pub fn split(self) -> (Result<A, E>, Result<B, E>) {
        (self.left, self.right)
    }
}

/// Await two futures concurrently and return once both have finished.
pub async fn gather<A, B, E, FA, FB>(left: FA, right: FB) -> Gathered<A, B, E>
where
    FA: Future<Output = Result<A, E>>,
    FB: Future<Output = Result<B, E>>,
{
    let (left, right) = join(left, right).await;
    Gathered { left, right }
}

/// Await any number of futures concurrently; results keep input order.
pub async fn gather_all<T, E, F, I>(futures: I) -> Vec<Result<T, E>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>>,
{
    join_all(futures).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn after(ms: u64, value: Result<u32, &'static str>) -> Result<u32, &'static str> {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        value
    }

    #[tokio::test]
    async fn test_gather_waits_for_both() {
        let gathered = gather(after(20, Ok(1)), after(1, Ok(2))).await;
        assert!(!gathered.any_failed());
        assert_eq!(gathered.split(), (Ok(1), Ok(2)));
    }

    #[tokio::test]
    async fn test_gather_keeps_the_other_side() {
        let gathered = gather(after(1, Err("posts down")), after(10, Ok(7))).await;
        assert!(gathered.any_failed());
        assert_eq!(gathered.left, Err("posts down"));
        assert_eq!(gathered.right, Ok(7));
    }

    #[tokio::test]
    async fn test_gather_all_keeps_order() {
        let results = gather_all(vec![
            after(15, Ok(1)),
            after(1, Err("lookup failed")),
            after(5, Ok(3)),
        ])
        .await;
        assert_eq!(results, vec![Ok(1), Err("lookup failed"), Ok(3)]);
    }
}
