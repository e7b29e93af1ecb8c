//! 批量写入辅助：分批与指数退避重试

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::errors::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    // 总尝试次数（含第一次）
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(50),
            max_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// 第 attempt 次失败后的等待时间：min(base * 2^(attempt-1), max)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// 按 size 切分，size 为 0 时按 1 处理
pub fn chunk_rows<T>(items: Vec<T>, size: usize) -> Vec<Vec<T>> {
    let size = size.max(1);
    let mut batches = Vec::with_capacity(items.len().div_ceil(size));
    let mut iter = items.into_iter().peekable();
    while iter.peek().is_some() {
        batches.push(iter.by_ref().take(size).collect());
    }
    batches
}

/// 执行 op，仅在瞬时错误时按策略重试
pub async fn retry_with_backoff<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < max_attempts => {
                let delay = policy.delay_for(attempt);
                warn!(
                    "Transient failure on attempt {}/{}: {}. Retrying in {:?}",
                    attempt, max_attempts, e, delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SchoolHubError;

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
        }
    }

    #[test]
    fn test_chunk_rows() {
        let batches = chunk_rows((1..=7).collect::<Vec<_>>(), 3);
        assert_eq!(batches, vec![vec![1, 2, 3], vec![4, 5, 6], vec![7]]);
        assert_eq!(chunk_rows(vec![1, 2], 0), vec![vec![1], vec![2]]);
        assert!(chunk_rows(Vec::<i32>::new(), 10).is_empty());
    }

    #[test]
    fn test_delay_is_exponential_and_capped() {
        let policy = RetryPolicy {
            max_attempts: 10,
            base_delay: Duration::from_millis(50),
            max_delay: Duration::from_millis(300),
        };
        assert_eq!(policy.delay_for(1), Duration::from_millis(50));
        assert_eq!(policy.delay_for(2), Duration::from_millis(100));
        assert_eq!(policy.delay_for(3), Duration::from_millis(200));
        assert_eq!(policy.delay_for(4), Duration::from_millis(300));
        assert_eq!(policy.delay_for(40), Duration::from_millis(300));
    }

    #[tokio::test]
    async fn test_retries_transient_errors() {
        let mut calls = 0;
        let result = retry_with_backoff(&fast_policy(3), || {
            calls += 1;
            let n = calls;
            async move {
                if n < 3 {
                    Err(SchoolHubError::database_connection("pool timed out"))
                } else {
                    Ok(n)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_permanent_errors_are_not_retried() {
        let mut calls = 0;
        let result: Result<()> = retry_with_backoff(&fast_policy(5), || {
            calls += 1;
            async { Err(SchoolHubError::database_operation("UNIQUE constraint failed")) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let mut calls = 0;
        let result: Result<()> = retry_with_backoff(&fast_policy(2), || {
            calls += 1;
            async { Err(SchoolHubError::database_connection("refused")) }
        })
        .await;
        assert!(result.unwrap_err().is_transient());
        assert_eq!(calls, 2);
    }
}
