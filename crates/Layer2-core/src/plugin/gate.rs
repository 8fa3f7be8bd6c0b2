//! Exclusive Gate - 전역 직렬화 지점
//!
//! 경합 시 경고를 남기고 기다립니다 (건너뛰지 않음).

use tokio::sync::{Mutex, MutexGuard};
use tracing::warn;

pub struct ExclusiveGate {
    name: &'static str,
    contention_message: &'static str,
    lock: Mutex<()>,
}

impl ExclusiveGate {
    pub fn new(name: &'static str, contention_message: &'static str) -> Self {
        Self {
            name,
            contention_message,
            lock: Mutex::new(()),
        }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    /// 게이트 진입 (guard drop 시 해제)
    pub async fn enter(&self) -> MutexGuard<'_, ()> {
        match self.lock.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                warn!(gate = self.name, "{}", self.contention_message);
                self.lock.lock().await
            }
        }
    }

    pub fn is_held(&self) -> bool {
        self.lock.try_lock().is_err()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_second_caller_waits() {
        let gate = Arc::new(ExclusiveGate::new("test", "contended"));
        let guard = gate.enter().await;
        assert!(gate.is_held());

        let waiter = {
            let gate = Arc::clone(&gate);
            tokio::spawn(async move {
                let _guard = gate.enter().await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        waiter.await.unwrap();
        assert!(!gate.is_held());
    }
}
