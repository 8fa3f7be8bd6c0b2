//! Event Log - 크기 제한이 있는 메모리 이벤트 로그
//!
//! 가장 오래된 항목부터 밀려나는 FIFO. 여러 요청 스레드에서 동시에 기록합니다.

use super::types::DisplayEvent;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::{Arc, OnceLock};
use tracing::trace;

/// 기본 최대 보관 개수
pub const MAX_EVENTS: usize = 1000;

/// 메모리 이벤트 로그
#[derive(Debug)]
pub struct EventLog {
    events: Mutex<VecDeque<DisplayEvent>>,
    capacity: usize,
}

impl EventLog {
    pub fn new() -> Self {
        Self::with_capacity(MAX_EVENTS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::with_capacity(capacity.min(MAX_EVENTS))),
            capacity: capacity.max(1),
        }
    }

    /// 이벤트 기록
    ///
    /// 용량이 가득 차면 가장 오래된(맨 앞) 항목을 먼저 제거합니다.
    pub fn publish(&self, event: DisplayEvent) {
        trace!(message = %event.message, "Publishing display event");

        let mut events = self.events.lock();
        if events.len() >= self.capacity {
            events.pop_front();
        }
        if event.add_as_first {
            events.push_front(event);
        } else {
            events.push_back(event);
        }
    }

    /// 메시지 기록 편의 함수
    pub fn message(&self, message: impl Into<String>) {
        self.publish(DisplayEvent::new(message));
    }

    /// 현재 이벤트 복사본 (로그는 그대로)
    pub fn poll(&self) -> Vec<DisplayEvent> {
        self.events.lock().iter().cloned().collect()
    }

    /// 이벤트를 꺼내고 로그를 비움
    pub fn consume(&self) -> Vec<DisplayEvent> {
        self.events.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// 전역 EventLog
// ============================================================================

static GLOBAL_EVENT_LOG: OnceLock<Arc<EventLog>> = OnceLock::new();

/// 전역 이벤트 로그 (처음 사용할 때 생성, `consume`/`clear`로만 비워짐)
pub fn global_event_log() -> Arc<EventLog> {
    GLOBAL_EVENT_LOG
        .get_or_init(|| Arc::new(EventLog::new()))
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_evicts_oldest() {
        let log = EventLog::with_capacity(3);
        for i in 0..5 {
            log.message(format!("event {}", i));
        }

        let events = log.poll();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].message, "event 2");
        assert_eq!(events[2].message, "event 4");
    }

    #[test]
    fn test_default_capacity() {
        let log = EventLog::new();
        for i in 0..(MAX_EVENTS + 10) {
            log.message(format!("event {}", i));
        }
        assert_eq!(log.len(), MAX_EVENTS);
        assert_eq!(log.poll()[0].message, "event 10");
    }

    #[test]
    fn test_add_as_first() {
        let log = EventLog::new();
        log.message("second");
        log.publish(DisplayEvent::strong("first").first());

        let events = log.poll();
        assert_eq!(events[0].message, "first");
        assert_eq!(events[1].message, "second");
    }

    #[test]
    fn test_consume_drains() {
        let log = EventLog::new();
        log.message("a");
        log.message("b");

        assert_eq!(log.consume().len(), 2);
        assert!(log.is_empty());
        assert!(log.consume().is_empty());
    }
}
