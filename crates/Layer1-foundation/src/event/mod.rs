//! Event System - 진행 메시지 로그
//!
//! 설치/설정/빈 생성 과정에서 발생하는 사람이 읽는 메시지를 모읍니다.
//!
//! ```ignore
//! use essentials_foundation::event::{global_event_log, DisplayEvent};
//!
//! let log = global_event_log();
//! log.publish(DisplayEvent::strong("Plugin installed").with_source("news"));
//!
//! for event in log.consume() {
//!     println!("{}", event.message);
//! }
//! ```

pub mod log;
pub mod types;

pub use log::{global_event_log, EventLog, MAX_EVENTS};
pub use types::{DisplayEvent, DisplayType, EventId};
