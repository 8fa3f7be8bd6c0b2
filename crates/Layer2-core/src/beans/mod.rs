//! Content Beans - 콘텐츠 타입 기반 Java 빈 생성
//!
//! - `synthesizer`: 누락된 빈/접근자 생성, 이미지 접근자 변환, 기존 소스 등록
//! - `registry`: 생성된 빈 메타데이터 (beans.json)
//! - `source`: 마커 애노테이션 기반 소스 편집
//! - `mapping`: 타입 → 접근자 매핑
//! - `naming`: 클래스/메서드 이름 규칙

pub mod mapping;
pub mod naming;
pub mod registry;
pub mod source;
pub mod synthesizer;

pub use mapping::{Accessor, ImageSetClass, MethodSpec};
pub use registry::{BeanRecord, BeanRegistry, GeneratedMethod, REGISTRY_FILE};
pub use source::{JavaSource, SourceMethod};
pub use synthesizer::{
    BeanChange, BeanFailure, BeanSynthesizer, ChangeKind, SynthesisReport, SynthesizerSettings,
    UnmappedProperty, UnresolvedType,
};
