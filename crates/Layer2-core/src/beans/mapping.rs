//! 속성/자식 노드 타입 → 접근자 매핑 및 메서드 렌더링

use serde::{Deserialize, Serialize};

/// 표준 빈 패키지
const STANDARD_PACKAGE: &str = "org.hippoecm.hst.content.beans.standard";

pub const HIPPO_DOCUMENT: &str = "HippoDocument";
pub const HIPPO_HTML: &str = "HippoHtml";
pub const HIPPO_BEAN: &str = "HippoBean";
pub const HIPPO_GALLERY_IMAGE_SET: &str = "HippoGalleryImageSet";
pub const HIPPO_GALLERY_IMAGE_SET_BEAN: &str = "HippoGalleryImageSetBean";
pub const HIPPO_GALLERY_IMAGE_BEAN: &str = "HippoGalleryImageBean";

pub const NODE_IMPORT: &str = "org.hippoecm.hst.content.beans.Node";
pub const GENERATED_IMPORT: &str =
    "org.onehippo.cms7.essentials.dashboard.annotations.HippoEssentialsGenerated";
const CALENDAR_IMPORT: &str = "java.util.Calendar";
const LIST_IMPORT: &str = "java.util.List";

/// 표준 빈 클래스의 import 경로
pub fn standard_import(class: &str) -> String {
    format!("{}.{}", STANDARD_PACKAGE, class)
}

/// 스칼라 속성 타입 → Java 타입
pub fn property_java_type(type_name: &str) -> Option<&'static str> {
    match type_name {
        "String" | "Html" | "Password" | "Docbase" | "Text" => Some("String"),
        "Date" => Some("Calendar"),
        "Boolean" => Some("Boolean"),
        "Long" => Some("Long"),
        "Double" => Some("Double"),
        _ => None,
    }
}

/// 이미지 링크가 반환할 이미지셋 클래스
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSetClass {
    pub class: String,
    pub import: String,
}

impl Default for ImageSetClass {
    fn default() -> Self {
        Self {
            class: HIPPO_GALLERY_IMAGE_SET.to_string(),
            import: standard_import(HIPPO_GALLERY_IMAGE_SET),
        }
    }
}

/// 알려진 자식 노드 타입 → 접근자
pub fn child_accessor(node_type: &str, image_set: &ImageSetClass) -> Option<(Accessor, Option<String>)> {
    match node_type {
        "hippostd:html" => Some((Accessor::Html, Some(standard_import(HIPPO_HTML)))),
        "hippogallerypicker:imagelink" => Some((
            Accessor::Linked {
                class: image_set.class.clone(),
            },
            Some(image_set.import.clone()),
        )),
        "hippo:mirror" => Some((
            Accessor::Linked {
                class: HIPPO_BEAN.to_string(),
            },
            Some(standard_import(HIPPO_BEAN)),
        )),
        "hippogallery:image" => Some((
            Accessor::Child {
                class: HIPPO_GALLERY_IMAGE_BEAN.to_string(),
            },
            Some(standard_import(HIPPO_GALLERY_IMAGE_BEAN)),
        )),
        _ => None,
    }
}

// ============================================================================
// Accessor / MethodSpec
// ============================================================================

/// 접근자 구현 방식
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Accessor {
    /// `getProperty(...)`
    Property { java_type: String },
    /// `getHippoHtml(...)`
    Html,
    /// `getLinkedBean(...)` (이미지 링크, mirror)
    Linked { class: String },
    /// `getBean(...)` (하위 compound, gallery image)
    Child { class: String },
}

impl Accessor {
    /// 원소 타입 (다중값이면 배열/List의 원소)
    pub fn element_type(&self) -> &str {
        match self {
            Self::Property { java_type } => java_type,
            Self::Html => HIPPO_HTML,
            Self::Linked { class } | Self::Child { class } => class,
        }
    }
}

/// 생성할 메서드 명세
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSpec {
    pub method_name: String,
    pub internal_name: String,
    pub accessor: Accessor,
    pub multiple: bool,

    /// 원소 타입 import (같은 패키지면 None)
    pub import: Option<String>,
}

impl MethodSpec {
    pub fn return_type(&self) -> String {
        let element = self.accessor.element_type();
        match (&self.accessor, self.multiple) {
            (_, false) => element.to_string(),
            (Accessor::Property { .. }, true) => format!("{}[]", element),
            (_, true) => format!("List<{}>", element),
        }
    }

    /// 메서드가 요구하는 import 목록
    pub fn imports(&self) -> Vec<String> {
        let mut imports = Vec::new();
        if self.accessor.element_type() == "Calendar" {
            imports.push(CALENDAR_IMPORT.to_string());
        }
        if self.multiple && !matches!(self.accessor, Accessor::Property { .. }) {
            imports.push(LIST_IMPORT.to_string());
        }
        if let Some(import) = &self.import {
            imports.push(import.clone());
        }
        imports
    }

    fn body(&self) -> String {
        let name = &self.internal_name;
        match (&self.accessor, self.multiple) {
            (Accessor::Property { .. }, _) => format!("getProperty(\"{}\")", name),
            (Accessor::Html, false) => format!("getHippoHtml(\"{}\")", name),
            (Accessor::Html, true) => {
                format!("getChildBeansByName(\"{}\", {}.class)", name, HIPPO_HTML)
            }
            (Accessor::Linked { class }, false) => {
                format!("getLinkedBean(\"{}\", {}.class)", name, class)
            }
            (Accessor::Linked { class }, true) => {
                format!("getLinkedBeans(\"{}\", {}.class)", name, class)
            }
            (Accessor::Child { class }, false) => format!("getBean(\"{}\", {}.class)", name, class),
            (Accessor::Child { class }, true) => {
                format!("getChildBeansByName(\"{}\", {}.class)", name, class)
            }
        }
    }

    /// 마커 애노테이션이 붙은 Java 메서드 소스
    pub fn render(&self) -> String {
        format!(
            "    @HippoEssentialsGenerated(internalName = \"{}\")\n    public {} {}() {{\n        return {};\n    }}\n",
            self.internal_name,
            self.return_type(),
            self.method_name,
            self.body()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_types() {
        assert_eq!(property_java_type("Html"), Some("String"));
        assert_eq!(property_java_type("Date"), Some("Calendar"));
        assert_eq!(property_java_type("Decimal"), None);
    }

    #[test]
    fn test_render_multiple_property() {
        let spec = MethodSpec {
            method_name: "getDates".to_string(),
            internal_name: "acme:dates".to_string(),
            accessor: Accessor::Property {
                java_type: "Calendar".to_string(),
            },
            multiple: true,
            import: None,
        };
        assert_eq!(spec.return_type(), "Calendar[]");
        assert_eq!(spec.imports(), vec!["java.util.Calendar".to_string()]);
        let source = spec.render();
        assert!(source.contains("@HippoEssentialsGenerated(internalName = \"acme:dates\")"));
        assert!(source.contains("public Calendar[] getDates() {"));
        assert!(source.contains("return getProperty(\"acme:dates\");"));
    }

    #[test]
    fn test_custom_image_set() {
        let image_set = ImageSetClass {
            class: "MyImageSet".to_string(),
            import: "org.example.beans.MyImageSet".to_string(),
        };
        let (accessor, import) = child_accessor("hippogallerypicker:imagelink", &image_set).unwrap();
        let spec = MethodSpec {
            method_name: "getImages".to_string(),
            internal_name: "acme:images".to_string(),
            accessor,
            multiple: true,
            import,
        };
        assert_eq!(spec.return_type(), "List<MyImageSet>");
        assert!(spec.render().contains("getLinkedBeans(\"acme:images\", MyImageSet.class)"));
        assert!(spec.imports().contains(&"java.util.List".to_string()));
        assert!(child_accessor("acme:unknown", &image_set).is_none());
    }
}
