//! 타입/속성 이름 → Java 이름 변환

use crate::content::local_name;

/// 비영숫자 구분자로 나눈 조각을 대문자로 시작하게 이어 붙임
fn camel_case(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// `acme:news-item` → `NewsItem`
///
/// 여러 이름이 쉼표로 이어진 경우 첫 번째만 사용합니다.
pub fn class_name(type_name: &str) -> String {
    let first = type_name.split(',').next().unwrap_or(type_name);
    camel_case(local_name(first.trim()))
}

/// `acme:title` → `getTitle`
pub fn method_name(property_name: &str) -> String {
    format!("get{}", camel_case(local_name(property_name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_name() {
        assert_eq!(class_name("acme:newsdocument"), "Newsdocument");
        assert_eq!(class_name("acme:news-item"), "NewsItem");
        assert_eq!(class_name("acme:event_page,acme:other"), "EventPage");
    }

    #[test]
    fn test_method_name() {
        assert_eq!(method_name("acme:title"), "getTitle");
        assert_eq!(method_name("acme:introduction.text"), "getIntroductionText");
    }
}
