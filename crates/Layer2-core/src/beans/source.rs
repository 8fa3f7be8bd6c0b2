//! Java Source - 생성된 빈 소스 텍스트 편집
//!
//! 소스를 파싱하지 않고 마커 애노테이션 기준으로만 편집합니다.
//! 마커가 없는 (직접 작성한) 메서드는 찾지도, 바꾸지도 않습니다.

use regex::Regex;
use std::sync::OnceLock;

use super::mapping::{GENERATED_IMPORT, NODE_IMPORT};

static PACKAGE_RE: OnceLock<Regex> = OnceLock::new();
static CLASS_RE: OnceLock<Regex> = OnceLock::new();
static EXTENDS_RE: OnceLock<Regex> = OnceLock::new();
static NODE_RE: OnceLock<Regex> = OnceLock::new();
static METHOD_RE: OnceLock<Regex> = OnceLock::new();
static CLASS_START_RE: OnceLock<Regex> = OnceLock::new();

fn cached(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static pattern"))
}

/// 소스에서 찾은 생성 메서드
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMethod {
    pub internal_name: String,
    pub method_name: String,
    /// 원소 타입
    pub return_type: String,
    pub multiple: bool,
}

/// `List<X>` / `X[]` / `X` → (X, multiple)
pub fn split_return_type(return_type: &str) -> (String, bool) {
    let trimmed = return_type.trim();
    if let Some(inner) = trimmed
        .strip_prefix("List<")
        .and_then(|rest| rest.strip_suffix('>'))
    {
        return (inner.trim().to_string(), true);
    }
    if let Some(inner) = trimmed.strip_suffix("[]") {
        return (inner.trim().to_string(), true);
    }
    (trimmed.to_string(), false)
}

/// Java 빈 소스
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaSource {
    text: String,
}

impl JavaSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// 새 빈 클래스 골격
    pub fn new_bean(
        package: &str,
        class_name: &str,
        content_type: &str,
        extends: &str,
        extends_import: Option<&str>,
    ) -> Self {
        let mut imports = vec![NODE_IMPORT.to_string(), GENERATED_IMPORT.to_string()];
        if let Some(import) = extends_import {
            imports.push(import.to_string());
        }
        imports.sort();
        imports.dedup();

        let mut text = format!("package {};\n\n", package);
        for import in &imports {
            text.push_str(&format!("import {};\n", import));
        }
        text.push_str(&format!(
            "\n@HippoEssentialsGenerated(internalName = \"{ct}\")\n@Node(jcrType = \"{ct}\")\npublic class {class} extends {extends} {{\n}}\n",
            ct = content_type,
            class = class_name,
            extends = extends,
        ));
        Self { text }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    // ========================================================================
    // 조회
    // ========================================================================

    pub fn package(&self) -> Option<String> {
        cached(&PACKAGE_RE, r"(?m)^\s*package\s+([\w.]+)\s*;")
            .captures(&self.text)
            .map(|c| c[1].to_string())
    }

    pub fn class_name(&self) -> Option<String> {
        cached(&CLASS_RE, r"public\s+(?:abstract\s+)?class\s+(\w+)")
            .captures(&self.text)
            .map(|c| c[1].to_string())
    }

    pub fn extends_class(&self) -> Option<String> {
        cached(&EXTENDS_RE, r"class\s+\w+\s+extends\s+([\w.]+)")
            .captures(&self.text)
            .map(|c| c[1].to_string())
    }

    /// `@Node(jcrType = "...")` 값
    pub fn node_jcr_type(&self) -> Option<String> {
        cached(&NODE_RE, r#"@Node\(\s*jcrType\s*=\s*"([^"]+)"\s*\)"#)
            .captures(&self.text)
            .map(|c| c[1].to_string())
    }

    /// 마커가 붙은 메서드 목록
    pub fn generated_methods(&self) -> Vec<SourceMethod> {
        cached(
            &METHOD_RE,
            r#"@HippoEssentialsGenerated\(\s*internalName\s*=\s*"([^"]+)"[^)]*\)\s*public\s+([\w.]+(?:<[\w.]+>)?(?:\[\])?)\s+(\w+)\s*\("#,
        )
        .captures_iter(&self.text)
        .map(|c| {
            let (return_type, multiple) = split_return_type(&c[2]);
            SourceMethod {
                internal_name: c[1].to_string(),
                method_name: c[3].to_string(),
                return_type,
                multiple,
            }
        })
        .collect()
    }

    /// 마커 여부와 관계없이 같은 이름의 메서드가 있는지
    pub fn has_method(&self, method_name: &str) -> bool {
        let pattern = format!(r"\b{}\s*\(\s*\)\s*\{{", regex::escape(method_name));
        Regex::new(&pattern)
            .map(|re| re.is_match(&self.text))
            .unwrap_or(false)
    }

    pub fn has_import(&self, import: &str) -> bool {
        self.text.contains(&format!("import {};", import))
    }

    // ========================================================================
    // 편집
    // ========================================================================

    /// import 추가 (이미 있으면 false)
    pub fn add_import(&mut self, import: &str) -> bool {
        if self.has_import(import) {
            return false;
        }
        let line = format!("import {};\n", import);

        let mut offset = 0;
        let mut insert_at = None;
        for l in self.text.split_inclusive('\n') {
            if l.starts_with("import ") {
                insert_at = Some(offset + l.len());
            } else if insert_at.is_none() && l.starts_with("package ") {
                self.text.insert_str(offset + l.len(), &format!("\n{}", line));
                return true;
            }
            offset += l.len();
        }

        match insert_at {
            Some(pos) => self.text.insert_str(pos, &line),
            None => self.text.insert_str(0, &line),
        }
        true
    }

    /// 클래스 마지막 `}` 앞에 메서드 추가
    pub fn add_method(&mut self, rendered: &str) {
        match self.text.rfind('}') {
            Some(pos) => self.text.insert_str(pos, &format!("\n{}", rendered)),
            None => self.text.push_str(rendered),
        }
    }

    /// 마커가 붙은 메서드 삭제 (찾지 못하면 false)
    pub fn remove_generated_method(&mut self, method_name: &str) -> bool {
        let pattern = format!(
            r"(?m)^[ \t]*@HippoEssentialsGenerated\([^)]*\)\s*public\s+[\w.<>\[\]]+\s+{}\s*\(",
            regex::escape(method_name)
        );
        let Ok(re) = Regex::new(&pattern) else {
            return false;
        };
        let Some(m) = re.find(&self.text) else {
            return false;
        };

        let Some(open) = self.text[m.end()..].find('{').map(|i| m.end() + i) else {
            return false;
        };
        let Some(close) = matching_brace(&self.text, open) else {
            return false;
        };

        let mut start = m.start();
        let mut end = close + 1;
        if self.text[end..].starts_with('\n') {
            end += 1;
        }
        if self.text[..start].ends_with("\n\n") {
            start -= 1;
        }
        self.text.replace_range(start..end, "");
        true
    }

    /// 클래스 javadoc에 메모 추가
    pub fn add_class_note(&mut self, note: &str) {
        let class_start = cached(
            &CLASS_START_RE,
            r"(?m)^(?:@|public\s+(?:abstract\s+)?class\s)",
        )
        .find(&self.text)
        .map(|m| m.start())
        .unwrap_or(0);

        let before = &self.text[..class_start];
        if let Some(end) = before.rfind("*/") {
            if before[end + 2..].trim().is_empty() {
                let line_start = before[..end].rfind('\n').map(|i| i + 1).unwrap_or(0);
                self.text.insert_str(line_start, &format!(" * {}\n", note));
                return;
            }
        }
        self.text
            .insert_str(class_start, &format!("/**\n * {}\n */\n", note));
    }
}

/// `open` 위치의 `{` 와 짝이 맞는 `}` 위치 (문자열 리터럴 내부 무시)
fn matching_brace(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text[open..].char_indices() {
        if in_string {
            match c {
                '\\' if !escaped => escaped = true,
                '"' if !escaped => in_string = false,
                _ => escaped = false,
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}
