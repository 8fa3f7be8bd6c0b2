//! Instruction Context - 실행 컨텍스트
//!
//! 작업 단위 하나에 대응하는 저장소 세션과 placeholder 값을 보관합니다.

use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use crate::beans::BeanSynthesizer;
use crate::repository::RepositorySession;

static PLACEHOLDER_RE: OnceLock<Regex> = OnceLock::new();

pub const PLACEHOLDER_NAMESPACE: &str = "namespace";
pub const PLACEHOLDER_PLUGIN_ID: &str = "pluginId";
pub const PLACEHOLDER_CURRENT_DATE: &str = "currentDate";
pub const PLACEHOLDER_CURRENT_YEAR: &str = "currentYear";

/// Instruction 실행 컨텍스트
pub struct InstructionContext {
    plugin_id: String,
    namespace: String,
    session: RepositorySession,
    placeholders: BTreeMap<String, String>,
    synthesizer: Option<Arc<BeanSynthesizer>>,
}

impl InstructionContext {
    pub fn new(
        plugin_id: impl Into<String>,
        namespace: impl Into<String>,
        session: RepositorySession,
    ) -> Self {
        let plugin_id = plugin_id.into();
        let namespace = namespace.into();
        let now = chrono::Local::now();

        let mut placeholders = BTreeMap::new();
        placeholders.insert(PLACEHOLDER_NAMESPACE.to_string(), namespace.clone());
        placeholders.insert(PLACEHOLDER_PLUGIN_ID.to_string(), plugin_id.clone());
        placeholders.insert(
            PLACEHOLDER_CURRENT_DATE.to_string(),
            now.format("%Y-%m-%d").to_string(),
        );
        placeholders.insert(PLACEHOLDER_CURRENT_YEAR.to_string(), now.format("%Y").to_string());

        Self {
            plugin_id,
            namespace,
            session,
            placeholders,
            synthesizer: None,
        }
    }

    pub fn with_synthesizer(mut self, synthesizer: Arc<BeanSynthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    /// placeholder 일괄 추가 (기존 값 덮어씀)
    pub fn with_placeholders<I, K, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in values {
            self.placeholders.insert(key.into(), value.into());
        }
        self
    }

    pub fn add_placeholder(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.placeholders.insert(key.into(), value.into());
    }

    pub fn placeholder(&self, key: &str) -> Option<&str> {
        self.placeholders.get(key).map(String::as_str)
    }

    pub fn placeholders(&self) -> &BTreeMap<String, String> {
        &self.placeholders
    }

    /// `{{key}}` 치환 (모르는 key는 그대로 둠)
    pub fn interpolate(&self, text: &str) -> String {
        if !text.contains("{{") {
            return text.to_string();
        }
        let re = PLACEHOLDER_RE.get_or_init(|| {
            Regex::new(r"\{\{\s*([\w.\-]+)\s*\}\}").expect("static pattern")
        });
        re.replace_all(text, |caps: &Captures| {
            self.placeholders
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
    }

    pub fn plugin_id(&self) -> &str {
        &self.plugin_id
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn synthesizer(&self) -> Option<&Arc<BeanSynthesizer>> {
        self.synthesizer.as_ref()
    }

    pub fn session(&self) -> &RepositorySession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut RepositorySession {
        &mut self.session
    }

    /// 세션 반환 (commit 용)
    pub fn into_session(self) -> RepositorySession {
        self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::ContentRepository;

    #[test]
    fn test_interpolate() {
        let repo = ContentRepository::in_memory();
        let ctx = InstructionContext::new("news", "acme", repo.session())
            .with_placeholders([("templateName", "jsp")]);

        assert_eq!(
            ctx.interpolate("/content/{{namespace}}/{{ templateName }}/{{unknown}}"),
            "/content/acme/jsp/{{unknown}}"
        );
        assert_eq!(ctx.interpolate("plain"), "plain");
        assert_eq!(ctx.placeholder(PLACEHOLDER_PLUGIN_ID), Some("news"));
    }
}
