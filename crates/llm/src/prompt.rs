//! 프롬프트 템플릿 — 리포트/수정 코드 생성용 프롬프트 렌더링
//!
//! 순수 함수입니다. I/O가 없고, 동일한 입력(내용과 순서가 같은 탐지 결과,
//! 동일한 소스 텍스트)에 대해 바이트 단위로 동일한 프롬프트를 생성합니다.
//! 유효한 입력에 대해 실패하지 않습니다 — 빈 탐지 목록도 유효한 입력이며
//! "이슈 없음"을 서술하는 프롬프트가 됩니다.

use std::fmt;

use codemend_core::types::ScanFinding;

/// 프롬프트 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// 취약점 리포트 생성 요청
    Report,
    /// 수정 코드 생성 요청
    Remediation,
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Report => write!(f, "report"),
            Self::Remediation => write!(f, "remediation"),
        }
    }
}

/// 렌더링된 프롬프트
///
/// 내용 외의 식별자를 갖지 않으며, 영속화되지 않습니다.
#[derive(Debug, Clone)]
pub struct Prompt {
    kind: PromptKind,
    text: String,
}

impl Prompt {
    /// 프롬프트 종류를 반환합니다.
    pub fn kind(&self) -> PromptKind {
        self.kind
    }

    /// 프롬프트 텍스트를 반환합니다.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// 리포트 생성 프롬프트를 렌더링합니다.
///
/// 다운스트림이 구조화 파싱을 시도할 수 있도록 고정 키 이름을 가진
/// JSON 출력 형태를 명시적으로 요구합니다.
pub fn build_report_prompt(findings: &[ScanFinding]) -> Prompt {
    let results_section = if findings.is_empty() {
        "No issues were found by the static analyzer.".to_owned()
    } else {
        // Vec 직렬화는 필드 순서가 고정되어 있어 동일 입력에 대해 결정적이다
        serde_json::to_string_pretty(findings)
            .unwrap_or_else(|_| "[]".to_owned())
    };

    let text = format!(
        r#"You are a security analyst. Summarize the static analysis results below as a report.

Respond with a single JSON object of exactly this form:
{{
  "file": "<file path>",
  "issues": [
    {{
      "id": "<issue id>",
      "description": "<issue description>",
      "line": <line number>,
      "severity": "<severity>",
      "confidence": "<confidence>",
      "recommendation": "<how to fix the issue>",
      "cwe": <cwe number or null>
    }}
  ]
}}
If there are no issues, "issues" must be an empty array.
Respond with JSON only, no surrounding commentary.

Static analysis results:
{results_section}
"#
    );

    Prompt {
        kind: PromptKind::Report,
        text,
    }
}

/// 수정 코드 생성 프롬프트를 렌더링합니다.
///
/// 반환 텍스트를 그대로 소스 파일로 저장할 수 있도록
/// 코드 외의 내용을 금지합니다.
pub fn build_remediation_prompt(source: &str) -> Prompt {
    let text = format!(
        r#"Fix the security vulnerabilities in the following source code.
Respond with only the corrected source code, complete and ready to save as a file.
Do not include commentary, explanations, markdown code fences, or any other delimiters.

{source}
"#
    );

    Prompt {
        kind: PromptKind::Remediation,
        text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codemend_core::types::{Confidence, Severity};

    fn sample_finding() -> ScanFinding {
        ScanFinding {
            id: "B307".to_owned(),
            description: "Use of possibly insecure function eval.".to_owned(),
            severity: Severity::Medium,
            confidence: Confidence::High,
            file: "b.py".to_owned(),
            line: 3,
            cwe: Some(78),
        }
    }

    #[test]
    fn report_prompt_is_deterministic() {
        let findings = vec![sample_finding(), sample_finding()];
        let first = build_report_prompt(&findings);
        let second = build_report_prompt(&findings);
        assert_eq!(first.text(), second.text());
    }

    #[test]
    fn report_prompt_contains_findings_and_fixed_keys() {
        let prompt = build_report_prompt(&[sample_finding()]);
        assert_eq!(prompt.kind(), PromptKind::Report);
        assert!(prompt.text().contains("B307"));
        // 다운스트림 파싱을 위한 고정 키 이름
        for key in [
            "\"file\"",
            "\"id\"",
            "\"description\"",
            "\"line\"",
            "\"severity\"",
            "\"confidence\"",
            "\"recommendation\"",
            "\"cwe\"",
        ] {
            assert!(prompt.text().contains(key), "missing key {key}");
        }
    }

    #[test]
    fn report_prompt_for_empty_findings_mentions_no_issues() {
        let prompt = build_report_prompt(&[]);
        assert!(prompt.text().contains("No issues were found"));
    }

    #[test]
    fn finding_order_changes_prompt_text() {
        let a = ScanFinding {
            id: "B101".to_owned(),
            ..sample_finding()
        };
        let b = ScanFinding {
            id: "B102".to_owned(),
            ..sample_finding()
        };
        let forward = build_report_prompt(&[a.clone(), b.clone()]);
        let backward = build_report_prompt(&[b, a]);
        assert_ne!(forward.text(), backward.text());
    }

    #[test]
    fn remediation_prompt_embeds_source_verbatim() {
        let source = "import os\n\npassword = \"hunter2\"\n";
        let prompt = build_remediation_prompt(source);
        assert_eq!(prompt.kind(), PromptKind::Remediation);
        assert!(prompt.text().contains(source));
    }

    #[test]
    fn remediation_prompt_forbids_commentary_and_fences() {
        let prompt = build_remediation_prompt("x = 1\n");
        let text = prompt.text();
        assert!(text.contains("only the corrected source code"));
        assert!(text.contains("code fences"));
    }

    #[test]
    fn remediation_prompt_is_deterministic() {
        let source = "def f():\n    return eval(input())\n";
        assert_eq!(
            build_remediation_prompt(source).text(),
            build_remediation_prompt(source).text()
        );
    }
}
