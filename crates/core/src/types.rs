//! 도메인 타입 — 시스템 전역에서 사용되는 공통 타입
//!
//! 스캐너, LLM 클라이언트, 엔진, CLI가 공유하는 데이터 구조를 정의합니다.
//! 한 번의 실행(run)은 파일별 `FileRunResult`를 모아 하나의 `RunReport`로
//! 집계됩니다.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 심각도 레벨
///
/// 정적 분석 결과의 심각도를 나타냅니다.
/// `Ord` 구현으로 심각도 비교가 가능합니다 (`Info < Low < Medium < High < Critical`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Severity {
    /// 정보성 이벤트 (분석 도구의 UNDEFINED 포함)
    #[default]
    Info,
    /// 낮은 심각도
    Low,
    /// 중간 심각도
    Medium,
    /// 높은 심각도
    High,
    /// 치명적 — 즉시 대응 필요
    Critical,
}

impl Severity {
    /// 문자열에서 심각도를 파싱합니다.
    ///
    /// 대소문자를 구분하지 않습니다. Bandit의 `UNDEFINED`는 `Info`로 매핑됩니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "info" | "informational" | "undefined" => Some(Self::Info),
            "low" => Some(Self::Low),
            "medium" | "med" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" | "crit" => Some(Self::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "Info"),
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
            Self::Critical => write!(f, "Critical"),
        }
    }
}

/// 분석 도구의 신뢰도(confidence)
///
/// 탐지 결과가 실제 취약점일 가능성에 대한 분석 도구 자체의 확신도입니다.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Confidence {
    /// 판단 불가
    #[default]
    Undefined,
    /// 낮음
    Low,
    /// 중간
    Medium,
    /// 높음
    High,
}

impl Confidence {
    /// 문자열에서 신뢰도를 파싱합니다. 대소문자를 구분하지 않습니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "undefined" => Some(Self::Undefined),
            "low" => Some(Self::Low),
            "medium" | "med" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => write!(f, "Undefined"),
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

/// 정적 분석 탐지 결과
///
/// 분석 도구가 보고한 이슈 하나를 나타냅니다.
/// 분석 도구가 출력한 순서가 그대로 유지됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanFinding {
    /// 이슈 식별자 (예: B307)
    pub id: String,
    /// 사람이 읽을 수 있는 설명
    pub description: String,
    /// 심각도
    pub severity: Severity,
    /// 분석 도구의 신뢰도
    pub confidence: Confidence,
    /// 대상 파일 경로
    pub file: String,
    /// 라인 번호
    pub line: u32,
    /// CWE 번호 (있을 경우)
    pub cwe: Option<u32>,
}

impl fmt::Display for ScanFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {}:{} {}",
            self.id, self.severity, self.file, self.line, self.description,
        )
    }
}

/// 파일별 처리 결과 플래그
///
/// 파일 하나의 파이프라인 처리가 어떤 상태로 끝났는지 나타냅니다.
/// JSON 리포트에는 snake_case 문자열로 직렬화됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileOutcome {
    /// 모든 단계 성공
    Succeeded,
    /// 정적 분석 실패 — 이후 단계 생략
    ScanFailed,
    /// LLM 호출 실패 (리포트 또는 수정 코드 생성 중)
    LlmFailed,
    /// 수정 코드 파일 쓰기 실패 (분석/LLM 단계는 성공)
    WriteFailed,
    /// 파일 읽기 불가 또는 크기 초과로 건너뜀
    Skipped,
}

impl FileOutcome {
    /// snake_case 문자열 표현을 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::ScanFailed => "scan_failed",
            Self::LlmFailed => "llm_failed",
            Self::WriteFailed => "write_failed",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for FileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 파일별 실행 결과
///
/// 발견된 파일 하나당 정확히 하나 생성되며, 처리 완료 후에는 변경되지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRunResult {
    /// 대상 파일 경로
    pub file: String,
    /// LLM이 생성한 리포트 (JSON으로 파싱되면 구조체, 아니면 문자열 값)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<serde_json::Value>,
    /// 수정 코드가 저장된 경로 (있을 경우)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediated_path: Option<String>,
    /// 처리 결과 플래그
    pub outcome: FileOutcome,
}

impl fmt::Display for FileRunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.file, self.outcome)
    }
}

/// 실행 단위 집계 리포트
///
/// 한 번의 실행에서 처리된 모든 파일의 결과를 순서대로 담습니다.
/// 실행 시작 시 빈 상태로 생성되고, 파일 처리가 끝날 때마다 추가되며,
/// 실행 종료 시 정확히 한 번 JSON 배열로 직렬화됩니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunReport {
    results: Vec<FileRunResult>,
}

impl RunReport {
    /// 빈 리포트를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 파일 결과를 추가합니다.
    pub fn push(&mut self, result: FileRunResult) {
        self.results.push(result);
    }

    /// 전체 파일 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// 결과가 하나도 없는지 반환합니다.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// 파일 결과 슬라이스를 반환합니다.
    pub fn results(&self) -> &[FileRunResult] {
        &self.results
    }

    /// 특정 결과 플래그를 가진 파일 수를 반환합니다.
    pub fn count(&self, outcome: FileOutcome) -> usize {
        self.results.iter().filter(|r| r.outcome == outcome).count()
    }
}
