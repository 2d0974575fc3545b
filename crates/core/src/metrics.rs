//! 메트릭 상수 — 이름과 설명을 중앙에서 정의
//!
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()`, `metrics::gauge!()`,
//! `metrics::histogram!()` 매크로를 호출합니다.
//! 익스포터는 포함하지 않으며, 임베딩 환경이 recorder를 설치합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `codemend_`
//! - 모듈명: `scanner_`, `llm_`, `engine_`
//! - 접미어: `_total` (counter), `_seconds` (histogram/latency)

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 심각도 레이블 키 (info, low, medium, high, critical)
pub const LABEL_SEVERITY: &str = "severity";

/// LLM 백엔드 레이블 키 (groq, gemini)
pub const LABEL_PROVIDER: &str = "provider";

/// 파일 결과 레이블 키 (succeeded, scan_failed, llm_failed, write_failed, skipped)
pub const LABEL_OUTCOME: &str = "outcome";

// ─── Scanner 메트릭 ────────────────────────────────────────────────

/// Scanner: 탐색된 파일 수 (counter)
pub const SCANNER_FILES_DISCOVERED_TOTAL: &str = "codemend_scanner_files_discovered_total";

/// Scanner: 정적 분석 실행 수 (counter)
pub const SCANNER_ANALYSES_TOTAL: &str = "codemend_scanner_analyses_total";

/// Scanner: 정적 분석 실패 수 (counter)
pub const SCANNER_ANALYSIS_FAILURES_TOTAL: &str = "codemend_scanner_analysis_failures_total";

/// Scanner: 탐지된 이슈 수 (counter, label: severity)
pub const SCANNER_FINDINGS_TOTAL: &str = "codemend_scanner_findings_total";

/// Scanner: 정적 분석 소요 시간 (histogram, 초)
pub const SCANNER_ANALYSIS_DURATION_SECONDS: &str = "codemend_scanner_analysis_duration_seconds";

// ─── LLM 메트릭 ────────────────────────────────────────────────────

/// LLM: 요청 수 (counter, label: provider)
pub const LLM_REQUESTS_TOTAL: &str = "codemend_llm_requests_total";

/// LLM: 실패 수 (counter, label: provider)
pub const LLM_FAILURES_TOTAL: &str = "codemend_llm_failures_total";

/// LLM: 요청 소요 시간 (histogram, 초, label: provider)
pub const LLM_REQUEST_DURATION_SECONDS: &str = "codemend_llm_request_duration_seconds";

// ─── Engine 메트릭 ─────────────────────────────────────────────────

/// Engine: 처리 완료된 파일 수 (counter, label: outcome)
pub const ENGINE_FILES_PROCESSED_TOTAL: &str = "codemend_engine_files_processed_total";

/// Engine: 저장된 수정 코드 파일 수 (counter)
pub const ENGINE_REMEDIATIONS_WRITTEN_TOTAL: &str = "codemend_engine_remediations_written_total";

/// Engine: 실행 전체 소요 시간 (histogram, 초)
pub const ENGINE_RUN_DURATION_SECONDS: &str = "codemend_engine_run_duration_seconds";
