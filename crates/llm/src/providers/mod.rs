//! 백엔드 구현체 — 전송 방식별 Provider 구현
//!
//! - [`groq`]: 토큰 스트리밍 chat-completion 전송
//! - [`gemini`]: 단발 JSON 요청/응답 전송

pub mod gemini;
pub mod groq;

/// 에러 메시지에 담을 응답 본문 상한 (바이트)
const MAX_ERROR_BODY_BYTES: usize = 2048;

/// 에러 메시지용으로 응답 본문을 자릅니다.
pub(crate) fn short_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_BYTES {
        return body.to_owned();
    }
    let mut end = MAX_ERROR_BODY_BYTES;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated)", &body[..end])
}
