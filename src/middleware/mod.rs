/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth::access::guard (route 単位の権限チェック), cors / http / security_headers (Router 全体)
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
