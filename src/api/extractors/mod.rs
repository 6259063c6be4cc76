/*!
 * Handler から見える「検証済みトークン」の extractor
 *
 * Public API:
 * - VerifiedClaims
 */
mod verified_claims;

pub use verified_claims::VerifiedClaims;
