//! Property-based tests for token kind separation
//!
//! Whatever the subject, a token only parses as the kind it was issued as.

use chrono::Duration;
use proptest::prelude::*;

use anonbox::backend::auth::sessions::{TokenCodec, TokenKind};

use crate::common::test_settings;

const KINDS: [TokenKind; 3] = [TokenKind::Verification, TokenKind::Access, TokenKind::Refresh];

fn codec() -> TokenCodec {
    TokenCodec::new(&test_settings(&[]).auth)
}

proptest! {
    #[test]
    fn test_tokens_parse_only_as_their_kind(
        subject in "[a-z0-9@._]{1,40}",
        issued in 0usize..3,
    ) {
        let tokens = codec();
        let kind = KINDS[issued];
        let user_id = (kind != TokenKind::Verification).then(uuid::Uuid::new_v4);

        let token = tokens.issue(kind, &subject, user_id, Duration::minutes(5)).unwrap();

        for expected in KINDS {
            let parsed = tokens.parse(&token, expected);
            if expected == kind {
                let claims = parsed.unwrap();
                prop_assert_eq!(claims.sub, subject.clone());
                prop_assert_eq!(claims.kind, kind);
                prop_assert_eq!(claims.user_id, user_id);
            } else {
                prop_assert!(parsed.is_err());
            }
        }
    }

    #[test]
    fn test_tampered_tokens_rejected(subject in "[a-z]{3,20}", flip in 0usize..1000) {
        let tokens = codec();
        let token = tokens
            .issue(TokenKind::Access, &subject, Some(uuid::Uuid::new_v4()), Duration::minutes(5))
            .unwrap();

        // Change one character of the signature segment, skipping the last
        // one whose low bits are padding
        let signature_start = token.rfind('.').unwrap() + 1;
        let index = signature_start + flip % (token.len() - 1 - signature_start);
        let mut bytes = token.into_bytes();
        bytes[index] = if bytes[index] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        prop_assert!(tokens.parse(&tampered, TokenKind::Access).is_err());
    }
}
