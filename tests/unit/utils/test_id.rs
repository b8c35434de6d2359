use discord_rs::utils::id::{NONCE_LENGTH, nonce};

#[test]
fn test_nonce_length() {
    assert_eq!(nonce().len(), NONCE_LENGTH);
}

#[test]
fn test_nonce_fits_discord_limit() {
    for _ in 0..100 {
        let n = nonce();
        assert!(n.len() <= 25);
        assert!(n.bytes().all(|b| b.is_ascii_digit()));
    }
}
