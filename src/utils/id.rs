/// Length of the nonces attached to created messages
pub const NONCE_LENGTH: usize = 25;

/// Generates a nonce for message creation.
///
/// Discord echoes the nonce back in the `MESSAGE_CREATE` event, which lets the
/// sender match a gateway event to the REST call that produced it. Discord caps
/// nonces at 25 characters; digits keep it valid as an integer-like string too.
///
/// # Examples
/// ```
/// use discord_rs::utils::id::nonce;
/// let n = nonce();
/// assert_eq!(n.len(), 25);
/// ```
pub fn nonce() -> String {
    let alphabet: Vec<char> = "0123456789".chars().collect();
    nanoid::nanoid!(NONCE_LENGTH, &alphabet)
}
