// ABOUTME: Shared utility functions for the ASB workspace
// ABOUTME: Draft id generation

use rand::Rng;

const ID_CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const ID_LENGTH: usize = 12;

/// Generate a unique draft ID (`draft-` followed by 12 alphanumeric characters)
pub fn generate_draft_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..ID_CHARSET.len());
            ID_CHARSET[idx] as char
        })
        .collect();
    format!("draft-{}", suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_draft_id() {
        let id1 = generate_draft_id();
        let id2 = generate_draft_id();

        assert!(id1.starts_with("draft-"));
        assert_eq!(id1.len(), "draft-".len() + ID_LENGTH);
        assert_ne!(id1, id2);

        let suffix = id1.trim_start_matches("draft-");
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
