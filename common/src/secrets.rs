/// Mask a secret for log output, keeping `keep` chars at both ends.
///
/// Short values keep only their first and last char.
pub fn mask_secret(s: &str, keep: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.is_empty() {
        return "(unset)".into();
    }

    let n = chars.len();
    if n > keep * 2 {
        let head: String = chars[..keep].iter().collect();
        let tail: String = chars[n - keep..].iter().collect();
        format!("{head}…{tail}")
    } else {
        format!("{}…{}", chars[0], chars[n - 1])
    }
}
