//! Outbound network calls and third-party SDK usage

use super::dedup_ordered;

/// URLs passed to `fetch`/`axios` and labels of recognised SDKs.
///
/// Interpolated template segments are replaced with `{...}`.
pub fn detect_external_apis(content: &str) -> Vec<String> {
    let literal_url = regex!(
        r#"(?:fetch|axios\.(?:get|post|put|delete|patch))\s*\(\s*[`'"](https?://[^'"`\s]+)"#
    );
    let template_url = regex!(r"(?:fetch|axios)\s*\(\s*`([^`]*\$\{[^`]*)`");
    let interpolation = regex!(r"\$\{[^}]+\}");

    let mut found: Vec<String> = literal_url
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|url| !url.contains("${"))
        .map(str::to_string)
        .collect();

    found.extend(
        template_url
            .captures_iter(content)
            .filter_map(|caps| caps.get(1))
            .map(|m| interpolation.replace_all(m.as_str(), "{...}").into_owned()),
    );

    let sdks = [
        (regex!(r"(?i)stripe"), "Stripe API"),
        (regex!(r"(?i)firebase"), "Firebase"),
        (regex!(r"(?i)aws-sdk|@aws-sdk"), "AWS SDK"),
        (regex!(r"(?i)supabase"), "Supabase"),
        (regex!(r"(?i)prisma"), "Prisma ORM"),
        (regex!(r"(?i)mongoose|mongodb"), "MongoDB"),
        (regex!(r"(?i)\bpg\b|postgres"), "PostgreSQL"),
        (regex!(r"(?i)redis"), "Redis"),
        (regex!(r"(?i)sendgrid"), "SendGrid"),
        (regex!(r"(?i)twilio"), "Twilio"),
        (regex!(r"(?i)openai"), "OpenAI API"),
        (regex!(r"(?i)anthropic"), "Anthropic API"),
        (regex!(r"(?i)googleapis|@google-cloud"), "Google Cloud"),
    ];
    for (pattern, label) in sdks {
        if pattern.is_match(content) {
            found.push(label.to_string());
        }
    }

    dedup_ordered(found)
}
