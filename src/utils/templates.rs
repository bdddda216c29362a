//! HTML e-mail templates.

use crate::config::RESET_TOKEN_TTL_MINUTES;

const PRODUCT_NAME: &str = "ShareMarket Manager Pro";

/// Escape text for interpolation into HTML.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Subject and body for newly provisioned credentials.
pub fn welcome_email(name: &str, username: &str, email: &str, password: &str) -> (String, String) {
    let subject = format!("Welcome to {} - Your Login Credentials", PRODUCT_NAME);
    let body = format!(
        r#"<h2>Welcome to {product}!</h2>
<p>Dear {name},</p>
<p>Your account has been successfully created. Here are your login credentials:</p>
<div style="background: #f4f4f4; padding: 15px; border-radius: 5px; margin: 20px 0;">
  <p><strong>Username:</strong> {username}</p>
  <p><strong>Email:</strong> {email}</p>
  <p><strong>Password:</strong> {password}</p>
</div>
<p>Please keep these credentials secure and change your password after your first login.</p>
<p>Best regards,<br>{product} Team</p>"#,
        product = PRODUCT_NAME,
        name = escape(name),
        username = escape(username),
        email = escape(email),
        password = escape(password),
    );
    (subject, body)
}

/// Subject and body for a password reset link.
pub fn password_reset_email(name: &str, reset_url: &str) -> (String, String) {
    let subject = format!("{} - Password Reset Request", PRODUCT_NAME);
    let body = format!(
        r#"<h2>Password Reset Request</h2>
<p>Dear {name},</p>
<p>You requested to reset your password. Click the link below to reset it:</p>
<p><a href="{url}">{url}</a></p>
<p>This link will expire in {minutes} minutes.</p>
<p>If you didn't request this, please ignore this email.</p>
<p>Best regards,<br>{product} Team</p>"#,
        name = escape(name),
        url = escape(reset_url),
        minutes = RESET_TOKEN_TTL_MINUTES,
        product = PRODUCT_NAME,
    );
    (subject, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_contains_credentials() {
        let (subject, body) = welcome_email("Asha Rao", "asharao1234", "a@x.io", "pw<>");
        assert!(subject.contains("Login Credentials"));
        assert!(body.contains("asharao1234"));
        assert!(body.contains("pw&lt;&gt;"));
    }

    #[test]
    fn test_reset_contains_link_and_expiry() {
        let (_, body) = password_reset_email("Asha", "http://localhost:5000/reset-password/abc");
        assert!(body.contains("href=\"http://localhost:5000/reset-password/abc\""));
        assert!(body.contains("60 minutes"));
    }
}
