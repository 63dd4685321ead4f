//! Server-rendered pages.
//!
//! Simple `format!`-based templates; every user-supplied value goes through
//! `html_escape` before landing in markup.

use giveaway_store::Registrant;

/// Base HTML layout wrapper.
pub fn layout(title: &str, content: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
        body {{ font-family: 'Arial', sans-serif; background: #1a1a1d; color: #c5c6c7; margin: 0; padding: 20px; }}
        .container {{ background: #4e4e50; border-radius: 8px; padding: 2rem; width: 90%; max-width: 480px; margin: 1rem auto; }}
        .wide {{ max-width: 1000px; }}
        input, button {{ width: 100%; padding: 0.8rem; margin: 0.5rem 0; border-radius: 5px; border: none; box-sizing: border-box; }}
        button {{ background: #66fcf1; color: #1a1a1d; font-weight: bold; cursor: pointer; }}
        table {{ width: 100%; margin-top: 1rem; border-collapse: collapse; }}
        th, td {{ padding: 12px; text-align: left; border-bottom: 1px solid #666; }}
        td form, td button {{ margin: 0; width: auto; }}
        .danger {{ background: #ff4444; color: white; }}
        .actions {{ margin-top: 1rem; display: flex; gap: 0.5rem; }}
        .actions form {{ flex: 1; }}
        .flash {{ padding: 10px; margin: 10px 0; border-radius: 5px; }}
        .flash-success {{ background: #4CAF50; color: white; }}
        .flash-danger {{ background: #f44336; color: white; }}
        .flash-warning {{ background: #ff9800; color: white; }}
        .flash-info {{ background: #2196F3; color: white; }}
    </style>
</head>
<body>
{content}
</body>
</html>"##
    )
}

/// Render the flash banners for the given query-param codes. Unknown codes
/// render nothing, so nothing reflected ends up in the page.
pub fn flash_html(error: Option<&str>, notice: Option<&str>) -> String {
    let mut out = String::new();
    for code in [error, notice].into_iter().flatten() {
        if let Some((class, text)) = flash_message(code) {
            out.push_str(&format!(
                r#"<div class="flash flash-{class}">{text}</div>"#
            ));
        }
    }
    out
}

fn flash_message(code: &str) -> Option<(&'static str, &'static str)> {
    Some(match code {
        "required" => ("danger", "All fields are required!"),
        "phone" => ("danger", "Phone number must be 11-12 digits!"),
        "csrf" => ("danger", "Security token invalid. Please try again."),
        "retry" => ("danger", "Something went wrong. Please try again."),
        "invalid" => ("danger", "Invalid password!"),
        "login_required" => ("warning", "Please login first!"),
        "not_found" => ("danger", "Registrant not found!"),
        "deleted" => ("success", "Registrant deleted successfully!"),
        "cleared" => ("success", "Database cleared successfully!"),
        _ => return None,
    })
}

/// The public registration form.
pub fn home_page(csrf_token: &str, flash: &str) -> String {
    let content = format!(
        r##"    <div class="container">
        <h1>Join the Giveaway</h1>
        {flash}
        <form method="POST" action="/">
            <input type="hidden" name="csrf_token" value="{csrf}">
            <input type="text" name="name" placeholder="Your Name" required>
            <input type="email" name="email" placeholder="your@email.com" required>
            <input type="tel" name="phone" placeholder="11-12 Digit Number" pattern="[0-9]{{11,12}}" title="11 or 12 digit number" required>
            <button type="submit">Get Your Link</button>
        </form>
    </div>"##,
        csrf = html_escape(csrf_token),
    );
    layout("Join Giveaway", &content)
}

/// The page showing a registrant their shareable link, both after a fresh
/// registration and when an existing identity re-submits.
pub fn link_page(link: &str, already_registered: bool) -> String {
    let banner = if already_registered {
        r#"<div class="flash flash-info">You already have a shareable link!</div>"#
    } else {
        ""
    };
    let content = format!(
        r##"    <div class="container">
        <h1>Thank You!</h1>
        {banner}
        <p>Your shareable link:</p>
        <input type="text" id="shareLink" value="{link}" readonly onclick="this.select()">
        <button onclick="navigator.clipboard.writeText(document.getElementById('shareLink').value)">Copy</button>
    </div>"##,
        link = html_escape(link),
    );
    layout("Your Link", &content)
}

/// The admin login form.
pub fn admin_login_page(csrf_token: &str, flash: &str) -> String {
    let content = format!(
        r##"    <div class="container">
        <h1>Admin Login</h1>
        {flash}
        <form method="POST" action="/admin">
            <input type="hidden" name="csrf_token" value="{csrf}">
            <input type="password" name="password" placeholder="Enter password" required>
            <button type="submit">Login</button>
        </form>
    </div>"##,
        csrf = html_escape(csrf_token),
    );
    layout("Admin Login", &content)
}

/// The admin dashboard: every registrant plus the bulk actions.
pub fn dashboard_page(registrants: &[Registrant], csrf_token: &str, flash: &str) -> String {
    let csrf = html_escape(csrf_token);
    let rows: String = registrants
        .iter()
        .map(|registrant| {
            format!(
                r##"                <tr>
                    <td>{id}</td>
                    <td>{name}</td>
                    <td>{email}</td>
                    <td>{phone}</td>
                    <td>{views}</td>
                    <td>{credits}</td>
                    <td>
                        <form method="POST" action="/delete_user/{id}">
                            <input type="hidden" name="csrf_token" value="{csrf}">
                            <button type="submit" class="danger">Delete</button>
                        </form>
                    </td>
                </tr>
"##,
                id = registrant.id,
                name = html_escape(&registrant.name),
                email = html_escape(&registrant.email),
                phone = html_escape(&registrant.phone),
                views = registrant.views,
                credits = registrant.referral_credits,
            )
        })
        .collect();

    let content = format!(
        r##"    <div class="container wide">
        <h1>Admin Dashboard</h1>
        {flash}
        <table>
            <thead>
                <tr><th>ID</th><th>Name</th><th>Email</th><th>Phone</th><th>Views</th><th>Referrals</th><th>Actions</th></tr>
            </thead>
            <tbody>
{rows}            </tbody>
        </table>
        <div class="actions">
            <form method="POST" action="/clear_database">
                <input type="hidden" name="csrf_token" value="{csrf}">
                <button type="submit" class="danger">Clear Database</button>
            </form>
            <form method="POST" action="/logout">
                <input type="hidden" name="csrf_token" value="{csrf}">
                <button type="submit">Logout</button>
            </form>
        </div>
    </div>"##
    );
    layout("Admin Dashboard", &content)
}

/// Simple HTML escape function
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<b>"A&B"</b>"#),
            "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_unknown_flash_code_renders_nothing() {
        assert_eq!(flash_html(Some("<script>"), None), "");
        assert_eq!(flash_html(None, Some("bogus")), "");
    }

    #[test]
    fn test_known_flash_codes() {
        let html = flash_html(Some("invalid"), None);
        assert!(html.contains("flash-danger"));
        assert!(html.contains("Invalid password!"));

        let html = flash_html(None, Some("cleared"));
        assert!(html.contains("flash-success"));
    }

    #[test]
    fn test_link_page_escapes_link() {
        let page = link_page("http://x/\"><script>", false);
        assert!(!page.contains("\"><script>"));
    }

    #[test]
    fn test_dashboard_rows() {
        let registrants = vec![Registrant {
            id: 7,
            name: "Ada <Lovelace>".to_string(),
            email: "ada@example.com".to_string(),
            phone: "01234567890".to_string(),
            link: "http://x/abc".to_string(),
            views: 3,
            referral_credits: 1,
        }];
        let page = dashboard_page(&registrants, "tok", "");
        assert!(page.contains("/delete_user/7"));
        assert!(page.contains("Ada &lt;Lovelace&gt;"));
        assert!(!page.contains("<Lovelace>"));
    }
}
