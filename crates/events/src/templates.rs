//! `tera` templates for every transactional e-mail.
//!
//! Each message has an `.html` and a `.txt` variant. HTML templates extend
//! a shared layout and are autoescaped; text templates are not.

use serde::Serialize;
use sweetbox_core::types::Paise;
use tera::{Context, Tera};

pub const CONTACT_ADMIN: &str = "contact_admin";
pub const CONTACT_ACK: &str = "contact_ack";
pub const NEWSLETTER_WELCOME: &str = "newsletter_welcome";
pub const NEWSLETTER_BROADCAST: &str = "newsletter_broadcast";
pub const DONATION_STATUS: &str = "donation_status";
pub const ORDER_CONFIRMED: &str = "order_confirmed";
pub const ORDER_STATUS: &str = "order_status";

const LAYOUT_HTML: &str = r#"<!DOCTYPE html>
<html>
<body style="font-family: Helvetica, Arial, sans-serif; color: #3b2a20; background: #fff8f0; padding: 24px;">
  <div style="max-width: 560px; margin: 0 auto; background: #ffffff; border-radius: 8px; padding: 24px;">
    <h2 style="color: #c0587e; margin-top: 0;">Sweetbox</h2>
    {% block content %}{% endblock content %}
    <hr style="border: none; border-top: 1px solid #f0e0d6; margin-top: 24px;">
    <p style="font-size: 12px; color: #8a7365;">{{ site_url }}</p>
    {% block footer %}{% endblock footer %}
  </div>
</body>
</html>
"#;

const TEMPLATES: &[(&str, &str)] = &[
    (
        "contact_admin.html",
        r#"{% extends "layout.html" %}{% block content %}
<p>New message from <strong>{{ name }}</strong> &lt;{{ email }}&gt;{% if phone %} ({{ phone }}){% endif %}.</p>
<p><strong>{{ subject }}</strong></p>
<div style="white-space: pre-line;">{{ message }}</div>
{% endblock content %}"#,
    ),
    (
        "contact_admin.txt",
        "New message from {{ name }} <{{ email }}>{% if phone %} ({{ phone }}){% endif %}.\n\nSubject: {{ subject }}\n\n{{ message }}\n",
    ),
    (
        "contact_ack.html",
        r#"{% extends "layout.html" %}{% block content %}
<p>Hi {{ name }},</p>
<p>Thanks for getting in touch about "{{ subject }}". We have received your message and will reply soon.</p>
{% endblock content %}"#,
    ),
    (
        "contact_ack.txt",
        "Hi {{ name }},\n\nThanks for getting in touch about \"{{ subject }}\". We have received your message and will reply soon.\n\n{{ site_url }}\n",
    ),
    (
        "newsletter_welcome.html",
        r#"{% extends "layout.html" %}{% block content %}
<p>Hi {{ name | default(value="there") }},</p>
<p>You are now subscribed to Sweetbox news: new bakes, offers and shop hours.</p>
{% endblock content %}{% block footer %}<p style="font-size: 12px;"><a href="{{ unsubscribe_url }}">Unsubscribe</a></p>{% endblock footer %}"#,
    ),
    (
        "newsletter_welcome.txt",
        "Hi {{ name | default(value=\"there\") }},\n\nYou are now subscribed to Sweetbox news: new bakes, offers and shop hours.\n\nUnsubscribe: {{ unsubscribe_url }}\n",
    ),
    (
        "newsletter_broadcast.html",
        r#"{% extends "layout.html" %}{% block content %}
<div style="white-space: pre-line;">{{ body }}</div>
{% endblock content %}{% block footer %}<p style="font-size: 12px;"><a href="{{ unsubscribe_url }}">Unsubscribe</a></p>{% endblock footer %}"#,
    ),
    (
        "newsletter_broadcast.txt",
        "{{ body }}\n\nUnsubscribe: {{ unsubscribe_url }}\n",
    ),
    (
        "donation_status.html",
        r#"{% extends "layout.html" %}{% block content %}
<p>Hi {{ donor_name }},</p>
<p>Your donation pledge{% if amount %} of {{ amount }}{% endif %} is now <strong>{{ status }}</strong>.</p>
{% if admin_note %}<p>Note from the team: {{ admin_note }}</p>{% endif %}
<p>Thank you for supporting us.</p>
{% endblock content %}"#,
    ),
    (
        "donation_status.txt",
        "Hi {{ donor_name }},\n\nYour donation pledge{% if amount %} of {{ amount }}{% endif %} is now {{ status }}.\n{% if admin_note %}\nNote from the team: {{ admin_note }}\n{% endif %}\nThank you for supporting us.\n",
    ),
    (
        "order_confirmed.html",
        r#"{% extends "layout.html" %}{% block content %}
<p>Hi {{ name }},</p>
<p>Your order <strong>{{ order_number }}</strong> is confirmed and will be delivered to {{ hostel }}, room {{ room }}.</p>
<table style="width: 100%; border-collapse: collapse;">
{% for item in items %}  <tr><td>{{ item.quantity }} x {{ item.product_name }}</td><td style="text-align: right;">{{ item.line_total }}</td></tr>
{% endfor %}  <tr><td>Delivery</td><td style="text-align: right;">{{ delivery_fee }}</td></tr>
  <tr><td><strong>Total</strong></td><td style="text-align: right;"><strong>{{ total }}</strong></td></tr>
</table>
<p><a href="{{ tracking_url }}">Track your order</a></p>
{% endblock content %}"#,
    ),
    (
        "order_confirmed.txt",
        "Hi {{ name }},\n\nYour order {{ order_number }} is confirmed and will be delivered to {{ hostel }}, room {{ room }}.\n\n{% for item in items %}{{ item.quantity }} x {{ item.product_name }}  {{ item.line_total }}\n{% endfor %}Delivery  {{ delivery_fee }}\nTotal  {{ total }}\n\nTrack your order: {{ tracking_url }}\n",
    ),
    (
        "order_status.html",
        r#"{% extends "layout.html" %}{% block content %}
<p>Hi {{ name }},</p>
<p>Your order <strong>{{ order_number }}</strong> is now <strong>{{ status_label }}</strong>.</p>
<p><a href="{{ tracking_url }}">Track your order</a></p>
{% endblock content %}"#,
    ),
    (
        "order_status.txt",
        "Hi {{ name }},\n\nYour order {{ order_number }} is now {{ status_label }}.\n\nTrack your order: {{ tracking_url }}\n",
    ),
];

/// A rendered message body pair.
#[derive(Debug, Clone)]
pub struct RenderedBody {
    pub text: String,
    pub html: String,
}

/// Compiled e-mail templates.
pub struct EmailTemplates {
    tera: Tera,
    site_url: String,
}

impl EmailTemplates {
    /// Compile all templates. `site_url` is injected into every context.
    pub fn new(site_url: impl Into<String>) -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        let mut all: Vec<(&str, &str)> = vec![("layout.html", LAYOUT_HTML)];
        all.extend_from_slice(TEMPLATES);
        tera.add_raw_templates(all)?;
        Ok(Self {
            tera,
            site_url: site_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    /// Render the `.txt` and `.html` variants of `name` with `data`.
    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<RenderedBody, tera::Error> {
        let mut context = Context::from_serialize(data)?;
        context.insert("site_url", &self.site_url);
        Ok(RenderedBody {
            text: self.tera.render(&format!("{name}.txt"), &context)?,
            html: self.tera.render(&format!("{name}.html"), &context)?,
        })
    }
}

/// Format paise as a rupee amount, e.g. `45000` -> `"₹450.00"`.
pub fn format_rupees(paise: Paise) -> String {
    let sign = if paise < 0 { "-" } else { "" };
    let abs = paise.unsigned_abs();
    format!("{sign}₹{}.{:02}", abs / 100, abs % 100)
}

/// Human label for an order status value.
pub fn order_status_label(status: &str) -> &str {
    match status {
        "pending" => "awaiting payment",
        "confirmed" => "confirmed",
        "preparing" => "being prepared",
        "out_for_delivery" => "out for delivery",
        "delivered" => "delivered",
        "cancelled" => "cancelled",
        other => other,
    }
}
