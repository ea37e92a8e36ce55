//! HTML rendering for the records page.
//!
//! Pages are built as plain strings. Everything that came from a user goes
//! through [`escape_html`] before it is written out.

use std::fmt::Write;

use health_monitor_domain::entities::VitalReading;

const PAGE_TITLE: &str = "Health Monitoring System";

const STYLESHEET: &str = "\
body { font-family: Arial, sans-serif; background: #f4f6f9; margin: 0; padding: 24px; }
h1 { color: #23384d; text-align: center; }
.container { max-width: 820px; margin: 0 auto; }
.panel { background: #fff; padding: 24px; border-radius: 8px; margin-bottom: 20px; box-shadow: 0 1px 6px rgba(0,0,0,0.12); }
input { width: 100%; padding: 9px; margin: 6px 0; border: 1px solid #ccd; border-radius: 4px; box-sizing: border-box; }
button { width: 100%; padding: 11px; border: none; border-radius: 4px; background: #2f80c9; color: #fff; font-size: 15px; cursor: pointer; }
table { width: 100%; border-collapse: collapse; background: #fff; }
th { background: #2f80c9; color: #fff; padding: 10px; text-align: left; }
td { padding: 9px 10px; border-bottom: 1px solid #e6e8eb; }
.normal { color: green; font-weight: bold; }
.warning { color: orange; font-weight: bold; }
.critical { color: red; font-weight: bold; }
.error { color: #b00020; }
";

/// Escape text for use in HTML element content and quoted attributes
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Format a temperature so whole numbers keep one decimal place
pub fn format_temperature(temperature: f64) -> String {
    if temperature.is_finite() && temperature.fract() == 0.0 {
        format!("{:.1}", temperature)
    } else {
        temperature.to_string()
    }
}

/// Render the full records page: the submission form and one row per reading
pub fn render_page(readings: &[VitalReading]) -> String {
    let mut body = String::new();
    body.push_str(FORM);
    body.push_str("<h3>Patient Records</h3>\n<table>\n");
    body.push_str(
        "<tr><th>Patient</th><th>Heart Rate</th><th>Blood Pressure</th>\
         <th>Temperature</th><th>Status</th><th>Time</th></tr>\n",
    );

    for reading in readings {
        body.push_str(&render_row(reading));
    }

    body.push_str("</table>\n");
    layout(&body)
}

/// Render a page that reports a failed request
pub fn render_error_page(heading: &str, message: &str) -> String {
    let mut body = String::new();
    let _ = write!(
        body,
        "<div class=\"panel\">\n<h3 class=\"error\">{}</h3>\n<p>{}</p>\n<p><a href=\"/\">Back to records</a></p>\n</div>\n",
        escape_html(heading),
        escape_html(message),
    );
    layout(&body)
}

fn render_row(reading: &VitalReading) -> String {
    let time = reading
        .timestamp
        .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    let status = reading.status.as_str();

    format!(
        "<tr><td>{}</td><td>{} bpm</td><td>{}</td><td>{} F</td><td class=\"{}\">{}</td><td>{}</td></tr>\n",
        escape_html(&reading.patient_name),
        reading.heart_rate,
        escape_html(&reading.blood_pressure),
        format_temperature(reading.temperature),
        status,
        status.to_uppercase(),
        time,
    )
}

fn layout(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>\n{style}</style>\n</head>\n<body>\n<div class=\"container\">\n<h1>{title}</h1>\n{body}</div>\n</body>\n</html>\n",
        title = PAGE_TITLE,
        style = STYLESHEET,
        body = body,
    )
}

const FORM: &str = "\
<div class=\"panel\">
<h3>Submit Patient Vitals</h3>
<form method=\"POST\" action=\"/submit\">
<input type=\"text\" name=\"patient_name\" placeholder=\"Patient Name\" required/>
<input type=\"number\" name=\"heart_rate\" placeholder=\"Heart Rate (bpm)\" required/>
<input type=\"text\" name=\"blood_pressure\" placeholder=\"Blood Pressure (e.g. 120/80)\" required/>
<input type=\"number\" step=\"0.1\" name=\"temperature\" placeholder=\"Temperature (F)\" required/>
<button type=\"submit\">Submit Vitals</button>
</form>
</div>
";
