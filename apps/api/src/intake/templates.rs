//! Notification bodies for a submitted application.
//!
//! Everything here is pure: the same payload and timestamp always render the
//! same strings. Every applicant-supplied value goes through [`escape_html`]
//! before it is placed in markup, including `href` attribute values.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use chrono_tz::America::Los_Angeles;

use crate::models::application::{ApplicationPayload, Category, TrialCase};

pub const FIRM_NAME: &str = "Trembach Law Firm";

/// The three artifacts produced for one application.
#[derive(Debug, Clone)]
pub struct RenderedNotifications {
    pub firm_subject: String,
    pub firm_html: String,
    pub applicant_subject: String,
    pub applicant_html: String,
    pub sms_text: String,
}

pub fn render_all(payload: &ApplicationPayload, submitted_at: DateTime<Utc>) -> RenderedNotifications {
    RenderedNotifications {
        firm_subject: firm_subject(payload),
        firm_html: render_firm_email(payload, submitted_at),
        applicant_subject: applicant_subject(),
        applicant_html: render_applicant_email(payload, submitted_at),
        sms_text: render_sms(payload),
    }
}

pub fn firm_subject(payload: &ApplicationPayload) -> String {
    format!(
        "New Application: {} - {} ({})",
        payload.position,
        payload.full_name(),
        payload.office
    )
}

pub fn applicant_subject() -> String {
    format!("Application Received - {FIRM_NAME}")
}

/// Escapes the five HTML-significant characters.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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

/// e.g. `October 19, 2026 at 3:04 PM PDT`
pub fn format_pacific_timestamp(at: DateTime<Utc>) -> String {
    at.with_timezone(&Los_Angeles)
        .format("%B %-d, %Y at %-I:%M %p %Z")
        .to_string()
}

/// e.g. `October 19, 2026`
pub fn format_pacific_date(at: DateTime<Utc>) -> String {
    at.with_timezone(&Los_Angeles).format("%B %-d, %Y").to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Firm notification
// ────────────────────────────────────────────────────────────────────────────

const FIRM_STYLE: &str = "font-family: Arial, sans-serif; color: #1f2937; max-width: 720px; margin: 0 auto;";
const SECTION_STYLE: &str = "margin: 24px 0 8px; padding-bottom: 4px; border-bottom: 2px solid #1e3a5f; color: #1e3a5f;";
const LABEL_STYLE: &str = "padding: 6px 12px 6px 0; font-weight: bold; vertical-align: top; white-space: nowrap;";
const CELL_STYLE: &str = "padding: 6px 8px; border: 1px solid #d1d5db;";

pub fn render_firm_email(payload: &ApplicationPayload, submitted_at: DateTime<Utc>) -> String {
    let category = payload.category();
    let mut html = String::new();

    let _ = write!(
        html,
        "<div style=\"{FIRM_STYLE}\">\
         <h1 style=\"color: #1e3a5f;\">New Job Application</h1>\
         <p>A new application was submitted on {}.</p>",
        escape_html(&format_pacific_timestamp(submitted_at))
    );

    section(&mut html, "Position");
    let mut rows = vec![
        ("Category", Some(escape_html(category.label()))),
        ("Office", Some(escape_html(&payload.office))),
        ("Department", payload.department.as_deref().map(escape_html)),
        ("Position", Some(escape_html(&payload.position))),
    ];
    detail_table(&mut html, &rows);

    section(&mut html, "Applicant");
    let email = escape_html(&payload.email);
    let phone = escape_html(&payload.phone);
    rows = vec![
        ("Name", Some(escape_html(&payload.full_name()))),
        ("Email", Some(format!("<a href=\"mailto:{email}\">{email}</a>"))),
        ("Phone", Some(format!("<a href=\"tel:{phone}\">{phone}</a>"))),
        ("Address", payload.address.as_deref().map(escape_html)),
    ];
    detail_table(&mut html, &rows);

    if let Some(bar) = &payload.bar_admissions {
        section(&mut html, "Bar Admissions");
        paragraph(&mut html, bar);
    }

    if payload.law_school.is_some() || payload.grad_year.is_some() {
        section(&mut html, "Education");
        detail_table(
            &mut html,
            &[
                ("Law School", payload.law_school.as_deref().map(escape_html)),
                ("Graduation Year", payload.grad_year.as_deref().map(escape_html)),
            ],
        );
    }

    if payload.undergrad.is_some() {
        section(&mut html, "Undergraduate");
        detail_table(
            &mut html,
            &[
                ("Institution", payload.undergrad.as_deref().map(escape_html)),
                ("Degree", payload.undergrad_degree.as_deref().map(escape_html)),
                ("Year", payload.undergrad_year.as_deref().map(escape_html)),
            ],
        );
    }

    let focus: Vec<&str> = payload
        .areas_focus
        .iter()
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .collect();
    if payload.years_practice.is_some() || !focus.is_empty() || payload.federal_court_exp.is_some()
    {
        section(&mut html, "Experience");
        let focus_text = (!focus.is_empty()).then(|| escape_html(&focus.join(", ")));
        detail_table(
            &mut html,
            &[
                ("Years of Practice", payload.years_practice.as_deref().map(escape_html)),
                ("Areas of Focus", focus_text),
                (
                    "Federal Court Experience",
                    payload.federal_court_exp.as_deref().map(escape_html),
                ),
            ],
        );
    }

    if category == Category::Attorney {
        trial_cases_section(&mut html, &payload.trial_cases);
    }

    if let Some(history) = &payload.work_history {
        section(&mut html, "Work History");
        paragraph(&mut html, history);
    }

    if let Some(skills) = &payload.skills {
        section(&mut html, "Skills");
        paragraph(&mut html, skills);
    }

    section(&mut html, &format!("Why {FIRM_NAME}?"));
    paragraph(&mut html, &payload.why_trembach);

    if let Some(scenario) = &payload.challenging_scenario {
        section(&mut html, "Challenging Scenario");
        paragraph(&mut html, scenario);
    }

    if payload.salary.is_some() || payload.start_date.is_some() {
        section(&mut html, "Availability");
        detail_table(
            &mut html,
            &[
                ("Salary Expectations", payload.salary.as_deref().map(escape_html)),
                ("Available Start Date", payload.start_date.as_deref().map(escape_html)),
            ],
        );
    }

    let _ = write!(
        html,
        "<p style=\"margin-top: 32px; font-size: 12px; color: #6b7280;\">\
         Reply to this email to contact the applicant directly.</p></div>"
    );

    html
}

/// Rows require both a case name and a court; the header counts every named
/// case. The two filters differ, so the count can exceed the rendered rows.
fn trial_cases_section(html: &mut String, cases: &[TrialCase]) {
    let named = cases.iter().filter(|c| c.has_name()).count();
    let rows: Vec<&TrialCase> = cases.iter().filter(|c| c.is_renderable()).collect();
    if rows.is_empty() {
        return;
    }

    section(html, &format!("Trial Experience ({named} cases)"));
    let _ = write!(
        html,
        "<table style=\"border-collapse: collapse; width: 100%; font-size: 14px;\">\
         <thead><tr style=\"background: #1e3a5f; color: #ffffff;\">"
    );
    for heading in ["#", "Case", "Court", "Case No.", "Year", "Role", "Subject", "Outcome"] {
        let _ = write!(html, "<th style=\"{CELL_STYLE}\">{heading}</th>");
    }
    html.push_str("</tr></thead><tbody>");

    for (index, case) in rows.iter().enumerate() {
        let _ = write!(html, "<tr><td style=\"{CELL_STYLE}\">{}</td>", index + 1);
        for value in [
            &case.name,
            &case.court,
            &case.case_number,
            &case.year,
            &case.role,
            &case.subject,
            &case.outcome,
        ] {
            let _ = write!(html, "<td style=\"{CELL_STYLE}\">{}</td>", escape_html(value));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
}

fn section(html: &mut String, title: &str) {
    let _ = write!(html, "<h2 style=\"{SECTION_STYLE}\">{}</h2>", escape_html(title));
}

/// Free text keeps the applicant's line breaks.
fn paragraph(html: &mut String, text: &str) {
    let _ = write!(
        html,
        "<p style=\"white-space: pre-wrap; line-height: 1.5;\">{}</p>",
        escape_html(text)
    );
}

/// Rows with no value are skipped. Values must already be escaped.
fn detail_table(html: &mut String, rows: &[(&str, Option<String>)]) {
    html.push_str("<table style=\"border-collapse: collapse;\">");
    for (label, value) in rows {
        if let Some(value) = value {
            let _ = write!(
                html,
                "<tr><td style=\"{LABEL_STYLE}\">{label}:</td><td style=\"padding: 6px 0;\">{value}</td></tr>"
            );
        }
    }
    html.push_str("</table>");
}

// ────────────────────────────────────────────────────────────────────────────
// Applicant confirmation
// ────────────────────────────────────────────────────────────────────────────

pub fn render_applicant_email(payload: &ApplicationPayload, submitted_at: DateTime<Utc>) -> String {
    let first_name = escape_html(&payload.first_name);
    let position = escape_html(&payload.position);
    let office = escape_html(&payload.office);
    let date = escape_html(&format_pacific_date(submitted_at));

    format!(
        "<div style=\"{FIRM_STYLE}\">\
         <h1 style=\"color: #1e3a5f;\">Thank You for Applying</h1>\
         <p>Dear {first_name},</p>\
         <p>Thank you for your interest in joining {FIRM_NAME}. We have received your \
         application for the <strong>{position}</strong> position in our <strong>{office}</strong> \
         office, submitted on {date}.</p>\
         <p>Our hiring team reviews every application carefully. If your qualifications match \
         our needs, a member of our team will reach out to discuss next steps.</p>\
         <p>In the meantime, there is no need to resubmit your application.</p>\
         <p>Best regards,<br>The {FIRM_NAME} Hiring Team</p>\
         <p style=\"margin-top: 32px; font-size: 12px; color: #6b7280;\">\
         This is an automated confirmation. Please do not share sensitive information by \
         replying to this email.</p></div>"
    )
}

// ────────────────────────────────────────────────────────────────────────────
// SMS
// ────────────────────────────────────────────────────────────────────────────

/// Plain text, so nothing is escaped.
pub fn render_sms(payload: &ApplicationPayload) -> String {
    format!(
        "Hi {}, thank you for applying for the {} position at {FIRM_NAME}. \
         We have received your application and will be in touch soon.",
        payload.first_name, payload.position
    )
}
