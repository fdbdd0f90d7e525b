//! Server-rendered pages for the browser flow.
//!
//! `/` links to the Spotify consent screen, Spotify redirects back to
//! `/user?code=...`, and the form there posts the code along with the search
//! options to `/concerts`.

use axum::{
    extract::{rejection::FormRejection, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};
use encore_core::{ConcertCalendar, PipelineRequest, MAX_TOP_ARTISTS, REGION_CODES};

use super::concerts::pipeline_error_status;
use crate::state::AppState;

/// Query parameters Spotify appends to the redirect URI.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Fields posted by the search form.
#[derive(Debug, Deserialize)]
pub struct ConcertForm {
    pub code: String,
    pub artist_count: u32,
    pub region: String,
}

/// GET /
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let body = format!(
        r#"<section class="hero">
    <h1>Encore</h1>
    <p>See when the artists you listen to most are playing near you.</p>
    <a class="button" href="{}">Log in with Spotify</a>
</section>"#,
        escape_html(state.authorize_url())
    );
    Html(layout("Encore", &body))
}

/// GET /user
///
/// The authorization code is carried to the next step in a hidden field.
pub async fn user_form(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Response {
    if let Some(error) = params.error {
        warn!("Spotify authorization denied: {}", error);
        return error_page(
            StatusCode::BAD_REQUEST,
            &format!("Spotify authorization was not granted ({}).", error),
        );
    }

    let code = match params.code {
        Some(code) if !code.trim().is_empty() => code,
        _ => {
            return error_page(
                StatusCode::BAD_REQUEST,
                "The Spotify redirect did not include an authorization code.",
            )
        }
    };

    let options: String = REGION_CODES
        .iter()
        .map(|region| format!(r#"<option value="{0}">{0}</option>"#, region))
        .collect::<Vec<_>>()
        .join("\n            ");

    let body = format!(
        r#"<section>
    <h1>Find concerts</h1>
    <form method="post" action="/concerts">
        <input type="hidden" name="code" value="{code}">
        <label for="artist_count">How many of your top artists?</label>
        <input type="number" id="artist_count" name="artist_count" min="1" max="{max}" value="{default}" required>
        <label for="region">State or province</label>
        <select id="region" name="region" required>
            {options}
        </select>
        <button type="submit">Search</button>
    </form>
    <p class="hint">Searching takes a moment: each artist is looked up one at a time.</p>
</section>"#,
        code = escape_html(&code),
        max = MAX_TOP_ARTISTS,
        default = state.pipeline().config().default_artist_limit,
        options = options,
    );

    Html(layout("Find concerts", &body)).into_response()
}

/// POST /concerts
pub async fn concerts(
    State(state): State<Arc<AppState>>,
    form: Result<Form<ConcertForm>, FormRejection>,
) -> Response {
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => {
            warn!("Rejected concert search form: {}", rejection.body_text());
            return error_page(
                StatusCode::BAD_REQUEST,
                "The search form was incomplete or malformed.",
            );
        }
    };

    info!(
        "Concert search: {} artist(s) in {}",
        form.artist_count, form.region
    );

    let request = PipelineRequest {
        authorization_code: form.code,
        artist_limit: form.artist_count,
        region: form.region,
    };

    match state.pipeline().run(request).await {
        Ok(calendar) => Html(layout("Your concerts", &render_calendar(&calendar))).into_response(),
        Err(e) => error_page(pipeline_error_status(&e), &e.to_string()),
    }
}

fn render_calendar(calendar: &ConcertCalendar) -> String {
    let mut html = String::from("<section>\n<h1>Your top artists</h1>\n<ul class=\"artists\">\n");
    for artist in &calendar.artists {
        let image = artist
            .image_url
            .as_deref()
            .map(|url| format!(r#"<img src="{}" alt="">"#, escape_html(url)))
            .unwrap_or_default();
        html.push_str(&format!(
            "<li>{}<a href=\"{}\">{}</a></li>\n",
            image,
            escape_html(&artist.profile_url),
            escape_html(&artist.name)
        ));
    }
    html.push_str("</ul>\n</section>\n");

    for bucket in &calendar.events_by_month {
        html.push_str(&format!(
            "<section class=\"month\">\n<h2>{}</h2>\n",
            escape_html(&bucket.label())
        ));
        if bucket.events.is_empty() {
            html.push_str("<p class=\"empty\">No shows this month.</p>\n");
        } else {
            html.push_str("<ul class=\"events\">\n");
            for event in &bucket.events {
                html.push_str(&format!(
                    "<li><time datetime=\"{}\">{}</time> <a href=\"{}\">{}</a> <span class=\"venue\">{}, {}</span></li>\n",
                    event.date,
                    event.date.format("%a %b %-d"),
                    escape_html(&event.event_url),
                    escape_html(&event.event_name),
                    escape_html(&event.venue),
                    escape_html(&event.city)
                ));
            }
            html.push_str("</ul>\n");
        }
        html.push_str("</section>\n");
    }

    if calendar.truncated_events > 0 {
        html.push_str(&format!(
            "<p class=\"hint\">{} later event(s) not shown.</p>\n",
            calendar.truncated_events
        ));
    }
    html.push_str("<p><a href=\"/\">Start over</a></p>\n");
    html
}

fn error_page(status: StatusCode, message: &str) -> Response {
    let body = format!(
        r#"<section class="error">
    <h1>Something went wrong</h1>
    <p>{}</p>
    <p><a href="/">Start over</a></p>
</section>"#,
        escape_html(message)
    );
    (status, Html(layout("Error", &body))).into_response()
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{}</title>
    <link rel="stylesheet" href="/styles.css">
</head>
<body>
<main>
{}
</main>
</body>
</html>
"#,
        escape_html(title),
        body
    )
}

/// Escape text for use in HTML content and double-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use encore_core::{testing::fixtures, MonthBucket};

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom & Jerry's"</b>"#),
            "&lt;b&gt;&quot;Tom &amp; Jerry&#39;s&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_render_calendar_lists_months_in_order() {
        let october = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        let mut first = MonthBucket::containing(october);
        first
            .events
            .push(fixtures::event("Sleater-Kinney", 2026, 10, 9));
        let second = first.next();

        let calendar = ConcertCalendar::new(vec![fixtures::artist("Sleater-Kinney")], vec![first, second]);
        let html = render_calendar(&calendar);

        let october_at = html.find("October 2026").unwrap();
        let november_at = html.find("November 2026").unwrap();
        assert!(october_at < november_at);
        assert!(html.contains("Fri Oct 9"));
        assert!(html.contains("No shows this month."));
    }

    #[test]
    fn test_render_calendar_reports_truncation() {
        let mut calendar = ConcertCalendar::new(vec![], vec![]);
        calendar.truncated_events = 3;
        assert!(render_calendar(&calendar).contains("3 later event(s) not shown."));
    }
}
