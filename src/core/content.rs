//! HTML shown in the marker info window.

use crate::domain::model::Venue;
use quick_xml::escape::escape;

pub const NO_REVIEWS: &str = "No reviews available for this venue";

/// Id of the element the street view panorama is mounted into.
pub const STREET_VIEW_ELEMENT_ID: &str = "streetview";

pub fn info_window_html(venue: &Venue) -> String {
    let mut html = String::from(r#"<div class="info">"#);

    html.push_str(&format!(
        r#"<h4 class="info-title">{}</h4>"#,
        escape(venue.name.as_str())
    ));
    html.push_str(&format!(r#"<div id="{}"></div>"#, STREET_VIEW_ELEMENT_ID));
    html.push_str(&review_html(venue));

    if let Some(rating) = &venue.rating {
        let color = rating.color.as_deref().unwrap_or("000000");
        let votes = rating
            .signals
            .map(|n| format!(" with {} votes", n))
            .unwrap_or_default();
        html.push_str(&format!(
            r#"<div class="info-rating-container"><div class="info-rating"><span style="color: #{}">{}/10</span>{}</div></div>"#,
            escape(color),
            rating.score,
            votes
        ));
    }

    if let Some(details) = &venue.details {
        html.push_str(&format!(
            r#"<div class="info-phone">{}</div>"#,
            escape(details.phone.as_str())
        ));
        html.push_str(&format!(
            r#"<a class="info-website" target="_blank" href="{}">On the Web</a>"#,
            escape(details.website.as_str())
        ));
    } else if let Some(url) = &venue.url {
        html.push_str(&format!(
            r#"<a class="info-website" target="_blank" href="{}">On the Web</a>"#,
            escape(url.as_str())
        ));
    }

    if let Some(link) = venue.tip.as_ref().and_then(|t| t.canonical_url.as_ref()) {
        html.push_str(&format!(
            r#"<div class="info-see-more">See more on <a target="_blank" href="{}">Foursquare</a></div>"#,
            escape(link.as_str())
        ));
    }

    html.push_str("</div>");
    html
}

fn review_html(venue: &Venue) -> String {
    match &venue.tip {
        Some(tip) if !tip.text.is_empty() => {
            let author = tip.author.as_deref().unwrap_or("Anonymous");
            format!(
                r#"<div class="info-review"><em>"{}"</em> - {}</div>"#,
                escape(tip.text.as_str()),
                escape(author)
            )
        }
        _ => format!(r#"<div class="info-review">{}</div>"#, NO_REVIEWS),
    }
}
