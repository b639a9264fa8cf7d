//! crates/shift_watch_core/src/availability.rs
//!
//! Walks the portal's weekly shift grid and pulls out the bookable shifts that
//! fall inside a preference's time window.
//!
//! The portal's markup is not under our control, so every lookup here yields an
//! `Option` and a missing piece only ever skips the fragment it belongs to.

use crate::catalog::shift_type_id;
use crate::domain::{ParsedShiftEntry, Preference};
use crate::ports::PortalSession;
use crate::time_window;
use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::{debug, instrument, warn};
use url::Url;

/// How many weeks are scanned, starting with the current one.
pub const WEEKS_AHEAD: u32 = 2;

/// Text the portal puts in a day column that has nothing bookable.
pub const NO_SHIFTS_MARKER: &str = "-- No shifts --";

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

static GRID: LazyLock<Selector> = LazyLock::new(|| selector("div.grid-container"));
static DAY_COLUMN: LazyLock<Selector> = LazyLock::new(|| selector("div.col"));
static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| selector("p"));
static BOLD: LazyLock<Selector> = LazyLock::new(|| selector("b"));
static CENTERED: LazyLock<Selector> = LazyLock::new(|| selector(r#"p[align="center"]"#));
static SHIFT_LINK: LazyLock<Selector> = LazyLock::new(|| selector("a.shift"));

//=========================================================================================
// Scanner
//=========================================================================================

/// Builds listing URLs for one portal and scans them through a session.
#[derive(Debug, Clone)]
pub struct ShiftScanner {
    origin: Url,
}

impl ShiftScanner {
    /// `origin` is the portal root, e.g. `https://members.foodcoop.com`.
    pub fn new(origin: Url) -> Self {
        Self { origin }
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// `{origin}/services/shifts/{week}/{shift id}/0/{YYYY-MM-DD}`
    pub fn listing_url(&self, week_offset: u32, shift_id: u32, reference_date: NaiveDate) -> String {
        format!(
            "{}/services/shifts/{}/{}/0/{}",
            self.origin.as_str().trim_end_matches('/'),
            week_offset,
            shift_id,
            reference_date.format("%Y-%m-%d"),
        )
    }

    /// Collects the matching shifts for one preference across the scanned weeks.
    ///
    /// Never fails: a week that cannot be fetched is logged and skipped so the
    /// other week still gets looked at.
    #[instrument(skip(self, session, preference), fields(preference_id = preference.id, shift_type = %preference.shift_type))]
    pub async fn scan(
        &self,
        session: &dyn PortalSession,
        preference: &Preference,
        reference_date: NaiveDate,
    ) -> Vec<ParsedShiftEntry> {
        let shift_id = shift_type_id(&preference.shift_type);
        let mut found = Vec::new();

        for week_offset in 0..WEEKS_AHEAD {
            let url = self.listing_url(week_offset, shift_id, reference_date);
            let body = match session.fetch_document(&url).await {
                Ok(body) => body,
                Err(e) => {
                    warn!(%url, "Skipping week {}: {}", week_offset, e);
                    continue;
                }
            };
            let entries = parse_listing(&body, &self.origin, preference);
            debug!(%url, "Week {} yielded {} matching shift(s)", week_offset, entries.len());
            found.extend(entries);
        }

        found
    }
}

//=========================================================================================
// Page parsing
//=========================================================================================

/// Extracts the shifts on one listing page that fall inside the preference's window.
///
/// The weekday of a column is not compared against `preference.days`; which
/// days show up is left to the page itself. That looks like a latent bug but
/// is the established behaviour, so it stays until product says otherwise.
pub fn parse_listing(html: &str, origin: &Url, preference: &Preference) -> Vec<ParsedShiftEntry> {
    let document = Html::parse_document(html);
    let Some(grid) = document.select(&GRID).next() else {
        debug!("No shift grid on page");
        return Vec::new();
    };

    grid.select(&DAY_COLUMN)
        .flat_map(|column| parse_column(column, origin, preference))
        .collect()
}

fn parse_column(column: ElementRef<'_>, origin: &Url, preference: &Preference) -> Vec<ParsedShiftEntry> {
    let heading = column
        .select(&PARAGRAPH)
        .next()
        .and_then(|p| p.select(&BOLD).next())
        .map(collapsed_text)
        .unwrap_or_default();
    if heading.is_empty() {
        return Vec::new();
    }

    let no_shifts = column
        .select(&CENTERED)
        .any(|p| p.text().collect::<String>().contains(NO_SHIFTS_MARKER));
    if no_shifts {
        return Vec::new();
    }

    let mut parts = heading.split_whitespace();
    let day = parts.next().unwrap_or_default();
    let date = parts.next().unwrap_or_default();

    column
        .select(&SHIFT_LINK)
        .filter_map(|link| {
            let time = link.select(&BOLD).next().map(collapsed_text)?;
            if !time_window::matches(&time, preference) {
                return None;
            }
            let description = link
                .text()
                .collect::<String>()
                .replacen(&time, "", 1)
                .trim()
                .to_string();
            let href = absolute_href(origin, link.value().attr("href").unwrap_or_default());

            Some(ParsedShiftEntry {
                day: day.to_string(),
                date: date.to_string(),
                time,
                description,
                href,
                shift_type: preference.shift_type.clone(),
            })
        })
        .collect()
}

/// All text below `element`, trimmed per node and joined with single spaces.
fn collapsed_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn absolute_href(origin: &Url, href: &str) -> String {
    let href = href.trim();
    origin
        .join(href)
        .map(String::from)
        .unwrap_or_else(|_| format!("{}{}", origin.as_str().trim_end_matches('/'), href))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <div class="grid-container">
            <div class="col">
              <p><b>Sun 3/16/2025</b></p>
              <p align="center">-- No shifts --</p>
              <a class="shift" href="/services/shift_claim/999/"><b>10:00 AM</b> 🥕 Checkout 💳</a>
            </div>
            <div class="col">
              <p><b>Mon 3/17/2025</b></p>
              <a class="shift" href="/services/shift_claim/1001/"><b>9:00 AM</b> 🥕 Checkout 💳</a>
              <a class="shift" href="/services/shift_claim/1002/"><b>6:00 PM</b> 🥕 Checkout 💳</a>
            </div>
          </div>
        </body></html>
    "#;

    fn preference(start: &str, end: &str) -> Preference {
        Preference {
            id: 7,
            user_id: 3,
            shift_type: "Checkout 💳".to_string(),
            days: vec!["Monday".to_string()],
            time_range_start: start.to_string(),
            time_range_end: end.to_string(),
            notification_email: "member@example.org".to_string(),
            is_active: true,
        }
    }

    fn origin() -> Url {
        Url::parse("https://members.foodcoop.com").unwrap()
    }

    #[test]
    fn filters_by_window_and_skips_empty_days() {
        let entries = parse_listing(PAGE, &origin(), &preference("08:00", "12:00"));
        assert_eq!(
            entries,
            vec![ParsedShiftEntry {
                day: "Mon".to_string(),
                date: "3/17/2025".to_string(),
                time: "9:00 AM".to_string(),
                description: "🥕 Checkout 💳".to_string(),
                href: "https://members.foodcoop.com/services/shift_claim/1001/".to_string(),
                shift_type: "Checkout 💳".to_string(),
            }]
        );
    }

    #[test]
    fn wide_window_takes_both_shifts() {
        let entries = parse_listing(PAGE, &origin(), &preference("00:00", "23:59"));
        let times: Vec<_> = entries.iter().map(|e| e.time.as_str()).collect();
        assert_eq!(times, ["9:00 AM", "6:00 PM"]);
        assert!(entries.iter().all(|e| e.day == "Mon"));
    }

    #[test]
    fn marked_day_yields_nothing_even_with_links() {
        let entries = parse_listing(PAGE, &origin(), &preference("09:30", "10:30"));
        assert!(entries.is_empty());
    }

    #[test]
    fn description_keeps_interior_spacing() {
        let html = r#"
            <div class="grid-container">
              <div class="col">
                <p><b>Wed 3/19/2025</b></p>
                <a class="shift" href="/services/shift_claim/3/">
                  <b>7:00 AM</b>  Receiving  (heavy lifting)
                </a>
              </div>
            </div>
        "#;
        let entries = parse_listing(html, &origin(), &preference("00:00", "23:59"));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].description, "Receiving  (heavy lifting)");
    }

    #[test]
    fn page_without_grid_is_empty() {
        let html = "<html><body><p>Please choose a date in range.</p></body></html>";
        assert!(parse_listing(html, &origin(), &preference("00:00", "23:59")).is_empty());
    }

    #[test]
    fn malformed_fragments_are_skipped() {
        let html = r#"
            <div class="grid-container">
              <div class="col">
                <a class="shift" href="/services/shift_claim/1/"><b>9:00 AM</b> headingless</a>
              </div>
              <div class="col">
                <p><b>Tue 3/18/2025</b></p>
                <a class="shift" href="/services/shift_claim/2/">no bold time</a>
                <a class="shift"><b>10:30 AM</b> Cashier</a>
                <a class="shift" href="/x"><b>noon-ish</b> Cashier</a>
              </div>
            </div>
        "#;
        let entries = parse_listing(html, &origin(), &preference("00:00", "23:59"));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].date, "3/18/2025");
        assert_eq!(entries[0].time, "10:30 AM");
        assert_eq!(entries[0].description, "Cashier");
        // Missing href falls back to the portal root.
        assert_eq!(entries[0].href, "https://members.foodcoop.com/");
    }

    #[test]
    fn listing_url_layout() {
        let scanner = ShiftScanner::new(origin());
        let date = NaiveDate::from_ymd_opt(2025, 3, 16).unwrap();
        assert_eq!(
            scanner.listing_url(1, 58, date),
            "https://members.foodcoop.com/services/shifts/1/58/0/2025-03-16"
        );
    }
}
