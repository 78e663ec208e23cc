// src/services/itinerary.rs
// DOCUMENTATION: Travel itinerary ordering and display formatting
// PURPOSE: Sort offers by price and prepare them for the detail page

use crate::models::{OfferResponse, TravelOffer};
use chrono::{NaiveDate, NaiveDateTime};

/// Sort offers ascending by price
/// DOCUMENTATION: Stable (equal prices keep input order) and non-mutating;
/// the source slice is left untouched.
pub fn sort_offers(offers: &[TravelOffer]) -> Vec<TravelOffer> {
    let mut sorted = offers.to_vec();
    sorted.sort_by(|a, b| a.price.total_cmp(&b.price));
    sorted
}

/// Sorted offers with rank, readable departure and price label
pub fn itinerary(offers: &[TravelOffer]) -> Vec<OfferResponse> {
    sort_offers(offers)
        .into_iter()
        .enumerate()
        .map(|(idx, offer)| {
            let (departure_date, departure_time) = format_departure(&offer.date_time);
            OfferResponse {
                rank: idx + 1,
                price_label: format_inr(offer.price),
                company_name: offer.company_name,
                departure_date,
                departure_time,
                price: offer.price,
            }
        })
        .collect()
}

/// Split "YYYY-MM-DD HH:mm" into ("Friday, March 1, 2024", "06:00")
/// Unparseable dates are passed through as-is.
pub fn format_departure(date_time: &str) -> (String, String) {
    if let Ok(parsed) = NaiveDateTime::parse_from_str(date_time, "%Y-%m-%d %H:%M") {
        return (
            parsed.format("%A, %B %-d, %Y").to_string(),
            parsed.format("%H:%M").to_string(),
        );
    }

    let (date, time) = date_time.split_once(' ').unwrap_or((date_time, ""));
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.format("%A, %B %-d, %Y").to_string())
        .unwrap_or_else(|_| date.to_string());

    (date, time.to_string())
}

/// Rupee amount with Indian digit grouping, e.g. "₹12,34,567"
pub fn format_inr(amount: f64) -> String {
    // en-IN keeps at most three fraction digits
    let thousandths = (amount.abs() * 1000.0).round() as u64;
    let whole = thousandths / 1000;
    let fraction = thousandths % 1000;

    let digits = whole.to_string();
    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 0 {
            let start = end.saturating_sub(2);
            groups.push(&head[start..end]);
            end = start;
        }
        groups.reverse();
        format!("{},{}", groups.join(","), tail)
    };

    let sign = if amount < 0.0 && thousandths > 0 { "-" } else { "" };
    if fraction == 0 {
        format!("{}₹{}", sign, grouped)
    } else {
        let fraction = format!("{:03}", fraction);
        format!("{}₹{}.{}", sign, grouped, fraction.trim_end_matches('0'))
    }
}
