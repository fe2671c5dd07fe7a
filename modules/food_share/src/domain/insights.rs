//! Read-only views over the post collection used by the dashboards and
//! history pages. Everything here is pure; callers pass the clock in.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::contract::model::{FoodPost, GeoPoint, PostStatus};

const RECENT_WINDOW_MINUTES: i64 = 60;
const URGENT_WINDOW_MINUTES: i64 = 120;
const PICKUP_TIME_FORMATS: [&str; 4] = ["%H:%M", "%H:%M:%S", "%I:%M %p", "%I:%M%p"];

pub fn available(posts: &[FoodPost]) -> Vec<&FoodPost> {
    posts
        .iter()
        .filter(|p| p.status == PostStatus::Available)
        .collect()
}

pub fn for_donor(posts: &[FoodPost], donor_id: Uuid) -> Vec<&FoodPost> {
    posts.iter().filter(|p| p.donor_id == donor_id).collect()
}

pub fn claimed_by(posts: &[FoodPost], volunteer_id: Uuid) -> Vec<&FoodPost> {
    posts
        .iter()
        .filter(|p| p.status == PostStatus::Claimed && p.claimed_by_id == Some(volunteer_id))
        .collect()
}

/// Case-insensitive substring match on food and donor names. A blank term
/// matches everything.
pub fn search<'a>(posts: &[&'a FoodPost], term: &str) -> Vec<&'a FoodPost> {
    let needle = term.trim().to_lowercase();
    posts
        .iter()
        .copied()
        .filter(|p| {
            needle.is_empty()
                || p.food_name.to_lowercase().contains(&needle)
                || p.donor_name.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Posted less than an hour ago.
pub fn is_recent(post: &FoodPost, now: DateTime<Utc>) -> bool {
    now.signed_duration_since(post.created_at) < Duration::minutes(RECENT_WINDOW_MINUTES)
}

/// Combine `pickup_date` and `pickup_time` into one instant (read as UTC).
pub fn pickup_instant(post: &FoodPost) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(post.pickup_date.trim(), "%Y-%m-%d").ok()?;
    let raw = post.pickup_time.trim();
    let time = PICKUP_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(raw, fmt).ok())?;
    Some(NaiveDateTime::new(date, time).and_utc())
}

/// Pickup is less than two hours away, overdue pickups included.
/// An unparsable pickup is never urgent.
pub fn is_urgent(post: &FoodPost, now: DateTime<Utc>) -> bool {
    pickup_instant(post)
        .map(|at| at.signed_duration_since(now) < Duration::minutes(URGENT_WINDOW_MINUTES))
        .unwrap_or(false)
}

fn same_month(at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    at.year() == now.year() && at.month() == now.month()
}

fn total_weight<'a>(posts: impl Iterator<Item = &'a FoodPost>) -> f64 {
    posts.map(|p| p.estimated_weight.unwrap_or(0.0)).sum()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorSummary {
    pub total_posts: usize,
    pub available_posts: usize,
    pub claimed_posts: usize,
    pub expired_posts: usize,
    pub total_food_donated: f64,
    pub this_month: usize,
}

impl DonorSummary {
    pub fn compute(posts: &[FoodPost], donor_id: Uuid, now: DateTime<Utc>) -> Self {
        let mine = for_donor(posts, donor_id);
        let count = |status| mine.iter().filter(|p| p.status == status).count();
        Self {
            total_posts: mine.len(),
            available_posts: count(PostStatus::Available),
            claimed_posts: count(PostStatus::Claimed),
            expired_posts: count(PostStatus::Expired),
            total_food_donated: total_weight(mine.iter().copied()),
            this_month: mine.iter().filter(|p| same_month(p.created_at, now)).count(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerSummary {
    pub total_claims: usize,
    pub total_food_saved: f64,
    pub this_month: usize,
}

impl VolunteerSummary {
    pub fn compute(posts: &[FoodPost], volunteer_id: Uuid, now: DateTime<Utc>) -> Self {
        let claimed = claimed_by(posts, volunteer_id);
        Self {
            total_claims: claimed.len(),
            total_food_saved: total_weight(claimed.iter().copied()),
            this_month: claimed
                .iter()
                .filter(|p| same_month(p.created_at, now))
                .count(),
        }
    }
}

/// What a map widget needs to drop a pin.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapMarker {
    pub post_id: Uuid,
    pub position: GeoPoint,
    pub title: String,
    pub address: String,
}

/// Pins for available posts only.
pub fn map_markers(posts: &[FoodPost]) -> Vec<MapMarker> {
    available(posts)
        .into_iter()
        .map(|p| MapMarker {
            post_id: p.id,
            position: p.location,
            title: p.food_name.clone(),
            address: p.address.clone(),
        })
        .collect()
}

/// Google Maps driving directions to the pickup address.
pub fn directions_url(address: &str) -> String {
    format!(
        "https://www.google.com/maps/dir/?api=1&destination={}&travelmode=driving",
        urlencoding::encode(address)
    )
}
