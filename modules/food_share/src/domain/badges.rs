//! Static achievement catalog and its evaluation against a volunteer's totals.

use crate::contract::model::{Badge, BadgeMetric, UserStats};

pub const CATALOG: [Badge; 8] = [
    Badge {
        id: "1",
        name: "First Rescue",
        description: "Claimed your first food donation",
        icon: "🎯",
        requirement: 1,
        metric: BadgeMetric::Claims,
    },
    Badge {
        id: "2",
        name: "Food Saver",
        description: "Rescued 5 food donations",
        icon: "🌟",
        requirement: 5,
        metric: BadgeMetric::Claims,
    },
    Badge {
        id: "3",
        name: "Community Hero",
        description: "Rescued 10 food donations",
        icon: "🦸",
        requirement: 10,
        metric: BadgeMetric::Claims,
    },
    Badge {
        id: "4",
        name: "Eco Warrior",
        description: "Saved 25kg of food from waste",
        icon: "🌱",
        requirement: 25,
        metric: BadgeMetric::FoodSavedKg,
    },
    Badge {
        id: "5",
        name: "Food Champion",
        description: "Rescued 25 food donations",
        icon: "🏆",
        requirement: 25,
        metric: BadgeMetric::Claims,
    },
    Badge {
        id: "6",
        name: "Master Rescuer",
        description: "Rescued 50 food donations",
        icon: "👑",
        requirement: 50,
        metric: BadgeMetric::Claims,
    },
    Badge {
        id: "7",
        name: "Planet Protector",
        description: "Saved 100kg of food from waste",
        icon: "🌍",
        requirement: 100,
        metric: BadgeMetric::FoodSavedKg,
    },
    Badge {
        id: "8",
        name: "Legend",
        description: "Rescued 100 food donations",
        icon: "⭐",
        requirement: 100,
        metric: BadgeMetric::Claims,
    },
];

pub fn find(id: &str) -> Option<&'static Badge> {
    CATALOG.iter().find(|b| b.id == id)
}

/// The total the badge is measured against.
pub fn current_value(badge: &Badge, stats: &UserStats) -> f64 {
    match badge.metric {
        BadgeMetric::Claims => f64::from(stats.total_claims),
        BadgeMetric::FoodSavedKg => stats.total_food_saved,
    }
}

pub fn is_earned(badge: &Badge, stats: &UserStats) -> bool {
    current_value(badge, stats) >= f64::from(badge.requirement)
}

/// Earned badges in catalog order.
pub fn earned(stats: &UserStats) -> Vec<&'static Badge> {
    CATALOG.iter().filter(|b| is_earned(b, stats)).collect()
}

/// First unearned badge in catalog order.
pub fn next_badge(stats: &UserStats) -> Option<&'static Badge> {
    CATALOG.iter().find(|b| !is_earned(b, stats))
}

/// Completion percentage in `0.0..=100.0`.
pub fn progress(badge: &Badge, stats: &UserStats) -> f64 {
    let pct = current_value(badge, stats) / f64::from(badge.requirement) * 100.0;
    pct.clamp(0.0, 100.0)
}

/// How much is left before the badge is earned; never negative.
pub fn remaining(badge: &Badge, stats: &UserStats) -> f64 {
    (f64::from(badge.requirement) - current_value(badge, stats)).max(0.0)
}

/// Badges crossed when the totals moved from `before` to `after`.
pub fn newly_earned(before: &UserStats, after: &UserStats) -> Vec<&'static Badge> {
    CATALOG
        .iter()
        .filter(|b| !is_earned(b, before) && is_earned(b, after))
        .collect()
}
