//! Demo seed data
//!
//! The built-in office around rue de Rivoli:
//! - 5 colleagues
//! - 6 restaurants within 2 km
//! - 5 colleague votes cast in the 10 minutes before login

use chrono::{DateTime, Duration, Utc};

use crate::domain::{PriceTier, Restaurant, User, Vote};
use crate::ports::SeedProvider;

/// Seed provider backed by the built-in demo data
#[derive(Debug, Default, Clone, Copy)]
pub struct DemoSeedProvider;

impl DemoSeedProvider {
    pub fn new() -> Self {
        Self
    }
}

impl SeedProvider for DemoSeedProvider {
    fn name(&self) -> &str {
        "demo"
    }

    fn restaurants(&self) -> Vec<Restaurant> {
        generate_demo_restaurants()
    }

    fn colleagues(&self) -> Vec<User> {
        generate_demo_colleagues()
    }

    fn seed_votes(&self, now: DateTime<Utc>) -> Vec<Vote> {
        generate_demo_votes(now)
    }
}

fn avatar(photo: &str) -> String {
    format!("https://images.unsplash.com/{}?w=400&h=400&fit=crop", photo)
}

fn cover(photo: &str) -> String {
    format!("https://images.unsplash.com/{}?w=500&h=300&fit=crop", photo)
}

/// Generate demo colleagues
pub fn generate_demo_colleagues() -> Vec<User> {
    vec![
        User::new("1", "Alice Martin", "alice@company.com", avatar("photo-1494790108377-be9c29b29330")),
        User::new("2", "Bob Dupont", "bob@company.com", avatar("photo-1507003211169-0a1dd7228f2d")),
        User::new("3", "Claire Rousseau", "claire@company.com", avatar("photo-1438761681033-6461ffad8d80")),
        User::new("4", "David Leclerc", "david@company.com", avatar("photo-1500648767791-00dcc994a43e")),
        User::new("5", "Emma Petit", "emma@company.com", avatar("photo-1506794778202-cad84cf45f1d")),
    ]
}

/// Generate the demo restaurant catalog
pub fn generate_demo_restaurants() -> Vec<Restaurant> {
    vec![
        Restaurant {
            rating: 4.5,
            review_count: 328,
            image: cover("photo-1579871494635-c7589f084646"),
            address: "45 Rue de Rivoli, 75004 Paris".to_string(),
            opening_hours: "11:30 - 23:00".to_string(),
            price_tier: PriceTier::Moderate,
            description: "Traditional French bistro with excellent food and a warm atmosphere.".to_string(),
            ..Restaurant::new("1", "Le Petit Bistro", "French", 0.5)
        },
        Restaurant {
            rating: 4.7,
            review_count: 412,
            image: cover("photo-1579584425555-c3ce17fd4351"),
            address: "82 Rue Montmartre, 75001 Paris".to_string(),
            opening_hours: "11:00 - 22:00".to_string(),
            price_tier: PriceTier::Moderate,
            description: "Authentic Japanese ramen bar with house-made broths.".to_string(),
            ..Restaurant::new("2", "Sakura Ramen", "Japanese", 0.8)
        },
        Restaurant {
            rating: 4.3,
            review_count: 256,
            image: cover("photo-1565299585323-38d6b0865b47"),
            address: "120 Rue de Turenne, 75003 Paris".to_string(),
            opening_hours: "12:00 - 23:30".to_string(),
            price_tier: PriceTier::Budget,
            description: "Wood-fired Neapolitan pizza made with imported ingredients.".to_string(),
            ..Restaurant::new("3", "Pizza Napoli", "Italian", 1.2)
        },
        Restaurant {
            rating: 4.4,
            review_count: 189,
            image: cover("photo-1546069901-ba9599a7e63c"),
            address: "35 Rue des Martyrs, 75009 Paris".to_string(),
            opening_hours: "11:30 - 23:00".to_string(),
            price_tier: PriceTier::Moderate,
            description: "Moroccan tagines and couscous in a Maghreb setting.".to_string(),
            ..Restaurant::new("4", "Le Marrakech", "Moroccan", 1.5)
        },
        Restaurant {
            rating: 4.2,
            review_count: 578,
            image: cover("photo-1568901346375-23c9450c58cd"),
            address: "12 Boulevard Saint-Germain, 75005 Paris".to_string(),
            opening_hours: "11:00 - 22:00".to_string(),
            price_tier: PriceTier::Budget,
            description: "Craft burgers, house fries and a wide choice of sauces.".to_string(),
            ..Restaurant::new("5", "The Burger Station", "American", 0.3)
        },
        Restaurant {
            rating: 4.6,
            review_count: 342,
            image: cover("photo-1455619452474-d2be0d1fdec2"),
            address: "78 Rue Mouffetard, 75005 Paris".to_string(),
            opening_hours: "11:00 - 22:30".to_string(),
            price_tier: PriceTier::Budget,
            description: "Vietnamese pho, fresh spring rolls and traditional soups.".to_string(),
            ..Restaurant::new("6", "Pho Vietnam", "Vietnamese", 2.0)
        },
    ]
}

/// Generate colleague votes relative to `now`
///
/// Three colleagues picked Le Petit Bistro, one Sakura Ramen and one
/// Pizza Napoli.
pub fn generate_demo_votes(now: DateTime<Utc>) -> Vec<Vote> {
    [
        ("1", "1", 600_000),
        ("2", "1", 500_000),
        ("3", "2", 400_000),
        ("4", "1", 300_000),
        ("5", "3", 200_000),
    ]
    .into_iter()
    .map(|(user_id, restaurant_id, ms_ago)| {
        Vote::new(user_id, restaurant_id, now - Duration::milliseconds(ms_ago))
    })
    .collect()
}
