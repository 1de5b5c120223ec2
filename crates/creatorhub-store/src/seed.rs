//! Demo fixtures loaded into a fresh store.

use chrono::{DateTime, NaiveDate, Utc};
use creatorhub_types::models::{
    Creator, Message, Post, Role, Transaction, TransactionType, User,
};

use crate::PlatformState;

pub const FAN_ID: &str = "user-fan-1";
pub const CREATOR_USER_ID: &str = "user-creator-1";
pub const ADMIN_ID: &str = "user-admin-1";

/// Starting wallet of the seed fan, in cents.
pub const FAN_STARTING_BALANCE: u64 = 10_000;

pub fn fixtures() -> PlatformState {
    PlatformState {
        users: users(),
        creators: creators(),
        posts: posts(),
        messages: messages(),
        transactions: transactions(),
    }
}

fn at(year: i32, month: u32, day: u32, hour: u32, min: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, min, 0))
        .map(|ndt| ndt.and_utc())
        .unwrap_or_default()
}

fn avatar(seed: &str) -> String {
    format!("https://picsum.photos/seed/{}/200/200", seed)
}

fn banner(seed: &str) -> String {
    format!("https://picsum.photos/seed/{}/1200/400", seed)
}

fn users() -> Vec<User> {
    vec![
        User {
            id: FAN_ID.into(),
            name: "Brenda Fan".into(),
            avatar_url: avatar("brenda"),
            role: Role::Fan,
            subscribed_to: vec!["creator-2".into(), "creator-1".into()],
            balance: FAN_STARTING_BALANCE,
            bio: None,
        },
        User {
            id: CREATOR_USER_ID.into(),
            name: "Alex Codes".into(),
            avatar_url: avatar("alex"),
            role: Role::Creator {
                profile_id: "creator-4".into(),
            },
            subscribed_to: vec![],
            balance: 0,
            bio: Some("Building the future, one line of code at a time.".into()),
        },
        User {
            id: ADMIN_ID.into(),
            name: "Admin".into(),
            avatar_url: avatar("admin"),
            role: Role::Admin,
            subscribed_to: vec![],
            balance: 0,
            bio: None,
        },
    ]
}

fn creators() -> Vec<Creator> {
    vec![
        Creator {
            id: "creator-1".into(),
            name: "Elena Voyage".into(),
            handle: "elenavoyage".into(),
            bio: "Exploring the world one photo at a time. Join my journey for exclusive travel content and behind-the-scenes stories.".into(),
            avatar_url: avatar("elena"),
            banner_url: banner("elenabanner"),
            is_verified: true,
            subscription_price: 1_500,
            access_code: "TRAVEL24".into(),
        },
        Creator {
            id: "creator-2".into(),
            name: "Chef Marco".into(),
            handle: "marcoskitchen".into(),
            bio: "Gourmet recipes made simple. Sub for weekly cooking classes, secret ingredients, and mouth-watering food photography.".into(),
            avatar_url: avatar("marco"),
            banner_url: banner("marcobanner"),
            is_verified: true,
            subscription_price: 2_000,
            access_code: "FOODIE".into(),
        },
        Creator {
            id: "creator-3".into(),
            name: "FitFlow Yoga".into(),
            handle: "fitflow".into(),
            bio: "Your daily dose of mindfulness and movement.".into(),
            avatar_url: avatar("yoga"),
            banner_url: banner("yogabanner"),
            is_verified: false,
            subscription_price: 1_000,
            access_code: "NAMASTE".into(),
        },
        Creator {
            id: "creator-4".into(),
            name: "Alex Codes".into(),
            handle: "alexcodes".into(),
            bio: "Follow for tutorials, project deep-dives, and career advice in tech.".into(),
            avatar_url: avatar("alex"),
            banner_url: banner("alexbanner"),
            is_verified: true,
            subscription_price: 2_500,
            access_code: "DEVLIFE".into(),
        },
    ]
}

fn post(
    id: &str,
    creator_id: &str,
    text: &str,
    image: Option<&str>,
    timestamp: DateTime<Utc>,
    (likes, comments, tips): (u64, u64, u64),
    is_private: bool,
) -> Post {
    Post {
        id: id.into(),
        creator_id: creator_id.into(),
        text: text.into(),
        image_url: image.map(|seed| format!("https://picsum.photos/seed/{}/600/400", seed)),
        timestamp,
        likes,
        comments,
        tips,
        is_private,
    }
}

fn posts() -> Vec<Post> {
    vec![
        post(
            "p1",
            "creator-2",
            "Just perfected my sourdough recipe! The crust is incredible. Subscribers get the full guide this weekend.",
            Some("food1"),
            at(2023, 10, 27, 10, 0),
            (1_200, 88, 5_000),
            false,
        ),
        post(
            "p2",
            "creator-1",
            "Sunrise over the Alps. My new 4K wallpaper pack for subscribers comes close!",
            Some("alps"),
            at(2023, 10, 27, 9, 30),
            (3_400, 210, 15_000),
            true,
        ),
        post(
            "p3",
            "creator-4",
            "Just pushed a major update to my open-source project. Deep dive video for all my patrons is now live!",
            None,
            at(2023, 10, 26, 18, 0),
            (890, 54, 7_500),
            false,
        ),
        post(
            "p4",
            "creator-2",
            "This week's exclusive recipe: Pan-seared scallops with a lemon-butter sauce.",
            Some("scallops"),
            at(2023, 10, 25, 12, 0),
            (1_500, 150, 9_000),
            true,
        ),
        post(
            "p5",
            "creator-3",
            "Five minute morning flow to wake up your spine. Try it tomorrow!",
            Some("yogaflow"),
            at(2023, 10, 24, 7, 0),
            (640, 32, 1_000),
            false,
        ),
        post(
            "p6",
            "creator-3",
            "Full 45 minute restorative session is up for subscribers.",
            None,
            at(2023, 10, 23, 19, 0),
            (410, 12, 0),
            true,
        ),
    ]
}

fn message(id: &str, from: &str, to: &str, text: &str, timestamp: DateTime<Utc>, is_read: bool) -> Message {
    Message {
        id: id.into(),
        from_id: from.into(),
        to_id: to.into(),
        text: text.into(),
        timestamp,
        is_read,
        status: None,
    }
}

fn messages() -> Vec<Message> {
    vec![
        message(
            "m1",
            FAN_ID,
            "creator-2",
            "Hey Chef Marco! Loved the scallop recipe!",
            at(2023, 10, 27, 11, 0),
            true,
        ),
        message(
            "m2",
            "creator-2",
            FAN_ID,
            "Glad you enjoyed it Brenda!",
            at(2023, 10, 27, 11, 1),
            false,
        ),
        message(
            "m3",
            FAN_ID,
            "creator-1",
            "The Alps wallpaper is stunning!",
            at(2023, 10, 27, 10, 5),
            true,
        ),
    ]
}

fn transactions() -> Vec<Transaction> {
    vec![Transaction {
        id: "t1".into(),
        user_id: FAN_ID.into(),
        kind: TransactionType::Deposit,
        amount: FAN_STARTING_BALANCE as i64,
        description: "Initial deposit".into(),
        timestamp: at(2023, 10, 20, 9, 0),
        related_creator_id: None,
        related_post_id: None,
    }]
}
